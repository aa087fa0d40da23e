use std::time::Duration;

use mosaic::prelude::*;
use mosaic::renderer::DrawCommand;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// Advance and deliver every due job to one widget
fn pump<W: Widget>(widget: &mut W, scheduler: &mut Scheduler, at: Duration) -> ChangeFlags {
    scheduler.advance_to(at);
    let mut flags = widget.refresh(scheduler);
    while let Some(job) = scheduler.next_job() {
        flags |= widget.handle_job(&job, scheduler);
    }
    flags
}

fn cell_count(ctx: &PaintContext) -> usize {
    ctx.commands()
        .iter()
        .filter(|command| matches!(command, DrawCommand::Rect { .. }))
        .count()
}

#[test]
fn test_displayed_value_never_decreases() {
    init_logger();
    for target in [0.0, 1.0, 7.0, 999.0, 5000.0, 48250.75] {
        let mut scheduler = Scheduler::new();
        let mut animator = ValueAnimator::new();
        animator.set_target(AnimationTarget::new(target, true), &mut scheduler);

        let mut previous = animator.displayed_value();
        assert_eq!(previous, 0.0);
        let mut now = Duration::ZERO;
        while animator.is_running() {
            now += ms(16);
            scheduler.advance_to(now);
            while let Some(job) = scheduler.next_job() {
                animator.on_frame(job.at, &mut scheduler);
            }
            let value = animator.displayed_value();
            assert!(value >= previous, "{target}: {value} after {previous}");
            previous = value;
        }
        assert_eq!(animator.displayed_value(), target);
        assert!(now >= ms(1500) && now < ms(1516));
    }
}

#[test]
fn test_rapid_toggles_keep_one_timer_chain() {
    init_logger();
    let mut scheduler = Scheduler::new();
    let mut transition = PixelGridTransition::seeded(text("stats"), text("info"), 21).grid_size(5);
    transition.set_bounds(Rect::new(0.0, 0.0, 20.0, 5.0));
    let id = transition.id();

    let mut active = false;
    for at in [0, 40, 90, 95, 250, 320, 330, 700, 710] {
        pump(&mut transition, &mut scheduler, ms(at));
        active = !active;
        transition.set_active(active, &mut scheduler);
        assert_eq!(scheduler.pending_timers(id), 2, "after toggle at {at}ms");
    }

    // Last toggle at 710ms; the cycle ends at 1310ms
    for at in (720..=1310).step_by(10) {
        pump(&mut transition, &mut scheduler, ms(at));
        let mut ctx = PaintContext::new(ms(at));
        transition.paint(&mut ctx);
        assert_eq!(ctx.texts().len(), 1, "at {at}ms");
    }

    assert_eq!(transition.phase(), TransitionPhase::Idle);
    assert!(!transition.is_overlay_visible());
    assert!(!scheduler.has_pending_jobs());
    assert_eq!(transition.visible_face(), Face::Back);

    let mut ctx = PaintContext::new(ms(1310));
    transition.paint(&mut ctx);
    assert_eq!(cell_count(&ctx), 0);
    assert_eq!(ctx.texts(), vec!["info"]);
}

#[test]
fn test_faces_swap_exactly_at_phase_boundary() {
    let mut scheduler = Scheduler::new();
    let mut transition = PixelGridTransition::seeded(text("front"), text("back"), 3)
        .grid_size(4)
        .phase_duration(ms(200));
    transition.set_bounds(Rect::new(0.0, 0.0, 8.0, 4.0));

    transition.set_active(true, &mut scheduler);
    let flags = pump(&mut transition, &mut scheduler, ms(199));
    assert!(!flags.contains(ChangeFlags::FACE_SWAPPED));
    assert_eq!(transition.visible_face(), Face::Front);

    let flags = pump(&mut transition, &mut scheduler, ms(200));
    assert!(flags.contains(ChangeFlags::FACE_SWAPPED));
    assert_eq!(transition.visible_face(), Face::Back);
    assert_eq!(transition.phase(), TransitionPhase::Shrinking);
}

#[test]
fn test_mosaic_covers_card_mid_transition() {
    let mut scheduler = Scheduler::new();
    let mut transition = PixelGridTransition::seeded(text(""), text(""), 8).grid_size(4);
    transition.set_bounds(Rect::new(0.0, 0.0, 8.0, 4.0));
    transition.set_active(true, &mut scheduler);

    // Every cell has grown by 300ms and none has started shrinking
    pump(&mut transition, &mut scheduler, ms(299));
    let mut ctx = PaintContext::new(ms(299));
    transition.paint(&mut ctx);
    assert_eq!(cell_count(&ctx), 16);

    let screen = TerminalRenderer::new(8, 4, Color::BLACK).render_to_string(&ctx);
    assert!(screen.lines().all(|line| line.chars().count() == 8));
    assert!(!screen.contains(' '));
}

#[test]
fn test_seeded_transitions_match() {
    let make = || PixelGridTransition::seeded(text("a"), text("b"), 1234).grid_size(6);
    let mut a = make();
    let mut b = make();
    assert_eq!(a.cells(), b.cells());

    let mut scheduler = Scheduler::new();
    a.set_active(true, &mut scheduler);
    b.set_active(true, &mut scheduler);
    assert_eq!(a.permutation(), b.permutation());
}

#[test]
fn test_card_counts_and_flips_end_to_end() {
    init_logger();
    let mut scheduler = Scheduler::new();
    let mut card = metric_card("Total Revenue")
        .value(MetricValue::Number(5000.0))
        .prefix("$")
        .info("Total revenue generated from all accounts in the current period.")
        .grid_size(6)
        .seed(99);
    card.set_bounds(Rect::new(0.0, 0.0, 36.0, 8.0));
    card.mount(&mut scheduler);

    pump(&mut card, &mut scheduler, ms(750));
    assert_eq!(card.readout().as_deref(), Some("$4,843"));

    // Opening mid-count does not disturb the readout
    assert!(card.toggle(&mut scheduler));
    pump(&mut card, &mut scheduler, ms(1050));
    assert_eq!(card.transition().visible_face(), Face::Back);
    assert_eq!(card.readout().as_deref(), Some("$4,960"));

    pump(&mut card, &mut scheduler, ms(1500));
    assert_eq!(card.readout().as_deref(), Some("$5,000"));
    assert_eq!(card.transition().phase(), TransitionPhase::Idle);
    assert!(scheduler.next_deadline().is_none());
    assert!(!scheduler.has_pending_jobs());
}

#[test]
fn test_deactivated_run_holds_its_value() {
    init_logger();
    let mut scheduler = Scheduler::new();
    let mut animator = ValueAnimator::new();
    animator.set_target(AnimationTarget::new(5000.0, true), &mut scheduler);

    let mut now = Duration::ZERO;
    while now < ms(400) {
        now += ms(16);
        scheduler.advance_to(now);
        while let Some(job) = scheduler.next_job() {
            animator.on_frame(job.at, &mut scheduler);
        }
    }
    let held = animator.displayed_value();
    assert!(held > 0.0 && held < 5000.0);

    animator.set_target(AnimationTarget::new(900.0, false), &mut scheduler);
    for at in [500, 1000, 3000] {
        scheduler.advance_to(ms(at));
        assert!(scheduler.next_job().is_none());
        assert_eq!(animator.displayed_value(), held);
    }
}
