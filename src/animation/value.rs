use std::time::Duration;

use crate::animation::TimingFunction;
use crate::jobs::FrameClock;
use crate::reactive::WidgetId;

/// Default length of one count-up run
pub const VALUE_ANIMATION_DURATION: Duration = Duration::from_millis(1500);

/// Input of a [`ValueAnimator`], replaced wholesale on every change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationTarget {
    pub target_value: f64,
    pub active: bool,
}

impl AnimationTarget {
    pub fn new(target_value: f64, active: bool) -> Self {
        Self {
            target_value,
            active,
        }
    }

    /// Target for a value that may be missing; missing or non-finite
    /// numbers count as 0.
    pub fn from_option(target_value: Option<f64>, active: bool) -> Self {
        let target_value = match target_value {
            Some(value) if value.is_finite() => value,
            Some(value) => {
                log::warn!("Non-finite animation target {value}, using 0");
                0.0
            }
            None => 0.0,
        };
        Self::new(target_value, active)
    }
}

impl Default for AnimationTarget {
    fn default() -> Self {
        Self::new(0.0, false)
    }
}

/// State of the run in progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatorRunState {
    pub displayed_value: f64,
    pub start: Duration,
}

/// Counts a displayed number up from 0 to its target.
///
/// The animator never reads time on its own. A run is driven by frame jobs
/// from the [`FrameClock`] it was started with; the owner forwards each
/// `JobType::Frame` for [`ValueAnimator::id`] to [`ValueAnimator::on_frame`].
#[derive(Debug)]
pub struct ValueAnimator {
    widget_id: WidgetId,
    target: AnimationTarget,
    duration: Duration,
    timing: TimingFunction,
    run: Option<AnimatorRunState>,
    displayed_value: f64,
}

impl ValueAnimator {
    pub fn new() -> Self {
        Self {
            widget_id: WidgetId::next(),
            target: AnimationTarget::default(),
            duration: VALUE_ANIMATION_DURATION,
            timing: TimingFunction::EaseOutExpo,
            run: None,
            displayed_value: 0.0,
        }
    }

    /// Override the run length
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Override the easing curve
    pub fn timing(mut self, timing: TimingFunction) -> Self {
        self.timing = timing;
        self
    }

    pub fn id(&self) -> WidgetId {
        self.widget_id
    }

    pub fn target(&self) -> AnimationTarget {
        self.target
    }

    /// The value to show right now
    pub fn displayed_value(&self) -> f64 {
        self.displayed_value
    }

    /// Current run, if one is in flight
    pub fn run_state(&self) -> Option<AnimatorRunState> {
        self.run
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// Replace the target. Starts a new run when the new target is active
    /// and differs from the previous one (activation or a new value).
    /// An inactive target freezes the current value.
    pub fn set_target(&mut self, target: AnimationTarget, clock: &mut dyn FrameClock) {
        let target = if target.target_value.is_finite() {
            target
        } else {
            AnimationTarget::from_option(Some(target.target_value), target.active)
        };

        if target == self.target {
            return;
        }
        self.target = target;

        if target.active {
            self.start_run(clock);
        } else if self.run.take().is_some() {
            clock.cancel_frame(self.widget_id);
            log::trace!(
                "Value animator {} frozen at {}",
                self.widget_id,
                self.displayed_value
            );
        }
    }

    fn start_run(&mut self, clock: &mut dyn FrameClock) {
        // A superseded chain must not get another tick
        clock.cancel_frame(self.widget_id);

        let start = clock.now();
        log::debug!(
            "Value animator {} counting to {} from {:?}",
            self.widget_id,
            self.target.target_value,
            start
        );
        self.run = Some(AnimatorRunState {
            displayed_value: 0.0,
            start,
        });
        self.displayed_value = 0.0;
        clock.request_frame(self.widget_id);
    }

    /// Value of the current target after `elapsed` into a run
    pub fn value_at(&self, elapsed: Duration) -> f64 {
        let progress = self.progress_at(elapsed);
        if progress >= 1.0 {
            return self.target.target_value;
        }
        (self.target.target_value * self.timing.evaluate(progress)).floor()
    }

    fn progress_at(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Advance the run to the frame time `now`.
    /// Returns true if the displayed value changed.
    pub fn on_frame(&mut self, now: Duration, clock: &mut dyn FrameClock) -> bool {
        let Some(mut run) = self.run else {
            return false;
        };

        let elapsed = now.saturating_sub(run.start);
        let value = self.value_at(elapsed);
        let changed = value != self.displayed_value;
        run.displayed_value = value;
        self.displayed_value = value;

        if self.progress_at(elapsed) < 1.0 {
            self.run = Some(run);
            clock.request_frame(self.widget_id);
        } else {
            log::trace!("Value animator {} settled at {}", self.widget_id, value);
            self.run = None;
        }

        changed
    }

    /// Tear down: drop the pending frame and keep the last value.
    /// The target goes inactive, so the next active target starts over.
    pub fn stop(&mut self, clock: &mut dyn FrameClock) {
        clock.cancel_frame(self.widget_id);
        self.run = None;
        self.target.active = false;
    }
}

impl Default for ValueAnimator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::{JobType, Scheduler};

    /// Deliver frame jobs at each time in `frames`
    fn run_frames(animator: &mut ValueAnimator, scheduler: &mut Scheduler, frames: &[u64]) {
        for ms in frames {
            scheduler.advance_to(Duration::from_millis(*ms));
            while let Some(job) = scheduler.next_job() {
                assert_eq!(job.widget_id, animator.id());
                assert_eq!(job.job_type, JobType::Frame);
                animator.on_frame(job.at, scheduler);
            }
        }
    }

    #[test]
    fn test_starts_at_zero_and_requests_frame() {
        let mut scheduler = Scheduler::new();
        let mut animator = ValueAnimator::new();
        animator.set_target(AnimationTarget::new(5000.0, true), &mut scheduler);

        assert!(animator.is_running());
        assert_eq!(animator.displayed_value(), 0.0);
        assert!(scheduler.has_frame_request(animator.id()));
    }

    #[test]
    fn test_value_at_midpoint() {
        let mut scheduler = Scheduler::new();
        let mut animator = ValueAnimator::new();
        animator.set_target(AnimationTarget::new(5000.0, true), &mut scheduler);

        run_frames(&mut animator, &mut scheduler, &[750]);
        assert_eq!(animator.displayed_value(), 4843.0);
    }

    #[test]
    fn test_reaches_target_exactly_and_stops() {
        let mut scheduler = Scheduler::new();
        let mut animator = ValueAnimator::new();
        animator.set_target(AnimationTarget::new(1234.5, true), &mut scheduler);

        run_frames(&mut animator, &mut scheduler, &[16, 700, 1500]);
        assert_eq!(animator.displayed_value(), 1234.5);
        assert!(!animator.is_running());
        assert!(!scheduler.has_pending_jobs());
    }

    #[test]
    fn test_inactive_target_freezes_value() {
        let mut scheduler = Scheduler::new();
        let mut animator = ValueAnimator::new();
        animator.set_target(AnimationTarget::new(100.0, true), &mut scheduler);
        run_frames(&mut animator, &mut scheduler, &[1500]);

        animator.set_target(AnimationTarget::new(900.0, false), &mut scheduler);
        assert_eq!(animator.displayed_value(), 100.0);
        assert!(!animator.is_running());
        assert!(!scheduler.has_pending_jobs());
    }

    #[test]
    fn test_deactivating_mid_run_freezes_value() {
        for target in [900.0, 5000.0] {
            let mut scheduler = Scheduler::new();
            let mut animator = ValueAnimator::new();
            animator.set_target(AnimationTarget::new(5000.0, true), &mut scheduler);
            run_frames(&mut animator, &mut scheduler, &[100]);
            assert_eq!(animator.displayed_value(), 1850.0);

            animator.set_target(AnimationTarget::new(target, false), &mut scheduler);
            assert!(!animator.is_running());
            assert!(!scheduler.has_frame_request(animator.id()));

            run_frames(&mut animator, &mut scheduler, &[200, 2000]);
            assert_eq!(animator.displayed_value(), 1850.0, "deactivated with {target}");
        }
    }

    #[test]
    fn test_reactivating_after_freeze_starts_over() {
        let mut scheduler = Scheduler::new();
        let mut animator = ValueAnimator::new();
        animator.set_target(AnimationTarget::new(5000.0, true), &mut scheduler);
        run_frames(&mut animator, &mut scheduler, &[100]);
        animator.set_target(AnimationTarget::new(5000.0, false), &mut scheduler);

        scheduler.advance_to(Duration::from_millis(300));
        animator.set_target(AnimationTarget::new(5000.0, true), &mut scheduler);
        assert_eq!(animator.displayed_value(), 0.0);
        run_frames(&mut animator, &mut scheduler, &[1800]);
        assert_eq!(animator.displayed_value(), 5000.0);
    }

    #[test]
    fn test_inactive_from_start_never_runs() {
        let mut scheduler = Scheduler::new();
        let mut animator = ValueAnimator::new();
        animator.set_target(AnimationTarget::new(100.0, false), &mut scheduler);
        assert!(!animator.is_running());
        assert_eq!(animator.displayed_value(), 0.0);
    }

    #[test]
    fn test_same_target_does_not_restart() {
        let mut scheduler = Scheduler::new();
        let mut animator = ValueAnimator::new();
        animator.set_target(AnimationTarget::new(100.0, true), &mut scheduler);
        let first = animator.run_state().map(|run| run.start);

        scheduler.advance_to(Duration::from_millis(200));
        animator.set_target(AnimationTarget::new(100.0, true), &mut scheduler);
        assert_eq!(animator.run_state().map(|run| run.start), first);
    }

    #[test]
    fn test_new_target_supersedes_running_chain() {
        let mut scheduler = Scheduler::new();
        let mut animator = ValueAnimator::new();
        animator.set_target(AnimationTarget::new(1000.0, true), &mut scheduler);
        run_frames(&mut animator, &mut scheduler, &[100, 200]);
        assert!(animator.displayed_value() > 0.0);

        animator.set_target(AnimationTarget::new(50.0, true), &mut scheduler);
        assert_eq!(animator.displayed_value(), 0.0);
        assert_eq!(
            animator.run_state().map(|run| run.start),
            Some(Duration::from_millis(200))
        );

        // Elapsed time counts from the new run, not the old one
        run_frames(&mut animator, &mut scheduler, &[950]);
        assert_eq!(animator.displayed_value(), (50.0 * (1.0 - 2f64.powi(-5))).floor());

        run_frames(&mut animator, &mut scheduler, &[1700]);
        assert_eq!(animator.displayed_value(), 50.0);
    }

    #[test]
    fn test_missing_target_counts_as_zero() {
        let target = AnimationTarget::from_option(None, true);
        assert_eq!(target.target_value, 0.0);
        let target = AnimationTarget::from_option(Some(f64::NAN), true);
        assert_eq!(target.target_value, 0.0);
    }

    #[test]
    fn test_stop_cancels_pending_frame() {
        let mut scheduler = Scheduler::new();
        let mut animator = ValueAnimator::new();
        animator.set_target(AnimationTarget::new(10.0, true), &mut scheduler);
        run_frames(&mut animator, &mut scheduler, &[300]);
        let frozen = animator.displayed_value();

        animator.stop(&mut scheduler);
        assert!(!scheduler.has_pending_jobs());
        run_frames(&mut animator, &mut scheduler, &[2000]);
        assert_eq!(animator.displayed_value(), frozen);
    }

    #[test]
    fn test_same_target_after_stop_runs_again() {
        let mut scheduler = Scheduler::new();
        let mut animator = ValueAnimator::new();
        animator.set_target(AnimationTarget::new(5000.0, true), &mut scheduler);
        run_frames(&mut animator, &mut scheduler, &[100]);
        animator.stop(&mut scheduler);
        assert!(!animator.target().active);

        animator.set_target(AnimationTarget::new(5000.0, true), &mut scheduler);
        assert!(animator.is_running());
        run_frames(&mut animator, &mut scheduler, &[1600]);
        assert_eq!(animator.displayed_value(), 5000.0);
    }

    #[test]
    fn test_frame_before_start_clamps_elapsed() {
        let mut scheduler = Scheduler::new();
        scheduler.advance_to(Duration::from_millis(500));
        let mut animator = ValueAnimator::new();
        animator.set_target(AnimationTarget::new(10.0, true), &mut scheduler);
        assert!(!animator.on_frame(Duration::from_millis(400), &mut scheduler));
        assert_eq!(animator.displayed_value(), 0.0);
    }

    #[test]
    fn test_custom_duration_and_timing() {
        let mut scheduler = Scheduler::new();
        let mut animator = ValueAnimator::new()
            .duration(Duration::from_millis(100))
            .timing(TimingFunction::Linear);
        animator.set_target(AnimationTarget::new(10.0, true), &mut scheduler);
        run_frames(&mut animator, &mut scheduler, &[50]);
        assert_eq!(animator.displayed_value(), 5.0);
    }
}
