use crate::animation::{AnimationTarget, ValueAnimator};
use crate::jobs::{FrameClock, Job, JobType};
use crate::reactive::{ChangeFlags, IntoMaybeDyn, MaybeDyn, WidgetId};
use crate::renderer::PaintContext;

use super::metric_card::format_grouped;
use super::text::Text;
use super::widget::{Color, Rect, Widget};

const LABEL_COLOR: Color = Color::rgb(0.55, 0.55, 0.55);

/// One line of a metric list: label on the left, counting value on the right
pub struct MetricRow {
    widget_id: WidgetId,
    label: Text,
    value: MaybeDyn<f64>,
    current: f64,
    suffix: String,
    animator: ValueAnimator,
    mounted: bool,
    bounds: Rect,
}

impl MetricRow {
    pub fn new(label: impl IntoMaybeDyn<String>, value: impl IntoMaybeDyn<f64>) -> Self {
        let value = value.into_maybe_dyn();
        let current = value.get();
        Self {
            widget_id: WidgetId::next(),
            label: Text::new(label).color(LABEL_COLOR),
            value,
            current,
            suffix: String::new(),
            animator: ValueAnimator::new(),
            mounted: false,
            bounds: Rect::default(),
        }
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Value text as currently displayed
    pub fn readout(&self) -> String {
        format!("{}{}", format_grouped(self.animator.displayed_value()), self.suffix)
    }

    pub fn animator(&self) -> &ValueAnimator {
        &self.animator
    }

    fn apply_value(&mut self, clock: &mut dyn FrameClock) {
        let target = AnimationTarget::from_option(Some(self.current), self.mounted);
        self.animator.set_target(target, clock);
    }
}

impl Widget for MetricRow {
    fn id(&self) -> WidgetId {
        self.widget_id
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.label
            .set_bounds(Rect::new(bounds.x, bounds.y, bounds.width, 1.0));
    }

    fn mount(&mut self, clock: &mut dyn FrameClock) {
        self.mounted = true;
        self.current = self.value.get();
        self.apply_value(clock);
    }

    fn unmount(&mut self, clock: &mut dyn FrameClock) {
        self.mounted = false;
        self.animator.stop(clock);
    }

    fn refresh(&mut self, clock: &mut dyn FrameClock) -> ChangeFlags {
        let mut flags = self.label.refresh(clock);
        let value = self.value.get();
        if value != self.current {
            self.current = value;
            self.apply_value(clock);
            flags |= ChangeFlags::NEEDS_PAINT;
        }
        flags
    }

    fn handle_job(&mut self, job: &Job, clock: &mut dyn FrameClock) -> ChangeFlags {
        if job.widget_id == self.animator.id()
            && job.job_type == JobType::Frame
            && self.animator.on_frame(job.at, clock)
        {
            return ChangeFlags::NEEDS_PAINT;
        }
        ChangeFlags::empty()
    }

    fn paint(&self, ctx: &mut PaintContext) {
        self.label.paint(ctx);

        // Right-aligned, overwriting the label if the row is too narrow
        let readout = self.readout();
        let width = readout.chars().count() as f32;
        let x = self.bounds.x + (self.bounds.width - width).max(0.0);
        ctx.draw_text(
            &readout,
            Rect::new(x, self.bounds.y, width, 1.0),
            Color::WHITE,
        );
    }
}

impl std::fmt::Debug for MetricRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricRow")
            .field("widget_id", &self.widget_id)
            .field("label", &self.label.content())
            .field("value", &self.current)
            .field("animator", &self.animator)
            .finish()
    }
}

pub fn metric_row(label: impl IntoMaybeDyn<String>, value: impl IntoMaybeDyn<f64>) -> MetricRow {
    MetricRow::new(label, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::Scheduler;
    use crate::renderer::TerminalRenderer;
    use std::time::Duration;

    fn pump(row: &mut MetricRow, scheduler: &mut Scheduler, ms: u64) {
        scheduler.advance_to(Duration::from_millis(ms));
        row.refresh(scheduler);
        while let Some(job) = scheduler.next_job() {
            row.handle_job(&job, scheduler);
        }
    }

    #[test]
    fn test_row_counts_to_value_with_suffix() {
        let mut scheduler = Scheduler::new();
        let mut row = metric_row("Transactions", 1250.0).suffix(" tx");
        assert_eq!(row.readout(), "0 tx");

        row.mount(&mut scheduler);
        pump(&mut row, &mut scheduler, 1500);
        assert_eq!(row.readout(), "1,250 tx");
        assert!(!row.animator().is_running());
    }

    #[test]
    fn test_row_does_not_run_before_mount() {
        let mut scheduler = Scheduler::new();
        let mut row = metric_row("Anomalies", 3.0);
        pump(&mut row, &mut scheduler, 1500);
        assert_eq!(row.readout(), "0");
        assert!(!scheduler.has_pending_jobs());
    }

    #[test]
    fn test_row_remount_mid_count_reaches_value() {
        let mut scheduler = Scheduler::new();
        let mut row = metric_row("Transactions", 1250.0);
        row.mount(&mut scheduler);
        pump(&mut row, &mut scheduler, 100);
        let partial = row.animator().displayed_value();
        assert!(partial > 0.0 && partial < 1250.0);

        row.unmount(&mut scheduler);
        assert!(!scheduler.has_pending_jobs());
        row.mount(&mut scheduler);
        assert!(row.animator().is_running());

        pump(&mut row, &mut scheduler, 1600);
        assert_eq!(row.readout(), "1,250");
    }

    #[test]
    fn test_row_paints_value_right_aligned() {
        let mut scheduler = Scheduler::new();
        let mut row = metric_row("Avg", 42.0).suffix("%");
        row.set_bounds(Rect::new(0.0, 0.0, 12.0, 1.0));
        row.mount(&mut scheduler);
        pump(&mut row, &mut scheduler, 2000);

        let mut ctx = PaintContext::new(Duration::from_millis(2000));
        row.paint(&mut ctx);
        let renderer = TerminalRenderer::new(12, 1, Color::BLACK);
        assert_eq!(renderer.render_to_string(&ctx), "Avg      42%");
    }
}
