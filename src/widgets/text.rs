use crate::jobs::FrameClock;
use crate::reactive::{ChangeFlags, IntoMaybeDyn, MaybeDyn, WidgetId};
use crate::renderer::PaintContext;

use super::widget::{Color, Rect, Widget};

/// A single line of text, static or dynamic
pub struct Text {
    widget_id: WidgetId,
    content: MaybeDyn<String>,
    color: Color,
    cached_text: String,
    bounds: Rect,
}

impl Text {
    pub fn new(content: impl IntoMaybeDyn<String>) -> Self {
        let content = content.into_maybe_dyn();
        let cached_text = content.get();
        Self {
            widget_id: WidgetId::next(),
            content,
            color: Color::WHITE,
            cached_text,
            bounds: Rect::default(),
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Text as of the last refresh
    pub fn content(&self) -> &str {
        &self.cached_text
    }
}

impl Widget for Text {
    fn id(&self) -> WidgetId {
        self.widget_id
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    fn refresh(&mut self, _clock: &mut dyn FrameClock) -> ChangeFlags {
        if !self.content.is_dynamic() {
            return ChangeFlags::empty();
        }
        let text = self.content.get();
        if text == self.cached_text {
            return ChangeFlags::empty();
        }
        self.cached_text = text;
        ChangeFlags::NEEDS_PAINT
    }

    fn paint(&self, ctx: &mut PaintContext) {
        ctx.draw_text(&self.cached_text, self.bounds, self.color);
    }
}

impl std::fmt::Debug for Text {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Text")
            .field("widget_id", &self.widget_id)
            .field("text", &self.cached_text)
            .field("bounds", &self.bounds)
            .finish()
    }
}

pub fn text(content: impl IntoMaybeDyn<String>) -> Text {
    Text::new(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::Scheduler;
    use crate::reactive::create_signal;
    use std::time::Duration;

    #[test]
    fn test_refresh_picks_up_signal_changes() {
        let mut scheduler = Scheduler::new();
        let label = create_signal(String::from("ANALYZING"));
        let mut widget = text(label.clone());

        assert!(widget.refresh(&mut scheduler).is_empty());
        label.set(String::from("LOW"));
        assert_eq!(widget.refresh(&mut scheduler), ChangeFlags::NEEDS_PAINT);
        assert_eq!(widget.content(), "LOW");
    }

    #[test]
    fn test_paint_draws_cached_text() {
        let mut widget = text("+12% from last month");
        widget.set_bounds(Rect::new(0.0, 3.0, 30.0, 1.0));
        let mut ctx = PaintContext::new(Duration::ZERO);
        widget.paint(&mut ctx);
        assert_eq!(ctx.texts(), vec!["+12% from last month"]);
    }
}
