//! Display list and terminal rasterizer.
//!
//! Widgets paint into a [`PaintContext`], which records [`DrawCommand`]s.
//! The [`TerminalRenderer`] turns a finished context into text.

pub mod commands;
mod terminal;

use std::time::Duration;

pub use commands::DrawCommand;
pub use terminal::TerminalRenderer;

use crate::widgets::{Color, Rect};

/// Paint context for collecting draw commands for one frame
#[derive(Debug, Default)]
pub struct PaintContext {
    now: Duration,
    commands: Vec<DrawCommand>,
    opacity_stack: Vec<f32>,
}

impl PaintContext {
    /// Create a context for a frame painted at `now`
    pub fn new(now: Duration) -> Self {
        Self {
            now,
            commands: Vec::new(),
            opacity_stack: Vec::new(),
        }
    }

    /// Frame time; time-driven styles are evaluated at this instant
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.opacity_stack.clear();
    }

    fn opacity(&self) -> f32 {
        self.opacity_stack.last().copied().unwrap_or(1.0)
    }

    /// Multiply the opacity of everything drawn until the matching `pop_opacity`
    pub fn push_opacity(&mut self, opacity: f32) {
        let combined = self.opacity() * opacity.clamp(0.0, 1.0);
        self.opacity_stack.push(combined);
    }

    pub fn pop_opacity(&mut self) {
        self.opacity_stack.pop();
    }

    pub fn draw_rect(&mut self, rect: Rect, color: Color) {
        let color = color.with_opacity(self.opacity());
        if rect.is_empty() || color.a <= 0.0 {
            return;
        }
        self.commands.push(DrawCommand::Rect { rect, color });
    }

    pub fn draw_text(&mut self, text: &str, rect: Rect, color: Color) {
        let color = color.with_opacity(self.opacity());
        if text.is_empty() || color.a <= 0.0 {
            return;
        }
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            rect,
            color,
        });
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// All text drawn so far, in paint order
    pub fn texts(&self) -> Vec<&str> {
        self.commands.iter().filter_map(DrawCommand::text).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opacity_stack_multiplies() {
        let mut ctx = PaintContext::new(Duration::ZERO);
        ctx.push_opacity(0.5);
        ctx.push_opacity(0.5);
        ctx.draw_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE);
        ctx.pop_opacity();
        ctx.draw_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE);
        ctx.pop_opacity();

        let alphas: Vec<f32> = ctx.commands().iter().map(DrawCommand::alpha).collect();
        assert_eq!(alphas, vec![0.25, 0.5]);
    }

    #[test]
    fn test_invisible_commands_are_skipped() {
        let mut ctx = PaintContext::new(Duration::ZERO);
        ctx.push_opacity(0.0);
        ctx.draw_text("hidden", Rect::new(0.0, 0.0, 10.0, 1.0), Color::WHITE);
        ctx.pop_opacity();
        ctx.draw_rect(Rect::new(0.0, 0.0, 0.0, 1.0), Color::WHITE);
        assert!(ctx.commands().is_empty());
    }
}
