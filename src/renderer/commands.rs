//! Draw command definitions for the display list.

use crate::widgets::{Color, Rect};

/// A single draw operation in host coordinates.
///
/// Opacity pushed on the [`PaintContext`](super::PaintContext) is already
/// folded into each command's color alpha.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill a rectangle.
    Rect {
        /// Rectangle bounds
        rect: Rect,
        /// Fill color
        color: Color,
    },

    /// Draw a single line of text starting at the rect's top-left corner.
    Text {
        /// The text string to render
        text: String,
        /// The clip rectangle for the text
        rect: Rect,
        /// The text color
        color: Color,
    },
}

impl DrawCommand {
    /// Alpha after opacity folding
    pub fn alpha(&self) -> f32 {
        match self {
            DrawCommand::Rect { color, .. } | DrawCommand::Text { color, .. } => color.a,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            DrawCommand::Text { text, .. } => Some(text),
            DrawCommand::Rect { .. } => None,
        }
    }
}
