use crate::animation::Animatable;
use crate::widgets::Color;

use super::{DrawCommand, PaintContext};

/// Glyphs from darkest to brightest
const RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Rasterizes a display list into a character grid, one unit per cell.
#[derive(Debug, Clone)]
pub struct TerminalRenderer {
    width: usize,
    height: usize,
    background: Color,
}

impl TerminalRenderer {
    pub fn new(width: usize, height: usize, background: Color) -> Self {
        Self {
            width,
            height,
            background,
        }
    }

    pub fn set_size(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    /// Rasterize all commands in paint order; later commands overwrite
    /// earlier ones.
    pub fn render(&self, ctx: &PaintContext) -> Vec<Vec<char>> {
        let mut grid = vec![vec![' '; self.width]; self.height];

        for command in ctx.commands() {
            match command {
                DrawCommand::Rect { rect, color } => {
                    let glyph = self.glyph_for(color);
                    for (row, line) in grid.iter_mut().enumerate() {
                        let cy = row as f32 + 0.5;
                        for (col, cell) in line.iter_mut().enumerate() {
                            if rect.contains(col as f32 + 0.5, cy) {
                                *cell = glyph;
                            }
                        }
                    }
                }
                DrawCommand::Text { text, rect, .. } => {
                    let row = rect.y.floor();
                    if row < 0.0 || row as usize >= self.height {
                        continue;
                    }
                    let line = &mut grid[row as usize];
                    let start = rect.x.max(0.0).floor() as usize;
                    let limit = (rect.x + rect.width).max(0.0).floor() as usize;
                    let end = limit.min(self.width);
                    for (cell, ch) in line.iter_mut().take(end).skip(start).zip(text.chars()) {
                        *cell = ch;
                    }
                }
            }
        }

        grid
    }

    pub fn render_to_string(&self, ctx: &PaintContext) -> String {
        self.render(ctx)
            .into_iter()
            .map(|line| line.into_iter().collect::<String>().trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn glyph_for(&self, color: &Color) -> char {
        let opaque = Color { a: 1.0, ..*color };
        let blended = Color::lerp(&self.background, &opaque, color.a);
        let index = (blended.luminance().clamp(0.0, 1.0) * (RAMP.len() - 1) as f32).round();
        // Anything drawn stays visible against the background
        RAMP[(index as usize).max(1)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::Rect;
    use std::time::Duration;

    #[test]
    fn test_text_is_clipped_to_rect() {
        let mut ctx = PaintContext::new(Duration::ZERO);
        ctx.draw_text("REVENUE", Rect::new(1.0, 0.0, 3.0, 1.0), Color::WHITE);
        let renderer = TerminalRenderer::new(10, 2, Color::BLACK);
        assert_eq!(renderer.render_to_string(&ctx), " REV\n");
    }

    #[test]
    fn test_rect_fills_covered_cells() {
        let mut ctx = PaintContext::new(Duration::ZERO);
        ctx.draw_rect(Rect::new(0.0, 0.0, 2.0, 1.0), Color::WHITE);
        let renderer = TerminalRenderer::new(3, 1, Color::BLACK);
        assert_eq!(renderer.render_to_string(&ctx), "@@");
    }

    #[test]
    fn test_faint_rect_uses_dim_glyph() {
        let mut ctx = PaintContext::new(Duration::ZERO);
        ctx.draw_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE.with_opacity(0.01));
        let renderer = TerminalRenderer::new(1, 1, Color::BLACK);
        assert_eq!(renderer.render_to_string(&ctx), ".");
    }
}
