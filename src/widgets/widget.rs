use crate::jobs::{FrameClock, Job};
use crate::reactive::{ChangeFlags, WidgetId};
use crate::renderer::PaintContext;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Same color with its alpha multiplied by `opacity`
    pub fn with_opacity(self, opacity: f32) -> Self {
        Self {
            a: self.a * opacity.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Perceived brightness in `[0, 1]`, ignoring alpha
    pub fn luminance(&self) -> f32 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }

    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn inset(&self, amount: f32) -> Self {
        Self {
            x: self.x + amount,
            y: self.y + amount,
            width: (self.width - amount * 2.0).max(0.0),
            height: (self.height - amount * 2.0).max(0.0),
        }
    }

    /// Scale around the center
    pub fn scaled(&self, factor: f32) -> Self {
        let width = self.width * factor;
        let height = self.height * factor;
        Self {
            x: self.x + (self.width - width) / 2.0,
            y: self.y + (self.height - height) / 2.0,
            width,
            height,
        }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Input delivered to widgets, in the same coordinate space as their bounds
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    MouseDown { x: f32, y: f32, button: MouseButton },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResponse {
    Handled,
    Ignored,
}

/// A paintable, schedulable element.
///
/// Widgets own their animation state. Anything time-driven goes through the
/// [`FrameClock`] passed to each call, and the resulting jobs come back in
/// [`Widget::handle_job`]. Containers forward jobs that are not addressed to
/// them to their children.
pub trait Widget {
    fn id(&self) -> WidgetId;

    fn bounds(&self) -> Rect;

    fn set_bounds(&mut self, bounds: Rect);

    /// Called once when the widget becomes part of a live view
    fn mount(&mut self, _clock: &mut dyn FrameClock) {}

    /// Called when the widget leaves the view. Must cancel every pending
    /// frame request and timer the widget (or its children) owns.
    fn unmount(&mut self, _clock: &mut dyn FrameClock) {}

    /// Re-read dynamic inputs. Called by the host before each paint.
    fn refresh(&mut self, _clock: &mut dyn FrameClock) -> ChangeFlags {
        ChangeFlags::empty()
    }

    fn handle_job(&mut self, _job: &Job, _clock: &mut dyn FrameClock) -> ChangeFlags {
        ChangeFlags::empty()
    }

    fn event(&mut self, _event: &Event, _clock: &mut dyn FrameClock) -> EventResponse {
        EventResponse::Ignored
    }

    fn paint(&self, ctx: &mut PaintContext);
}

impl<W: Widget + ?Sized> Widget for Box<W> {
    fn id(&self) -> WidgetId {
        (**self).id()
    }

    fn bounds(&self) -> Rect {
        (**self).bounds()
    }

    fn set_bounds(&mut self, bounds: Rect) {
        (**self).set_bounds(bounds)
    }

    fn mount(&mut self, clock: &mut dyn FrameClock) {
        (**self).mount(clock)
    }

    fn unmount(&mut self, clock: &mut dyn FrameClock) {
        (**self).unmount(clock)
    }

    fn refresh(&mut self, clock: &mut dyn FrameClock) -> ChangeFlags {
        (**self).refresh(clock)
    }

    fn handle_job(&mut self, job: &Job, clock: &mut dyn FrameClock) -> ChangeFlags {
        (**self).handle_job(job, clock)
    }

    fn event(&mut self, event: &Event, clock: &mut dyn FrameClock) -> EventResponse {
        (**self).event(event, clock)
    }

    fn paint(&self, ctx: &mut PaintContext) {
        (**self).paint(ctx)
    }
}
