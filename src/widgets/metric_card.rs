//! Metric card: a counting readout that flips to an explanatory panel.
//!
//! ```text
//! +--------------------------[i]+
//! | TOTAL REVENUE               |
//! |                             |
//! | $48,250                     |
//! | +12% from last month        |
//! +-----------------------------+
//! ```
//!
//! The `[i]` control toggles the card's panel state, which drives the
//! [`PixelGridTransition`] between the stats face and the info face.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::animation::{AnimationTarget, ValueAnimator};
use crate::jobs::{FrameClock, Job, JobType};
use crate::reactive::{ChangeFlags, IntoMaybeDyn, MaybeDyn, WidgetId};
use crate::renderer::PaintContext;

use super::pixel_grid::PixelGridTransition;
use super::text::Text;
use super::widget::{Color, Event, EventResponse, MouseButton, Rect, Widget};

/// Label of the toggle control, drawn in the top-right corner
pub const TOGGLE_LABEL: &str = "[i]";
/// Info text is cut after this many lines
pub const INFO_MAX_LINES: usize = 6;

const TITLE_COLOR: Color = Color::rgb(0.63, 0.63, 0.63);
const MUTED_COLOR: Color = Color::rgb(0.5, 0.5, 0.5);

/// What a card displays as its main readout.
///
/// Deserializes from a bare JSON number or string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// Counted up by a [`ValueAnimator`]
    Number(f64),
    /// Shown verbatim, e.g. a status like "ANALYZING"
    Label(String),
}

impl MetricValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            MetricValue::Number(value) => Some(*value),
            MetricValue::Label(_) => None,
        }
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Number(value)
    }
}

impl From<&str> for MetricValue {
    fn from(label: &str) -> Self {
        MetricValue::Label(label.to_string())
    }
}

impl From<String> for MetricValue {
    fn from(label: String) -> Self {
        MetricValue::Label(label)
    }
}

impl IntoMaybeDyn<Option<MetricValue>> for MetricValue {
    fn into_maybe_dyn(self) -> MaybeDyn<Option<MetricValue>> {
        MaybeDyn::Static(Some(self))
    }
}

impl IntoMaybeDyn<Option<MetricValue>> for Option<MetricValue> {
    fn into_maybe_dyn(self) -> MaybeDyn<Option<MetricValue>> {
        MaybeDyn::Static(self)
    }
}

impl IntoMaybeDyn<Option<MetricValue>> for f64 {
    fn into_maybe_dyn(self) -> MaybeDyn<Option<MetricValue>> {
        MaybeDyn::Static(Some(MetricValue::Number(self)))
    }
}

impl IntoMaybeDyn<Option<MetricValue>> for &str {
    fn into_maybe_dyn(self) -> MaybeDyn<Option<MetricValue>> {
        MaybeDyn::Static(Some(MetricValue::from(self)))
    }
}

/// Format a number with thousands separators and at most three decimals
pub fn format_grouped(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    if value < 0.0 && (int_part != "0" || !frac_part.is_empty()) {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// Greedy word wrap; words longer than `width` are split
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let needed = if line.is_empty() {
            word.len()
        } else {
            line.chars().count() + 1 + word.len()
        };
        if needed > width && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.extend(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Panel state of one card
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CardViewState {
    pub panel_open: bool,
}

/// Front face: title, readout and extra lines
pub struct StatsFace {
    widget_id: WidgetId,
    title: Text,
    value: MaybeDyn<Option<MetricValue>>,
    current: Option<MetricValue>,
    animator: ValueAnimator,
    prefix: String,
    suffix: String,
    extra: Vec<Text>,
    mounted: bool,
    bounds: Rect,
}

impl StatsFace {
    fn new(title: MaybeDyn<String>) -> Self {
        Self {
            widget_id: WidgetId::next(),
            title: Text::new(title).color(TITLE_COLOR),
            value: MaybeDyn::Static(None),
            current: None,
            animator: ValueAnimator::new(),
            prefix: String::new(),
            suffix: String::new(),
            extra: Vec::new(),
            mounted: false,
            bounds: Rect::default(),
        }
    }

    /// Push the current value into the animator. Numbers count up once
    /// mounted; labels and missing values keep it idle.
    fn apply_value(&mut self, clock: &mut dyn FrameClock) {
        let number = self.current.as_ref().and_then(MetricValue::as_number);
        if number.is_none() {
            self.animator.stop(clock);
        }
        let active = self.mounted && number.is_some();
        self.animator
            .set_target(AnimationTarget::from_option(number, active), clock);
    }

    /// Readout line as currently displayed, if the card has a value
    pub fn readout(&self) -> Option<String> {
        let body = match self.current.as_ref()? {
            MetricValue::Number(_) => format_grouped(self.animator.displayed_value()),
            MetricValue::Label(label) => label.clone(),
        };
        Some(format!("{}{}{}", self.prefix, body, self.suffix))
    }

    pub fn animator(&self) -> &ValueAnimator {
        &self.animator
    }

    pub fn value(&self) -> Option<&MetricValue> {
        self.current.as_ref()
    }

    fn layout(&mut self) {
        let inner = self.bounds.inset(1.0);
        let title_width = (inner.width - TOGGLE_LABEL.len() as f32).max(0.0);
        self.title
            .set_bounds(Rect::new(inner.x, inner.y, title_width, 1.0));
        for (i, line) in self.extra.iter_mut().enumerate() {
            line.set_bounds(Rect::new(inner.x, inner.y + 3.0 + i as f32, inner.width, 1.0));
        }
    }

    fn readout_rect(&self) -> Rect {
        let inner = self.bounds.inset(1.0);
        Rect::new(inner.x, inner.y + 2.0, inner.width, 1.0)
    }
}

impl Widget for StatsFace {
    fn id(&self) -> WidgetId {
        self.widget_id
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.layout();
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
        let mut flags = self.title.refresh(clock);
        for line in &mut self.extra {
            flags |= line.refresh(clock);
        }

        let value = self.value.get();
        if value != self.current {
            self.current = value;
            self.apply_value(clock);
            flags |= ChangeFlags::NEEDS_PAINT;
        }
        flags
    }

    fn handle_job(&mut self, job: &Job, clock: &mut dyn FrameClock) -> ChangeFlags {
        if job.widget_id != self.animator.id() || job.job_type != JobType::Frame {
            return ChangeFlags::empty();
        }
        if self.animator.on_frame(job.at, clock) {
            ChangeFlags::NEEDS_PAINT
        } else {
            ChangeFlags::empty()
        }
    }

    fn paint(&self, ctx: &mut PaintContext) {
        self.title.paint(ctx);
        if let Some(readout) = self.readout() {
            ctx.draw_text(&readout, self.readout_rect(), Color::WHITE);
        }
        for line in &self.extra {
            line.paint(ctx);
        }
    }
}

impl std::fmt::Debug for StatsFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsFace")
            .field("widget_id", &self.widget_id)
            .field("value", &self.current)
            .field("animator", &self.animator)
            .finish()
    }
}

/// Back face: title and wrapped explanatory text
#[derive(Debug)]
pub struct InfoFace {
    widget_id: WidgetId,
    title: Text,
    info: String,
    lines: Vec<String>,
    bounds: Rect,
}

impl InfoFace {
    fn new(title: MaybeDyn<String>) -> Self {
        Self {
            widget_id: WidgetId::next(),
            title: Text::new(title).color(TITLE_COLOR),
            info: String::new(),
            lines: Vec::new(),
            bounds: Rect::default(),
        }
    }

    fn set_info(&mut self, info: String) {
        self.info = info;
        self.layout();
    }

    /// Info text as wrapped for the current bounds
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    fn layout(&mut self) {
        let inner = self.bounds.inset(1.0);
        self.title.set_bounds(Rect::new(inner.x, inner.y, inner.width, 1.0));

        let mut lines = wrap_words(&self.info, inner.width.max(1.0) as usize);
        lines.truncate(INFO_MAX_LINES);
        self.lines = lines;
    }
}

impl Widget for InfoFace {
    fn id(&self) -> WidgetId {
        self.widget_id
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.layout();
    }

    fn refresh(&mut self, clock: &mut dyn FrameClock) -> ChangeFlags {
        self.title.refresh(clock)
    }

    fn paint(&self, ctx: &mut PaintContext) {
        self.title.paint(ctx);
        let inner = self.bounds.inset(1.0);
        for (i, line) in self.lines.iter().enumerate() {
            let rect = Rect::new(inner.x, inner.y + 2.0 + i as f32, inner.width, 1.0);
            ctx.draw_text(line, rect, MUTED_COLOR);
        }
    }
}

/// Card showing one metric, with an optional info panel behind a mosaic flip
pub struct MetricCard {
    widget_id: WidgetId,
    transition: PixelGridTransition<StatsFace, InfoFace>,
    view: CardViewState,
    has_info: bool,
    bounds: Rect,
}

impl MetricCard {
    pub fn new(title: impl IntoMaybeDyn<String>) -> Self {
        let title = title.into_maybe_dyn();
        let front = StatsFace::new(title.clone());
        let back = InfoFace::new(title);
        Self {
            widget_id: WidgetId::next(),
            transition: PixelGridTransition::new(front, back),
            view: CardViewState::default(),
            has_info: false,
            bounds: Rect::default(),
        }
    }

    /// Main readout; numbers count up, labels are shown as given
    pub fn value(mut self, value: impl IntoMaybeDyn<Option<MetricValue>>) -> Self {
        let face = self.transition.front_mut();
        face.value = value.into_maybe_dyn();
        face.current = face.value.get();
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.transition.front_mut().prefix = prefix.into();
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.transition.front_mut().suffix = suffix.into();
        self
    }

    /// Add a line under the readout
    pub fn extra(mut self, line: impl IntoMaybeDyn<String>) -> Self {
        let line = Text::new(line).color(MUTED_COLOR);
        let face = self.transition.front_mut();
        face.extra.push(line);
        face.layout();
        self
    }

    /// Explanatory text. Without it the card has no toggle control.
    pub fn info(mut self, info: impl Into<String>) -> Self {
        let info = info.into();
        self.has_info = !info.trim().is_empty();
        self.transition.back_mut().set_info(info);
        self
    }

    pub fn grid_size(mut self, grid_size: u32) -> Self {
        self.transition = self.transition.grid_size(grid_size);
        self
    }

    pub fn phase_duration(mut self, phase_duration: Duration) -> Self {
        self.transition = self.transition.phase_duration(phase_duration);
        self
    }

    /// Make the mosaic reproducible
    pub fn seed(mut self, seed: u64) -> Self {
        self.transition = self.transition.seed(seed);
        self
    }

    /// Flip between the readout and the info panel.
    /// Returns false if the card has no info text.
    pub fn toggle(&mut self, clock: &mut dyn FrameClock) -> bool {
        if !self.has_info {
            return false;
        }
        self.view.panel_open = !self.view.panel_open;
        log::debug!(
            "Card {} panel {}",
            self.widget_id,
            if self.view.panel_open { "open" } else { "closed" }
        );
        self.transition.set_active(self.view.panel_open, clock);
        true
    }

    /// Area of the toggle control
    pub fn toggle_rect(&self) -> Rect {
        let width = TOGGLE_LABEL.len() as f32;
        Rect::new(
            self.bounds.x + (self.bounds.width - width).max(0.0),
            self.bounds.y,
            width.min(self.bounds.width),
            1.0,
        )
    }

    pub fn view_state(&self) -> CardViewState {
        self.view
    }

    pub fn is_panel_open(&self) -> bool {
        self.view.panel_open
    }

    pub fn has_info(&self) -> bool {
        self.has_info
    }

    pub fn readout(&self) -> Option<String> {
        self.transition.front().readout()
    }

    pub fn stats(&self) -> &StatsFace {
        self.transition.front()
    }

    pub fn info_face(&self) -> &InfoFace {
        self.transition.back()
    }

    pub fn transition(&self) -> &PixelGridTransition<StatsFace, InfoFace> {
        &self.transition
    }
}

impl Widget for MetricCard {
    fn id(&self) -> WidgetId {
        self.widget_id
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.transition.set_bounds(bounds);
    }

    fn mount(&mut self, clock: &mut dyn FrameClock) {
        self.transition.mount(clock);
    }

    fn unmount(&mut self, clock: &mut dyn FrameClock) {
        self.transition.unmount(clock);
    }

    fn refresh(&mut self, clock: &mut dyn FrameClock) -> ChangeFlags {
        self.transition.refresh(clock)
    }

    fn handle_job(&mut self, job: &Job, clock: &mut dyn FrameClock) -> ChangeFlags {
        self.transition.handle_job(job, clock)
    }

    fn event(&mut self, event: &Event, clock: &mut dyn FrameClock) -> EventResponse {
        match event {
            Event::MouseDown {
                x,
                y,
                button: MouseButton::Left,
            } if self.has_info && self.toggle_rect().contains(*x, *y) => {
                self.toggle(clock);
                EventResponse::Handled
            }
            _ => self.transition.event(event, clock),
        }
    }

    fn paint(&self, ctx: &mut PaintContext) {
        self.transition.paint(ctx);
        // The control stays above the mosaic
        if self.has_info {
            ctx.draw_text(TOGGLE_LABEL, self.toggle_rect(), Color::WHITE);
        }
    }
}

impl std::fmt::Debug for MetricCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricCard")
            .field("widget_id", &self.widget_id)
            .field("view", &self.view)
            .field("has_info", &self.has_info)
            .field("transition", &self.transition)
            .finish()
    }
}

pub fn metric_card(title: impl IntoMaybeDyn<String>) -> MetricCard {
    MetricCard::new(title)
}
