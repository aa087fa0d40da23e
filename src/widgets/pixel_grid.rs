//! Pixel-mosaic reveal transition.
//!
//! [`PixelGridTransition`] shows one of two contents and hides the swap
//! behind an N×N mosaic. Each edge of the `active` flag runs one cycle:
//!
//! ```text
//! edge            +phase              +2 × phase
//!  | Growing       | Shrinking          | Idle
//!  | cells appear  | face flips,        | overlay hidden
//!  | in shuffled   | cells disappear    |
//!  | order         | in the same order  |
//! ```
//!
//! The two phase boundaries are one-shot timers owned by the instance. A new
//! edge cancels both before arming its own, so a superseded cycle can never
//! advance the phase afterwards.

use std::time::Duration;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::animation::{Animatable, TimingFunction};
use crate::jobs::{FrameClock, Job, JobType, TimerId};
use crate::reactive::{ChangeFlags, WidgetId};
use crate::renderer::PaintContext;

use super::widget::{Color, Event, EventResponse, Rect, Widget};

pub const DEFAULT_GRID_SIZE: u32 = 30;
pub const DEFAULT_PHASE_DURATION: Duration = Duration::from_millis(300);
/// How long one cell takes to grow or shrink once its delay has passed
pub const CELL_ANIMATION_DURATION: Duration = Duration::from_millis(10);
/// Share of cells drawn with the accent tint
pub const ACCENT_PROBABILITY: f64 = 0.15;

/// Tint of a mosaic cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorToken {
    Accent,
    Neutral,
}

impl ColorToken {
    pub fn color(&self) -> Color {
        match self {
            ColorToken::Accent => Color::from_hex(0x1e40af),
            ColorToken::Neutral => Color::from_hex(0xe5e5e5),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridCell {
    pub id: usize,
    pub row: u32,
    pub col: u32,
    pub tint: ColorToken,
}

/// Build the N×N cell set, row-major, drawing each tint independently
pub fn generate_cells<R: Rng + ?Sized>(grid_size: u32, rng: &mut R) -> Vec<GridCell> {
    let total = grid_size as usize * grid_size as usize;
    (0..total)
        .map(|id| {
            let tint = if rng.random_bool(ACCENT_PROBABILITY) {
                ColorToken::Accent
            } else {
                ColorToken::Neutral
            };
            GridCell {
                id,
                row: (id / grid_size as usize) as u32,
                col: (id % grid_size as usize) as u32,
                tint,
            }
        })
        .collect()
}

/// Visiting order of the cells for one activation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealPermutation {
    order: Vec<usize>,
    /// Inverse of `order`: position of each cell id
    positions: Vec<usize>,
}

impl RevealPermutation {
    pub fn identity(count: usize) -> Self {
        Self::from_order((0..count).collect())
    }

    /// Uniform random order (Fisher–Yates) drawn from `rng`
    pub fn shuffled<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..count).collect();
        order.shuffle(rng);
        Self::from_order(order)
    }

    fn from_order(order: Vec<usize>) -> Self {
        let mut positions = vec![0; order.len()];
        for (position, id) in order.iter().enumerate() {
            positions[*id] = position;
        }
        Self { order, positions }
    }

    /// Cell ids in visiting order
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn position_of(&self, cell_id: usize) -> Option<usize> {
        self.positions.get(cell_id).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransitionPhase {
    #[default]
    Idle,
    Growing,
    Shrinking,
}

/// Which content is currently shown
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Face {
    #[default]
    Front,
    Back,
}

/// Visual state of one mosaic cell
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellStyle {
    pub opacity: f32,
    pub scale: f32,
}

impl CellStyle {
    pub const HIDDEN: CellStyle = CellStyle {
        opacity: 0.0,
        scale: 0.0,
    };
    pub const SHOWN: CellStyle = CellStyle {
        opacity: 1.0,
        scale: 1.0,
    };

    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0 && self.scale > 0.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TransitionConfig {
    /// Cells per side
    pub grid_size: u32,
    /// Length of each of the two timed phases
    pub phase_duration: Duration,
}

impl TransitionConfig {
    pub fn grid_size(mut self, grid_size: u32) -> Self {
        self.grid_size = grid_size;
        self
    }

    pub fn phase_duration(mut self, phase_duration: Duration) -> Self {
        self.phase_duration = phase_duration;
        self
    }

    fn validated(mut self) -> Self {
        if self.grid_size == 0 {
            log::warn!("Grid size 0 is not drawable, using 1");
            self.grid_size = 1;
        }
        self
    }
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            phase_duration: DEFAULT_PHASE_DURATION,
        }
    }
}

/// Pending phase boundaries of the current activation
#[derive(Debug, Default)]
struct PhaseTimers {
    shrink: Option<TimerId>,
    hide: Option<TimerId>,
}

impl PhaseTimers {
    fn cancel(&mut self, clock: &mut dyn FrameClock) {
        for timer in [self.shrink.take(), self.hide.take()].into_iter().flatten() {
            clock.clear_timeout(timer);
        }
    }

    fn is_armed(&self) -> bool {
        self.shrink.is_some() || self.hide.is_some()
    }
}

/// Two-content swap masked by a randomized mosaic wipe.
///
/// The random source is injected; [`PixelGridTransition::seeded`] gives a
/// reproducible cell set and permutation sequence.
pub struct PixelGridTransition<F, B, R = Pcg32> {
    widget_id: WidgetId,
    front: F,
    back: B,
    config: TransitionConfig,
    rng: R,
    cells: Vec<GridCell>,
    permutation: RevealPermutation,
    active: bool,
    has_activated: bool,
    phase: TransitionPhase,
    overlay_visible: bool,
    face: Face,
    activated_at: Duration,
    timers: PhaseTimers,
    bounds: Rect,
}

impl<F: Widget, B: Widget> PixelGridTransition<F, B, Pcg32> {
    /// Transition with an entropy-seeded generator
    pub fn new(front: F, back: B) -> Self {
        Self::with_rng(front, back, Pcg32::from_rng(&mut rand::rng()))
    }

    pub fn seeded(front: F, back: B, seed: u64) -> Self {
        Self::with_rng(front, back, Pcg32::seed_from_u64(seed))
    }

    /// Reseed the generator and redraw the cell tints
    pub fn seed(mut self, seed: u64) -> Self {
        self.rng = Pcg32::seed_from_u64(seed);
        self.regenerate_cells(self.config.grid_size);
        self
    }
}

impl<F: Widget, B: Widget, R: Rng> PixelGridTransition<F, B, R> {
    pub fn with_rng(front: F, back: B, mut rng: R) -> Self {
        let config = TransitionConfig::default();
        let cells = generate_cells(config.grid_size, &mut rng);
        let permutation = RevealPermutation::identity(cells.len());
        Self {
            widget_id: WidgetId::next(),
            front,
            back,
            config,
            rng,
            cells,
            permutation,
            active: false,
            has_activated: false,
            phase: TransitionPhase::Idle,
            overlay_visible: false,
            face: Face::Front,
            activated_at: Duration::ZERO,
            timers: PhaseTimers::default(),
            bounds: Rect::default(),
        }
    }

    /// Replace the configuration before the transition is live
    pub fn config(mut self, config: TransitionConfig) -> Self {
        let config = config.validated();
        if config.grid_size != self.config.grid_size {
            self.regenerate_cells(config.grid_size);
        }
        self.config = config;
        self
    }

    pub fn grid_size(self, grid_size: u32) -> Self {
        let config = self.config.clone().grid_size(grid_size);
        self.config(config)
    }

    pub fn phase_duration(self, phase_duration: Duration) -> Self {
        let config = self.config.clone().phase_duration(phase_duration);
        self.config(config)
    }

    fn regenerate_cells(&mut self, grid_size: u32) {
        self.cells = generate_cells(grid_size, &mut self.rng);
        self.permutation = RevealPermutation::identity(self.cells.len());
    }

    /// Drive the transition. Each change of the flag starts a new cycle.
    pub fn set_active(&mut self, active: bool, clock: &mut dyn FrameClock) {
        if active == self.active {
            return;
        }
        self.active = active;
        if active {
            self.has_activated = true;
        }
        self.trigger(clock);
    }

    /// Change the mosaic resolution. Once the transition has been used, the
    /// new cell set is shown with a fresh cycle.
    pub fn set_grid_size(&mut self, grid_size: u32, clock: &mut dyn FrameClock) {
        let config = self.config.clone().grid_size(grid_size).validated();
        if config.grid_size == self.config.grid_size {
            return;
        }
        self.regenerate_cells(config.grid_size);
        self.config = config;
        if self.has_activated {
            self.trigger(clock);
        }
    }

    pub fn set_phase_duration(&mut self, phase_duration: Duration, clock: &mut dyn FrameClock) {
        if phase_duration == self.config.phase_duration {
            return;
        }
        self.config.phase_duration = phase_duration;
        if self.has_activated {
            self.trigger(clock);
        }
    }

    fn trigger(&mut self, clock: &mut dyn FrameClock) {
        self.timers.cancel(clock);

        if self.cells.is_empty() {
            log::warn!("Transition {} has no cells, skipping reveal", self.widget_id);
            return;
        }

        self.permutation = RevealPermutation::shuffled(self.cells.len(), &mut self.rng);
        self.activated_at = clock.now();
        self.phase = TransitionPhase::Growing;
        self.overlay_visible = true;

        let phase_duration = self.config.phase_duration;
        self.timers.shrink = Some(clock.set_timeout(self.widget_id, phase_duration));
        self.timers.hide = Some(clock.set_timeout(self.widget_id, phase_duration * 2));
        clock.request_frame(self.widget_id);

        log::debug!(
            "Transition {} growing towards {:?} at {:?}",
            self.widget_id,
            self.target_face(),
            self.activated_at
        );
    }

    fn target_face(&self) -> Face {
        if self.active {
            Face::Back
        } else {
            Face::Front
        }
    }

    fn on_shrink(&mut self) -> ChangeFlags {
        self.timers.shrink = None;
        self.phase = TransitionPhase::Shrinking;
        log::debug!("Transition {} shrinking", self.widget_id);

        let face = self.target_face();
        if face == self.face {
            return ChangeFlags::NEEDS_PAINT;
        }
        self.face = face;
        ChangeFlags::NEEDS_PAINT | ChangeFlags::FACE_SWAPPED
    }

    fn on_hide(&mut self, clock: &mut dyn FrameClock) -> ChangeFlags {
        self.timers.hide = None;
        self.phase = TransitionPhase::Idle;
        self.overlay_visible = false;
        clock.cancel_frame(self.widget_id);
        log::debug!("Transition {} idle", self.widget_id);
        ChangeFlags::NEEDS_PAINT
    }

    /// Time between consecutive cells in the reveal order
    pub fn stagger(&self) -> Duration {
        match u32::try_from(self.cells.len()) {
            Ok(count) if count > 0 => self.config.phase_duration / count,
            _ => Duration::ZERO,
        }
    }

    /// Appearance delay of a cell in the current permutation
    pub fn cell_delay(&self, cell_id: usize) -> Duration {
        let count = self.cells.len() as u128;
        let Some(position) = self.permutation.position_of(cell_id) else {
            return Duration::ZERO;
        };
        let nanos = self.config.phase_duration.as_nanos() * position as u128 / count;
        Duration::from_nanos(nanos as u64)
    }

    /// Style of a cell at time `now`
    pub fn cell_style(&self, cell_id: usize, now: Duration) -> CellStyle {
        let delay = self.cell_delay(cell_id);
        let phase_duration = self.config.phase_duration;

        match self.phase {
            TransitionPhase::Idle => CellStyle::HIDDEN,
            TransitionPhase::Growing => {
                let start = self.activated_at + delay;
                CellStyle::lerp(
                    &CellStyle::HIDDEN,
                    &CellStyle::SHOWN,
                    cell_progress(now.saturating_sub(start)),
                )
            }
            TransitionPhase::Shrinking => {
                // Cells shrink from wherever growing left them
                let grown = CellStyle::lerp(
                    &CellStyle::HIDDEN,
                    &CellStyle::SHOWN,
                    cell_progress(phase_duration.saturating_sub(delay)),
                );
                let start = self.activated_at + phase_duration + delay;
                CellStyle::lerp(
                    &grown,
                    &CellStyle::HIDDEN,
                    cell_progress(now.saturating_sub(start)),
                )
            }
        }
    }

    fn cell_rect(&self, cell: &GridCell) -> Rect {
        let side = self.config.grid_size as f32;
        let width = self.bounds.width / side;
        let height = self.bounds.height / side;
        Rect::new(
            self.bounds.x + cell.col as f32 * width,
            self.bounds.y + cell.row as f32 * height,
            width,
            height,
        )
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    pub fn is_overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    pub fn visible_face(&self) -> Face {
        self.face
    }

    pub fn has_pending_phase_timers(&self) -> bool {
        self.timers.is_armed()
    }

    pub fn transition_config(&self) -> &TransitionConfig {
        &self.config
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn permutation(&self) -> &RevealPermutation {
        &self.permutation
    }

    pub fn front(&self) -> &F {
        &self.front
    }

    pub fn front_mut(&mut self) -> &mut F {
        &mut self.front
    }

    pub fn back(&self) -> &B {
        &self.back
    }

    pub fn back_mut(&mut self) -> &mut B {
        &mut self.back
    }
}

fn cell_progress(elapsed: Duration) -> f32 {
    let t = elapsed.as_secs_f64() / CELL_ANIMATION_DURATION.as_secs_f64();
    TimingFunction::EaseOut.evaluate(t) as f32
}

impl<F: Widget, B: Widget, R: Rng> Widget for PixelGridTransition<F, B, R> {
    fn id(&self) -> WidgetId {
        self.widget_id
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.front.set_bounds(bounds);
        self.back.set_bounds(bounds);
    }

    fn mount(&mut self, clock: &mut dyn FrameClock) {
        self.front.mount(clock);
        self.back.mount(clock);
    }

    fn unmount(&mut self, clock: &mut dyn FrameClock) {
        self.timers.cancel(clock);
        clock.cancel_frame(self.widget_id);
        self.phase = TransitionPhase::Idle;
        self.overlay_visible = false;
        self.front.unmount(clock);
        self.back.unmount(clock);
    }

    fn refresh(&mut self, clock: &mut dyn FrameClock) -> ChangeFlags {
        self.front.refresh(clock) | self.back.refresh(clock)
    }

    fn handle_job(&mut self, job: &Job, clock: &mut dyn FrameClock) -> ChangeFlags {
        if job.widget_id != self.widget_id {
            return self.front.handle_job(job, clock) | self.back.handle_job(job, clock);
        }

        match job.job_type {
            JobType::Timer(timer) if self.timers.shrink == Some(timer) => self.on_shrink(),
            JobType::Timer(timer) if self.timers.hide == Some(timer) => self.on_hide(clock),
            JobType::Timer(timer) => {
                log::trace!("Transition {} ignoring stale {:?}", self.widget_id, timer);
                ChangeFlags::empty()
            }
            JobType::Frame => {
                if !self.overlay_visible {
                    return ChangeFlags::empty();
                }
                clock.request_frame(self.widget_id);
                ChangeFlags::NEEDS_PAINT
            }
        }
    }

    fn event(&mut self, event: &Event, clock: &mut dyn FrameClock) -> EventResponse {
        if self.active {
            self.back.event(event, clock)
        } else {
            self.front.event(event, clock)
        }
    }

    fn paint(&self, ctx: &mut PaintContext) {
        match self.face {
            Face::Front => self.front.paint(ctx),
            Face::Back => self.back.paint(ctx),
        }

        if !self.overlay_visible {
            return;
        }

        let now = ctx.now();
        for cell in &self.cells {
            let style = self.cell_style(cell.id, now);
            if !style.is_visible() {
                continue;
            }
            let rect = self.cell_rect(cell).scaled(style.scale);
            ctx.draw_rect(rect, cell.tint.color().with_opacity(style.opacity));
        }
    }
}

impl<F, B, R> std::fmt::Debug for PixelGridTransition<F, B, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelGridTransition")
            .field("widget_id", &self.widget_id)
            .field("config", &self.config)
            .field("active", &self.active)
            .field("phase", &self.phase)
            .field("face", &self.face)
            .field("overlay_visible", &self.overlay_visible)
            .field("timers", &self.timers)
            .finish()
    }
}
