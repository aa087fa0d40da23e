//! Headless metric-card widgets for financial dashboards.
//!
//! Two pieces do the work: [`animation::ValueAnimator`] counts a readout up
//! to its value, and [`widgets::PixelGridTransition`] swaps two contents
//! behind a randomized mosaic. [`widgets::MetricCard`] combines both.
//!
//! All time-driven behaviour goes through an injected [`jobs::FrameClock`].
//! [`App`] drives one from the wall clock and draws into the terminal.

pub mod animation;
pub mod dashboard;
pub mod error;
pub mod jobs;
pub mod navigation;
pub mod reactive;
pub mod renderer;
pub mod widgets;

use std::io::{BufRead, Write};
use std::str::FromStr;
use std::time::{Duration, Instant};

use calloop::channel::{self, Sender};
use calloop::timer::{TimeoutAction, Timer};
use calloop::{EventLoop, LoopSignal};

use dashboard::DashboardSpec;
use jobs::{FrameClock, Scheduler};
use navigation::{nav_items, Role};
use reactive::ChangeFlags;
use renderer::{PaintContext, TerminalRenderer};
use widgets::{
    Color, Event, EventResponse, MetricCard, MetricRow, MouseButton, Rect, Widget,
    DEFAULT_GRID_SIZE, DEFAULT_PHASE_DURATION,
};

pub use error::{Error, Result};

pub mod prelude {
    pub use crate::animation::{AnimationTarget, TimingFunction, ValueAnimator};
    pub use crate::dashboard::{CardSpec, DashboardSpec, RowSpec, SummaryMetrics};
    pub use crate::jobs::{FrameClock, Job, JobType, Scheduler};
    pub use crate::navigation::{nav_items, NavItem, Role};
    pub use crate::reactive::{create_signal, ChangeFlags, IntoMaybeDyn, MaybeDyn, Signal};
    pub use crate::renderer::{PaintContext, TerminalRenderer};
    pub use crate::widgets::{
        metric_card, metric_row, text, Color, Event, EventResponse, Face, MetricCard,
        MetricRow, MetricValue, MouseButton, PixelGridTransition, Rect, Text,
        TransitionConfig, TransitionPhase, Widget,
    };
    pub use crate::{App, AppConfig, Command};
}

/// Rows above the first card line: menu and a blank line
const HEADER_HEIGHT: usize = 2;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Cards per line
    pub columns: usize,
    pub card_width: usize,
    pub card_height: usize,
    pub frame_interval: Duration,
    /// Seed for the card mosaics; entropy when unset
    pub seed: Option<u64>,
    pub grid_size: u32,
    pub phase_duration: Duration,
    pub role: Role,
    pub background_color: Color,
}

impl AppConfig {
    pub fn columns(mut self, columns: usize) -> Self {
        self.columns = columns;
        self
    }

    pub fn card_size(mut self, width: usize, height: usize) -> Self {
        self.card_width = width;
        self.card_height = height;
        self
    }

    pub fn frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn grid_size(mut self, grid_size: u32) -> Self {
        self.grid_size = grid_size;
        self
    }

    pub fn phase_duration(mut self, phase_duration: Duration) -> Self {
        self.phase_duration = phase_duration;
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn background_color(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            columns: 2,
            card_width: 36,
            card_height: 8,
            frame_interval: Duration::from_millis(16),
            seed: None,
            grid_size: DEFAULT_GRID_SIZE,
            phase_duration: DEFAULT_PHASE_DURATION,
            role: Role::User,
            background_color: Color::BLACK,
        }
    }
}

/// Input accepted by [`App::run`], one per line on stdin
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Flip a card's info panel (0-based index)
    Toggle(usize),
    /// Left click at terminal coordinates
    Click { x: f32, y: f32 },
    Quit,
}

impl FromStr for Command {
    type Err = String;

    /// `3` or `toggle 3` flips the third card, `click 35 3` clicks,
    /// `q` or `quit` exits.
    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let card = |word: &str| match word.parse::<usize>() {
            Ok(n) if n > 0 => Ok(Command::Toggle(n - 1)),
            _ => Err(format!("Invalid card number {word:?}")),
        };
        let coord = |word: &str| {
            word.parse::<f32>()
                .map_err(|_| format!("Invalid coordinate {word:?}"))
        };

        match words.as_slice() {
            ["q"] | ["quit"] => Ok(Command::Quit),
            ["toggle" | "t", n] => card(*n),
            [n] => card(*n),
            ["click" | "c", x, y] => Ok(Command::Click {
                x: coord(*x)?,
                y: coord(*y)?,
            }),
            _ => Err(format!("Unknown command {line:?}")),
        }
    }
}

/// Dashboard host: owns the clock, the widgets and the terminal renderer
pub struct App {
    config: AppConfig,
    scheduler: Scheduler,
    cards: Vec<MetricCard>,
    rows: Vec<MetricRow>,
    renderer: TerminalRenderer,
    mounted: bool,
}

impl App {
    pub fn new(dashboard: &DashboardSpec) -> Self {
        Self::with_config(dashboard, AppConfig::default())
    }

    pub fn with_config(dashboard: &DashboardSpec, mut config: AppConfig) -> Self {
        if config.columns == 0 {
            log::warn!("Column count 0 is not drawable, using 1");
            config.columns = 1;
        }

        let cards = dashboard
            .build_cards()
            .into_iter()
            .enumerate()
            .map(|(i, card)| {
                let card = card
                    .grid_size(config.grid_size)
                    .phase_duration(config.phase_duration);
                match config.seed {
                    Some(seed) => card.seed(seed.wrapping_add(i as u64)),
                    None => card,
                }
            })
            .collect();

        let mut app = Self {
            renderer: TerminalRenderer::new(0, 0, config.background_color),
            config,
            scheduler: Scheduler::new(),
            cards,
            rows: dashboard.build_rows(),
            mounted: false,
        };
        app.layout();
        app
    }

    fn card_lines(&self) -> usize {
        self.cards.len().div_ceil(self.config.columns)
    }

    fn layout(&mut self) {
        let columns = self.config.columns;
        let (card_width, card_height) = (self.config.card_width, self.config.card_height);

        for (i, card) in self.cards.iter_mut().enumerate() {
            let x = (i % columns) * card_width;
            let y = HEADER_HEIGHT + (i / columns) * card_height;
            card.set_bounds(Rect::new(
                x as f32,
                y as f32,
                card_width as f32,
                card_height as f32,
            ));
        }

        let rows_top = HEADER_HEIGHT + self.card_lines() * card_height + 1;
        let row_width = (columns * card_width).saturating_sub(2);
        for (i, row) in self.rows.iter_mut().enumerate() {
            row.set_bounds(Rect::new(1.0, (rows_top + i) as f32, row_width as f32, 1.0));
        }

        let (width, height) = self.size();
        self.renderer.set_size(width, height);
    }

    /// Terminal size needed to draw everything
    pub fn size(&self) -> (usize, usize) {
        let width = self.config.columns * self.config.card_width;
        let mut height = HEADER_HEIGHT + self.card_lines() * self.config.card_height;
        if !self.rows.is_empty() {
            height += 1 + self.rows.len();
        }
        (width, height)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn cards(&self) -> &[MetricCard] {
        &self.cards
    }

    pub fn rows(&self) -> &[MetricRow] {
        &self.rows
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// No animation or transition is in flight
    pub fn is_idle(&self) -> bool {
        !self.scheduler.has_pending_jobs()
    }

    fn mount(&mut self) {
        log::info!(
            "Mounting {} cards and {} rows at {:?}",
            self.cards.len(),
            self.rows.len(),
            self.scheduler.now()
        );
        for card in &mut self.cards {
            card.mount(&mut self.scheduler);
        }
        for row in &mut self.rows {
            row.mount(&mut self.scheduler);
        }
        self.mounted = true;
    }

    /// Advance to `now` and deliver every due job. The first call mounts
    /// the widgets. Returns what changed.
    pub fn pump(&mut self, now: Duration) -> ChangeFlags {
        self.scheduler.advance_to(now);
        if !self.mounted {
            self.mount();
        }

        let mut flags = ChangeFlags::empty();
        for card in &mut self.cards {
            flags |= card.refresh(&mut self.scheduler);
        }
        for row in &mut self.rows {
            flags |= row.refresh(&mut self.scheduler);
        }

        while let Some(job) = self.scheduler.next_job() {
            for card in &mut self.cards {
                flags |= card.handle_job(&job, &mut self.scheduler);
            }
            for row in &mut self.rows {
                flags |= row.handle_job(&job, &mut self.scheduler);
            }
        }
        flags
    }

    /// Flip the info panel of one card. False if there is no such card or
    /// it has no info text.
    pub fn toggle_card(&mut self, index: usize) -> bool {
        match self.cards.get_mut(index) {
            Some(card) => card.toggle(&mut self.scheduler),
            None => {
                log::warn!("No card {} (have {})", index + 1, self.cards.len());
                false
            }
        }
    }

    /// Left click in terminal coordinates
    pub fn click(&mut self, x: f32, y: f32) -> EventResponse {
        let event = Event::MouseDown {
            x,
            y,
            button: MouseButton::Left,
        };
        for card in &mut self.cards {
            if card.bounds().contains(x, y) {
                return card.event(&event, &mut self.scheduler);
            }
        }
        EventResponse::Ignored
    }

    pub fn paint(&self) -> PaintContext {
        let mut ctx = PaintContext::new(self.scheduler.now());

        let menu = nav_items(self.config.role)
            .iter()
            .map(|item| item.name)
            .collect::<Vec<_>>()
            .join(" | ");
        let (width, _) = self.size();
        ctx.draw_text(&menu, Rect::new(1.0, 0.0, width as f32, 1.0), Color::WHITE);

        for card in &self.cards {
            card.paint(&mut ctx);
        }
        for row in &self.rows {
            row.paint(&mut ctx);
        }
        ctx
    }

    pub fn render_to_string(&self) -> String {
        self.renderer.render_to_string(&self.paint())
    }

    /// Run until `quit`, or until stdin closes and everything has settled.
    pub fn run(self) -> Result<()> {
        let mut event_loop: EventLoop<RunState> = EventLoop::try_new()?;
        let handle = event_loop.handle();

        let (sender, commands) = channel::channel();
        spawn_input_reader(sender)?;

        handle
            .insert_source(commands, |event, _, state: &mut RunState| match event {
                channel::Event::Msg(command) => state.apply(command),
                channel::Event::Closed => {
                    log::info!("Input closed");
                    state.input_closed = true;
                }
            })
            .map_err(|err| err.error)?;

        let interval = self.config.frame_interval;
        handle
            .insert_source(Timer::immediate(), move |_, _, state: &mut RunState| {
                state.frame();
                TimeoutAction::ToDuration(interval)
            })
            .map_err(|err| err.error)?;

        log::info!(
            "Starting dashboard, {}x{} cells, frame every {:?}",
            self.size().0,
            self.size().1,
            interval
        );
        let mut state = RunState {
            app: self,
            origin: Instant::now(),
            signal: event_loop.get_signal(),
            input_closed: false,
            last_frame: None,
        };
        event_loop.run(None, &mut state, |_| {})?;
        log::info!("Dashboard stopped");
        Ok(())
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("cards", &self.cards.len())
            .field("rows", &self.rows.len())
            .field("mounted", &self.mounted)
            .finish()
    }
}

struct RunState {
    app: App,
    origin: Instant,
    signal: LoopSignal,
    input_closed: bool,
    last_frame: Option<String>,
}

impl RunState {
    fn apply(&mut self, command: Command) {
        log::debug!("Command {command:?}");
        match command {
            Command::Toggle(index) => {
                self.app.toggle_card(index);
            }
            Command::Click { x, y } => {
                self.app.click(x, y);
            }
            Command::Quit => self.signal.stop(),
        }
    }

    fn frame(&mut self) {
        self.app.pump(self.origin.elapsed());

        let frame = self.app.render_to_string();
        if self.last_frame.as_deref() != Some(frame.as_str()) {
            let mut out = std::io::stdout().lock();
            let written = writeln!(out, "\x1b[2J\x1b[H{frame}").and_then(|_| out.flush());
            if let Err(err) = written {
                log::error!("Failed to write frame: {err}");
                self.signal.stop();
            }
            self.last_frame = Some(frame);
        }

        if self.input_closed && self.app.is_idle() {
            self.signal.stop();
        }
    }
}

fn spawn_input_reader(sender: Sender<Command>) -> Result<()> {
    std::thread::Builder::new()
        .name("mosaic-input".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(command) => {
                        if sender.send(command).is_err() {
                            break;
                        }
                    }
                    Err(err) => log::warn!("{err}"),
                }
            }
        })?;
    Ok(())
}
