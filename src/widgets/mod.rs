pub mod metric_card;
pub mod metric_row;
pub mod pixel_grid;
pub mod text;
pub mod widget;

pub use metric_card::{
    format_grouped, metric_card, CardViewState, InfoFace, MetricCard, MetricValue, StatsFace,
};
pub use metric_row::{metric_row, MetricRow};
pub use pixel_grid::{
    generate_cells, CellStyle, ColorToken, Face, GridCell, PixelGridTransition,
    RevealPermutation, TransitionConfig, TransitionPhase, CELL_ANIMATION_DURATION,
    DEFAULT_GRID_SIZE, DEFAULT_PHASE_DURATION,
};
pub use text::{text, Text};
pub use widget::{Color, Event, EventResponse, MouseButton, Rect, Widget};

