pub mod invalidation;
pub mod maybe_dyn;
pub mod signal;

pub use invalidation::{ChangeFlags, WidgetId};
pub use maybe_dyn::{IntoMaybeDyn, MaybeDyn};
pub use signal::{create_signal, Signal};
