//! Time-based animation primitives.
//!
//! [`ValueAnimator`] counts a number up to its target; [`TimingFunction`]
//! supplies the easing curve and [`Animatable`] the interpolation used by
//! the mosaic cells.

mod animatable;
mod timing;
mod value;

pub use animatable::Animatable;
pub use timing::TimingFunction;
pub use value::{AnimationTarget, AnimatorRunState, ValueAnimator, VALUE_ANIMATION_DURATION};
