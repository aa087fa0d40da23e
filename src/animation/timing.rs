//! Timing functions (easing curves) for animations.
//!
//! A timing function maps normalized elapsed time in `[0, 1]` to visual
//! progress. Readouts use [`TimingFunction::EaseOutExpo`], which lands on
//! exactly `1.0` at the end instead of only approaching it.
//!
//! ## Example
//!
//! ```
//! use mosaic::animation::TimingFunction;
//!
//! let eased = TimingFunction::EaseOutExpo.evaluate(0.5);
//! assert_eq!(eased, 0.96875);
//! ```

use std::sync::Arc;

/// Timing function that controls the animation curve
#[derive(Clone, Default)]
pub enum TimingFunction {
    /// Linear interpolation (constant speed)
    Linear,
    /// Starts fast, ends slow
    EaseOut,
    /// Exponential ease-out: `1 - 2^(-10 t)`, exactly 1 at `t = 1`
    #[default]
    EaseOutExpo,
    /// Custom timing function
    Custom(Arc<dyn Fn(f64) -> f64 + Send + Sync>),
}

impl TimingFunction {
    /// Evaluate the timing function at time t (0.0 to 1.0).
    /// Inputs outside that range are clamped.
    pub fn evaluate(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            TimingFunction::Linear => t,
            TimingFunction::EaseOut => ease_out(t),
            TimingFunction::EaseOutExpo => ease_out_expo(t),
            TimingFunction::Custom(f) => f(t),
        }
    }

    /// Create a custom timing function from a closure
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        TimingFunction::Custom(Arc::new(f))
    }
}

impl std::fmt::Debug for TimingFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimingFunction::Linear => write!(f, "Linear"),
            TimingFunction::EaseOut => write!(f, "EaseOut"),
            TimingFunction::EaseOutExpo => write!(f, "EaseOutExpo"),
            TimingFunction::Custom(_) => write!(f, "Custom"),
        }
    }
}

// Easing functions

fn ease_out(t: f64) -> f64 {
    t * (2.0 - t)
}

fn ease_out_expo(t: f64) -> f64 {
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2f64.powf(-10.0 * t)
    }
}
