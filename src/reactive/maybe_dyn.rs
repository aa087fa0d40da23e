use std::rc::Rc;

use super::signal::Signal;

/// A widget input: a fixed value, or a getter re-read on every refresh.
pub enum MaybeDyn<T: 'static> {
    Static(T),
    Dynamic(Rc<dyn Fn() -> T>),
}

impl<T: Clone + 'static> MaybeDyn<T> {
    /// Current value
    pub fn get(&self) -> T {
        match self {
            MaybeDyn::Static(v) => v.clone(),
            MaybeDyn::Dynamic(getter) => getter(),
        }
    }

    pub fn fixed(value: T) -> Self {
        MaybeDyn::Static(value)
    }

    pub fn dynamic<F: Fn() -> T + 'static>(f: F) -> Self {
        MaybeDyn::Dynamic(Rc::new(f))
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, MaybeDyn::Dynamic(_))
    }
}

impl<T: Clone + 'static> Clone for MaybeDyn<T> {
    fn clone(&self) -> Self {
        match self {
            MaybeDyn::Static(v) => MaybeDyn::Static(v.clone()),
            MaybeDyn::Dynamic(getter) => MaybeDyn::Dynamic(getter.clone()),
        }
    }
}

impl<T: std::fmt::Debug + 'static> std::fmt::Debug for MaybeDyn<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaybeDyn::Static(v) => f.debug_tuple("Static").field(v).finish(),
            MaybeDyn::Dynamic(_) => write!(f, "Dynamic"),
        }
    }
}

/// Accepted by widget builders wherever an input may change over time
pub trait IntoMaybeDyn<T: Clone + 'static> {
    fn into_maybe_dyn(self) -> MaybeDyn<T>;
}

// One impl per plain input type; a blanket impl would overlap the closure impl
impl IntoMaybeDyn<String> for String {
    fn into_maybe_dyn(self) -> MaybeDyn<String> {
        MaybeDyn::Static(self)
    }
}

impl IntoMaybeDyn<String> for &str {
    fn into_maybe_dyn(self) -> MaybeDyn<String> {
        MaybeDyn::Static(self.to_string())
    }
}

impl IntoMaybeDyn<f64> for f64 {
    fn into_maybe_dyn(self) -> MaybeDyn<f64> {
        MaybeDyn::Static(self)
    }
}

impl<T, F> IntoMaybeDyn<T> for F
where
    T: Clone + 'static,
    F: Fn() -> T + 'static,
{
    fn into_maybe_dyn(self) -> MaybeDyn<T> {
        MaybeDyn::Dynamic(Rc::new(self))
    }
}

impl<T: Clone + 'static> IntoMaybeDyn<T> for Signal<T> {
    fn into_maybe_dyn(self) -> MaybeDyn<T> {
        MaybeDyn::Dynamic(Rc::new(move || self.get()))
    }
}

impl<T: Clone + 'static> IntoMaybeDyn<T> for MaybeDyn<T> {
    fn into_maybe_dyn(self) -> MaybeDyn<T> {
        self
    }
}
