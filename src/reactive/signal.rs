use std::cell::RefCell;
use std::rc::Rc;

/// A shared, observable value.
///
/// Widgets do not subscribe to signals. A widget property built from a
/// signal (see [`MaybeDyn`](super::MaybeDyn)) re-reads it whenever the
/// widget refreshes its inputs, which happens once per frame. The version
/// counter lets callers skip work when nothing was written.
pub struct Signal<T> {
    inner: Rc<SignalInner<T>>,
}

struct SignalInner<T> {
    value: RefCell<T>,
    version: std::cell::Cell<u64>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Signal<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(SignalInner {
                value: RefCell::new(value),
                version: std::cell::Cell::new(0),
            }),
        }
    }

    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.inner.value.borrow())
    }

    /// Number of effective writes so far
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    fn bump(&self) {
        self.inner.version.set(self.inner.version.get() + 1);
    }
}

impl<T: Clone> Signal<T> {
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }
}

impl<T: PartialEq> Signal<T> {
    /// Sets the signal's value, only bumping the version if the value actually changed.
    pub fn set(&self, value: T) {
        let mut guard = self.inner.value.borrow_mut();
        if *guard != value {
            *guard = value;
            drop(guard);
            self.bump();
        }
    }
}

impl<T: PartialEq + Clone> Signal<T> {
    /// Updates the signal's value using a closure, only bumping the version if the value changed.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        let mut guard = self.inner.value.borrow_mut();
        let old_value = guard.clone();
        f(&mut guard);
        if *guard != old_value {
            drop(guard);
            self.bump();
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("value", &*self.inner.value.borrow())
            .field("version", &self.version())
            .finish()
    }
}

pub fn create_signal<T>(value: T) -> Signal<T> {
    Signal::new(value)
}
