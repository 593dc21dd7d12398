//! Deferred single-assignment value
//!
//! [`Later`] holds either a ready value or the function that will produce it
//! on first access. Forcing is interlocked, so concurrent first accesses run
//! the function once.

use std::fmt;

use once_cell::sync::Lazy;

type Init<T> = Box<dyn FnOnce() -> T + Send>;

/// Value computed on first access and cached afterwards
pub struct Later<T> {
    cell: Lazy<T, Init<T>>,
}

impl<T> Later<T> {
    /// Defer `init` until the first call to [`Later::value`]
    pub fn new<F>(init: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        Self {
            cell: Lazy::new(Box::new(init)),
        }
    }

    /// Wrap an already computed value; no function is ever called
    pub fn ready(value: T) -> Self
    where
        T: Send + 'static,
    {
        let later = Self::new(move || value);
        Lazy::force(&later.cell);
        later
    }

    /// The value, computing it on first access
    pub fn value(&self) -> &T {
        Lazy::force(&self.cell)
    }

    /// The value if it was already computed
    pub fn get(&self) -> Option<&T> {
        Lazy::get(&self.cell)
    }

    /// Whether the value was already computed
    pub fn is_ready(&self) -> bool {
        self.get().is_some()
    }
}

impl<T: fmt::Debug> fmt::Debug for Later<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(value) => f.debug_tuple("Later").field(value).finish(),
            None => f.write_str("Later(<pending>)"),
        }
    }
}
