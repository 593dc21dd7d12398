//! Value-or-absence container
//!
//! Thin wrapper over [`Option`] whose accessor fails with
//! [`Error::InvalidState`] instead of panicking when the value is absent.

use crate::error::{Error, Result};

/// A value that may or may not be present
///
/// Absence is the default state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Optional<T>(Option<T>);

impl<T> Optional<T> {
    /// An absent value
    pub const fn empty() -> Self {
        Self(None)
    }

    /// A present value
    pub const fn of(value: T) -> Self {
        Self(Some(value))
    }

    /// Whether a value is present
    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }

    /// The present value, or [`Error::InvalidState`]
    pub fn value(&self) -> Result<&T> {
        self.0
            .as_ref()
            .ok_or_else(|| Error::invalid_state("no value present"))
    }

    /// The present value, or `other`
    pub fn or_else(self, other: T) -> T {
        self.0.unwrap_or(other)
    }

    /// Replace the content, returning the previous one
    pub fn replace(&mut self, value: T) -> Self {
        Self(self.0.replace(value))
    }

    /// Borrow as a standard option
    pub fn as_option(&self) -> Option<&T> {
        self.0.as_ref()
    }

    /// Convert into a standard option
    pub fn into_option(self) -> Option<T> {
        self.0
    }
}

impl<T> Default for Optional<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> From<Option<T>> for Optional<T> {
    fn from(value: Option<T>) -> Self {
        Self(value)
    }
}

impl<T> From<Optional<T>> for Option<T> {
    fn from(value: Optional<T>) -> Self {
        value.0
    }
}
