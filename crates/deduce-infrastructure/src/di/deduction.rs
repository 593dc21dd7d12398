//! Deductions
//!
//! A [`Deduction`] pairs a concrete cause type with the concrete result type
//! sharing its pairing key. The [`DeductionIndex`] stores each deduction under
//! three [`DeductionKey`]s so it can be found at any mix of concrete and
//! family granularity:
//!
//! | Key | Used by |
//! |-----|---------|
//! | `FooCause -> FooResult` | both directions, fully concrete |
//! | `FooCause -> dyn Result` | `induce` from a cause |
//! | `dyn Cause -> FooResult` | `suggest` from a result |
//!
//! Insertion is first-write-wins; nothing is ever overwritten.

use std::fmt;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use deduce_domain::constants::CAUSE_RESULT_CONNECTOR;
use deduce_domain::error::Result;
use deduce_domain::ports::{TypeDescriptor, TypeKey};

use super::container::Container;
use super::dependency::Dependency;

/// Composite (cause, result) lookup key
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct DeductionKey {
    cause: TypeKey,
    result: TypeKey,
}

impl DeductionKey {
    /// Key for `cause -> result`
    pub fn new(cause: TypeKey, result: TypeKey) -> Self {
        Self { cause, result }
    }

    /// Cause side of the key
    pub fn cause(&self) -> TypeKey {
        self.cause
    }

    /// Result side of the key
    pub fn result(&self) -> TypeKey {
        self.result
    }
}

impl fmt::Display for DeductionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.cause, CAUSE_RESULT_CONNECTOR, self.result)
    }
}

/// Stored pairing between a cause type and a result type
#[derive(Clone, Debug)]
pub struct Deduction {
    dependency: Dependency,
    cause_family: TypeKey,
    result_family: TypeKey,
    key: String,
}

impl Deduction {
    /// Pair `cause` (of `cause_family`) with `result` (of `result_family`)
    pub fn new(
        cause: Arc<TypeDescriptor>,
        result: Arc<TypeDescriptor>,
        cause_family: TypeKey,
        result_family: TypeKey,
        key: impl Into<String>,
    ) -> Self {
        Self {
            dependency: Dependency::new(result, cause),
            cause_family,
            result_family,
            key: key.into(),
        }
    }

    /// Concrete cause type
    pub fn cause(&self) -> &Arc<TypeDescriptor> {
        self.dependency.supplier()
    }

    /// Concrete result type
    pub fn result(&self) -> &Arc<TypeDescriptor> {
        self.dependency.consumer()
    }

    /// Family the cause was discovered under
    pub fn cause_family(&self) -> TypeKey {
        self.cause_family
    }

    /// Family the result was discovered under
    pub fn result_family(&self) -> TypeKey {
        self.result_family
    }

    /// Pairing key shared by both types
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Underlying (result, cause) dependency
    pub fn dependency(&self) -> &Dependency {
        &self.dependency
    }

    /// `cause -> result` with both concrete types
    pub fn concrete_key(&self) -> DeductionKey {
        DeductionKey::new(self.cause().key(), self.result().key())
    }

    /// `cause -> result family`
    pub fn cause_key(&self) -> DeductionKey {
        DeductionKey::new(self.cause().key(), self.result_family)
    }

    /// `cause family -> result`
    pub fn result_key(&self) -> DeductionKey {
        DeductionKey::new(self.cause_family, self.result().key())
    }

    /// Produce the result through `container`, as `R`
    pub fn induce<R>(&self, container: &Container) -> Result<Option<Arc<R>>>
    where
        R: ?Sized + Send + Sync + 'static,
    {
        self.dependency.induce(container)
    }

    /// Produce the cause through `container`, as `C`
    pub fn suggest<C>(&self, container: &Container) -> Result<Option<Arc<C>>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.dependency.suggest(container)
    }
}

impl fmt::Display for Deduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.concrete_key(), f)
    }
}

/// Deductions by composite key
#[derive(Default)]
pub struct DeductionIndex {
    entries: DashMap<DeductionKey, Arc<Deduction>>,
}

impl DeductionIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `deduction` under `key` unless the key is taken
    ///
    /// Returns whether the deduction was stored.
    pub fn insert_if_absent(&self, key: DeductionKey, deduction: &Arc<Deduction>) -> bool {
        match self.entries.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(Arc::clone(deduction));
                true
            }
        }
    }

    /// Deduction stored under `key`
    pub fn get(&self, key: &DeductionKey) -> Option<Arc<Deduction>> {
        self.entries.get(key).map(|entry| Arc::clone(entry.value()))
    }

    /// Whether `key` is taken
    pub fn contains(&self, key: &DeductionKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Every stored key, ordered by type names
    pub fn keys(&self) -> Vec<DeductionKey> {
        let mut keys: Vec<DeductionKey> = self.entries.iter().map(|e| *e.key()).collect();
        keys.sort();
        keys
    }

    /// Number of stored keys (up to three per deduction)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn clear(&self) {
        self.entries.clear();
    }
}
