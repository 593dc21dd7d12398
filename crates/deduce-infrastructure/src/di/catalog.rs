//! Type Catalog
//!
//! Memoized discovery over [`Module`]s:
//!
//! - `concrete_types(module)`: the module's constructible types,
//! - `assignable_types(target, module)`: the subset usable as `target`.
//!
//! Both caches are keyed by module identity ([`Module::id`]), populated on
//! first query and never invalidated. Each entry is a [`Later`] inserted under the map entry and
//! forced after the entry guard is released, so a computation runs once even
//! when several threads ask for the same key.

use std::sync::Arc;

use dashmap::DashMap;
use deduce_domain::ports::{Module, TypeDescriptor, TypeKey};
use deduce_domain::value_objects::Later;
use tracing::trace;

type Descriptors = Vec<Arc<TypeDescriptor>>;
type Entry = Arc<Later<Descriptors>>;

/// Memoized module scans
#[derive(Default)]
pub struct TypeCatalog {
    concrete: DashMap<u64, Entry>,
    assignable: DashMap<(TypeKey, u64), Entry>,
}

impl TypeCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Concrete types declared by `module`, in module order
    pub fn concrete_types(&self, module: &Module) -> Descriptors {
        self.concrete_entry(module).value().clone()
    }

    /// Concrete types of `module` assignable to `target`, in module order
    pub fn assignable_types(&self, target: TypeKey, module: &Module) -> Descriptors {
        let concrete = self.concrete_entry(module);
        let entry = self
            .assignable
            .entry((target, module.id()))
            .or_insert_with(|| {
                Arc::new(Later::new(move || {
                    concrete
                        .value()
                        .iter()
                        .filter(|t| t.is_assignable_to(target))
                        .cloned()
                        .collect()
                }))
            })
            .clone();
        entry.value().clone()
    }

    /// Number of modules scanned so far
    pub fn module_count(&self) -> usize {
        self.concrete.len()
    }

    /// Number of `(target, module)` pairs queried so far
    pub fn assignable_count(&self) -> usize {
        self.assignable.len()
    }

    fn concrete_entry(&self, module: &Module) -> Entry {
        self.concrete
            .entry(module.id())
            .or_insert_with(|| {
                let module = module.clone();
                Arc::new(Later::new(move || {
                    trace!(module = module.name(), "scanning concrete types");
                    module
                        .types()
                        .iter()
                        .filter(|t| t.is_concrete())
                        .cloned()
                        .collect()
                }))
            })
            .clone()
    }
}
