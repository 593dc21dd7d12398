//! Modules
//!
//! A [`Module`] is a named, immutable catalog of type descriptors: the unit
//! the registry scans when auto-registering or binding type families.
//!
//! Modules are either assembled explicitly with [`Module::builder`], or
//! collected from link-time registrations. Any crate can contribute a type to
//! a named module by submitting a [`TypeRegistration`] to the
//! [`TYPE_REGISTRATIONS`] distributed slice:
//!
//! ```ignore
//! use deduce_domain::ports::{TypeRegistration, TYPE_REGISTRATIONS};
//!
//! #[linkme::distributed_slice(TYPE_REGISTRATIONS)]
//! static GADGET: TypeRegistration = TypeRegistration {
//!     module: "widgets",
//!     describe: <Gadget as Describe>::describe,
//! };
//!
//! let widgets = Module::linked("widgets");
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::ports::descriptor::{Describe, TypeDescriptor, TypeKey};

static NEXT_MODULE_ID: AtomicU64 = AtomicU64::new(0);

fn next_module_id() -> u64 {
    NEXT_MODULE_ID.fetch_add(1, Ordering::Relaxed)
}

/// Named catalog of type descriptors
///
/// Cheap to clone. Clones share the identity of the module they were cloned
/// from; separately built modules are distinct even when their names match.
#[derive(Clone)]
pub struct Module {
    id: u64,
    name: Arc<str>,
    types: Arc<[Arc<TypeDescriptor>]>,
}

impl Module {
    /// Start building a module
    pub fn builder(name: impl Into<String>) -> ModuleBuilder {
        ModuleBuilder {
            name: name.into(),
            types: Vec::new(),
        }
    }

    /// Collect every link-time registration submitted for `name`
    ///
    /// Registrations are ordered by type name so the result does not depend
    /// on link order.
    pub fn linked(name: &str) -> Self {
        let mut types: Vec<TypeDescriptor> = TYPE_REGISTRATIONS
            .iter()
            .filter(|r| r.module == name)
            .map(|r| (r.describe)())
            .collect();
        types.sort_by_key(|t| t.key());
        types.dedup_by_key(|t| t.key());

        Self {
            id: next_module_id(),
            name: Arc::from(name),
            types: types.into_iter().map(Arc::new).collect(),
        }
    }

    /// Identity of this module, shared by its clones
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Module name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every described type, abstract ones included
    pub fn types(&self) -> &[Arc<TypeDescriptor>] {
        &self.types
    }

    /// Look up the descriptor of a type declared in this module
    pub fn find(&self, key: TypeKey) -> Option<&Arc<TypeDescriptor>> {
        self.types.iter().find(|t| t.key() == key)
    }

    /// Number of described types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the module describes no types
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("types", &self.types.iter().map(|t| t.key()).collect::<Vec<_>>())
            .finish()
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Builder for [`Module`]
pub struct ModuleBuilder {
    name: String,
    types: Vec<Arc<TypeDescriptor>>,
}

impl ModuleBuilder {
    /// Add a descriptor
    ///
    /// A later descriptor for an already declared type replaces the earlier one.
    pub fn with(mut self, descriptor: TypeDescriptor) -> Self {
        self.types.retain(|t| t.key() != descriptor.key());
        self.types.push(Arc::new(descriptor));
        self
    }

    /// Add a self-describing type
    pub fn with_type<T: Describe + ?Sized>(self) -> Self {
        self.with(T::describe())
    }

    /// Finish the module
    pub fn build(self) -> Module {
        Module {
            id: next_module_id(),
            name: Arc::from(self.name),
            types: self.types.into(),
        }
    }
}

// ============================================================================
// Link-time registrations
// ============================================================================

/// Registry entry contributing one type to a named module
///
/// Submitted with `#[linkme::distributed_slice(TYPE_REGISTRATIONS)]`.
pub struct TypeRegistration {
    /// Name of the module the type belongs to
    pub module: &'static str,
    /// Descriptor factory
    pub describe: fn() -> TypeDescriptor,
}

// Auto-collection via linkme distributed slices - types submit entries at compile time
#[linkme::distributed_slice]
pub static TYPE_REGISTRATIONS: [TypeRegistration] = [..];

/// List the names of all modules that received link-time registrations
pub fn list_linked_modules() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = TYPE_REGISTRATIONS.iter().map(|r| r.module).collect();
    names.sort_unstable();
    names.dedup();
    names
}
