//! Domain Port Interfaces
//!
//! Contracts the registry consumes from the outside world:
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`descriptor`] | Type identity, assignability and upcasts |
//! | [`constructor`] | Constructor parameters and invocation |
//! | [`module`] | Named catalogs of descriptors and link-time registration |

pub mod constructor;
pub mod descriptor;
pub mod module;

pub use constructor::{Constructor, Factory};
pub use descriptor::{
    Assignment, DescriptorBuilder, Describe, Instance, Introspect, TypeDescriptor, TypeKey,
    TypeKind, Visibility, downcast, erase, instance_as,
};
pub use module::{Module, ModuleBuilder, TYPE_REGISTRATIONS, TypeRegistration, list_linked_modules};
