//! # Domain Layer
//!
//! Core types of the deduce registry, free of any wiring logic.
//!
//! ## Module Categories
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Error taxonomy and `Result` alias |
//! | [`ports`] | Type descriptors, constructors and modules |
//! | [`value_objects`] | `Optional`, `Later`, `ConstructorPreference` |
//! | [`constants`] | Key formatting constants |

pub mod constants;
pub mod error;
pub mod ports;
pub mod value_objects;

pub use error::{Error, Result};
pub use ports::{
    Constructor, Describe, Instance, Introspect, Module, TypeDescriptor, TypeKey,
    TypeRegistration, TYPE_REGISTRATIONS,
};
pub use value_objects::{ConstructorPreference, Later, Optional};
