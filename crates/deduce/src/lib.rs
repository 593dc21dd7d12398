//! # deduce
//!
//! A type-keyed dependency resolution registry.
//!
//! Services are registered as fixed instances, factories or implementation
//! types, then resolved by type. Unregistered services can be discovered by
//! scanning [`Module`]s, and whole type families can be paired up so that an
//! instance of one family leads to its counterpart in the other.
//!
//! ## Example
//!
//! ```ignore
//! use deduce::prelude::*;
//!
//! let container = Container::new();
//! container.register_instance::<dyn Clock>(Arc::new(SystemClock));
//!
//! let clock = container.resolve::<dyn Clock>(&[])?.expect("registered");
//! ```
//!
//! ## Architecture
//!
//! - `domain` - Type descriptors, modules, value objects and errors
//! - `infrastructure` - Container, deductions, configuration and logging

/// Domain layer - type descriptors, modules and errors
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use deduce_domain::*;
}

/// Infrastructure layer - container, configuration and logging
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use deduce_infrastructure::*;
}

// Re-export commonly used domain types at the crate root
pub use domain::*;

// Re-export the container and its configuration at the crate root
pub use infrastructure::di::{Deduction, DeductionKey, Dependency, LeadingWord};
pub use infrastructure::logging::init_logging;
pub use infrastructure::{ConfigLoader, Container, ContainerConfig, LoggingConfig};

/// Everything needed to describe, register and resolve types
pub mod prelude {
    pub use std::sync::Arc;

    pub use deduce_domain::ports::{
        Constructor, Describe, Instance, Introspect, Module, TypeDescriptor, TypeKey,
    };
    pub use deduce_domain::value_objects::{ConstructorPreference, Later, Optional};
    pub use deduce_domain::{Error, Result};
    pub use deduce_infrastructure::Container;
}
