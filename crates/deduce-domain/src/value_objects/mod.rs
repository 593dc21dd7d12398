//! Value Objects
//!
//! Small immutable or single-assignment values used throughout the registry.

pub mod later;
pub mod optional;
pub mod preference;

pub use later::Later;
pub use optional::Optional;
pub use preference::ConstructorPreference;
