//! Configuration types module

pub mod container;
pub mod logging;

// Re-export main types
pub use container::ContainerConfig;
pub use logging::LoggingConfig;
