//! # Infrastructure Layer
//!
//! The resolution engine plus the technical concerns around it.
//!
//! ## Module Categories
//!
//! ### Resolution
//! | Module | Description |
//! |--------|-------------|
//! | [`di`] | Container, producers, constructor selection, deductions |
//!
//! ### Configuration
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Figment-based configuration loading |
//! | [`constants`] | Centralized configuration constants |
//! | [`error_ext`] | Context conversion into domain errors |
//!
//! ### Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`logging`] | Structured logging with tracing |

pub mod config;
pub mod constants;
pub mod di;
pub mod error_ext;
pub mod logging;

// Re-export commonly used types
pub use config::{ConfigLoader, ContainerConfig, LoggingConfig};
pub use di::Container;
pub use error_ext::ErrorContext;
