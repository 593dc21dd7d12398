//! Infrastructure layer constants
//!
//! Contains constants that are part of the infrastructure implementation.
//! Domain-specific constants are defined in `deduce_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "deduce.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "deduce";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "DEDUCE";

/// Separator between nested keys in environment variable names
///
/// `DEDUCE_LOGGING__LEVEL` sets `logging.level`.
pub const CONFIG_ENV_NESTING_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the log filter
pub const LOG_ENV_FILTER: &str = "DEDUCE_LOG";

/// File stem used for rolling log files when none can be derived
pub const DEFAULT_LOG_FILE_STEM: &str = "deduce";

// ============================================================================
// RESOLUTION CONSTANTS
// ============================================================================

/// Placeholder rendered for a factory that has not constructed anything yet,
/// or whose implementation type is unknown
pub const UNBUILT_PLACEHOLDER: &str = "?";
