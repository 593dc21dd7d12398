//! Container configuration

use deduce_domain::value_objects::ConstructorPreference;
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;

/// Settings applied by a [`Container`](crate::di::Container)
///
/// ```toml
/// constructor_preference = "most_resolvable_preferred"
/// reuse_by_default = false
///
/// [logging]
/// level = "debug"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Constructor selection policy used when auto-registering from modules
    pub constructor_preference: ConstructorPreference,

    /// Reuse policy of producers created by auto-registration on `resolve`
    ///
    /// `true` keeps the first constructed instance (lazy singleton), `false`
    /// constructs on every resolution.
    pub reuse_by_default: bool,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            constructor_preference: ConstructorPreference::default(),
            reuse_by_default: true,
            logging: LoggingConfig::default(),
        }
    }
}
