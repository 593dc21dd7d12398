//! Constructor preference

use serde::{Deserialize, Serialize};
use std::fmt;

/// Policy for picking one constructor among the candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructorPreference {
    /// First candidate in declaration order
    FirstPreferred,
    /// Candidate with the fewest parameters
    #[default]
    LeastResolvablePreferred,
    /// Candidate with the most parameters
    MostResolvablePreferred,
}

impl fmt::Display for ConstructorPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FirstPreferred => "first_preferred",
            Self::LeastResolvablePreferred => "least_resolvable_preferred",
            Self::MostResolvablePreferred => "most_resolvable_preferred",
        };
        f.write_str(name)
    }
}
