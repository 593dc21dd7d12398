//! Domain layer constants
//!
//! Infrastructure-specific constants live in `deduce_infrastructure::constants`.

// ============================================================================
// KEY FORMATTING CONSTANTS
// ============================================================================

/// Connector between cause and result in a rendered deduction key
pub const CAUSE_RESULT_CONNECTOR: &str = "->";

/// Connector between consumer and supplier in a rendered dependency
pub const CONSUME_INDICATOR: &str = "->";

/// Separator between path segments in a Rust type name
pub const TYPE_PATH_SEPARATOR: &str = "::";

/// Prefix rustc puts in front of trait object type names
pub const TRAIT_OBJECT_PREFIX: &str = "dyn ";

// ============================================================================
// CONSTRUCTOR CONSTANTS
// ============================================================================

/// Largest constructor arity supported by typed constructor registration
pub const MAX_CONSTRUCTOR_ARITY: usize = 6;
