//! Error handling types

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the deduce registry
///
/// "Not found" is never an error here: lookups that find nothing return
/// `Ok(None)`. These variants describe failed construction attempts and
/// structural misconfiguration.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid argument provided to a function
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument
        message: String,
    },

    /// Auto-wiring was requested for an abstract type
    #[error("Unsupported type: {type_name} is abstract and cannot be constructed")]
    UnsupportedType {
        /// Name of the rejected type
        type_name: String,
    },

    /// A concrete type exposes no public constructor
    #[error("No public constructor: {type_name}")]
    NoPublicConstructor {
        /// Name of the type without public constructors
        type_name: String,
    },

    /// More than one equally valid candidate was found
    #[error("Ambiguous candidates for {service}: {}", candidates.join(", "))]
    AmbiguousCandidates {
        /// The requested service or pairing key
        service: String,
        /// The conflicting type names
        candidates: Vec<String>,
    },

    /// An implementation does not declare the requested service
    #[error("Not assignable: {implementation} does not implement {service}")]
    NotAssignable {
        /// The implementation type name
        implementation: String,
        /// The requested service type name
        service: String,
    },

    /// A constructor parameter could not be resolved
    #[error("Unresolved dependency: {dependency} required by {service}")]
    UnresolvedDependency {
        /// The type being constructed
        service: String,
        /// The parameter type that resolved to nothing
        dependency: String,
    },

    /// Resolution re-entered a type that is already being resolved
    #[error("Circular dependency: {}", chain.join(" -> "))]
    CircularDependency {
        /// Resolution chain, ending with the repeated type
        chain: Vec<String>,
    },

    /// A produced instance did not have the requested type
    #[error("Type mismatch: expected an instance of {expected}")]
    TypeMismatch {
        /// The requested type name
        expected: String,
    },

    /// Operation not valid in the current state
    #[error("Invalid state: {message}")]
    InvalidState {
        /// Description of the invalid state
        message: String,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an unsupported type error
    pub fn unsupported_type<S: Into<String>>(type_name: S) -> Self {
        Self::UnsupportedType {
            type_name: type_name.into(),
        }
    }

    /// Create a missing public constructor error
    pub fn no_public_constructor<S: Into<String>>(type_name: S) -> Self {
        Self::NoPublicConstructor {
            type_name: type_name.into(),
        }
    }

    /// Create an ambiguous candidates error
    pub fn ambiguous<S, I, C>(service: S, candidates: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = C>,
        C: ToString,
    {
        Self::AmbiguousCandidates {
            service: service.into(),
            candidates: candidates.into_iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Create a not assignable error
    pub fn not_assignable<I: Into<String>, S: Into<String>>(implementation: I, service: S) -> Self {
        Self::NotAssignable {
            implementation: implementation.into(),
            service: service.into(),
        }
    }

    /// Create an unresolved dependency error
    pub fn unresolved<S: Into<String>, D: Into<String>>(service: S, dependency: D) -> Self {
        Self::UnresolvedDependency {
            service: service.into(),
            dependency: dependency.into(),
        }
    }

    /// Create a circular dependency error
    pub fn circular<I, C>(chain: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: ToString,
    {
        Self::CircularDependency {
            chain: chain.into_iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch<S: Into<String>>(expected: S) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
        }
    }

    /// Create an invalid state error
    pub fn invalid_state<S: Into<String>>(message: S) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
