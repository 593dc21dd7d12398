//! Producers
//!
//! A [`Producer`] supplies instances of one requested type under a fixed
//! reuse policy:
//!
//! | Variant | Behaviour |
//! |---------|-----------|
//! | `Singleton` | Holds one instance for its whole lifetime |
//! | `Factory` without predicate | Constructs on every request |
//! | `Factory` with predicate | Reuses the cached instance while the predicate accepts it |
//!
//! Producers are owned by the [`Container`] and replaced wholesale on
//! re-registration; they are never mutated apart from the factory's cache slot.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use deduce_domain::error::Result;
use deduce_domain::ports::{Instance, TypeKey};
use deduce_domain::value_objects::Optional;
use tracing::trace;

use crate::constants::UNBUILT_PLACEHOLDER;

use super::container::Container;

/// Construction function producing an instance of the declared type
///
/// Receives the container so parameters can be resolved recursively.
pub type ConstructionFn = Arc<dyn Fn(&Container) -> Result<Instance> + Send + Sync>;

/// Decides whether a cached factory instance may be returned again
pub type ReusePredicate = Arc<dyn Fn(&Instance) -> bool + Send + Sync>;

/// Unit responsible for supplying instances of one requested type
pub enum Producer {
    /// One fixed instance
    Singleton(SingletonProducer),
    /// Construction function plus reuse policy
    Factory(FactoryProducer),
}

impl Producer {
    /// Wrap an already constructed instance
    pub fn singleton(service: TypeKey, instance: Instance) -> Self {
        Self::Singleton(SingletonProducer {
            service,
            implementation: None,
            instance,
        })
    }

    /// Wrap a construction function with an optional reuse predicate
    ///
    /// Without a predicate every request constructs a new instance.
    pub fn factory(
        service: TypeKey,
        construct: ConstructionFn,
        reuse: Option<ReusePredicate>,
    ) -> Self {
        Self::Factory(FactoryProducer {
            service,
            implementation: None,
            construct,
            reuse,
            cached: Mutex::new(Optional::empty()),
        })
    }

    /// Wrap a construction function with a boolean reuse policy
    ///
    /// `true` always accepts the cached instance (a lazily constructed
    /// singleton); `false` always constructs a fresh one.
    pub fn with_reuse(service: TypeKey, construct: ConstructionFn, reuse_always: bool) -> Self {
        let reuse: Option<ReusePredicate> = if reuse_always {
            Some(Arc::new(|_: &Instance| true))
        } else {
            None
        };
        Self::factory(service, construct, reuse)
    }

    /// Record which concrete type the instances are
    pub fn implemented_by(mut self, implementation: TypeKey) -> Self {
        match &mut self {
            Self::Singleton(s) => s.implementation = Some(implementation),
            Self::Factory(f) => f.implementation = Some(implementation),
        }
        self
    }

    /// The concrete type behind the instances, when known
    pub fn implementation(&self) -> Option<TypeKey> {
        match self {
            Self::Singleton(s) => s.implementation,
            Self::Factory(f) => f.implementation,
        }
    }

    /// The declared (requested) type
    pub fn service(&self) -> TypeKey {
        match self {
            Self::Singleton(s) => s.service,
            Self::Factory(f) => f.service,
        }
    }

    /// Current instance, or a new one when the policy requires it
    pub fn get_instance(&self, container: &Container) -> Result<Instance> {
        match self {
            Self::Singleton(s) => Ok(Arc::clone(&s.instance)),
            Self::Factory(f) => f.get_instance(container),
        }
    }

    /// The cached instance, if any, without constructing
    pub fn cached(&self) -> Option<Instance> {
        match self {
            Self::Singleton(s) => Some(Arc::clone(&s.instance)),
            Self::Factory(f) => f.cached_instance(),
        }
    }

    /// Whether the producer is a singleton
    pub fn is_singleton(&self) -> bool {
        matches!(self, Self::Singleton(_))
    }
}

impl fmt::Display for Producer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Singleton(s) => write!(
                f,
                "Singleton {} -> {}",
                s.service.short_name(),
                implementation_name(s.implementation)
            ),
            Self::Factory(factory) => {
                let built = match factory.cached_instance() {
                    Some(_) => implementation_name(factory.implementation),
                    None => UNBUILT_PLACEHOLDER,
                };
                write!(f, "{} -> {}", factory.service.short_name(), built)
            }
        }
    }
}

// Closures registered directly do not reveal their concrete type.
fn implementation_name(implementation: Option<TypeKey>) -> &'static str {
    implementation.map_or(UNBUILT_PLACEHOLDER, |key| key.short_name())
}

impl fmt::Debug for Producer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Producer({self})")
    }
}

/// Producer holding one fixed instance
pub struct SingletonProducer {
    service: TypeKey,
    implementation: Option<TypeKey>,
    instance: Instance,
}

/// Producer constructing instances on demand
pub struct FactoryProducer {
    service: TypeKey,
    implementation: Option<TypeKey>,
    construct: ConstructionFn,
    reuse: Option<ReusePredicate>,
    cached: Mutex<Optional<Instance>>,
}

impl FactoryProducer {
    fn cached_instance(&self) -> Option<Instance> {
        self.cached
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_option()
            .cloned()
    }

    fn get_instance(&self, container: &Container) -> Result<Instance> {
        if let (Some(reuse), Some(cached)) = (&self.reuse, self.cached_instance()) {
            if reuse(&cached) {
                trace!(service = %self.service, "reusing cached instance");
                return Ok(cached);
            }
        }

        // The slot lock is not held while constructing: construction may
        // resolve other services, including through this producer's container.
        let instance = (self.construct)(container)?;
        self.cached
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(Arc::clone(&instance));
        trace!(service = %self.service, "constructed new instance");
        Ok(instance)
    }
}
