//! Constructor Selection
//!
//! Builds the construction function used for auto-wiring a concrete type:
//!
//! 1. An implementation already registered under its own key, requested for
//!    another service, delegates to that producer.
//! 2. Abstract types are rejected.
//! 3. Among several public constructors, those whose parameters are all
//!    registered win when any exist; otherwise all stay candidates.
//! 4. [`ConstructorPreference`] picks one candidate.
//! 5. The returned function resolves each parameter through the container
//!    (auto-registering with the supplied modules) and invokes the constructor.
//!
//! [`ConstructorSelector::resolvable_construction_fn`] is the strict variant:
//! only fully registered constructors qualify, and "nothing qualifies" is a
//! `None` instead of an error.

use std::sync::Arc;

use deduce_domain::error::{Error, Result};
use deduce_domain::ports::{Constructor, Module, TypeDescriptor, TypeKey};
use deduce_domain::value_objects::ConstructorPreference;
use itertools::Itertools;
use tracing::trace;

use super::container::Container;
use super::producer::ConstructionFn;

/// Chooses constructors against the current contents of a container
pub struct ConstructorSelector<'a> {
    container: &'a Container,
}

impl<'a> ConstructorSelector<'a> {
    /// Selector reading registrations from `container`
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    /// Construction function building instances of `descriptor`'s type
    ///
    /// `service` is the key the result will be registered under; delegation to
    /// an existing registration only happens when it differs from the
    /// described type, so re-registering a type never resolves to itself.
    /// `modules` are used to resolve parameters at invocation time.
    pub fn construction_fn(
        &self,
        descriptor: &Arc<TypeDescriptor>,
        service: TypeKey,
        preference: ConstructorPreference,
        modules: &[Module],
    ) -> Result<ConstructionFn> {
        let implementation = descriptor.key();
        if implementation != service && self.container.is_registered(implementation) {
            trace!(%implementation, "delegating to existing registration");
            return Ok(delegate(implementation));
        }

        if descriptor.is_abstract() {
            return Err(Error::unsupported_type(descriptor.name()));
        }

        let mut candidates: Vec<&Constructor> = descriptor.public_constructors().collect();
        if candidates.len() > 1 {
            let resolvable: Vec<&Constructor> = candidates
                .iter()
                .copied()
                .filter(|c| self.is_resolvable(c))
                .collect();
            if !resolvable.is_empty() {
                candidates = resolvable;
            }
        }

        let constructor = select(candidates, preference)
            .ok_or_else(|| Error::no_public_constructor(descriptor.name()))?;
        trace!(%implementation, constructor = %constructor, "selected constructor");

        Ok(invoke_resolving(
            implementation,
            constructor.clone(),
            modules.to_vec(),
        ))
    }

    /// Construction function over constructors that are resolvable right now
    ///
    /// `None` when the type is abstract or no public constructor has all of
    /// its parameters registered.
    pub fn resolvable_construction_fn(
        &self,
        descriptor: &Arc<TypeDescriptor>,
        service: TypeKey,
        preference: ConstructorPreference,
    ) -> Option<ConstructionFn> {
        let implementation = descriptor.key();
        if implementation != service && self.container.is_registered(implementation) {
            return Some(delegate(implementation));
        }

        if descriptor.is_abstract() {
            return None;
        }

        let candidates: Vec<&Constructor> = descriptor
            .public_constructors()
            .filter(|c| self.is_resolvable(c))
            .collect();
        let constructor = select(candidates, preference)?;
        trace!(%implementation, constructor = %constructor, "selected resolvable constructor");

        Some(invoke_resolving(implementation, constructor.clone(), Vec::new()))
    }

    fn is_resolvable(&self, constructor: &Constructor) -> bool {
        constructor
            .params()
            .iter()
            .all(|param| self.container.is_registered(*param))
    }
}

/// Pick one constructor by preference
///
/// Candidates are ordered by arity with a stable sort, so constructors of
/// equal arity keep declaration order.
pub fn select(
    candidates: Vec<&Constructor>,
    preference: ConstructorPreference,
) -> Option<&Constructor> {
    match preference {
        ConstructorPreference::FirstPreferred => candidates.into_iter().next(),
        ConstructorPreference::LeastResolvablePreferred => candidates
            .into_iter()
            .sorted_by_key(|c| c.arity())
            .next(),
        ConstructorPreference::MostResolvablePreferred => candidates
            .into_iter()
            .sorted_by_key(|c| c.arity())
            .last(),
    }
}

fn delegate(implementation: TypeKey) -> ConstructionFn {
    Arc::new(move |container: &Container| {
        container
            .resolve_key(implementation, &[])?
            .ok_or_else(|| Error::unresolved(implementation.name(), implementation.name()))
    })
}

fn invoke_resolving(
    implementation: TypeKey,
    constructor: Constructor,
    modules: Vec<Module>,
) -> ConstructionFn {
    Arc::new(move |container: &Container| {
        let args = constructor
            .params()
            .iter()
            .map(|param| {
                container
                    .resolve_key(*param, &modules)?
                    .ok_or_else(|| Error::unresolved(implementation.name(), param.name()))
            })
            .collect::<Result<Vec<_>>>()?;
        constructor.invoke(&args)
    })
}
