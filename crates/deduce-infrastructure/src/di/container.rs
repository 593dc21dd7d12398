//! Container
//!
//! The registry mapping each requested type to the [`Producer`] supplying it,
//! plus the [`DeductionIndex`] pairing cause and result types.
//!
//! ## Lifecycle of a requested type
//!
//! ```text
//! Unregistered --register_* / auto-registration--> Registered
//! Registered   --register_* (same type)----------> Registered (producer replaced)
//! Registered   --unregister / clear--------------> Unregistered
//! ```
//!
//! ## Failure model
//!
//! Lookups that find nothing are `Ok(None)`. Failed construction attempts
//! (abstract types, ambiguous candidates, unresolvable parameters, cycles)
//! are errors.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use deduce_domain::ports::{Describe, Module, TypeDescriptor};
//! use deduce_infrastructure::di::Container;
//!
//! trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//!
//! struct FixedClock;
//!
//! impl Clock for FixedClock {
//!     fn now(&self) -> u64 {
//!         42
//!     }
//! }
//!
//! impl Describe for FixedClock {
//!     fn describe() -> TypeDescriptor {
//!         TypeDescriptor::concrete::<FixedClock>()
//!             .constructor(|| FixedClock)
//!             .implements::<dyn Clock>(|c| c)
//!             .build()
//!     }
//! }
//!
//! let clocks = Module::builder("clocks").with_type::<FixedClock>().build();
//! let container = Container::new();
//!
//! let clock = container.resolve::<dyn Clock>(&[clocks]).unwrap().unwrap();
//! assert_eq!(clock.now(), 42);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use deduce_domain::error::{Error, Result};
use deduce_domain::ports::{
    downcast, erase, instance_as, Describe, Instance, Introspect, Module, TypeDescriptor, TypeKey,
};
use deduce_domain::value_objects::ConstructorPreference;
use itertools::Itertools;
use tracing::{debug, info, trace};

use crate::config::ContainerConfig;

use super::catalog::TypeCatalog;
use super::deduction::{Deduction, DeductionIndex, DeductionKey};
use super::keys::{KeyExtractor, LeadingWord};
use super::producer::{ConstructionFn, Producer, ReusePredicate};
use super::resolution::ResolutionGuard;
use super::selector::ConstructorSelector;

static NEXT_CONTAINER_ID: AtomicU64 = AtomicU64::new(0);

/// Dependency-resolution registry
///
/// Safe to share between threads. Internal maps are never locked while user
/// construction code runs.
pub struct Container {
    id: u64,
    services: DashMap<TypeKey, Arc<Producer>>,
    deductions: DeductionIndex,
    catalog: TypeCatalog,
    config: ContainerConfig,
}

impl Container {
    /// Create an empty container with default settings
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    /// Create an empty container with `config`
    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            id: NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed),
            services: DashMap::new(),
            deductions: DeductionIndex::new(),
            catalog: TypeCatalog::new(),
            config,
        }
    }

    /// Settings in use
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// Module scan cache
    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    /// Stored deductions
    pub fn deductions(&self) -> &DeductionIndex {
        &self.deductions
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register a fixed instance of `S`
    pub fn register_instance<S>(&self, instance: Arc<S>) -> &Self
    where
        S: ?Sized + Send + Sync + 'static,
    {
        self.update_service(Producer::singleton(TypeKey::of::<S>(), erase(instance)));
        self
    }

    /// Register a factory of `S`
    ///
    /// `reuse_always = true` constructs once on first resolution and keeps
    /// the instance; `false` constructs on every resolution.
    pub fn register_factory<S, F>(&self, factory: F, reuse_always: bool) -> &Self
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<S> + Send + Sync + 'static,
    {
        let service = TypeKey::of::<S>();
        let construct = typed_factory(factory);
        self.update_service(Producer::with_reuse(service, construct, reuse_always));
        self
    }

    /// Register a factory of `S` whose cached instance is reused while
    /// `reuse` accepts it
    pub fn register_factory_when<S, F, P>(&self, factory: F, reuse: P) -> &Self
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<S> + Send + Sync + 'static,
        P: Fn(&S) -> bool + Send + Sync + 'static,
    {
        let service = TypeKey::of::<S>();
        self.update_service(Producer::factory(
            service,
            typed_factory(factory),
            Some(typed_predicate(reuse)),
        ));
        self
    }

    /// Register implementation `I` for service `S`
    ///
    /// Only constructors whose parameters are all registered right now are
    /// considered. Fails with [`Error::InvalidArgument`] when none qualifies
    /// and with [`Error::NotAssignable`] when `I` does not declare `S`.
    pub fn register_impl<S, I>(&self, preference: ConstructorPreference, reuse: bool) -> Result<&Self>
    where
        S: ?Sized + Send + Sync + 'static,
        I: ?Sized + Describe,
    {
        let (implementation, construct) = self.implementation_fn::<S, I>(preference)?;
        let producer = Producer::with_reuse(TypeKey::of::<S>(), construct, reuse)
            .implemented_by(implementation);
        self.update_service(producer);
        Ok(self)
    }

    /// Register implementation `I` for service `S`, reusing the cached
    /// instance while `reuse` accepts it
    ///
    /// Fails as [`register_impl`](Self::register_impl).
    pub fn register_impl_when<S, I, P>(
        &self,
        preference: ConstructorPreference,
        reuse: P,
    ) -> Result<&Self>
    where
        S: ?Sized + Send + Sync + 'static,
        I: ?Sized + Describe,
        P: Fn(&S) -> bool + Send + Sync + 'static,
    {
        let (implementation, construct) = self.implementation_fn::<S, I>(preference)?;
        let producer = Producer::factory(TypeKey::of::<S>(), construct, Some(typed_predicate(reuse)))
            .implemented_by(implementation);
        self.update_service(producer);
        Ok(self)
    }

    /// Register `T` as its own implementation
    pub fn register_self<T>(&self, preference: ConstructorPreference, reuse: bool) -> Result<&Self>
    where
        T: Describe + Send + Sync,
    {
        self.register_impl::<T, T>(preference, reuse)
    }

    /// Register the type described by `descriptor`
    ///
    /// Without modules the described type is its own implementation and is
    /// auto-wired directly; abstract types fail with
    /// [`Error::UnsupportedType`]. With modules, see
    /// [`register_service`](Self::register_service).
    pub fn register_type(
        &self,
        descriptor: Arc<TypeDescriptor>,
        reuse: bool,
        modules: &[Module],
    ) -> Result<&Self> {
        if modules.is_empty() {
            let service = descriptor.key();
            let construct = ConstructorSelector::new(self).construction_fn(
                &descriptor,
                service,
                self.config.constructor_preference,
                &[],
            )?;
            self.update_service(
                Producer::with_reuse(service, construct, reuse).implemented_by(service),
            );
        } else {
            self.register_from_modules(descriptor.key(), reuse, modules)?;
        }
        Ok(self)
    }

    /// Register `S` from the first module holding exactly one implementation
    ///
    /// Modules are searched in order. When a module holds several
    /// implementations, only public ones are kept; exactly one left is
    /// registered, more than one fails with [`Error::AmbiguousCandidates`],
    /// none moves on to the next module. Finding nothing is not an error.
    pub fn register_service<S>(&self, reuse: bool, modules: &[Module]) -> Result<&Self>
    where
        S: ?Sized + 'static,
    {
        self.register_from_modules(TypeKey::of::<S>(), reuse, modules)?;
        Ok(self)
    }

    /// Remove the registration of `S`, if any
    pub fn unregister<S>(&self) -> &Self
    where
        S: ?Sized + 'static,
    {
        self.unregister_key(TypeKey::of::<S>());
        self
    }

    /// Remove the registration under `key`; returns whether one existed
    pub fn unregister_key(&self, key: TypeKey) -> bool {
        let removed = self.services.remove(&key).is_some();
        if removed {
            debug!(service = %key, "service removed");
        }
        removed
    }

    /// Drop every producer and every deduction
    ///
    /// The module scan cache survives: module contents never change.
    pub fn clear(&self) {
        self.services.clear();
        self.deductions.clear();
        debug!("container cleared");
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Instance of `S`
    ///
    /// When `S` is not registered and modules are supplied, it is first
    /// auto-registered from them with the configured reuse policy.
    pub fn resolve<S>(&self, modules: &[Module]) -> Result<Option<Arc<S>>>
    where
        S: ?Sized + Send + Sync + 'static,
    {
        self.resolve_key(TypeKey::of::<S>(), modules)?
            .map(|instance| instance_as::<S>(&instance))
            .transpose()
    }

    /// Type-erased instance of the type identified by `key`
    pub fn resolve_key(&self, key: TypeKey, modules: &[Module]) -> Result<Option<Instance>> {
        let _guard = ResolutionGuard::enter(self.id, key)?;

        if !modules.is_empty() && !self.is_registered(key) {
            self.register_from_modules(key, self.config.reuse_by_default, modules)?;
        }

        let Some(producer) = self.producer(key) else {
            trace!(service = %key, "nothing registered");
            return Ok(None);
        };
        producer.get_instance(self).map(Some)
    }

    /// Instance of `T`, constructing it directly as a last resort
    ///
    /// Behaves as [`resolve`](Self::resolve); when that yields nothing and
    /// `T` is concrete, a constructor whose parameters are all registered is
    /// invoked once. The result is not registered, and no module ambiguity
    /// check is applied on this path.
    pub fn resolve_concrete<T>(&self, modules: &[Module]) -> Result<Option<Arc<T>>>
    where
        T: ?Sized + Describe + Send + Sync,
    {
        if let Some(found) = self.resolve::<T>(modules)? {
            return Ok(Some(found));
        }

        let key = TypeKey::of::<T>();
        let descriptor = Arc::new(T::describe());
        let Some(construct) = ConstructorSelector::new(self).resolvable_construction_fn(
            &descriptor,
            key,
            self.config.constructor_preference,
        ) else {
            return Ok(None);
        };

        trace!(service = %key, "constructing unregistered type directly");
        let instance = construct(self)?;
        instance_as::<T>(&instance).map(Some)
    }

    // ========================================================================
    // Deductions
    // ========================================================================

    /// Pair the cause family `C` with the result family `R` by leading word
    ///
    /// See [`bind_with`](Self::bind_with).
    pub fn bind<C, R>(&self, modules: &[Module]) -> Result<usize>
    where
        C: ?Sized + 'static,
        R: ?Sized + 'static,
    {
        self.bind_with::<C, R, _>(modules, &LeadingWord)
    }

    /// Pair the cause family `C` with the result family `R`
    ///
    /// Every concrete type of either family found in `modules` is registered
    /// (if not already) under its own type. Causes and results sharing a key
    /// from `extractor` are paired, and each pair is stored under its three
    /// deduction keys without overwriting existing ones. Returns how many
    /// pairs were new.
    ///
    /// Two types of the same family sharing a key fail with
    /// [`Error::AmbiguousCandidates`].
    pub fn bind_with<C, R, K>(&self, modules: &[Module], extractor: &K) -> Result<usize>
    where
        C: ?Sized + 'static,
        R: ?Sized + 'static,
        K: KeyExtractor + ?Sized,
    {
        let cause_family = TypeKey::of::<C>();
        let result_family = TypeKey::of::<R>();
        let causes = self.discover(cause_family, modules);
        let results = self.discover(result_family, modules);

        for descriptor in causes.iter().chain(results.iter()) {
            if !self.is_registered(descriptor.key()) {
                self.register_type(Arc::clone(descriptor), self.config.reuse_by_default, &[])?;
            }
        }

        let causes = group_by_key(cause_family, &causes, extractor)?;
        let results = group_by_key(result_family, &results, extractor)?;

        let mut created = 0;
        for (key, cause) in causes {
            let Some(result) = results.get(&key) else {
                continue;
            };
            let deduction = Arc::new(Deduction::new(
                cause,
                Arc::clone(result),
                cause_family,
                result_family,
                key,
            ));
            if !self
                .deductions
                .insert_if_absent(deduction.concrete_key(), &deduction)
            {
                continue;
            }
            created += 1;
            self.deductions
                .insert_if_absent(deduction.cause_key(), &deduction);
            self.deductions
                .insert_if_absent(deduction.result_key(), &deduction);
            debug!(deduction = %deduction, key = deduction.key(), "deduction added");
        }

        info!(
            cause = cause_family.name(),
            result = result_family.name(),
            created,
            "type families bound"
        );
        Ok(created)
    }

    /// Result of type `R` paired with the cause type `cause`
    pub fn induce<R>(&self, cause: TypeKey) -> Result<Option<Arc<R>>>
    where
        R: ?Sized + Send + Sync + 'static,
    {
        match self.deductions.get(&DeductionKey::new(cause, TypeKey::of::<R>())) {
            Some(deduction) => deduction.induce::<R>(self),
            None => Ok(None),
        }
    }

    /// Result of type `R` paired with the concrete type of `cause`
    pub fn induce_from<C, R>(&self, cause: &C) -> Result<Option<Arc<R>>>
    where
        C: ?Sized + Introspect,
        R: ?Sized + Send + Sync + 'static,
    {
        self.induce::<R>(cause.concrete_type_key())
    }

    /// Cause of type `C` paired with the result type `result`
    pub fn suggest<C>(&self, result: TypeKey) -> Result<Option<Arc<C>>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        match self.deductions.get(&DeductionKey::new(TypeKey::of::<C>(), result)) {
            Some(deduction) => deduction.suggest::<C>(self),
            None => Ok(None),
        }
    }

    /// Cause of type `C` paired with the concrete type of `result`
    pub fn suggest_from<R, C>(&self, result: &R) -> Result<Option<Arc<C>>>
    where
        R: ?Sized + Introspect,
        C: ?Sized + Send + Sync + 'static,
    {
        self.suggest::<C>(result.concrete_type_key())
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Whether a producer is registered under `key`
    pub fn is_registered(&self, key: TypeKey) -> bool {
        self.services.contains_key(&key)
    }

    /// Producer registered under `key`
    pub fn producer(&self, key: TypeKey) -> Option<Arc<Producer>> {
        self.services.get(&key).map(|entry| Arc::clone(entry.value()))
    }

    /// Registered types, ordered by name
    pub fn registered_types(&self) -> Vec<TypeKey> {
        self.services.iter().map(|entry| *entry.key()).sorted().collect()
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Number of stored deduction keys
    pub fn deductions_len(&self) -> usize {
        self.deductions.len()
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn register_from_modules(&self, service: TypeKey, reuse: bool, modules: &[Module]) -> Result<bool> {
        for module in modules {
            let mut candidates = self.catalog.assignable_types(service, module);
            if candidates.len() != 1 {
                candidates.retain(|t| t.is_public());
            }

            match candidates.as_slice() {
                [] => continue,
                [implementation] => {
                    let construct = ConstructorSelector::new(self).construction_fn(
                        implementation,
                        service,
                        self.config.constructor_preference,
                        modules,
                    )?;
                    let producer = Producer::with_reuse(
                        service,
                        upcasting(Arc::clone(implementation), service, construct),
                        reuse,
                    )
                    .implemented_by(implementation.key());
                    self.update_service(producer);
                    return Ok(true);
                }
                several => {
                    return Err(Error::ambiguous(
                        service.name(),
                        several.iter().map(|t| t.name()),
                    ));
                }
            }
        }
        trace!(service = %service, "no implementation found in modules");
        Ok(false)
    }

    fn implementation_fn<S, I>(
        &self,
        preference: ConstructorPreference,
    ) -> Result<(TypeKey, ConstructionFn)>
    where
        S: ?Sized + 'static,
        I: ?Sized + Describe,
    {
        let service = TypeKey::of::<S>();
        let descriptor = Arc::new(I::describe());
        if !descriptor.is_assignable_to(service) {
            return Err(Error::not_assignable(descriptor.name(), service.name()));
        }

        let construct = ConstructorSelector::new(self)
            .resolvable_construction_fn(&descriptor, service, preference)
            .ok_or_else(|| {
                Error::invalid_argument(format!(
                    "no constructor of {} can be resolved from current registrations",
                    descriptor.name()
                ))
            })?;
        Ok((descriptor.key(), upcasting(descriptor, service, construct)))
    }

    fn discover(&self, family: TypeKey, modules: &[Module]) -> Vec<Arc<TypeDescriptor>> {
        modules
            .iter()
            .flat_map(|module| self.catalog.assignable_types(family, module))
            .unique_by(|t| t.key())
            .collect()
    }

    fn update_service(&self, producer: Producer) {
        let service = producer.service();
        let producer = Arc::new(producer);
        if self.services.insert(service, Arc::clone(&producer)).is_some() {
            debug!(%service, %producer, "service replaced");
        } else {
            debug!(%service, %producer, "service added");
        }
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("services", &self.registered_types())
            .field("deductions", &self.deductions.len())
            .field("config", &self.config)
            .finish()
    }
}

fn typed_factory<S, F>(factory: F) -> ConstructionFn
where
    S: ?Sized + Send + Sync + 'static,
    F: Fn() -> Arc<S> + Send + Sync + 'static,
{
    Arc::new(move |_: &Container| Ok(erase(factory())))
}

fn typed_predicate<S, P>(reuse: P) -> ReusePredicate
where
    S: ?Sized + Send + Sync + 'static,
    P: Fn(&S) -> bool + Send + Sync + 'static,
{
    Arc::new(move |instance: &Instance| downcast::<S>(instance).is_some_and(|cached| reuse(&*cached)))
}

/// Wrap `construct` so its instances are converted to `service`
fn upcasting(
    implementation: Arc<TypeDescriptor>,
    service: TypeKey,
    construct: ConstructionFn,
) -> ConstructionFn {
    if implementation.key() == service {
        return construct;
    }
    Arc::new(move |container: &Container| {
        let instance = construct(container)?;
        implementation
            .upcast(&instance, service)
            .ok_or_else(|| Error::not_assignable(implementation.name(), service.name()))
    })
}

fn group_by_key<K>(
    family: TypeKey,
    types: &[Arc<TypeDescriptor>],
    extractor: &K,
) -> Result<BTreeMap<String, Arc<TypeDescriptor>>>
where
    K: KeyExtractor + ?Sized,
{
    let mut groups: BTreeMap<String, Arc<TypeDescriptor>> = BTreeMap::new();
    for descriptor in types {
        let key = extractor.key(descriptor);
        if let Some(existing) = groups.get(&key) {
            return Err(Error::ambiguous(
                format!("{} key '{}'", family.short_name(), key),
                [existing.name(), descriptor.name()],
            ));
        }
        groups.insert(key, Arc::clone(descriptor));
    }
    Ok(groups)
}
