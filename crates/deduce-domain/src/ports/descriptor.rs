//! Type Descriptors
//!
//! Explicit introspection boundary used in place of runtime reflection.
//! A [`TypeDescriptor`] exposes exactly what the registry needs to know about
//! a type:
//!
//! - its identity ([`TypeKey`]) and whether it is abstract,
//! - which service types it is assignable to, with the upcast for each,
//! - its constructors, their parameter types, and a way to invoke them.
//!
//! Abstract services are modelled as trait objects (`dyn Widget`); concrete
//! implementations are ordinary sized types.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use deduce_domain::ports::{Describe, TypeDescriptor};
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! struct English;
//!
//! impl Greeter for English {
//!     fn greet(&self) -> String {
//!         "hello".to_string()
//!     }
//! }
//!
//! impl Describe for English {
//!     fn describe() -> TypeDescriptor {
//!         TypeDescriptor::concrete::<English>()
//!             .constructor(|| English)
//!             .implements::<dyn Greeter>(|g| g)
//!             .build()
//!     }
//! }
//!
//! let descriptor = English::describe();
//! assert!(descriptor.is_concrete());
//! assert_eq!(descriptor.constructors().len(), 1);
//! ```

use std::any::{Any, TypeId, type_name};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::constants::{TRAIT_OBJECT_PREFIX, TYPE_PATH_SEPARATOR};
use crate::error::{Error, Result};
use crate::ports::constructor::{Constructor, Factory};

/// Type-erased instance handle
///
/// Always holds an `Arc<S>` for the service type `S` it was produced for,
/// which lets unsized services (`dyn Trait`) travel through the registry.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Erase a typed handle into an [`Instance`]
pub fn erase<S>(value: Arc<S>) -> Instance
where
    S: ?Sized + Send + Sync + 'static,
{
    Arc::new(value)
}

/// Recover a typed handle from an [`Instance`]
///
/// Returns `None` when the instance was produced for another type.
pub fn downcast<S>(instance: &Instance) -> Option<Arc<S>>
where
    S: ?Sized + Send + Sync + 'static,
{
    instance.downcast_ref::<Arc<S>>().cloned()
}

/// Recover a typed handle, failing with [`Error::TypeMismatch`]
pub fn instance_as<S>(instance: &Instance) -> Result<Arc<S>>
where
    S: ?Sized + Send + Sync + 'static,
{
    downcast::<S>(instance).ok_or_else(|| Error::type_mismatch(type_name::<S>()))
}

// ============================================================================
// TypeKey
// ============================================================================

/// Opaque identity of a requested or concrete type
///
/// Equality and hashing use the `TypeId` only; the name is kept for display,
/// ordering of diagnostics, and pairing-key extraction.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Key of type `T` (sized or not)
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Underlying `TypeId`
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Full type name, e.g. `my_crate::widgets::Gadget`
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Last path segment without generics, e.g. `Gadget` or `Widget`
    pub fn short_name(&self) -> &'static str {
        let name = self.name.strip_prefix(TRAIT_OBJECT_PREFIX).unwrap_or(self.name);
        let name = name.split('<').next().unwrap_or(name);
        name.rsplit(TYPE_PATH_SEPARATOR).next().unwrap_or(name)
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for TypeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(other.name)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// ============================================================================
// Descriptor parts
// ============================================================================

/// Whether a type can be constructed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Service contract only (trait object); never auto-wired
    Abstract,
    /// Constructible implementation
    Concrete,
}

/// Visibility of a type or constructor to auto-wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    /// Visible to auto-wiring
    #[default]
    Public,
    /// Registered but skipped when a public alternative exists
    Internal,
}

type Upcast = Arc<dyn Fn(&Instance) -> Option<Instance> + Send + Sync>;

/// Declared assignability of a concrete type to a service type
#[derive(Clone)]
pub struct Assignment {
    target: TypeKey,
    upcast: Upcast,
}

impl Assignment {
    /// The service type this assignment targets
    pub fn target(&self) -> TypeKey {
        self.target
    }

    /// Convert an instance of the implementation into one of the target
    pub fn apply(&self, instance: &Instance) -> Option<Instance> {
        (self.upcast)(instance)
    }
}

impl fmt::Debug for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assignment")
            .field("target", &self.target)
            .finish()
    }
}

// ============================================================================
// TypeDescriptor
// ============================================================================

/// Introspection data for one type
#[derive(Clone, Debug)]
pub struct TypeDescriptor {
    key: TypeKey,
    kind: TypeKind,
    visibility: Visibility,
    constructors: Vec<Constructor>,
    assignments: Vec<Assignment>,
}

impl TypeDescriptor {
    /// Start describing a constructible type
    pub fn concrete<T>() -> DescriptorBuilder<T>
    where
        T: Send + Sync + 'static,
    {
        DescriptorBuilder {
            visibility: Visibility::Public,
            constructors: Vec::new(),
            assignments: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Describe an abstract service type, usually `dyn Trait`
    pub fn interface<S>() -> Self
    where
        S: ?Sized + 'static,
    {
        Self {
            key: TypeKey::of::<S>(),
            kind: TypeKind::Abstract,
            visibility: Visibility::Public,
            constructors: Vec::new(),
            assignments: Vec::new(),
        }
    }

    /// Identity of the described type
    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// Full type name
    pub fn name(&self) -> &'static str {
        self.key.name()
    }

    /// Abstract or concrete
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Whether the type can be constructed
    pub fn is_concrete(&self) -> bool {
        self.kind == TypeKind::Concrete
    }

    /// Whether the type is abstract
    pub fn is_abstract(&self) -> bool {
        self.kind == TypeKind::Abstract
    }

    /// Whether the type is public
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    /// All constructors in declaration order
    pub fn constructors(&self) -> &[Constructor] {
        &self.constructors
    }

    /// Public constructors in declaration order
    pub fn public_constructors(&self) -> impl Iterator<Item = &Constructor> {
        self.constructors.iter().filter(|c| c.is_public())
    }

    /// Declared service assignments
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Whether an instance of this type can be used as `target`
    pub fn is_assignable_to(&self, target: TypeKey) -> bool {
        target == self.key || self.assignments.iter().any(|a| a.target == target)
    }

    /// Convert an instance of this type into an instance of `target`
    ///
    /// Identity when `target` is this type. `None` when the type does not
    /// declare `target` or the instance was not produced for this type.
    pub fn upcast(&self, instance: &Instance, target: TypeKey) -> Option<Instance> {
        if target == self.key {
            return Some(Arc::clone(instance));
        }
        self.assignments
            .iter()
            .find(|a| a.target == target)
            .and_then(|a| a.apply(instance))
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.key, f)
    }
}

/// Builder for concrete [`TypeDescriptor`]s
pub struct DescriptorBuilder<T> {
    visibility: Visibility,
    constructors: Vec<Constructor>,
    assignments: Vec<Assignment>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> DescriptorBuilder<T>
where
    T: Send + Sync + 'static,
{
    /// Mark the type internal
    pub fn internal(mut self) -> Self {
        self.visibility = Visibility::Internal;
        self
    }

    /// Add a public constructor
    ///
    /// Any function or closure taking `Arc<A>` arguments works, e.g.
    /// `Service::new` for `fn new(repo: Arc<dyn Repo>) -> Service`.
    pub fn constructor<Args, F>(mut self, factory: F) -> Self
    where
        F: Factory<T, Args>,
    {
        self.constructors.push(Constructor::new(factory));
        self
    }

    /// Add a constructor that auto-wiring must not use
    pub fn private_constructor<Args, F>(mut self, factory: F) -> Self
    where
        F: Factory<T, Args>,
    {
        self.constructors.push(Constructor::new(factory).private());
        self
    }

    /// Declare that `T` can be used as the service `S`
    pub fn implements<S>(mut self, upcast: fn(Arc<T>) -> Arc<S>) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
    {
        self.assignments.push(Assignment {
            target: TypeKey::of::<S>(),
            upcast: Arc::new(move |instance: &Instance| {
                downcast::<T>(instance).map(|t| erase(upcast(t)))
            }),
        });
        self
    }

    /// Finish the descriptor
    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor {
            key: TypeKey::of::<T>(),
            kind: TypeKind::Concrete,
            visibility: self.visibility,
            constructors: self.constructors,
            assignments: self.assignments,
        }
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Types that can describe themselves to the registry
///
/// Implemented by concrete types for auto-wiring, and optionally by trait
/// objects (returning [`TypeDescriptor::interface`]).
pub trait Describe: 'static {
    /// Build this type's descriptor
    fn describe() -> TypeDescriptor;
}

/// Runtime identity of a value behind a trait object
///
/// Blanket-implemented for every sized `'static` type. Make it a supertrait
/// of a service trait so `dyn Service` reports the concrete type:
///
/// ```
/// use deduce_domain::ports::{Introspect, TypeKey};
///
/// trait Event: Introspect {}
/// struct Clicked;
/// impl Event for Clicked {}
///
/// let event: Box<dyn Event> = Box::new(Clicked);
/// assert_eq!(event.as_ref().concrete_type_key(), TypeKey::of::<Clicked>());
/// ```
pub trait Introspect {
    /// Key of the concrete type of `self`
    fn concrete_type_key(&self) -> TypeKey;
}

impl<T: Any> Introspect for T {
    fn concrete_type_key(&self) -> TypeKey {
        TypeKey::of::<T>()
    }
}
