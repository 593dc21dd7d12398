//! Dependencies
//!
//! A [`Dependency`] is an ordered pair of types: a consumer and the supplier
//! it consumes. Either side can be produced through a [`Container`], which is
//! always passed explicitly.

use std::fmt;
use std::sync::Arc;

use deduce_domain::constants::CONSUME_INDICATOR;
use deduce_domain::error::{Error, Result};
use deduce_domain::ports::{instance_as, Instance, TypeDescriptor, TypeKey};

use super::container::Container;

/// Ordered (consumer, supplier) pair of types
#[derive(Clone, Debug)]
pub struct Dependency {
    consumer: Arc<TypeDescriptor>,
    supplier: Arc<TypeDescriptor>,
}

impl Dependency {
    /// Pair `consumer` with the `supplier` it consumes
    pub fn new(consumer: Arc<TypeDescriptor>, supplier: Arc<TypeDescriptor>) -> Self {
        Self { consumer, supplier }
    }

    /// The consuming type
    pub fn consumer(&self) -> &Arc<TypeDescriptor> {
        &self.consumer
    }

    /// The supplying type
    pub fn supplier(&self) -> &Arc<TypeDescriptor> {
        &self.supplier
    }

    /// Resolve the consumer through `container`, as `T`
    ///
    /// `Ok(None)` when the container has nothing for the consumer;
    /// [`Error::NotAssignable`] when the consumer cannot be used as `T`.
    pub fn induce<T>(&self, container: &Container) -> Result<Option<Arc<T>>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        produce(&self.consumer, container)
    }

    /// Resolve the supplier through `container`, as `T`
    pub fn suggest<T>(&self, container: &Container) -> Result<Option<Arc<T>>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        produce(&self.supplier, container)
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.consumer.name(),
            CONSUME_INDICATOR,
            self.supplier.name()
        )
    }
}

fn produce<T>(descriptor: &TypeDescriptor, container: &Container) -> Result<Option<Arc<T>>>
where
    T: ?Sized + Send + Sync + 'static,
{
    let Some(instance) = container.resolve_key(descriptor.key(), &[])? else {
        return Ok(None);
    };
    upcast::<T>(descriptor, &instance).map(Some)
}

/// Convert an instance of `descriptor`'s type into a `T`
pub(crate) fn upcast<T>(descriptor: &TypeDescriptor, instance: &Instance) -> Result<Arc<T>>
where
    T: ?Sized + Send + Sync + 'static,
{
    let target = TypeKey::of::<T>();
    let converted = descriptor
        .upcast(instance, target)
        .ok_or_else(|| Error::not_assignable(descriptor.name(), target.name()))?;
    instance_as::<T>(&converted)
}
