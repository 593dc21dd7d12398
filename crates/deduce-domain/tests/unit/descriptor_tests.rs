//! Unit tests for type descriptors and constructors

use deduce_domain::ports::{
    Describe, Introspect, TypeDescriptor, TypeKey, TypeKind, downcast, erase, instance_as,
};
use deduce_domain::Error;
use std::sync::Arc;

trait Sensor: Send + Sync {
    fn read(&self) -> i32;
}

struct Clock;

struct Thermometer {
    offset: i32,
}

impl Thermometer {
    fn calibrated(clock: Arc<Clock>) -> Self {
        let _ = clock;
        Self { offset: 2 }
    }
}

impl Sensor for Thermometer {
    fn read(&self) -> i32 {
        20 + self.offset
    }
}

impl Describe for Thermometer {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::concrete::<Thermometer>()
            .constructor(|| Thermometer { offset: 0 })
            .constructor(Thermometer::calibrated)
            .private_constructor(|_clock: Arc<Clock>, _again: Arc<Clock>| Thermometer { offset: 9 })
            .implements::<dyn Sensor>(|t| t)
            .build()
    }
}

impl Describe for dyn Sensor {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::interface::<dyn Sensor>()
    }
}

#[test]
fn test_concrete_descriptor_lists_constructors_in_order() {
    let descriptor = Thermometer::describe();

    assert_eq!(descriptor.kind(), TypeKind::Concrete);
    assert!(descriptor.is_public());
    assert_eq!(descriptor.constructors().len(), 3);
    assert_eq!(descriptor.constructors()[0].arity(), 0);
    assert_eq!(descriptor.constructors()[1].params(), &[TypeKey::of::<Clock>()]);
    assert_eq!(descriptor.public_constructors().count(), 2);
}

#[test]
fn test_interface_descriptor_is_abstract() {
    let descriptor = <dyn Sensor as Describe>::describe();
    assert!(descriptor.is_abstract());
    assert!(descriptor.constructors().is_empty());
    assert_eq!(descriptor.key().short_name(), "Sensor");
}

#[test]
fn test_assignability() {
    let descriptor = Thermometer::describe();
    assert!(descriptor.is_assignable_to(TypeKey::of::<Thermometer>()));
    assert!(descriptor.is_assignable_to(TypeKey::of::<dyn Sensor>()));
    assert!(!descriptor.is_assignable_to(TypeKey::of::<Clock>()));
}

#[test]
fn test_constructor_invocation_and_upcast() {
    let descriptor = Thermometer::describe();
    let built = descriptor.constructors()[1]
        .invoke(&[erase(Arc::new(Clock))])
        .unwrap();

    let sensor = descriptor
        .upcast(&built, TypeKey::of::<dyn Sensor>())
        .and_then(|i| downcast::<dyn Sensor>(&i))
        .unwrap();
    assert_eq!(sensor.read(), 22);
}

#[test]
fn test_instance_as_reports_type_mismatch() {
    let instance = erase(Arc::new(Clock));
    assert!(instance_as::<Clock>(&instance).is_ok());
    assert!(matches!(
        instance_as::<Thermometer>(&instance),
        Err(Error::TypeMismatch { .. })
    ));
}

#[test]
fn test_type_key_identity() {
    assert_eq!(TypeKey::of::<Clock>(), TypeKey::of::<Clock>());
    assert_ne!(TypeKey::of::<Clock>(), TypeKey::of::<Thermometer>());
    assert!(TypeKey::of::<Clock>().name().ends_with("Clock"));
}

#[test]
fn test_introspect_reports_concrete_type_behind_trait_object() {
    trait Reading: Introspect + Send + Sync {}
    struct Celsius;
    impl Reading for Celsius {}

    let reading: Arc<dyn Reading> = Arc::new(Celsius);
    assert_eq!(reading.as_ref().concrete_type_key(), TypeKey::of::<Celsius>());
}
