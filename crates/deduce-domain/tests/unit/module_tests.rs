//! Unit tests for modules and link-time type registration

use deduce_domain::ports::{
    Describe, Module, TYPE_REGISTRATIONS, TypeDescriptor, TypeKey, TypeRegistration,
    list_linked_modules,
};
use linkme::distributed_slice;

struct Lamp;
struct Switch;

impl Describe for Lamp {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::concrete::<Lamp>().constructor(|| Lamp).build()
    }
}

impl Describe for Switch {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::concrete::<Switch>().constructor(|| Switch).build()
    }
}

#[distributed_slice(TYPE_REGISTRATIONS)]
static LAMP: TypeRegistration = TypeRegistration {
    module: "lighting",
    describe: <Lamp as Describe>::describe,
};

#[distributed_slice(TYPE_REGISTRATIONS)]
static SWITCH: TypeRegistration = TypeRegistration {
    module: "lighting",
    describe: <Switch as Describe>::describe,
};

#[test]
fn test_linked_module_collects_registrations() {
    let module = Module::linked("lighting");

    assert_eq!(module.name(), "lighting");
    assert_eq!(module.len(), 2);
    assert!(module.find(TypeKey::of::<Lamp>()).is_some());
    assert!(module.find(TypeKey::of::<Switch>()).is_some());
}

#[test]
fn test_list_linked_modules_includes_lighting() {
    assert!(list_linked_modules().contains(&"lighting"));
}

#[test]
fn test_with_type_uses_describe() {
    let module = Module::builder("manual").with_type::<Lamp>().build();
    assert_eq!(module.types()[0].key(), TypeKey::of::<Lamp>());
    assert_eq!(module.to_string(), "manual");
}
