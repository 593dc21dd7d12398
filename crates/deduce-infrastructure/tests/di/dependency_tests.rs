//! Dependency tests

use std::sync::Arc;

use deduce_domain::error::Error;
use deduce_domain::ports::Describe;
use deduce_infrastructure::di::{Container, Dependency};

use crate::test_utils::{Cause, Effect, FooCause, FooEffect, Gadget, Widget};

fn foo() -> Dependency {
    Dependency::new(Arc::new(FooEffect::describe()), Arc::new(FooCause::describe()))
}

#[test]
fn test_resolves_both_sides_through_given_container() {
    let container = Container::new();
    container.register_instance(Arc::new(FooEffect));
    container.register_instance(Arc::new(FooCause));

    let effect = foo().induce::<dyn Effect>(&container).unwrap().unwrap();
    let cause = foo().suggest::<dyn Cause>(&container).unwrap().unwrap();
    assert_eq!(effect.label(), "FooEffect");
    assert_eq!(cause.label(), "FooCause");
}

#[test]
fn test_unregistered_side_is_none() {
    let container = Container::new();
    assert!(foo().induce::<FooEffect>(&container).unwrap().is_none());
}

#[test]
fn test_unassignable_target_fails() {
    let container = Container::new();
    container.register_instance(Arc::new(FooEffect));

    let err = foo().induce::<dyn Widget>(&container).err().unwrap();
    assert!(matches!(err, Error::NotAssignable { .. }));
}

#[test]
fn test_display_lists_consumer_then_supplier() {
    let rendered = foo().to_string();
    let (consumer, supplier) = rendered.split_once("->").unwrap();
    assert!(consumer.ends_with("FooEffect"));
    assert!(supplier.ends_with("FooCause"));

    let dependency = Dependency::new(Arc::new(Gadget::describe()), Arc::new(Gadget::describe()));
    assert_eq!(dependency.consumer().key(), dependency.supplier().key());
}
