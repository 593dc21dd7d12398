//! Producer Tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use deduce_domain::error::Error;
use deduce_domain::ports::{downcast, erase, Instance, TypeKey};
use deduce_infrastructure::di::{ConstructionFn, Container, Producer, ReusePredicate};

struct Token {
    serial: usize,
}

fn counting_construct(counter: &Arc<AtomicUsize>) -> ConstructionFn {
    let counter = Arc::clone(counter);
    Arc::new(move |_: &Container| {
        let serial = counter.fetch_add(1, Ordering::SeqCst);
        Ok(erase(Arc::new(Token { serial })))
    })
}

fn serial(instance: &Instance) -> usize {
    downcast::<Token>(instance).expect("a token").serial
}

#[test]
fn test_singleton_returns_same_instance() {
    let container = Container::new();
    let instance = erase(Arc::new(Token { serial: 7 }));
    let producer = Producer::singleton(TypeKey::of::<Token>(), Arc::clone(&instance));

    let first = producer.get_instance(&container).unwrap();
    let second = producer.get_instance(&container).unwrap();

    assert!(Arc::ptr_eq(&first, &instance));
    assert!(Arc::ptr_eq(&second, &instance));
    assert!(producer.is_singleton());
}

#[test]
fn test_factory_without_predicate_constructs_every_time() {
    let container = Container::new();
    let counter = Arc::new(AtomicUsize::new(0));
    let producer = Producer::factory(TypeKey::of::<Token>(), counting_construct(&counter), None);

    let first = producer.get_instance(&container).unwrap();
    let second = producer.get_instance(&container).unwrap();

    assert_eq!(counter.load(Ordering::SeqCst), 2);
    assert_ne!(serial(&first), serial(&second));
}

#[test]
fn test_factory_always_reused_constructs_once() {
    let container = Container::new();
    let counter = Arc::new(AtomicUsize::new(0));
    let producer = Producer::with_reuse(TypeKey::of::<Token>(), counting_construct(&counter), true);

    for _ in 0..5 {
        producer.get_instance(&container).unwrap();
    }

    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn test_factory_never_reused_constructs_every_time() {
    let container = Container::new();
    let counter = Arc::new(AtomicUsize::new(0));
    let producer =
        Producer::with_reuse(TypeKey::of::<Token>(), counting_construct(&counter), false);

    producer.get_instance(&container).unwrap();
    producer.get_instance(&container).unwrap();

    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[test]
fn test_factory_replaces_rejected_instance() {
    let container = Container::new();
    let counter = Arc::new(AtomicUsize::new(0));
    // Even serials are stale
    let reuse: ReusePredicate = Arc::new(|instance: &Instance| serial(instance) % 2 == 1);
    let producer = Producer::factory(
        TypeKey::of::<Token>(),
        counting_construct(&counter),
        Some(reuse),
    );

    assert_eq!(serial(&producer.get_instance(&container).unwrap()), 0);
    assert_eq!(serial(&producer.get_instance(&container).unwrap()), 1);
    assert_eq!(serial(&producer.get_instance(&container).unwrap()), 1);
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[test]
fn test_failed_construction_keeps_previous_instance() {
    let container = Container::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let construct: ConstructionFn = {
        let calls = Arc::clone(&calls);
        Arc::new(move |_: &Container| {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(erase(Arc::new(Token { serial: 0 })))
            } else {
                Err(Error::invalid_state("exhausted"))
            }
        })
    };
    let producer = Producer::factory(TypeKey::of::<Token>(), construct, None);

    producer.get_instance(&container).unwrap();
    assert!(producer.get_instance(&container).is_err());
    let cached = producer.cached().expect("first instance still cached");
    assert_eq!(serial(&cached), 0);
}

#[test]
fn test_display_reports_state() {
    let container = Container::new();
    let counter = Arc::new(AtomicUsize::new(0));

    let singleton = Producer::singleton(TypeKey::of::<Token>(), erase(Arc::new(Token { serial: 1 })));
    assert_eq!(singleton.to_string(), "Singleton Token -> ?");
    let singleton = singleton.implemented_by(TypeKey::of::<Token>());
    assert_eq!(singleton.to_string(), "Singleton Token -> Token");

    let factory = Producer::with_reuse(TypeKey::of::<Token>(), counting_construct(&counter), true)
        .implemented_by(TypeKey::of::<Token>());
    assert_eq!(factory.to_string(), "Token -> ?");
    factory.get_instance(&container).unwrap();
    assert_eq!(factory.to_string(), "Token -> Token");
}

#[test]
fn test_display_of_unknown_implementation() {
    let container = Container::new();
    let counter = Arc::new(AtomicUsize::new(0));

    let factory = Producer::with_reuse(TypeKey::of::<Token>(), counting_construct(&counter), true);
    factory.get_instance(&container).unwrap();
    assert_eq!(factory.to_string(), "Token -> ?");
}
