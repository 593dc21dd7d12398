//! Container registration tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use deduce_domain::error::Error;
use deduce_domain::ports::{Describe, TypeDescriptor, TypeKey};
use deduce_domain::value_objects::ConstructorPreference;
use deduce_infrastructure::config::ContainerConfig;
use deduce_infrastructure::di::Container;

use crate::test_utils::{Car, Engine, Gadget, Gizmo, Missing, Needy, Sealed, Widget};

#[test]
fn test_registered_instance_is_returned_every_time() {
    let container = Container::new();
    let gadget: Arc<dyn Widget> = Arc::new(Gadget);
    container.register_instance(Arc::clone(&gadget));

    for _ in 0..3 {
        let resolved = container.resolve::<dyn Widget>(&[]).unwrap().unwrap();
        assert!(Arc::ptr_eq(&resolved, &gadget));
    }
}

#[test]
fn test_reregistration_replaces_producer() {
    let container = Container::new();
    container.register_instance::<dyn Widget>(Arc::new(Gadget));
    container.register_instance::<dyn Widget>(Arc::new(Gizmo));

    assert_eq!(container.len(), 1);
    let resolved = container.resolve::<dyn Widget>(&[]).unwrap().unwrap();
    assert_eq!(resolved.name(), "gizmo");
}

#[test]
fn test_factory_reuse_policies() {
    let container = Container::new();
    let built = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&built);
    container.register_factory::<dyn Widget, _>(
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Arc::new(Gadget)
        },
        false,
    );
    container.resolve::<dyn Widget>(&[]).unwrap();
    container.resolve::<dyn Widget>(&[]).unwrap();
    assert_eq!(built.load(Ordering::SeqCst), 2);

    let counter = Arc::clone(&built);
    container.register_factory::<dyn Widget, _>(
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Arc::new(Gadget)
        },
        true,
    );
    let first = container.resolve::<dyn Widget>(&[]).unwrap().unwrap();
    let second = container.resolve::<dyn Widget>(&[]).unwrap().unwrap();
    assert_eq!(built.load(Ordering::SeqCst), 3);
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_factory_with_reuse_predicate() {
    struct Session {
        id: usize,
    }

    let container = Container::new();
    let next = Arc::new(AtomicUsize::new(0));
    let ids = Arc::clone(&next);
    container.register_factory_when(
        move || {
            Arc::new(Session {
                id: ids.fetch_add(1, Ordering::SeqCst),
            })
        },
        |session: &Session| session.id >= 2,
    );

    let ids: Vec<usize> = (0..5)
        .map(|_| container.resolve::<Session>(&[]).unwrap().unwrap().id)
        .collect();
    assert_eq!(ids, vec![0, 1, 2, 2, 2]);
}

#[test]
fn test_register_impl_uses_resolvable_constructor() {
    let container = Container::new();
    container
        .register_impl::<dyn Widget, Gadget>(ConstructorPreference::default(), true)
        .unwrap();

    let widget = container.resolve::<dyn Widget>(&[]).unwrap().unwrap();
    assert_eq!(widget.name(), "gadget");
    assert_eq!(
        container
            .producer(TypeKey::of::<dyn Widget>())
            .unwrap()
            .to_string(),
        "Widget -> Gadget"
    );
}

#[test]
fn test_register_impl_when_rebuilds_rejected_instance() {
    static SERIALS: AtomicUsize = AtomicUsize::new(0);

    struct Ticket {
        serial: usize,
    }

    impl Describe for Ticket {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::concrete::<Ticket>()
                .constructor(|| Ticket {
                    serial: SERIALS.fetch_add(1, Ordering::SeqCst),
                })
                .build()
        }
    }

    let container = Container::new();
    container
        .register_impl_when::<Ticket, Ticket, _>(ConstructorPreference::default(), |ticket: &Ticket| {
            ticket.serial >= 1
        })
        .unwrap();

    let serials: Vec<usize> = (0..4)
        .map(|_| container.resolve::<Ticket>(&[]).unwrap().unwrap().serial)
        .collect();
    assert_eq!(serials, vec![0, 1, 1, 1]);
}

#[test]
fn test_register_impl_when_upcasts_to_service() {
    let container = Container::new();
    container
        .register_impl_when::<dyn Widget, Gadget, _>(ConstructorPreference::default(), |_: &(dyn Widget + 'static)| {
            false
        })
        .unwrap();

    let first = container.resolve::<dyn Widget>(&[]).unwrap().unwrap();
    let second = container.resolve::<dyn Widget>(&[]).unwrap().unwrap();
    assert_eq!(first.name(), "gadget");
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(
        container
            .producer(TypeKey::of::<dyn Widget>())
            .unwrap()
            .to_string(),
        "Widget -> Gadget"
    );
}

#[test]
fn test_factory_producer_renders_unknown_implementation() {
    let container = Container::new();
    container.register_factory::<dyn Widget, _>(|| Arc::new(Gizmo), true);
    container.resolve::<dyn Widget>(&[]).unwrap();

    assert_eq!(
        container
            .producer(TypeKey::of::<dyn Widget>())
            .unwrap()
            .to_string(),
        "Widget -> ?"
    );
}

#[test]
fn test_register_impl_rejects_unassignable_implementation() {
    let container = Container::new();
    let err = container
        .register_impl::<dyn Widget, Engine>(ConstructorPreference::default(), true)
        .err()
        .unwrap();
    assert!(matches!(err, Error::NotAssignable { .. }));
}

#[test]
fn test_register_impl_without_resolvable_constructor_fails() {
    let container = Container::new();
    let err = container
        .register_self::<Needy>(ConstructorPreference::default(), true)
        .err()
        .unwrap();
    assert!(matches!(err, Error::InvalidArgument { .. }));

    container.register_instance(Arc::new(Missing));
    container
        .register_self::<Needy>(ConstructorPreference::default(), true)
        .unwrap();
    assert!(container.resolve::<Needy>(&[]).unwrap().is_some());
}

#[test]
fn test_register_type_selects_constructor_by_preference() {
    // Least resolvable: the parameterless constructor
    let container = Container::new();
    container.register_instance(Arc::new(Engine { horsepower: 150 }));
    container
        .register_type(Arc::new(Car::describe()), true, &[])
        .unwrap();
    let car = container.resolve::<Car>(&[]).unwrap().unwrap();
    assert!(car.engine.is_none());

    // Most resolvable: the constructor taking the registered engine
    let container = Container::with_config(ContainerConfig {
        constructor_preference: ConstructorPreference::MostResolvablePreferred,
        ..ContainerConfig::default()
    });
    container.register_instance(Arc::new(Engine { horsepower: 150 }));
    container
        .register_type(Arc::new(Car::describe()), true, &[])
        .unwrap();
    let car = container.resolve::<Car>(&[]).unwrap().unwrap();
    assert_eq!(car.engine.as_ref().map(|e| e.horsepower), Some(150));
}

#[test]
fn test_register_self_with_explicit_preference() {
    let container = Container::new();
    container.register_instance(Arc::new(Engine { horsepower: 70 }));

    container
        .register_self::<Car>(ConstructorPreference::MostResolvablePreferred, false)
        .unwrap();
    let car = container.resolve::<Car>(&[]).unwrap().unwrap();
    assert!(car.engine.is_some());

    container
        .register_self::<Car>(ConstructorPreference::FirstPreferred, false)
        .unwrap();
    let car = container.resolve::<Car>(&[]).unwrap().unwrap();
    assert!(car.engine.is_none());
}

#[test]
fn test_register_type_rejects_abstract_and_sealed_types() {
    let container = Container::new();

    let err = container
        .register_type(Arc::new(<dyn Widget as Describe>::describe()), true, &[])
        .err()
        .unwrap();
    assert!(matches!(err, Error::UnsupportedType { .. }));

    let err = container
        .register_type(Arc::new(Sealed::describe()), true, &[])
        .err()
        .unwrap();
    assert!(matches!(err, Error::NoPublicConstructor { .. }));
    assert!(container.is_empty());
}

#[test]
fn test_unregister_removes_only_that_type() {
    let container = Container::new();
    container.register_instance::<dyn Widget>(Arc::new(Gadget));
    container.register_instance(Arc::new(Engine { horsepower: 1 }));

    container.unregister::<dyn Widget>();
    container.unregister::<dyn Widget>();

    assert!(container.resolve::<dyn Widget>(&[]).unwrap().is_none());
    assert!(container.resolve::<Engine>(&[]).unwrap().is_some());
    assert_eq!(container.registered_types(), vec![TypeKey::of::<Engine>()]);
    assert!(!container.unregister_key(TypeKey::of::<dyn Widget>()));
}

#[test]
fn test_clear_removes_everything() {
    let container = Container::new();
    container.register_instance::<dyn Widget>(Arc::new(Gadget));
    container.register_instance(Arc::new(Engine { horsepower: 1 }));

    container.clear();

    assert!(container.is_empty());
    assert!(container.resolve::<dyn Widget>(&[]).unwrap().is_none());
    assert!(container.resolve::<Engine>(&[]).unwrap().is_none());
}

#[test]
fn test_container_is_shareable_across_threads() {
    let container = Arc::new(Container::new());
    container.register_factory::<dyn Widget, _>(|| Arc::new(Gadget), true);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let container = Arc::clone(&container);
            std::thread::spawn(move || {
                container
                    .resolve::<dyn Widget>(&[])
                    .unwrap()
                    .map(|w| w.name())
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), Some("gadget"));
    }
}
