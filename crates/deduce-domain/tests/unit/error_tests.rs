//! Unit tests for domain error types

use deduce_domain::Error;

#[test]
fn test_invalid_argument_error() {
    let error = Error::invalid_argument("Missing factory");
    match error {
        Error::InvalidArgument { message } => assert_eq!(message, "Missing factory"),
        _ => panic!("Expected InvalidArgument error"),
    }
}

#[test]
fn test_ambiguous_candidates_lists_every_type() {
    let error = Error::ambiguous("dyn Widget", ["Gadget", "Gizmo"]);
    let display = error.to_string();
    assert!(display.contains("dyn Widget"));
    assert!(display.contains("Gadget, Gizmo"));
}

#[test]
fn test_circular_dependency_renders_chain() {
    let error = Error::circular(["A", "B", "A"]);
    assert_eq!(error.to_string(), "Circular dependency: A -> B -> A");
}

#[test]
fn test_unsupported_type_error() {
    let error = Error::unsupported_type("dyn Widget");
    match error {
        Error::UnsupportedType { type_name } => assert_eq!(type_name, "dyn Widget"),
        _ => panic!("Expected UnsupportedType error"),
    }
}

#[test]
fn test_configuration_error_keeps_source() {
    use std::error::Error as _;

    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "deduce.toml");
    let error = Error::configuration_with_source("Failed to read config", io);
    assert!(error.source().is_some());
    assert!(error.to_string().contains("Failed to read config"));
}
