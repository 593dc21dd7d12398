//! Error Extension Tests

use deduce_domain::error::{Error, Result};
use deduce_infrastructure::error_ext::{to_domain_error, ErrorContext};
use std::io;

#[test]
fn test_context_wraps_source() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");

    let result: Result<()> = Err(io_error).context("failed to read file");

    match result {
        Err(Error::Configuration { message, source }) => {
            assert!(message.contains("failed to read file"));
            assert!(message.contains("file not found"));
            assert!(source.is_some());
        }
        other => panic!("Expected Configuration error, got {other:?}"),
    }
}

#[test]
fn test_with_context_is_lazy() {
    let ok: std::result::Result<u8, io::Error> = Ok(3);
    let value = ok
        .with_context(|| -> String { panic!("context must not be built on success") })
        .unwrap();
    assert_eq!(value, 3);
}

#[test]
fn test_config_context_keeps_message_verbatim() {
    let io_error = io::Error::other("boom");
    let err = Err::<(), _>(io_error)
        .config_context("Invalid configuration")
        .unwrap_err();

    assert_eq!(err.to_string(), "Configuration error: Invalid configuration");
}

#[test]
fn test_to_domain_error() {
    let err = to_domain_error(io::Error::other("denied"), "saving");
    assert!(matches!(err, Error::Configuration { ref message, .. } if message == "saving: denied"));
}
