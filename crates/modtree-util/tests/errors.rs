use modtree_util::errors::ModtreeError;

#[test]
fn test_io_error_display() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
    let err = ModtreeError::from(io_err);
    assert!(err.to_string().contains("I/O error"), "got: {err}");
    assert_eq!(err.kind(), "io");
}

#[test]
fn test_transport_error_display() {
    let err = ModtreeError::Transport {
        message: "connection refused".to_string(),
    };
    assert_eq!(err.to_string(), "Transport error: connection refused");
    assert_eq!(err.kind(), "transport");
}

#[test]
fn test_validation_error_display() {
    let err = ModtreeError::Validation {
        message: "HEAD failed".to_string(),
    };
    assert_eq!(err.to_string(), "Validation error: HEAD failed");
}

#[test]
fn test_parse_error_display() {
    let err = ModtreeError::Parse {
        message: "go.mod:3: unknown directive".to_string(),
    };
    assert_eq!(err.to_string(), "Parse error: go.mod:3: unknown directive");
    assert_eq!(err.kind(), "parse");
}

#[test]
fn test_decode_error_display() {
    let err = ModtreeError::Decode {
        message: "invalid byte".to_string(),
    };
    assert_eq!(err.to_string(), "Decode error: invalid byte");
}

#[test]
fn test_lookup_error_display() {
    let err = ModtreeError::Lookup {
        message: "missing Origin.URL".to_string(),
    };
    assert_eq!(err.to_string(), "Lookup error: missing Origin.URL");
    assert_eq!(err.kind(), "lookup");
}

#[test]
fn test_generic_error_display() {
    let err = ModtreeError::Generic {
        message: "something broke".to_string(),
    };
    assert_eq!(err.to_string(), "something broke");
}
