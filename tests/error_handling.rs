use iolat::error;
use iolat::IolatError;

#[test]
fn test_user_friendly_messages() {
    let msg = error::user_friendly_message(&IolatError::PermissionDenied("x".into()));
    assert!(msg.contains("Permission denied"));

    let msg = error::user_friendly_message(&IolatError::FontUnavailable("x".into()));
    assert!(msg.contains("IOLAT_FONT"));

    let msg = error::user_friendly_message(&IolatError::ProbeError("Read failed".into()));
    assert_eq!(msg, "Probe error: Read failed");
}

#[test]
fn test_io_error_conversion() {
    let denied: IolatError =
        std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope").into();
    assert!(matches!(denied, IolatError::PermissionDenied(_)));

    let other: IolatError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(other, IolatError::IoError(_)));
    assert!(std::error::Error::source(&other).is_some());
}
