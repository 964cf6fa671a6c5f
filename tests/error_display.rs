use raudit_lib::{AuditError, ConfigError, ErrorCategory};

#[test]
fn config_error_display_includes_message() {
    let err = AuditError::Config("canny_low must be below canny_high".to_string());

    assert_eq!(
        format!("{}", err),
        "Configuration error: canny_low must be below canny_high"
    );
}

#[test]
fn io_error_display_wraps_source() {
    let io_err = std::io::Error::other("disk full");
    let err: AuditError = io_err.into();
    let rendered = format!("{}", err);

    assert!(rendered.starts_with("IO error: "));
    assert!(rendered.contains("disk full"));
}

#[test]
fn missing_project_root_maps_to_argument_payload() {
    let err = AuditError::invalid_argument("Project root is not a directory: nowhere");
    let payload = err.to_payload();

    assert_eq!(payload.category, ErrorCategory::Argument);
    assert!(payload
        .remediation
        .as_deref()
        .is_some_and(|hint| hint.contains(".html")));
}

#[test]
fn weight_config_errors_carry_weight_remediation() {
    let err = AuditError::Config("weights sum to 1.20, above 1.0".to_string());
    let payload = err.to_payload();

    assert_eq!(payload.category, ErrorCategory::Config);
    assert!(payload
        .remediation
        .as_deref()
        .is_some_and(|hint| hint.contains("0.35/0.35/0.25")));
}

#[test]
fn invalid_config_converts_to_config_error() {
    let err: AuditError =
        ConfigError::Invalid("histogram_bins must be in 1..=256".to_string()).into();

    assert!(matches!(err, AuditError::Config(_)));
    assert!(err.to_string().contains("histogram_bins"));
}
