use crate::config::ConfigError;
use crate::image_loader::ImageLoadError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Pattern compilation error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl AuditError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        AuditError::InvalidArgument(message.into())
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            AuditError::Io(e) => ErrorPayload::new(
                ErrorCategory::Io,
                e.to_string(),
                "Check file paths/permissions.",
            ),
            AuditError::Image(e) => ErrorPayload::new(
                ErrorCategory::Image,
                e.to_string(),
                "Verify the screenshot is a readable png, jpg, jpeg or webp file.",
            ),
            AuditError::Serialization(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check JSON/serialization inputs; run with --verbose for details.",
            ),
            AuditError::Pattern(e) => ErrorPayload::new(
                ErrorCategory::Unknown,
                e.to_string(),
                "Re-run with --verbose; file an issue if persistent.",
            ),
            AuditError::InvalidArgument(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("project root") {
                    ErrorPayload::new(
                        ErrorCategory::Argument,
                        msg.to_string(),
                        "Pass the directory that contains the site's .html and .css files.",
                    )
                } else if lower.contains("screenshot") {
                    ErrorPayload::new(
                        ErrorCategory::Argument,
                        msg.to_string(),
                        "Pass --screenshots pointing at <page>.desktop.png / <page>.mobile.png captures.",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Argument,
                        msg.to_string(),
                        "Check the command arguments with --help.",
                    )
                }
            }
            AuditError::Config(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("weight") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Weights must be non-negative and sum to at most 1.0 (default 0.35/0.35/0.25).",
                    )
                } else if lower.contains("canny") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Set [visual] canny_low below canny_high (defaults 100 and 200).",
                    )
                } else if lower.contains("failed to read config") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Verify the --config path exists and contains valid TOML.",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Check flags and config values; run with --verbose for details.",
                    )
                }
            }
            AuditError::Unknown(msg) => ErrorPayload::new(
                ErrorCategory::Unknown,
                msg.to_string(),
                "Re-run with --verbose; file an issue if persistent.",
            ),
        }
    }
}

impl From<ImageLoadError> for AuditError {
    fn from(err: ImageLoadError) -> Self {
        match err {
            ImageLoadError::Load(e) => AuditError::Image(e),
            ImageLoadError::NotFound(path) => {
                AuditError::InvalidArgument(format!("Screenshot not found: {}", path))
            }
            ImageLoadError::EmptyImage(path) => {
                AuditError::Unknown(format!("Image has zero width or height: {}", path))
            }
            ImageLoadError::Save(msg) => AuditError::Io(std::io::Error::other(format!(
                "Failed to save image: {}",
                msg
            ))),
        }
    }
}

impl From<ConfigError> for AuditError {
    fn from(err: ConfigError) -> Self {
        AuditError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AuditError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Argument,
    Config,
    Io,
    Image,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_project_root_gets_argument_remediation() {
        let err = AuditError::invalid_argument("Project root does not exist: /nope");
        let payload = err.to_payload();
        assert_eq!(payload.category, ErrorCategory::Argument);
        let remediation = payload.remediation.unwrap_or_default();
        assert!(
            remediation.contains(".html"),
            "expected remediation to mention site files, got: {remediation}"
        );
    }

    #[test]
    fn screenshot_argument_mentions_naming_convention() {
        let err = AuditError::invalid_argument("Screenshot not found: home.desktop.png");
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.contains(".desktop.png"),
            "expected naming hint, got: {remediation}"
        );
    }

    #[test]
    fn weight_config_errors_list_defaults() {
        let err = AuditError::Config("weights sum to 1.2".to_string());
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.contains("0.35/0.35/0.25"),
            "expected default weights hint, got: {remediation}"
        );
    }

    #[test]
    fn canny_config_errors_mention_thresholds() {
        let err = AuditError::Config("canny_low must be below canny_high".to_string());
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(remediation.contains("canny_low"));
    }

    #[test]
    fn other_config_errors_use_default_remediation() {
        let err = AuditError::Config("something odd".to_string());
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.contains("Check flags"),
            "expected default remediation for generic config errors"
        );
    }

    #[test]
    fn image_not_found_becomes_invalid_argument() {
        let err: AuditError = ImageLoadError::NotFound("a.png".to_string()).into();
        assert!(matches!(err, AuditError::InvalidArgument(_)));
    }
}
