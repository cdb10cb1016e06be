use thiserror::Error;

/// Top-level error type for the SettleSpace workspace.
///
/// Subsystem crates define their own error types and implement
/// `From<SettleError>` so that storage and config failures propagate
/// with `?` across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettleError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<toml::de::Error> for SettleError {
    fn from(err: toml::de::Error) -> Self {
        SettleError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for SettleError {
    fn from(err: toml::ser::Error) -> Self {
        SettleError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for SettleError {
    fn from(err: serde_json::Error) -> Self {
        SettleError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for SettleSpace operations.
pub type Result<T> = std::result::Result<T, SettleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SettleError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");
    }

    #[test]
    fn test_error_display_all_variants() {
        let cases: Vec<(SettleError, &str)> = vec![
            (
                SettleError::Storage("disk full".to_string()),
                "Storage error: disk full",
            ),
            (
                SettleError::Serialization("invalid json".to_string()),
                "Serialization error: invalid json",
            ),
            (
                SettleError::Api("bind failed".to_string()),
                "API error: bind failed",
            ),
            (
                SettleError::NotFound("user buyer-9".to_string()),
                "Not found: user buyer-9",
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SettleError = io_err.into();
        assert!(matches!(err, SettleError::Io(_)));
        assert!(err.to_string().starts_with("I/O error:"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_from_toml_de() {
        let err: std::result::Result<toml::Value, _> = toml::from_str("invalid = [[[");
        let err: SettleError = err.unwrap_err().into();
        assert!(matches!(err, SettleError::Config(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let err: std::result::Result<serde_json::Value, _> = serde_json::from_str("{ nope }");
        let err: SettleError = err.unwrap_err().into();
        assert!(matches!(err, SettleError::Serialization(_)));
    }

    #[test]
    fn test_result_type_with_question_mark() {
        fn inner() -> Result<String> {
            let parsed: serde_json::Value = serde_json::from_str("{\"ok\": true}")?;
            Ok(parsed["ok"].to_string())
        }

        assert_eq!(inner().unwrap(), "true");
    }
}
