//! Error types for the ttugi engine.
//!
//! Provides [`TtugiError`] as the single error type shared by the library
//! crates. It is non-exhaustive to allow future extension without breaking
//! downstream.
//!
//! Most of the recommendation path never fails: unset criteria, malformed
//! prices and unknown labels are defaulted silently. Errors only surface at
//! startup (catalog / config loading) and from collaborators such as the
//! preference agent.

use thiserror::Error;

/// Top-level error type for the ttugi engine.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TtugiError {
    /// The restaurant catalog could not be loaded or parsed.
    #[error("failed to load catalog from {path}: {reason}")]
    CatalogLoad {
        /// Path of the catalog file.
        path: String,
        /// What went wrong.
        reason: String,
    },

    /// The catalog file has an extension no loader understands.
    #[error("unsupported catalog format: {extension}")]
    UnsupportedFormat {
        /// The offending file extension (may be empty).
        extension: String,
    },

    /// Configuration is malformed or semantically invalid.
    #[error("invalid config: {reason}")]
    ConfigInvalid {
        /// What is wrong with the configuration.
        reason: String,
    },

    /// The preference agent failed while ranking or scoring.
    #[error("preference agent error: {message}")]
    Preference {
        /// Agent-supplied error message.
        message: String,
    },

    /// A session identifier was rejected.
    #[error("invalid session id: {reason}")]
    InvalidSession {
        /// Why the id was rejected.
        reason: String,
    },

    /// Underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization / deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, TtugiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_load_display() {
        let err = TtugiError::CatalogLoad {
            path: "data/busan.json".into(),
            reason: "missing name column".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to load catalog from data/busan.json: missing name column"
        );
    }

    #[test]
    fn error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: TtugiError = io_err.into();
        assert!(matches!(err, TtugiError::Io(_)));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{{bad}}").unwrap_err();
        let err: TtugiError = json_err.into();
        assert!(matches!(err, TtugiError::Json(_)));
    }

    #[test]
    fn preference_display() {
        let err = TtugiError::Preference {
            message: "profile store offline".into(),
        };
        assert_eq!(err.to_string(), "preference agent error: profile store offline");
    }

    #[test]
    fn result_alias_works() {
        fn ok_fn() -> Result<usize> {
            Ok(10)
        }
        fn err_fn() -> Result<usize> {
            Err(TtugiError::UnsupportedFormat {
                extension: "xlsx".into(),
            })
        }
        assert_eq!(ok_fn().unwrap(), 10);
        assert!(err_fn().is_err());
    }
}
