//! Error types for paperfeed.
//!
//! Library crates use [`PaperfeedError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all paperfeed operations.
#[derive(Debug, thiserror::Error)]
pub enum PaperfeedError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error while talking to the search or translation backend.
    #[error("network error: {0}")]
    Network(String),

    /// Feed or store parsing error.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Translation backend error. Callers usually recover by keeping the source text.
    #[error("translation error: {0}")]
    Translation(String),

    /// The persisted store file does not exist.
    #[error("store not found at {path:?}")]
    StoreNotFound { path: PathBuf },

    /// No record terminator could be located in the store text.
    #[error("could not find insertion point in store {path:?}")]
    InsertionPointNotFound { path: PathBuf },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (bad record, invalid format, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PaperfeedError>;

impl PaperfeedError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Errors that abort only the merge step of a run.
    pub fn is_merge_abort(&self) -> bool {
        matches!(
            self,
            Self::StoreNotFound { .. } | Self::InsertionPointNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = PaperfeedError::config("missing store path");
        assert_eq!(err.to_string(), "config error: missing store path");

        let err = PaperfeedError::InsertionPointNotFound {
            path: PathBuf::from("src/data/papers.ts"),
        };
        assert!(err.to_string().contains("insertion point"));
        assert!(err.to_string().contains("papers.ts"));
    }

    #[test]
    fn merge_abort_classification() {
        let not_found = PaperfeedError::StoreNotFound {
            path: PathBuf::from("missing.ts"),
        };
        assert!(not_found.is_merge_abort());
        assert!(!PaperfeedError::Translation("quota".into()).is_merge_abort());
    }
}
