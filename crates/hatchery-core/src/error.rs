//! Unified error handling for Hatchery Core.
//!
//! Wraps domain and application errors in one root type carrying
//! user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Hatchery Core operations.
#[derive(Debug, Error, Clone)]
pub enum HatcheryError {
    /// Parameter or template-shape violations.
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Orchestration and I/O failures.
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl HatcheryError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {message}"),
                "Check your config file and HATCHERY_* environment variables".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in Hatchery".into(),
                "Please report this issue at: https://github.com/cosecruz/hatchery/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Template => ErrorCategory::Template,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Template,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type HatcheryResult<T> = Result<T, HatcheryError>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    fn context(self, msg: impl Into<String>) -> HatcheryResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> HatcheryResult<T> {
        self.map_err(|e| HatcheryError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn domain_validation_maps_to_validation_category() {
        let err: HatcheryError = DomainError::MissingParameter {
            key: "author_name".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(err.suggestions().iter().any(|s| s.contains("--param author_name")));
    }

    #[test]
    fn staging_missing_is_template_category() {
        let err: HatcheryError = ApplicationError::StagingMissing {
            path: PathBuf::from("/out/x/cookiecutter-project-flavors"),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Template);
    }

    #[test]
    fn context_wraps_foreign_errors_as_internal() {
        let res: Result<(), std::io::Error> = Err(std::io::Error::other("boom"));
        let err = res.context("reading manifest").unwrap_err();
        assert!(matches!(err, HatcheryError::Internal { ref message } if message == "reading manifest: boom"));
    }
}
