// ============================================================================
// domain/error.rs - PARAMETER AND TEMPLATE ERROR DOMAIN
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Parameter Errors
    // ========================================================================
    #[error("invalid value {value:?} for parameter '{key}': {reason}")]
    InvalidParameter {
        key: String,
        value: String,
        reason: String,
    },

    #[error("required parameter missing: {key}")]
    MissingParameter { key: String },

    // ========================================================================
    // Template Errors
    // ========================================================================
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("Template '{template_id}' has no content")]
    EmptyTemplate { template_id: String },

    #[error("Duplicate path in template: {path}")]
    DuplicatePath { path: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidParameter { key, reason, .. } => vec![
                format!("Parameter '{key}' {reason}"),
                format!("Override it with: --param {key}=<value>"),
            ],
            Self::MissingParameter { key } => vec![
                format!("Add '{key}' to the template's parameters.json"),
                format!("Or pass it with: --param {key}=<value>"),
            ],
            Self::InvalidTemplate(msg) => vec![
                "Check the template directory layout".into(),
                format!("Details: {msg}"),
                "Try: hatchery inspect <template> to see what was loaded".into(),
            ],
            Self::EmptyTemplate { template_id } => vec![
                format!("Template '{template_id}' has no root directory"),
                "Add a single top-level directory such as {{params.package_name}}".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidParameter { .. } | Self::MissingParameter { .. } => {
                ErrorCategory::Validation
            }
            Self::InvalidTemplate(_)
            | Self::EmptyTemplate { .. }
            | Self::DuplicatePath { .. }
            | Self::AbsolutePathNotAllowed { .. } => ErrorCategory::Template,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Template,
}
