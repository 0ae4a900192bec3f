//! Application layer errors.
//!
//! These represent failures in orchestration and I/O, not parameter rules.
//! Rule violations are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Template location could not be found or read.
    #[error("Template not found at {path}: {reason}")]
    TemplateNotFound { path: PathBuf, reason: String },

    #[error("Template rendering failed: {reason}")]
    RenderingFailed { reason: String },

    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Rendered project has no flavor staging area to tailor from.
    #[error("Flavor staging directory missing: {path}")]
    StagingMissing { path: PathBuf },

    #[error("Project already exists at {path}")]
    ProjectExists { path: PathBuf },

    #[error("Breadcrumb could not be serialised: {reason}")]
    BreadcrumbFailed { reason: String },
}

impl ApplicationError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TemplateNotFound { path, .. } => vec![
                format!("No usable template at: {}", path.display()),
                "Pass a template directory as the first argument".into(),
                "Or set HATCHERY_TEMPLATES_DIR".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::StagingMissing { .. } => vec![
                "The template does not ship a cookiecutter-project-flavors directory".into(),
                "Check that the template renders a flavor staging area".into(),
            ],
            Self::ProjectExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Use --overwrite-if-exists to generate into it".into(),
                "Or choose a different package_name or output directory".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TemplateNotFound { .. } => ErrorCategory::NotFound,
            Self::RenderingFailed { .. } | Self::StagingMissing { .. } => ErrorCategory::Template,
            Self::ProjectExists { .. } => ErrorCategory::Validation,
            Self::FilesystemError { .. } | Self::BreadcrumbFailed { .. } => {
                ErrorCategory::Internal
            }
        }
    }
}
