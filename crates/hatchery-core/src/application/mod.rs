//! Application layer for Hatchery.
//!
//! - **Services**: the generate pipeline and its post-generation steps
//! - **Ports**: traits for filesystem, template storage and rendering
//! - **Errors**: orchestration failures
//!
//! Parameter rules live in `crate::domain`; this layer only sequences them.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    BreadcrumbWriter, FlavorTailor, GenerateRequest, GenerateService, GenerationReport,
    PythonVersionTailor, TemplateInfo, TemplateService,
};

pub use ports::{Filesystem, TemplateRenderer, TemplateStore};

pub use error::ApplicationError;
