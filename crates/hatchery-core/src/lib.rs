//! Hatchery Core - hexagonal core of the project generator.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          hatchery-cli (CLI)             │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (GenerateService, TemplateService,     │
//! │   FlavorTailor, BreadcrumbWriter)       │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │   (Store, Filesystem, Renderer)         │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   hatchery-adapters (Infrastructure)    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hatchery_core::application::{GenerateRequest, GenerateService};
//!
//! let service = GenerateService::new(store, renderer, filesystem);
//! let report = service.generate(
//!     &GenerateRequest::new("templates/python-project", "./out"),
//! )?;
//! println!("{}", report.project_dir.display());
//! ```

pub mod application;
pub mod domain;
pub mod error;

pub mod prelude {
    pub use crate::application::{
        GenerateRequest, GenerateService, GenerationReport, TemplateInfo, TemplateService,
        ports::{Filesystem, TemplateRenderer, TemplateStore},
    };
    pub use crate::domain::{
        DependencyManagementMode, GenerationParameters, ParameterMap, ProjectFlavor,
        ProjectStructure, PythonVersionMode, RenderContext, Template, TemplateId,
    };
    pub use crate::error::{HatcheryError, HatcheryResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
