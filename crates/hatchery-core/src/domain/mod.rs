//! Core domain layer for Hatchery.
//!
//! Pure logic over generation parameters and template shape. All I/O,
//! templating and rendering concerns are reached through ports defined in
//! the application layer.
//!
//! - **No I/O**: No filesystem, network, or process calls
//! - **Closed choices**: enumerated parameters are enums with registry tables
//! - **Immutable values**: parameters are fixed once a run starts

pub mod capabilities;
pub mod entities;
pub mod error;
pub mod value_objects;

mod validation;

pub use entities::{
    breadcrumb::{BREADCRUMB_FILE, BreadcrumbRecord, RuntimeEnv},
    common::{Permissions, RelativePath},
    parameters::{
        GenerationParameters, ParameterMap, ParameterSchema, ParameterSpec, parse_override,
    },
    project_structure::{DirectoryToCreate, FileToWrite, FsEntry, ProjectStructure},
    template::{
        DirectorySpec, FileSpec, RenderContext, Template, TemplateBuilder, TemplateContent, TemplateId,
        TemplateMetadata, TemplateNode, TemplateTree,
    },
};

pub use capabilities::STAGING_DIR;
pub use error::{DomainError, ErrorCategory};
pub use validation::{ParameterValidator, RULES as VALIDATION_RULES, Rule};

pub use value_objects::{
    DependencyManagementMode, ProjectFlavor, PythonRepoMode, PythonVersion, PythonVersionMode,
    VagrantBoxMode,
};
