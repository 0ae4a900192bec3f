pub mod breadcrumb;
pub mod common;
pub mod parameters;
pub mod project_structure;
pub mod template;

pub use crate::domain::DomainError;
pub use breadcrumb::BreadcrumbRecord;
pub use parameters::{GenerationParameters, ParameterMap};
pub use project_structure::ProjectStructure;
pub use template::Template;
