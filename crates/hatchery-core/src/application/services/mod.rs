//! Application services.
//!
//! `GenerateService` runs the whole pipeline; the tailors and the breadcrumb
//! writer are its post-generation steps and are usable on their own.

pub mod breadcrumb_writer;
pub mod flavor_tailor;
pub mod generate_service;
pub mod python_tailor;
pub mod template_service;

pub use breadcrumb_writer::BreadcrumbWriter;
pub use flavor_tailor::FlavorTailor;
pub use generate_service::{GenerateRequest, GenerateService, GenerationReport};
pub use python_tailor::PythonVersionTailor;
pub use template_service::{TemplateInfo, TemplateService};
