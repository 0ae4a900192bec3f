//! Infrastructure adapters for Hatchery.
//!
//! Implements the ports defined in `hatchery_core::application::ports`.
//! All I/O and third-party engines live here.

pub mod builtin_templates;
pub mod filesystem;
pub mod renderer;
pub mod template_loader;
pub mod template_store;

pub use builtin_templates::default_template_dir;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use renderer::JinjaRenderer;
pub use template_loader::DirectoryTemplateStore;
pub use template_store::InMemoryStore;
