//! Driven (output) ports.

use std::path::{Path, PathBuf};

use crate::domain::{ProjectStructure, RenderContext, Template};
use crate::error::HatcheryResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `hatchery_adapters::filesystem::LocalFilesystem` (production)
/// - `hatchery_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> HatcheryResult<()>;

    fn write_file(&self, path: &Path, content: &str) -> HatcheryResult<()>;

    fn read_to_string(&self, path: &Path) -> HatcheryResult<String>;

    /// Mark a file executable (or not).
    fn set_permissions(&self, path: &Path, executable: bool) -> HatcheryResult<()>;

    /// Copy one file, carrying over its executable bit.
    fn copy_file(&self, from: &Path, to: &Path) -> HatcheryResult<()>;

    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// Every regular file below `root`, relative to it, sorted.
    fn list_files(&self, root: &Path) -> HatcheryResult<Vec<PathBuf>>;

    fn remove_file(&self, path: &Path) -> HatcheryResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> HatcheryResult<()>;
}

/// Port for template retrieval.
///
/// Implemented by:
/// - `hatchery_adapters::template_loader::DirectoryTemplateStore` (on disk)
/// - `hatchery_adapters::template_store::InMemoryStore` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait TemplateStore: Send + Sync {
    /// Load the template found at `location`.
    fn load(&self, location: &Path) -> HatcheryResult<Template>;
}

/// Port for template rendering.
///
/// Implemented by `hatchery_adapters::renderer::JinjaRenderer`.
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRenderer: Send + Sync {
    /// Render a single string (used for the project directory name).
    fn render_str(&self, source: &str, context: &RenderContext) -> HatcheryResult<String>;

    /// Render every path and file body of `template` into a structure rooted
    /// at `output_dir/<rendered root name>`.
    fn render(
        &self,
        template: &Template,
        context: &RenderContext,
        output_dir: &Path,
    ) -> HatcheryResult<ProjectStructure>;
}
