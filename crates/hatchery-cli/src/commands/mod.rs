//! One module per subcommand.  Each exposes `execute`.

pub mod completions;
pub mod config;
pub mod generate;
pub mod init;
pub mod inspect;

use std::path::{Path, PathBuf};

use hatchery_adapters::builtin_templates::{BUILTIN_TEMPLATE, default_template_dir, is_template_dir};

use crate::{
    config::AppConfig,
    error::{CliError, CliResult},
};

/// Template directory for `generate` and `inspect`.
///
/// An explicit argument is used as given so a bad path surfaces as the
/// store's own not-found error.  A configured `templates_dir` may point at
/// the template or at a directory holding `python-project/`.
pub(crate) fn resolve_template(explicit: Option<PathBuf>, config: &AppConfig) -> CliResult<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    if let Some(dir) = &config.templates_dir {
        if let Some(found) = template_in(dir) {
            return Ok(found);
        }
    }
    default_template_dir().ok_or_else(|| CliError::TemplateNotFound {
        searched: "the configured templates_dir, ./templates and the executable's directory"
            .into(),
    })
}

fn template_in(dir: &Path) -> Option<PathBuf> {
    [dir.to_path_buf(), dir.join(BUILTIN_TEMPLATE)]
        .into_iter()
        .find(|candidate| is_template_dir(candidate))
}
