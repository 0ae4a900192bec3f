//! Location of the template that ships with Hatchery.
//!
//! # Resolution order
//!
//! The first candidate holding a `template.toml` wins:
//!
//! 1. **`$HATCHERY_TEMPLATES_DIR`**, either the template itself or a
//!    directory containing `python-project/`
//! 2. **`./templates/python-project`**, relative to the working directory
//! 3. **`<executable-dir>/templates/python-project`**
//! 4. **`<executable-dir>/../templates/python-project`**
//!
//! ```env
//! HATCHERY_TEMPLATES_DIR=./templates
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};

use crate::template_loader::MANIFEST_FILE;

/// Directory name of the bundled template.
pub const BUILTIN_TEMPLATE: &str = "python-project";

pub const TEMPLATES_DIR_ENV: &str = "HATCHERY_TEMPLATES_DIR";

/// Resolve the bundled template directory, if any candidate exists.
#[instrument]
pub fn default_template_dir() -> Option<PathBuf> {
    let found = candidate_paths().into_iter().find(|candidate| {
        let hit = is_template_dir(candidate);
        debug!(path = %candidate.display(), hit, "checking candidate template path");
        hit
    });
    if found.is_none() {
        warn!(
            "no bundled template found; checked ${TEMPLATES_DIR_ENV}, ./templates, \
             <exe>/templates, and <exe>/../templates"
        );
    }
    found
}

pub fn is_template_dir(path: &Path) -> bool {
    path.join(MANIFEST_FILE).is_file()
}

// ── Resolution helpers ────────────────────────────────────────────────────────

fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(5);

    if let Ok(env_dir) = std::env::var(TEMPLATES_DIR_ENV) {
        let p = PathBuf::from(env_dir);
        paths.push(p.clone());
        paths.push(p.join(BUILTIN_TEMPLATE));
    }

    paths.push(Path::new("templates").join(BUILTIN_TEMPLATE));

    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        paths.push(exe_dir.join("templates").join(BUILTIN_TEMPLATE));
        paths.push(exe_dir.join("..").join("templates").join(BUILTIN_TEMPLATE));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn manifest_marks_a_template_dir() {
        let tmp = TempDir::new().unwrap();
        assert!(!is_template_dir(tmp.path()));
        std::fs::write(tmp.path().join(MANIFEST_FILE), "").unwrap();
        assert!(is_template_dir(tmp.path()));
    }

    #[test]
    fn working_directory_candidate_is_always_probed() {
        assert!(
            candidate_paths()
                .iter()
                .any(|p| p == &Path::new("templates").join(BUILTIN_TEMPLATE))
        );
    }
}
