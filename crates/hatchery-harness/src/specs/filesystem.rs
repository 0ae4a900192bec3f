//! Expected shape of the generated tree.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, bail, ensure};
use walkdir::WalkDir;

use hatchery_core::domain::{ProjectFlavor, STAGING_DIR};

const MODULE_PLACEHOLDER: &str = "{{params.root_module_name}}";
const IGNORED_NAMES: &[&str] = &[".gitignore"];

/// Scripts that must carry the owner-execute bit.
pub const EXECUTABLE_SCRIPTS: &[&str] = &[
    "vagrant/install-basic-python.sh",
    "vagrant/make-cleanroom-copy-of-repo.sh",
    "vagrant/provision-build-vm.sh",
];

/// Paths that must and must not exist under a generated project.
#[derive(Debug, Clone, Default)]
pub struct FileSystemSpec {
    project_root: PathBuf,
    included: BTreeSet<PathBuf>,
    excluded: BTreeSet<PathBuf>,
    executable: BTreeSet<PathBuf>,
}

impl FileSystemSpec {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            ..Self::default()
        }
    }

    /// Expect the flavor's staging subtree, with the module placeholder
    /// resolved, and expect the staging area itself to be gone.
    pub fn specify_by_project_flavor(
        &mut self,
        template_dir: &Path,
        flavor: ProjectFlavor,
        root_module_name: &str,
    ) -> anyhow::Result<()> {
        let staging = template_root(template_dir)?.join(STAGING_DIR);
        let source = staging.join(flavor.as_str());
        ensure!(source.is_dir(), "no staging subtree at {}", source.display());

        for entry in WalkDir::new(&source).min_depth(1) {
            let entry = entry?;
            if IGNORED_NAMES.iter().any(|n| entry.file_name() == *n) {
                continue;
            }
            let relative = entry.path().strip_prefix(&source)?;
            self.included.insert(PathBuf::from(
                relative
                    .to_string_lossy()
                    .replace(MODULE_PLACEHOLDER, root_module_name),
            ));
        }

        self.excluded.insert(Path::new(root_module_name).join(STAGING_DIR));
        self.excluded.insert(PathBuf::from(STAGING_DIR));
        Ok(())
    }

    pub fn specify_executable(&mut self, relative: impl Into<PathBuf>) {
        let relative = relative.into();
        self.included.insert(relative.clone());
        self.executable.insert(relative);
    }

    pub fn included(&self) -> &BTreeSet<PathBuf> {
        &self.included
    }

    /// Check every expectation, reporting all misses at once.
    pub fn assert_all(&self) -> anyhow::Result<()> {
        let mut problems = Vec::new();

        for path in &self.included {
            if !self.project_root.join(path).exists() {
                problems.push(format!("missing {}", path.display()));
            }
        }
        for path in &self.excluded {
            if self.project_root.join(path).exists() {
                problems.push(format!("unexpected {}", path.display()));
            }
        }
        for path in &self.executable {
            let full = self.project_root.join(path);
            if full.exists() && !is_executable(&full)? {
                problems.push(format!("not executable {}", path.display()));
            }
        }

        if !problems.is_empty() {
            bail!(
                "file layout under {}:\n  {}",
                self.project_root.display(),
                problems.join("\n  ")
            );
        }
        Ok(())
    }
}

/// The template's single root directory (e.g. `{{params.package_name}}`).
pub fn template_root(template_dir: &Path) -> anyhow::Result<PathBuf> {
    let mut dirs = fs::read_dir(template_dir)
        .with_context(|| format!("reading {}", template_dir.display()))?
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_dir());
    match (dirs.next(), dirs.next()) {
        (Some(root), None) => Ok(root),
        _ => bail!(
            "expected exactly one root directory in {}",
            template_dir.display()
        ),
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> anyhow::Result<bool> {
    use std::os::unix::fs::PermissionsExt;
    Ok(fs::metadata(path)?.permissions().mode() & 0o100 != 0)
}

#[cfg(not(unix))]
fn is_executable(_: &Path) -> anyhow::Result<bool> {
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn staged_template() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let flavor = tmp
            .path()
            .join("{{params.package_name}}")
            .join(STAGING_DIR)
            .join("library");
        fs::create_dir_all(flavor.join(MODULE_PLACEHOLDER)).unwrap();
        fs::write(flavor.join(MODULE_PLACEHOLDER).join("no_op.py"), "").unwrap();
        fs::write(flavor.join(".gitignore"), "").unwrap();
        fs::write(tmp.path().join("template.toml"), "").unwrap();
        tmp
    }

    #[test]
    fn flavor_paths_resolve_module_and_skip_gitignore() {
        let tpl = staged_template();
        let mut spec = FileSystemSpec::new("/unused");
        spec.specify_by_project_flavor(tpl.path(), ProjectFlavor::Library, "widget_kit")
            .unwrap();

        let expected: BTreeSet<PathBuf> = [
            PathBuf::from("widget_kit"),
            PathBuf::from("widget_kit/no_op.py"),
        ]
        .into_iter()
        .collect();
        assert_eq!(spec.included(), &expected);
    }

    #[test]
    fn leftover_staging_and_missing_files_are_reported() {
        let tpl = staged_template();
        let project = TempDir::new().unwrap();
        fs::create_dir_all(project.path().join(STAGING_DIR)).unwrap();

        let mut spec = FileSystemSpec::new(project.path());
        spec.specify_by_project_flavor(tpl.path(), ProjectFlavor::Library, "widget_kit")
            .unwrap();
        let err = spec.assert_all().unwrap_err().to_string();

        assert!(err.contains("missing widget_kit/no_op.py"), "{err}");
        assert!(err.contains(&format!("unexpected {STAGING_DIR}")), "{err}");
    }

    #[cfg(unix)]
    #[test]
    fn non_executable_script_is_reported() {
        let project = TempDir::new().unwrap();
        fs::create_dir_all(project.path().join("vagrant")).unwrap();
        fs::write(project.path().join(EXECUTABLE_SCRIPTS[0]), "#!/bin/sh\n").unwrap();

        let mut spec = FileSystemSpec::new(project.path());
        spec.specify_executable(EXECUTABLE_SCRIPTS[0]);
        let err = spec.assert_all().unwrap_err().to_string();
        assert!(err.contains("not executable"), "{err}");
    }
}
