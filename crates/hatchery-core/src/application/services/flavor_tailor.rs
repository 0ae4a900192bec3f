//! Flavor Tailor: moves one flavor's staged subtree into place.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{ProjectFlavor, STAGING_DIR, capabilities::flavor_def},
    error::HatcheryResult,
};

pub struct FlavorTailor<'a> {
    filesystem: &'a dyn Filesystem,
}

impl<'a> FlavorTailor<'a> {
    pub fn new(filesystem: &'a dyn Filesystem) -> Self {
        Self { filesystem }
    }

    /// Copy `<root>/cookiecutter-project-flavors/<flavor>/<subdir>` to
    /// `<root>/<subdir>` for each of the flavor's subdirectories, then delete
    /// the staging root.
    ///
    /// Returns the copied files relative to `project_root`. A missing
    /// subdirectory is skipped; a missing staging root is an error.
    #[instrument(skip_all, fields(flavor = %flavor, root = %project_root.display()))]
    pub fn tailor(
        &self,
        flavor: ProjectFlavor,
        root_module_name: &str,
        project_root: &Path,
    ) -> HatcheryResult<Vec<PathBuf>> {
        let staging = project_root.join(STAGING_DIR);
        if !self.filesystem.is_dir(&staging) {
            return Err(ApplicationError::StagingMissing { path: staging }.into());
        }

        let flavor_root = staging.join(flavor.as_str());
        let mut copied = Vec::new();

        for subdir in flavor_def(flavor).subdirs {
            let name = subdir.resolve(root_module_name);
            let source = flavor_root.join(name);
            if !self.filesystem.is_dir(&source) {
                debug!(subdir = name, "no staged content, skipping");
                continue;
            }

            let destination = project_root.join(name);
            self.filesystem.create_dir_all(&destination)?;

            for relative in self.filesystem.list_files(&source)? {
                let target = destination.join(&relative);
                if let Some(parent) = target.parent() {
                    self.filesystem.create_dir_all(parent)?;
                }
                self.filesystem.copy_file(&source.join(&relative), &target)?;
                copied.push(Path::new(name).join(relative));
            }
        }

        self.filesystem.remove_dir_all(&staging)?;
        info!(files = copied.len(), "flavor tailored");
        Ok(copied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::output::MockFilesystem;
    use mockall::predicate::eq;

    #[test]
    fn missing_staging_root_fails_without_mutation() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir()
            .with(eq(PathBuf::from("/out/kit").join(STAGING_DIR)))
            .return_const(false);

        let err = FlavorTailor::new(&fs)
            .tailor(ProjectFlavor::Library, "kit", Path::new("/out/kit"))
            .unwrap_err();
        assert!(err.to_string().contains("staging directory missing"));
    }

    #[test]
    fn absent_subdirectories_are_skipped_and_staging_removed() {
        let root = PathBuf::from("/out/kit");
        let staging = root.join(STAGING_DIR);
        let mut fs = MockFilesystem::new();
        let staging_probe = staging.clone();
        fs.expect_is_dir()
            .returning(move |p| p == staging_probe.as_path());
        fs.expect_remove_dir_all()
            .with(eq(staging))
            .times(1)
            .returning(|_| Ok(()));

        let copied = FlavorTailor::new(&fs)
            .tailor(ProjectFlavor::CliApp, "kit", &root)
            .unwrap();
        assert!(copied.is_empty());
    }
}
