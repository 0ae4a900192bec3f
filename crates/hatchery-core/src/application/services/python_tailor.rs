use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::{
    application::ports::Filesystem,
    domain::{PythonVersionMode, capabilities::python_mode_def},
    error::HatcheryResult,
};

/// Removes generated paths that do not apply to the chosen Python mode.
pub struct PythonVersionTailor<'a> {
    filesystem: &'a dyn Filesystem,
}

impl<'a> PythonVersionTailor<'a> {
    pub fn new(filesystem: &'a dyn Filesystem) -> Self {
        Self { filesystem }
    }

    #[instrument(skip_all, fields(mode = %mode))]
    pub fn tailor(
        &self,
        mode: PythonVersionMode,
        project_root: &Path,
    ) -> HatcheryResult<Vec<PathBuf>> {
        let mut removed = Vec::new();
        for relative in python_mode_def(mode).removals {
            let path = project_root.join(relative);
            if !self.filesystem.exists(&path) {
                continue;
            }
            if self.filesystem.is_dir(&path) {
                self.filesystem.remove_dir_all(&path)?;
            } else {
                self.filesystem.remove_file(&path)?;
            }
            debug!(path = %relative, "removed");
            removed.push(PathBuf::from(*relative));
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::output::MockFilesystem;

    #[test]
    fn current_modes_touch_nothing() {
        // No expectations: any filesystem call would panic.
        let fs = MockFilesystem::new();
        for mode in PythonVersionMode::ALL {
            let removed = PythonVersionTailor::new(&fs)
                .tailor(mode, Path::new("/out/kit"))
                .unwrap();
            assert!(removed.is_empty());
        }
    }
}
