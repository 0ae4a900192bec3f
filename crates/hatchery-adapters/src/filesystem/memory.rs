//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use hatchery_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{HatcheryError, HatcheryResult},
};

/// In-memory filesystem for testing.
///
/// Clones share state, so a test can keep a handle after boxing one into a
/// service.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
    executables: BTreeSet<PathBuf>,
    mutations: usize,
}

fn poisoned(path: &Path) -> HatcheryError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: "memory filesystem lock poisoned".into(),
    }
    .into()
}

fn not_found(path: &Path, what: &str) -> HatcheryError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("{what} does not exist"),
    }
    .into()
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    pub fn is_executable(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.executables.contains(path))
            .unwrap_or(false)
    }

    /// Every file path, sorted.
    pub fn all_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of mutating calls made so far.
    pub fn mutation_count(&self) -> usize {
        self.inner.read().map(|inner| inner.mutations).unwrap_or(0)
    }

    /// Seed a file, creating its parents (testing helper).
    pub fn seed_file(&self, path: impl AsRef<Path>, content: &str, executable: bool) {
        let path = path.as_ref();
        if let Ok(mut inner) = self.inner.write() {
            if let Some(parent) = path.parent() {
                insert_ancestors(&mut inner.directories, parent);
            }
            inner.files.insert(path.to_path_buf(), content.to_string());
            if executable {
                inner.executables.insert(path.to_path_buf());
            }
        }
    }
}

fn insert_ancestors(directories: &mut BTreeSet<PathBuf>, path: &Path) {
    let mut current = PathBuf::new();
    for component in path.components() {
        current.push(component);
        directories.insert(current.clone());
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> HatcheryResult<()> {
        let mut inner = self.inner.write().map_err(|_| poisoned(path))?;
        inner.mutations += 1;
        insert_ancestors(&mut inner.directories, path);
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> HatcheryResult<()> {
        let mut inner = self.inner.write().map_err(|_| poisoned(path))?;
        inner.mutations += 1;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(not_found(parent, "Parent directory"));
            }
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> HatcheryResult<String> {
        let inner = self.inner.read().map_err(|_| poisoned(path))?;
        inner
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| not_found(path, "File"))
    }

    fn set_permissions(&self, path: &Path, executable: bool) -> HatcheryResult<()> {
        let mut inner = self.inner.write().map_err(|_| poisoned(path))?;
        inner.mutations += 1;
        if !inner.files.contains_key(path) {
            return Err(not_found(path, "File"));
        }
        if executable {
            inner.executables.insert(path.to_path_buf());
        } else {
            inner.executables.remove(path);
        }
        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> HatcheryResult<()> {
        let mut inner = self.inner.write().map_err(|_| poisoned(to))?;
        inner.mutations += 1;
        let content = inner
            .files
            .get(from)
            .cloned()
            .ok_or_else(|| not_found(from, "File"))?;
        if let Some(parent) = to.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(not_found(parent, "Parent directory"));
            }
        }
        inner.files.insert(to.to_path_buf(), content);
        if inner.executables.contains(from) {
            inner.executables.insert(to.to_path_buf());
        } else {
            inner.executables.remove(to);
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn list_files(&self, root: &Path) -> HatcheryResult<Vec<PathBuf>> {
        let inner = self.inner.read().map_err(|_| poisoned(root))?;
        Ok(inner
            .files
            .keys()
            .filter_map(|p| p.strip_prefix(root).ok())
            .filter(|rel| !rel.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .collect())
    }

    fn remove_file(&self, path: &Path) -> HatcheryResult<()> {
        let mut inner = self.inner.write().map_err(|_| poisoned(path))?;
        inner.mutations += 1;
        inner
            .files
            .remove(path)
            .ok_or_else(|| not_found(path, "File"))?;
        inner.executables.remove(path);
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> HatcheryResult<()> {
        let mut inner = self.inner.write().map_err(|_| poisoned(path))?;
        inner.mutations += 1;
        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        inner.executables.retain(|p| !p.starts_with(path));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_requires_parent_directory() {
        let fs = MemoryFilesystem::new();
        assert!(fs.write_file(Path::new("/a/b.txt"), "x").is_err());
        fs.create_dir_all(Path::new("/a")).unwrap();
        fs.write_file(Path::new("/a/b.txt"), "x").unwrap();
        assert_eq!(fs.read_file(Path::new("/a/b.txt")).as_deref(), Some("x"));
    }

    #[test]
    fn copy_carries_executable_flag() {
        let fs = MemoryFilesystem::new();
        fs.seed_file("/s/run.sh", "#!/bin/sh", true);
        fs.create_dir_all(Path::new("/d")).unwrap();
        fs.copy_file(Path::new("/s/run.sh"), Path::new("/d/run.sh"))
            .unwrap();
        assert!(fs.is_executable(Path::new("/d/run.sh")));
    }

    #[test]
    fn remove_dir_all_drops_subtree_only() {
        let fs = MemoryFilesystem::new();
        fs.seed_file("/p/stage/a.txt", "", false);
        fs.seed_file("/p/keep.txt", "", false);
        fs.remove_dir_all(Path::new("/p/stage")).unwrap();
        assert!(!fs.exists(Path::new("/p/stage")));
        assert!(!fs.exists(Path::new("/p/stage/a.txt")));
        assert!(fs.exists(Path::new("/p/keep.txt")));
    }

    #[test]
    fn list_files_is_relative() {
        let fs = MemoryFilesystem::new();
        fs.seed_file("/p/x/b.txt", "", false);
        fs.seed_file("/p/x/a/c.txt", "", false);
        fs.seed_file("/p/y.txt", "", false);
        assert_eq!(
            fs.list_files(Path::new("/p/x")).unwrap(),
            [PathBuf::from("a/c.txt"), PathBuf::from("b.txt")]
        );
    }

    #[test]
    fn mutations_are_counted() {
        let fs = MemoryFilesystem::new();
        assert_eq!(fs.mutation_count(), 0);
        fs.create_dir_all(Path::new("/a")).unwrap();
        assert_eq!(fs.mutation_count(), 1);
    }
}
