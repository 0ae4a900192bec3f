use super::DomainError;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A template-relative path with forward-slash separators.
///
/// Invariant: never absolute and never escapes its root via `..`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath(String);

impl RelativePath {
    pub fn try_new(path: impl AsRef<str>) -> Result<Self, DomainError> {
        let raw = path.as_ref().replace('\\', "/");
        let as_path = Path::new(&raw);
        if as_path.is_absolute() || raw.starts_with('/') {
            return Err(DomainError::AbsolutePathNotAllowed { path: raw });
        }
        if as_path.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(DomainError::InvalidTemplate(format!(
                "path escapes template root: {raw}"
            )));
        }
        Ok(Self(raw.trim_start_matches("./").to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }

    /// Split into the first component and the remainder, if any.
    pub fn split_first(&self) -> (&str, Option<&str>) {
        match self.0.split_once('/') {
            Some((head, rest)) => (head, Some(rest)),
            None => (&self.0, None),
        }
    }

    pub fn to_path_buf(&self) -> PathBuf {
        PathBuf::from(&self.0)
    }
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        self.as_path()
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Capability-based permissions model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Permissions {
    executable: bool,
}

impl Permissions {
    pub const fn read_write() -> Self {
        Self { executable: false }
    }

    pub const fn executable() -> Self {
        Self { executable: true }
    }

    pub const fn from_executable(executable: bool) -> Self {
        Self { executable }
    }

    pub const fn executable_flag(&self) -> bool {
        self.executable
    }
}
