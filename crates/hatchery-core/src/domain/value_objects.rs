//! Domain value objects: the closed choice sets a generation run is keyed on.
//!
//! These are pure value types: `Copy`, equality-by-value, no identity.
//! Derived properties (CI shape, staging layout, interpreter lists) live in
//! `capabilities.rs`. This file only defines the types, their canonical
//! string forms, and their `FromStr` parsers.
//!
//! # Adding New Variants
//!
//! 1. Add the enum variant and its `ALL` entry here
//! 2. Add the `as_str` arm and the `FromStr` arm here
//! 3. Add a registry entry in `capabilities.rs`

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

fn unknown(key: &'static str, value: &str, choices: &[&str]) -> DomainError {
    DomainError::InvalidParameter {
        key: key.into(),
        value: value.into(),
        reason: format!("must be one of: {}", choices.join(", ")),
    }
}

// ── ProjectFlavor ────────────────────────────────────────────────────────────

/// The project skeleton the generator emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectFlavor {
    BareBones,
    Library,
    CliApp,
    FlaskApp,
}

impl ProjectFlavor {
    /// Declaration order; the first entry is the default.
    pub const ALL: [Self; 4] = [Self::BareBones, Self::Library, Self::CliApp, Self::FlaskApp];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BareBones => "bare_bones",
            Self::Library => "library",
            Self::CliApp => "cli_app",
            Self::FlaskApp => "flask_app",
        }
    }

    pub fn choices() -> Vec<&'static str> {
        Self::ALL.iter().map(Self::as_str).collect()
    }
}

impl Default for ProjectFlavor {
    fn default() -> Self {
        Self::ALL[0]
    }
}

impl fmt::Display for ProjectFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectFlavor {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bare_bones" => Ok(Self::BareBones),
            "library" => Ok(Self::Library),
            "cli_app" => Ok(Self::CliApp),
            "flask_app" => Ok(Self::FlaskApp),
            other => Err(unknown("project_flavor", other, &Self::choices())),
        }
    }
}

// ── DependencyManagementMode ─────────────────────────────────────────────────

/// Where the generated project pulls its dependencies and VM boxes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyManagementMode {
    ManagedInHouse,
    PublicThirdParties,
}

impl DependencyManagementMode {
    pub const ALL: [Self; 2] = [Self::ManagedInHouse, Self::PublicThirdParties];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ManagedInHouse => "managed_in_house",
            Self::PublicThirdParties => "public_third_parties",
        }
    }

    pub fn choices() -> Vec<&'static str> {
        Self::ALL.iter().map(Self::as_str).collect()
    }

    pub fn python_repo_mode(self) -> PythonRepoMode {
        crate::domain::capabilities::dependency_mode_def(self).python_repo_mode
    }

    pub fn vagrant_box_mode(self) -> VagrantBoxMode {
        crate::domain::capabilities::dependency_mode_def(self).vagrant_box_mode
    }
}

impl Default for DependencyManagementMode {
    fn default() -> Self {
        Self::ALL[0]
    }
}

impl fmt::Display for DependencyManagementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DependencyManagementMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "managed_in_house" => Ok(Self::ManagedInHouse),
            "public_third_parties" => Ok(Self::PublicThirdParties),
            other => Err(unknown(
                "dependency_management_mode",
                other,
                &Self::choices(),
            )),
        }
    }
}

// ── PythonRepoMode / VagrantBoxMode ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PythonRepoMode {
    MirroredAndInternal,
    PublicOnly,
}

impl PythonRepoMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MirroredAndInternal => "mirrored_and_internal",
            Self::PublicOnly => "public_only",
        }
    }
}

impl fmt::Display for PythonRepoMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VagrantBoxMode {
    InternalOnly,
    PublicOnly,
}

impl VagrantBoxMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InternalOnly => "internal_only",
            Self::PublicOnly => "public_only",
        }
    }
}

impl fmt::Display for VagrantBoxMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── PythonVersion ────────────────────────────────────────────────────────────

/// A concrete interpreter the generated project is tested against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PythonVersion {
    V27,
    V34,
    V35,
}

impl PythonVersion {
    pub const ALL: [Self; 3] = [Self::V27, Self::V34, Self::V35];

    /// Tox-style environment name.
    pub const fn nickname(&self) -> &'static str {
        match self {
            Self::V27 => "py27",
            Self::V34 => "py34",
            Self::V35 => "py35",
        }
    }

    pub const fn executable(&self) -> &'static str {
        match self {
            Self::V27 => "python2.7",
            Self::V34 => "python3.4",
            Self::V35 => "python3.5",
        }
    }

    /// Dotted `major.minor` form used by CI matrices.
    pub const fn dotted(&self) -> &'static str {
        match self {
            Self::V27 => "2.7",
            Self::V34 => "3.4",
            Self::V35 => "3.5",
        }
    }

    pub const fn is_py3(&self) -> bool {
        !matches!(self, Self::V27)
    }
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.nickname())
    }
}

// ── PythonVersionMode ────────────────────────────────────────────────────────

/// Which interpreter family the generated project supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PythonVersionMode {
    Py27Only,
    Py27ThruPy3,
    Py3Only,
}

impl PythonVersionMode {
    pub const ALL: [Self; 3] = [Self::Py27Only, Self::Py27ThruPy3, Self::Py3Only];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Py27Only => "py27_only",
            Self::Py27ThruPy3 => "py27_thru_py3",
            Self::Py3Only => "py3_only",
        }
    }

    pub fn choices() -> Vec<&'static str> {
        Self::ALL.iter().map(Self::as_str).collect()
    }

    pub fn python_versions(self) -> &'static [PythonVersion] {
        crate::domain::capabilities::python_mode_def(self).versions
    }

    pub fn has_py27(self) -> bool {
        self.python_versions().contains(&PythonVersion::V27)
    }

    pub fn has_py3(self) -> bool {
        self.python_versions().iter().any(PythonVersion::is_py3)
    }
}

impl Default for PythonVersionMode {
    fn default() -> Self {
        Self::ALL[0]
    }
}

impl fmt::Display for PythonVersionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PythonVersionMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "py27_only" => Ok(Self::Py27Only),
            "py27_thru_py3" => Ok(Self::Py27ThruPy3),
            "py3_only" => Ok(Self::Py3Only),
            other => Err(unknown("python_version_mode", other, &Self::choices())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_variant_is_default() {
        assert_eq!(ProjectFlavor::default(), ProjectFlavor::BareBones);
        assert_eq!(
            DependencyManagementMode::default(),
            DependencyManagementMode::ManagedInHouse
        );
        assert_eq!(PythonVersionMode::default(), PythonVersionMode::Py27Only);
    }

    #[test]
    fn parse_rejects_aliases_and_case_variants() {
        assert!("Library".parse::<ProjectFlavor>().is_err());
        assert!("flask".parse::<ProjectFlavor>().is_err());
        assert!("py3".parse::<PythonVersionMode>().is_err());
    }

    #[test]
    fn parse_error_lists_choices() {
        let err = "gui_app".parse::<ProjectFlavor>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("project_flavor"), "{msg}");
        assert!(msg.contains("bare_bones, library, cli_app, flask_app"), "{msg}");
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&PythonVersionMode::Py27ThruPy3).unwrap();
        assert_eq!(json, "\"py27_thru_py3\"");
        let flavor: ProjectFlavor = serde_json::from_str("\"flask_app\"").unwrap();
        assert_eq!(flavor, ProjectFlavor::FlaskApp);
    }

    #[test]
    fn python_mode_version_families() {
        assert!(PythonVersionMode::Py27Only.has_py27());
        assert!(!PythonVersionMode::Py27Only.has_py3());
        assert!(PythonVersionMode::Py27ThruPy3.has_py27());
        assert!(PythonVersionMode::Py27ThruPy3.has_py3());
        assert!(!PythonVersionMode::Py3Only.has_py27());
        assert!(PythonVersionMode::Py3Only.has_py3());
    }

    #[test]
    fn python_version_names() {
        assert_eq!(PythonVersion::V34.nickname(), "py34");
        assert_eq!(PythonVersion::V35.executable(), "python3.5");
        assert_eq!(PythonVersion::V27.dotted(), "2.7");
    }
}
