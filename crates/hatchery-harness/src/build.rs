//! External tools: `make` for the build, the versioned interpreters tox
//! runs against, and `python3` for wheel metadata.
//!
//! A tool that cannot be started is reported as [`Tool::Unavailable`] so
//! the caller can skip rather than fail.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context as _, bail};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use hatchery_core::domain::PythonVersion;

/// Overrides the `make` executable.
pub const MAKE_ENV: &str = "HATCHERY_MAKE";
/// Overrides the `python3` executable used to read wheels.
pub const PYTHON_ENV: &str = "HATCHERY_PYTHON";

/// Availability of an external program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tool {
    Available,
    Unavailable(String),
}

pub(crate) fn probe(program: &OsStr, arg: &str) -> Tool {
    match Command::new(program).arg(arg).output() {
        Ok(out) if out.status.success() => Tool::Available,
        Ok(out) => Tool::Unavailable(format!(
            "{} {arg} exited with {}",
            program.to_string_lossy(),
            out.status
        )),
        Err(e) => Tool::Unavailable(format!("{} not runnable: {e}", program.to_string_lossy())),
    }
}

pub(crate) fn program_from_env(var: &str, fallback: &str) -> PathBuf {
    std::env::var_os(var)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(fallback))
}

// ── make ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct BuildRunner {
    make: PathBuf,
}

impl Default for BuildRunner {
    fn default() -> Self {
        Self {
            make: program_from_env(MAKE_ENV, "make"),
        }
    }
}

impl BuildRunner {
    pub fn new(make: impl Into<PathBuf>) -> Self {
        Self { make: make.into() }
    }

    pub fn availability(&self) -> Tool {
        probe(self.make.as_os_str(), "--version")
    }

    /// Run `make <targets>` in `project_root`; a non-zero exit is an error.
    #[instrument(skip(self), fields(make = %self.make.display()))]
    pub fn run(&self, project_root: &Path, targets: &[&str]) -> anyhow::Result<()> {
        info!(dir = %project_root.display(), "running make");
        let out = Command::new(&self.make)
            .args(targets)
            .current_dir(project_root)
            .output()
            .with_context(|| format!("starting {}", self.make.display()))?;
        if !out.status.success() {
            bail!(
                "make {} exited with {}\n{}",
                targets.join(" "),
                out.status,
                String::from_utf8_lossy(&out.stderr)
            );
        }
        debug!("make succeeded");
        Ok(())
    }
}

// ── interpreters ──────────────────────────────────────────────────────────────

/// Interpreter executables tox needs for each Python version.
#[derive(Debug, Clone)]
pub struct Interpreters {
    programs: BTreeMap<PythonVersion, PathBuf>,
}

impl Default for Interpreters {
    fn default() -> Self {
        Self {
            programs: PythonVersion::ALL
                .into_iter()
                .map(|v| (v, PathBuf::from(v.executable())))
                .collect(),
        }
    }
}

impl Interpreters {
    pub fn with_program(mut self, version: PythonVersion, program: impl Into<PathBuf>) -> Self {
        self.programs.insert(version, program.into());
        self
    }

    pub fn program(&self, version: PythonVersion) -> PathBuf {
        self.programs
            .get(&version)
            .cloned()
            .unwrap_or_else(|| PathBuf::from(version.executable()))
    }

    /// `Available` only when every listed version can be started.
    pub fn availability(&self, versions: &[PythonVersion]) -> Tool {
        versions
            .iter()
            .map(|v| probe(self.program(*v).as_os_str(), "--version"))
            .find(|t| *t != Tool::Available)
            .unwrap_or(Tool::Available)
    }
}

// ── wheel inspection ──────────────────────────────────────────────────────────

/// Metadata read from a built wheel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WheelMetadata {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub requires_dist: Vec<String>,
    #[serde(default)]
    pub top_level: Vec<String>,
}

const READ_WHEEL: &str = r#"
import json, sys, zipfile
meta = {"name": "", "version": "", "requires_dist": [], "top_level": []}
with zipfile.ZipFile(sys.argv[1]) as wheel:
    for entry in wheel.namelist():
        if entry.endswith(".dist-info/METADATA"):
            for line in wheel.read(entry).decode("utf-8").splitlines():
                if not line.strip():
                    break
                key, _, value = line.partition(": ")
                if key == "Name":
                    meta["name"] = value
                elif key == "Version":
                    meta["version"] = value
                elif key == "Requires-Dist":
                    meta["requires_dist"].append(value)
        elif entry.endswith(".dist-info/top_level.txt"):
            meta["top_level"] = wheel.read(entry).decode("utf-8").split()
print(json.dumps(meta))
"#;

#[derive(Debug, Clone)]
pub struct PackageInspector {
    python: PathBuf,
}

impl Default for PackageInspector {
    fn default() -> Self {
        Self {
            python: program_from_env(PYTHON_ENV, "python3"),
        }
    }
}

impl PackageInspector {
    pub fn availability(&self) -> Tool {
        probe(self.python.as_os_str(), "--version")
    }

    #[instrument(skip(self))]
    pub fn inspect(&self, wheel: &Path) -> anyhow::Result<WheelMetadata> {
        let out = Command::new(&self.python)
            .arg("-c")
            .arg(READ_WHEEL)
            .arg(wheel)
            .output()
            .with_context(|| format!("starting {}", self.python.display()))?;
        if !out.status.success() {
            bail!(
                "reading {} failed: {}",
                wheel.display(),
                String::from_utf8_lossy(&out.stderr)
            );
        }
        serde_json::from_slice(&out.stdout)
            .with_context(|| format!("parsing metadata of {}", wheel.display()))
    }
}

/// Every `*.whl` under `<project>/dist`.
pub fn find_wheels(project_root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let dist = project_root.join("dist");
    if !dist.is_dir() {
        return Ok(Vec::new());
    }
    let mut wheels: Vec<PathBuf> = std::fs::read_dir(&dist)
        .with_context(|| format!("reading {}", dist.display()))?
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.extension() == Some(OsStr::new("whl")))
        .collect();
    wheels.sort();
    Ok(wheels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_program_is_unavailable() {
        let runner = BuildRunner::new("/definitely/not/a/make");
        assert!(matches!(runner.availability(), Tool::Unavailable(_)));
    }

    #[test]
    fn interpreters_report_the_first_missing_version() {
        let interpreters = Interpreters::default()
            .with_program(PythonVersion::V34, "/definitely/not/python3.4");
        match interpreters.availability(&[PythonVersion::V34, PythonVersion::V35]) {
            Tool::Unavailable(reason) => assert!(reason.contains("not/python3.4"), "{reason}"),
            Tool::Available => panic!("bogus interpreter reported available"),
        }
        assert_eq!(interpreters.availability(&[]), Tool::Available);
    }

    #[test]
    fn interpreters_default_to_versioned_executables() {
        let interpreters = Interpreters::default();
        assert_eq!(interpreters.program(PythonVersion::V27), PathBuf::from("python2.7"));
    }

    #[test]
    fn wheels_are_found_in_dist_only() {
        let tmp = TempDir::new().unwrap();
        assert!(find_wheels(tmp.path()).unwrap().is_empty());

        std::fs::create_dir_all(tmp.path().join("dist")).unwrap();
        std::fs::write(tmp.path().join("dist/pkg-0.1.0-py3-none-any.whl"), "").unwrap();
        std::fs::write(tmp.path().join("dist/pkg-0.1.0.tar.gz"), "").unwrap();

        let wheels = find_wheels(tmp.path()).unwrap();
        assert_eq!(wheels.len(), 1);
        assert!(wheels[0].ends_with("pkg-0.1.0-py3-none-any.whl"));
    }

    #[test]
    fn metadata_json_tolerates_missing_lists() {
        let meta: WheelMetadata =
            serde_json::from_str(r#"{"name": "widget_kit", "version": "1.2.3"}"#).unwrap();
        assert_eq!(meta.version, "1.2.3");
        assert!(meta.requires_dist.is_empty());
    }
}
