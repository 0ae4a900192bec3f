//! Pip requirements files.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context as _, bail, ensure};
use regex::Regex;

static NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9][A-Za-z0-9._-]*)").expect("name pattern"));

pub const RUNTIME_FILE: &str = "requirements.txt";
pub const DEV_FILE: &str = "dev-requirements.txt";

/// Requirement names in `text`, skipping comments and pip options.
pub fn parse_requirements(text: &str) -> anyhow::Result<Vec<String>> {
    let mut names = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() || line.starts_with('-') {
            continue;
        }
        match NAME.captures(line) {
            Some(caps) => names.push(caps[1].to_string()),
            None => bail!("line {}: cannot parse requirement {raw:?}", idx + 1),
        }
    }
    Ok(names)
}

/// Name from a wheel `Requires-Dist` value such as `enum34<2.0.0,>=1.0.4; ...`.
pub fn requirement_name(spec: &str) -> Option<String> {
    NAME.captures(spec.trim()).map(|c| c[1].to_string())
}

/// PEP 503 normalisation, so `Flask` and `flask` compare equal.
pub fn normalize_name(name: &str) -> String {
    name.to_ascii_lowercase().replace(['_', '.'], "-")
}

#[derive(Debug, Clone)]
pub struct RequirementsSpec {
    project_root: PathBuf,
}

impl RequirementsSpec {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }

    /// Both files parse and name at least one requirement.  Returns the
    /// normalised runtime names.
    pub fn assert_requirements_files(&self) -> anyhow::Result<BTreeSet<String>> {
        let runtime = self.parse(RUNTIME_FILE)?;
        self.parse(DEV_FILE)?;
        Ok(runtime.iter().map(|n| normalize_name(n)).collect())
    }

    fn parse(&self, file: &str) -> anyhow::Result<Vec<String>> {
        let path = self.project_root.join(file);
        let text = read(&path)?;
        let names = parse_requirements(&text).with_context(|| path.display().to_string())?;
        ensure!(!names.is_empty(), "{} lists no requirements", path.display());
        Ok(names)
    }
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}
