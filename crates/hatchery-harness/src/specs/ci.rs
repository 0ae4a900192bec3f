//! `.travis.yml` shape per dependency-management mode.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context as _, anyhow, ensure};
use serde_yaml::{Mapping, Value};

use hatchery_core::domain::capabilities::{dependency_mode_def, python_mode_def};
use hatchery_core::domain::{DependencyManagementMode, PythonVersionMode};

pub const CI_FILE: &str = ".travis.yml";

const ALWAYS: &[&str] = &["language", "install", "script"];

#[derive(Debug, Clone)]
pub struct CiConfigSpec {
    project_root: PathBuf,
}

impl CiConfigSpec {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }

    pub fn assert_ci_file(
        &self,
        dependency_mode: DependencyManagementMode,
        python_mode: PythonVersionMode,
    ) -> anyhow::Result<()> {
        let path = self.project_root.join(CI_FILE);
        let text =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        check_ci_text(&text, dependency_mode, python_mode)
            .with_context(|| format!("{} for {dependency_mode}/{python_mode}", path.display()))
    }
}

/// Validate CI config text against the expected shape.
pub fn check_ci_text(
    text: &str,
    dependency_mode: DependencyManagementMode,
    python_mode: PythonVersionMode,
) -> anyhow::Result<()> {
    let doc: Value = serde_yaml::from_str(text)?;
    let doc = doc
        .as_mapping()
        .ok_or_else(|| anyhow!("top level is not a mapping"))?;

    for key in ALWAYS {
        ensure!(doc.contains_key(*key), "missing '{key}'");
    }

    let shape = dependency_mode_def(dependency_mode).ci_shape;
    let python = python_mode_def(python_mode);

    let language = doc.get("language").and_then(Value::as_str);
    ensure!(
        language == Some(shape.language()),
        "language is {language:?}, expected {:?}",
        shape.language()
    );
    ensure!(
        doc.contains_key("env") == shape.has_env(),
        "'env' presence should be {}",
        shape.has_env()
    );
    ensure!(
        doc.contains_key("matrix") == shape.has_matrix(),
        "'matrix' presence should be {}",
        shape.has_matrix()
    );
    ensure!(
        doc.contains_key("deploy") == shape.has_deploy(),
        "'deploy' presence should be {}",
        shape.has_deploy()
    );

    if shape.has_env() {
        let env = strings(doc, "env")?;
        ensure!(env == [python.ci_env], "env is {env:?}, expected [{:?}]", python.ci_env);
    }

    if shape.has_matrix() {
        let include = doc
            .get("matrix")
            .and_then(|m| m.get("include"))
            .and_then(Value::as_sequence)
            .ok_or_else(|| anyhow!("'matrix.include' is not a list"))?;
        let found: Vec<(Option<&str>, Option<&str>)> = include
            .iter()
            .map(|row| {
                (
                    row.get("python").and_then(Value::as_str),
                    row.get("env").and_then(Value::as_str),
                )
            })
            .collect();
        let expected: Vec<(Option<&str>, Option<&str>)> = python
            .ci_matrix()
            .iter()
            .map(|row| (Some(row.python), Some(row.env)))
            .collect();
        ensure!(found == expected, "matrix rows {found:?}, expected {expected:?}");
    }

    Ok(())
}

fn strings<'a>(doc: &'a Mapping, key: &str) -> anyhow::Result<Vec<&'a str>> {
    doc.get(key)
        .and_then(Value::as_sequence)
        .ok_or_else(|| anyhow!("'{key}' is not a list"))?
        .iter()
        .map(|v| v.as_str().ok_or_else(|| anyhow!("'{key}' holds a non-string")))
        .collect()
}
