//! Generation parameters: the flat string map, its schema, and the typed view.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{
    capabilities::{dependency_mode_def, flavor_def, python_mode_def},
    error::DomainError,
    validation::ParameterValidator,
    value_objects::{DependencyManagementMode, ProjectFlavor, PythonVersionMode},
};

/// Flat `key → value` mapping supplied once per generation run.
///
/// A `BTreeMap` so that iteration, and therefore every serialisation of it,
/// is key-sorted.
pub type ParameterMap = BTreeMap<String, String>;

/// Parse a `key=value` override as given on the command line.
pub fn parse_override(raw: &str) -> Result<(String, String), DomainError> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(DomainError::InvalidParameter {
            key: raw.to_string(),
            value: String::new(),
            reason: "overrides must be written as key=value".into(),
        }),
    }
}

// ── Schema ───────────────────────────────────────────────────────────────────

/// One declared parameter with its default and optional choice list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub key: String,
    pub default: String,
    /// `Some` for enumerated parameters; the first entry equals `default`.
    pub choices: Option<Vec<String>>,
}

/// Ordered parameter declarations of a template.
///
/// Built from a JSON object where a string value is a plain default and an
/// array value is a choice list whose first element is the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSchema {
    specs: Vec<ParameterSpec>,
}

impl ParameterSchema {
    pub fn new(specs: Vec<ParameterSpec>) -> Self {
        Self { specs }
    }

    pub fn from_json(value: &Value) -> Result<Self, DomainError> {
        let object = value.as_object().ok_or_else(|| {
            DomainError::InvalidTemplate("parameter schema must be a JSON object".into())
        })?;

        let mut specs = Vec::with_capacity(object.len());
        for (key, raw) in object {
            let spec = match raw {
                Value::String(s) => ParameterSpec {
                    key: key.clone(),
                    default: s.clone(),
                    choices: None,
                },
                Value::Number(n) => ParameterSpec {
                    key: key.clone(),
                    default: n.to_string(),
                    choices: None,
                },
                Value::Bool(b) => ParameterSpec {
                    key: key.clone(),
                    default: b.to_string(),
                    choices: None,
                },
                Value::Array(items) => {
                    let choices = items
                        .iter()
                        .map(|v| {
                            v.as_str().map(str::to_string).ok_or_else(|| {
                                DomainError::InvalidTemplate(format!(
                                    "choices for '{key}' must be strings"
                                ))
                            })
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    let default = choices.first().cloned().ok_or_else(|| {
                        DomainError::InvalidTemplate(format!("choice list for '{key}' is empty"))
                    })?;
                    ParameterSpec {
                        key: key.clone(),
                        default,
                        choices: Some(choices),
                    }
                }
                _ => {
                    return Err(DomainError::InvalidTemplate(format!(
                        "unsupported default for '{key}'"
                    )));
                }
            };
            specs.push(spec);
        }
        Ok(Self { specs })
    }

    pub fn specs(&self) -> &[ParameterSpec] {
        &self.specs
    }

    pub fn get(&self, key: &str) -> Option<&ParameterSpec> {
        self.specs.iter().find(|s| s.key == key)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn defaults(&self) -> ParameterMap {
        self.specs
            .iter()
            .map(|s| (s.key.clone(), s.default.clone()))
            .collect()
    }

    /// Layer `context` then `overrides` over the schema defaults.
    ///
    /// Later layers win; keys unknown to the schema are kept.
    pub fn resolve(&self, context: &ParameterMap, overrides: &ParameterMap) -> ParameterMap {
        let mut params = self.defaults();
        params.extend(context.iter().map(|(k, v)| (k.clone(), v.clone())));
        params.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        params
    }
}

// ── Typed view ───────────────────────────────────────────────────────────────

/// Validated, typed view of a [`ParameterMap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationParameters {
    raw: ParameterMap,
    pub flavor: ProjectFlavor,
    pub dependency_mode: DependencyManagementMode,
    pub python_mode: PythonVersionMode,
}

impl GenerationParameters {
    /// Validate `raw` and lift the enumerated fields.
    pub fn from_map(raw: ParameterMap) -> Result<Self, DomainError> {
        ParameterValidator::validate(&raw)?;
        let flavor = raw["project_flavor"].parse()?;
        let dependency_mode = raw["dependency_management_mode"].parse()?;
        let python_mode = raw["python_version_mode"].parse()?;
        Ok(Self {
            raw,
            flavor,
            dependency_mode,
            python_mode,
        })
    }

    pub fn as_map(&self) -> &ParameterMap {
        &self.raw
    }

    pub fn into_map(self) -> ParameterMap {
        self.raw
    }

    pub fn package_name(&self) -> &str {
        &self.raw["package_name"]
    }

    pub fn package_version(&self) -> &str {
        &self.raw["package_version"]
    }

    pub fn root_module_name(&self) -> &str {
        &self.raw["root_module_name"]
    }

    /// Values computed from the enumerated fields, exposed to templates as
    /// `derived.*`.
    pub fn derived(&self) -> Value {
        let python = python_mode_def(self.python_mode);
        let dependency = dependency_mode_def(self.dependency_mode);
        let flavor = flavor_def(self.flavor);

        let mut m = Map::new();
        m.insert("ci_language".into(), dependency.ci_shape.language().into());
        m.insert("ci_env".into(), python.ci_env.into());
        m.insert(
            "ci_matrix".into(),
            Value::Array(
                python
                    .ci_matrix()
                    .into_iter()
                    .map(|row| serde_json::json!({ "python": row.python, "env": row.env }))
                    .collect(),
            ),
        );
        m.insert("ci_fixed_environment".into(), dependency.ci_shape.has_env().into());
        m.insert("has_py27".into(), self.python_mode.has_py27().into());
        m.insert("has_py3".into(), self.python_mode.has_py3().into());
        m.insert(
            "python_nicknames".into(),
            python.versions.iter().map(|v| v.nickname()).collect::<Vec<_>>().into(),
        );
        m.insert(
            "python_versions".into(),
            python.versions.iter().map(|v| v.dotted()).collect::<Vec<_>>().into(),
        );
        m.insert(
            "python_repo_mode".into(),
            dependency.python_repo_mode.as_str().into(),
        );
        m.insert(
            "vagrant_box_mode".into(),
            dependency.vagrant_box_mode.as_str().into(),
        );
        m.insert(
            "extra_requirement".into(),
            flavor.extra_requirement.map_or(Value::Null, Value::from),
        );
        Value::Object(m)
    }
}
