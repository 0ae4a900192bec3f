use chrono::{Local, SecondsFormat};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::parameters::ParameterMap;

/// File name of the breadcrumb inside a generated project.
pub const BREADCRUMB_FILE: &str = "hatchery-crumbs.json";

/// Diagnostic record of one generation run.
///
/// Written once, never read back by the generator. Field order is alphabetical
/// so that serialising the struct already yields sorted keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreadcrumbRecord {
    pub cookiecutter_params: ParameterMap,
    pub runtime_env: RuntimeEnv,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeEnv {
    pub current_time: String,
    pub generator_version: String,
    pub platform: String,
    pub run_id: String,
}

impl RuntimeEnv {
    /// Snapshot of the current process.
    pub fn capture() -> Self {
        Self {
            current_time: Local::now().to_rfc3339_opts(SecondsFormat::Micros, false),
            generator_version: crate::VERSION.to_string(),
            platform: format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH),
            run_id: Uuid::new_v4().to_string(),
        }
    }
}

impl BreadcrumbRecord {
    pub fn new(params: ParameterMap, runtime_env: RuntimeEnv) -> Self {
        Self {
            cookiecutter_params: params,
            runtime_env,
        }
    }
}
