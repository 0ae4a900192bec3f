//! Ways of running the generator: in-process or through the binary.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context as _, anyhow, bail};
use tracing::{debug, instrument};

use hatchery_adapters::{DirectoryTemplateStore, JinjaRenderer, LocalFilesystem};
use hatchery_core::application::{GenerateRequest, GenerateService};
use hatchery_core::domain::ParameterMap;

/// Generates one project and returns its directory.
pub trait Invoker {
    /// Output directory prefix, e.g. `api`.
    fn prefix(&self) -> &'static str;

    fn generate(
        &self,
        template: &Path,
        output_dir: &Path,
        params: &ParameterMap,
    ) -> anyhow::Result<PathBuf>;
}

/// Calls `GenerateService` directly.
pub struct ApiInvoker {
    service: GenerateService,
}

impl Default for ApiInvoker {
    fn default() -> Self {
        Self {
            service: GenerateService::new(
                Box::new(DirectoryTemplateStore::new()),
                Box::new(JinjaRenderer::new()),
                Box::new(LocalFilesystem::new()),
            ),
        }
    }
}

impl Invoker for ApiInvoker {
    fn prefix(&self) -> &'static str {
        "api"
    }

    #[instrument(skip_all, fields(via = "api"))]
    fn generate(
        &self,
        template: &Path,
        output_dir: &Path,
        params: &ParameterMap,
    ) -> anyhow::Result<PathBuf> {
        let request = GenerateRequest::new(template, output_dir).with_overrides(params.clone());
        let report = self.service.generate(&request)?;
        Ok(report.project_dir)
    }
}

/// Runs `hatchery generate --no-input` as a subprocess.
pub struct CliInvoker {
    binary: PathBuf,
}

impl CliInvoker {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Invoker for CliInvoker {
    fn prefix(&self) -> &'static str {
        "cli"
    }

    #[instrument(skip_all, fields(via = "cli"))]
    fn generate(
        &self,
        template: &Path,
        output_dir: &Path,
        params: &ParameterMap,
    ) -> anyhow::Result<PathBuf> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("generate")
            .arg(template)
            .arg("--no-input")
            .arg("--output-dir")
            .arg(output_dir)
            .args(["--output-format", "json"])
            .env("NO_COLOR", "1");
        for (key, value) in params {
            cmd.arg("--param").arg(format!("{key}={value}"));
        }
        debug!(command = ?cmd, "invoking generator");

        let out = cmd
            .output()
            .with_context(|| format!("starting {}", self.binary.display()))?;
        if !out.status.success() {
            bail!(
                "generator exited with {}\n{}",
                out.status,
                String::from_utf8_lossy(&out.stderr)
            );
        }

        let report: serde_json::Value =
            serde_json::from_slice(&out.stdout).context("parsing generator JSON report")?;
        report["project_dir"]
            .as_str()
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!("report has no project_dir"))
    }
}
