//! Implementation of `hatchery generate`.
//!
//! Responsibility: turn CLI arguments and configuration into a
//! `GenerateRequest`, run the core pipeline, and display the report. No
//! business logic lives here.

use std::io::IsTerminal as _;
use std::path::PathBuf;

use serde_json::json;
use tracing::{debug, info, instrument};

use hatchery_adapters::{DirectoryTemplateStore, JinjaRenderer, LocalFilesystem};
use hatchery_core::{
    application::{GenerateRequest, GenerateService, GenerationReport},
    domain::{ParameterMap, parse_override},
};

use crate::{
    cli::GenerateArgs,
    commands::resolve_template,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute `hatchery generate`.
///
/// 1. Resolve the template directory
/// 2. Parse `--param` overrides
/// 3. Prompt for the remaining parameters when interactive
/// 4. Run the pipeline (or a dry run)
/// 5. Report
#[instrument(skip_all)]
pub fn execute(args: GenerateArgs, config: AppConfig, output: &OutputManager) -> CliResult<()> {
    let template = resolve_template(args.template.clone(), &config)?;
    let mut overrides = parse_params(&args.params)?;

    let no_input = args.no_input || config.no_input;
    let interactive = !no_input && !output.is_json() && std::io::stdin().is_terminal();
    debug!(template = %template.display(), interactive, "generate resolved");

    if interactive {
        overrides = prompt::collect(&template, &config.default_context, overrides)?;
    }

    let request = build_request(template, &args, &config, overrides);

    let store = Box::new(DirectoryTemplateStore::new());
    let renderer = Box::new(JinjaRenderer::new());
    let filesystem = Box::new(LocalFilesystem::new());
    let service = GenerateService::new(store, renderer, filesystem);

    let spinner = output.spinner("Generating project...");
    let result = service.generate(&request);
    spinner.finish_and_clear();
    let report = result?;

    info!(project = %report.project_dir.display(), files = report.files_written, "generate finished");
    show_report(&report, output)
}

fn parse_params(raw: &[String]) -> CliResult<ParameterMap> {
    raw.iter()
        .map(|p| parse_override(p).map_err(|e| CliError::Core(e.into())))
        .collect()
}

fn build_request(
    template: PathBuf,
    args: &GenerateArgs,
    config: &AppConfig,
    overrides: ParameterMap,
) -> GenerateRequest {
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.output_dir.clone());

    GenerateRequest::new(template, output_dir)
        .with_context(config.default_context.clone())
        .with_overrides(overrides)
        .overwrite_if_exists(args.overwrite_if_exists || config.overwrite_if_exists)
        .dry_run(args.dry_run)
}

fn show_report(report: &GenerationReport, output: &OutputManager) -> CliResult<()> {
    if output.is_json() {
        output.json(&json!({
            "template": report.template_id,
            "project_dir": report.project_dir,
            "dry_run": report.dry_run,
            "files_written": report.files_written,
            "flavor_files": report.flavor_files,
            "removed": report.removed,
            "breadcrumb": report.breadcrumb,
            "params": report.params,
        }))?;
        return Ok(());
    }

    if report.dry_run {
        output.info(&format!(
            "Dry run: would create {} from '{}'",
            report.project_dir.display(),
            report.template_id
        ))?;
        for (key, value) in &report.params {
            output.print(&format!("  {key:<28} {value}"))?;
        }
        return Ok(());
    }

    output.success(&format!(
        "Created {} ({} files)",
        report.project_dir.display(),
        report.files_written
    ))?;
    if let Some(flavor) = report.params.get("project_flavor") {
        output.print(&format!(
            "  flavor {flavor}: {} files tailored in",
            report.flavor_files.len()
        ))?;
    }
    output.print("")?;
    output.header("Next steps:")?;
    output.print(&format!("  cd {}", report.project_dir.display()))?;
    output.print("  make")?;
    Ok(())
}

// ── Prompting ─────────────────────────────────────────────────────────────────

#[cfg(feature = "interactive")]
mod prompt {
    use std::path::Path;

    use dialoguer::{Confirm, Input, Select};

    use hatchery_adapters::DirectoryTemplateStore;
    use hatchery_core::application::TemplateService;
    use hatchery_core::domain::ParameterMap;

    use crate::commands::inspect::choice_label;
    use crate::error::{CliError, CliResult};

    /// Ask for every parameter not already overridden.  Defaults shown are
    /// the configured context value, falling back to the template's.
    pub fn collect(
        template: &Path,
        context: &ParameterMap,
        mut overrides: ParameterMap,
    ) -> CliResult<ParameterMap> {
        let info = TemplateService::new(Box::new(DirectoryTemplateStore::new())).inspect(template)?;

        for spec in &info.parameters {
            if overrides.contains_key(&spec.key) {
                continue;
            }
            let default = context.get(&spec.key).unwrap_or(&spec.default);
            let value = match &spec.choices {
                Some(choices) => {
                    let current = choices.iter().position(|c| c == default).unwrap_or(0);
                    let labels: Vec<String> =
                        choices.iter().map(|c| choice_label(&spec.key, c)).collect();
                    let picked = Select::new()
                        .with_prompt(&spec.key)
                        .items(&labels)
                        .default(current)
                        .interact()
                        .map_err(prompt_failed)?;
                    choices[picked].clone()
                }
                None => Input::<String>::new()
                    .with_prompt(&spec.key)
                    .default(default.clone())
                    .interact_text()
                    .map_err(prompt_failed)?,
            };
            overrides.insert(spec.key.clone(), value);
        }

        let go = Confirm::new()
            .with_prompt("Generate the project?")
            .default(true)
            .interact()
            .map_err(prompt_failed)?;
        if !go {
            return Err(CliError::Cancelled);
        }
        Ok(overrides)
    }

    fn prompt_failed(e: dialoguer::Error) -> CliError {
        CliError::IoError {
            message: "Failed to read user input".into(),
            source: std::io::Error::other(e),
        }
    }
}

#[cfg(not(feature = "interactive"))]
mod prompt {
    use std::path::Path;

    use hatchery_core::domain::ParameterMap;

    use crate::error::{CliError, CliResult};

    pub fn collect(_: &Path, _: &ParameterMap, _: ParameterMap) -> CliResult<ParameterMap> {
        Err(CliError::FeatureNotAvailable {
            feature: "interactive",
        })
    }
}
