//! Drives one combination end to end and classifies the result.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, ensure};
use tracing::{info, instrument, warn};

use hatchery_adapters::DirectoryTemplateStore;
use hatchery_core::application::TemplateService;
use hatchery_core::domain::ParameterMap;
use hatchery_core::domain::capabilities::python_mode_def;

use crate::build::{
    BuildRunner, Interpreters, PackageInspector, Tool, WheelMetadata, find_wheels,
};
use crate::combination::Combination;
use crate::invoke::Invoker;
use crate::output_dir::OutputDirectoryManager;
use crate::specs::filesystem::{EXECUTABLE_SCRIPTS, FileSystemSpec};
use crate::specs::requirements::{normalize_name, requirement_name};
use crate::specs::{CiConfigSpec, MakefileSpec, RequirementsSpec};
use crate::vm::VagrantRunner;

/// Set to `1` to run `make` and inspect wheels.
pub const BUILD_ENV: &str = "HATCHERY_HARNESS_BUILD";
/// Set to `1` to keep output directories of passing cases.
pub const RETAIN_ENV: &str = "HATCHERY_HARNESS_RETAIN";

/// Result of one combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    /// A required tool is missing; not a failure.
    Skipped { reason: String },
    Failed { reason: String },
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => f.write_str("passed"),
            Self::Skipped { reason } => write!(f, "skipped: {reason}"),
            Self::Failed { reason } => write!(f, "FAILED: {reason}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HarnessOptions {
    pub template_dir: PathBuf,
    pub root_output: PathBuf,
    /// Run `make` after the static checks.
    pub build: bool,
    /// Keep output directories of passing cases.
    pub retain: bool,
}

impl HarnessOptions {
    pub fn new(template_dir: impl Into<PathBuf>, root_output: impl Into<PathBuf>) -> Self {
        Self {
            template_dir: template_dir.into(),
            root_output: root_output.into(),
            build: false,
            retain: false,
        }
    }

    /// Pick up [`BUILD_ENV`] and [`RETAIN_ENV`].
    pub fn with_env(mut self) -> Self {
        let on = |var: &str| {
            std::env::var(var).is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        };
        self.build |= on(BUILD_ENV);
        self.retain |= on(RETAIN_ENV);
        self
    }
}

/// One combination with its outcome.
#[derive(Debug, Clone)]
pub struct CaseReport {
    pub combination: Combination,
    pub outcome: Outcome,
}

pub struct Harness<I: Invoker> {
    invoker: I,
    options: HarnessOptions,
    builder: BuildRunner,
    inspector: PackageInspector,
    interpreters: Interpreters,
    vagrant: VagrantRunner,
}

impl<I: Invoker> Harness<I> {
    pub fn new(invoker: I, options: HarnessOptions) -> Self {
        Self {
            invoker,
            options,
            builder: BuildRunner::default(),
            inspector: PackageInspector::default(),
            interpreters: Interpreters::default(),
            vagrant: VagrantRunner::default(),
        }
    }

    pub fn with_tools(mut self, builder: BuildRunner, inspector: PackageInspector) -> Self {
        self.builder = builder;
        self.inspector = inspector;
        self
    }

    pub fn with_interpreters(mut self, interpreters: Interpreters) -> Self {
        self.interpreters = interpreters;
        self
    }

    pub fn with_vagrant(mut self, vagrant: VagrantRunner) -> Self {
        self.vagrant = vagrant;
        self
    }

    /// Run every combination; one failing does not stop the rest.
    pub fn run_all(&self, combinations: &[Combination]) -> Vec<CaseReport> {
        combinations
            .iter()
            .map(|c| CaseReport {
                combination: c.clone(),
                outcome: self.run(c),
            })
            .collect()
    }

    #[instrument(skip_all, fields(case = %combination))]
    pub fn run(&self, combination: &Combination) -> Outcome {
        let dir = OutputDirectoryManager::new(
            &self.options.root_output,
            self.invoker.prefix(),
            combination,
        );
        let outcome = self.check(combination, &dir);
        self.finish(&dir, outcome)
    }

    /// Generate the project and run `make` inside its build VM.
    #[instrument(skip_all, fields(case = %combination))]
    pub fn run_in_vm(&self, combination: &Combination) -> Outcome {
        let dir = OutputDirectoryManager::new(&self.options.root_output, "build", combination);
        let outcome = self.check_in_vm(combination, &dir);
        self.finish(&dir, outcome)
    }

    /// Run every combination in the build VM.
    pub fn run_all_in_vm(&self, combinations: &[Combination]) -> Vec<CaseReport> {
        combinations
            .iter()
            .map(|c| CaseReport {
                combination: c.clone(),
                outcome: self.run_in_vm(c),
            })
            .collect()
    }

    fn finish(&self, dir: &OutputDirectoryManager, result: anyhow::Result<Outcome>) -> Outcome {
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => Outcome::Failed {
                reason: format!("{e:#}"),
            },
        };

        match &outcome {
            Outcome::Failed { reason } => {
                warn!(%reason, dir = %dir.path().display(), "case failed; output kept");
            }
            _ if self.options.retain || !dir.path().exists() => {}
            _ => {
                if let Err(e) = dir.tear_down() {
                    warn!(error = %e, "could not remove output directory");
                }
            }
        }
        info!(%outcome, "case finished");
        outcome
    }

    fn check(
        &self,
        combination: &Combination,
        dir: &OutputDirectoryManager,
    ) -> anyhow::Result<Outcome> {
        let params = self.parameters(combination)?;
        dir.setup(combination, &params)?;

        let project = self
            .invoker
            .generate(&self.options.template_dir, dir.path(), &params)
            .context("generation")?;
        ensure!(
            project.ends_with(&params["package_name"]),
            "project generated at {}, expected {}",
            project.display(),
            dir.project_path(&params["package_name"]).display()
        );

        // (a) + (b)
        let mut layout = FileSystemSpec::new(&project);
        layout.specify_by_project_flavor(
            &self.options.template_dir,
            combination.flavor,
            &params["root_module_name"],
        )?;
        for script in EXECUTABLE_SCRIPTS {
            layout.specify_executable(*script);
        }
        layout.assert_all()?;

        // (c)
        let requirements = RequirementsSpec::new(&project).assert_requirements_files()?;
        // (d)
        CiConfigSpec::new(&project)
            .assert_ci_file(combination.dependency_mode, combination.python_mode)?;
        // (e)
        MakefileSpec::new(&project).assert_makefile()?;

        if !self.options.build {
            return Ok(Outcome::Passed);
        }
        let versions = python_mode_def(combination.python_mode).versions;
        if let Tool::Unavailable(reason) = self.interpreters.availability(versions) {
            return Ok(Outcome::Skipped { reason });
        }
        if let Tool::Unavailable(reason) = self.builder.availability() {
            return Ok(Outcome::Skipped { reason });
        }
        self.builder.run(&project, &combination.make_args())?;

        if !combination.should_build_wheel() {
            return Ok(Outcome::Passed);
        }
        self.check_wheels(&project, &params, &requirements)
    }

    fn check_in_vm(
        &self,
        combination: &Combination,
        dir: &OutputDirectoryManager,
    ) -> anyhow::Result<Outcome> {
        if let Tool::Unavailable(reason) = self.vagrant.availability() {
            return Ok(Outcome::Skipped { reason });
        }
        let params = self.parameters(combination)?;
        dir.setup(combination, &params)?;

        let project = self
            .invoker
            .generate(&self.options.template_dir, dir.path(), &params)
            .context("generation")?;
        self.vagrant.prepare_repo(&project)?;
        self.vagrant.build(&project, &params["package_name"])?;
        Ok(Outcome::Passed)
    }

    fn check_wheels(
        &self,
        project: &Path,
        params: &ParameterMap,
        requirements: &BTreeSet<String>,
    ) -> anyhow::Result<Outcome> {
        let wheels = find_wheels(project)?;
        ensure!(!wheels.is_empty(), "no wheel in {}/dist", project.display());

        if let Tool::Unavailable(reason) = self.inspector.availability() {
            return Ok(Outcome::Skipped { reason });
        }
        for wheel in &wheels {
            let meta = self.inspector.inspect(wheel)?;
            check_wheel_metadata(&meta, params, requirements)
                .with_context(|| wheel.display().to_string())?;
        }
        Ok(Outcome::Passed)
    }

    /// Template defaults overlaid with the combination's modes.
    fn parameters(&self, combination: &Combination) -> anyhow::Result<ParameterMap> {
        let info = TemplateService::new(Box::new(DirectoryTemplateStore::new()))
            .inspect(&self.options.template_dir)?;
        let mut params: ParameterMap = info
            .parameters
            .into_iter()
            .map(|spec| (spec.key, spec.default))
            .collect();
        params.extend(combination.overrides());
        Ok(params)
    }
}

/// Wheel name, version, top-level module and dependencies match the inputs.
pub fn check_wheel_metadata(
    meta: &WheelMetadata,
    params: &ParameterMap,
    requirements: &BTreeSet<String>,
) -> anyhow::Result<()> {
    let expected_name = params["package_name"].replace('-', "_");
    ensure!(
        meta.name.replace('-', "_") == expected_name,
        "wheel name {:?}, expected {expected_name:?}",
        meta.name
    );
    ensure!(
        meta.version == params["package_version"],
        "wheel version {:?}, expected {:?}",
        meta.version,
        params["package_version"]
    );
    ensure!(
        meta.top_level.iter().any(|t| *t == params["root_module_name"]),
        "top_level {:?} lacks {:?}",
        meta.top_level,
        params["root_module_name"]
    );

    let declared: BTreeSet<String> = meta
        .requires_dist
        .iter()
        .filter_map(|r| requirement_name(r))
        .map(|n| normalize_name(&n))
        .collect();
    ensure!(
        &declared == requirements,
        "Requires-Dist {declared:?} differs from requirements.txt {requirements:?}"
    );
    Ok(())
}
