//! Parameter combinations the harness drives the generator through.

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;

use hatchery_core::domain::{
    DependencyManagementMode, ParameterMap, ProjectFlavor, PythonVersionMode,
};

// ── Make targets ──────────────────────────────────────────────────────────────

/// Every target the generated Makefile must define.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MakeTarget {
    All,
    Build,
    Clean,
    CleanAll,
    CleanCoverage,
    CleanDist,
    CleanDocs,
    CleanLogs,
    CleanPyc,
    CleanTox,
    CleanToxOutput,
    Develop,
    Docs,
    DocsDraft,
    FormatWithYapf,
    IntegrationTests,
    Lint,
    LintTests,
    Tests,
    TestWheel,
    SystemTests,
    UnitTests,
    Wheel,
}

impl MakeTarget {
    pub const ALL: [Self; 23] = [
        Self::All,
        Self::Build,
        Self::Clean,
        Self::CleanAll,
        Self::CleanCoverage,
        Self::CleanDist,
        Self::CleanDocs,
        Self::CleanLogs,
        Self::CleanPyc,
        Self::CleanTox,
        Self::CleanToxOutput,
        Self::Develop,
        Self::Docs,
        Self::DocsDraft,
        Self::FormatWithYapf,
        Self::IntegrationTests,
        Self::Lint,
        Self::LintTests,
        Self::Tests,
        Self::TestWheel,
        Self::SystemTests,
        Self::UnitTests,
        Self::Wheel,
    ];

    /// The Makefile's `.DEFAULT_GOAL`.
    pub const DEFAULT: Self = Self::All;

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Build => "build",
            Self::Clean => "clean",
            Self::CleanAll => "clean_all",
            Self::CleanCoverage => "clean_coverage",
            Self::CleanDist => "clean_dist",
            Self::CleanDocs => "clean_docs",
            Self::CleanLogs => "clean_logs",
            Self::CleanPyc => "clean_pyc",
            Self::CleanTox => "clean_tox",
            Self::CleanToxOutput => "clean_tox_output",
            Self::Develop => "develop",
            Self::Docs => "docs",
            Self::DocsDraft => "docs_draft",
            Self::FormatWithYapf => "format_with_yapf",
            Self::IntegrationTests => "integration_tests",
            Self::Lint => "lint",
            Self::LintTests => "lint_tests",
            Self::Tests => "tests",
            Self::TestWheel => "test_wheel",
            Self::SystemTests => "system_tests",
            Self::UnitTests => "unit_tests",
            Self::Wheel => "wheel",
        }
    }

    /// Direct prerequisites of this target in the generated Makefile.
    pub fn dependencies(self) -> &'static [MakeTarget] {
        use MakeTarget::*;
        match self {
            All => &[Clean, Build, Lint, LintTests, Docs, Wheel],
            Clean => &[
                CleanCoverage,
                CleanDist,
                CleanDocs,
                CleanLogs,
                CleanPyc,
                CleanToxOutput,
            ],
            CleanAll => &[Clean, CleanTox],
            TestWheel => &[Wheel],
            _ => &[],
        }
    }

    /// Whether running `make <targets>` leaves a wheel in `dist/`.
    ///
    /// An empty list runs the default goal.
    pub fn should_build_wheel(targets: &[MakeTarget]) -> bool {
        if targets.is_empty() {
            return Self::should_build_wheel(&[Self::DEFAULT]);
        }
        targets
            .iter()
            .any(|t| *t == Self::Wheel || t.dependencies().contains(&Self::Wheel))
    }

    /// Targets the default goal never reaches, those with prerequisites first.
    pub fn not_called_by_default() -> Vec<MakeTarget> {
        let called = Self::DEFAULT.dependencies();
        let candidates = Self::ALL.into_iter().filter(|t| !called.contains(t));
        let (apex, leaves): (Vec<_>, Vec<_>) =
            candidates.partition(|t| !t.dependencies().is_empty());
        apex.into_iter().chain(leaves).collect()
    }
}

impl fmt::Display for MakeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MakeTarget {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| anyhow!("unknown make target '{s}'"))
    }
}

// ── Combination ───────────────────────────────────────────────────────────────

/// One harness case: the three enumerated parameters plus the make targets
/// to run after generation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Combination {
    pub dependency_mode: DependencyManagementMode,
    pub flavor: ProjectFlavor,
    pub python_mode: PythonVersionMode,
    /// Empty means the Makefile's default goal.
    pub make_targets: Vec<MakeTarget>,
}

impl Combination {
    pub fn new(
        dependency_mode: DependencyManagementMode,
        flavor: ProjectFlavor,
        python_mode: PythonVersionMode,
    ) -> Self {
        Self {
            dependency_mode,
            flavor,
            python_mode,
            make_targets: Vec::new(),
        }
    }

    pub fn with_make_targets(mut self, targets: impl IntoIterator<Item = MakeTarget>) -> Self {
        self.make_targets = targets.into_iter().collect();
        self
    }

    /// Parameter overrides this combination contributes.
    pub fn overrides(&self) -> ParameterMap {
        [
            ("dependency_management_mode", self.dependency_mode.as_str()),
            ("project_flavor", self.flavor.as_str()),
            ("python_version_mode", self.python_mode.as_str()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    /// Targets as `make` arguments.
    pub fn make_args(&self) -> Vec<&'static str> {
        self.make_targets.iter().map(MakeTarget::as_str).collect()
    }

    /// Targets that actually run; the default goal when none were named.
    pub fn effective_targets(&self) -> Vec<MakeTarget> {
        if self.make_targets.is_empty() {
            vec![MakeTarget::DEFAULT]
        } else {
            self.make_targets.clone()
        }
    }

    pub fn should_build_wheel(&self) -> bool {
        MakeTarget::should_build_wheel(&self.make_targets)
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let targets = if self.make_targets.is_empty() {
            "<default>".to_string()
        } else {
            self.make_args().join(" ")
        };
        write!(
            f,
            "{}/{}/{} make {targets}",
            self.dependency_mode, self.flavor, self.python_mode
        )
    }
}

/// Every flavor under every Python mode, then the default flavor and Python
/// mode under every dependency mode.
pub fn defaults() -> Vec<Combination> {
    let by_flavor = ProjectFlavor::ALL.into_iter().flat_map(|flavor| {
        PythonVersionMode::ALL.into_iter().map(move |python_mode| {
            Combination::new(DependencyManagementMode::default(), flavor, python_mode)
        })
    });
    let by_dependency_mode = DependencyManagementMode::ALL.into_iter().map(|mode| {
        Combination::new(mode, ProjectFlavor::default(), PythonVersionMode::default())
    });

    let mut out: Vec<Combination> = Vec::new();
    for combo in by_flavor.chain(by_dependency_mode) {
        if !out.contains(&combo) {
            out.push(combo);
        }
    }
    out
}

/// The library flavor with default modes, once per target the default goal
/// does not reach.
pub fn non_defaults() -> Vec<Combination> {
    MakeTarget::not_called_by_default()
        .into_iter()
        .map(|target| {
            Combination::new(
                DependencyManagementMode::default(),
                ProjectFlavor::Library,
                PythonVersionMode::default(),
            )
            .with_make_targets([target])
        })
        .collect()
}

/// Every Python mode under every dependency mode, default flavor.
fn mode_matrix() -> Vec<Combination> {
    DependencyManagementMode::ALL
        .into_iter()
        .flat_map(|mode| {
            PythonVersionMode::ALL.into_iter().map(move |python_mode| {
                Combination::new(mode, ProjectFlavor::default(), python_mode)
            })
        })
        .collect()
}

/// Cases for the CI configuration checks: both CI shapes with every
/// interpreter set.
pub fn ci_combinations() -> Vec<Combination> {
    mode_matrix()
}

/// Cases for the build VM; the Vagrant box follows the dependency mode.
pub fn build_vm_combinations() -> Vec<Combination> {
    mode_matrix()
}

// ── Filter ────────────────────────────────────────────────────────────────────

pub const ONLY_DEPENDENCY_MODE_ENV: &str = "HATCHERY_ONLY_DEPENDENCY_MODE";
pub const ONLY_FLAVOR_ENV: &str = "HATCHERY_ONLY_FLAVOR";
pub const ONLY_PYTHON_MODE_ENV: &str = "HATCHERY_ONLY_PYTHON_MODE";
pub const ONLY_MAKE_TARGET_ENV: &str = "HATCHERY_ONLY_MAKE_TARGET";

/// Narrows a combination set; `None` on a dimension keeps everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarnessFilter {
    pub dependency_mode: Option<DependencyManagementMode>,
    pub flavor: Option<ProjectFlavor>,
    pub python_mode: Option<PythonVersionMode>,
    pub make_target: Option<MakeTarget>,
}

impl HarnessFilter {
    /// Read the `HATCHERY_ONLY_*` variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        fn parse<T: FromStr>(raw: Option<String>, key: &str) -> anyhow::Result<Option<T>>
        where
            T::Err: fmt::Display,
        {
            match raw.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                None => Ok(None),
                Some(v) => v
                    .parse()
                    .map(Some)
                    .map_err(|e| anyhow!("{key}={v}: {e}")),
            }
        }

        Ok(Self {
            dependency_mode: parse(lookup(ONLY_DEPENDENCY_MODE_ENV), ONLY_DEPENDENCY_MODE_ENV)?,
            flavor: parse(lookup(ONLY_FLAVOR_ENV), ONLY_FLAVOR_ENV)?,
            python_mode: parse(lookup(ONLY_PYTHON_MODE_ENV), ONLY_PYTHON_MODE_ENV)?,
            make_target: parse(lookup(ONLY_MAKE_TARGET_ENV), ONLY_MAKE_TARGET_ENV)?,
        })
    }

    pub fn matches(&self, combo: &Combination) -> bool {
        self.dependency_mode.is_none_or(|m| m == combo.dependency_mode)
            && self.flavor.is_none_or(|f| f == combo.flavor)
            && self.python_mode.is_none_or(|m| m == combo.python_mode)
            && self
                .make_target
                .is_none_or(|t| combo.effective_targets().contains(&t))
    }

    pub fn apply(&self, combos: Vec<Combination>) -> Vec<Combination> {
        combos.into_iter().filter(|c| self.matches(c)).collect()
    }
}
