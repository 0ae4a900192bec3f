//! Derived-property registries for the enumerated parameters.
//!
//! Every closed choice (flavor, dependency-management mode, Python-version
//! mode) is described exactly once by a `*Def` entry. Everything downstream
//! (template context, tailoring, the output checks in the harness) reads
//! these tables instead of matching on the enums directly.
//!
//! # Adding a New Flavor
//!
//! 1. Add a variant to `ProjectFlavor` in `value_objects.rs`
//! 2. Add one [`FlavorDef`] entry to [`FLAVOR_REGISTRY`]
//! 3. Add its staging subtree to the template

use crate::domain::value_objects::{
    DependencyManagementMode, ProjectFlavor, PythonRepoMode, PythonVersion, PythonVersionMode,
    VagrantBoxMode,
};

/// Name of the staging root inside a freshly rendered project.
pub const STAGING_DIR: &str = "cookiecutter-project-flavors";

// ── Flavor definitions ───────────────────────────────────────────────────────

/// One staged subdirectory and where it lands in the final tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlavorSubdir {
    /// Lands at the root module, whose name is a parameter.
    RootModule,
    Fixed(&'static str),
}

impl FlavorSubdir {
    /// Resolve the directory name for a given root module.
    pub fn resolve<'a>(&self, root_module_name: &'a str) -> &'a str {
        match self {
            Self::RootModule => root_module_name,
            Self::Fixed(name) => *name,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FlavorDef {
    pub flavor: ProjectFlavor,

    /// Human-facing label for prompts and `inspect`.
    pub label: &'static str,

    /// Subdirectories copied from `<staging>/<flavor>/` into the project root.
    ///
    /// Missing ones are skipped at tailoring time.
    pub subdirs: &'static [FlavorSubdir],

    /// Extra runtime requirement the flavor pulls in, if any.
    pub extra_requirement: Option<&'static str>,
}

const STANDARD_SUBDIRS: &[FlavorSubdir] = &[
    FlavorSubdir::RootModule,
    FlavorSubdir::Fixed("tests"),
    FlavorSubdir::Fixed("sphinx_docs"),
    FlavorSubdir::Fixed("vagrant"),
];

pub static FLAVOR_REGISTRY: &[FlavorDef] = &[
    FlavorDef {
        flavor: ProjectFlavor::BareBones,
        label: "bare bones package",
        subdirs: STANDARD_SUBDIRS,
        extra_requirement: None,
    },
    FlavorDef {
        flavor: ProjectFlavor::Library,
        label: "reusable library",
        subdirs: STANDARD_SUBDIRS,
        extra_requirement: None,
    },
    FlavorDef {
        flavor: ProjectFlavor::CliApp,
        label: "command-line application",
        subdirs: STANDARD_SUBDIRS,
        extra_requirement: None,
    },
    FlavorDef {
        flavor: ProjectFlavor::FlaskApp,
        label: "Flask web-service skeleton",
        subdirs: STANDARD_SUBDIRS,
        extra_requirement: Some("Flask"),
    },
];

pub fn flavor_def(flavor: ProjectFlavor) -> &'static FlavorDef {
    FLAVOR_REGISTRY
        .iter()
        .find(|d| d.flavor == flavor)
        .unwrap_or(&FLAVOR_REGISTRY[0])
}

// ── Dependency-management definitions ────────────────────────────────────────

/// The two shapes a generated `.travis.yml` can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CiShape {
    /// One prebuilt build image, tox env list in `env`, and a `deploy` stage.
    FixedEnvironment { language: &'static str },
    /// Stock Python language with a `matrix.include` row per interpreter.
    PythonMatrix { language: &'static str },
}

impl CiShape {
    pub const fn language(&self) -> &'static str {
        match self {
            Self::FixedEnvironment { language } | Self::PythonMatrix { language } => *language,
        }
    }

    pub const fn has_matrix(&self) -> bool {
        matches!(self, Self::PythonMatrix { .. })
    }

    pub const fn has_env(&self) -> bool {
        matches!(self, Self::FixedEnvironment { .. })
    }

    pub const fn has_deploy(&self) -> bool {
        matches!(self, Self::FixedEnvironment { .. })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DependencyModeDef {
    pub mode: DependencyManagementMode,
    pub python_repo_mode: PythonRepoMode,
    pub vagrant_box_mode: VagrantBoxMode,
    pub ci_shape: CiShape,
}

pub static DEPENDENCY_MODE_REGISTRY: &[DependencyModeDef] = &[
    DependencyModeDef {
        mode: DependencyManagementMode::ManagedInHouse,
        python_repo_mode: PythonRepoMode::MirroredAndInternal,
        vagrant_box_mode: VagrantBoxMode::InternalOnly,
        ci_shape: CiShape::FixedEnvironment { language: "deb1404" },
    },
    DependencyModeDef {
        mode: DependencyManagementMode::PublicThirdParties,
        python_repo_mode: PythonRepoMode::PublicOnly,
        vagrant_box_mode: VagrantBoxMode::PublicOnly,
        ci_shape: CiShape::PythonMatrix { language: "python" },
    },
];

pub fn dependency_mode_def(mode: DependencyManagementMode) -> &'static DependencyModeDef {
    DEPENDENCY_MODE_REGISTRY
        .iter()
        .find(|d| d.mode == mode)
        .unwrap_or(&DEPENDENCY_MODE_REGISTRY[0])
}

// ── Python-version-mode definitions ──────────────────────────────────────────

/// One `matrix.include` row of a public CI config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CiMatrixRow {
    pub python: &'static str,
    pub env: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct PythonModeDef {
    pub mode: PythonVersionMode,
    pub versions: &'static [PythonVersion],

    /// Value of the single `env` entry for fixed-environment CI.
    pub ci_env: &'static str,

    /// Generated paths that do not apply to this mode and are removed after
    /// rendering, relative to the project root.
    pub removals: &'static [&'static str],
}

impl PythonModeDef {
    /// `matrix.include` rows for matrix-style CI.
    pub fn ci_matrix(&self) -> Vec<CiMatrixRow> {
        let mut rows = Vec::new();
        if self.mode.has_py27() {
            rows.push(CiMatrixRow {
                python: "2.7",
                env: "TOXENV=py27",
            });
        }
        if self.mode.has_py3() {
            rows.push(CiMatrixRow {
                python: "3.4",
                env: "TOXENV=py34",
            });
        }
        rows
    }
}

pub static PYTHON_MODE_REGISTRY: &[PythonModeDef] = &[
    PythonModeDef {
        mode: PythonVersionMode::Py27Only,
        versions: &[PythonVersion::V27],
        ci_env: "TOXENV=py27 DEFAULT_PY_ENV=py27",
        removals: &[],
    },
    PythonModeDef {
        mode: PythonVersionMode::Py27ThruPy3,
        versions: &[PythonVersion::V27, PythonVersion::V34, PythonVersion::V35],
        ci_env: "TOXENV=\"py27,py34\" DEFAULT_PY_ENV=py34",
        removals: &[],
    },
    PythonModeDef {
        mode: PythonVersionMode::Py3Only,
        versions: &[PythonVersion::V34, PythonVersion::V35],
        ci_env: "TOXENV=py34 DEFAULT_PY_ENV=py34",
        removals: &[],
    },
];

pub fn python_mode_def(mode: PythonVersionMode) -> &'static PythonModeDef {
    PYTHON_MODE_REGISTRY
        .iter()
        .find(|d| d.mode == mode)
        .unwrap_or(&PYTHON_MODE_REGISTRY[0])
}
