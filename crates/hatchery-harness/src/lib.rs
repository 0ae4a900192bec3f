//! Combinatorial harness for the `python-project` template.
//!
//! Each [`Combination`] of dependency-management mode, project flavor,
//! Python version mode and `make` targets is generated into its own output
//! directory and checked for:
//!
//! - the flavor's files being present and the staging area gone
//! - executable bits on the Vagrant helper scripts
//! - parseable requirement files
//! - the CI configuration shape for the chosen modes
//! - the Makefile target graph
//!
//! With [`HarnessOptions::build`] set, `make` is run and any built wheel is
//! compared against the generation parameters. [`Harness::run_in_vm`] runs
//! the build inside the project's own Vagrant build VM instead.
//!
//! # Example
//!
//! ```no_run
//! use hatchery_harness::{ApiInvoker, Harness, HarnessOptions, HarnessFilter, defaults};
//!
//! # fn main() -> anyhow::Result<()> {
//! let options = HarnessOptions::new("templates/python-project", "target/harness").with_env();
//! let harness = Harness::new(ApiInvoker::default(), options);
//! let cases = HarnessFilter::from_env()?.apply(defaults());
//! for report in harness.run_all(&cases) {
//!     println!("{}: {}", report.combination, report.outcome);
//! }
//! # Ok(())
//! # }
//! ```

pub mod build;
pub mod combination;
pub mod invoke;
pub mod output_dir;
pub mod runner;
pub mod specs;
pub mod vm;

pub use build::{BuildRunner, Interpreters, PackageInspector, Tool, WheelMetadata};
pub use combination::{
    Combination, HarnessFilter, MakeTarget, build_vm_combinations, ci_combinations, defaults,
    non_defaults,
};
pub use invoke::{ApiInvoker, CliInvoker, Invoker};
pub use output_dir::OutputDirectoryManager;
pub use runner::{CaseReport, Harness, HarnessOptions, Outcome};
pub use vm::VagrantRunner;
