//! Build-VM runs: bring up the generated project's `build_vm` with Vagrant
//! and run `make` inside a clean copy of the repo.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context as _, bail, ensure};
use tracing::{debug, info, instrument, warn};

use crate::build::{Tool, probe, program_from_env};

/// Overrides the `vagrant` executable.
pub const VAGRANT_ENV: &str = "HATCHERY_VAGRANT";
/// Overrides the `git` executable used to prepare the shared repo.
pub const GIT_ENV: &str = "HATCHERY_GIT";

/// Machine defined by the generated Vagrantfile for builds.
pub const BUILD_VM: &str = "build_vm";

/// Shell command run over `vagrant ssh` for a project named `package_name`.
pub fn build_in_vm_command(package_name: &str) -> String {
    let cleanroom = format!("~/cleanroom/{package_name}");
    format!(
        "/vagrant/vagrant/make-cleanroom-copy-of-repo.sh /vagrant {cleanroom} && cd {cleanroom} && make"
    )
}

#[derive(Debug, Clone)]
pub struct VagrantRunner {
    vagrant: PathBuf,
    git: PathBuf,
}

impl Default for VagrantRunner {
    fn default() -> Self {
        Self {
            vagrant: program_from_env(VAGRANT_ENV, "vagrant"),
            git: program_from_env(GIT_ENV, "git"),
        }
    }
}

impl VagrantRunner {
    pub fn new(vagrant: impl Into<PathBuf>, git: impl Into<PathBuf>) -> Self {
        Self {
            vagrant: vagrant.into(),
            git: git.into(),
        }
    }

    /// Both `vagrant` and `git` must be runnable.
    pub fn availability(&self) -> Tool {
        match probe(self.vagrant.as_os_str(), "--version") {
            Tool::Available => probe(self.git.as_os_str(), "--version"),
            missing => missing,
        }
    }

    /// Turn `project_root` into a one-commit repo so the cleanroom script
    /// sees every generated file through `git ls-files`.
    pub fn prepare_repo(&self, project_root: &Path) -> anyhow::Result<()> {
        let steps: [&[&str]; 3] = [
            &["init", "--quiet"],
            &["add", "--all"],
            &[
                "-c",
                "user.name=hatchery",
                "-c",
                "user.email=hatchery@localhost",
                "commit",
                "--quiet",
                "-m",
                "generated",
            ],
        ];
        for args in steps {
            run(&self.git, project_root, args)?;
        }
        Ok(())
    }

    /// Recreate `build_vm`, run `make` in it and always destroy it afterwards.
    #[instrument(skip(self), fields(vagrant = %self.vagrant.display()))]
    pub fn build(&self, project_root: &Path, package_name: &str) -> anyhow::Result<()> {
        ensure!(
            project_root.join("Vagrantfile").is_file(),
            "no Vagrantfile in {}",
            project_root.display()
        );
        info!(dir = %project_root.display(), "building in {BUILD_VM}");

        let ssh = build_in_vm_command(package_name);
        let result = [
            vec!["status", BUILD_VM],
            vec!["destroy", "-f", BUILD_VM],
            vec!["up", BUILD_VM],
            vec!["ssh", BUILD_VM, "-c", ssh.as_str()],
        ]
        .iter()
        .try_for_each(|args| run(&self.vagrant, project_root, args));

        if let Err(e) = run(&self.vagrant, project_root, &["destroy", "-f", BUILD_VM]) {
            warn!(error = %e, "could not destroy {BUILD_VM}");
        }
        result
    }
}

fn run(program: &Path, dir: &Path, args: &[&str]) -> anyhow::Result<()> {
    debug!(program = %program.display(), ?args, "running");
    let out = Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .with_context(|| format!("starting {}", program.display()))?;
    if !out.status.success() {
        bail!(
            "{} {} exited with {}\n{}",
            program.display(),
            args.join(" "),
            out.status,
            String::from_utf8_lossy(&out.stderr)
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_vagrant_is_unavailable() {
        let runner = VagrantRunner::new("/definitely/not/vagrant", "git");
        match runner.availability() {
            Tool::Unavailable(reason) => assert!(reason.contains("not/vagrant"), "{reason}"),
            Tool::Available => panic!("bogus vagrant reported available"),
        }
    }

    #[test]
    fn ssh_command_builds_in_the_cleanroom() {
        let cmd = build_in_vm_command("widget-kit");
        assert!(cmd.contains("make-cleanroom-copy-of-repo.sh /vagrant ~/cleanroom/widget-kit"));
        assert!(cmd.ends_with("cd ~/cleanroom/widget-kit && make"));
    }

    #[test]
    fn build_requires_a_vagrantfile() {
        let tmp = TempDir::new().unwrap();
        let err = VagrantRunner::new("/definitely/not/vagrant", "git")
            .build(tmp.path(), "widget-kit")
            .unwrap_err();
        assert!(err.to_string().contains("no Vagrantfile"), "{err}");
    }
}
