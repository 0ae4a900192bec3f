//! Per-combination output directories.
//!
//! Each case gets `<root>/<prefix>-<hash>` where the hash is the last four
//! hex digits of a SHA-256 over the combination, so cases never share a
//! directory and need no locking.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, bail};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use hatchery_core::domain::ParameterMap;

use crate::combination::Combination;

/// Name of the plain-text file recording what a directory was made for.
pub const TEST_PARAMS_FILE: &str = "test-params.txt";

#[derive(Debug, Clone)]
pub struct OutputDirectoryManager {
    prefix: String,
    hash: String,
    path: PathBuf,
}

impl OutputDirectoryManager {
    pub fn new(root: &Path, prefix: &str, combination: &Combination) -> Self {
        let hash = Self::params_hash(combination);
        let path = root.join(format!("{prefix}-{hash}"));
        Self {
            prefix: prefix.to_string(),
            hash,
            path,
        }
    }

    /// Short, stable hash of a combination.
    pub fn params_hash(combination: &Combination) -> String {
        let digest = Sha256::digest(format!("Combination{combination:?}").as_bytes());
        let full = hex::encode(digest);
        full[full.len() - 4..].to_string()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where the generated project lands inside this directory.
    pub fn project_path(&self, package_name: &str) -> PathBuf {
        self.path.join(package_name)
    }

    /// Recreate the directory empty and write the test-params file.
    pub fn setup(&self, combination: &Combination, params: &ParameterMap) -> anyhow::Result<&Path> {
        if self.path.exists() {
            debug!(path = %self.path.display(), "removing previous output");
            self.remove()?;
        }
        fs::create_dir_all(&self.path)
            .with_context(|| format!("creating {}", self.path.display()))?;

        let crumb = self.path.join(TEST_PARAMS_FILE);
        fs::write(&crumb, self.describe(combination, params))
            .with_context(|| format!("writing {}", crumb.display()))?;

        info!(path = %self.path.display(), "output directory ready");
        Ok(&self.path)
    }

    pub fn tear_down(&self) -> anyhow::Result<()> {
        info!(path = %self.path.display(), "removing output directory");
        self.remove()
    }

    fn describe(&self, combination: &Combination, params: &ParameterMap) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "**** combination ****\n{combination}\n");
        let _ = writeln!(out, "**** output_prefix ****\n{}\n", self.prefix);
        let _ = writeln!(out, "**** params_hash_value ****\n{}\n", self.hash);
        let _ = writeln!(out, "**** parameters ****");
        for (key, value) in params {
            let _ = writeln!(out, "{key} = {value}");
        }
        out
    }

    fn remove(&self) -> anyhow::Result<()> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && parent != Path::new("/") => {}
            _ => bail!("refusing to remove {}", self.path.display()),
        }
        fs::remove_dir_all(&self.path)
            .with_context(|| format!("removing {}", self.path.display()))
    }
}
