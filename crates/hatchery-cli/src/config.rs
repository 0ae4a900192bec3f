//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only ever sees the resolved
//! parameter maps.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `HATCHERY_*` environment variables (`.env` is loaded first)
//! 3. The `--config` file, which must exist when given
//! 4. `<user config dir>/hatchery/config.toml`, if present
//! 5. Built-in defaults
//!
//! ```toml
//! output_dir = "~/src"
//! overwrite_if_exists = false
//! no_input = false
//! templates_dir = "/opt/hatchery/templates"
//!
//! [default_context]
//! author_name = "Ada Lovelace"
//! company_name = "Analytical Engines"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

const ENV_PREFIX: &str = "HATCHERY";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Parent directory for generated projects.
    pub output_dir: PathBuf,
    /// Generate into an existing project directory without failing.
    pub overwrite_if_exists: bool,
    /// Never prompt for parameters.
    pub no_input: bool,
    /// Template directory used when none is given on the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<PathBuf>,
    /// Parameter defaults applied over the template's own.
    #[serde(default)]
    pub default_context: BTreeMap<String, String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            overwrite_if_exists: false,
            no_input: false,
            templates_dir: None,
            default_context: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from every layer.
    ///
    /// `config_file` is the path given via `--config`; it is required to
    /// exist, while the user-level file is optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path(), config_file.map(PathBuf::as_path))
    }

    fn load_from(user_file: &Path, config_file: Option<&Path>) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("output_dir", defaults.output_dir.to_string_lossy().into_owned())?
            .set_default("overwrite_if_exists", defaults.overwrite_if_exists)?
            .set_default("no_input", defaults.no_input)?
            .add_source(File::from(user_file).format(FileFormat::Toml).required(false));

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Starter configuration written by `hatchery init`.
    pub fn starter() -> Self {
        let default_context = [
            ("author_name", "Your Name"),
            ("author_email", "you@example.com"),
            ("company_name", "Your Company"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Self {
            default_context,
            ..Self::default()
        }
    }

    /// Path to the user configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.hatchery.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("org", "hatchery", "hatchery")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".hatchery.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn missing_user_file(tmp: &TempDir) -> PathBuf {
        tmp.path().join("absent.toml")
    }

    #[test]
    fn defaults_without_any_file() {
        let tmp = TempDir::new().unwrap();
        let cfg = AppConfig::load_from(&missing_user_file(&tmp), None).unwrap();
        assert_eq!(cfg.output_dir, PathBuf::from("."));
        assert!(!cfg.overwrite_if_exists);
        assert!(cfg.default_context.is_empty());
    }

    #[test]
    fn explicit_file_overrides_user_file() {
        let tmp = TempDir::new().unwrap();
        let user = tmp.path().join("user.toml");
        fs::write(
            &user,
            "output_dir = \"/user\"\nno_input = true\n[default_context]\nauthor_name = \"User\"\n",
        )
        .unwrap();
        let explicit = tmp.path().join("team.toml");
        fs::write(&explicit, "output_dir = \"/team\"\n").unwrap();

        let cfg = AppConfig::load_from(&user, Some(&explicit)).unwrap();

        assert_eq!(cfg.output_dir, PathBuf::from("/team"));
        assert!(cfg.no_input);
        assert_eq!(cfg.default_context["author_name"], "User");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let result = AppConfig::load_from(
            &missing_user_file(&tmp),
            Some(&tmp.path().join("nope.toml")),
        );
        assert!(result.is_err());
    }

    #[test]
    fn starter_round_trips_through_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("starter.toml");
        fs::write(&path, toml::to_string_pretty(&AppConfig::starter()).unwrap()).unwrap();

        let cfg = AppConfig::load_from(&missing_user_file(&tmp), Some(&path)).unwrap();
        assert_eq!(cfg.default_context["company_name"], "Your Company");
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
