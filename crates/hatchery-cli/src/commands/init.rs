//! `hatchery init` - write a starter configuration file.

use std::path::Path;

use crate::{
    cli::InitArgs,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Create a starter configuration file.
///
/// Refuses to replace an existing file unless `--force` is given.
pub fn execute(args: InitArgs, output: &OutputManager) -> CliResult<()> {
    let path = args.path.unwrap_or_else(AppConfig::config_path);

    if path.exists() && !args.force {
        return Err(CliError::InvalidInput {
            message: format!(
                "config already exists at {} (use --force to overwrite)",
                path.display()
            ),
            source: None,
        });
    }

    if path.exists() {
        output.warning(&format!("Overwriting {}", path.display()))?;
    }
    write_starter(&path)?;
    output.success(&format!("Configuration created at {}", path.display()))?;
    Ok(())
}

fn write_starter(path: &Path) -> CliResult<()> {
    let body = toml::to_string_pretty(&AppConfig::starter()).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise starter config: {e}"),
        source: Some(Box::new(e)),
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_cli_context(|| format!("Failed to create '{}'", parent.display()))?;
    }
    std::fs::write(path, body)
        .with_cli_context(|| format!("Failed to write config to '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn starter_lands_in_nested_directory() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a/b/hatchery.toml");
        write_starter(&path).unwrap();
        let body = std::fs::read_to_string(&path).unwrap();
        assert!(body.contains("[default_context]"));
        assert!(body.contains("author_name"));
    }
}
