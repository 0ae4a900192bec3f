//! `hatchery config` - print the effective configuration.

use crate::{
    cli::ConfigArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(args: ConfigArgs, config: &AppConfig, output: &OutputManager) -> CliResult<()> {
    let path = AppConfig::config_path();

    if args.show_path {
        output.print(&path.display().to_string())?;
        return Ok(());
    }

    if output.is_json() {
        let value = serde_json::to_value(config).map_err(|e| CliError::ConfigError {
            message: format!("Failed to serialise config: {e}"),
            source: Some(Box::new(e)),
        })?;
        output.json(&value)?;
        return Ok(());
    }

    let serialised = toml::to_string_pretty(config).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })?;
    output.header(&format!("# effective configuration (user file: {})", path.display()))?;
    output.print(serialised.trim_end())?;
    Ok(())
}
