//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "hatchery",
    bin_name = "hatchery",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Parameter-driven Python project generator",
    long_about = "Hatchery renders a packaged Python project (library, CLI app, \
                  Flask service, or bare skeleton) with CI configuration, a \
                  Makefile and a Vagrant build VM.",
    after_help = "EXAMPLES:\n\
        \x20 hatchery generate --no-input -o ~/src --param package_name=widget-kit\n\
        \x20 hatchery new ./templates/python-project --param project_flavor=flask_app\n\
        \x20 hatchery inspect\n\
        \x20 hatchery completions bash > /usr/share/bash-completion/completions/hatchery",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a project from a template.
    #[command(
        visible_alias = "new",
        about = "Generate a project",
        after_help = "EXAMPLES:\n\
            \x20 hatchery generate\n\
            \x20 hatchery generate --no-input --param project_flavor=cli_app -o /tmp\n\
            \x20 hatchery generate path/to/template --dry-run"
    )]
    Generate(GenerateArgs),

    /// Show a template's metadata and parameters.
    #[command(
        about = "Inspect a template",
        after_help = "EXAMPLES:\n\
            \x20 hatchery inspect\n\
            \x20 hatchery inspect ./templates/python-project --output-format json"
    )]
    Inspect(InspectArgs),

    /// Write a starter configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 hatchery init               # user config directory\n\
            \x20 hatchery init ./hatchery.toml\n\
            \x20 hatchery init --force"
    )]
    Init(InitArgs),

    /// Print the effective configuration.
    #[command(
        about = "Show configuration",
        after_help = "EXAMPLES:\n\
            \x20 hatchery config\n\
            \x20 hatchery -c team.toml config\n\
            \x20 hatchery config --show-path"
    )]
    Config(ConfigArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 hatchery completions bash > ~/.local/share/bash-completion/completions/hatchery\n\
            \x20 hatchery completions zsh  > ~/.zfunc/_hatchery\n\
            \x20 hatchery completions fish > ~/.config/fish/completions/hatchery.fish"
    )]
    Completions(CompletionsArgs),
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `hatchery generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Template directory.  Defaults to the bundled `python-project`.
    #[arg(value_name = "TEMPLATE", help = "Template directory")]
    pub template: Option<PathBuf>,

    /// Parent directory of the generated project.
    #[arg(
        short = 'o',
        long = "output-dir",
        value_name = "DIR",
        help = "Where to create the project (default: current directory)"
    )]
    pub output_dir: Option<PathBuf>,

    /// Parameter override, repeatable.
    #[arg(
        short = 'p',
        long = "param",
        value_name = "KEY=VALUE",
        help = "Set a template parameter (repeatable)"
    )]
    pub params: Vec<String>,

    /// Generate into an existing project directory.
    #[arg(long = "overwrite-if-exists", help = "Write into an existing project directory")]
    pub overwrite_if_exists: bool,

    /// Never prompt; use defaults and overrides only.
    #[arg(long = "no-input", help = "Do not prompt for parameters")]
    pub no_input: bool,

    /// Validate and resolve the project directory without writing.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,
}

// ── inspect ───────────────────────────────────────────────────────────────────

/// Arguments for `hatchery inspect`.
#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Template directory.  Defaults to the bundled `python-project`.
    #[arg(value_name = "TEMPLATE", help = "Template directory")]
    pub template: Option<PathBuf>,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `hatchery init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Where to write the file.  Defaults to the user config directory.
    #[arg(value_name = "PATH", help = "Config file to create")]
    pub path: Option<PathBuf>,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── config ────────────────────────────────────────────────────────────────────

/// Arguments for `hatchery config`.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Print only the user config file location.
    #[arg(long = "show-path", help = "Print the user config file path")]
    pub show_path: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `hatchery completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_generate_command() {
        let cli = Cli::parse_from([
            "hatchery",
            "generate",
            "tpl",
            "-o",
            "/tmp/out",
            "--param",
            "project_flavor=library",
            "-p",
            "package_name=widget-kit",
            "--no-input",
        ]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected Generate command");
        };
        assert_eq!(args.template, Some(PathBuf::from("tpl")));
        assert_eq!(args.output_dir, Some(PathBuf::from("/tmp/out")));
        assert_eq!(args.params, ["project_flavor=library", "package_name=widget-kit"]);
        assert!(args.no_input);
        assert!(!args.dry_run);
    }

    #[test]
    fn new_is_an_alias_for_generate() {
        let cli = Cli::parse_from(["hatchery", "new", "--dry-run"]);
        assert!(matches!(cli.command, Commands::Generate(ref a) if a.dry_run));
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["hatchery", "--quiet", "--verbose", "config"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "hatchery",
            "inspect",
            "--output-format",
            "json",
            "--log-file",
            "run.log",
        ]);
        assert_eq!(cli.global.output_format, OutputFormat::Json);
        assert_eq!(cli.global.log_file, Some(PathBuf::from("run.log")));
    }
}
