//! `hatchery inspect` - show a template's metadata and parameters.

use serde_json::json;

use hatchery_adapters::DirectoryTemplateStore;
use hatchery_core::application::{TemplateInfo, TemplateService};
use hatchery_core::domain::ProjectFlavor;
use hatchery_core::domain::capabilities::flavor_def;

use crate::{
    cli::InspectArgs, commands::resolve_template, config::AppConfig, error::CliResult,
    output::OutputManager,
};

pub fn execute(args: InspectArgs, config: &AppConfig, output: &OutputManager) -> CliResult<()> {
    let template = resolve_template(args.template, config)?;
    let info = TemplateService::new(Box::new(DirectoryTemplateStore::new())).inspect(&template)?;

    if output.is_json() {
        output.json(&to_json(&info))?;
        return Ok(());
    }

    output.header(&format!("{} ({})", info.name, info.id))?;
    if !info.description.is_empty() {
        output.print(&info.description)?;
    }
    output.print(&format!("Author: {}", info.author))?;
    output.print(&format!("Files:  {}", info.file_count))?;
    output.print("")?;
    output.header("Parameters:")?;
    for spec in &info.parameters {
        let line = match &spec.choices {
            Some(choices) => {
                let shown: Vec<String> =
                    choices.iter().map(|c| choice_label(&spec.key, c)).collect();
                format!("  {:<28} {}", spec.key, shown.join(" | "))
            }
            None => format!("  {:<28} {}", spec.key, spec.default),
        };
        output.print(&line)?;
    }
    Ok(())
}

/// A choice as shown to people: flavors carry their description.
pub(crate) fn choice_label(key: &str, choice: &str) -> String {
    match (key, choice.parse::<ProjectFlavor>()) {
        ("project_flavor", Ok(flavor)) => format!("{choice} ({})", flavor_def(flavor).label),
        _ => choice.to_string(),
    }
}

fn to_json(info: &TemplateInfo) -> serde_json::Value {
    json!({
        "id": info.id,
        "name": info.name,
        "description": info.description,
        "author": info.author,
        "file_count": info.file_count,
        "parameters": info.parameters,
    })
}
