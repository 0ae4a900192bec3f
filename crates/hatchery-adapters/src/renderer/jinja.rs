//! Jinja-syntax renderer backed by `minijinja`.

use std::path::Path;

use minijinja::{Environment, UndefinedBehavior};
use tracing::{debug, instrument};

use hatchery_core::{
    application::{ApplicationError, ports::TemplateRenderer},
    domain::{ProjectStructure, RenderContext, Template, TemplateContent, TemplateNode},
    error::HatcheryResult,
};

/// Renders paths and file bodies with `{{ params.* }}` / `{{ derived.* }}`.
///
/// Undefined variables are errors, and a trailing newline in a source file
/// survives rendering.
pub struct JinjaRenderer {
    env: Environment<'static>,
}

impl JinjaRenderer {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        Self { env }
    }

    fn render_named(&self, name: &str, source: &str, context: &RenderContext) -> HatcheryResult<String> {
        self.env.render_str(source, context).map_err(|e| {
            ApplicationError::RenderingFailed {
                reason: format!("{name}: {e:#}"),
            }
            .into()
        })
    }
}

impl Default for JinjaRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for JinjaRenderer {
    fn render_str(&self, source: &str, context: &RenderContext) -> HatcheryResult<String> {
        self.render_named("<inline>", source, context)
    }

    #[instrument(skip_all, fields(template = %template.id))]
    fn render(
        &self,
        template: &Template,
        context: &RenderContext,
        output_dir: &Path,
    ) -> HatcheryResult<ProjectStructure> {
        let root_source = template.root_name()?;
        let root = self.render_named(root_source, root_source, context)?;
        if root.trim().is_empty() || root.contains('/') {
            return Err(ApplicationError::RenderingFailed {
                reason: format!("root directory '{root_source}' rendered to invalid name {root:?}"),
            }
            .into());
        }

        let mut structure = ProjectStructure::new(output_dir.join(&root));

        for node in &template.tree.nodes {
            let Some(rest) = node.path().split_first().1 else {
                continue; // the root directory itself
            };
            let relative = self.render_named(node.path().as_str(), rest, context)?;
            if relative.split('/').any(str::is_empty) {
                debug!(path = %node.path(), "path rendered empty, skipping");
                continue;
            }

            match node {
                TemplateNode::Directory(_) => structure.add_directory(relative),
                TemplateNode::File(file) => {
                    let content = match &file.content {
                        TemplateContent::Rendered(source) => {
                            self.render_named(file.path.as_str(), source, context)?
                        }
                        TemplateContent::Verbatim(raw) => raw.clone(),
                    };
                    structure.add_file(relative, content, file.permissions);
                }
            }
        }

        debug!(files = structure.file_count(), "rendered");
        Ok(structure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hatchery_core::domain::{
        DirectorySpec, FileSpec, ParameterMap, RelativePath, TemplateId, TemplateNode,
    };

    fn context() -> RenderContext {
        let params: ParameterMap = [
            ("package_name".to_string(), "widget-kit".to_string()),
            ("root_module_name".to_string(), "widget_kit".to_string()),
        ]
        .into();
        RenderContext::new(params).with_derived(serde_json::json!({ "has_py27": false }))
    }

    fn file(path: &str, content: TemplateContent) -> TemplateNode {
        TemplateNode::File(FileSpec::new(RelativePath::try_new(path).unwrap(), content))
    }

    #[test]
    fn renders_paths_and_bodies() {
        let template = Template::builder()
            .id(TemplateId::new("t", "1"))
            .add_node(TemplateNode::Directory(DirectorySpec::new(
                RelativePath::try_new("{{params.package_name}}").unwrap(),
            )))
            .add_node(file(
                "{{params.package_name}}/{{params.root_module_name}}/__init__.py",
                TemplateContent::Rendered(
                    "{% if derived.has_py27 %}py2{% else %}py3{% endif %}\n".into(),
                ),
            ))
            .add_node(file(
                "{{params.package_name}}/Makefile",
                TemplateContent::Verbatim("{{ not rendered }}".into()),
            ))
            .build()
            .unwrap();

        let s = JinjaRenderer::new()
            .render(&template, &context(), Path::new("/out"))
            .unwrap();

        assert_eq!(s.root(), Path::new("/out/widget-kit"));
        let files: Vec<_> = s.files().collect();
        assert_eq!(files[0].path, Path::new("widget_kit/__init__.py"));
        assert_eq!(files[0].content, "py3\n");
        assert_eq!(files[1].content, "{{ not rendered }}");
    }

    #[test]
    fn undefined_variable_is_an_error() {
        let err = JinjaRenderer::new()
            .render_str("{{ params.nope }}", &context())
            .unwrap_err();
        assert!(err.to_string().contains("rendering failed"), "{err}");
    }
}
