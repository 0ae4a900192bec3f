//! Filesystem-based template loader.
//!
//! # Directory layout expected
//!
//! ```text
//! python-project/
//! ├── template.toml                 ← manifest (required)
//! ├── parameters.json               ← defaults and choice lists (optional)
//! └── {{params.package_name}}/      ← the single, rendered root directory
//!     ├── setup.py
//!     └── vagrant/
//!         └── provision-build-vm.sh
//! ```
//!
//! # `template.toml` format
//!
//! ```toml
//! [template]
//! id      = "python-project"
//! version = "1.0.0"
//!
//! [metadata]
//! name        = "Python project"
//! description = "Packaged Python project with CI and a build VM."   # optional
//! author      = "Hatchery"                                          # optional
//! tags        = ["python"]                                          # optional
//!
//! [render]
//! # Paths (relative to the template dir) copied without rendering.
//! # A trailing `/` covers a whole directory.
//! copy_without_render = ["{{params.package_name}}/docs/static/"]
//! # Files marked executable in addition to those with a unix exec bit.
//! executables = ["{{params.package_name}}/vagrant/provision-build-vm.sh"]
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{debug, instrument};
use walkdir::WalkDir;

use hatchery_core::{
    application::{ApplicationError, ports::TemplateStore},
    domain::{
        DirectorySpec, DomainError, FileSpec, ParameterSchema, RelativePath, Template,
        TemplateContent, TemplateId, TemplateMetadata, TemplateNode, TemplateTree,
    },
    error::HatcheryResult,
};

pub const MANIFEST_FILE: &str = "template.toml";
pub const PARAMETERS_FILE: &str = "parameters.json";

// ── Manifest types ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Clone)]
pub struct TemplateManifest {
    pub template: TemplateSection,
    pub metadata: MetadataSection,
    #[serde(default)]
    pub render: RenderSection,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TemplateSection {
    pub id: String,
    pub version: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MetadataSection {
    pub name: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RenderSection {
    #[serde(default)]
    pub copy_without_render: Vec<String>,
    #[serde(default)]
    pub executables: Vec<String>,
}

impl RenderSection {
    fn is_verbatim(&self, path: &str) -> bool {
        self.copy_without_render.iter().any(|entry| {
            let entry = normalize_path(entry);
            if entry.ends_with('/') {
                path.starts_with(&entry)
            } else {
                path == entry
            }
        })
    }

    fn is_executable(&self, path: &str) -> bool {
        self.executables.iter().any(|e| normalize_path(e) == path)
    }
}

// ── Store ─────────────────────────────────────────────────────────────────────

/// Loads a template from a directory on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryTemplateStore;

impl DirectoryTemplateStore {
    pub fn new() -> Self {
        Self
    }

    fn read_manifest(dir: &Path) -> Result<TemplateManifest, DomainError> {
        let manifest_path = dir.join(MANIFEST_FILE);
        let raw = fs::read_to_string(&manifest_path).map_err(|e| {
            DomainError::InvalidTemplate(format!(
                "failed to read '{}': {e}",
                manifest_path.display()
            ))
        })?;
        toml::from_str(&raw).map_err(|e| {
            DomainError::InvalidTemplate(format!(
                "failed to parse '{}': {e}",
                manifest_path.display()
            ))
        })
    }

    fn read_schema(dir: &Path) -> Result<ParameterSchema, DomainError> {
        let path = dir.join(PARAMETERS_FILE);
        if !path.exists() {
            return Ok(ParameterSchema::default());
        }
        let raw = fs::read_to_string(&path).map_err(|e| {
            DomainError::InvalidTemplate(format!("failed to read '{}': {e}", path.display()))
        })?;
        let value: serde_json::Value = serde_json::from_str(&raw).map_err(|e| {
            DomainError::InvalidTemplate(format!("failed to parse '{}': {e}", path.display()))
        })?;
        ParameterSchema::from_json(&value)
    }

    /// Walk `dir` into a tree, parents before children.
    fn build_tree(dir: &Path, render: &RenderSection) -> Result<TemplateTree, DomainError> {
        let mut tree = TemplateTree::new();

        let walker = WalkDir::new(dir)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                !(e.depth() == 1
                    && (e.file_name() == MANIFEST_FILE || e.file_name() == PARAMETERS_FILE))
            });

        for walk_entry in walker {
            let walk_entry = walk_entry
                .map_err(|e| DomainError::InvalidTemplate(format!("directory walk error: {e}")))?;
            let abs_path = walk_entry.path();
            let rel_raw = abs_path.strip_prefix(dir).map_err(|_| {
                DomainError::InvalidTemplate(format!(
                    "failed to relativise '{}' against '{}'",
                    abs_path.display(),
                    dir.display()
                ))
            })?;
            let path_str = normalize_path(&rel_raw.to_string_lossy());
            let path = RelativePath::try_new(&path_str)?;

            if walk_entry.file_type().is_dir() {
                tree.push(TemplateNode::Directory(DirectorySpec::new(path)));
                continue;
            }
            if !walk_entry.file_type().is_file() {
                continue; // Skip symlinks and other special types.
            }

            let body = fs::read_to_string(abs_path).map_err(|e| {
                DomainError::InvalidTemplate(format!("failed to read file '{path_str}': {e}"))
            })?;
            let content = if render.is_verbatim(&path_str) {
                TemplateContent::Verbatim(body)
            } else {
                TemplateContent::Rendered(body)
            };

            let mut spec = FileSpec::new(path, content);
            if render.is_executable(&path_str) || has_exec_bit(abs_path) {
                spec = spec.executable();
            }
            tree.push(TemplateNode::File(spec));
        }

        Ok(tree)
    }
}

impl TemplateStore for DirectoryTemplateStore {
    #[instrument(skip(self), fields(dir = %location.display()))]
    fn load(&self, location: &Path) -> HatcheryResult<Template> {
        if !location.join(MANIFEST_FILE).is_file() {
            return Err(ApplicationError::TemplateNotFound {
                path: location.to_path_buf(),
                reason: format!("no {MANIFEST_FILE} found"),
            }
            .into());
        }

        let manifest = Self::read_manifest(location)?;
        let schema = Self::read_schema(location)?;
        let tree = Self::build_tree(location, &manifest.render)?;

        let metadata = TemplateMetadata::new(manifest.metadata.name)
            .description(manifest.metadata.description.unwrap_or_default())
            .author(manifest.metadata.author.unwrap_or_else(|| "Hatchery".into()))
            .tags(manifest.metadata.tags.unwrap_or_default());

        let template = Template::builder()
            .id(TemplateId::new(manifest.template.id, manifest.template.version))
            .metadata(metadata)
            .schema(schema)
            .tree(tree)
            .build()?;

        debug!(
            id = %template.id,
            nodes = template.tree.len(),
            parameters = template.schema.len(),
            "loaded template"
        );
        Ok(template)
    }
}

#[cfg(unix)]
fn has_exec_bit(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn has_exec_bit(_path: &Path) -> bool {
    false
}

fn normalize_path(p: &str) -> String {
    p.replace('\\', "/")
}

/// Absolute location of a template directory (for display).
pub fn display_location(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"
[template]
id = "mini"
version = "0.1.0"

[metadata]
name = "Mini"

[render]
copy_without_render = ["{{params.package_name}}/raw/"]
executables = ["{{params.package_name}}/run.sh"]
"#;

    fn write(root: &Path, rel: &str, body: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    fn mini_template() -> TempDir {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), MANIFEST_FILE, MANIFEST);
        write(
            tmp.path(),
            PARAMETERS_FILE,
            r#"{"package_name": "pkg", "project_flavor": ["bare_bones", "library"]}"#,
        );
        write(tmp.path(), "{{params.package_name}}/setup.py", "name='{{params.package_name}}'\n");
        write(tmp.path(), "{{params.package_name}}/raw/page.html", "{{ keep }}");
        write(tmp.path(), "{{params.package_name}}/run.sh", "#!/bin/sh\n");
        tmp
    }

    fn find<'a>(t: &'a Template, path: &str) -> &'a FileSpec {
        t.tree
            .files()
            .find(|f| f.path.as_str() == path)
            .unwrap_or_else(|| panic!("missing {path}"))
    }

    #[test]
    fn loads_manifest_schema_and_tree() {
        let tmp = mini_template();
        let t = DirectoryTemplateStore::new().load(tmp.path()).unwrap();

        assert_eq!(t.id.to_string(), "mini@0.1.0");
        assert_eq!(t.metadata.author, "Hatchery");
        assert_eq!(t.schema.get("project_flavor").unwrap().default, "bare_bones");
        assert_eq!(t.root_name().unwrap(), "{{params.package_name}}");
        assert!(t.tree.files().all(|f| !f.path.as_str().ends_with(MANIFEST_FILE)));
    }

    #[test]
    fn copy_without_render_marks_verbatim() {
        let tmp = mini_template();
        let t = DirectoryTemplateStore::new().load(tmp.path()).unwrap();
        assert!(matches!(
            find(&t, "{{params.package_name}}/raw/page.html").content,
            TemplateContent::Verbatim(_)
        ));
        assert!(matches!(
            find(&t, "{{params.package_name}}/setup.py").content,
            TemplateContent::Rendered(_)
        ));
    }

    #[test]
    fn manifest_executables_are_flagged() {
        let tmp = mini_template();
        let t = DirectoryTemplateStore::new().load(tmp.path()).unwrap();
        assert!(find(&t, "{{params.package_name}}/run.sh").permissions.executable_flag());
        assert!(!find(&t, "{{params.package_name}}/setup.py").permissions.executable_flag());
    }

    #[test]
    fn missing_manifest_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = DirectoryTemplateStore::new().load(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("Template not found"), "{err}");
    }

    #[test]
    fn malformed_manifest_is_invalid_template() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), MANIFEST_FILE, "[template]\nid = ");
        let err = DirectoryTemplateStore::new().load(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("failed to parse"), "{err}");
    }

    #[test]
    fn stray_top_level_file_is_rejected() {
        let tmp = mini_template();
        write(tmp.path(), "README.md", "not part of the project");
        assert!(DirectoryTemplateStore::new().load(tmp.path()).is_err());
    }
}
