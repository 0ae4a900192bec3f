use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::domain::{
    entities::{
        common::{Permissions, RelativePath},
        parameters::{GenerationParameters, ParameterMap, ParameterSchema},
    },
    error::DomainError,
};

// ============================================================================
// Render Context
// ============================================================================

/// Values visible to templates: `params.*` and `derived.*`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderContext {
    pub params: ParameterMap,
    pub derived: Value,
}

impl RenderContext {
    pub fn new(params: ParameterMap) -> Self {
        Self {
            params,
            derived: Value::Object(Default::default()),
        }
    }

    pub fn with_derived(mut self, derived: Value) -> Self {
        self.derived = derived;
        self
    }
}

impl From<&GenerationParameters> for RenderContext {
    fn from(params: &GenerationParameters) -> Self {
        Self::new(params.as_map().clone()).with_derived(params.derived())
    }
}

// ============================================================================
// Template Identity
// ============================================================================

/// Identifier for a template, displayed as `name@version`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateId {
    name: String,
    version: String,
}

impl TemplateId {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// Human-readable metadata for `inspect` and prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateMetadata {
    pub name: String,
    pub description: String,
    pub author: String,
    pub tags: Vec<String>,
}

impl TemplateMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            author: "Hatchery".to_string(),
            tags: Vec::new(),
        }
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

// ============================================================================
// Template Aggregate
// ============================================================================

/// A loaded project template.
///
/// Every node lives under a single root directory whose name is itself
/// rendered (e.g. `{{params.package_name}}`); that rendered name becomes the
/// project directory.
#[derive(Debug, Clone)]
pub struct Template {
    pub id: TemplateId,
    pub metadata: TemplateMetadata,
    pub schema: ParameterSchema,
    pub tree: TemplateTree,
}

impl Template {
    pub fn builder() -> TemplateBuilder {
        TemplateBuilder::default()
    }

    /// Unrendered name of the root directory.
    pub fn root_name(&self) -> Result<&str, DomainError> {
        let first = self
            .tree
            .nodes
            .first()
            .ok_or_else(|| DomainError::EmptyTemplate {
                template_id: self.id.to_string(),
            })?;
        Ok(first.path().split_first().0)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.name().is_empty() {
            return Err(DomainError::InvalidTemplate(
                "Template id cannot be empty".into(),
            ));
        }

        let root = self.root_name()?;

        let mut seen = HashSet::new();
        for node in &self.tree.nodes {
            let path = node.path();
            if path.split_first().0 != root {
                return Err(DomainError::InvalidTemplate(format!(
                    "'{path}' is outside the root directory '{root}'"
                )));
            }
            if !seen.insert(path.as_str()) {
                return Err(DomainError::DuplicatePath {
                    path: path.to_string(),
                });
            }
        }

        Ok(())
    }
}

#[derive(Default)]
pub struct TemplateBuilder {
    id: Option<TemplateId>,
    metadata: Option<TemplateMetadata>,
    schema: ParameterSchema,
    tree: TemplateTree,
}

impl TemplateBuilder {
    pub fn id(mut self, id: TemplateId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn metadata(mut self, metadata: TemplateMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn schema(mut self, schema: ParameterSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn tree(mut self, tree: TemplateTree) -> Self {
        self.tree = tree;
        self
    }

    pub fn add_node(mut self, node: TemplateNode) -> Self {
        self.tree.push(node);
        self
    }

    /// Consume the builder and validate the result.
    pub fn build(self) -> Result<Template, DomainError> {
        let id = self
            .id
            .ok_or_else(|| DomainError::InvalidTemplate("template id not set".into()))?;
        let metadata = self
            .metadata
            .unwrap_or_else(|| TemplateMetadata::new(id.name()));
        let template = Template {
            id,
            metadata,
            schema: self.schema,
            tree: self.tree,
        };
        template.validate()?;
        Ok(template)
    }
}

// ============================================================================
// Template Tree
// ============================================================================

/// Ordered file and directory nodes; parents precede children.
#[derive(Debug, Clone, Default)]
pub struct TemplateTree {
    pub nodes: Vec<TemplateNode>,
}

impl TemplateTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: TemplateNode) {
        self.nodes.push(node);
    }

    pub fn with_node(mut self, node: TemplateNode) -> Self {
        self.push(node);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn files(&self) -> impl Iterator<Item = &FileSpec> {
        self.nodes.iter().filter_map(|n| match n {
            TemplateNode::File(f) => Some(f),
            TemplateNode::Directory(_) => None,
        })
    }
}

#[derive(Debug, Clone)]
pub enum TemplateNode {
    File(FileSpec),
    Directory(DirectorySpec),
}

impl TemplateNode {
    pub fn path(&self) -> &RelativePath {
        match self {
            Self::File(f) => &f.path,
            Self::Directory(d) => &d.path,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileSpec {
    pub path: RelativePath,
    pub content: TemplateContent,
    pub permissions: Permissions,
}

impl FileSpec {
    pub fn new(path: RelativePath, content: TemplateContent) -> Self {
        Self {
            path,
            content,
            permissions: Permissions::read_write(),
        }
    }

    pub fn executable(mut self) -> Self {
        self.permissions = Permissions::executable();
        self
    }
}

#[derive(Debug, Clone)]
pub struct DirectorySpec {
    pub path: RelativePath,
}

impl DirectorySpec {
    pub fn new(path: RelativePath) -> Self {
        Self { path }
    }
}

/// How a file's body is produced. Paths are always rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateContent {
    /// Run through the template engine.
    Rendered(String),
    /// Copied byte-for-byte (`copy_without_render`).
    Verbatim(String),
}

impl TemplateContent {
    pub fn source(&self) -> &str {
        match self {
            Self::Rendered(s) | Self::Verbatim(s) => s,
        }
    }
}
