//! Template Service - read-only template queries.
//!
//! Separated from `GenerateService` so that `inspect` and interactive
//! prompting can load a template without a renderer or filesystem.

use std::path::Path;

use crate::{
    application::ports::TemplateStore,
    domain::{ParameterSpec, Template},
    error::HatcheryResult,
};

/// Information about a template for display purposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub author: String,
    pub parameters: Vec<ParameterSpec>,
    pub file_count: usize,
}

impl From<&Template> for TemplateInfo {
    fn from(t: &Template) -> Self {
        Self {
            id: t.id.to_string(),
            name: t.metadata.name.clone(),
            description: t.metadata.description.clone(),
            author: t.metadata.author.clone(),
            parameters: t.schema.specs().to_vec(),
            file_count: t.tree.files().count(),
        }
    }
}

pub struct TemplateService {
    store: Box<dyn TemplateStore>,
}

impl TemplateService {
    pub fn new(store: Box<dyn TemplateStore>) -> Self {
        Self { store }
    }

    pub fn load(&self, location: &Path) -> HatcheryResult<Template> {
        self.store.load(location)
    }

    pub fn inspect(&self, location: &Path) -> HatcheryResult<TemplateInfo> {
        Ok(TemplateInfo::from(&self.store.load(location)?))
    }
}
