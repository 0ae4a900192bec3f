//! In-memory template store keyed by location.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use hatchery_core::{
    application::{ApplicationError, ports::TemplateStore},
    domain::Template,
    error::HatcheryResult,
};

/// Thread-safe in-memory template store.
///
/// Lets tests hand `GenerateService` a template without touching disk.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<HashMap<PathBuf, Template>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `template` under `location`, replacing any previous one.
    pub fn insert(&self, location: impl Into<PathBuf>, template: Template) {
        if let Ok(mut inner) = self.inner.write() {
            inner.insert(location.into(), template);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|i| i.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TemplateStore for InMemoryStore {
    fn load(&self, location: &Path) -> HatcheryResult<Template> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::TemplateNotFound {
                path: location.to_path_buf(),
                reason: "template store lock poisoned".into(),
            })?;
        inner.get(location).cloned().ok_or_else(|| {
            ApplicationError::TemplateNotFound {
                path: location.to_path_buf(),
                reason: "no template registered at this location".into(),
            }
            .into()
        })
    }
}
