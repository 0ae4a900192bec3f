//! Generate Service - main application orchestrator.
//!
//! 1. Load the template
//! 2. Resolve and validate parameters
//! 3. Render and write the tree (rolled back on failure)
//! 4. Tailor by Python mode, then by flavor
//! 5. Write the breadcrumb

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, TemplateRenderer, TemplateStore},
        services::{BreadcrumbWriter, FlavorTailor, PythonVersionTailor},
    },
    domain::{
        BREADCRUMB_FILE, FsEntry, GenerationParameters, ParameterMap, ProjectStructure,
        RenderContext, Template,
    },
    error::HatcheryResult,
};

/// One generation invocation.
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    /// Directory holding the template.
    pub template: PathBuf,
    /// Parent directory of the generated project.
    pub output_dir: PathBuf,
    /// Defaults from configuration, applied over the template's own.
    pub context: ParameterMap,
    /// Per-invocation values; highest precedence.
    pub overrides: ParameterMap,
    pub overwrite_if_exists: bool,
    /// Validate and resolve names only.
    pub dry_run: bool,
}

impl GenerateRequest {
    pub fn new(template: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            template: template.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_context(mut self, context: ParameterMap) -> Self {
        self.context = context;
        self
    }

    pub fn with_overrides(mut self, overrides: ParameterMap) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn overwrite_if_exists(mut self, yes: bool) -> Self {
        self.overwrite_if_exists = yes;
        self
    }

    pub fn dry_run(mut self, yes: bool) -> Self {
        self.dry_run = yes;
        self
    }
}

/// What a generation run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub template_id: String,
    pub project_dir: PathBuf,
    pub params: ParameterMap,
    pub files_written: usize,
    /// Files moved in from the flavor staging area, relative to `project_dir`.
    pub flavor_files: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
    pub breadcrumb: Option<PathBuf>,
    pub dry_run: bool,
}

pub struct GenerateService {
    store: Box<dyn TemplateStore>,
    renderer: Box<dyn TemplateRenderer>,
    filesystem: Box<dyn Filesystem>,
}

impl GenerateService {
    pub fn new(
        store: Box<dyn TemplateStore>,
        renderer: Box<dyn TemplateRenderer>,
        filesystem: Box<dyn Filesystem>,
    ) -> Self {
        Self {
            store,
            renderer,
            filesystem,
        }
    }

    /// Run the full pipeline.
    ///
    /// Parameter validation happens before the filesystem is touched.
    #[instrument(
        skip_all,
        fields(
            template = %request.template.display(),
            output_dir = %request.output_dir.display(),
        )
    )]
    pub fn generate(&self, request: &GenerateRequest) -> HatcheryResult<GenerationReport> {
        let template = self.store.load(&request.template)?;
        info!(template = %template.id, "template loaded");

        let params = self.resolve_parameters(&template, request)?;
        let context = RenderContext::from(&params);

        if request.dry_run {
            let root = self.renderer.render_str(template.root_name()?, &context)?;
            return Ok(GenerationReport {
                template_id: template.id.to_string(),
                project_dir: request.output_dir.join(root),
                params: params.into_map(),
                files_written: 0,
                flavor_files: Vec::new(),
                removed: Vec::new(),
                breadcrumb: None,
                dry_run: true,
            });
        }

        let structure = self
            .renderer
            .render(&template, &context, &request.output_dir)?;
        structure.validate()?;
        let project_dir = structure.root().to_path_buf();

        let existed = self.filesystem.exists(&project_dir);
        if existed && !request.overwrite_if_exists {
            return Err(ApplicationError::ProjectExists { path: project_dir }.into());
        }

        match self.materialize(&structure, &params) {
            Ok((flavor_files, removed, breadcrumb)) => {
                info!(
                    project = %project_dir.display(),
                    files = structure.file_count(),
                    "generation completed"
                );
                Ok(GenerationReport {
                    template_id: template.id.to_string(),
                    project_dir,
                    params: params.into_map(),
                    files_written: structure.file_count(),
                    flavor_files,
                    removed,
                    breadcrumb: Some(breadcrumb),
                    dry_run: false,
                })
            }
            Err(e) => {
                if existed {
                    warn!("generation failed inside a pre-existing directory, leaving it in place");
                } else {
                    warn!("generation failed, attempting rollback");
                    self.rollback(&project_dir);
                }
                Err(e)
            }
        }
    }

    /// Merge defaults, configured context, and overrides, then validate.
    pub fn resolve_parameters(
        &self,
        template: &Template,
        request: &GenerateRequest,
    ) -> HatcheryResult<GenerationParameters> {
        let params = template
            .schema
            .resolve(&request.context, &request.overrides);
        Ok(GenerationParameters::from_map(params)?)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn materialize(
        &self,
        structure: &ProjectStructure,
        params: &GenerationParameters,
    ) -> HatcheryResult<(Vec<PathBuf>, Vec<PathBuf>, PathBuf)> {
        self.write_all(structure)?;

        let root = structure.root();
        let fs = self.filesystem.as_ref();

        let removed = PythonVersionTailor::new(fs).tailor(params.python_mode, root)?;
        let flavor_files =
            FlavorTailor::new(fs).tailor(params.flavor, params.root_module_name(), root)?;

        let breadcrumb = root.join(BREADCRUMB_FILE);
        BreadcrumbWriter::new(fs).write(&breadcrumb, params.as_map())?;

        Ok((flavor_files, removed, breadcrumb))
    }

    fn write_all(&self, structure: &ProjectStructure) -> HatcheryResult<()> {
        self.filesystem.create_dir_all(structure.root())?;

        for entry in structure.entries() {
            let path = structure.root().join(entry.path());
            match entry {
                FsEntry::Directory(_) => self.filesystem.create_dir_all(&path)?,
                FsEntry::File(file) => {
                    if let Some(parent) = path.parent() {
                        self.filesystem.create_dir_all(parent)?;
                    }
                    self.filesystem.write_file(&path, &file.content)?;
                    if file.permissions.executable_flag() {
                        self.filesystem.set_permissions(&path, true)?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Best-effort rollback on failure.
    fn rollback(&self, root: &Path) {
        if let Err(e) = self.filesystem.remove_dir_all(root) {
            warn!(error = %e, path = %root.display(), "Rollback failed");
        } else {
            info!("Rollback successful");
        }
    }
}
