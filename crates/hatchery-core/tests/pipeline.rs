//! End-to-end generation against the bundled `python-project` template.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use hatchery_adapters::{
    DirectoryTemplateStore, InMemoryStore, JinjaRenderer, LocalFilesystem, MemoryFilesystem,
};
use hatchery_core::domain::{BREADCRUMB_FILE, BreadcrumbRecord, ProjectFlavor, STAGING_DIR};
use hatchery_core::prelude::*;
use tempfile::TempDir;

fn template_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../templates/python-project")
}

fn overrides(pairs: &[(&str, &str)]) -> ParameterMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn memory_service() -> (GenerateService, MemoryFilesystem) {
    let fs = MemoryFilesystem::new();
    let service = GenerateService::new(
        Box::new(DirectoryTemplateStore::new()),
        Box::new(JinjaRenderer::new()),
        Box::new(fs.clone()),
    );
    (service, fs)
}

fn local_service() -> GenerateService {
    GenerateService::new(
        Box::new(DirectoryTemplateStore::new()),
        Box::new(JinjaRenderer::new()),
        Box::new(LocalFilesystem::new()),
    )
}

/// Files under the staging subtree of `flavor`, with the module placeholder resolved.
fn staged_files(flavor: ProjectFlavor, root_module: &str) -> BTreeSet<PathBuf> {
    fn walk(dir: &Path, base: &Path, out: &mut Vec<PathBuf>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(&path, base, out);
            } else {
                out.push(path.strip_prefix(base).unwrap().to_path_buf());
            }
        }
    }

    let base = template_dir()
        .join("{{params.package_name}}")
        .join(STAGING_DIR)
        .join(flavor.as_str());
    let mut files = Vec::new();
    walk(&base, &base, &mut files);
    files
        .into_iter()
        .map(|p| {
            PathBuf::from(
                p.to_string_lossy()
                    .replace("{{params.root_module_name}}", root_module),
            )
        })
        .collect()
}

#[test]
fn library_py3_widget_kit() {
    let (service, fs) = memory_service();
    let request = GenerateRequest::new(template_dir(), "/out").with_overrides(overrides(&[
        ("python_version_mode", "py3_only"),
        ("project_flavor", "library"),
        ("package_name", "widget-kit"),
        ("root_module_name", "widget_kit"),
        ("package_version", "1.2.3"),
    ]));

    let report = service.generate(&request).unwrap();
    let root = Path::new("/out/widget-kit");
    assert_eq!(report.project_dir, root);

    assert!(fs.read_file(&root.join("widget_kit/no_op.py")).is_some());
    assert!(fs.read_file(&root.join("widget_kit/__init__.py")).is_some());
    let setup = fs.read_file(&root.join("setup.py")).unwrap();
    assert!(setup.contains("PACKAGE_NAME = 'widget-kit'"));
    assert!(!setup.contains("Python :: 2.7"));
    assert_eq!(fs.read_file(&root.join("VERSION")).unwrap(), "1.2.3\n");

    assert!(
        fs.all_files()
            .iter()
            .all(|p| !p.to_string_lossy().contains(STAGING_DIR))
    );
}

#[test]
fn each_flavor_copies_exactly_its_staging_subtree() {
    for flavor in ProjectFlavor::ALL {
        let (service, fs) = memory_service();
        let request = GenerateRequest::new(template_dir(), "/out")
            .with_overrides(overrides(&[("project_flavor", flavor.as_str())]));

        let report = service.generate(&request).unwrap();

        let copied: BTreeSet<PathBuf> = report.flavor_files.iter().cloned().collect();
        assert_eq!(copied, staged_files(flavor, "example_package"), "{flavor}");
        for file in &copied {
            assert!(fs.read_file(&report.project_dir.join(file)).is_some(), "{flavor}: {file:?}");
        }
        assert!(!fs.exists(&report.project_dir.join(STAGING_DIR)), "{flavor}");
    }
}

#[test]
fn breadcrumb_parses_back_to_the_parameters() {
    let (service, fs) = memory_service();
    let request = GenerateRequest::new(template_dir(), "/out")
        .with_overrides(overrides(&[("author_name", "Grace Hopper")]));

    let report = service.generate(&request).unwrap();
    let crumb_path = report.breadcrumb.clone().unwrap();
    assert_eq!(crumb_path, report.project_dir.join(BREADCRUMB_FILE));

    let record: BreadcrumbRecord =
        serde_json::from_str(&fs.read_file(&crumb_path).unwrap()).unwrap();
    assert_eq!(record.cookiecutter_params, report.params);
    assert_eq!(record.cookiecutter_params["author_name"], "Grace Hopper");
}

#[test]
fn ci_file_follows_dependency_mode() {
    let (service, fs) = memory_service();
    let in_house = service
        .generate(&GenerateRequest::new(template_dir(), "/a"))
        .unwrap();
    let travis = fs.read_file(&in_house.project_dir.join(".travis.yml")).unwrap();
    assert!(travis.contains("language: deb1404"));
    assert!(travis.contains("- 'TOXENV=py27 DEFAULT_PY_ENV=py27'"));
    assert!(travis.contains("deploy:"));
    assert!(!travis.contains("matrix:"));

    let public = service
        .generate(&GenerateRequest::new(template_dir(), "/b").with_overrides(overrides(&[
            ("dependency_management_mode", "public_third_parties"),
            ("python_version_mode", "py27_thru_py3"),
        ])))
        .unwrap();
    let travis = fs.read_file(&public.project_dir.join(".travis.yml")).unwrap();
    assert!(travis.contains("language: python"));
    assert!(travis.contains("python: \"2.7\""));
    assert!(travis.contains("python: \"3.4\""));
    assert!(!travis.contains("deploy:"));
}

#[test]
fn flask_flavor_adds_its_requirement() {
    let (service, fs) = memory_service();
    let report = service
        .generate(
            &GenerateRequest::new(template_dir(), "/out")
                .with_overrides(overrides(&[("project_flavor", "flask_app")])),
        )
        .unwrap();
    let reqs = fs.read_file(&report.project_dir.join("requirements.txt")).unwrap();
    assert!(reqs.lines().any(|l| l.starts_with("Flask ")));
}

#[test]
fn bad_year_fails_before_any_directory_exists() {
    let tmp = TempDir::new().unwrap();
    let request = GenerateRequest::new(template_dir(), tmp.path())
        .with_overrides(overrides(&[("copyright_year", "20X5")]));

    let err = local_service().generate(&request).unwrap_err();

    assert!(err.to_string().contains("copyright_year"), "{err}");
    assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
}

#[cfg(unix)]
#[test]
fn vagrant_scripts_are_executable_on_disk() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    let report = local_service()
        .generate(&GenerateRequest::new(template_dir(), tmp.path()))
        .unwrap();

    for script in [
        "vagrant/install-basic-python.sh",
        "vagrant/make-cleanroom-copy-of-repo.sh",
        "vagrant/provision-build-vm.sh",
    ] {
        let mode = fs::metadata(report.project_dir.join(script))
            .unwrap()
            .permissions()
            .mode();
        assert_ne!(mode & 0o111, 0, "{script} is not executable");
    }
    assert!(!report.project_dir.join(STAGING_DIR).exists());
}

#[test]
fn existing_project_is_refused_then_overwritten_on_request() {
    let tmp = TempDir::new().unwrap();
    let service = local_service();
    let request = GenerateRequest::new(template_dir(), tmp.path());
    service.generate(&request).unwrap();

    let err = service.generate(&request).unwrap_err();
    assert!(err.to_string().contains("already exists"), "{err}");

    let report = service
        .generate(&request.clone().overwrite_if_exists(true))
        .unwrap();
    assert!(report.project_dir.join("setup.py").is_file());
}

#[test]
fn invalid_parameters_never_touch_the_filesystem() {
    let location = Path::new("/templates/python-project");
    let store = InMemoryStore::new();
    store.insert(location, DirectoryTemplateStore::new().load(&template_dir()).unwrap());

    let fs = MemoryFilesystem::new();
    let service = GenerateService::new(
        Box::new(store),
        Box::new(JinjaRenderer::new()),
        Box::new(fs.clone()),
    );

    for (key, value) in [
        ("copyright_year", "20X5"),
        ("project_flavor", "desktop_app"),
        ("package_name", "Widget Kit"),
        ("root_module_name", "widget-kit"),
    ] {
        let request = GenerateRequest::new(location, "/out")
            .with_overrides(overrides(&[(key, value)]));
        let err = service.generate(&request).unwrap_err();
        assert!(err.to_string().contains(key), "{key}: {err}");
    }

    let report = service
        .generate(&GenerateRequest::new(location, "/out").dry_run(true))
        .unwrap();
    assert_eq!(report.project_dir, Path::new("/out/example-package"));
    assert_eq!(fs.mutation_count(), 0);
}
