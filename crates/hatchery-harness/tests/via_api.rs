//! Runs the combinatorial checks in-process against the bundled template.

use std::path::PathBuf;

use hatchery_core::domain::{DependencyManagementMode, PythonVersion, PythonVersionMode};
use hatchery_harness::{
    ApiInvoker, BuildRunner, CaseReport, Combination, Harness, HarnessFilter, HarnessOptions,
    Interpreters, Outcome, PackageInspector, VagrantRunner, build_vm_combinations,
    ci_combinations, defaults, non_defaults,
};
use tempfile::TempDir;

fn template_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../templates/python-project")
}

fn harness(root: &TempDir) -> Harness<ApiInvoker> {
    Harness::new(
        ApiInvoker::default(),
        HarnessOptions::new(template_dir(), root.path()),
    )
}

fn assert_all_passed(reports: &[CaseReport]) {
    let failures: Vec<String> = reports
        .iter()
        .filter(|r| r.outcome != Outcome::Passed)
        .map(|r| format!("{}: {}", r.combination, r.outcome))
        .collect();
    assert!(failures.is_empty(), "failing cases:\n{}", failures.join("\n"));
}

#[test]
fn default_combinations_pass() {
    let root = TempDir::new().unwrap();
    let reports = harness(&root).run_all(&defaults());
    assert_eq!(reports.len(), defaults().len());
    assert_all_passed(&reports);
}

#[test]
fn non_default_make_targets_pass_static_checks() {
    let root = TempDir::new().unwrap();
    assert_all_passed(&harness(&root).run_all(&non_defaults()));
}

#[test]
fn passing_cases_are_torn_down() {
    let root = TempDir::new().unwrap();
    let cases = &defaults()[..1];
    assert_all_passed(&harness(&root).run_all(cases));
    assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
}

#[test]
fn retained_cases_keep_output_and_params_file() {
    let root = TempDir::new().unwrap();
    let mut options = HarnessOptions::new(template_dir(), root.path());
    options.retain = true;
    let harness = Harness::new(ApiInvoker::default(), options);

    let case = defaults().remove(0);
    assert_eq!(harness.run(&case), Outcome::Passed);

    let dirs: Vec<_> = std::fs::read_dir(root.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(dirs.len(), 1);
    assert!(dirs[0].file_name().unwrap().to_string_lossy().starts_with("api-"));
    assert!(dirs[0].join("test-params.txt").is_file());
    assert!(dirs[0].join("example-package").is_dir());
}

#[test]
fn missing_template_fails_the_case() {
    let root = TempDir::new().unwrap();
    let harness = Harness::new(
        ApiInvoker::default(),
        HarnessOptions::new(root.path().join("nope"), root.path()),
    );
    let outcome = harness.run(&defaults()[0]);
    assert!(outcome.is_failure(), "{outcome}");
}

#[test]
fn filter_narrows_the_matrix() {
    let filter = HarnessFilter::from_lookup(|key| match key {
        "HATCHERY_ONLY_FLAVOR" => Some("flask_app".to_string()),
        _ => None,
    })
    .unwrap();
    let cases = filter.apply(defaults());
    assert!(!cases.is_empty());
    assert!(cases.iter().all(|c| c.flavor.as_str() == "flask_app"));

    let root = TempDir::new().unwrap();
    assert_all_passed(&harness(&root).run_all(&cases));
}

#[test]
fn every_ci_shape_and_interpreter_set_passes() {
    let root = TempDir::new().unwrap();
    assert_all_passed(&harness(&root).run_all(&ci_combinations()));
}

fn building_harness(root: &TempDir) -> Harness<ApiInvoker> {
    let mut options = HarnessOptions::new(template_dir(), root.path());
    options.build = true;
    Harness::new(ApiInvoker::default(), options)
}

fn py3_case() -> Combination {
    Combination::new(
        DependencyManagementMode::default(),
        Default::default(),
        PythonVersionMode::Py3Only,
    )
}

#[test]
fn missing_interpreter_skips_before_make() {
    let root = TempDir::new().unwrap();
    let interpreters = PythonVersion::ALL
        .into_iter()
        .fold(Interpreters::default(), |acc, v| {
            acc.with_program(v, format!("/no/interpreter/{}", v.executable()))
        });
    let harness = building_harness(&root)
        .with_tools(BuildRunner::new("/no/make"), PackageInspector::default())
        .with_interpreters(interpreters);

    let outcome = harness.run(&py3_case());
    match &outcome {
        Outcome::Skipped { reason } => assert!(reason.contains("/no/interpreter/"), "{reason}"),
        other => panic!("expected a skip, got {other}"),
    }
    assert!(!outcome.is_failure());
}

#[test]
fn missing_make_skips_instead_of_failing() {
    let root = TempDir::new().unwrap();
    // Any program answering `--version` stands in for the interpreters.
    let interpreters = PythonVersion::ALL
        .into_iter()
        .fold(Interpreters::default(), |acc, v| acc.with_program(v, env!("CARGO")));
    let harness = building_harness(&root)
        .with_tools(BuildRunner::new("/no/make"), PackageInspector::default())
        .with_interpreters(interpreters);

    let outcome = harness.run(&py3_case());
    match &outcome {
        Outcome::Skipped { reason } => assert!(reason.contains("/no/make"), "{reason}"),
        other => panic!("expected a skip, got {other}"),
    }
    assert!(!outcome.is_failure());
    assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
}

#[test]
fn build_vm_cases_skip_without_vagrant() {
    let root = TempDir::new().unwrap();
    let harness = harness(&root).with_vagrant(VagrantRunner::new("/no/vagrant", "git"));

    let cases = build_vm_combinations();
    assert!(!cases.is_empty());
    for report in harness.run_all_in_vm(&cases) {
        assert!(
            matches!(&report.outcome, Outcome::Skipped { reason } if reason.contains("/no/vagrant")),
            "{}: {}",
            report.combination,
            report.outcome
        );
    }
    assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
}
