//! Rudimentary Makefile parsing: target names and their prerequisites.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::PathBuf;
use std::sync::LazyLock;

use anyhow::{Context as _, bail};
use regex::Regex;

use crate::combination::MakeTarget;

static RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+):(.*)$").expect("rule pattern"));

/// Rule name to its prerequisites, in file order.
pub fn parse_makefile(text: &str) -> BTreeMap<String, Vec<String>> {
    text.lines()
        .filter_map(|line| RULE.captures(line))
        // `name := value` is an assignment
        .filter(|caps| !caps[2].starts_with('='))
        .map(|caps| {
            let deps = caps[2].split_whitespace().map(str::to_string).collect();
            (caps[1].to_string(), deps)
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct MakefileSpec {
    project_root: PathBuf,
}

impl MakefileSpec {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }

    /// Targets equal the `MakeTarget` set and each has the expected
    /// prerequisites.
    pub fn assert_makefile(&self) -> anyhow::Result<()> {
        let path = self.project_root.join("Makefile");
        let text =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        check_rules(&parse_makefile(&text)).with_context(|| path.display().to_string())
    }
}

fn check_rules(rules: &BTreeMap<String, Vec<String>>) -> anyhow::Result<()> {
    let found: BTreeSet<&str> = rules.keys().map(String::as_str).collect();
    let expected: BTreeSet<&str> = MakeTarget::ALL.iter().map(MakeTarget::as_str).collect();
    if found != expected {
        let missing: Vec<_> = expected.difference(&found).collect();
        let extra: Vec<_> = found.difference(&expected).collect();
        bail!("targets differ: missing {missing:?}, unexpected {extra:?}");
    }

    for target in MakeTarget::ALL {
        let deps: BTreeSet<&str> = rules[target.as_str()].iter().map(String::as_str).collect();
        let want: BTreeSet<&str> = target.dependencies().iter().map(MakeTarget::as_str).collect();
        if deps != want {
            bail!("'{target}' depends on {deps:?}, expected {want:?}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_makefile() -> String {
        let mut text = String::from("PYTHON ?= python3\nROOT_MODULE := pkg\n.DEFAULT_GOAL := all\n.PHONY: all\n\n");
        for target in MakeTarget::ALL {
            let deps: Vec<_> = target.dependencies().iter().map(MakeTarget::as_str).collect();
            text.push_str(&format!("{target}: {}\n\t@echo {target}\n\n", deps.join(" ")));
        }
        text
    }

    #[test]
    fn variables_and_special_targets_are_not_rules() {
        let rules = parse_makefile("ROOT_MODULE := pkg\nX:=1\n.PHONY: all\nall: clean build\n\t$(MAKE) x\n");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules["all"], ["clean", "build"]);
    }

    #[test]
    fn complete_makefile_passes() {
        check_rules(&parse_makefile(&full_makefile())).unwrap();
    }

    #[test]
    fn missing_target_is_named() {
        let text = full_makefile().replace("docs_draft:", "docs_preview:");
        let err = check_rules(&parse_makefile(&text)).unwrap_err().to_string();
        assert!(err.contains("docs_draft"), "{err}");
        assert!(err.contains("docs_preview"), "{err}");
    }

    #[test]
    fn wrong_prerequisites_are_reported() {
        let text = full_makefile().replace("test_wheel: wheel", "test_wheel: build");
        let err = check_rules(&parse_makefile(&text)).unwrap_err().to_string();
        assert!(err.contains("test_wheel"), "{err}");
    }
}
