//! Parameter validation, run before anything touches the filesystem.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{
    entities::parameters::ParameterMap,
    error::DomainError,
    value_objects::{DependencyManagementMode, ProjectFlavor, PythonVersionMode},
};

static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}$").expect("year pattern"));
static PACKAGE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9-]+$").expect("package pattern"));
static MODULE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_]+$").expect("module pattern"));

/// A single constraint on one parameter.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// Non-empty and not all whitespace.
    NonBlank,
    Pattern(&'static LazyLock<Regex>, &'static str),
    Choice(fn() -> Vec<&'static str>),
}

impl Rule {
    fn check(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let reason = match self {
            Self::NonBlank if value.trim().is_empty() => {
                "must not be empty or whitespace".to_string()
            }
            Self::Pattern(re, shape) if !re.is_match(value) => format!("must be {shape}"),
            Self::Choice(choices) => {
                let choices = choices();
                if choices.iter().any(|c| *c == value) {
                    return Ok(());
                }
                format!("must be one of: {}", choices.join(", "))
            }
            _ => return Ok(()),
        };
        Err(DomainError::InvalidParameter {
            key: key.into(),
            value: value.into(),
            reason,
        })
    }
}

/// Every validated parameter, in check order.
pub static RULES: &[(&str, Rule)] = &[
    ("author_email", Rule::NonBlank),
    ("author_name", Rule::NonBlank),
    ("company_name", Rule::NonBlank),
    ("copyright_year", Rule::Pattern(&YEAR, "a four-digit year")),
    (
        "dependency_management_mode",
        Rule::Choice(DependencyManagementMode::choices),
    ),
    (
        "package_name",
        Rule::Pattern(&PACKAGE_NAME, "letters, digits, and hyphens only"),
    ),
    ("package_version", Rule::NonBlank),
    ("project_flavor", Rule::Choice(ProjectFlavor::choices)),
    ("project_name", Rule::NonBlank),
    ("project_short_description", Rule::NonBlank),
    ("python_version_mode", Rule::Choice(PythonVersionMode::choices)),
    (
        "root_module_name",
        Rule::Pattern(&MODULE_NAME, "lowercase letters, digits, and underscores only"),
    ),
];

/// Stateless validator over a [`ParameterMap`].
pub struct ParameterValidator;

impl ParameterValidator {
    /// Fail on the first violated rule.
    ///
    /// Keys without a rule are passed through unchecked.
    pub fn validate(params: &ParameterMap) -> Result<(), DomainError> {
        for (key, rule) in RULES {
            let value = params
                .get(*key)
                .ok_or_else(|| DomainError::MissingParameter {
                    key: (*key).to_string(),
                })?;
            rule.check(key, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::parameters::test_support::valid_params;

    #[test]
    fn valid_set_passes() {
        assert!(ParameterValidator::validate(&valid_params()).is_ok());
    }

    #[test]
    fn every_choice_value_passes() {
        for flavor in ProjectFlavor::ALL {
            for py in PythonVersionMode::ALL {
                for dep in DependencyManagementMode::ALL {
                    let mut p = valid_params();
                    p.insert("project_flavor".into(), flavor.as_str().into());
                    p.insert("python_version_mode".into(), py.as_str().into());
                    p.insert("dependency_management_mode".into(), dep.as_str().into());
                    assert!(ParameterValidator::validate(&p).is_ok());
                }
            }
        }
    }

    #[test]
    fn single_violation_fails() {
        let cases = [
            ("author_name", ""),
            ("author_email", "   "),
            ("company_name", "\t\n"),
            ("copyright_year", "20X5"),
            ("copyright_year", "95"),
            ("copyright_year", "20155"),
            ("dependency_management_mode", "managed"),
            ("package_name", "widget_kit"),
            ("package_name", "widget kit"),
            ("package_version", " "),
            ("project_flavor", "django_app"),
            ("project_name", ""),
            ("project_short_description", "  "),
            ("python_version_mode", "py36_only"),
            ("root_module_name", "WidgetKit"),
            ("root_module_name", "widget-kit"),
        ];
        for (key, bad) in cases {
            let mut p = valid_params();
            p.insert(key.into(), bad.into());
            match ParameterValidator::validate(&p) {
                Err(DomainError::InvalidParameter { key: k, value, .. }) => {
                    assert_eq!(k, key);
                    assert_eq!(value, bad);
                }
                other => panic!("{key}={bad:?} should fail, got {other:?}"),
            }
        }
    }

    #[test]
    fn missing_key_is_reported() {
        let mut p = valid_params();
        p.remove("root_module_name");
        assert_eq!(
            ParameterValidator::validate(&p),
            Err(DomainError::MissingParameter {
                key: "root_module_name".into()
            })
        );
    }

    #[test]
    fn unknown_keys_pass_through() {
        let mut p = valid_params();
        p.insert("_extra".into(), "".into());
        assert!(ParameterValidator::validate(&p).is_ok());
    }

    #[test]
    fn first_failure_wins() {
        let mut p = valid_params();
        p.insert("author_email".into(), "".into());
        p.insert("root_module_name".into(), "BAD".into());
        let err = ParameterValidator::validate(&p).unwrap_err();
        assert!(matches!(err, DomainError::InvalidParameter { ref key, .. } if key == "author_email"));
    }

    #[test]
    fn year_message_mentions_shape() {
        let mut p = valid_params();
        p.insert("copyright_year".into(), "20X5".into());
        let msg = ParameterValidator::validate(&p).unwrap_err().to_string();
        assert!(msg.contains("four-digit year"), "{msg}");
    }
}
