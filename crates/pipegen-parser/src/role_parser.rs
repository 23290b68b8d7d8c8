//! IAM role and runner tag parsing

use crate::error::{ParseError, Result};
use crate::yaml_parser::YamlParser;
use pipegen_core::ast::{RoleConfig, RunnerSelection};
use serde_yaml::Value as YamlValue;

const ROLE_FIELDS: &[&str] = &[
    "default",
    "synth",
    "asset_publishing",
    "asset_publishing_per_stage",
    "diff",
    "deployment",
];

const RUNNER_FIELDS: &[&str] = &["default", "synth", "asset_publishing", "diff", "deployment"];

/// Parser for role and runner selection policies
pub struct RoleParser;

impl RoleParser {
    /// Parse the `iam_role_arns` section
    pub fn parse_roles(value: &YamlValue) -> Result<RoleConfig> {
        if value.is_null() {
            return Ok(RoleConfig::default());
        }
        YamlParser::validate_fields_strict(value, ROLE_FIELDS, "iam_role_arns")?;

        let roles: RoleConfig =
            serde_yaml::from_value(value.clone()).map_err(|e| ParseError::InvalidValue {
                field: "iam_role_arns".to_string(),
                message: e.to_string(),
            })?;

        let named = roles
            .default
            .iter()
            .chain(roles.synth.iter())
            .chain(roles.asset_publishing.iter())
            .chain(roles.asset_publishing_per_stage.values())
            .chain(roles.diff.values())
            .chain(roles.deployment.values());
        for arn in named {
            if arn.trim().is_empty() {
                return Err(ParseError::InvalidValue {
                    field: "iam_role_arns".to_string(),
                    message: "role ARNs must not be empty".to_string(),
                });
            }
        }

        Ok(roles)
    }

    /// Parse the `runner_tags` section
    ///
    /// A plain list is shorthand for the default tags.
    pub fn parse_runner_tags(value: &YamlValue) -> Result<RunnerSelection> {
        match value {
            YamlValue::Null => Ok(RunnerSelection::default()),
            YamlValue::Sequence(_) | YamlValue::String(_) => Ok(RunnerSelection::with_default(
                YamlParser::to_string_list(value, "runner_tags")?,
            )),
            YamlValue::Mapping(_) => {
                YamlParser::validate_fields_strict(value, RUNNER_FIELDS, "runner_tags")?;
                serde_yaml::from_value(value.clone()).map_err(|e| ParseError::InvalidValue {
                    field: "runner_tags".to_string(),
                    message: e.to_string(),
                })
            }
            other => Err(ParseError::InvalidValue {
                field: "runner_tags".to_string(),
                message: format!(
                    "expected a list or a mapping, got {}",
                    YamlParser::type_name(other)
                ),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roles() {
        let yaml = YamlParser::parse(
            "synth: synthRole\nasset_publishing: publishRole\ndeployment:\n  dev: devRole\n  prod: prodRole",
        )
        .unwrap();
        let roles = RoleParser::parse_roles(&yaml).unwrap();
        assert_eq!(roles.synth.as_deref(), Some("synthRole"));
        assert_eq!(roles.deployment.get("prod").map(String::as_str), Some("prodRole"));
        assert!(roles.default.is_none());
    }

    #[test]
    fn test_parse_roles_rejects_unknown_operation() {
        let yaml = YamlParser::parse("deploy:\n  dev: devRole").unwrap();
        let err = RoleParser::parse_roles(&yaml).unwrap_err();
        assert!(matches!(err, ParseError::UnknownField(_)));
    }

    #[test]
    fn test_parse_roles_rejects_empty_arn() {
        let yaml = YamlParser::parse("default: \"\"").unwrap();
        assert!(RoleParser::parse_roles(&yaml).is_err());
    }

    #[test]
    fn test_runner_tags_list_is_default() {
        let yaml = YamlParser::parse("- custom-runner").unwrap();
        let tags = RoleParser::parse_runner_tags(&yaml).unwrap();
        assert_eq!(tags.default, Some(vec!["custom-runner".to_string()]));
    }

    #[test]
    fn test_runner_tags_mapping() {
        let yaml = YamlParser::parse(
            "synth: [synthTag]\ndiff:\n  dev: [devDiffTag]\ndeployment:\n  dev: [devTag]",
        )
        .unwrap();
        let tags = RoleParser::parse_runner_tags(&yaml).unwrap();
        assert_eq!(tags.synth, Some(vec!["synthTag".to_string()]));
        assert_eq!(
            tags.diff.get("dev"),
            Some(&vec!["devDiffTag".to_string()])
        );
        assert!(tags.default.is_none());
    }
}
