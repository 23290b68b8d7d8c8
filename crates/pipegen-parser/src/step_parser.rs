//! Step parsing
//!
//! Steps are single-key mappings tagged by kind:
//!
//! ```yaml
//! - command: ["npm run lint"]
//! - assume_role: { role_arn: arn:aws:iam::123456789012:role/deploy, region: eu-central-1 }
//! - upload_artifact: { name: cloud-assembly, path: cdk.out/ }
//! - download_artifact: { name: cloud-assembly, path: cdk.out/ }
//! - custom:
//!     name: login
//!     github: { steps: [{ run: echo Login }] }
//!     gitlab: { commands: [echo Login] }
//! ```

use crate::error::{ParseError, Result};
use crate::yaml_parser::YamlParser;
use pipegen_core::step::{ArtifactConfig, AssumeRoleConfig, CustomStep, Step};
use serde::de::DeserializeOwned;
use serde_yaml::Value as YamlValue;

/// Recognized step kinds
pub const STEP_KINDS: &[&str] = &[
    "command",
    "assume_role",
    "upload_artifact",
    "download_artifact",
    "custom",
];

/// Step parser
pub struct StepParser;

impl StepParser {
    /// Parse an optional list of steps stored under `field`
    pub fn parse_step_list(obj: &YamlValue, field: &str) -> Result<Vec<Step>> {
        let Some(items) = YamlParser::get_optional_array(obj, field)? else {
            return Ok(Vec::new());
        };

        items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                Self::parse_step(item).map_err(|e| e.at(&format!("[{}]", idx)).at(field))
            })
            .collect()
    }

    /// Parse a single step
    pub fn parse_step(value: &YamlValue) -> Result<Step> {
        let mapping = value.as_mapping().ok_or_else(|| ParseError::InvalidStep {
            path: String::new(),
            message: format!(
                "expected a mapping with one of {:?}, got {}",
                STEP_KINDS,
                YamlParser::type_name(value)
            ),
        })?;

        if mapping.len() != 1 {
            return Err(ParseError::InvalidStep {
                path: String::new(),
                message: format!(
                    "a step must have exactly one kind key, found {}",
                    mapping.len()
                ),
            });
        }

        let (key, body) = mapping.iter().next().ok_or_else(|| ParseError::InvalidStep {
            path: String::new(),
            message: "empty step".to_string(),
        })?;
        let kind = key.as_str().unwrap_or_default();

        let step = match kind {
            "command" => Step::Command(YamlParser::to_string_list(body, kind)?),
            "assume_role" => Step::AssumeRole(Self::parse_body::<AssumeRoleConfig>(body, kind)?),
            "upload_artifact" => {
                Step::UploadArtifact(Self::parse_body::<ArtifactConfig>(body, kind)?)
            }
            "download_artifact" => {
                Step::DownloadArtifact(Self::parse_body::<ArtifactConfig>(body, kind)?)
            }
            "custom" => Step::Custom(Self::parse_body::<CustomStep>(body, kind)?),
            other => {
                return Err(ParseError::InvalidStep {
                    path: String::new(),
                    message: format!(
                        "unknown step kind '{}', expected one of {:?}",
                        other, STEP_KINDS
                    ),
                })
            }
        };

        step.validate().map_err(|e| ParseError::InvalidStep {
            path: String::new(),
            message: e.to_string(),
        })?;

        Ok(step)
    }

    fn parse_body<T: DeserializeOwned>(body: &YamlValue, kind: &str) -> Result<T> {
        serde_yaml::from_value(body.clone()).map_err(|e| ParseError::InvalidValue {
            field: kind.to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Result<Step> {
        StepParser::parse_step(&YamlParser::parse(yaml).unwrap())
    }

    #[test]
    fn test_parse_command_scalar() {
        assert_eq!(parse("command: npm test").unwrap(), Step::command(["npm test"]));
    }

    #[test]
    fn test_parse_assume_role() {
        let step = parse("assume_role:\n  role_arn: devRole\n  session_name: ci").unwrap();
        assert_eq!(
            step,
            Step::assume_role(AssumeRoleConfig::new("devRole").with_session_name("ci"))
        );
    }

    #[test]
    fn test_empty_role_arn_is_rejected() {
        let err = parse("assume_role:\n  role_arn: \"\"").unwrap_err();
        assert!(matches!(err, ParseError::InvalidStep { .. }));
    }

    #[test]
    fn test_unknown_kind() {
        let err = parse("shell: ls").unwrap_err();
        assert!(err.to_string().contains("unknown step kind 'shell'"));
    }

    #[test]
    fn test_two_kinds_in_one_step() {
        let err = parse("command: ls\ncustom: {name: x}").unwrap_err();
        assert!(err.to_string().contains("exactly one kind key"));
    }

    #[test]
    fn test_custom_step_with_github_fragment() {
        let step = parse(
            r#"
custom:
  name: login
  github:
    env:
      FOO: bar
    steps:
      - run: echo Login
"#,
        )
        .unwrap();

        let Step::Custom(custom) = step else {
            panic!("expected a custom step");
        };
        assert_eq!(custom.name, "login");
        let github = custom.github.expect("github fragment");
        assert_eq!(github.env.get("FOO").map(String::as_str), Some("bar"));
        assert_eq!(github.steps[0].run.as_deref(), Some("echo Login"));
        assert!(custom.gitlab.is_none());
    }

    #[test]
    fn test_step_list_error_path() {
        let yaml = YamlParser::parse("steps:\n  - command: ok\n  - bogus: 1").unwrap();
        let err = StepParser::parse_step_list(&yaml, "steps").unwrap_err();
        assert!(err.to_string().contains("steps[1]"), "{}", err);
    }
}
