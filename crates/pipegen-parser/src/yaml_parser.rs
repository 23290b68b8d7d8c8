//! YAML Parser
//!
//! Provides utilities for reading fields out of YAML configuration values.

use crate::error::{ParseError, Result};
use serde_yaml::Value as YamlValue;

/// YAML parser utilities
pub struct YamlParser;

impl YamlParser {
    /// Parse YAML string into a YAML value
    pub fn parse(yaml_str: &str) -> Result<YamlValue> {
        Ok(serde_yaml::from_str(yaml_str)?)
    }

    /// Get a required string field from YAML object
    pub fn get_string(obj: &YamlValue, field: &str) -> Result<String> {
        obj.get(field)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| ParseError::MissingField {
                field: field.to_string(),
            })
    }

    /// Get an optional string field from YAML object
    pub fn get_optional_string(obj: &YamlValue, field: &str) -> Option<String> {
        obj.get(field)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }

    /// Get a required scalar field as a string
    ///
    /// Account ids are often written unquoted and parse as numbers.
    pub fn get_scalar_string(obj: &YamlValue, field: &str) -> Result<String> {
        match obj.get(field) {
            Some(YamlValue::String(s)) => Ok(s.clone()),
            Some(YamlValue::Number(n)) => Ok(n.to_string()),
            Some(YamlValue::Bool(b)) => Ok(b.to_string()),
            Some(other) => Err(ParseError::InvalidValue {
                field: field.to_string(),
                message: format!("expected a scalar, got {}", Self::type_name(other)),
            }),
            None => Err(ParseError::MissingField {
                field: field.to_string(),
            }),
        }
    }

    /// Get an optional boolean field, rejecting non-boolean values
    pub fn get_optional_bool(obj: &YamlValue, field: &str) -> Result<Option<bool>> {
        match obj.get(field) {
            None | Some(YamlValue::Null) => Ok(None),
            Some(YamlValue::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(ParseError::InvalidValue {
                field: field.to_string(),
                message: format!("expected a boolean, got {}", Self::type_name(other)),
            }),
        }
    }

    /// Get an optional array field from YAML object
    pub fn get_optional_array<'a>(obj: &'a YamlValue, field: &str) -> Result<Option<&'a Vec<YamlValue>>> {
        match obj.get(field) {
            None | Some(YamlValue::Null) => Ok(None),
            Some(YamlValue::Sequence(seq)) => Ok(Some(seq)),
            Some(other) => Err(ParseError::InvalidValue {
                field: field.to_string(),
                message: format!("expected a list, got {}", Self::type_name(other)),
            }),
        }
    }

    /// Convert a value that is a string or a list of strings into a list
    pub fn to_string_list(value: &YamlValue, field: &str) -> Result<Vec<String>> {
        match value {
            YamlValue::String(s) => Ok(vec![s.clone()]),
            YamlValue::Sequence(seq) => seq
                .iter()
                .enumerate()
                .map(|(idx, item)| {
                    item.as_str().map(|s| s.to_string()).ok_or_else(|| {
                        ParseError::InvalidValue {
                            field: format!("{}[{}]", field, idx),
                            message: format!("expected a string, got {}", Self::type_name(item)),
                        }
                    })
                })
                .collect(),
            other => Err(ParseError::InvalidValue {
                field: field.to_string(),
                message: format!(
                    "expected a string or a list of strings, got {}",
                    Self::type_name(other)
                ),
            }),
        }
    }

    /// Human-readable name of a YAML value's type
    pub fn type_name(value: &YamlValue) -> &'static str {
        match value {
            YamlValue::Null => "null",
            YamlValue::Bool(_) => "a boolean",
            YamlValue::Number(_) => "a number",
            YamlValue::String(_) => "a string",
            YamlValue::Sequence(_) => "a list",
            YamlValue::Mapping(_) => "a mapping",
            YamlValue::Tagged(_) => "a tagged value",
        }
    }

    /// Get all keys from a YAML mapping
    pub fn get_keys(obj: &YamlValue) -> Vec<String> {
        if let Some(mapping) = obj.as_mapping() {
            mapping
                .keys()
                .filter_map(|k| k.as_str())
                .map(|s| s.to_string())
                .collect()
        } else {
            Vec::new()
        }
    }

    /// Validate fields in a YAML object against a list of known fields
    /// Returns messages for unknown fields with suggestions
    pub fn validate_fields(obj: &YamlValue, known_fields: &[&str], context: &str) -> Vec<String> {
        let mut unknown = Vec::new();

        for field_name in Self::get_keys(obj) {
            if known_fields.contains(&field_name.as_str()) {
                continue;
            }

            // Check if this is a common typo
            let typo_correction = FIELD_CORRECTIONS
                .iter()
                .find(|(typo, _)| *typo == field_name)
                .map(|(_, correct)| *correct);

            // Try fuzzy matching if no exact typo match
            let suggestion = if let Some(correct) = typo_correction {
                format!(" Did you mean '{}'?", correct)
            } else if let Some(similar) = Self::find_similar_field(&field_name, known_fields) {
                format!(" Did you mean '{}'?", similar)
            } else {
                String::new()
            };

            unknown.push(format!(
                "Unknown field '{}' in {}.{}",
                field_name, context, suggestion
            ));
        }

        unknown
    }

    /// Validate fields strictly - returns error if unknown fields found
    pub fn validate_fields_strict(obj: &YamlValue, known_fields: &[&str], context: &str) -> Result<()> {
        let errors = Self::validate_fields(obj, known_fields, context);

        if !errors.is_empty() {
            for error in &errors {
                log::error!("Field validation error: {}", error);
            }

            return Err(ParseError::UnknownField(errors.join("; ")));
        }

        Ok(())
    }

    /// Find similar field names using Levenshtein distance
    fn find_similar_field(field: &str, known_fields: &[&str]) -> Option<String> {
        known_fields
            .iter()
            .filter(|known| levenshtein_distance(field, known) <= 2)
            .min_by_key(|known| levenshtein_distance(field, known))
            .map(|s| s.to_string())
    }
}

/// Common field name mistakes and their corrections
const FIELD_CORRECTIONS: &[(&str, &str)] = &[
    ("iamRoleArns", "iam_role_arns"),
    ("roles", "iam_role_arns"),
    ("runnerTags", "runner_tags"),
    ("independentStages", "independent_stages"),
    ("manualApproval", "manual_approval"),
    ("preInstallSteps", "pre_install_steps"),
    ("preSynthSteps", "pre_synth_steps"),
    ("postSynthSteps", "post_synth_steps"),
    ("postDiffSteps", "post_diff_steps"),
    ("postDeploySteps", "post_deploy_steps"),
    ("environment", "env"),
    ("branchName", "branch"),
    ("useGithubPackagesForAssembly", "use_package_registry"),
];

/// Calculate Levenshtein distance between two strings
fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();
    let len1 = s1_chars.len();
    let len2 = s2_chars.len();

    if len1 == 0 {
        return len2;
    }
    if len2 == 0 {
        return len1;
    }

    let mut matrix = vec![vec![0; len2 + 1]; len1 + 1];

    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=len2 {
        matrix[0][j] = j;
    }

    for (i, &c1) in s1_chars.iter().enumerate() {
        for (j, &c2) in s2_chars.iter().enumerate() {
            let cost = if c1 == c2 { 0 } else { 1 };
            matrix[i + 1][j + 1] = std::cmp::min(
                std::cmp::min(
                    matrix[i][j + 1] + 1, // deletion
                    matrix[i + 1][j] + 1, // insertion
                ),
                matrix[i][j] + cost, // substitution
            );
        }
    }

    matrix[len1][len2]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_string_accepts_numbers() {
        let yaml = YamlParser::parse("account: 123456789012\nregion: eu-central-1").unwrap();
        assert_eq!(YamlParser::get_scalar_string(&yaml, "account").unwrap(), "123456789012");
        assert_eq!(YamlParser::get_scalar_string(&yaml, "region").unwrap(), "eu-central-1");
        assert!(matches!(
            YamlParser::get_scalar_string(&yaml, "missing"),
            Err(ParseError::MissingField { .. })
        ));
    }

    #[test]
    fn test_optional_bool_rejects_strings() {
        let yaml = YamlParser::parse("flag: \"yes\"").unwrap();
        assert!(YamlParser::get_optional_bool(&yaml, "flag").is_err());
        assert_eq!(YamlParser::get_optional_bool(&yaml, "other").unwrap(), None);
    }

    #[test]
    fn test_string_list_from_scalar_or_sequence() {
        let single = serde_yaml::Value::String("echo hi".to_string());
        assert_eq!(YamlParser::to_string_list(&single, "command").unwrap(), vec!["echo hi"]);

        let yaml = YamlParser::parse("- a\n- b").unwrap();
        assert_eq!(YamlParser::to_string_list(&yaml, "command").unwrap(), vec!["a", "b"]);

        let yaml = YamlParser::parse("- a\n- 1").unwrap();
        let err = YamlParser::to_string_list(&yaml, "command").unwrap_err();
        assert!(err.to_string().contains("command[1]"));
    }

    #[test]
    fn test_validate_fields_suggests_corrections() {
        let yaml = YamlParser::parse("manualApproval: true\nnmae: dev").unwrap();
        let warnings = YamlParser::validate_fields(&yaml, &["name", "manual_approval"], "stage");
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("Did you mean 'manual_approval'?"));
        assert!(warnings[1].contains("Did you mean 'name'?"));
    }

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("stage", "stages"), 1);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("same", "same"), 0);
    }
}
