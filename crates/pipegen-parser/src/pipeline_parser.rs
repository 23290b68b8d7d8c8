//! Pipeline configuration parser
//!
//! Parses a YAML pipeline description into a [`PipelineConfig`].

use crate::error::{ParseError, Result};
use crate::role_parser::RoleParser;
use crate::step_parser::StepParser;
use crate::yaml_parser::YamlParser;
use pipegen_core::ast::pipeline::DEFAULT_BRANCH;
use pipegen_core::ast::{
    DeploymentStage, Environment, IndependentStage, PipelineConfig, ProjectConfig,
};
use pipegen_core::PipelineEngine;
use serde_yaml::Value as YamlValue;

const PIPELINE_FIELDS: &[&str] = &[
    "engine",
    "branch",
    "project",
    "iam_role_arns",
    "runner_tags",
    "image",
    "use_package_registry",
    "pre_install_steps",
    "pre_synth_steps",
    "post_synth_steps",
    "stages",
    "independent_stages",
];

const STAGE_FIELDS: &[&str] = &[
    "name",
    "env",
    "manual_approval",
    "post_diff_steps",
    "post_deploy_steps",
];

const INDEPENDENT_STAGE_FIELDS: &[&str] = &["name", "env", "post_diff_steps", "post_deploy_steps"];

/// Pipeline parser
pub struct PipelineParser;

impl PipelineParser {
    /// Parse a pipeline configuration from YAML string
    pub fn parse(yaml_str: &str) -> Result<PipelineConfig> {
        let yaml = YamlParser::parse(yaml_str)?;
        Self::parse_from_yaml(&yaml)
    }

    /// Parse a pipeline configuration from YAML value
    pub fn parse_from_yaml(yaml: &YamlValue) -> Result<PipelineConfig> {
        if !yaml.is_mapping() {
            return Err(ParseError::InvalidValue {
                field: "pipeline".to_string(),
                message: format!("expected a mapping, got {}", YamlParser::type_name(yaml)),
            });
        }
        YamlParser::validate_fields_strict(yaml, PIPELINE_FIELDS, "pipeline")?;

        let engine = match YamlParser::get_optional_string(yaml, "engine") {
            Some(engine) => engine
                .parse::<PipelineEngine>()
                .map_err(|message| ParseError::InvalidValue {
                    field: "engine".to_string(),
                    message,
                })?,
            None => PipelineEngine::default(),
        };

        let branch = YamlParser::get_optional_string(yaml, "branch")
            .unwrap_or_else(|| DEFAULT_BRANCH.to_string());

        let project = Self::parse_project(yaml.get("project").unwrap_or(&YamlValue::Null))?;
        let iam_role_arns =
            RoleParser::parse_roles(yaml.get("iam_role_arns").unwrap_or(&YamlValue::Null))?;
        let runner_tags =
            RoleParser::parse_runner_tags(yaml.get("runner_tags").unwrap_or(&YamlValue::Null))?;

        let stages = match YamlParser::get_optional_array(yaml, "stages")? {
            Some(items) => items
                .iter()
                .enumerate()
                .map(|(idx, item)| {
                    Self::parse_stage(item).map_err(|e| e.at(&format!("stages[{}]", idx)))
                })
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };

        let independent_stages = match YamlParser::get_optional_array(yaml, "independent_stages")? {
            Some(items) => items
                .iter()
                .enumerate()
                .map(|(idx, item)| {
                    Self::parse_independent_stage(item)
                        .map_err(|e| e.at(&format!("independent_stages[{}]", idx)))
                })
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };

        let config = PipelineConfig {
            engine,
            branch,
            project,
            iam_role_arns,
            runner_tags,
            image: YamlParser::get_optional_string(yaml, "image"),
            use_package_registry: YamlParser::get_optional_bool(yaml, "use_package_registry")?
                .unwrap_or(false),
            pre_install_steps: StepParser::parse_step_list(yaml, "pre_install_steps")?,
            pre_synth_steps: StepParser::parse_step_list(yaml, "pre_synth_steps")?,
            post_synth_steps: StepParser::parse_step_list(yaml, "post_synth_steps")?,
            stages,
            independent_stages,
        };

        log::debug!(
            "Parsed {} pipeline with {} stage(s) and {} independent stage(s)",
            config.engine,
            config.stages.len(),
            config.independent_stages.len()
        );

        Ok(config)
    }

    /// Parse the `project` section, filling unset templates with defaults
    fn parse_project(value: &YamlValue) -> Result<ProjectConfig> {
        if value.is_null() {
            return Ok(ProjectConfig::default());
        }
        serde_yaml::from_value(value.clone()).map_err(|e| ParseError::InvalidValue {
            field: "project".to_string(),
            message: e.to_string(),
        })
    }

    fn parse_environment(stage: &YamlValue) -> Result<Environment> {
        let env = stage.get("env").ok_or_else(|| ParseError::MissingField {
            field: "env".to_string(),
        })?;

        let account = YamlParser::get_scalar_string(env, "account").map_err(|e| e.at("env"))?;
        let region = YamlParser::get_scalar_string(env, "region").map_err(|e| e.at("env"))?;

        Ok(Environment { account, region })
    }

    fn parse_stage_name(stage: &YamlValue) -> Result<String> {
        let name = YamlParser::get_string(stage, "name")?;
        if name.trim().is_empty() {
            return Err(ParseError::InvalidValue {
                field: "name".to_string(),
                message: "stage names must not be empty".to_string(),
            });
        }
        Ok(name)
    }

    /// Parse one entry of `stages`
    pub fn parse_stage(stage: &YamlValue) -> Result<DeploymentStage> {
        YamlParser::validate_fields_strict(stage, STAGE_FIELDS, "stage")?;

        Ok(DeploymentStage {
            name: Self::parse_stage_name(stage)?,
            env: Self::parse_environment(stage)?,
            manual_approval: YamlParser::get_optional_bool(stage, "manual_approval")?
                .unwrap_or(false),
            post_diff_steps: StepParser::parse_step_list(stage, "post_diff_steps")?,
            post_deploy_steps: StepParser::parse_step_list(stage, "post_deploy_steps")?,
        })
    }

    /// Parse one entry of `independent_stages`
    pub fn parse_independent_stage(stage: &YamlValue) -> Result<IndependentStage> {
        YamlParser::validate_fields_strict(stage, INDEPENDENT_STAGE_FIELDS, "independent stage")?;

        Ok(IndependentStage {
            name: Self::parse_stage_name(stage)?,
            env: Self::parse_environment(stage)?,
            post_diff_steps: StepParser::parse_step_list(stage, "post_diff_steps")?,
            post_deploy_steps: StepParser::parse_step_list(stage, "post_deploy_steps")?,
        })
    }
}
