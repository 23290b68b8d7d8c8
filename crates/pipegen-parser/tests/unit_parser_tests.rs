//! Parser tests over complete pipeline documents

use pipegen_core::ast::ProjectCommands;
use pipegen_core::step::{AssumeRoleConfig, Step};
use pipegen_core::PipelineEngine;
use pipegen_parser::{ParseError, PipelineParser};

const FULL_PIPELINE: &str = r#"
engine: gitlab
branch: release
project:
  name: testapp
  package_namespace: "@assembly"
  pre_install_commands:
    - npm config set registry https://registry.example.com
iam_role_arns:
  synth: synthRole
  asset_publishing: publishRole
  deployment:
    dev: devRole
    prod: prodRole
runner_tags:
  default: [defaultTag]
  deployment:
    prod: [prodTag]
image: node:20
pre_install_steps:
  - command: echo pre-install
stages:
  - name: dev
    env:
      account: 123456789012
      region: eu-central-1
  - name: prod
    manual_approval: true
    env:
      account: "210987654321"
      region: eu-west-1
    post_deploy_steps:
      - command: ["npm run smoke-test"]
independent_stages:
  - name: infra
    env:
      account: 123456789012
      region: us-east-1
    post_diff_steps:
      - assume_role:
          role_arn: auditRole
"#;

#[test]
fn test_parse_full_pipeline() {
    let config = PipelineParser::parse(FULL_PIPELINE).unwrap();

    assert_eq!(config.engine, PipelineEngine::Gitlab);
    assert_eq!(config.branch, "release");
    assert_eq!(config.image.as_deref(), Some("node:20"));
    assert!(!config.use_package_registry);

    assert_eq!(config.project.app_name(), "testapp");
    assert_eq!(
        config.project.install_commands(),
        vec![
            "npm config set registry https://registry.example.com",
            "npx projen install:ci"
        ]
    );

    assert_eq!(config.stages.len(), 2);
    assert_eq!(config.stages[0].name, "dev");
    assert_eq!(config.stages[0].env.account, "123456789012");
    assert!(!config.stages[0].manual_approval);
    assert!(config.stages[1].manual_approval);
    assert_eq!(
        config.stages[1].post_deploy_steps,
        vec![Step::command(["npm run smoke-test"])]
    );

    assert_eq!(config.independent_stages.len(), 1);
    assert_eq!(
        config.independent_stages[0].post_diff_steps,
        vec![Step::assume_role(AssumeRoleConfig::new("auditRole"))]
    );

    assert_eq!(config.pre_install_steps, vec![Step::command(["echo pre-install"])]);
    assert_eq!(
        config.runner_tags.deployment.get("prod"),
        Some(&vec!["prodTag".to_string()])
    );
    assert!(config.needs_versioned_artifacts());
}

#[test]
fn test_defaults_for_minimal_pipeline() {
    let config = PipelineParser::parse("stages: []").unwrap();

    assert_eq!(config.engine, PipelineEngine::Github);
    assert_eq!(config.branch, "main");
    assert_eq!(config.project.cdk_out(), "cdk.out");
    assert!(config.stages.is_empty());
    assert!(config.iam_role_arns.default.is_none());
}

#[test]
fn test_unknown_engine() {
    let err = PipelineParser::parse("engine: jenkins").unwrap_err();
    assert!(matches!(err, ParseError::InvalidValue { ref field, .. } if field == "engine"));
}

#[test]
fn test_unknown_top_level_field_suggests_correction() {
    let err = PipelineParser::parse("independentStages: []").unwrap_err();
    assert!(err.to_string().contains("Did you mean 'independent_stages'?"), "{}", err);
}

#[test]
fn test_missing_region_reports_path() {
    let yaml = r#"
stages:
  - name: dev
    env:
      account: "1"
"#;
    let err = PipelineParser::parse(yaml).unwrap_err();
    assert_eq!(err.to_string(), "Missing required field: stages[0].env.region");
}

#[test]
fn test_invalid_step_in_stage_reports_path() {
    let yaml = r#"
stages:
  - name: dev
    env: { account: "1", region: eu-west-1 }
    post_deploy_steps:
      - command: ok
      - teleport: now
"#;
    let err = PipelineParser::parse(yaml).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("stages[0].post_deploy_steps[1]"), "{}", message);
}

#[test]
fn test_manual_approval_must_be_boolean() {
    let yaml = r#"
stages:
  - name: prod
    manual_approval: "yes"
    env: { account: "1", region: eu-west-1 }
"#;
    let err = PipelineParser::parse(yaml).unwrap_err();
    assert!(err.to_string().contains("manual_approval"), "{}", err);
}

#[test]
fn test_empty_stage_name_rejected() {
    let yaml = r#"
stages:
  - name: ""
    env: { account: "1", region: eu-west-1 }
"#;
    assert!(PipelineParser::parse(yaml).is_err());
}

#[test]
fn test_runner_tags_shorthand() {
    let config = PipelineParser::parse("runner_tags: [custom-runner]").unwrap();
    assert_eq!(config.runner_tags.default, Some(vec!["custom-runner".to_string()]));
}

#[test]
fn test_unknown_project_field_is_rejected() {
    let err = PipelineParser::parse("project:\n  nmae: app").unwrap_err();
    assert!(matches!(err, ParseError::InvalidValue { ref field, .. } if field == "project"));
}

#[test]
fn test_not_a_mapping() {
    assert!(PipelineParser::parse("- just\n- a list").is_err());
}
