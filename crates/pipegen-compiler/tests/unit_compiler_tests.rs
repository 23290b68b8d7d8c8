//! Unit tests for compiler behavior shared by all backends
//!
//! Tests error reporting, determinism, the bash and CodeCatalyst renderers
//! and step order preservation across backends.

use pipegen_compiler::*;
use pipegen_core::ir::{CompiledPipeline, GithubStepConfig, GitlabStepConfig};
use pipegen_core::*;
use pipegen_parser::PipelineParser;

fn env() -> Environment {
    Environment::new("123456789012", "eu-west-1")
}

fn config(engine: PipelineEngine) -> PipelineConfig {
    PipelineConfig::new(ProjectConfig::new("webapp"), RoleConfig::with_default("arn:default"))
        .with_engine(engine)
        .with_stage(DeploymentStage::new("dev", env()))
        .with_stage(DeploymentStage::new("prod", env()).with_manual_approval())
        .with_independent_stage(IndependentStage::new("sandbox", env()))
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_unresolvable_credential() {
    let roles = RoleConfig::default()
        .synth("arn:synth")
        .asset_publishing("arn:assets")
        .deployment_for("dev", "arn:dev");
    let config = PipelineConfig::new(ProjectConfig::default(), roles)
        .with_stage(DeploymentStage::new("dev", env()))
        .with_stage(DeploymentStage::new("prod", env()));

    for engine in [
        PipelineEngine::Github,
        PipelineEngine::Gitlab,
        PipelineEngine::Bash,
        PipelineEngine::CodeCatalyst,
    ] {
        let err = PipelineCompiler::new()
            .compile(&config.clone().with_engine(engine))
            .unwrap_err();
        assert!(
            matches!(
                &err,
                CompileError::UnresolvableCredential { stage: Some(stage), .. } if stage == "prod"
            ),
            "{}: unexpected error {:?}",
            engine,
            err
        );
    }
}

#[test]
fn test_missing_asset_role() {
    let roles = RoleConfig::default().deployment_for("dev", "arn:dev");
    let config = PipelineConfig::new(ProjectConfig::default(), roles)
        .with_stage(DeploymentStage::new("dev", env()));

    let err = PipelineCompiler::new().compile(&config).unwrap_err();
    assert_eq!(
        err,
        CompileError::UnresolvableCredential {
            operation: Operation::AssetPublishing,
            stage: None,
        }
    );
}

#[test]
fn test_duplicate_stage() {
    let config = config(PipelineEngine::Github).with_stage(DeploymentStage::new("dev", env()));
    let err = PipelineCompiler::new().compile(&config).unwrap_err();
    assert_eq!(err, CompileError::DuplicateStage("dev".to_string()));
}

#[test]
fn test_inconsistent_approval() {
    let config = config(PipelineEngine::Gitlab)
        .with_stage(DeploymentStage::new("dev", env()).with_manual_approval());
    let err = PipelineCompiler::new().compile(&config).unwrap_err();
    assert_eq!(err, CompileError::InconsistentApproval("dev".to_string()));
}

#[test]
fn test_unsupported_custom_step() {
    let github_only = CustomStep::new("gh-notify").with_github(GithubStepConfig::default());
    let config = config(PipelineEngine::Gitlab)
        .with_pre_install_step(Step::custom(github_only.clone()));

    let err = PipelineCompiler::new().compile(&config).unwrap_err();
    assert_eq!(
        err,
        CompileError::UnsupportedRenderTarget {
            step: "custom 'gh-notify'".to_string(),
            engine: PipelineEngine::Gitlab,
        }
    );

    // Same step is fine where it has a rendering
    let config = self::config(PipelineEngine::Github).with_pre_install_step(Step::custom(github_only));
    assert!(PipelineCompiler::new().compile(&config).is_ok());
}

#[test]
fn test_custom_step_ignored_by_codecatalyst() {
    let gitlab_only = CustomStep::new("gl-only").with_gitlab(GitlabStepConfig::default());
    let config = config(PipelineEngine::CodeCatalyst).with_pre_install_step(Step::custom(gitlab_only));
    assert!(PipelineCompiler::new().compile(&config).is_ok());
}

#[test]
fn test_invalid_step_rejected() {
    let config = config(PipelineEngine::Bash)
        .with_pre_install_step(Step::assume_role(AssumeRoleConfig::new(" ")));
    let err = PipelineCompiler::new().compile(&config).unwrap_err();
    assert!(matches!(err, CompileError::InvalidStep(_)));
}

// =============================================================================
// Artifact validation
// =============================================================================

fn with_dangling_download(engine: PipelineEngine) -> PipelineConfig {
    let mut config = config(engine);
    config.stages[0]
        .post_deploy_steps
        .push(Step::download_artifact("test-report", "reports/"));
    config
}

#[test]
fn test_artifact_validation_is_opt_in() {
    let config = with_dangling_download(PipelineEngine::Github);
    assert!(PipelineCompiler::new().compile(&config).is_ok());
}

#[test]
fn test_dangling_artifact_detected() {
    let compiler = PipelineCompiler::with_options(CompilerOptions {
        validate_artifacts: true,
    });

    for engine in [PipelineEngine::Github, PipelineEngine::Gitlab, PipelineEngine::Bash] {
        let err = compiler.compile(&with_dangling_download(engine)).unwrap_err();
        assert!(
            matches!(&err, CompileError::DanglingArtifact { artifact, .. } if artifact == "test-report"),
            "{}: unexpected error {:?}",
            engine,
            err
        );
    }
}

#[test]
fn test_generated_artifacts_validate() {
    let compiler = PipelineCompiler::with_options(CompilerOptions {
        validate_artifacts: true,
    });
    for engine in [PipelineEngine::Github, PipelineEngine::Gitlab, PipelineEngine::Bash] {
        assert!(compiler.compile(&config(engine)).is_ok(), "{}", engine);
    }
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn test_output_is_deterministic() {
    let mut roles = RoleConfig::with_default("arn:default");
    for stage in ["zeta", "alpha", "mid"] {
        roles = roles
            .deployment_for(stage, format!("arn:{}", stage))
            .asset_publishing_for(stage, format!("arn:assets-{}", stage));
    }

    for engine in [
        PipelineEngine::Github,
        PipelineEngine::Gitlab,
        PipelineEngine::Bash,
        PipelineEngine::CodeCatalyst,
    ] {
        let config = PipelineConfig::new(ProjectConfig::default(), roles.clone())
            .with_engine(engine)
            .with_stage(DeploymentStage::new("zeta", env()))
            .with_stage(DeploymentStage::new("alpha", env()))
            .with_independent_stage(IndependentStage::new("mid", env()));

        let first = serde_json::to_string(&PipelineCompiler::new().compile(&config).unwrap()).unwrap();
        let second =
            serde_json::to_string(&PipelineCompiler::new().compile(&config).unwrap()).unwrap();
        assert_eq!(first, second);
        assert!(first.find("zeta").unwrap() < first.find("alpha").unwrap());
    }
}

// =============================================================================
// Bash
// =============================================================================

#[test]
fn test_bash_script() {
    let compiled = PipelineCompiler::new()
        .compile(&config(PipelineEngine::Bash))
        .unwrap();
    let script = match compiled {
        CompiledPipeline::Bash { script } => script,
        other => panic!("unexpected output {:?}", other.engine()),
    };

    let titles: Vec<_> = script.sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Synth",
            "Publish assets",
            "Stage dev",
            "Stage prod (manual approval)",
            "Independent stage sandbox",
        ]
    );

    let text = script.to_script();
    assert!(text.starts_with("#!/usr/bin/env bash\nset -euo pipefail\n"));
    assert!(text.contains("echo \"Login to AWS using role arn:default for region eu-west-1\""));

    let commands: Vec<_> = script.commands().collect();
    let deploy_dev = commands.iter().position(|c| *c == "npx projen deploy:dev").unwrap();
    let deploy_prod = commands.iter().position(|c| *c == "npx projen deploy:prod").unwrap();
    assert!(deploy_dev < deploy_prod);
}

#[test]
fn test_step_order_matches_across_backends() {
    let steps = vec![
        Step::command(["npm ci"]),
        Step::assume_role(AssumeRoleConfig::new("arn:role").with_region("eu-west-1")),
        Step::command(["npm run build"]),
        Step::upload_artifact("dist", "dist/"),
        Step::command(["npm run deploy"]),
    ];

    let bash = BashCodegen::render_steps(&steps).unwrap();
    let github = GithubCodegen::render_steps(&steps).unwrap();
    assert_eq!(bash.commands.len(), steps.len());
    assert_eq!(github.steps.len(), steps.len());

    for ((step, line), rendered) in steps.iter().zip(&bash.commands).zip(&github.steps) {
        match step {
            Step::Command(commands) => {
                assert_eq!(line, &commands[0]);
                assert_eq!(rendered.run.as_ref(), Some(&commands[0]));
            }
            Step::AssumeRole(config) => {
                assert!(line.contains(&config.role_arn));
                assert_eq!(rendered.with["role-to-assume"], config.role_arn);
            }
            Step::UploadArtifact(config) => {
                assert!(line.contains(&config.name));
                assert_eq!(rendered.with["name"], config.name);
            }
            other => panic!("unexpected step {:?}", other),
        }
    }
}

// =============================================================================
// CodeCatalyst
// =============================================================================

#[test]
fn test_codecatalyst_is_deferred() {
    let compiled = PipelineCompiler::new()
        .compile(&config(PipelineEngine::CodeCatalyst))
        .unwrap();
    let workflow = match compiled {
        CompiledPipeline::CodeCatalyst { workflow } => workflow,
        other => panic!("unexpected output {:?}", other.engine()),
    };

    let ids: Vec<_> = workflow.actions.ids().collect();
    assert_eq!(ids, vec!["synth", "assetUpload", "deploy-dev"]);
    assert!(workflow.notice.contains("prod, sandbox"));

    let deploy = workflow.actions.get("deploy-dev").unwrap();
    assert_eq!(deploy.needs, vec!["assetUpload"]);
    assert_eq!(deploy.commands, vec!["npx projen install:ci", "npx projen deploy:dev"]);
}

// =============================================================================
// Parse and compile
// =============================================================================

#[test]
fn test_compile_parsed_configuration() {
    let yaml = r#"
engine: gitlab
branch: release
project:
  name: shop
iam_role_arns:
  default: arn:aws:iam::123456789012:role/ci
stages:
  - name: dev
    env:
      account: "123456789012"
      region: eu-west-1
  - name: prod
    manual_approval: true
    env:
      account: "210987654321"
      region: eu-west-1
"#;

    let config = PipelineParser::parse(yaml).unwrap();
    let compiled = PipelineCompiler::new().compile(&config).unwrap();
    assert_eq!(compiled.engine(), PipelineEngine::Gitlab);

    let gitlab = match compiled {
        CompiledPipeline::Gitlab { config } => config,
        other => panic!("unexpected output {:?}", other.engine()),
    };
    let diff = gitlab.jobs.get("diff-prod").unwrap();
    assert_eq!(diff.only.as_ref().unwrap().refs, vec!["release"]);
}
