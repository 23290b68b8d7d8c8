//! Programmatic configuration example
//!
//! Builds a pipeline in code instead of YAML, compiles it for GitLab and
//! prints both the job graph as JSON and the rendered .gitlab-ci.yml.

use pipegen_core::{
    DeploymentStage, Environment, IndependentStage, PipelineConfig, ProjectConfig, RoleConfig,
    RunnerSelection, Step,
};
use pipegen_sdk::{PipelineEngine, PipelineGeneratorBuilder};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Programmatic Config Example ===\n");

    let roles = RoleConfig::with_default("arn:aws:iam::123456789012:role/ci")
        .deployment_for("prod", "arn:aws:iam::210987654321:role/deploy");

    let config = PipelineConfig::new(ProjectConfig::new("billing"), roles)
        .with_engine(PipelineEngine::Gitlab)
        .with_runner_tags(RunnerSelection::with_default(["aws", "docker"]))
        .with_stage(
            DeploymentStage::new("dev", Environment::new("123456789012", "eu-central-1"))
                .with_post_deploy_step(Step::command(["npm run integ"])),
        )
        .with_stage(
            DeploymentStage::new("prod", Environment::new("210987654321", "eu-west-1"))
                .with_manual_approval(),
        )
        .with_independent_stage(IndependentStage::new(
            "tooling",
            Environment::new("123456789012", "us-east-1"),
        ));

    let generator = PipelineGeneratorBuilder::new().with_config(config).build()?;

    println!("Job graph:");
    println!("{}\n", generator.render_json()?);

    for file in generator.render_files()? {
        println!("--- {} ---", file.path.display());
        println!("{}", file.content);
    }

    Ok(())
}
