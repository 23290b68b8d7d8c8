//! Per-backend job graph builders
//!
//! Each builder walks the stage topology, describes its jobs as
//! [`JobPlan`]s from the shared step sequences and renders them with the
//! backend's step codegen.

mod assembler;
mod bash;
mod codecatalyst;
mod github;
mod gitlab;
mod plan;

pub use assembler::{outputs_artifact, ASSET_REGION, CLOUD_ASSEMBLY_ARTIFACT};
pub use github::DEFAULT_RUNNER;
pub use gitlab::DEFAULT_IMAGE;
pub use plan::{deploy_job_id, diff_job_id, JobPlan};

pub(crate) use bash::BashPipelineBuilder;
pub(crate) use codecatalyst::CodeCatalystPipelineBuilder;
pub(crate) use github::GithubPipelineBuilder;
pub(crate) use gitlab::GitlabPipelineBuilder;
