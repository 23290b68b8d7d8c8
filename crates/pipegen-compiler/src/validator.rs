//! Configuration and job graph validation
//!
//! Configuration checks run before any job is built. Artifact reference
//! checks run on the planned job graph and are opt-in.

use crate::error::{CompileError, Result};
use crate::pipeline::JobPlan;
use pipegen_core::{CoreError, PipelineConfig, Step};
use std::collections::{HashMap, HashSet};

/// Names of the shared execution phases; a stage may not reuse them
const RESERVED_STAGE_NAMES: &[&str] = &["synth", "publish_assets"];

/// Validates pipeline configurations and planned job graphs
pub struct ConfigValidator;

impl ConfigValidator {
    /// Check stage names and every configured step
    pub fn validate(config: &PipelineConfig) -> Result<()> {
        Self::validate_stage_names(config)?;

        let global_steps = config
            .pre_install_steps
            .iter()
            .chain(&config.pre_synth_steps)
            .chain(&config.post_synth_steps);
        Self::validate_steps("pipeline", global_steps)?;

        for stage in &config.stages {
            Self::validate_steps(
                &stage.name,
                stage.post_diff_steps.iter().chain(&stage.post_deploy_steps),
            )?;
        }
        for stage in &config.independent_stages {
            Self::validate_steps(
                &stage.name,
                stage.post_diff_steps.iter().chain(&stage.post_deploy_steps),
            )?;
        }

        Ok(())
    }

    fn validate_stage_names(config: &PipelineConfig) -> Result<()> {
        // None marks an independent stage
        let mut seen: HashMap<&str, Option<bool>> = HashMap::new();

        let declared = config
            .stages
            .iter()
            .map(|stage| (stage.name.as_str(), Some(stage.manual_approval)))
            .chain(
                config
                    .independent_stages
                    .iter()
                    .map(|stage| (stage.name.as_str(), None)),
            );

        for (name, approval) in declared {
            Self::validate_stage_name(name)?;
            if let Some(previous) = seen.insert(name, approval) {
                return Err(match (previous, approval) {
                    (Some(a), Some(b)) if a != b => {
                        CompileError::InconsistentApproval(name.to_string())
                    }
                    _ => CompileError::DuplicateStage(name.to_string()),
                });
            }
        }
        Ok(())
    }

    /// Stage names end up in job ids and file names
    fn validate_stage_name(name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(CompileError::InvalidConfiguration(
                "stage name must not be empty".to_string(),
            ));
        }
        if RESERVED_STAGE_NAMES.contains(&name) {
            return Err(CompileError::InvalidConfiguration(format!(
                "stage name '{}' is reserved",
                name
            )));
        }
        if let Some(invalid) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(CompileError::InvalidConfiguration(format!(
                "stage name '{}' contains invalid character '{}'",
                name, invalid
            )));
        }
        Ok(())
    }

    fn validate_steps<'s>(scope: &str, steps: impl IntoIterator<Item = &'s Step>) -> Result<()> {
        for step in steps {
            step.validate().map_err(|e| {
                let message = match e {
                    CoreError::InvalidStep(message) => message,
                    other => other.to_string(),
                };
                CompileError::InvalidStep(format!("{} in {}", message, scope))
            })?;
        }
        Ok(())
    }

    /// Check that every artifact download has a matching upload
    ///
    /// An upload counts when it happens earlier in the same job or in any
    /// job the downloading job transitively needs.
    pub fn validate_artifact_references(jobs: &[JobPlan]) -> Result<()> {
        let by_id: HashMap<&str, &JobPlan> =
            jobs.iter().map(|job| (job.id.as_str(), job)).collect();

        for job in jobs {
            let mut downloads = job.downloads().peekable();
            if downloads.peek().is_none() {
                continue;
            }

            let upstream: HashSet<&str> = Self::predecessors(job, &by_id)
                .into_iter()
                .flat_map(|id| by_id[id].uploads().map(|(_, name)| name))
                .collect();

            for (index, artifact) in downloads {
                let uploaded_before = job
                    .uploads()
                    .any(|(upload_index, name)| name == artifact && upload_index < index);
                if !uploaded_before && !upstream.contains(artifact) {
                    return Err(CompileError::DanglingArtifact {
                        job: job.id.clone(),
                        artifact: artifact.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Transitive `needs` closure; unknown ids are skipped
    fn predecessors<'j>(job: &'j JobPlan, by_id: &HashMap<&str, &'j JobPlan>) -> HashSet<&'j str> {
        let mut visited = HashSet::new();
        let mut pending: Vec<&str> = job.needs.iter().map(String::as_str).collect();

        while let Some(id) = pending.pop() {
            let Some(&needed) = by_id.get(id) else {
                continue;
            };
            if visited.insert(needed.id.as_str()) {
                pending.extend(needed.needs.iter().map(String::as_str));
            }
        }
        visited
    }
}
