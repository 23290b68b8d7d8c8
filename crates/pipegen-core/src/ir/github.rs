//! GitHub Actions workflow model
//!
//! Jobs are nodes of one workflow; `needs` edges reference sibling job ids.

use crate::ir::fragment::GithubStep;
use crate::ir::job_map::JobMap;
use crate::ir::permissions::JobPermissions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A workflow file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GithubWorkflow {
    /// Workflow name, also the file stem
    pub name: String,

    /// Trigger specification
    pub on: WorkflowTriggers,

    /// Jobs in declaration order
    pub jobs: JobMap<GithubJob>,
}

impl GithubWorkflow {
    pub fn new(name: impl Into<String>, on: WorkflowTriggers) -> Self {
        Self {
            name: name.into(),
            on,
            jobs: JobMap::new(),
        }
    }

    /// Path of the workflow file relative to the repository root
    pub fn file_path(&self) -> String {
        format!(".github/workflows/{}.yml", self.name)
    }

    /// True if the workflow can only be started by a manual dispatch
    pub fn is_manual_only(&self) -> bool {
        self.on.push.is_none() && self.on.workflow_dispatch.is_some()
    }
}

/// Workflow triggers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowTriggers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push: Option<PushTrigger>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_dispatch: Option<WorkflowDispatch>,
}

impl WorkflowTriggers {
    /// Push to a branch plus a parameterless manual dispatch
    pub fn push_and_dispatch(branch: impl Into<String>) -> Self {
        Self {
            push: Some(PushTrigger {
                branches: vec![branch.into()],
            }),
            workflow_dispatch: Some(WorkflowDispatch::default()),
        }
    }

    /// Manual dispatch only
    pub fn dispatch(inputs: BTreeMap<String, DispatchInput>) -> Self {
        Self {
            push: None,
            workflow_dispatch: Some(WorkflowDispatch { inputs }),
        }
    }

    /// Inputs the dispatching caller must supply
    pub fn required_inputs(&self) -> Vec<&str> {
        self.workflow_dispatch
            .iter()
            .flat_map(|dispatch| dispatch.inputs.iter())
            .filter(|(_, input)| input.required)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushTrigger {
    pub branches: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowDispatch {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub inputs: BTreeMap<String, DispatchInput>,
}

/// A caller-supplied dispatch input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchInput {
    pub description: String,
    pub required: bool,
}

/// A job of a workflow
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GithubJob {
    /// Display name
    pub name: String,

    /// Sibling job ids that must finish first
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub needs: Vec<String>,

    /// Runner labels
    #[serde(rename = "runs-on")]
    pub runs_on: Vec<String>,

    /// Capability grants
    pub permissions: JobPermissions,

    /// Job environment
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,

    /// Steps, starting with the checkout action
    pub steps: Vec<GithubStep>,
}
