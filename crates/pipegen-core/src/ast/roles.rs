//! IAM role and runner selection policies
//!
//! Both policies share the same layered shape: a global default, one value
//! per operation and per-stage overrides for stage-bound operations.
//! Lookup order is implemented by the compiler's resolver.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// IAM role ARNs used by the generated jobs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleConfig {
    /// Fallback role for every operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    /// Role for the synth job
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synth: Option<String>,

    /// Role for asset publishing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_publishing: Option<String>,

    /// Asset publishing roles keyed by stage name
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub asset_publishing_per_stage: BTreeMap<String, String>,

    /// Diff roles keyed by stage name
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub diff: BTreeMap<String, String>,

    /// Deployment roles keyed by stage name
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub deployment: BTreeMap<String, String>,
}

impl RoleConfig {
    /// Config with only a global default role
    pub fn with_default(role_arn: impl Into<String>) -> Self {
        Self {
            default: Some(role_arn.into()),
            ..Self::default()
        }
    }

    pub fn synth(mut self, role_arn: impl Into<String>) -> Self {
        self.synth = Some(role_arn.into());
        self
    }

    pub fn asset_publishing(mut self, role_arn: impl Into<String>) -> Self {
        self.asset_publishing = Some(role_arn.into());
        self
    }

    pub fn asset_publishing_for(mut self, stage: impl Into<String>, role_arn: impl Into<String>) -> Self {
        self.asset_publishing_per_stage
            .insert(stage.into(), role_arn.into());
        self
    }

    pub fn diff_for(mut self, stage: impl Into<String>, role_arn: impl Into<String>) -> Self {
        self.diff.insert(stage.into(), role_arn.into());
        self
    }

    pub fn deployment_for(mut self, stage: impl Into<String>, role_arn: impl Into<String>) -> Self {
        self.deployment.insert(stage.into(), role_arn.into());
        self
    }
}

/// Runner (execution host) tags used by the generated jobs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerSelection {
    /// Fallback tags for every operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Vec<String>>,

    /// Tags for the synth job
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synth: Option<Vec<String>>,

    /// Tags for the asset publishing job
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_publishing: Option<Vec<String>>,

    /// Diff tags keyed by stage name
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub diff: BTreeMap<String, Vec<String>>,

    /// Deployment tags keyed by stage name
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub deployment: BTreeMap<String, Vec<String>>,
}

impl RunnerSelection {
    /// Selection with only default tags
    pub fn with_default<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            default: Some(tags.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }
}
