//! Per-step job fragments
//!
//! Rendering a step for a backend yields one fragment. A job is the
//! left-to-right merge of its steps' fragments:
//! - environment maps merge with later keys winning
//! - predecessor lists and grants are unioned
//! - bodies concatenate in step order

use crate::ir::permissions::JobPermissions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A mergeable rendering of one step
pub trait Fragment: Default {
    /// Append `other` after `self`
    fn merge(&mut self, other: Self);

    /// Merge an ordered sequence of fragments
    fn merge_all<I>(fragments: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        fragments.into_iter().fold(Self::default(), |mut acc, fragment| {
            acc.merge(fragment);
            acc
        })
    }
}

fn union_into(target: &mut Vec<String>, other: Vec<String>) {
    for item in other {
        if !target.contains(&item) {
            target.push(item);
        }
    }
}

/// A single GitHub Actions step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub with: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run: Option<String>,
}

impl GithubStep {
    /// Step running a shell command
    pub fn run(command: impl Into<String>) -> Self {
        Self {
            run: Some(command.into()),
            ..Self::default()
        }
    }

    /// Step invoking an action
    pub fn uses(name: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            uses: Some(action.into()),
            ..Self::default()
        }
    }

    pub fn with_input(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.with.insert(key.into(), value.into());
        self
    }
}

/// Fragment for the token-exchange backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubStepConfig {
    /// Steps appended to the job
    pub steps: Vec<GithubStep>,

    /// Job ids this step requires
    pub needs: Vec<String>,

    /// Job-level environment variables
    pub env: BTreeMap<String, String>,

    /// Capability grants
    pub permissions: JobPermissions,
}

impl Fragment for GithubStepConfig {
    fn merge(&mut self, other: Self) {
        self.steps.extend(other.steps);
        union_into(&mut self.needs, other.needs);
        self.env.extend(other.env);
        self.permissions = self.permissions.union(other.permissions);
    }
}

/// Fragment for the label/extends backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitlabStepConfig {
    /// Script lines
    pub commands: Vec<String>,

    /// Alias jobs to extend
    pub extensions: Vec<String>,

    /// Job names this step requires
    pub needs: Vec<String>,

    /// Job variables
    pub env: BTreeMap<String, String>,
}

impl Fragment for GitlabStepConfig {
    fn merge(&mut self, other: Self) {
        self.commands.extend(other.commands);
        union_into(&mut self.extensions, other.extensions);
        union_into(&mut self.needs, other.needs);
        self.env.extend(other.env);
    }
}

/// Fragment for the generic-shell backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BashStepConfig {
    pub commands: Vec<String>,
}

impl Fragment for BashStepConfig {
    fn merge(&mut self, other: Self) {
        self.commands.extend(other.commands);
    }
}

/// Fragment for the deferred backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeCatalystStepConfig {
    pub commands: Vec<String>,
    pub env: BTreeMap<String, String>,
    pub needs: Vec<String>,
}

impl Fragment for CodeCatalystStepConfig {
    fn merge(&mut self, other: Self) {
        self.commands.extend(other.commands);
        self.env.extend(other.env);
        union_into(&mut self.needs, other.needs);
    }
}
