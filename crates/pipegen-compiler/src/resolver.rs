//! Role and runner resolution
//!
//! Every lookup walks a fixed candidate list from most to least specific
//! and returns the first configured value. The lists are:
//!
//! | operation        | candidates                                              |
//! |------------------|---------------------------------------------------------|
//! | synth            | `synth`, `default`                                      |
//! | asset publishing | per-stage entry, `asset_publishing`, `default`          |
//! | diff             | `diff[stage]`, `deployment[stage]`, `default`           |
//! | deployment       | `deployment[stage]`, `default`                          |
//!
//! Runner tags follow the same table, minus per-stage asset publishing.

use crate::error::{CompileError, Result};
use pipegen_core::{RoleConfig, RunnerSelection};
use std::fmt;

/// Pipeline operation a role or runner is looked up for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Synth,
    AssetPublishing,
    Diff,
    Deployment,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Synth => "synth",
            Operation::AssetPublishing => "asset publishing",
            Operation::Diff => "diff",
            Operation::Deployment => "deployment",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First configured value of a candidate list
fn first_present<'a, T: ?Sized>(candidates: impl IntoIterator<Item = Option<&'a T>>) -> Option<&'a T> {
    candidates.into_iter().flatten().next()
}

/// Resolves IAM role ARNs
#[derive(Debug, Clone, Copy)]
pub struct RoleResolver<'a> {
    roles: &'a RoleConfig,
}

impl<'a> RoleResolver<'a> {
    pub fn new(roles: &'a RoleConfig) -> Self {
        Self { roles }
    }

    /// Look up a role, `None` if no level is configured
    pub fn try_resolve(&self, operation: Operation, stage: Option<&str>) -> Option<&'a str> {
        let roles = self.roles;
        let per_stage = |map: &'a std::collections::BTreeMap<String, String>| {
            stage.and_then(|s| map.get(s)).map(String::as_str)
        };
        let default = roles.default.as_deref();

        match operation {
            Operation::Synth => first_present([roles.synth.as_deref(), default]),
            Operation::AssetPublishing => first_present([
                per_stage(&roles.asset_publishing_per_stage),
                roles.asset_publishing.as_deref(),
                default,
            ]),
            Operation::Diff => first_present([
                per_stage(&roles.diff),
                per_stage(&roles.deployment),
                default,
            ]),
            Operation::Deployment => first_present([per_stage(&roles.deployment), default]),
        }
    }

    /// Look up a required role
    pub fn resolve(&self, operation: Operation, stage: Option<&str>) -> Result<String> {
        self.try_resolve(operation, stage)
            .map(str::to_string)
            .ok_or_else(|| CompileError::UnresolvableCredential {
                operation,
                stage: stage.map(str::to_string),
            })
    }
}

/// Resolves runner tags
#[derive(Debug, Clone, Copy)]
pub struct RunnerResolver<'a> {
    runners: &'a RunnerSelection,
}

impl<'a> RunnerResolver<'a> {
    pub fn new(runners: &'a RunnerSelection) -> Self {
        Self { runners }
    }

    /// Look up tags, `None` lets the backend pick its own default
    pub fn resolve(&self, operation: Operation, stage: Option<&str>) -> Option<&'a [String]> {
        let runners = self.runners;
        let per_stage = |map: &'a std::collections::BTreeMap<String, Vec<String>>| {
            stage.and_then(|s| map.get(s)).map(Vec::as_slice)
        };
        let default = runners.default.as_deref();

        match operation {
            Operation::Synth => first_present([runners.synth.as_deref(), default]),
            Operation::AssetPublishing => {
                first_present([runners.asset_publishing.as_deref(), default])
            }
            Operation::Diff => first_present([
                per_stage(&runners.diff),
                per_stage(&runners.deployment),
                default,
            ]),
            Operation::Deployment => first_present([per_stage(&runners.deployment), default]),
        }
    }
}
