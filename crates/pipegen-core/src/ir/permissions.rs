//! Capability grants requested from the execution host

use serde::{Deserialize, Serialize};

/// Access level of a single permission
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    None,
    Read,
    Write,
}

/// Permissions of a token-exchange job
///
/// Merging keeps the highest level per permission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct JobPermissions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<PermissionLevel>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<PermissionLevel>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packages: Option<PermissionLevel>,
}

impl JobPermissions {
    pub fn id_token(level: PermissionLevel) -> Self {
        Self {
            id_token: Some(level),
            ..Self::default()
        }
    }

    pub fn with_contents(mut self, level: PermissionLevel) -> Self {
        self.contents = Some(level);
        self
    }

    pub fn with_packages(mut self, level: PermissionLevel) -> Self {
        self.packages = Some(level);
        self
    }

    /// Union of two grant sets
    pub fn union(self, other: JobPermissions) -> JobPermissions {
        JobPermissions {
            id_token: max_level(self.id_token, other.id_token),
            contents: max_level(self.contents, other.contents),
            packages: max_level(self.packages, other.packages),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id_token.is_none() && self.contents.is_none() && self.packages.is_none()
    }
}

fn max_level(a: Option<PermissionLevel>, b: Option<PermissionLevel>) -> Option<PermissionLevel> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, None) => a,
        (None, b) => b,
    }
}
