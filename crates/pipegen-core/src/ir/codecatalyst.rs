//! CodeCatalyst workflow model
//!
//! The backend is deferred: actions carry only the command bodies of the
//! sequential chain, credentials and artifacts are left to the platform.

use crate::ir::fragment::CodeCatalystStepConfig;
use crate::ir::job_map::JobMap;
use serde::Serialize;

/// A CodeCatalyst workflow with one action per job
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeCatalystWorkflow {
    pub name: String,

    /// Explains which parts of the pipeline were not rendered
    pub notice: String,

    pub actions: JobMap<CodeCatalystStepConfig>,
}

impl CodeCatalystWorkflow {
    pub fn new(name: impl Into<String>, notice: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            notice: notice.into(),
            actions: JobMap::new(),
        }
    }

    pub fn file_path(&self) -> String {
        format!(".codecatalyst/workflows/{}.yaml", self.name)
    }
}
