//! Step code generation
//!
//! Renders engine-agnostic [`Step`]s into the fragment type of one backend.
//! A job body is the merge of its steps' fragments, in step order.

mod bash;
mod codecatalyst;
mod github;
mod gitlab;

pub use bash::BashCodegen;
pub use codecatalyst::CodeCatalystCodegen;
pub use github::GithubCodegen;
pub use gitlab::GitlabCodegen;

use crate::error::{CompileError, Result};
use pipegen_core::ir::Fragment;
use pipegen_core::{PipelineEngine, Step};

/// Region an assume-role step without one is rendered for
pub const DEFAULT_REGION: &str = "us-east-1";

/// Renders steps for one backend
pub trait StepCodegen {
    /// Fragment produced for each step
    type Fragment: Fragment;

    /// Backend this renderer targets
    const ENGINE: PipelineEngine;

    /// Render a single step
    fn render_step(step: &Step) -> Result<Self::Fragment>;

    /// Render a step sequence into one merged fragment
    fn render_steps(steps: &[Step]) -> Result<Self::Fragment> {
        let fragments = steps
            .iter()
            .map(Self::render_step)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::Fragment::merge_all(fragments))
    }
}

/// Error for a step without a rendering for `engine`
pub(crate) fn unsupported(step: &Step, engine: PipelineEngine) -> CompileError {
    CompileError::UnsupportedRenderTarget {
        step: step.describe(),
        engine,
    }
}
