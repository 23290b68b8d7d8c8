//! Supported CI backends

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The backend a pipeline is rendered for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineEngine {
    /// Token-exchange backend (GitHub Actions)
    #[default]
    Github,
    /// Label/extends backend (GitLab CI)
    Gitlab,
    /// Generic shell, for local reproduction
    Bash,
    /// Deferred backend, accepted but not rendered yet
    CodeCatalyst,
}

impl PipelineEngine {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineEngine::Github => "github",
            PipelineEngine::Gitlab => "gitlab",
            PipelineEngine::Bash => "bash",
            PipelineEngine::CodeCatalyst => "codecatalyst",
        }
    }
}

impl fmt::Display for PipelineEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PipelineEngine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "github" => Ok(PipelineEngine::Github),
            "gitlab" => Ok(PipelineEngine::Gitlab),
            "bash" => Ok(PipelineEngine::Bash),
            "codecatalyst" => Ok(PipelineEngine::CodeCatalyst),
            other => Err(format!("unknown pipeline engine '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_from_str() {
        assert_eq!("GitHub".parse::<PipelineEngine>(), Ok(PipelineEngine::Github));
        assert_eq!("gitlab".parse::<PipelineEngine>(), Ok(PipelineEngine::Gitlab));
        assert!("jenkins".parse::<PipelineEngine>().is_err());
    }

    #[test]
    fn test_engine_display_round_trip() {
        for engine in [
            PipelineEngine::Github,
            PipelineEngine::Gitlab,
            PipelineEngine::Bash,
            PipelineEngine::CodeCatalyst,
        ] {
            assert_eq!(engine.to_string().parse::<PipelineEngine>(), Ok(engine));
        }
    }
}
