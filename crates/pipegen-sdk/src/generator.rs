//! Pipeline generator
//!
//! Compiles the loaded configuration and renders the job graph into the
//! files the CI backend reads.

use crate::error::Result;
use pipegen_compiler::PipelineCompiler;
use pipegen_core::ir::{CompiledPipeline, RegistryAuth};
use pipegen_core::PipelineConfig;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// First line of every generated YAML file
pub const GENERATED_HEADER: &str = "# ~~ Generated by pipegen. Do not edit manually.";

/// A rendered output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Path relative to the output directory
    pub path: PathBuf,

    pub content: String,

    /// Whether the file should be executable
    pub executable: bool,
}

impl GeneratedFile {
    fn new(path: impl Into<PathBuf>, content: String) -> Self {
        Self {
            path: path.into(),
            content,
            executable: false,
        }
    }
}

/// Compiles a pipeline configuration and renders its files
#[derive(Debug)]
pub struct PipelineGenerator {
    config: PipelineConfig,
    compiler: PipelineCompiler,
    output_dir: PathBuf,
}

impl PipelineGenerator {
    pub(crate) fn new(config: PipelineConfig, compiler: PipelineCompiler, output_dir: PathBuf) -> Self {
        Self {
            config,
            compiler,
            output_dir,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn compiler(&self) -> &PipelineCompiler {
        &self.compiler
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Compile the configuration into a job graph
    pub fn compile(&self) -> Result<CompiledPipeline> {
        let compiled = self.compiler.compile(&self.config)?;
        tracing::debug!(
            "Compiled {} job(s) for engine {}",
            compiled.job_count(),
            compiled.engine()
        );
        Ok(compiled)
    }

    /// Compiled job graph as pretty JSON
    pub fn render_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.compile()?)?)
    }

    /// Render every output file without touching the file system
    pub fn render_files(&self) -> Result<Vec<GeneratedFile>> {
        let files = match self.compile()? {
            CompiledPipeline::Github {
                workflows,
                registry_auth,
            } => {
                let mut files = workflows
                    .iter()
                    .map(|workflow| {
                        to_yaml(workflow)
                            .map(|content| GeneratedFile::new(workflow.file_path(), content))
                    })
                    .collect::<Result<Vec<_>>>()?;
                if let Some(auth) = registry_auth {
                    files.push(GeneratedFile::new(".npmrc", render_npmrc(&auth)));
                }
                files
            }
            CompiledPipeline::Gitlab { config } => {
                vec![GeneratedFile::new(config.file_path(), to_yaml(&config)?)]
            }
            CompiledPipeline::Bash { script } => vec![GeneratedFile {
                path: PathBuf::from(script.file_path()),
                content: script.to_script(),
                executable: true,
            }],
            CompiledPipeline::CodeCatalyst { workflow } => {
                tracing::warn!("{}", workflow.notice);
                vec![GeneratedFile::new(workflow.file_path(), to_yaml(&workflow)?)]
            }
        };
        Ok(files)
    }

    /// Render and write every output file below the output directory
    ///
    /// Nothing is written unless the whole pipeline compiles.
    pub fn write_files(&self) -> Result<Vec<PathBuf>> {
        let files = self.render_files()?;
        let mut written = Vec::with_capacity(files.len());

        for file in files {
            let path = self.output_dir.join(&file.path);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, &file.content)?;
            if file.executable {
                make_executable(&path)?;
            }
            tracing::info!("Wrote {}", path.display());
            written.push(path);
        }
        Ok(written)
    }
}

fn to_yaml<T: Serialize>(value: &T) -> Result<String> {
    let body = serde_yaml::to_string(value)?;
    Ok(format!("{}\n{}", GENERATED_HEADER, body))
}

fn render_npmrc(auth: &RegistryAuth) -> String {
    let mut lines = vec![format!("{}:registry={}", auth.scope, auth.registry)];
    lines.extend(
        auth.settings
            .iter()
            .map(|(key, value)| format!("{}={}", key, value)),
    );
    lines.join("\n") + "\n"
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = std::fs::metadata(path)?.permissions();
    permissions.set_mode(0o755);
    std::fs::set_permissions(path, permissions)?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_npmrc() {
        let auth = RegistryAuth {
            registry: "https://npm.pkg.github.com".to_string(),
            scope: "@assembly".to_string(),
            settings: vec![(
                "//npm.pkg.github.com/:always-auth".to_string(),
                "true".to_string(),
            )],
        };
        assert_eq!(
            render_npmrc(&auth),
            "@assembly:registry=https://npm.pkg.github.com\n//npm.pkg.github.com/:always-auth=true\n"
        );
    }

    #[test]
    fn test_yaml_header() {
        let yaml = to_yaml(&vec!["a"]).unwrap();
        assert!(yaml.starts_with(GENERATED_HEADER));
        assert!(yaml.ends_with("- a\n"));
    }
}
