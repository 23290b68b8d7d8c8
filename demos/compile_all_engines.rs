//! Multi-engine compilation example
//!
//! Compiles the same pipeline for every backend and prints the generated
//! files, so the outputs can be compared side by side.

use pipegen_sdk::{PipelineEngine, PipelineGeneratorBuilder};
use tracing_subscriber::EnvFilter;

const ENGINES: [PipelineEngine; 4] = [
    PipelineEngine::Github,
    PipelineEngine::Gitlab,
    PipelineEngine::Bash,
    PipelineEngine::CodeCatalyst,
];

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let content = std::fs::read_to_string("demos/pipelines/shop.yaml")?;

    for engine in ENGINES {
        println!("=== {} ===\n", engine);

        let generator = PipelineGeneratorBuilder::new()
            .with_config_content(content.as_str())
            .with_engine(engine)
            .build()?;

        let compiled = generator.compile()?;
        println!("Jobs: {}\n", compiled.job_count());

        for file in generator.render_files()? {
            println!("--- {} ---", file.path.display());
            println!("{}", file.content);
        }
    }

    Ok(())
}
