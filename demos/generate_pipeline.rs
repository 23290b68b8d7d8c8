//! Pipeline generation example
//!
//! This example demonstrates:
//! - Loading a pipeline from a YAML file
//! - Rendering the CI files for the configured engine
//! - Writing them below an output directory

use pipegen_sdk::PipelineGeneratorBuilder;
use std::env;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("pipegen_sdk=info".parse()?))
        .init();

    println!("=== Generate Pipeline Example ===\n");

    let config_path = env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/pipelines/shop.yaml".to_string());
    let output_dir = env::args().nth(2).unwrap_or_else(|| "target/pipegen".to_string());

    let generator = PipelineGeneratorBuilder::new()
        .with_config_file(&config_path)
        .with_output_dir(&output_dir)
        .validate_artifacts(true)
        .build()?;

    println!("Loaded {} ({} engine)", config_path, generator.config().engine);
    println!("  Stages: {:?}\n", generator.config().stage_names().collect::<Vec<_>>());

    let written = generator.write_files()?;

    println!("Generated files:");
    for path in &written {
        println!("  {}", path.display());
    }

    println!("\n=== Example completed successfully ===");
    Ok(())
}
