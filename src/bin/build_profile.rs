//! Build a persona profile from a file of samples
//!
//! Usage: build-profile --name <name> --samples-file <path>

use anyhow::{Context, Result};
use clap::Parser;
use dotenvy::dotenv;
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;

use tweet_persona::core::Config;
use tweet_persona::features::completion::OpenAiCompletionClient;
use tweet_persona::features::personas::{load_samples_from_file, JsonFileStore, ProfileBuilder};

#[derive(Parser)]
#[command(version, about = "Build a persona profile from text samples")]
struct Cli {
    /// Name for the persona
    #[arg(short, long)]
    name: String,

    /// File containing samples, one per line
    #[arg(short, long, alias = "tweets-file")]
    samples_file: PathBuf,

    /// Persona storage directory (overrides PROFILES_DIR)
    #[arg(long)]
    profiles_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(dir) = cli.profiles_dir {
        config.profiles_dir = dir;
    }

    config.init_logging();
    config.export_openai_credentials()?;

    let samples = load_samples_from_file(&cli.samples_file)
        .await
        .with_context(|| format!("Failed to read samples from {}", cli.samples_file.display()))?;
    if samples.is_empty() {
        warn!("{} contains no samples", cli.samples_file.display());
    }
    info!("Loaded {} samples from {}", samples.len(), cli.samples_file.display());

    let builder = ProfileBuilder::new(
        Arc::new(OpenAiCompletionClient::new(config.openai_model.clone())),
        Arc::new(JsonFileStore::new(config.profiles_dir.clone())),
    );

    let (persona, path) = builder.build_and_save(&cli.name, &samples).await?;
    info!("Persona {} has {} topics", persona.name, persona.topics.len());
    println!("Persona saved to {}", path.display());

    Ok(())
}
