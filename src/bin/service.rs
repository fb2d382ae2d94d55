//! Persona service daemon
//!
//! Serves load / chat / list requests over a Unix socket until interrupted.
//!
//! Usage: persona-service [--persona <name>] [--socket <path>] [--profiles-dir <dir>]

use anyhow::Result;
use clap::Parser;
use dotenvy::dotenv;
use log::{error, info};
use std::path::PathBuf;
use std::sync::Arc;

use tweet_persona::core::Config;
use tweet_persona::features::completion::OpenAiCompletionClient;
use tweet_persona::features::personas::{JsonFileStore, PersonaService};
use tweet_persona::ipc::IpcServer;

#[derive(Parser)]
#[command(version, about = "Serve a role-playing persona over a Unix socket")]
struct Cli {
    /// Persona to load at startup
    #[arg(short, long)]
    persona: Option<String>,

    /// Socket path (overrides PERSONA_SOCKET)
    #[arg(long)]
    socket: Option<PathBuf>,

    /// Persona storage directory (overrides PROFILES_DIR)
    #[arg(long)]
    profiles_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(socket) = cli.socket {
        config.socket_path = socket;
    }
    if let Some(dir) = cli.profiles_dir {
        config.profiles_dir = dir;
    }

    config.init_logging();
    config.export_openai_credentials()?;

    info!("Starting persona service...");

    let completion = Arc::new(OpenAiCompletionClient::new(config.openai_model.clone()));
    let store = Arc::new(JsonFileStore::new(config.profiles_dir.clone()));
    let service = Arc::new(PersonaService::new(completion, store));

    if let Some(name) = cli.persona {
        if let Err(e) = service.load_persona(&name).await {
            error!("Failed to load persona {name}: {e}");
        }
    }

    let server = Arc::new(IpcServer::new(service, config.socket_path.clone()));
    let accept_loop = server.clone().start().await?;
    info!(
        "Persona service ready (model: {}, profiles: {})",
        config.openai_model,
        config.profiles_dir.display()
    );

    tokio::signal::ctrl_c().await?;
    info!("Shutting down persona service");
    accept_loop.abort();
    server.cleanup();

    Ok(())
}
