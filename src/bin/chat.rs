//! Command-line client for the persona service
//!
//! Usage:
//!   persona-chat list
//!   persona-chat load <name>
//!   persona-chat say <message>
//!   persona-chat repl [--persona <name>]

use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::time::Duration;

use tweet_persona::core::Config;
use tweet_persona::ipc::{connect_with_retry, IpcClient};

#[derive(Parser)]
#[command(version, about = "Talk to a running persona service")]
struct Cli {
    /// Socket path (overrides PERSONA_SOCKET)
    #[arg(long)]
    socket: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List stored personas
    List,
    /// Load a persona, replacing the current conversation
    Load { name: String },
    /// Send one message to the loaded persona
    Say { message: String },
    /// Interactive chat session
    Repl {
        /// Persona to load before chatting
        #[arg(short, long)]
        persona: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env();
    config.init_logging();

    let socket = cli.socket.unwrap_or(config.socket_path);
    let mut client = connect_with_retry(&socket, 3, Duration::from_millis(500)).await?;

    match cli.command {
        Commands::List => print_personas(&mut client).await?,
        Commands::Load { name } => println!("{}", client.load_persona(&name).await?),
        Commands::Say { message } => println!("{}", client.chat(&message).await?),
        Commands::Repl { persona } => {
            if let Some(name) = persona {
                println!("{}", client.load_persona(&name).await?);
            }
            repl(&mut client).await?;
        }
    }

    Ok(())
}

async fn print_personas(client: &mut IpcClient) -> Result<()> {
    let personas = client.list_personas().await?;
    if personas.is_empty() {
        println!("No personas found");
    }
    for name in personas {
        println!("{name}");
    }
    Ok(())
}

const REPL_HELP: &str = "Commands: /load <name>, /list, /status, /quit. Anything else is sent to the persona.";

async fn repl(client: &mut IpcClient) -> Result<()> {
    println!("{REPL_HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        // Service errors are shown and the session continues
        let outcome = match line.split_once(' ').unwrap_or((line, "")) {
            ("/quit", _) | ("/exit", _) => break,
            ("/help", _) => {
                println!("{REPL_HELP}");
                Ok(())
            }
            ("/list", _) => print_personas(client).await,
            ("/status", _) => client.status().await.map(|(persona, turns)| match persona {
                Some(name) => println!("{name} ({turns} turns)"),
                None => println!("No persona loaded"),
            }),
            ("/load", name) if !name.trim().is_empty() => client
                .load_persona(name.trim())
                .await
                .map(|msg| println!("{msg}")),
            ("/load", _) => {
                println!("Usage: /load <name>");
                Ok(())
            }
            _ => client.chat(line).await.map(|reply| println!("{reply}")),
        };

        if let Err(e) = outcome {
            eprintln!("Error: {e}");
        }
    }

    Ok(())
}
