//! gkeep - list Google Keep notes from the command line
//!
//! Loads the OAuth client configuration, reuses or obtains an access token,
//! then prints one page of notes.

use anyhow::{Context, Result};
use clap::Parser;
use common::Config;
use notes::ListNotesParams;
use oauth::{Authenticator, StdinCodeProvider};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn, Level};

#[derive(Parser, Debug)]
#[command(name = "gkeep", version, about = "List Google Keep notes")]
struct Cli {
    /// Environment file to load instead of ./.env
    #[arg(long, env = "GKEEP_ENV_FILE")]
    env_file: Option<PathBuf>,

    /// Maximum number of notes to return
    #[arg(long)]
    page_size: Option<u32>,

    /// Page token from a previous run
    #[arg(long)]
    page_token: Option<String>,

    /// Server-side filter expression
    #[arg(long)]
    filter: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the prompt and the notes
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli).await {
        error!("{:#}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.env_file {
        Some(path) => Config::load_with_env_file(path),
        None => Config::load(),
    }
    .context("Error loading config")?;
    debug!("Configuration: {:?}", config);

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling");
                cancel.cancel();
            }
        }
    });

    let authenticator = Authenticator::new(config.clone());
    let mut codes = StdinCodeProvider::stdin();
    let client = authenticator
        .obtain_client(&mut codes, &cancel)
        .await
        .context("Error creating API client")?;

    let params = ListNotesParams {
        page_size: cli.page_size,
        page_token: cli.page_token,
        filter: cli.filter,
    };
    let page = notes::fetch_notes_page(&client, &config.api_endpoint, &params, &cancel)
        .await
        .context("Error fetching notes")?;

    for note in &page.notes {
        println!(
            "Note ID: {}, Title: {}, Content: {}",
            note.id, note.title, note.content
        );
    }
    if let Some(token) = &page.next_page_token {
        println!("Next page token: {}", token);
    }

    Ok(())
}
