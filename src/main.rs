mod api;
mod config;
mod error;
mod replay;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::api::StudioClient;
use crate::config::StudioConfig;
use crate::error::CliError;

#[derive(Parser, Debug)]
#[command(name = "smilestudio", about = "Smile Studio catalog and saved-composition CLI")]
struct Cli {
    #[arg(long, env = "STUDIO_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "STUDIO_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Items(ItemsCommand),
    Saved(SavedCommand),
}

#[derive(Args, Debug)]
struct ItemsCommand {
    #[command(subcommand)]
    command: ItemsSubcommand,
}

#[derive(Subcommand, Debug)]
enum ItemsSubcommand {
    List {
        #[arg(long, help = "Only items in this category")]
        category: Option<String>,
    },
}

#[derive(Args, Debug)]
struct SavedCommand {
    #[command(subcommand)]
    command: SavedSubcommand,
}

#[derive(Subcommand, Debug)]
enum SavedSubcommand {
    List,
    /// Replay a saved composition through the editor and report the result.
    Inspect {
        id: String,
    },
    /// Upload a rendered PNG with the composition that produced it.
    Upload {
        #[arg(long)]
        name: String,
        #[arg(long, help = "Rendered PNG file")]
        image: PathBuf,
        #[arg(long, help = "JSON file with the placedItems array")]
        placed_items: Option<PathBuf>,
    },
    Delete {
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = StudioConfig::from_env()?.with_overrides(cli.api_url.as_deref(), cli.token.as_deref())?;
    let client = StudioClient::new(&config)?;

    match cli.command {
        Command::Items(items) => run_items(&client, items).await,
        Command::Saved(saved) => run_saved(&client, &config, saved).await,
    }
}

async fn run_items(client: &StudioClient, items: ItemsCommand) -> Result<(), CliError> {
    match items.command {
        ItemsSubcommand::List { category } => {
            let catalog = client.catalog().await?;
            let listed: Vec<_> = match category.as_deref() {
                Some(category) => catalog.in_category(category).collect(),
                None => catalog.items().iter().collect(),
            };
            print_json(&listed)
        }
    }
}

async fn run_saved(client: &StudioClient, config: &StudioConfig, saved: SavedCommand) -> Result<(), CliError> {
    match saved.command {
        SavedSubcommand::List => print_json(&client.saved_images().await?),
        SavedSubcommand::Inspect { id } => {
            config.require_token()?;
            let saved = client.saved_image(&id).await?;
            let catalog = client.catalog().await?;
            let report = replay::inspect(&saved, catalog, client.resolver(), config);
            if !report.replay.dropped.is_empty() {
                tracing::warn!(dropped = report.replay.dropped.len(), "some overlays cannot be resumed");
            }
            print_json(&report)
        }
        SavedSubcommand::Upload { name, image, placed_items } => {
            config.require_token()?;
            let png = tokio::fs::read(&image).await?;
            let items = match placed_items {
                Some(path) => {
                    let raw = tokio::fs::read_to_string(&path).await?;
                    let stored = canvas::doc::parse_placed_items(&raw)?;
                    let replayed = replay::replay(&stored, client.catalog().await?, client.resolver(), config);
                    for dropped in &replayed.dropped {
                        tracing::warn!(id = %dropped.id, item_id = %dropped.item_id, reason = ?dropped.reason, "overlay not uploaded");
                    }
                    replayed.placed_items
                }
                None => Vec::new(),
            };
            let saved = client.save_canvas_image(&name, png, &items).await?;
            print_json(&saved)
        }
        SavedSubcommand::Delete { id } => {
            client.delete_saved_image(&id).await?;
            eprintln!("deleted saved image {id}");
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
