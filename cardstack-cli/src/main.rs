use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod client;
mod commands;
mod config;

use cardstack_core::PageId;
use commands::{ConfigCommand, SaveCommand, SelectCommand, ShowCommand, SwipeCommand};
use config::Config;

#[derive(Parser)]
#[command(name = "cardstack")]
#[command(version)]
#[command(about = "Keep front/back card images and a QR code in a swipeable stack", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Page id to show or edit
    #[arg(long, short, global = true)]
    page: Option<String>,

    /// Query string to take the page id from (e.g. "?page=7")
    #[arg(long, global = true, conflicts_with = "page")]
    query: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a page's card stack
    Show(ShowCommand),

    /// Drag the card stack horizontally
    Swipe(SwipeCommand),

    /// Bring a card to the front
    Select(SelectCommand),

    /// Upload new images and save the page
    Save(SaveCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

fn main() {
    init_tracing();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cardstack=warn,cardstack_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Save config path for init command
    let cli_config_path = cli.config.clone();

    // Load configuration
    let config = Config::load(cli.config)?;
    let page_id = select_page(cli.page, cli.query, &config);

    match cli.command {
        Some(Commands::Show(cmd)) => cmd.run(&config, page_id)?,
        Some(Commands::Swipe(cmd)) => cmd.run(&config, page_id)?,
        Some(Commands::Select(cmd)) => cmd.run(&config, page_id)?,
        Some(Commands::Save(cmd)) => cmd.run(&config, page_id)?,
        Some(Commands::Config(cmd)) => cmd.run(&config, cli_config_path)?,
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}

/// Picks the page: --page, then --query, then the configured default.
fn select_page(page: Option<String>, query: Option<String>, config: &Config) -> PageId {
    match (page, query) {
        (Some(page), _) => PageId::new(page),
        (None, Some(query)) => PageId::from_query(&query),
        (None, None) => PageId::new(config.default_page.value.clone()),
    }
}
