#![forbid(unsafe_code)]

//! @acp:module "Daily Brew Entry Point"
//! @acp:summary "MCP server and command line front end for the coffee recipe panel"
//! @acp:domain brew
//! @acp:layer application
//!
//! Without a subcommand the binary serves the Model Context Protocol over
//! stdio. The other subcommands run one panel interaction and print the
//! rendered result.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod mcp;
mod panel;
mod recipes;
mod state;
mod store;

use panel::Panel;
use recipes::{CaffeineFilter, Category, OutputFormat, PanelRenderer};
use state::AppState;
use store::PreferencesPatch;

/// Daily Brew - a coffee recipe of the day, over MCP or the command line
#[derive(Parser, Debug)]
#[command(name = "brew-mcp")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Data directory (config, state file)
    #[arg(long, short = 'C')]
    directory: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve MCP over stdio (default)
    Serve,
    /// Show today's recipe
    Today {
        /// Date key YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output format: markdown, compact, json
        #[arg(long)]
        format: Option<String>,
    },
    /// Show a random recipe other than the last one
    Surprise {
        #[arg(long)]
        format: Option<String>,
    },
    /// Show a recipe by id
    Show {
        id: String,
        #[arg(long)]
        format: Option<String>,
    },
    /// Add or remove a favorite
    Favorite { id: String },
    /// List favorites
    Favorites {
        #[arg(long)]
        format: Option<String>,
    },
    /// Show or update preferences
    Prefs {
        /// Preferred category (repeatable)
        #[arg(long = "category")]
        categories: Vec<Category>,
        /// Caffeine filter: all, caffeinated, decaf
        #[arg(long)]
        caffeine: Option<CaffeineFilter>,
        /// Allow every category again
        #[arg(long, conflicts_with = "categories")]
        clear_categories: bool,
        #[arg(long)]
        format: Option<String>,
    },
    /// List categories in the catalog
    Categories,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging (to stderr so stdout is free for MCP and panel output)
    init_logging(&cli.log_level);

    let data_dir = match cli.directory {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    info!("Daily Brew starting");
    info!("Data directory: {}", data_dir.display());

    let state = AppState::load(&data_dir).await?;
    run_command(state, cli.command.unwrap_or(Command::Serve)).await
}

async fn run_command(state: AppState, command: Command) -> anyhow::Result<()> {
    let default_format = state.config().format;
    let renderer = |format: Option<String>| {
        PanelRenderer::new(
            format
                .as_deref()
                .map(OutputFormat::parse_lenient)
                .unwrap_or(default_format),
        )
    };
    let panel = Panel::new(state);

    let output = match command {
        Command::Serve => return mcp::run_stdio_server(panel.state().clone()).await,
        Command::Today { date, format } => {
            let shown = panel.today(date.as_deref()).await?;
            renderer(format).render_card(&shown.card)?
        }
        Command::Surprise { format } => {
            let shown = panel.surprise(None).await?;
            renderer(format).render_card(&shown.card)?
        }
        Command::Show { id, format } => {
            let card = panel.show(&id).await?;
            renderer(format).render_card(&card)?
        }
        Command::Favorite { id } => {
            if panel.toggle_favorite(&id).await? {
                format!("Added {} to favorites", id)
            } else {
                format!("Removed {} from favorites", id)
            }
        }
        Command::Favorites { format } => renderer(format).render_favorites(&panel.favorites().await)?,
        Command::Prefs {
            categories,
            caffeine,
            clear_categories,
            format,
        } => {
            let preferred_categories = if clear_categories {
                Some(Vec::new())
            } else if categories.is_empty() {
                None
            } else {
                Some(categories)
            };

            let view = if preferred_categories.is_none() && caffeine.is_none() {
                panel.preferences().await
            } else {
                panel
                    .save_preferences(PreferencesPatch {
                        preferred_categories,
                        caffeine_filter: caffeine,
                    })
                    .await?
            };
            renderer(format).render_preferences(&view)?
        }
        Command::Categories => {
            let catalog = panel.state().catalog();
            catalog
                .categories()
                .into_iter()
                .map(|c| format!("{} ({}): {}", c.display_name(), c, catalog.by_category(c).len()))
                .collect::<Vec<_>>()
                .join("\n")
        }
    };

    println!("{}", output);
    Ok(())
}

fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
