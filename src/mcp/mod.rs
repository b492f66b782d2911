//! @acp:module "MCP Server"
//! @acp:summary "Model Context Protocol server for AI agent integration"
//! @acp:domain brew
//! @acp:layer transport
//!
//! Exposes the recipe panel (daily recipe, surprise pick, favorites,
//! preferences, related recipes) as MCP tools over stdio.

mod service;
mod tools;

pub use service::BrewMcpService;

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing::{error, info};

use crate::state::AppState;

/// Run the MCP server over stdio
pub async fn run_stdio_server(state: AppState) -> anyhow::Result<()> {
    info!("Starting MCP server over stdio");
    info!(
        "Serving {} recipes from {}, state at {}",
        state.catalog().len(),
        state.data_dir().display(),
        state.store().path().display()
    );

    let service = BrewMcpService::new(state);
    let transport = (stdin(), stdout());

    info!("MCP server ready, waiting for requests...");
    match service.serve(transport).await {
        Ok(server) => {
            server.waiting().await?;
            info!("MCP server shutdown");
        }
        Err(e) => {
            error!("MCP server error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
