//! @acp:module "MCP Service"
//! @acp:summary "Core MCP service implementation using rmcp SDK"
//! @acp:domain brew
//! @acp:layer service
//!
//! Implements the ServerHandler trait over the recipe panel. Every tool
//! answers with one JSON text block; rendered panels go in its `content`
//! field.

use rmcp::{model::*, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::tools::*;
use crate::panel::{Panel, PanelError, Shown};
use crate::recipes::rendering::{format_brew_time, RenderError};
use crate::recipes::types::Recipe;
use crate::recipes::{CaffeineFilter, Category, OutputFormat, PanelRenderer, UserPreferences};
use crate::state::AppState;
use crate::store::PreferencesPatch;

/// Daily Brew MCP service - exposes the recipe panel to AI agents
#[derive(Clone)]
pub struct BrewMcpService {
    panel: Panel,
}

impl BrewMcpService {
    pub fn new(state: AppState) -> Self {
        Self {
            panel: Panel::new(state),
        }
    }

    /// Renderer for a requested format, or the configured default
    fn renderer(&self, format: Option<&str>) -> PanelRenderer<'static> {
        let format = format
            .map(OutputFormat::parse_lenient)
            .unwrap_or(self.panel.state().config().format);
        PanelRenderer::new(format)
    }

    async fn handle_daily_recipe(
        &self,
        params: DailyRecipeParams,
    ) -> Result<CallToolResult, McpError> {
        let shown = self
            .panel
            .today(params.date.as_deref())
            .await
            .map_err(panel_error)?;
        self.recipe_response(shown, params.format.as_deref())
    }

    async fn handle_surprise_me(&self, params: SurpriseParams) -> Result<CallToolResult, McpError> {
        let shown = self
            .panel
            .surprise(params.current_recipe_id.as_deref())
            .await
            .map_err(panel_error)?;
        self.recipe_response(shown, params.format.as_deref())
    }

    async fn handle_get_recipe(&self, params: GetRecipeParams) -> Result<CallToolResult, McpError> {
        let card = self.panel.show(&params.id).await.map_err(panel_error)?;
        let content = self
            .renderer(params.format.as_deref())
            .render_card(&card)
            .map_err(render_error)?;

        json_result(&RecipeResponse {
            recipe_id: card.recipe.id.clone(),
            date: None,
            cached: false,
            full_catalog_fallback: false,
            repeated: false,
            is_favorite: card.is_favorite,
            content,
        })
    }

    fn handle_similar_recipes(
        &self,
        params: SimilarRecipesParams,
    ) -> Result<CallToolResult, McpError> {
        let count = params
            .count
            .unwrap_or(self.panel.state().config().similar_count);
        let similar = self
            .panel
            .similar(&params.id, count)
            .map_err(panel_error)?;

        let summaries: Vec<RecipeSummary> = similar.iter().map(summarize).collect();
        json_result(&summaries)
    }

    fn handle_list_categories(&self) -> Result<CallToolResult, McpError> {
        let catalog = self.panel.state().catalog();
        let categories: Vec<CategorySummary> = catalog
            .categories()
            .into_iter()
            .map(|c| CategorySummary {
                id: c.as_str().to_string(),
                name: c.display_name().to_string(),
                recipe_count: catalog.by_category(c).len(),
            })
            .collect();

        json_result(&categories)
    }

    fn handle_list_recipes(&self, params: ListRecipesParams) -> Result<CallToolResult, McpError> {
        let preferences = UserPreferences {
            preferred_categories: match params.category {
                Some(ref c) => vec![parse_category(c)?],
                None => Vec::new(),
            },
            caffeine_filter: match params.caffeine {
                Some(ref c) => parse_caffeine(c)?,
                None => CaffeineFilter::All,
            },
        };

        let summaries: Vec<RecipeSummary> = self
            .panel
            .state()
            .catalog()
            .filtered(&preferences)
            .into_iter()
            .map(summarize)
            .collect();

        json_result(&summaries)
    }

    async fn handle_toggle_favorite(
        &self,
        params: ToggleFavoriteParams,
    ) -> Result<CallToolResult, McpError> {
        let is_favorite = self
            .panel
            .toggle_favorite(&params.id)
            .await
            .map_err(panel_error)?;

        json_result(&FavoriteToggled {
            id: params.id,
            is_favorite,
        })
    }

    async fn handle_favorites(&self, params: FormatParams) -> Result<CallToolResult, McpError> {
        let view = self.panel.favorites().await;
        let content = self
            .renderer(params.format.as_deref())
            .render_favorites(&view)
            .map_err(render_error)?;

        #[derive(Serialize)]
        struct Favorites {
            ids: Vec<String>,
        }

        json_result(&PanelResponse {
            data: Favorites {
                ids: view.recipes.iter().map(|r| r.id.clone()).collect(),
            },
            content,
        })
    }

    async fn handle_get_preferences(
        &self,
        params: FormatParams,
    ) -> Result<CallToolResult, McpError> {
        let view = self.panel.preferences().await;
        let content = self
            .renderer(params.format.as_deref())
            .render_preferences(&view)
            .map_err(render_error)?;

        json_result(&PanelResponse {
            data: view,
            content,
        })
    }

    async fn handle_update_preferences(
        &self,
        params: UpdatePreferencesParams,
    ) -> Result<CallToolResult, McpError> {
        let preferred_categories = match params.preferred_categories {
            Some(ref names) => Some(
                names
                    .iter()
                    .map(|n| parse_category(n))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            None => None,
        };
        let caffeine_filter = params
            .caffeine_filter
            .as_deref()
            .map(parse_caffeine)
            .transpose()?;

        let view = self
            .panel
            .save_preferences(PreferencesPatch {
                preferred_categories,
                caffeine_filter,
            })
            .await
            .map_err(panel_error)?;
        let content = self
            .renderer(params.format.as_deref())
            .render_preferences(&view)
            .map_err(render_error)?;

        json_result(&PanelResponse {
            data: view,
            content,
        })
    }

    fn recipe_response(&self, shown: Shown, format: Option<&str>) -> Result<CallToolResult, McpError> {
        let content = self
            .renderer(format)
            .render_card(&shown.card)
            .map_err(render_error)?;

        json_result(&RecipeResponse {
            recipe_id: shown.card.recipe.id.clone(),
            date: shown.date,
            cached: shown.cached,
            full_catalog_fallback: shown.full_catalog_fallback,
            repeated: shown.repeated,
            is_favorite: shown.card.is_favorite,
            content,
        })
    }

    /// Parse tool arguments from request
    fn parse_args<T: for<'de> Deserialize<'de>>(
        args: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> Result<T, McpError> {
        let value = serde_json::Value::Object(args.unwrap_or_default());
        serde_json::from_value(value).map_err(|e| McpError::invalid_params(e.to_string(), None))
    }
}

fn summarize(recipe: &Recipe) -> RecipeSummary {
    RecipeSummary {
        id: recipe.id.clone(),
        name: recipe.name.clone(),
        category: recipe.category.as_str().to_string(),
        caffeinated: recipe.caffeinated,
        brew_time: format_brew_time(recipe.brew_time_minutes),
    }
}

fn parse_category(name: &str) -> Result<Category, McpError> {
    name.parse::<Category>()
        .map_err(|e| McpError::invalid_params(e.to_string(), None))
}

fn parse_caffeine(name: &str) -> Result<CaffeineFilter, McpError> {
    name.parse::<CaffeineFilter>()
        .map_err(|e| McpError::invalid_params(e.to_string(), None))
}

fn panel_error(e: PanelError) -> McpError {
    match e {
        PanelError::NotFound(_) => McpError::invalid_params(e.to_string(), None),
        PanelError::Store(_) => McpError::internal_error(e.to_string(), None),
    }
}

fn render_error(e: RenderError) -> McpError {
    McpError::internal_error(e.to_string(), None)
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("JSON error: {}", e), None))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[allow(clippy::manual_async_fn)]
impl ServerHandler for BrewMcpService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Daily Brew: a coffee recipe of the day. Use brew_daily_recipe to get \
                 today's recipe and brew_surprise_me for another one. Favorites and \
                 category/caffeine preferences persist between sessions and shape \
                 future picks."
                    .to_string(),
            ),
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        async move {
            Ok(ListToolsResult {
                tools: build_tools(),
                next_cursor: None,
            })
        }
    }

    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            debug!(tool = %request.name, "Tool call");
            let tool_name: &str = &request.name;
            match tool_name {
                "brew_daily_recipe" => {
                    let params: DailyRecipeParams = Self::parse_args(request.arguments)?;
                    self.handle_daily_recipe(params).await
                }
                "brew_surprise_me" => {
                    let params: SurpriseParams = Self::parse_args(request.arguments)?;
                    self.handle_surprise_me(params).await
                }
                "brew_get_recipe" => {
                    let params: GetRecipeParams = Self::parse_args(request.arguments)?;
                    self.handle_get_recipe(params).await
                }
                "brew_similar_recipes" => {
                    let params: SimilarRecipesParams = Self::parse_args(request.arguments)?;
                    self.handle_similar_recipes(params)
                }
                "brew_list_categories" => self.handle_list_categories(),
                "brew_list_recipes" => {
                    let params: ListRecipesParams = Self::parse_args(request.arguments)?;
                    self.handle_list_recipes(params)
                }
                "brew_toggle_favorite" => {
                    let params: ToggleFavoriteParams = Self::parse_args(request.arguments)?;
                    self.handle_toggle_favorite(params).await
                }
                "brew_favorites" => {
                    let params: FormatParams = Self::parse_args(request.arguments)?;
                    self.handle_favorites(params).await
                }
                "brew_get_preferences" => {
                    let params: FormatParams = Self::parse_args(request.arguments)?;
                    self.handle_get_preferences(params).await
                }
                "brew_update_preferences" => {
                    let params: UpdatePreferencesParams = Self::parse_args(request.arguments)?;
                    self.handle_update_preferences(params).await
                }
                _ => Err(McpError::invalid_params(
                    format!("Unknown tool: {}", request.name),
                    None,
                )),
            }
        }
    }
}
