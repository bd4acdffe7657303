//! Tool registry and handlers for the MCP tools.
//!
//! Every handler converts failures into caller-safe text: the transport
//! layer never sees an unhandled fault from a search or lookup, only a
//! missing required argument.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::assets::{AssetError, AssetIndex};
use crate::models::SearchQuery;
use crate::search::SearchEngine;
use crate::utils::{format, validate_date};

/// An MCP tool that can be called by the client.
#[derive(Clone)]
pub struct Tool {
    /// Tool name (e.g. "search_preprints")
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// JSON Schema for input parameters
    pub input_schema: Value,

    /// Handler function to execute the tool
    pub handler: Arc<dyn ToolHandler>,
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

/// Handler for executing a tool.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync + std::fmt::Debug {
    /// Execute the tool with the given arguments.
    async fn execute(&self, args: Value) -> Result<Value, String>;
}

/// Registry for all MCP tools.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Tool>,
}

impl ToolRegistry {
    /// Create a registry wired to the search engine and asset index.
    pub fn new(engine: Arc<SearchEngine>, assets: Arc<AssetIndex>) -> Self {
        let mut registry = Self {
            tools: HashMap::new(),
        };

        registry.register(Tool {
            name: "search_preprints".to_string(),
            description: "Search bioRxiv/medRxiv preprints by keyword, ranked by relevance"
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query: keywords, a subject category, or a DOI"
                    },
                    "from_date": {
                        "type": "string",
                        "description": "Start date, YYYY-MM-DD (default: 5 years ago)"
                    },
                    "to_date": {
                        "type": "string",
                        "description": "End date, YYYY-MM-DD (default: today)"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum results, 1-100",
                        "default": 10
                    },
                    "cursor": {
                        "type": "string",
                        "description": "Pagination cursor from a previous result"
                    }
                },
                "required": ["query"]
            }),
            handler: Arc::new(SearchPreprintsHandler {
                engine: engine.clone(),
            }),
        });

        registry.register(Tool {
            name: "get_preprint_details".to_string(),
            description: "Get full metadata for one preprint by DOI".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "identifier": {
                        "type": "string",
                        "description": "DOI of the preprint (e.g. '10.1101/2020.01.30.927871')"
                    }
                },
                "required": ["identifier"]
            }),
            handler: Arc::new(GetPreprintHandler { engine }),
        });

        registry.register(Tool {
            name: "list_categories".to_string(),
            description: "List the fixed bioRxiv subject categories; no upstream call"
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
            handler: Arc::new(ListCategoriesHandler),
        });

        registry.register(Tool {
            name: "list_assets".to_string(),
            description: "List the ids of all indexed local assets".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
            handler: Arc::new(ListAssetsHandler {
                assets: assets.clone(),
            }),
        });

        registry.register(Tool {
            name: "get_asset".to_string(),
            description: "Fetch one local asset's content by id".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "id": {
                        "type": "string",
                        "description": "Asset id (the file name without extension)"
                    }
                },
                "required": ["id"]
            }),
            handler: Arc::new(GetAssetHandler {
                assets: assets.clone(),
            }),
        });

        registry.register(Tool {
            name: "find_assets".to_string(),
            description: "Find local assets whose content contains a keyword".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "keyword": {
                        "type": "string",
                        "description": "Case-insensitive keyword to look for"
                    }
                },
                "required": ["keyword"]
            }),
            handler: Arc::new(FindAssetsHandler { assets }),
        });

        registry
    }

    /// Register a tool.
    pub fn register(&mut self, tool: Tool) {
        self.tools.insert(tool.name.clone(), tool);
    }

    /// Get all tools.
    pub fn all(&self) -> Vec<&Tool> {
        self.tools.values().collect()
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    /// Execute a tool by name.
    pub async fn execute(&self, name: &str, args: Value) -> Result<Value, String> {
        let tool = self
            .get(name)
            .ok_or_else(|| format!("Tool '{}' not found", name))?;

        tool.handler.execute(args).await
    }
}

fn text(content: String) -> Value {
    Value::String(content)
}

/// Handler for relevance-ranked preprint search.
#[derive(Debug)]
pub struct SearchPreprintsHandler {
    pub engine: Arc<SearchEngine>,
}

#[async_trait::async_trait]
impl ToolHandler for SearchPreprintsHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let query_text = args
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or("Missing 'query' parameter")?;

        let mut query = SearchQuery::new(query_text);

        // Date validation happens before any upstream call.
        if let Some(raw) = args.get("from_date").and_then(|v| v.as_str()) {
            match validate_date(raw) {
                Ok(date) => query.from_date = Some(date),
                Err(error) => return Ok(text(format!("Error: {}", error))),
            }
        }
        if let Some(raw) = args.get("to_date").and_then(|v| v.as_str()) {
            match validate_date(raw) {
                Ok(date) => query.to_date = Some(date),
                Err(error) => return Ok(text(format!("Error: {}", error))),
            }
        }
        if let Some(limit) = args.get("limit").and_then(|v| v.as_u64()) {
            query = query.limit(limit as usize);
        }
        if let Some(cursor) = args.get("cursor").and_then(|v| v.as_str()) {
            query = query.cursor(cursor);
        }

        match self.engine.search(&query).await {
            Ok(result) => Ok(text(format::search_results(&result, query_text))),
            Err(error) => {
                tracing::warn!("search failed for '{}': {}", query_text, error);
                Ok(text(format!("Error: {}", error)))
            }
        }
    }
}

/// Handler for exact-DOI metadata lookup.
#[derive(Debug)]
pub struct GetPreprintHandler {
    pub engine: Arc<SearchEngine>,
}

#[async_trait::async_trait]
impl ToolHandler for GetPreprintHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let identifier = args
            .get("identifier")
            .and_then(|v| v.as_str())
            .ok_or("Missing 'identifier' parameter")?;

        match self.engine.details(identifier).await {
            Ok(Some(record)) => Ok(text(format::preprint_details(&record))),
            Ok(None) => Ok(text(format::not_found(identifier))),
            Err(error) => {
                tracing::warn!("lookup failed for '{}': {}", identifier, error);
                Ok(text(format!("Error: {}", error)))
            }
        }
    }
}

/// Handler for the fixed category catalog.
#[derive(Debug)]
pub struct ListCategoriesHandler;

#[async_trait::async_trait]
impl ToolHandler for ListCategoriesHandler {
    async fn execute(&self, _args: Value) -> Result<Value, String> {
        Ok(text(format::category_list()))
    }
}

/// Handler listing indexed asset ids.
#[derive(Debug)]
pub struct ListAssetsHandler {
    pub assets: Arc<AssetIndex>,
}

#[async_trait::async_trait]
impl ToolHandler for ListAssetsHandler {
    async fn execute(&self, _args: Value) -> Result<Value, String> {
        let ids = self.assets.ids();
        if ids.is_empty() {
            return Ok(text("No assets indexed.".to_string()));
        }
        let mut out = format!("{} asset(s):\n", ids.len());
        for id in ids {
            out.push_str(&format!("- {}\n", id));
        }
        Ok(text(out))
    }
}

/// Handler fetching one asset by id.
#[derive(Debug)]
pub struct GetAssetHandler {
    pub assets: Arc<AssetIndex>,
}

#[async_trait::async_trait]
impl ToolHandler for GetAssetHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let id = args
            .get("id")
            .and_then(|v| v.as_str())
            .ok_or("Missing 'id' parameter")?;

        match self.assets.get(id) {
            Ok(content) => Ok(text(content)),
            Err(AssetError::NotFound(_)) => {
                Ok(text(format!("No asset with id \"{}\".", id)))
            }
            Err(error) => Ok(text(format!("Error: {}", error))),
        }
    }
}

/// Handler filtering assets by content keyword.
#[derive(Debug)]
pub struct FindAssetsHandler {
    pub assets: Arc<AssetIndex>,
}

#[async_trait::async_trait]
impl ToolHandler for FindAssetsHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let keyword = args
            .get("keyword")
            .and_then(|v| v.as_str())
            .ok_or("Missing 'keyword' parameter")?;

        let matches = self.assets.find(keyword);
        if matches.is_empty() {
            return Ok(text(format!("No assets mention \"{}\".", keyword)));
        }
        let mut out = format!("{} asset(s) mention \"{}\":\n", matches.len(), keyword);
        for id in matches {
            out.push_str(&format!("- {}\n", id));
        }
        Ok(text(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rxiv::RxivClient;

    fn registry() -> ToolRegistry {
        let client = RxivClient::with_base_urls("http://127.0.0.1:1", "http://127.0.0.1:1")
            .expect("client");
        ToolRegistry::new(
            Arc::new(SearchEngine::new(client)),
            Arc::new(AssetIndex::default()),
        )
    }

    #[test]
    fn test_all_tools_registered() {
        let registry = registry();
        for name in [
            "search_preprints",
            "get_preprint_details",
            "list_categories",
            "list_assets",
            "get_asset",
            "find_assets",
        ] {
            assert!(registry.get(name).is_some(), "missing tool {}", name);
        }
        assert_eq!(registry.all().len(), 6);
    }

    #[tokio::test]
    async fn test_missing_required_argument() {
        let registry = registry();
        let result = registry
            .execute("search_preprints", serde_json::json!({}))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_invalid_date_is_caller_safe_text() {
        let registry = registry();
        let result = registry
            .execute(
                "search_preprints",
                serde_json::json!({"query": "CRISPR", "from_date": "2023-13-40"}),
            )
            .await
            .unwrap();
        let message = result.as_str().unwrap();
        assert!(message.starts_with("Error:"));
        assert!(message.contains("2023-13-40"));
    }

    #[tokio::test]
    async fn test_list_categories_needs_no_upstream() {
        let registry = registry();
        let result = registry
            .execute("list_categories", serde_json::json!({}))
            .await
            .unwrap();
        assert!(result.as_str().unwrap().contains("Genomics"));
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let registry = registry();
        assert!(registry
            .execute("nope", serde_json::json!({}))
            .await
            .is_err());
    }
}
