//! The product tools, served over MCP.
//!
//! Every call ends in a successful JSON-RPC response carrying a
//! [`CallToolResult`]: catalog, validation and configuration failures become
//! an `isError` payload instead of a protocol error. Arguments that do not fit
//! the advertised schema at all are rejected by rmcp before a tool runs.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo, Tool};
use rmcp::schemars::{self, JsonSchema};
use rmcp::ErrorData as McpError;
use rmcp::{tool, tool_handler, tool_router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::catalog::{update_product_description, CatalogApi};
use crate::types::{Error, ToolLimits};
use crate::validation::{clamp_limit, count, product_id};

pub const GET_PRODUCT: &str = "getProduct";
pub const GET_PRODUCTS: &str = "getProducts";
pub const UPDATE_PRODUCT_DESCRIPTION: &str = "updateProductDescription";

/// Name reported in `serverInfo` unless overridden.
pub const DEFAULT_SERVER_NAME: &str = "hostinger-ecommerce";

const INSTRUCTIONS: &str = "Read and update products of a Hostinger Ecommerce store. \
Use getProducts to browse, getProduct for a single item and updateProductDescription \
to replace a product description.";

/// `getProduct` arguments.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetProductInput {
    #[schemars(description = "The ID of the product to retrieve")]
    pub product_id: String,
}

/// `getProducts` arguments. Numbers rather than integers so `10.0` is accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct GetProductsInput {
    #[serde(default = "default_limit")]
    #[schemars(description = "Maximum number of products to return (max 25)")]
    pub limit: Option<f64>,

    #[serde(default = "default_offset")]
    #[schemars(description = "Offset for pagination")]
    pub offset: Option<f64>,
}

fn default_limit() -> Option<f64> {
    Some(25.0)
}

fn default_offset() -> Option<f64> {
    Some(0.0)
}

/// `updateProductDescription` arguments.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDescriptionInput {
    #[schemars(description = "The ID of the product to update")]
    pub product_id: String,

    #[schemars(description = "The new product description")]
    pub description: String,
}

/// Product tools bound to a catalog backend; the MCP server handler.
#[derive(Clone)]
pub struct ToolSurface {
    api: Arc<dyn CatalogApi>,
    limits: ToolLimits,
    server_name: String,
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for ToolSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolSurface")
            .field("limits", &self.limits)
            .field("server_name", &self.server_name)
            .finish_non_exhaustive()
    }
}

impl ToolSurface {
    /// Register the three product tools against `api`.
    pub fn new(api: Arc<dyn CatalogApi>, limits: ToolLimits) -> Self {
        let tool_router = Self::tool_router();
        tracing::debug!(tools = tool_router.list_all().len(), "product tools registered");
        Self {
            api,
            limits,
            server_name: DEFAULT_SERVER_NAME.to_string(),
            tool_router,
        }
    }

    pub fn with_server_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = name.into();
        self
    }

    /// Tools as advertised by `tools/list`, sorted by name.
    pub fn list_tools(&self) -> Vec<Tool> {
        let mut tools = self.tool_router.list_all();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    /// Run one tool body and wrap its outcome.
    ///
    /// Credentials are checked first so a server started without them
    /// reports that, whatever the arguments look like.
    async fn run<F>(&self, name: &'static str, body: F) -> CallToolResult
    where
        F: Future<Output = crate::types::Result<Value>>,
    {
        let started = Instant::now();
        let outcome = match self.api.check_credentials() {
            Ok(()) => body.await,
            Err(err) => Err(err),
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(body) => {
                tracing::info!(tool = name, elapsed_ms, "tool call succeeded");
                success_output(&body)
            }
            Err(err) => {
                tracing::warn!(tool = name, elapsed_ms, code = err.code(), error = %err, "tool call failed");
                error_output(failure_context(name), &err)
            }
        }
    }
}

#[tool_router]
impl ToolSurface {
    #[tool(
        name = "getProduct",
        description = "Returns single product data",
        annotations(title = "Get product", read_only_hint = true, open_world_hint = true)
    )]
    pub async fn get_product(
        &self,
        Parameters(input): Parameters<GetProductInput>,
    ) -> std::result::Result<CallToolResult, McpError> {
        Ok(self
            .run(GET_PRODUCT, async {
                let id = product_id(&input.product_id, "productId")?;
                self.api.get_product(&id).await
            })
            .await)
    }

    #[tool(
        name = "getProducts",
        description = "Returns a list of products (maximum 25)",
        annotations(title = "List products", read_only_hint = true, open_world_hint = true)
    )]
    pub async fn get_products(
        &self,
        Parameters(input): Parameters<GetProductsInput>,
    ) -> std::result::Result<CallToolResult, McpError> {
        Ok(self
            .run(GET_PRODUCTS, async {
                let requested = count(input.limit, self.limits.default_list_limit, "limit")?;
                let offset = count(input.offset, 0, "offset")?;
                let limit = clamp_limit(requested, self.limits.max_list_limit);
                if limit != requested {
                    tracing::debug!(requested, limit, "clamped product list limit");
                }
                self.api.list_products(limit, offset).await
            })
            .await)
    }

    #[tool(
        name = "updateProductDescription",
        description = "Updates product description",
        annotations(
            title = "Update product description",
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = true
        )
    )]
    pub async fn update_product_description(
        &self,
        Parameters(input): Parameters<UpdateDescriptionInput>,
    ) -> std::result::Result<CallToolResult, McpError> {
        Ok(self
            .run(UPDATE_PRODUCT_DESCRIPTION, async {
                let id = product_id(&input.product_id, "productId")?;
                update_product_description(self.api.as_ref(), &id, &input.description).await
            })
            .await)
    }
}

#[tool_handler]
impl rmcp::ServerHandler for ToolSurface {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.server_name.clone(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Implementation::from_build_env()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
            ..Default::default()
        }
    }
}

fn failure_context(name: &str) -> &'static str {
    match name {
        GET_PRODUCTS => "Error fetching products",
        UPDATE_PRODUCT_DESCRIPTION => "Error updating product",
        _ => "Error fetching product",
    }
}

/// Pretty-printed envelope as the single text block.
fn success_output(body: &Value) -> CallToolResult {
    match serde_json::to_string_pretty(body) {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(e) => error_output("Error encoding response", &Error::from(e)),
    }
}

/// `{"error": {...}}` payload flagged with `isError`.
fn error_output(context: &str, err: &Error) -> CallToolResult {
    let mut detail = json!({
        "code": err.code(),
        "message": format!("{}: {}", context, err),
    });
    if let Error::Remote {
        status,
        status_text,
    } = err
    {
        detail["status"] = json!(status);
        detail["statusText"] = json!(status_text);
    }

    let payload = json!({ "error": detail });
    let text = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());
    CallToolResult::error(vec![Content::text(text)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MockCatalogApi;
    use pretty_assertions::assert_eq;
    use rmcp::ServerHandler;

    /// A mock whose credentials resolved.
    fn ready() -> MockCatalogApi {
        let mut api = MockCatalogApi::new();
        api.expect_check_credentials().returning(|| Ok(()));
        api
    }

    fn surface(api: MockCatalogApi) -> ToolSurface {
        ToolSurface::new(Arc::new(api), ToolLimits::default())
    }

    fn text(result: &CallToolResult) -> String {
        result
            .content
            .iter()
            .filter_map(|c| c.as_text())
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn error_json(result: &CallToolResult) -> Value {
        assert_eq!(result.is_error, Some(true), "expected error result: {:?}", result);
        serde_json::from_str(&text(result)).unwrap()
    }

    fn get(id: &str) -> Parameters<GetProductInput> {
        Parameters(GetProductInput {
            product_id: id.to_string(),
        })
    }

    fn list(limit: Option<f64>, offset: Option<f64>) -> Parameters<GetProductsInput> {
        Parameters(GetProductsInput { limit, offset })
    }

    fn update(id: &str, description: &str) -> Parameters<UpdateDescriptionInput> {
        Parameters(UpdateDescriptionInput {
            product_id: id.to_string(),
            description: description.to_string(),
        })
    }

    #[test]
    fn test_three_tools_registered() {
        let tools = surface(MockCatalogApi::new()).list_tools();
        let names: Vec<&str> = tools.iter().map(|t| &*t.name).collect();
        assert_eq!(names, vec!["getProduct", "getProducts", "updateProductDescription"]);

        let update = &tools[2];
        let hints = update.annotations.as_ref().unwrap();
        assert_eq!(hints.read_only_hint, Some(false));
        assert_eq!(tools[0].annotations.as_ref().unwrap().read_only_hint, Some(true));
    }

    #[test]
    fn test_input_schemas() {
        let tools = surface(MockCatalogApi::new()).list_tools();

        let get_schema = Value::Object(tools[0].input_schema.as_ref().clone());
        assert_eq!(get_schema["required"], json!(["productId"]));

        let list_schema = Value::Object(tools[1].input_schema.as_ref().clone());
        assert_eq!(list_schema["properties"]["limit"]["default"], json!(25.0));
        assert!(list_schema.get("required").map_or(true, |r| r == &json!([])));

        let update_schema = Value::Object(tools[2].input_schema.as_ref().clone());
        let mut required: Vec<String> =
            serde_json::from_value(update_schema["required"].clone()).unwrap();
        required.sort();
        assert_eq!(required, vec!["description", "productId"]);
    }

    #[test]
    fn test_missing_list_arguments_take_defaults() {
        let input: GetProductsInput = serde_json::from_value(json!({})).unwrap();
        assert_eq!(input.limit, Some(25.0));
        assert_eq!(input.offset, Some(0.0));
    }

    #[test]
    fn test_server_info() {
        let info = surface(MockCatalogApi::new())
            .with_server_name("shop")
            .get_info();
        assert_eq!(info.server_info.name, "shop");
        assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.unwrap().contains("updateProductDescription"));
    }

    #[tokio::test]
    async fn test_get_product_pretty_prints_envelope() {
        let mut api = ready();
        api.expect_get_product()
            .withf(|id| id.as_str() == "p-1")
            .times(1)
            .returning(|_| Ok(json!({"product": {"id": "p-1", "title": "Mug"}})));

        let result = surface(api).get_product(get("p-1")).await.unwrap();

        assert_eq!(result.is_error, Some(false));
        let body: Value = serde_json::from_str(&text(&result)).unwrap();
        assert_eq!(body, json!({"product": {"id": "p-1", "title": "Mug"}}));
        assert!(text(&result).contains('\n'));
    }

    #[tokio::test]
    async fn test_get_products_clamps_limit() {
        let mut api = ready();
        api.expect_list_products()
            .withf(|limit, offset| *limit == 25 && *offset == 0)
            .times(1)
            .returning(|_, _| Ok(json!({"products": []})));

        let result = surface(api)
            .get_products(list(Some(100.0), Some(0.0)))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(false));
    }

    #[tokio::test]
    async fn test_get_products_null_arguments_use_defaults() {
        let mut api = ready();
        api.expect_list_products()
            .withf(|limit, offset| *limit == 25 && *offset == 0)
            .times(1)
            .returning(|_, _| Ok(json!({"products": []})));

        surface(api).get_products(list(None, None)).await.unwrap();
    }

    #[tokio::test]
    async fn test_get_products_small_limit_passes_through() {
        let mut api = ready();
        api.expect_list_products()
            .withf(|limit, offset| *limit == 5 && *offset == 50)
            .times(1)
            .returning(|_, _| Ok(json!({"products": []})));

        surface(api)
            .get_products(list(Some(5.0), Some(50.0)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_remote_error_becomes_error_payload() {
        let mut api = ready();
        api.expect_get_product()
            .returning(|_| Err(Error::remote(404, "Not Found")));

        let result = surface(api).get_product(get("nope")).await.unwrap();

        assert_eq!(
            error_json(&result),
            json!({
                "error": {
                    "code": "REMOTE_ERROR",
                    "message": "Error fetching product: remote error: 404 Not Found",
                    "status": 404,
                    "statusText": "Not Found"
                }
            })
        );
    }

    #[tokio::test]
    async fn test_invalid_arguments_never_reach_catalog() {
        let mut api = ready();
        api.expect_get_product().times(0);
        api.expect_list_products().times(0);
        let surface = surface(api);

        let result = surface.get_product(get("")).await.unwrap();
        let err = error_json(&result);
        assert_eq!(err["error"]["code"], "INVALID_ARGUMENT");
        assert!(err["error"]["message"]
            .as_str()
            .unwrap()
            .contains("productId cannot be empty"));

        let result = surface.get_products(list(Some(-1.0), None)).await.unwrap();
        assert_eq!(error_json(&result)["error"]["code"], "INVALID_ARGUMENT");

        let result = surface.get_products(list(None, Some(1.5))).await.unwrap();
        assert_eq!(error_json(&result)["error"]["code"], "INVALID_ARGUMENT");
    }

    #[tokio::test]
    async fn test_missing_credentials_win_over_bad_arguments() {
        let mut api = MockCatalogApi::new();
        api.expect_check_credentials().returning(|| {
            Err(Error::configuration(crate::credentials::MISSING_CREDENTIALS))
        });
        api.expect_get_product().times(0);
        api.expect_list_products().times(0);
        api.expect_update_product().times(0);
        let surface = surface(api);

        let results = vec![
            surface.get_product(get("")).await.unwrap(),
            surface.get_products(list(Some(-1.0), None)).await.unwrap(),
            surface.update_product_description(update("", "x")).await.unwrap(),
        ];
        for result in &results {
            let err = error_json(result);
            assert_eq!(err["error"]["code"], "CONFIGURATION_ERROR");
            assert!(err["error"]["message"]
                .as_str()
                .unwrap()
                .contains("--jwt and/or --store-id"));
        }
    }

    #[tokio::test]
    async fn test_update_description_uses_sanitizer() {
        let mut api = ready();
        api.expect_get_product()
            .times(1)
            .returning(|_| Ok(json!({"product": {"id": "p1", "title": "Mug", "created_at": "x"}})));
        api.expect_update_product()
            .withf(|id, payload| {
                id.as_str() == "p1"
                    && payload.description.is_empty()
                    && payload.title == Some(json!("Mug"))
            })
            .times(1)
            .returning(|_, _| Ok(json!({"product": {"id": "p1", "description": ""}})));

        let result = surface(api)
            .update_product_description(update("p1", ""))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(false));
    }

    #[tokio::test]
    async fn test_update_failure_context() {
        let mut api = ready();
        api.expect_get_product()
            .returning(|_| Err(Error::network("connection refused")));
        api.expect_update_product().times(0);

        let result = surface(api)
            .update_product_description(update("p1", "x"))
            .await
            .unwrap();
        let err = error_json(&result);
        assert_eq!(err["error"]["code"], "NETWORK_ERROR");
        assert!(err["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Error updating product: network error"));
        assert!(err["error"].get("status").is_none());
    }
}
