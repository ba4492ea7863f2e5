//! Configuration structures.
//!
//! Every section has a usable default; the binary overlays command-line and
//! environment values on top of `Config::default()`.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Production admin API of the Hostinger Ecommerce catalog.
pub const DEFAULT_API_BASE_URL: &str = "https://api-ecommerce.hostinger.com/admin";

/// Global server configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Catalog client configuration.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// MCP server identity.
    #[serde(default)]
    pub mcp: McpConfig,

    /// Tool argument limits.
    #[serde(default)]
    pub tools: ToolLimits,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Catalog client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL every product path is appended to.
    pub base_url: String,

    /// Per-request timeout. `None` lets a hung request hang.
    #[serde(default, with = "humantime_serde")]
    pub request_timeout: Option<Duration>,

    /// Value of the `accept-language` header.
    pub accept_language: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Some(Duration::from_secs(30)),
            accept_language: "en-US,en;q=0.9".to_string(),
        }
    }
}

/// MCP server identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpConfig {
    /// Name reported in `serverInfo`.
    pub server_name: String,
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            server_name: "hostinger-ecommerce".to_string(),
        }
    }
}

/// Tool argument limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolLimits {
    /// Inclusive ceiling applied to `getProducts.limit`.
    pub max_list_limit: u64,

    /// `getProducts.limit` when the caller omits it.
    pub default_list_limit: u64,
}

impl Default for ToolLimits {
    fn default() -> Self {
        Self {
            max_list_limit: 25,
            default_list_limit: 25,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Tracing log level used when `RUST_LOG` is unset.
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.catalog.base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.catalog.request_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.tools.max_list_limit, 25);
        assert_eq!(config.tools.default_list_limit, 25);
        assert_eq!(config.mcp.server_name, "hostinger-ecommerce");
    }

    #[test]
    fn test_deserialize_partial_with_humantime() {
        let config: Config = serde_json::from_value(serde_json::json!({
            "catalog": {
                "base_url": "http://127.0.0.1:9000",
                "request_timeout": "5s",
                "accept_language": "en"
            }
        }))
        .unwrap();

        assert_eq!(config.catalog.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.catalog.request_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.mcp.server_name, "hostinger-ecommerce");
    }
}
