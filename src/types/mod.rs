//! Core types shared across the server.
//!
//! - **IDs**: Strongly-typed identifiers (ProductId, CorrelationId)
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Configuration structures for the catalog client, transport and tools

mod config;
mod errors;
mod ids;

pub use config::{
    CatalogConfig, Config, McpConfig, ObservabilityConfig, ToolLimits, DEFAULT_API_BASE_URL,
};
pub use errors::{Error, Result};
pub use ids::{CorrelationId, ProductId};
