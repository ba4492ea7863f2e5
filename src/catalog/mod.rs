//! Catalog access: the remote product API and the writes derived from it.
//!
//! `CatalogApi` is the seam between the tool surface and the network: the
//! production implementation is [`CatalogClient`], tests substitute mocks.

pub mod client;
pub mod update;

use async_trait::async_trait;
use serde_json::Value;

use crate::types::{ProductId, Result};

pub use client::CatalogClient;
pub use update::{
    build_description_update, extract_product, update_product_description, UpdatePayload,
};

/// Remote product catalog operations.
///
/// Envelopes are returned exactly as the catalog service produced them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fails with a configuration error when no credentials were resolved.
    fn check_credentials(&self) -> Result<()>;

    /// `GET /products/{id}`.
    async fn get_product(&self, product_id: &ProductId) -> Result<Value>;

    /// `GET /products`, newest first. The ceiling on `limit` is the caller's job.
    async fn list_products(&self, limit: u64, offset: u64) -> Result<Value>;

    /// `POST /products/{id}` with an allow-listed payload.
    async fn update_product(&self, product_id: &ProductId, payload: &UpdatePayload)
        -> Result<Value>;
}
