//! The MCP tool surface.
//!
//! `products` binds the three product operations to a
//! [`crate::catalog::CatalogApi`] and serves them as an rmcp handler.

pub mod products;

pub use products::{
    GetProductInput, GetProductsInput, ToolSurface, UpdateDescriptionInput, DEFAULT_SERVER_NAME,
    GET_PRODUCT, GET_PRODUCTS, UPDATE_PRODUCT_DESCRIPTION,
};
