//! # Hostinger Ecommerce MCP
//!
//! An MCP (Model Context Protocol) server that lets an agent read products of
//! a Hostinger Ecommerce store and rewrite their descriptions:
//! - `getProduct` / `getProducts` proxy the admin catalog API
//! - `updateProductDescription` reads the product, projects it onto the
//!   fields the API accepts on write and posts it back with the new text
//!
//! ## Architecture
//!
//! ```text
//!   stdin/stdout ◄──► rmcp service ──► tools::ToolSurface (ServerHandler)
//!                                              │
//!                                      catalog::CatalogApi
//!                                              │
//!                              catalog::CatalogClient (reqwest)
//! ```
//!
//! Credentials are resolved once at startup and shared immutably.

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod catalog;
pub mod credentials;
pub mod tools;
pub mod types;
pub mod validation;

// Internal utilities
pub mod observability;

pub use types::{Config, Error, Result};
