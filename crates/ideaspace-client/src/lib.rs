#![forbid(unsafe_code)]

//! HTTP client for the idea-expansion service.
//!
//! - `POST {base_url}{expand_path}` with `{"sentence": ...}` answers
//!   `{"nodes": [...]}`.
//! - `POST {base_url}{embed_path}` with `{"sentence": ...}` warms the
//!   service's embedding index (optional, fire-and-forget).

pub mod config;
pub mod error;
pub mod http;

pub use config::ServiceConfig;
pub use error::{ClientError, Result};
pub use http::{HttpExpansionService, parse_nodes};
