#![warn(clippy::pedantic)]
// =============================================================================
// Clippy Pedantic Lint Configuration
// =============================================================================
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]
// Not all functions need #[must_use]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
// Tool handlers share one signature shape
#![allow(clippy::unused_async)]

//! Alertmanager MCP server.
//!
//! Exposes Prometheus Alertmanager to MCP clients: alert listing, silences,
//! status and troubleshooting views. The connection to Alertmanager is
//! resolved once at startup by [`resolver::ConnectionResolver`].
//!
//! ## Modules
//!
//! - [`resolver`]: ordered connection strategies (direct URL, cluster API proxy, ...)
//! - [`client`]: typed Alertmanager v2 API client
//! - [`analysis`]: summary, correlation and investigation views
//! - [`tools`]: the MCP tool registry
//! - [`server`]: JSON-RPC handling over stdio or HTTP

pub mod analysis;
pub mod client;
pub mod config;
pub mod errors;
pub mod kubernetes;
pub mod logging;
pub mod models;
pub mod resolver;
pub mod server;
pub mod silence;
pub mod tools;
pub mod transport;

pub use client::{AlertFilter, AlertmanagerClient};
pub use config::{ConnectionMode, ConnectionSettings, ServiceScheme};
pub use errors::{AlertmanagerError, Result};
pub use resolver::{Connection, ConnectionResolver};
pub use server::McpServer;
pub use tools::{ToolOutput, ToolRegistry};
