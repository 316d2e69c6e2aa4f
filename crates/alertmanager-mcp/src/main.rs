//! alertmanager-mcp binary: resolve the connection, then serve MCP over
//! stdio (default) or HTTP (`--port`).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use alertmanager_mcp::config::{ConnectionMode, ConnectionSettings, ServiceScheme};
use alertmanager_mcp::errors::BINARY_NAME;
use alertmanager_mcp::logging::{init_tracing, LogConfig};
use alertmanager_mcp::server::{http, stdio};
use alertmanager_mcp::{AlertmanagerClient, AlertmanagerError, ConnectionResolver, McpServer, ToolRegistry};

/// Alertmanager Model Context Protocol (MCP) server
#[derive(Parser, Debug)]
#[command(name = "alertmanager-mcp")]
#[command(about = "A Model Context Protocol (MCP) server that provides Prometheus Alertmanager tools for AI assistants")]
#[command(version)]
struct Cli {
    /// Log level from 0 to 9 (stdio mode is silent at 0)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=9))]
    log_level: u8,

    /// Serve MCP over HTTP on this port instead of stdio (POST /mcp or /, GET /health)
    #[arg(long)]
    port: Option<u16>,

    /// Direct Alertmanager URL (e.g. http://localhost:9093). Overrides cluster auto-detect. Env: ALERTMANAGER_URL
    #[arg(long)]
    url: Option<String>,

    /// Kubernetes namespace of the Alertmanager service (default: openshift-monitoring)
    #[arg(long)]
    namespace: Option<String>,

    /// Kubernetes service name for Alertmanager (default: alertmanager-operated)
    #[arg(long)]
    service: Option<String>,

    /// Kubernetes service port for Alertmanager (default: 9093)
    #[arg(long)]
    service_port: Option<u16>,

    /// Kubernetes service scheme (default: https)
    #[arg(long, value_enum)]
    service_scheme: Option<ServiceScheme>,

    /// Path to kubeconfig file (default: auto-detect)
    #[arg(long)]
    kubeconfig: Option<PathBuf>,

    /// Cluster fallback used after the direct URL
    #[arg(long, value_enum, default_value_t = ConnectionMode::Auto)]
    mode: ConnectionMode,

    /// OpenShift route name used by `--mode route` (default: alertmanager-main)
    #[arg(long)]
    route_name: Option<String>,
}

impl Cli {
    fn connection_settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            url: self.url.clone(),
            kubeconfig: self.kubeconfig.clone(),
            namespace: self.namespace.clone(),
            service: self.service.clone(),
            service_port: self.service_port,
            service_scheme: self.service_scheme,
            route_name: self.route_name.clone(),
            mode: self.mode,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&LogConfig::for_mode(cli.port, cli.log_level));
    info!("Starting {} {}", BINARY_NAME, env!("CARGO_PKG_VERSION"));

    let settings = cli.connection_settings();
    let connection = match ConnectionResolver::for_mode(settings.mode).resolve(&settings).await {
        Ok(connection) => connection,
        Err(e @ AlertmanagerError::NoConnection { .. }) => {
            eprintln!("Error: failed to resolve Alertmanager connection: {e}");
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };
    info!(method = connection.method, base_url = %connection.base_url, "Alertmanager connection ready");

    let client = AlertmanagerClient::new(&connection);
    let server = Arc::new(McpServer::new(ToolRegistry::new(client)));

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            shutdown_signal().await;
            shutdown.cancel();
        }
    });

    if let Some(port) = cli.port {
        http::serve_http(server, port, shutdown).await?;
    } else {
        stdio::serve_stdio(server, shutdown).await?;
    }

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully");
        },
        () = terminate => {
            info!("Received SIGTERM, shutting down gracefully");
        },
    }
}
