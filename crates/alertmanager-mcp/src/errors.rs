//! Error types for the Alertmanager MCP server.

use std::fmt::Write as _;

use thiserror::Error;

/// Binary name used in remediation examples.
pub const BINARY_NAME: &str = "alertmanager-mcp";

/// Outcome of one connection strategy that did not produce a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptReport {
    /// Strategy name, e.g. `direct-url`.
    pub method: &'static str,
    /// Why the strategy was skipped or failed.
    pub reason: String,
    /// `false` when preconditions were unmet, `true` when the strategy failed outright.
    pub failed: bool,
}

/// Errors raised while resolving a connection or talking to Alertmanager.
#[derive(Debug, Error)]
pub enum AlertmanagerError {
    /// No strategy produced a usable connection. Fatal at startup.
    #[error("{}", render_no_connection(.attempts))]
    NoConnection { attempts: Vec<AttemptReport> },

    /// Cluster credential or cluster API failure
    #[error("kubernetes: {0}")]
    Kube(#[from] kube::Error),

    /// Kubeconfig could not be loaded
    #[error("kubernetes config: {0}")]
    KubeConfig(String),

    /// Network-level failure reaching the backend
    #[error("request failed: {0}")]
    Transport(String),

    /// Backend answered with a non-success status
    #[error("API returned status {status}: {body}")]
    Api { status: u16, body: String },

    /// Malformed caller input
    #[error("{0}")]
    Validation(String),

    /// Response body could not be decoded
    #[error("parsing response: {0}")]
    Json(#[from] serde_json::Error),

    /// Local file access (token files, namespace files)
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for AlertmanagerError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<DurationError> for AlertmanagerError {
    fn from(err: DurationError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, AlertmanagerError>;

/// Rejections produced by the silence duration parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("invalid duration: {0}")]
    TooShort(String),

    #[error("invalid duration value: {0}")]
    InvalidValue(String),

    #[error("unknown duration unit: {0}")]
    UnknownUnit(char),

    #[error("duration must be greater than zero: {0}")]
    NonPositive(String),

    #[error("Duration cannot exceed {max_days} days")]
    ExceedsMaximum { max_days: i64 },
}

fn render_no_connection(attempts: &[AttemptReport]) -> String {
    let mut out = String::from("no Alertmanager connection available\n\n");

    if attempts.is_empty() {
        out.push_str("No connection methods were attempted.\n");
    } else {
        out.push_str("Attempted connection methods:\n");
        for attempt in attempts {
            let outcome = if attempt.failed { "failed" } else { "not applicable" };
            let _ = writeln!(out, "  - {} ({outcome}): {}", attempt.method, attempt.reason);
        }
    }

    let _ = write!(
        out,
        "
Configure one of the following:

  # Direct URL (testing/dev)
  {BINARY_NAME} --url http://localhost:9093

  # Environment variable
  ALERTMANAGER_URL=http://alertmanager:9093 {BINARY_NAME}

  # Kubernetes auto-detect with defaults (openshift-monitoring/alertmanager-operated:9093)
  # Requires a valid kubeconfig or in-cluster service account
  {BINARY_NAME}

  # Custom namespace/service/port/scheme
  {BINARY_NAME} --namespace monitoring --service alertmanager-operated --service-port 9093 --service-scheme http

  # Explicit kubeconfig
  {BINARY_NAME} --kubeconfig /path/to/kubeconfig

  # In-cluster service account token against the internal service
  {BINARY_NAME} --mode service-account --service alertmanager-main --service-port 9094

  # OpenShift route discovery
  {BINARY_NAME} --mode route --route-name alertmanager-main"
    );

    out
}
