//! Server status tools.

use super::{ToolDefinition, ToolOutput};
use crate::client::AlertmanagerClient;

pub const GET_STATUS: &str = "getAlertmanagerStatus";
pub const GET_RECEIVERS: &str = "getReceivers";

pub const DEFINITIONS: &[ToolDefinition] = &[
    ToolDefinition {
        name: GET_STATUS,
        title: "Status: Get Alertmanager Status",
        description: "Get Alertmanager server status: version, uptime, cluster info.",
        read_only: true,
        destructive: None,
        params: &[],
        required: &[],
    },
    ToolDefinition {
        name: GET_RECEIVERS,
        title: "Status: Get Receivers",
        description: "List configured notification receivers (Slack, email, PagerDuty, etc.).",
        read_only: true,
        destructive: None,
        params: &[],
        required: &[],
    },
];

pub async fn get_status(client: &AlertmanagerClient) -> ToolOutput {
    match client.get_status().await {
        Ok(text) => ToolOutput::text(text),
        Err(e) => ToolOutput::error(format!("Failed to get status: {e}")),
    }
}

pub async fn get_receivers(client: &AlertmanagerClient) -> ToolOutput {
    match client.get_receivers().await {
        Ok(text) => ToolOutput::text(text),
        Err(e) => ToolOutput::error(format!("Failed to get receivers: {e}")),
    }
}
