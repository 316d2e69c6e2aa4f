//! Investigation, history and correlation tools.

use chrono::Utc;

use super::{Param, ToolArgs, ToolDefinition, ToolOutput};
use crate::analysis::{correlate, investigate, render_correlation, render_history};
use crate::client::{AlertFilter, AlertmanagerClient};

pub const INVESTIGATE_ALERT: &str = "investigateAlert";
pub const GET_ALERT_HISTORY: &str = "getAlertHistory";
pub const CORRELATE_ALERTS: &str = "correlateAlerts";

pub const DEFINITIONS: &[ToolDefinition] = &[
    ToolDefinition {
        name: INVESTIGATE_ALERT,
        title: "Troubleshooting: Investigate Alert",
        description: "Investigate an alert: all instances, duration, labels, silences, recommendations.",
        read_only: true,
        destructive: None,
        params: &[Param {
            name: "alertName",
            description: "Alert name to investigate",
        }],
        required: &["alertName"],
    },
    ToolDefinition {
        name: GET_ALERT_HISTORY,
        title: "Troubleshooting: Get Alert History",
        description: "Get alert history for a specific alert. Shows current/recent instances and guidance for historical analysis.",
        read_only: true,
        destructive: None,
        params: &[Param {
            name: "alertName",
            description: "Alert name to get history for",
        }],
        required: &["alertName"],
    },
    ToolDefinition {
        name: CORRELATE_ALERTS,
        title: "Troubleshooting: Correlate Alerts",
        description: "Find correlated alerts that share common labels (namespace, pod, node). Helps identify related issues during incidents.",
        read_only: true,
        destructive: None,
        params: &[],
        required: &[],
    },
];

pub async fn investigate_alert(client: &AlertmanagerClient, args: ToolArgs<'_>) -> ToolOutput {
    let Some(alert_name) = args.get("alertName") else {
        return ToolOutput::error("alertName parameter is required");
    };

    match client.get_alerts_raw(&AlertFilter::all_states()).await {
        Ok(alerts) => ToolOutput::text(investigate(&alerts, alert_name, Utc::now()).render()),
        Err(e) => ToolOutput::error(format!("Failed to get alerts: {e}")),
    }
}

pub async fn get_alert_history(client: &AlertmanagerClient, args: ToolArgs<'_>) -> ToolOutput {
    let Some(alert_name) = args.get("alertName") else {
        return ToolOutput::error("alertName parameter is required");
    };

    match client.get_alerts_raw(&AlertFilter::all_states()).await {
        Ok(alerts) => ToolOutput::text(render_history(&investigate(&alerts, alert_name, Utc::now()))),
        Err(e) => ToolOutput::error(format!("Failed to get alerts: {e}")),
    }
}

pub async fn correlate_alerts(client: &AlertmanagerClient) -> ToolOutput {
    match client.get_alerts_raw(&AlertFilter::active()).await {
        Ok(alerts) => ToolOutput::text(render_correlation(alerts.len(), &correlate(&alerts))),
        Err(e) => ToolOutput::error(format!("Failed to get alerts: {e}")),
    }
}
