//! Alert listing tools.

use super::{Param, ToolArgs, ToolDefinition, ToolOutput};
use crate::analysis::AlertSummary;
use crate::client::{AlertFilter, AlertmanagerClient};

pub const GET_ALERTS: &str = "getAlerts";
pub const GET_ALERT_GROUPS: &str = "getAlertGroups";
pub const GET_CRITICAL_ALERTS: &str = "getCriticalAlerts";
pub const GET_ALERTING_SUMMARY: &str = "getAlertingSummary";

const CRITICAL_FILTER: &str = r#"severity="critical""#;

pub const DEFINITIONS: &[ToolDefinition] = &[
    ToolDefinition {
        name: GET_ALERTS,
        title: "Alerts: Get Alerts",
        description: "Get alerts from Alertmanager. Returns active alerts by default. Filter by: active, silenced, inhibited, or label (e.g., 'severity=critical').",
        read_only: true,
        destructive: None,
        params: &[
            Param {
                name: "active",
                description: "Include active alerts (true/false)",
            },
            Param {
                name: "silenced",
                description: "Include silenced alerts (true/false)",
            },
            Param {
                name: "inhibited",
                description: "Include inhibited alerts (true/false)",
            },
            Param {
                name: "filterLabel",
                description: "Label filter: 'key=value'",
            },
        ],
        required: &[],
    },
    ToolDefinition {
        name: GET_ALERT_GROUPS,
        title: "Alerts: Get Alert Groups",
        description: "Get alerts grouped by routing labels. Shows how alerts are batched for notifications.",
        read_only: true,
        destructive: None,
        params: &[],
        required: &[],
    },
    ToolDefinition {
        name: GET_CRITICAL_ALERTS,
        title: "Alerts: Get Critical Alerts",
        description: "Get critical severity alerts only. Prioritized for incident response.",
        read_only: true,
        destructive: None,
        params: &[],
        required: &[],
    },
    ToolDefinition {
        name: GET_ALERTING_SUMMARY,
        title: "Alerts: Get Alerting Summary",
        description: "Get alerting summary: counts by severity, top alerts, affected namespaces.",
        read_only: true,
        destructive: None,
        params: &[],
        required: &[],
    },
];

pub async fn get_alerts(client: &AlertmanagerClient, args: ToolArgs<'_>) -> ToolOutput {
    let filter = AlertFilter {
        active: args.get("active").map(String::from),
        silenced: args.get("silenced").map(String::from),
        inhibited: args.get("inhibited").map(String::from),
        filter: args.get("filterLabel").map(String::from),
    };

    match client.get_alerts(&filter).await {
        Ok(text) => ToolOutput::text(text),
        Err(e) => ToolOutput::error(format!("Failed to get alerts: {e}")),
    }
}

pub async fn get_alert_groups(client: &AlertmanagerClient) -> ToolOutput {
    match client.get_alert_groups().await {
        Ok(text) => ToolOutput::text(text),
        Err(e) => ToolOutput::error(format!("Failed to get alert groups: {e}")),
    }
}

pub async fn get_critical_alerts(client: &AlertmanagerClient) -> ToolOutput {
    let filter = AlertFilter::active().with_filter(CRITICAL_FILTER);
    match client.get_alerts(&filter).await {
        Ok(text) => ToolOutput::text(text),
        Err(e) => ToolOutput::error(format!("Failed to get critical alerts: {e}")),
    }
}

pub async fn get_alerting_summary(client: &AlertmanagerClient) -> ToolOutput {
    match client.get_alerts_raw(&AlertFilter::active()).await {
        Ok(alerts) => ToolOutput::text(AlertSummary::from_alerts(&alerts).render()),
        Err(e) => ToolOutput::error(format!("Failed to get alerts: {e}")),
    }
}
