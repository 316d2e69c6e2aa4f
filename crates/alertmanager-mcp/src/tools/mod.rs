//! MCP tool registry.
//!
//! Tools are grouped by concern (alerts, silences, status, troubleshooting).
//! Every handler returns a [`ToolOutput`]; failures are rendered as error
//! text so they never escape the protocol boundary.

pub mod alerts;
pub mod silences;
pub mod status;
pub mod troubleshooting;

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::client::AlertmanagerClient;

/// Result of one tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutput {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }

    /// MCP `tools/call` result payload.
    #[must_use]
    pub fn to_call_result(&self) -> Value {
        let mut result = json!({
            "content": [{
                "type": "text",
                "text": self.text
            }]
        });
        if self.is_error {
            result["isError"] = Value::Bool(true);
        }
        result
    }
}

/// Named arguments of a tool call. Only string values are visible.
#[derive(Debug, Clone, Copy)]
pub struct ToolArgs<'a> {
    args: Option<&'a Map<String, Value>>,
}

impl<'a> ToolArgs<'a> {
    #[must_use]
    pub fn new(arguments: &'a Value) -> Self {
        Self {
            args: arguments.as_object(),
        }
    }

    /// Trimmed string argument, `None` when absent, blank or not a string.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.args?
            .get(name)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    #[must_use]
    pub fn get_or(&self, name: &str, default: &'a str) -> &'a str {
        self.get(name).unwrap_or(default)
    }
}

/// One input parameter. All parameters are strings.
#[derive(Debug, Clone, Copy)]
pub struct Param {
    pub name: &'static str,
    pub description: &'static str,
}

/// Static description of a tool as advertised by `tools/list`.
#[derive(Debug, Clone, Copy)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub read_only: bool,
    /// Only advertised for tools that modify state.
    pub destructive: Option<bool>,
    pub params: &'static [Param],
    pub required: &'static [&'static str],
}

impl ToolDefinition {
    #[must_use]
    pub fn to_json(&self) -> Value {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|p| {
                (
                    p.name.to_string(),
                    json!({ "type": "string", "description": p.description }),
                )
            })
            .collect();

        let mut input_schema = json!({ "type": "object" });
        if !properties.is_empty() {
            input_schema["properties"] = Value::Object(properties);
        }
        if !self.required.is_empty() {
            input_schema["required"] = json!(self.required);
        }

        let mut annotations = json!({
            "title": self.title,
            "readOnlyHint": self.read_only
        });
        if let Some(destructive) = self.destructive {
            annotations["destructiveHint"] = Value::Bool(destructive);
        }

        json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": input_schema,
            "annotations": annotations
        })
    }
}

/// Maps tool names to handlers bound to one backend client.
#[derive(Clone)]
pub struct ToolRegistry {
    client: AlertmanagerClient,
}

impl ToolRegistry {
    #[must_use]
    pub fn new(client: AlertmanagerClient) -> Self {
        Self { client }
    }

    /// Every tool, grouped in registration order.
    #[must_use]
    pub fn definitions() -> Vec<ToolDefinition> {
        [
            alerts::DEFINITIONS,
            silences::DEFINITIONS,
            status::DEFINITIONS,
            troubleshooting::DEFINITIONS,
        ]
        .concat()
    }

    /// `tools/list` payload.
    #[must_use]
    pub fn list(&self) -> Value {
        let tools: Vec<Value> = Self::definitions().iter().map(ToolDefinition::to_json).collect();
        json!({ "tools": tools })
    }

    /// Run a tool by name.
    pub async fn call(&self, name: &str, arguments: &Value) -> ToolOutput {
        let args = ToolArgs::new(arguments);
        let client = &self.client;
        debug!(tool = name, "Calling tool");

        let output = match name {
            alerts::GET_ALERTS => alerts::get_alerts(client, args).await,
            alerts::GET_ALERT_GROUPS => alerts::get_alert_groups(client).await,
            alerts::GET_CRITICAL_ALERTS => alerts::get_critical_alerts(client).await,
            alerts::GET_ALERTING_SUMMARY => alerts::get_alerting_summary(client).await,
            silences::GET_SILENCES => silences::get_silences(client, args).await,
            silences::CREATE_SILENCE => silences::create_silence(client, args).await,
            silences::DELETE_SILENCE => silences::delete_silence(client, args).await,
            status::GET_STATUS => status::get_status(client).await,
            status::GET_RECEIVERS => status::get_receivers(client).await,
            troubleshooting::INVESTIGATE_ALERT => troubleshooting::investigate_alert(client, args).await,
            troubleshooting::GET_ALERT_HISTORY => troubleshooting::get_alert_history(client, args).await,
            troubleshooting::CORRELATE_ALERTS => troubleshooting::correlate_alerts(client).await,
            _ => ToolOutput::error(format!("Unknown tool: {name}")),
        };

        if output.is_error {
            warn!(tool = name, error = %output.text, "Tool call failed");
        }
        output
    }
}
