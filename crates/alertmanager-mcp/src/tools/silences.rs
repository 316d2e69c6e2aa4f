//! Silence lifecycle tools.

use chrono::Utc;

use super::{Param, ToolArgs, ToolDefinition, ToolOutput};
use crate::client::AlertmanagerClient;
use crate::silence::{
    parse_duration, validate_duration, SilenceRequest, DEFAULT_SILENCE_COMMENT,
    DEFAULT_SILENCE_CREATOR, DEFAULT_SILENCE_DURATION,
};

pub const GET_SILENCES: &str = "getSilences";
pub const CREATE_SILENCE: &str = "createSilence";
pub const DELETE_SILENCE: &str = "deleteSilence";

pub const DEFINITIONS: &[ToolDefinition] = &[
    ToolDefinition {
        name: GET_SILENCES,
        title: "Silences: Get Silences",
        description: "List silences. Filter by state: 'active', 'pending', 'expired', or omit for all.",
        read_only: true,
        destructive: None,
        params: &[Param {
            name: "state",
            description: "State: 'active', 'pending', 'expired'",
        }],
        required: &[],
    },
    ToolDefinition {
        name: CREATE_SILENCE,
        title: "Silences: Create Silence",
        description: "Create a silence for an alert. Duration format: '30m', '2h', '1d'. Max 30 days.",
        read_only: false,
        destructive: Some(false),
        params: &[
            Param {
                name: "alertName",
                description: "Alert name to silence",
            },
            Param {
                name: "duration",
                description: "Duration: '30m', '2h', '1d' (default: 2h)",
            },
            Param {
                name: "comment",
                description: "Reason for silence (default: 'Silenced via MCP')",
            },
            Param {
                name: "createdBy",
                description: "Creator name (default: 'alertmanager-mcp')",
            },
        ],
        required: &["alertName"],
    },
    ToolDefinition {
        name: DELETE_SILENCE,
        title: "Silences: Delete Silence",
        description: "Delete a silence by ID. Get ID from getSilences output.",
        read_only: false,
        destructive: Some(true),
        params: &[Param {
            name: "silenceId",
            description: "Silence UUID",
        }],
        required: &["silenceId"],
    },
];

pub async fn get_silences(client: &AlertmanagerClient, args: ToolArgs<'_>) -> ToolOutput {
    match client.get_silences(args.get("state")).await {
        Ok(text) => ToolOutput::text(text),
        Err(e) => ToolOutput::error(format!("Failed to get silences: {e}")),
    }
}

pub async fn create_silence(client: &AlertmanagerClient, args: ToolArgs<'_>) -> ToolOutput {
    let request = match silence_request(args) {
        Ok(request) => request,
        Err(output) => return output,
    };

    match client.create_silence(&request.build(Utc::now())).await {
        Ok(text) => ToolOutput::text(format!("Silence created successfully:\n{text}")),
        Err(e) => ToolOutput::error(format!("Failed to create silence: {e}")),
    }
}

/// Validate arguments before anything reaches the backend.
fn silence_request(args: ToolArgs<'_>) -> Result<SilenceRequest, ToolOutput> {
    let Some(alert_name) = args.get("alertName") else {
        return Err(ToolOutput::error("alertName parameter is required"));
    };

    let duration = parse_duration(args.get_or("duration", DEFAULT_SILENCE_DURATION))
        .map_err(|e| ToolOutput::error(format!("Invalid duration: {e}")))?;
    let duration = validate_duration(duration).map_err(|e| ToolOutput::error(e.to_string()))?;

    Ok(SilenceRequest {
        alert_name: alert_name.to_string(),
        duration,
        comment: args.get_or("comment", DEFAULT_SILENCE_COMMENT).to_string(),
        created_by: args.get_or("createdBy", DEFAULT_SILENCE_CREATOR).to_string(),
    })
}

pub async fn delete_silence(client: &AlertmanagerClient, args: ToolArgs<'_>) -> ToolOutput {
    let Some(id) = args.get("silenceId") else {
        return ToolOutput::error("silenceId parameter is required");
    };

    match client.delete_silence(id).await {
        Ok(()) => ToolOutput::text(format!("Silence {id} deleted successfully")),
        Err(e) => ToolOutput::error(format!("Failed to delete silence: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: &serde_json::Value) -> Result<SilenceRequest, ToolOutput> {
        silence_request(ToolArgs::new(value))
    }

    #[test]
    fn missing_alert_name_is_rejected() {
        let err = request(&json!({ "duration": "1h" })).unwrap_err();
        assert_eq!(err, ToolOutput::error("alertName parameter is required"));
    }

    #[test]
    fn defaults_fill_optional_arguments() {
        let req = request(&json!({ "alertName": "Down" })).unwrap();
        assert_eq!(req.duration.num_hours(), 2);
        assert_eq!(req.comment, "Silenced via MCP");
        assert_eq!(req.created_by, "alertmanager-mcp");
    }

    #[test]
    fn surrounding_whitespace_is_not_part_of_the_matcher() {
        let req = request(&json!({ "alertName": " Down ", "duration": " 30m" })).unwrap();
        assert_eq!(req.alert_name, "Down");
        assert_eq!(req.duration.num_minutes(), 30);

        let silence = req.build(chrono::Utc::now());
        assert_eq!(silence.matchers[0].value, "Down");
    }

    #[test]
    fn bad_durations_are_reported_distinctly() {
        let err = request(&json!({ "alertName": "Down", "duration": "5w" })).unwrap_err();
        assert_eq!(err.text, "Invalid duration: unknown duration unit: w");
        assert!(err.is_error);

        let err = request(&json!({ "alertName": "Down", "duration": "31d" })).unwrap_err();
        assert_eq!(err.text, "Duration cannot exceed 30 days");
    }
}
