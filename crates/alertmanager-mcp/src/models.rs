//! Alertmanager v2 API records.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Label or annotation set. Ordered so rendering is stable.
pub type LabelSet = BTreeMap<String, String>;

/// Alert processing state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertState {
    Active,
    Suppressed,
    #[default]
    Unprocessed,
    /// Any state this client does not know about.
    #[serde(untagged)]
    Other(String),
}

impl fmt::Display for AlertState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("active"),
            Self::Suppressed => f.write_str("suppressed"),
            Self::Unprocessed => f.write_str("unprocessed"),
            Self::Other(state) => f.write_str(state),
        }
    }
}

/// Alert status block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertStatus {
    #[serde(default)]
    pub state: AlertState,
    #[serde(default)]
    pub silenced_by: Vec<String>,
    #[serde(default)]
    pub inhibited_by: Vec<String>,
}

/// Notification receiver reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receiver {
    pub name: String,
}

/// An alert as returned by `GET /api/v2/alerts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub fingerprint: String,
    #[serde(default)]
    pub labels: LabelSet,
    #[serde(default)]
    pub annotations: LabelSet,
    #[serde(default)]
    pub receivers: Vec<Receiver>,
    #[serde(default)]
    pub status: AlertStatus,
    pub starts_at: DateTime<Utc>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "generatorURL")]
    pub generator_url: Option<String>,
}

impl Alert {
    /// Value of a label, if present.
    #[must_use]
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels.get(name).map(String::as_str)
    }

    /// `alertname` label, empty when missing.
    #[must_use]
    pub fn name(&self) -> &str {
        self.label("alertname").unwrap_or_default()
    }

    /// `severity` label, empty when missing.
    #[must_use]
    pub fn severity(&self) -> &str {
        self.label("severity").unwrap_or_default()
    }
}

/// Silence matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Matcher {
    pub name: String,
    pub value: String,
    pub is_regex: bool,
    #[serde(default = "default_is_equal")]
    pub is_equal: bool,
}

const fn default_is_equal() -> bool {
    true
}

impl Matcher {
    /// Exact, non-regex equality matcher.
    #[must_use]
    pub fn equal(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            is_regex: false,
            is_equal: true,
        }
    }
}

/// Silence lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SilenceState {
    Active,
    Pending,
    Expired,
    #[serde(untagged)]
    Other(String),
}

impl fmt::Display for SilenceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("active"),
            Self::Pending => f.write_str("pending"),
            Self::Expired => f.write_str("expired"),
            Self::Other(state) => f.write_str(state),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SilenceStatus {
    pub state: SilenceState,
}

/// A silence as returned by `GET /api/v2/silences`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Silence {
    pub id: String,
    pub status: SilenceStatus,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub created_by: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[serde(default)]
    pub matchers: Vec<Matcher>,
}

/// Payload for `POST /api/v2/silences`. `id` is absent for new silences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostableSilence {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub comment: String,
    pub created_by: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub matchers: Vec<Matcher>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn alert_decodes_api_shape() {
        let alert: Alert = serde_json::from_value(json!({
            "annotations": { "summary": "Pod is crash looping" },
            "endsAt": "2026-10-19T12:00:00Z",
            "fingerprint": "a1b2c3",
            "receivers": [{ "name": "default" }],
            "startsAt": "2026-10-19T10:00:00.123Z",
            "status": { "inhibitedBy": [], "silencedBy": ["s-1"], "state": "suppressed" },
            "updatedAt": "2026-10-19T10:05:00Z",
            "generatorURL": "http://prometheus/graph",
            "labels": { "alertname": "KubePodCrashLooping", "severity": "warning", "namespace": "ns1" }
        }))
        .unwrap();

        assert_eq!(alert.name(), "KubePodCrashLooping");
        assert_eq!(alert.severity(), "warning");
        assert_eq!(alert.status.state, AlertState::Suppressed);
        assert_eq!(alert.status.silenced_by, vec!["s-1"]);
        assert_eq!(alert.generator_url.as_deref(), Some("http://prometheus/graph"));
        assert_eq!(alert.receivers[0].name, "default");
    }

    #[test]
    fn unknown_alert_state_is_preserved() {
        let status: AlertStatus = serde_json::from_value(json!({ "state": "flapping" })).unwrap();
        assert_eq!(status.state, AlertState::Other("flapping".to_string()));
        assert_eq!(status.state.to_string(), "flapping");
    }

    #[test]
    fn postable_silence_omits_missing_id() {
        let silence = PostableSilence {
            id: None,
            comment: "maintenance".to_string(),
            created_by: "ops".to_string(),
            starts_at: "2026-10-19T10:00:00Z".parse().unwrap(),
            ends_at: "2026-10-19T12:00:00Z".parse().unwrap(),
            matchers: vec![Matcher::equal("alertname", "Watchdog")],
        };

        let value = serde_json::to_value(&silence).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["createdBy"], "ops");
        assert_eq!(
            value["matchers"][0],
            json!({ "name": "alertname", "value": "Watchdog", "isRegex": false, "isEqual": true })
        );
    }

    #[test]
    fn silence_decodes_with_state() {
        let silence: Silence = serde_json::from_value(json!({
            "id": "8d5c7b1e",
            "status": { "state": "active" },
            "updatedAt": "2026-10-19T10:00:00Z",
            "comment": "deploy",
            "createdBy": "ops",
            "startsAt": "2026-10-19T10:00:00Z",
            "endsAt": "2026-10-19T12:00:00Z",
            "matchers": [{ "name": "alertname", "value": "Watchdog", "isRegex": false }]
        }))
        .unwrap();

        assert_eq!(silence.status.state, SilenceState::Active);
        assert!(silence.matchers[0].is_equal);
        assert!(silence.ends_at > silence.starts_at);
    }
}
