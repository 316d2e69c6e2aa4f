//! Typed façade over the Alertmanager v2 REST API.
//!
//! Read-only pass-through operations return pretty-printed JSON text; the
//! `_raw` variants decode into [`crate::models`] records for analysis.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;
use url::form_urlencoded;

use crate::errors::{AlertmanagerError, Result};
use crate::models::{Alert, PostableSilence, Silence};
use crate::resolver::Connection;
use crate::transport::{ApiRequest, HttpTransport};

const API_PREFIX: &str = "/api/v2";

/// Query parameters for `GET /api/v2/alerts`. Unset or blank fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertFilter {
    pub active: Option<String>,
    pub silenced: Option<String>,
    pub inhibited: Option<String>,
    /// Label matcher, e.g. `severity="critical"`.
    pub filter: Option<String>,
}

impl AlertFilter {
    /// Active alerts only.
    #[must_use]
    pub fn active() -> Self {
        Self {
            active: Some("true".to_string()),
            ..Self::default()
        }
    }

    /// Active, silenced and inhibited alerts.
    #[must_use]
    pub fn all_states() -> Self {
        Self {
            active: Some("true".to_string()),
            silenced: Some("true".to_string()),
            inhibited: Some("true".to_string()),
            filter: None,
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Encoded query string without the leading `?`; empty when nothing is set.
    #[must_use]
    pub fn query(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        let params = [
            ("active", &self.active),
            ("silenced", &self.silenced),
            ("inhibited", &self.inhibited),
            ("filter", &self.filter),
        ];
        for (key, value) in params {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                query.append_pair(key, value);
            }
        }
        query.finish()
    }
}

/// Client bound to one resolved connection.
#[derive(Clone)]
pub struct AlertmanagerClient {
    transport: Arc<dyn HttpTransport>,
}

impl AlertmanagerClient {
    #[must_use]
    pub fn new(connection: &Connection) -> Self {
        Self::from_transport(connection.transport())
    }

    #[must_use]
    pub fn from_transport(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// `GET /api/v2/alerts`, pretty-printed.
    pub async fn get_alerts(&self, filter: &AlertFilter) -> Result<String> {
        let body = self.execute(ApiRequest::get(alerts_path(filter))).await?;
        Ok(format_json(&body))
    }

    /// `GET /api/v2/alerts`, decoded.
    pub async fn get_alerts_raw(&self, filter: &AlertFilter) -> Result<Vec<Alert>> {
        self.get_json(alerts_path(filter)).await
    }

    /// `GET /api/v2/alerts/groups`, pretty-printed.
    pub async fn get_alert_groups(&self) -> Result<String> {
        let body = self
            .execute(ApiRequest::get(format!("{API_PREFIX}/alerts/groups")))
            .await?;
        Ok(format_json(&body))
    }

    /// `GET /api/v2/silences`, optionally filtered by state, pretty-printed.
    pub async fn get_silences(&self, state: Option<&str>) -> Result<String> {
        let body = self.execute(ApiRequest::get(silences_path(state))).await?;
        Ok(format_json(&body))
    }

    /// `GET /api/v2/silences`, decoded.
    pub async fn get_silences_raw(&self, state: Option<&str>) -> Result<Vec<Silence>> {
        self.get_json(silences_path(state)).await
    }

    /// `POST /api/v2/silences`; returns the pretty-printed response.
    pub async fn create_silence(&self, silence: &PostableSilence) -> Result<String> {
        let body = self.post_silence(silence).await?;
        Ok(format_json(&body))
    }

    /// `POST /api/v2/silences`; returns the response as JSON.
    pub async fn create_silence_raw(&self, silence: &PostableSilence) -> Result<serde_json::Value> {
        let body = self.post_silence(silence).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// `DELETE /api/v2/silence/{id}`. Any non-2xx status is an error.
    pub async fn delete_silence(&self, id: &str) -> Result<()> {
        let path = format!("{API_PREFIX}/silence/{}", urlencoding::encode(id));
        self.execute(ApiRequest::delete(path)).await?;
        Ok(())
    }

    /// `GET /api/v2/status`, pretty-printed.
    pub async fn get_status(&self) -> Result<String> {
        let body = self
            .execute(ApiRequest::get(format!("{API_PREFIX}/status")))
            .await?;
        Ok(format_json(&body))
    }

    /// `GET /api/v2/receivers`, pretty-printed.
    pub async fn get_receivers(&self) -> Result<String> {
        let body = self
            .execute(ApiRequest::get(format!("{API_PREFIX}/receivers")))
            .await?;
        Ok(format_json(&body))
    }

    async fn post_silence(&self, silence: &PostableSilence) -> Result<Vec<u8>> {
        let payload = serde_json::to_vec(silence)?;
        self.execute(ApiRequest::post_json(format!("{API_PREFIX}/silences"), payload))
            .await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: String) -> Result<T> {
        let body = self.execute(ApiRequest::get(path)).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn execute(&self, request: ApiRequest) -> Result<Vec<u8>> {
        let method = request.method.clone();
        let path = request.path.clone();
        let response = self.transport.send(request).await?;
        debug!(%method, path = %path, status = response.status, "Alertmanager responded");

        if !response.is_success() {
            return Err(AlertmanagerError::Api {
                status: response.status,
                body: response.text(),
            });
        }

        Ok(response.body)
    }
}

fn alerts_path(filter: &AlertFilter) -> String {
    let query = filter.query();
    if query.is_empty() {
        format!("{API_PREFIX}/alerts")
    } else {
        format!("{API_PREFIX}/alerts?{query}")
    }
}

fn silences_path(state: Option<&str>) -> String {
    match state.map(str::trim).filter(|s| !s.is_empty()) {
        Some(state) => format!("{API_PREFIX}/silences?state={}", urlencoding::encode(state)),
        None => format!("{API_PREFIX}/silences"),
    }
}

/// Pretty-print JSON with two-space indentation. Bodies that are not JSON
/// are returned unchanged.
#[must_use]
pub fn format_json(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned())
}
