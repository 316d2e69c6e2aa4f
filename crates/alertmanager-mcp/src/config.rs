//! Connection configuration.
//!
//! Priority for every knob: explicit flag > environment variable > cluster
//! auto-detect > documented default.

use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding a direct Alertmanager URL.
pub const ENV_ALERTMANAGER_URL: &str = "ALERTMANAGER_URL";

/// Namespace of the monitoring stack when nothing else is known.
pub const DEFAULT_NAMESPACE: &str = "openshift-monitoring";

/// Service fronting Alertmanager.
pub const DEFAULT_SERVICE: &str = "alertmanager-operated";

/// Alertmanager web port.
pub const DEFAULT_SERVICE_PORT: u16 = 9093;

/// Route exposing Alertmanager on OpenShift.
pub const DEFAULT_ROUTE_NAME: &str = "alertmanager-main";

/// Per-call timeout for backend requests.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Scheme the cluster API proxy uses to reach the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ServiceScheme {
    Http,
    #[default]
    Https,
}

impl ServiceScheme {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl std::fmt::Display for ServiceScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which resolution chain runs at startup.
///
/// Direct URL always runs first; the mode picks the cluster fallback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ConnectionMode {
    /// Direct URL, then the Kubernetes API service proxy
    #[default]
    Auto,
    /// Direct URL, then the internal service DNS name with the service-account token
    ServiceAccount,
    /// Direct URL, then an OpenShift route with the service-account token
    Route,
}

/// Everything the connection strategies need to know.
#[derive(Debug, Clone, Default)]
pub struct ConnectionSettings {
    /// Explicit `--url`; wins over [`ENV_ALERTMANAGER_URL`].
    pub url: Option<String>,
    /// Explicit kubeconfig path.
    pub kubeconfig: Option<PathBuf>,
    /// Namespace override.
    pub namespace: Option<String>,
    /// Service name override.
    pub service: Option<String>,
    /// Service port override.
    pub service_port: Option<u16>,
    /// Proxy scheme override.
    pub service_scheme: Option<ServiceScheme>,
    /// Route name override.
    pub route_name: Option<String>,
    /// Resolution chain selector.
    pub mode: ConnectionMode,
}

impl ConnectionSettings {
    #[must_use]
    pub fn service(&self) -> &str {
        non_empty(self.service.as_deref()).unwrap_or(DEFAULT_SERVICE)
    }

    #[must_use]
    pub fn service_port(&self) -> u16 {
        self.service_port.unwrap_or(DEFAULT_SERVICE_PORT)
    }

    #[must_use]
    pub fn service_scheme(&self) -> ServiceScheme {
        self.service_scheme.unwrap_or_default()
    }

    #[must_use]
    pub fn route_name(&self) -> &str {
        non_empty(self.route_name.as_deref()).unwrap_or(DEFAULT_ROUTE_NAME)
    }

    /// Explicit namespace, if any. Auto-detection lives in [`crate::kubernetes::detect_namespace`].
    #[must_use]
    pub fn explicit_namespace(&self) -> Option<&str> {
        non_empty(self.namespace.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let settings = ConnectionSettings::default();
        assert_eq!(settings.service(), "alertmanager-operated");
        assert_eq!(settings.service_port(), 9093);
        assert_eq!(settings.service_scheme(), ServiceScheme::Https);
        assert_eq!(settings.route_name(), "alertmanager-main");
        assert_eq!(settings.explicit_namespace(), None);
        assert_eq!(settings.mode, ConnectionMode::Auto);
    }

    #[test]
    fn blank_overrides_fall_back_to_defaults() {
        let settings = ConnectionSettings {
            service: Some("  ".to_string()),
            namespace: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(settings.service(), DEFAULT_SERVICE);
        assert_eq!(settings.explicit_namespace(), None);
    }

    #[test]
    fn overrides_win() {
        let settings = ConnectionSettings {
            namespace: Some("monitoring".to_string()),
            service: Some("alertmanager-main".to_string()),
            service_port: Some(9094),
            service_scheme: Some(ServiceScheme::Http),
            ..Default::default()
        };
        assert_eq!(settings.explicit_namespace(), Some("monitoring"));
        assert_eq!(settings.service(), "alertmanager-main");
        assert_eq!(settings.service_port(), 9094);
        assert_eq!(settings.service_scheme().to_string(), "http");
    }
}
