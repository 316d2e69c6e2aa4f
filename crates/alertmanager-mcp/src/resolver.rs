//! Connection resolution.
//!
//! A [`ConnectionResolver`] walks an ordered list of [`ConnectionStrategy`]
//! implementations and keeps the first one that resolves. Strategies whose
//! preconditions are unmet report [`Attempt::NotApplicable`]; strategies that
//! break report [`Attempt::Failed`]. Both fall through, and if nothing
//! resolves the collected reasons become [`AlertmanagerError::NoConnection`].
//!
//! ## Strategies
//!
//! - [`DirectUrl`]: `--url` flag, then `ALERTMANAGER_URL`
//! - [`ClusterProxy`]: Kubernetes API server service proxy
//! - [`InClusterService`]: internal service DNS name with the service-account token
//! - [`RouteDiscovery`]: OpenShift route host with the service-account token

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use kube::{Client, Config};
use tracing::{debug, info, warn};

use crate::config::{ConnectionMode, ConnectionSettings, DEFAULT_NAMESPACE, ENV_ALERTMANAGER_URL};
use crate::errors::{AlertmanagerError, AttemptReport, Result};
use crate::kubernetes;
use crate::transport::{BearerAuth, HttpTransport, KubeProxyTransport, ReqwestTransport};

/// A resolved way to reach Alertmanager. Read-only once built.
#[derive(Clone)]
pub struct Connection {
    /// Address requests are sent to.
    pub base_url: String,
    /// Strategy that produced the connection.
    pub method: &'static str,
    transport: Arc<dyn HttpTransport>,
}

impl Connection {
    pub fn new(method: &'static str, transport: impl HttpTransport + 'static) -> Self {
        Self {
            base_url: transport.base_url().to_string(),
            method,
            transport: Arc::new(transport),
        }
    }

    #[must_use]
    pub fn transport(&self) -> Arc<dyn HttpTransport> {
        Arc::clone(&self.transport)
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("base_url", &self.base_url)
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}

/// Result of one strategy.
pub enum Attempt {
    Resolved(Connection),
    NotApplicable(String),
    Failed(String),
}

/// One way of reaching Alertmanager.
#[async_trait]
pub trait ConnectionStrategy: Send + Sync {
    /// Stable identifier used in logs and the final error.
    fn name(&self) -> &'static str;

    async fn attempt(&self, settings: &ConnectionSettings) -> Attempt;
}

/// Tries strategies strictly in order and keeps the first success.
pub struct ConnectionResolver {
    strategies: Vec<Box<dyn ConnectionStrategy>>,
}

impl ConnectionResolver {
    /// Chain for a [`ConnectionMode`]. Direct URL always comes first.
    #[must_use]
    pub fn for_mode(mode: ConnectionMode) -> Self {
        let fallback: Box<dyn ConnectionStrategy> = match mode {
            ConnectionMode::Auto => Box::new(ClusterProxy),
            ConnectionMode::ServiceAccount => Box::new(InClusterService),
            ConnectionMode::Route => Box::new(RouteDiscovery),
        };
        Self::with_strategies(vec![Box::new(DirectUrl::from_env()), fallback])
    }

    #[must_use]
    pub fn with_strategies(strategies: Vec<Box<dyn ConnectionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Names of the strategies in evaluation order.
    #[must_use]
    pub fn methods(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Resolve a connection.
    ///
    /// # Errors
    ///
    /// Returns [`AlertmanagerError::NoConnection`] listing every strategy tried
    /// when none resolves.
    pub async fn resolve(&self, settings: &ConnectionSettings) -> Result<Connection> {
        let mut attempts = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            let method = strategy.name();
            match strategy.attempt(settings).await {
                Attempt::Resolved(connection) => {
                    info!(method, base_url = %connection.base_url, "Resolved Alertmanager connection");
                    return Ok(connection);
                }
                Attempt::NotApplicable(reason) => {
                    debug!(method, reason = %reason, "Connection method not applicable");
                    attempts.push(AttemptReport {
                        method,
                        reason,
                        failed: false,
                    });
                }
                Attempt::Failed(reason) => {
                    warn!(method, reason = %reason, "Connection method failed");
                    attempts.push(AttemptReport {
                        method,
                        reason,
                        failed: true,
                    });
                }
            }
        }

        Err(AlertmanagerError::NoConnection { attempts })
    }
}

/// Explicit URL from the flag or `ALERTMANAGER_URL`, used verbatim.
pub struct DirectUrl {
    env_url: Option<String>,
}

impl DirectUrl {
    pub const NAME: &'static str = "direct-url";

    /// Capture `ALERTMANAGER_URL` from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::with_env_value(std::env::var(ENV_ALERTMANAGER_URL).ok())
    }

    #[must_use]
    pub fn with_env_value(env_url: Option<String>) -> Self {
        Self { env_url }
    }

    /// Flag beats environment; blank values count as unset.
    #[must_use]
    pub fn select_url<'a>(&'a self, explicit: Option<&'a str>) -> Option<&'a str> {
        explicit
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .or_else(|| {
                self.env_url
                    .as_deref()
                    .map(str::trim)
                    .filter(|url| !url.is_empty())
            })
    }
}

#[async_trait]
impl ConnectionStrategy for DirectUrl {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn attempt(&self, settings: &ConnectionSettings) -> Attempt {
        let Some(url) = self.select_url(settings.url.as_deref()) else {
            return Attempt::NotApplicable(format!("no --url flag or {ENV_ALERTMANAGER_URL} set"));
        };

        match ReqwestTransport::new(url) {
            Ok(transport) => Attempt::Resolved(Connection::new(Self::NAME, transport)),
            Err(e) => Attempt::Failed(format!("building HTTP client for {url}: {e}")),
        }
    }
}

/// Kubernetes API server proxy to the Alertmanager service.
pub struct ClusterProxy;

impl ClusterProxy {
    pub const NAME: &'static str = "cluster-api-proxy";
}

#[async_trait]
impl ConnectionStrategy for ClusterProxy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn attempt(&self, settings: &ConnectionSettings) -> Attempt {
        let config = match cluster_config(settings).await {
            Ok(config) => config,
            Err(attempt) => return attempt,
        };

        let namespace = kubernetes::detect_namespace(settings.explicit_namespace(), DEFAULT_NAMESPACE);
        let path = kubernetes::proxy_path(
            &namespace,
            settings.service_scheme().as_str(),
            settings.service(),
            settings.service_port(),
        );
        let cluster_url = config.cluster_url.to_string();

        let client = match Client::try_from(config) {
            Ok(client) => client,
            Err(e) => return Attempt::Failed(format!("creating Kubernetes client: {e}")),
        };

        info!(
            namespace = %namespace,
            service = settings.service(),
            port = settings.service_port(),
            scheme = %settings.service_scheme(),
            "Connecting to Alertmanager via Kubernetes API proxy"
        );
        Attempt::Resolved(Connection::new(
            Self::NAME,
            KubeProxyTransport::new(client, &cluster_url, path),
        ))
    }
}

/// Direct HTTPS to `{service}.{namespace}.svc` with the service-account token.
///
/// Certificate verification is relaxed: internal monitoring services are
/// usually signed by the cluster's own CA.
pub struct InClusterService;

impl InClusterService {
    pub const NAME: &'static str = "in-cluster-service";
}

#[async_trait]
impl ConnectionStrategy for InClusterService {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn attempt(&self, settings: &ConnectionSettings) -> Attempt {
        let config = match cluster_config(settings).await {
            Ok(config) => config,
            Err(attempt) => return attempt,
        };
        let token = match service_account_token(&config).await {
            Ok(token) => token,
            Err(attempt) => return attempt,
        };

        let namespace = kubernetes::detect_namespace(settings.explicit_namespace(), DEFAULT_NAMESPACE);
        let url = kubernetes::service_url(settings.service(), &namespace, settings.service_port());

        match authenticated_transport(&url, &token) {
            Ok(transport) => Attempt::Resolved(Connection::new(Self::NAME, transport)),
            Err(e) => Attempt::Failed(e.to_string()),
        }
    }
}

/// HTTPS to the host of an OpenShift route with the service-account token.
pub struct RouteDiscovery;

impl RouteDiscovery {
    pub const NAME: &'static str = "route-discovery";
}

#[async_trait]
impl ConnectionStrategy for RouteDiscovery {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn attempt(&self, settings: &ConnectionSettings) -> Attempt {
        let config = match cluster_config(settings).await {
            Ok(config) => config,
            Err(attempt) => return attempt,
        };
        let token = match service_account_token(&config).await {
            Ok(token) => token,
            Err(attempt) => return attempt,
        };
        let client = match Client::try_from(config) {
            Ok(client) => client,
            Err(e) => return Attempt::Failed(format!("creating Kubernetes client: {e}")),
        };

        let namespace = kubernetes::detect_namespace(settings.explicit_namespace(), DEFAULT_NAMESPACE);
        let route_name = settings.route_name();
        let host = match kubernetes::route_host(&client, &namespace, route_name).await {
            Ok(Some(host)) => host,
            // The cluster-wide route listing only refines the message; a namespaced
            // account may be unable to list routes yet still read its own.
            Ok(None) if kubernetes::is_openshift(&client).await => {
                return Attempt::NotApplicable(format!(
                    "route {namespace}/{route_name} not found or has no host"
                ))
            }
            Ok(None) => {
                return Attempt::NotApplicable(format!(
                    "route {namespace}/{route_name} not found (route.openshift.io API not listable)"
                ))
            }
            Err(e) => return Attempt::Failed(format!("looking up route {namespace}/{route_name}: {e}")),
        };

        match authenticated_transport(&format!("https://{host}"), &token) {
            Ok(transport) => Attempt::Resolved(Connection::new(Self::NAME, transport)),
            Err(e) => Attempt::Failed(e.to_string()),
        }
    }
}

/// Load credentials. An explicit kubeconfig that cannot be loaded is a failure;
/// absent ambient credentials only make the strategy inapplicable.
async fn cluster_config(settings: &ConnectionSettings) -> std::result::Result<Config, Attempt> {
    match kubernetes::load_config(settings.kubeconfig.as_deref()).await {
        Ok(config) => Ok(config),
        Err(e) if settings.kubeconfig.is_some() => Err(Attempt::Failed(e.to_string())),
        Err(e) => Err(Attempt::NotApplicable(format!(
            "no Kubernetes credentials found: {e}"
        ))),
    }
}

async fn service_account_token(config: &Config) -> std::result::Result<String, Attempt> {
    match kubernetes::bearer_token(config).await {
        Ok(Some(token)) => Ok(token),
        Ok(None) => Err(Attempt::NotApplicable(
            "credentials carry no bearer token".to_string(),
        )),
        Err(e) => Err(Attempt::Failed(format!("reading bearer token file: {e}"))),
    }
}

fn authenticated_transport(url: &str, token: &str) -> Result<BearerAuth<ReqwestTransport>> {
    BearerAuth::new(token, ReqwestTransport::insecure(url)?)
}
