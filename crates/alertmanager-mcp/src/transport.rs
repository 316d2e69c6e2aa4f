//! HTTP transports used to reach Alertmanager.
//!
//! Callers build an [`ApiRequest`] with a path relative to the Alertmanager
//! root; the transport owns the base address and the authentication story.

use async_trait::async_trait;
use http::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use http::Method;
use tracing::debug;

use crate::config::DEFAULT_HTTP_TIMEOUT;
use crate::errors::{AlertmanagerError, Result};

/// A request against the Alertmanager API, relative to the transport's base.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path plus query string, e.g. `/api/v2/alerts?active=true`.
    pub path: String,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// POST with a JSON body.
    #[must_use]
    pub fn post_json(path: impl Into<String>, body: Vec<u8>) -> Self {
        let mut request = Self::new(Method::POST, path);
        request
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        request.body = Some(body);
        request
    }

    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }
}

/// Raw response: status code and body bytes.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Something that can carry an [`ApiRequest`] to Alertmanager.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send one request. Non-2xx statuses are returned, not raised.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;

    /// Human-readable base address, for logs and diagnostics.
    fn base_url(&self) -> &str;
}

/// Plain HTTP(S) transport to an absolute base URL.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Transport with default certificate verification.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::build(base_url.into(), false)
    }

    /// Transport that accepts self-signed certificates from internal cluster CAs.
    pub fn insecure(base_url: impl Into<String>) -> Result<Self> {
        Self::build(base_url.into(), true)
    }

    fn build(base_url: String, accept_invalid_certs: bool) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!(method = %request.method, url = %url, "Sending Alertmanager request");

        let mut builder = self
            .client
            .request(request.method, &url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(ApiResponse { status, body })
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Transport through the Kubernetes API server's service proxy.
///
/// The kube client carries the cluster TLS and auth settings; requests are
/// sent to `proxy_path` + the Alertmanager path.
#[derive(Clone)]
pub struct KubeProxyTransport {
    client: kube::Client,
    proxy_path: String,
    display_url: String,
}

impl KubeProxyTransport {
    #[must_use]
    pub fn new(client: kube::Client, cluster_url: &str, proxy_path: impl Into<String>) -> Self {
        let proxy_path = proxy_path.into();
        let display_url = format!("{}{proxy_path}", cluster_url.trim_end_matches('/'));
        Self {
            client,
            proxy_path,
            display_url,
        }
    }
}

#[async_trait]
impl HttpTransport for KubeProxyTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let uri = format!("{}{}", self.proxy_path, request.path);
        debug!(method = %request.method, uri = %uri, "Sending Alertmanager request via API proxy");

        let mut builder = http::Request::builder().method(request.method).uri(&uri);
        if let Some(headers) = builder.headers_mut() {
            headers.extend(request.headers);
        }
        let http_request = builder
            .body(kube::client::Body::from(request.body.unwrap_or_default()))
            .map_err(|e| AlertmanagerError::Transport(format!("building request for {uri}: {e}")))?;

        let response = tokio::time::timeout(DEFAULT_HTTP_TIMEOUT, self.client.send(http_request))
            .await
            .map_err(|_| {
                AlertmanagerError::Transport(format!(
                    "timed out after {}s",
                    DEFAULT_HTTP_TIMEOUT.as_secs()
                ))
            })?
            .map_err(|e| AlertmanagerError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .into_body()
            .collect_bytes()
            .await
            .map_err(|e| AlertmanagerError::Transport(format!("reading response: {e}")))?
            .to_vec();

        Ok(ApiResponse { status, body })
    }

    fn base_url(&self) -> &str {
        &self.display_url
    }
}

/// Decorator that adds `Authorization: Bearer <token>` to every request.
pub struct BearerAuth<T> {
    header: HeaderValue,
    inner: T,
}

impl<T: HttpTransport> BearerAuth<T> {
    pub fn new(token: &str, inner: T) -> Result<Self> {
        let mut header = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            AlertmanagerError::Validation("bearer token contains invalid header characters".to_string())
        })?;
        header.set_sensitive(true);
        Ok(Self { header, inner })
    }
}

#[async_trait]
impl<T: HttpTransport> HttpTransport for BearerAuth<T> {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let mut authed = request.clone();
        authed.headers.insert(AUTHORIZATION, self.header.clone());
        self.inner.send(authed).await
    }

    fn base_url(&self) -> &str {
        self.inner.base_url()
    }
}
