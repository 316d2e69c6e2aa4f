//! Kubernetes credential and discovery helpers.
//!
//! This module provides functionality to:
//! - Load cluster credentials (explicit kubeconfig, in-cluster identity, default search)
//! - Extract the bearer token those credentials carry
//! - Build service proxy paths and internal service URLs
//! - Look up OpenShift routes and detect whether the cluster serves them

use std::path::Path;

use kube::api::{Api, DynamicObject, ListParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::discovery::ApiResource;
use kube::{Client, Config};
use secrecy::ExposeSecret;
use tracing::debug;

use crate::errors::{AlertmanagerError, Result};

/// Namespace file mounted into every pod with a service account.
pub const SERVICE_ACCOUNT_NAMESPACE_FILE: &str =
    "/var/run/secrets/kubernetes.io/serviceaccount/namespace";

/// OpenShift Route API resource definition.
fn route_api_resource() -> ApiResource {
    ApiResource {
        group: "route.openshift.io".to_string(),
        version: "v1".to_string(),
        api_version: "route.openshift.io/v1".to_string(),
        kind: "Route".to_string(),
        plural: "routes".to_string(),
    }
}

/// Load cluster credentials.
///
/// Order: explicit kubeconfig path, in-cluster service account, default
/// kubeconfig search (`KUBECONFIG`, then `~/.kube/config`).
///
/// # Errors
///
/// Returns [`AlertmanagerError::KubeConfig`] when no source yields a config.
pub async fn load_config(kubeconfig: Option<&Path>) -> Result<Config> {
    if let Some(path) = kubeconfig {
        let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
            AlertmanagerError::KubeConfig(format!("reading {}: {e}", path.display()))
        })?;
        return Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
            .await
            .map_err(|e| AlertmanagerError::KubeConfig(format!("{}: {e}", path.display())));
    }

    match Config::incluster() {
        Ok(config) => {
            debug!("Loaded in-cluster Kubernetes config");
            return Ok(config);
        }
        Err(e) => debug!(error = %e, "In-cluster config unavailable"),
    }

    Config::from_kubeconfig(&KubeConfigOptions::default())
        .await
        .map_err(|e| AlertmanagerError::KubeConfig(e.to_string()))
}

/// Bearer token carried by the credentials: inline token first, then the token file.
///
/// Returns `Ok(None)` when neither yields a non-empty token.
///
/// # Errors
///
/// Returns an error if the token file is configured but unreadable.
pub async fn bearer_token(config: &Config) -> Result<Option<String>> {
    if let Some(token) = &config.auth_info.token {
        let token = token.expose_secret().trim();
        if !token.is_empty() {
            return Ok(Some(token.to_string()));
        }
    }

    if let Some(path) = &config.auth_info.token_file {
        let data = tokio::fs::read_to_string(path).await?;
        let token = data.trim();
        if !token.is_empty() {
            return Ok(Some(token.to_string()));
        }
    }

    Ok(None)
}

/// Namespace to use: explicit value, then the in-cluster namespace file, then `default_ns`.
#[must_use]
pub fn detect_namespace(explicit: Option<&str>, default_ns: &str) -> String {
    detect_namespace_from(explicit, Path::new(SERVICE_ACCOUNT_NAMESPACE_FILE), default_ns)
}

fn detect_namespace_from(explicit: Option<&str>, namespace_file: &Path, default_ns: &str) -> String {
    if let Some(ns) = explicit.map(str::trim).filter(|ns| !ns.is_empty()) {
        return ns.to_string();
    }

    if let Ok(data) = std::fs::read_to_string(namespace_file) {
        let ns = data.trim();
        if !ns.is_empty() {
            return ns.to_string();
        }
    }

    default_ns.to_string()
}

/// API server proxy sub-resource path for a service.
///
/// The scheme segment is required for services that terminate TLS themselves.
#[must_use]
pub fn proxy_path(namespace: &str, scheme: &str, service: &str, port: u16) -> String {
    format!("/api/v1/namespaces/{namespace}/services/{scheme}:{service}:{port}/proxy")
}

/// Direct HTTPS URL of a service through cluster DNS.
#[must_use]
pub fn service_url(service: &str, namespace: &str, port: u16) -> String {
    format!("https://{service}.{namespace}.svc:{port}")
}

/// Host of a named route, or `None` when the route type or object is absent.
///
/// # Errors
///
/// Returns an error for API failures other than "not found" (e.g. forbidden).
pub async fn route_host(client: &Client, namespace: &str, name: &str) -> Result<Option<String>> {
    let routes: Api<DynamicObject> =
        Api::namespaced_with(client.clone(), namespace, &route_api_resource());

    let route = routes.get_opt(name).await?;
    Ok(route.as_ref().and_then(extract_route_host))
}

fn extract_route_host(route: &DynamicObject) -> Option<String> {
    route
        .data
        .get("spec")
        .and_then(|spec| spec.get("host"))
        .and_then(|host| host.as_str())
        .map(str::trim)
        .filter(|host| !host.is_empty())
        .map(String::from)
}

/// Whether the cluster serves `route.openshift.io/v1` routes at all.
pub async fn is_openshift(client: &Client) -> bool {
    let routes: Api<DynamicObject> = Api::all_with(client.clone(), &route_api_resource());
    match routes.list(&ListParams::default().limit(1)).await {
        Ok(_) => true,
        Err(e) => {
            debug!(error = %e, "Route API not listable");
            false
        }
    }
}
