//! Cluster connection strategies against a fake Kubernetes API server.

use std::io::Write;

use serde_json::json;
use tempfile::NamedTempFile;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use alertmanager_mcp::config::ConnectionSettings;
use alertmanager_mcp::kubernetes;
use alertmanager_mcp::resolver::{
    Attempt, ClusterProxy, ConnectionStrategy, InClusterService, RouteDiscovery,
};
use alertmanager_mcp::AlertmanagerClient;

const ROUTES_PATH: &str = "/apis/route.openshift.io/v1/routes";
const ROUTE_PATH: &str =
    "/apis/route.openshift.io/v1/namespaces/openshift-monitoring/routes/alertmanager-main";

/// Kubeconfig with a static token pointing at `server`.
fn kubeconfig_for(server: &MockServer) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r"apiVersion: v1
kind: Config
current-context: mock
clusters:
- name: mock
  cluster:
    server: {uri}
contexts:
- name: mock
  context:
    cluster: mock
    user: mock
users:
- name: mock
  user:
    token: test-token
",
        uri = server.uri()
    )
    .unwrap();
    file
}

fn settings(kubeconfig: &NamedTempFile) -> ConnectionSettings {
    ConnectionSettings {
        kubeconfig: Some(kubeconfig.path().to_path_buf()),
        namespace: Some("openshift-monitoring".to_string()),
        ..ConnectionSettings::default()
    }
}

fn not_found_status(name: &str) -> serde_json::Value {
    json!({
        "kind": "Status",
        "apiVersion": "v1",
        "metadata": {},
        "status": "Failure",
        "message": format!("routes.route.openshift.io \"{name}\" not found"),
        "reason": "NotFound",
        "code": 404
    })
}

fn forbidden_status() -> serde_json::Value {
    json!({
        "kind": "Status",
        "apiVersion": "v1",
        "metadata": {},
        "status": "Failure",
        "message": "routes.route.openshift.io is forbidden: cannot list resource \"routes\" at the cluster scope",
        "reason": "Forbidden",
        "code": 403
    })
}

#[tokio::test]
async fn cluster_proxy_sends_through_service_proxy_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(
            "/api/v1/namespaces/openshift-monitoring/services/https:alertmanager-operated:9093/proxy/api/v2/status",
        ))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
        .expect(1)
        .mount(&server)
        .await;

    let kubeconfig = kubeconfig_for(&server);
    let Attempt::Resolved(connection) = ClusterProxy.attempt(&settings(&kubeconfig)).await else {
        panic!("expected the API proxy to resolve");
    };

    assert_eq!(connection.method, "cluster-api-proxy");
    assert_eq!(
        connection.base_url,
        format!(
            "{}/api/v1/namespaces/openshift-monitoring/services/https:alertmanager-operated:9093/proxy",
            server.uri()
        )
    );

    let status = AlertmanagerClient::new(&connection).get_status().await.unwrap();
    assert_eq!(status, "{\n  \"ok\": true\n}");
}

#[tokio::test]
async fn in_cluster_service_targets_service_dns_name() {
    let server = MockServer::start().await;
    let kubeconfig = kubeconfig_for(&server);

    let Attempt::Resolved(connection) = InClusterService.attempt(&settings(&kubeconfig)).await
    else {
        panic!("expected the in-cluster service to resolve");
    };

    assert_eq!(connection.method, "in-cluster-service");
    assert_eq!(
        connection.base_url,
        "https://alertmanager-operated.openshift-monitoring.svc:9093"
    );
}

#[tokio::test]
async fn route_lookup_does_not_need_cluster_wide_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ROUTES_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_json(forbidden_status()))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ROUTE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "apiVersion": "route.openshift.io/v1",
            "kind": "Route",
            "metadata": { "name": "alertmanager-main", "namespace": "openshift-monitoring" },
            "spec": { "host": "am.apps.example.com" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let kubeconfig = kubeconfig_for(&server);
    let Attempt::Resolved(connection) = RouteDiscovery.attempt(&settings(&kubeconfig)).await else {
        panic!("expected the named route to resolve");
    };

    assert_eq!(connection.method, "route-discovery");
    assert_eq!(connection.base_url, "https://am.apps.example.com");
}

#[tokio::test]
async fn missing_route_is_not_applicable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ROUTES_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_json(forbidden_status()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ROUTE_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_json(not_found_status("alertmanager-main")))
        .mount(&server)
        .await;

    let kubeconfig = kubeconfig_for(&server);
    let Attempt::NotApplicable(reason) = RouteDiscovery.attempt(&settings(&kubeconfig)).await else {
        panic!("expected a missing route to be not applicable");
    };
    assert!(reason.contains("openshift-monitoring/alertmanager-main"));
    assert!(reason.contains("not listable"));
}

#[tokio::test]
async fn openshift_detection_follows_route_listing() {
    let server = MockServer::start().await;
    let kubeconfig = kubeconfig_for(&server);
    let config = kubernetes::load_config(Some(kubeconfig.path())).await.unwrap();
    let client = kube::Client::try_from(config).unwrap();

    Mock::given(method("GET"))
        .and(path(ROUTES_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_json(forbidden_status()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    assert!(!kubernetes::is_openshift(&client).await);

    Mock::given(method("GET"))
        .and(path(ROUTES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "apiVersion": "route.openshift.io/v1",
            "kind": "RouteList",
            "metadata": {},
            "items": []
        })))
        .mount(&server)
        .await;
    assert!(kubernetes::is_openshift(&client).await);
}
