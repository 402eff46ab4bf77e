use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Extension};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use http::{HeaderMap, Method, Uri};
use serde_json::{json, Map, Value};

use crate::api::server::Facts;
use crate::facts::{environment, network, orchestration, process, system};

/// Full aggregate plus request reflection. The only handler that echoes
/// request data back to the caller.
pub(crate) async fn root(
    Extension(platform): Extension<Facts>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    connect_info: Option<ConnectInfo<SocketAddr>>,
) -> impl IntoResponse {
    let platform = platform.as_ref();

    Json(json!({
        "timestamp": Utc::now().to_rfc3339(),
        "message": "Bienvenido al servidor de diagnóstico de entorno",
        "pod": orchestration::pod_info(platform),
        "system": system::collect(platform),
        "environment": environment::collect(platform),
        "process": process::collect(platform),
        "network": network::collect(platform),
        "request": {
            "method": method.as_str(),
            "path": uri.path(),
            "headers": header_map(&headers),
            "clientIp": client_ip(&headers, connect_info),
            "userAgent": header_value(&headers, "user-agent"),
        },
    }))
}

fn header_map(headers: &HeaderMap) -> Map<String, Value> {
    let mut map = Map::new();

    for (name, value) in headers {
        map.insert(
            name.as_str().to_string(),
            Value::String(String::from_utf8_lossy(value.as_bytes()).into_owned()),
        );
    }

    map
}

fn header_value(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
        .unwrap_or_default()
}

/// First X-Forwarded-For entry wins, the peer address is the fallback.
fn client_ip(headers: &HeaderMap, connect_info: Option<ConnectInfo<SocketAddr>>) -> String {
    let forwarded = header_value(headers, "x-forwarded-for");

    if let Some(first) = forwarded.split(',').next().map(str::trim) {
        if !first.is_empty() {
            return first.to_string();
        }
    }

    match connect_info {
        Some(ConnectInfo(peer)) => peer.ip().to_string(),
        None => "unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use axum_test::TestServer;
    use http::{HeaderName, HeaderValue, StatusCode};

    use crate::api::server::tests::new_test_app;

    #[tokio::test]
    async fn aggregates_every_section() {
        let server = TestServer::new(new_test_app()).unwrap();

        let response = server.get(&"/").await;

        assert_eq!(response.status_code(), StatusCode::OK);

        let body = response.json::<serde_json::Value>();
        assert!(body["message"].is_string());
        assert_eq!(body["system"]["hostname"], "test-host");
        assert_eq!(body["pod"]["podNamespace"], "staging");
        assert!(body["environment"].is_object());
        assert_eq!(body["process"]["pid"], 4242);
        assert!(body["network"]["lo"].is_array());
        assert_eq!(body["request"]["method"], "GET");
        assert_eq!(body["request"]["path"], "/");
    }

    #[tokio::test]
    async fn reflects_forwarded_client_ip() {
        let server = TestServer::new(new_test_app()).unwrap();

        let response = server
            .get(&"/")
            .add_header(
                "x-forwarded-for".parse::<HeaderName>().unwrap(),
                "203.0.113.9, 10.0.0.1".parse::<HeaderValue>().unwrap(),
            )
            .add_header(
                "user-agent".parse::<HeaderName>().unwrap(),
                "probe/1.0".parse::<HeaderValue>().unwrap(),
            )
            .await;

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["request"]["clientIp"], "203.0.113.9");
        assert_eq!(body["request"]["userAgent"], "probe/1.0");
        assert_eq!(body["request"]["headers"]["user-agent"], "probe/1.0");
    }
}
