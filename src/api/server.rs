use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::api::action::env::env;
use crate::api::action::health::health;
use crate::api::action::k8s::k8s;
use crate::api::action::network::network;
use crate::api::action::pod::pod;
use crate::api::action::process::process;
use crate::api::action::root::root;
use crate::api::action::system::system;
use crate::config::Config;
use crate::facts::provider::PlatformFacts;

pub(crate) type Facts = Arc<dyn PlatformFacts>;

/// The full route table, echoed in 404 bodies.
pub(crate) const ROUTES: [&str; 8] = [
    "/", "/system", "/env", "/process", "/network", "/health", "/pod", "/k8s",
];

/// Boundary error for anything that goes wrong inside a handler. The
/// response carries a generic message plus the failure text, the full
/// detail only goes to the log.
#[derive(Debug)]
pub(crate) struct AppError {
    detail: String,
}

impl<E> From<E> for AppError
where
    E: std::error::Error,
{
    fn from(err: E) -> Self {
        AppError {
            detail: err.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Request handler failed: {}", self.detail);

        let body = Json(json!({
            "error": "Internal server error",
            "detail": self.detail,
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

/// Stamps a JSON object body with the handler-invocation time.
pub(crate) fn timestamped(mut body: Value) -> Value {
    if let Value::Object(map) = &mut body {
        map.insert(
            "timestamp".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
    }

    body
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Route not found",
            "availableRoutes": ROUTES,
        })),
    )
}

pub(crate) fn app(platform: Facts) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/system", get(system))
        .route("/env", get(env))
        .route("/process", get(process))
        .route("/network", get(network))
        .route("/health", get(health))
        .route("/pod", get(pod))
        .route("/k8s", get(k8s))
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(Extension(platform))
                .into_inner(),
        )
}

pub(crate) async fn start(platform: Facts, configuration: Config) {
    info!("Starting server on {}", configuration.get_api_url());

    let app = app(platform);
    let addr = SocketAddr::from(([0, 0, 0, 0], configuration.port));

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("Unable to bind {}: {}", addr, err);
            std::process::exit(1);
        }
    };

    let serve = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal());

    if let Err(err) = serve.await {
        error!("Server error: {}", err);
        std::process::exit(1);
    }

    info!("Shutdown complete");
}

/// Resolves on Ctrl+C or, on unix, SIGTERM. In-flight requests finish
/// before the serve future completes.
async fn shutdown_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_err() {
            warn!("Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, draining in-flight requests");
        }
        _ = terminate => {
            info!("Received SIGTERM, draining in-flight requests");
        }
    }
}
