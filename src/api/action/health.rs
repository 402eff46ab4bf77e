use axum::extract::Extension;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde_json::json;

use crate::api::server::Facts;

pub(crate) async fn health(Extension(platform): Extension<Facts>) -> impl IntoResponse {
    let process = platform.process();

    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "uptime": process.uptime_secs,
        "memoryUsage": {
            "rss": process.rss_bytes,
            "virtual": process.virtual_bytes,
        },
        "hostname": platform.hostname(),
    }))
}
