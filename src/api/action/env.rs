use axum::extract::Extension;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};

use crate::api::server::{timestamped, Facts};
use crate::facts::environment;

/// Variables live under "environment" so the timestamp never mixes with
/// allow-listed names.
pub(crate) async fn env(Extension(platform): Extension<Facts>) -> impl IntoResponse {
    let variables = environment::collect(platform.as_ref());

    Json(timestamped(json!({
        "environment": Value::Object(variables),
    })))
}
