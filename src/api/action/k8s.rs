use axum::extract::Extension;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::Value;

use crate::api::server::{timestamped, Facts};
use crate::facts::orchestration;

/// Whole-environment scan. Matched names are all uppercase-with-
/// underscore, so the injected timestamp cannot collide with one.
pub(crate) async fn k8s(Extension(platform): Extension<Facts>) -> impl IntoResponse {
    let variables = orchestration::kubernetes_info(platform.as_ref());

    Json(timestamped(Value::Object(variables)))
}
