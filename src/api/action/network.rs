use axum::extract::Extension;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};

use crate::api::server::{timestamped, Facts};
use crate::facts::network;

pub(crate) async fn network(Extension(platform): Extension<Facts>) -> impl IntoResponse {
    let interfaces = network::collect(platform.as_ref());

    Json(timestamped(json!({
        "interfaces": Value::Object(interfaces),
    })))
}
