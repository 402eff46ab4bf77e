use axum::extract::Extension;
use axum::response::IntoResponse;
use axum::Json;

use crate::api::server::{timestamped, AppError, Facts};
use crate::facts::process;

pub(crate) async fn process(
    Extension(platform): Extension<Facts>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = process::collect(platform.as_ref());

    Ok(Json(timestamped(serde_json::to_value(&snapshot)?)))
}
