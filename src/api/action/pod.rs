use axum::extract::Extension;
use axum::response::IntoResponse;
use axum::Json;

use crate::api::server::{timestamped, AppError, Facts};
use crate::facts::orchestration;

pub(crate) async fn pod(
    Extension(platform): Extension<Facts>,
) -> Result<impl IntoResponse, AppError> {
    let info = orchestration::pod_info(platform.as_ref());

    Ok(Json(timestamped(serde_json::to_value(&info)?)))
}
