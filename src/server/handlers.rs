use super::error::ApiError;
use crate::app::App;
use crate::models::{AnalyzeResponse, HealthResponse};
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;

/// Multipart field carrying the uploaded image.
pub const IMAGE_FIELD: &str = "image";

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// `POST /api/analyze-shoe`
///
/// The configuration check runs before the request body is inspected, so an
/// unconfigured service answers every call with the same 500.
pub async fn analyze_shoe(
    State(app): State<App>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    app.ensure_configured()?;

    let upload = read_image_field(multipart?).await?;
    let result = app.analyze(upload).await?;

    Ok(Json(AnalyzeResponse::success(result)))
}

/// Reads the full `image` field into memory. Other fields are ignored.
async fn read_image_field(mut multipart: Multipart) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(IMAGE_FIELD) {
            let bytes = field.bytes().await?;
            tracing::debug!(
                "Received '{}' upload of {} bytes",
                IMAGE_FIELD,
                bytes.len()
            );
            return Ok(bytes.to_vec());
        }
    }

    Err(ApiError::missing_field(IMAGE_FIELD))
}
