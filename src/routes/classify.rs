use crate::models::{AppState, ProcessEnvelope};
use crate::pipeline;
use crate::types::{AppError, AppResult};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use tracing::info;

pub fn router(state: AppState) -> Router {
    // Leave headroom above the file cap for multipart framing.
    let body_limit = state.config.upload.max_file_size + 1024 * 1024;

    Router::new()
        .route("/classify", post(classify_document))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Accept one uploaded file and run it through the pipeline. The response is
/// the unified envelope; pipeline failures arrive as `{"detail": ...}` with
/// the taxonomy's 4xx/5xx split.
async fn classify_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<ProcessEnvelope>> {
    let mut upload: Option<(String, bytes::Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidRequest(format!("malformed multipart body: {}", e)))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("upload").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidRequest(format!("failed to read upload: {}", e)))?;
            upload = Some((filename, data));
        }
    }

    let (filename, data) =
        upload.ok_or_else(|| AppError::InvalidRequest("missing multipart field 'file'".to_string()))?;

    if data.len() > state.config.upload.max_file_size {
        return Err(AppError::InvalidRequest(format!(
            "file exceeds maximum size of {} bytes",
            state.config.upload.max_file_size
        )));
    }

    info!(filename = %filename, size = data.len(), "Received classify upload");

    let envelope = pipeline::process_document(&state, &filename, &data).await?;
    Ok(Json(envelope))
}
