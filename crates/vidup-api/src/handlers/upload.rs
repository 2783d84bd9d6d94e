//! Video upload and transcode handler.

use axum::body::Body;
use axum::extract::{Multipart, State};
use axum::http::header;
use axum::response::Response;
use chrono::Utc;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

use vidup_media::remove_quietly;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Accept a video upload, run it through the enhancement pipeline, and
/// return the re-encoded artifact.
///
/// The uploaded input and the produced output are this job's private temp
/// resources: the orchestrator removes the input on every path, and the
/// output is removed here once its bytes have been read for delivery.
pub async fn upload(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> ApiResult<Response> {
    let input = save_video_field(&state, &mut multipart).await?;

    let artifact = state.jobs.run_job(&user.email, &input, Utc::now()).await?;

    // Read the artifact for delivery, then reclaim it. A read failure
    // still releases the file.
    let bytes = tokio::fs::read(&artifact.output).await;
    remove_quietly(&artifact.output).await;
    let bytes = bytes.map_err(|e| ApiError::internal(format!("Failed to read artifact: {}", e)))?;

    Response::builder()
        .header(header::CONTENT_TYPE, "video/mp4")
        .header(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"enhanced.mp4\"",
        )
        .body(Body::from(bytes))
        .map_err(|e| ApiError::internal(format!("Failed to build response: {}", e)))
}

/// Stream the multipart `video` field into a private file under the work
/// dir.
async fn save_video_field(
    state: &AppState,
    multipart: &mut Multipart,
) -> ApiResult<std::path::PathBuf> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some("video") {
            continue;
        }

        let path = state
            .config
            .work_dir
            .join(format!("input_{}", Uuid::new_v4()));
        let mut file = tokio::fs::File::create(&path)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to create upload file: {}", e)))?;

        loop {
            let chunk = match field.chunk().await {
                Ok(Some(chunk)) => chunk,
                Ok(None) => break,
                Err(e) => {
                    // Half-written upload: reclaim before reporting.
                    drop(file);
                    remove_quietly(&path).await;
                    return Err(ApiError::bad_request(format!("Upload interrupted: {}", e)));
                }
            };
            if let Err(e) = file.write_all(&chunk).await {
                drop(file);
                remove_quietly(&path).await;
                return Err(ApiError::internal(format!("Failed to write upload: {}", e)));
            }
        }

        file.flush()
            .await
            .map_err(|e| ApiError::internal(format!("Failed to flush upload: {}", e)))?;
        debug!(path = %path.display(), "Stored upload");
        return Ok(path);
    }

    Err(ApiError::bad_request("Missing 'video' field"))
}
