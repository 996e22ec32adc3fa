use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use axum_typed_multipart::{FieldData, TryFromMultipart, TypedMultipart};
use serde::Serialize;

use crate::{
    server::{
        app::AppState,
        auth::AuthenticatedUser,
        error::{ApiError, ApiResponse},
    },
    services::{questions::{CHOICES_FOLDER, QUESTIONS_FOLDER}, QuestionService},
    storage::StorageClient,
};

use super::uploaded_file;

#[derive(TryFromMultipart)]
struct UploadForm {
    folder: String,
    #[form_data(limit = "10MiB")]
    file: Option<FieldData<Bytes>>,
}

#[derive(Serialize)]
struct UploadedUrl {
    url: String,
}

/// Image upload open to every authenticated user, whatever their role.
async fn upload<S: StorageClient + 'static>(
    AuthenticatedUser(user): AuthenticatedUser,
    State(service): State<QuestionService<S>>,
    TypedMultipart(form): TypedMultipart<UploadForm>,
) -> ApiResponse<(StatusCode, Json<UploadedUrl>)> {
    if ![QUESTIONS_FOLDER, CHOICES_FOLDER].contains(&form.folder.as_str()) {
        return Err(ApiError::BadRequest(format!(
            "Unknown folder {}, expected '{QUESTIONS_FOLDER}' or '{CHOICES_FOLDER}'",
            form.folder
        )));
    }
    let file = uploaded_file(form.file)
        .ok_or_else(|| ApiError::BadRequest("A non-empty file is required".to_owned()))?;

    let url = service
        .upload_file(&file, &form.folder)
        .await
        .map_err(ApiError::Upload)?;
    tracing::info!(user_id = user.id, %url, "File uploaded");
    Ok((StatusCode::CREATED, Json(UploadedUrl { url })))
}

pub fn uploads_router<S: StorageClient + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/uploads", post(upload::<S>))
        .with_state(state)
}
