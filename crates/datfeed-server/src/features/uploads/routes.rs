use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use crate::api::AppState;
use crate::error::{AppError, AppResult};

use super::commands::IngestFileCommand;

/// Multipart field that carries the file
pub const FILE_FIELD: &str = "file";

pub fn uploads_routes() -> Router<AppState> {
    Router::new().route("/", post(upload_file))
}

#[tracing::instrument(skip(state, multipart))]
async fn upload_file(State(state): State<AppState>, mut multipart: Multipart) -> AppResult<Response> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await?;
        upload = Some((filename, data.to_vec()));
    }

    let Some((filename, content)) = upload else {
        return Err(AppError::validation(format!(
            "No '{}' field found in multipart data",
            FILE_FIELD
        )));
    };

    let command = IngestFileCommand { filename, content };
    let response = super::commands::ingest_file::handle(&state.coordinator, command)?;

    Ok((StatusCode::OK, Json(response)).into_response())
}
