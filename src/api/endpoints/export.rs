//! `GET /api/export`: results as a CSV download.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::pipeline::export::EXPORT_FILE_NAME;

pub async fn download(State(ctx): State<ApiContext>) -> Result<impl IntoResponse, ApiError> {
    let csv = ctx.dashboard.export_csv()?;
    let disposition = format!("attachment; filename=\"{EXPORT_FILE_NAME}\"");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}
