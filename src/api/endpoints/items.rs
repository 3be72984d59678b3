//! Data endpoints: verification items, training labels, novels and stats.

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, UploadResponse};
use crate::pipeline::import::UploadedBook;
use crate::pipeline::stats::StatsOverview;
use crate::pipeline::types::{Novel, VerificationItem};

/// `GET /api/items`
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<VerificationItem>>, ApiError> {
    Ok(Json(ctx.dashboard.items()?))
}

/// `POST /api/items/upload`: CSV body, replaces the item list.
pub async fn upload(
    State(ctx): State<ApiContext>,
    body: String,
) -> Result<Json<UploadResponse>, ApiError> {
    let count = ctx.dashboard.upload_items_csv(&body)?;
    Ok(Json(UploadResponse { count }))
}

/// `POST /api/train/upload`: CSV body, replaces the training labels.
pub async fn upload_train(
    State(ctx): State<ApiContext>,
    body: String,
) -> Result<Json<UploadResponse>, ApiError> {
    let count = ctx.dashboard.upload_train_csv(&body)?;
    Ok(Json(UploadResponse { count }))
}

/// `GET /api/novels`
pub async fn novels(State(ctx): State<ApiContext>) -> Result<Json<Vec<Novel>>, ApiError> {
    Ok(Json(ctx.dashboard.novels()?))
}

/// `POST /api/novels`: `[{file_name, size_bytes}]`, appended to the catalog.
pub async fn add_novels(
    State(ctx): State<ApiContext>,
    Json(books): Json<Vec<UploadedBook>>,
) -> Result<Json<Vec<Novel>>, ApiError> {
    if books.is_empty() {
        return Err(ApiError::BadRequest("No books in upload".into()));
    }
    Ok(Json(ctx.dashboard.add_novels(&books)?))
}

/// `GET /api/stats`
pub async fn stats(State(ctx): State<ApiContext>) -> Result<Json<StatsOverview>, ApiError> {
    Ok(Json(ctx.dashboard.stats()?))
}
