// handlers/protected/reads.rs - the shared read catalog
//
// Reads are catalog entries shared by every user. They can be created but
// not edited or removed.

use axum::extract::{Path, Query, State};
use serde::Deserialize;

use crate::app::AppState;
use crate::database::models::{NewRead, Read, Review};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, JsonBody, Principal};
use crate::validation::{parse_id, schemas};

#[derive(Debug, Deserialize)]
pub struct ReadSearch {
    pub title: Option<String>,
}

/// GET /api/reads - list the catalog, optionally filtered by title substring
pub async fn list(
    State(state): State<AppState>,
    _principal: Principal,
    Query(search): Query<ReadSearch>,
) -> ApiResult<Vec<Read>> {
    let title = search.title.as_deref().filter(|t| !t.is_empty());
    let reads = Read::list(&state.pool, title).await?;
    Ok(ApiResponse::success(reads))
}

/// POST /api/reads - add a read and its authors to the catalog
pub async fn create(State(state): State<AppState>, principal: Principal, body: JsonBody) -> ApiResult<Read> {
    let new: NewRead = body.validated(&schemas::READ_NEW)?;

    let read = Read::create(&state.pool, &new).await?;
    tracing::info!("User {} added read {} ({})", principal.id, read.id, read.isbn);
    Ok(ApiResponse::created(read))
}

/// GET /api/reads/:readId
pub async fn get(
    State(state): State<AppState>,
    _principal: Principal,
    Path(raw_read_id): Path<String>,
) -> ApiResult<Read> {
    let read_id = parse_id("readId", &raw_read_id)?;
    let read = Read::find(&state.pool, read_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No read: {}", read_id)))?;
    Ok(ApiResponse::success(read))
}

/// GET /api/reads/:readId/reviews - ratings and reviews left by all users
pub async fn reviews(
    State(state): State<AppState>,
    _principal: Principal,
    Path(raw_read_id): Path<String>,
) -> ApiResult<Vec<Review>> {
    let read_id = parse_id("readId", &raw_read_id)?;
    if !Read::exists(&state.pool, read_id).await? {
        return Err(ApiError::not_found(format!("No read: {}", read_id)));
    }
    let reviews = Read::reviews(&state.pool, read_id).await?;
    Ok(ApiResponse::success(reviews))
}
