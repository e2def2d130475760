// handlers/protected/user_reads.rs - /api/users/:userId/reads (the personal library)

use axum::extract::{Path, State};

use crate::app::AppState;
use crate::database::models::{NewUserRead, UserRead, UserReadPatch};
use crate::error::ApiError;
use crate::middleware::{Action, ApiResponse, ApiResult, JsonBody, Message, Principal};
use crate::validation::{parse_id, schemas};

const FAMILY: &str = "Reads";

/// GET /api/users/:userId/reads
pub async fn list(
    State(state): State<AppState>,
    principal: Principal,
    Path(raw_user_id): Path<String>,
) -> ApiResult<Vec<UserRead>> {
    let user_id = parse_id("userId", &raw_user_id)?;
    principal.ensure_owner(user_id, Action::View, FAMILY)?;

    let reads = UserRead::list(&state.pool, user_id).await?;
    Ok(ApiResponse::success(reads))
}

/// POST /api/users/:userId/reads - add a catalog read to the library
///
/// Credits the user's book count, page count and experience in the same
/// transaction as the insert.
pub async fn create(
    State(state): State<AppState>,
    principal: Principal,
    Path(raw_user_id): Path<String>,
    body: JsonBody,
) -> ApiResult<UserRead> {
    let user_id = parse_id("userId", &raw_user_id)?;
    principal.ensure_owner(user_id, Action::Create, FAMILY)?;

    let new: NewUserRead = body.validated(&schemas::USER_READ_NEW)?;
    let user_read = UserRead::add(&state.pool, user_id, &new).await?;
    tracing::info!("User {} added read {} to their library", user_id, user_read.read_id);
    Ok(ApiResponse::created(user_read))
}

/// GET /api/users/:userId/reads/:readId
pub async fn get(
    State(state): State<AppState>,
    principal: Principal,
    Path((raw_user_id, raw_read_id)): Path<(String, String)>,
) -> ApiResult<UserRead> {
    let user_id = parse_id("userId", &raw_user_id)?;
    let read_id = parse_id("readId", &raw_read_id)?;
    principal.ensure_owner(user_id, Action::View, FAMILY)?;

    let user_read = find_user_read(&state, user_id, read_id).await?;
    Ok(ApiResponse::success(user_read))
}

/// PATCH /api/users/:userId/reads/:readId - change rating, review or review date
pub async fn update(
    State(state): State<AppState>,
    principal: Principal,
    Path((raw_user_id, raw_read_id)): Path<(String, String)>,
    body: JsonBody,
) -> ApiResult<UserRead> {
    let user_id = parse_id("userId", &raw_user_id)?;
    let read_id = parse_id("readId", &raw_read_id)?;
    principal.ensure_owner(user_id, Action::Update, FAMILY)?;

    let patch: UserReadPatch = body.validated(&schemas::USER_READ_UPDATE)?;
    let mut user_read = find_user_read(&state, user_id, read_id).await?;
    patch.apply(&mut user_read);

    let user_read = user_read.save(&state.pool).await?;
    Ok(ApiResponse::success(user_read))
}

/// DELETE /api/users/:userId/reads/:readId - remove from the library and undo
/// the statistics credited when it was added
pub async fn delete(
    State(state): State<AppState>,
    principal: Principal,
    Path((raw_user_id, raw_read_id)): Path<(String, String)>,
) -> ApiResult<Message> {
    let user_id = parse_id("userId", &raw_user_id)?;
    let read_id = parse_id("readId", &raw_read_id)?;
    principal.ensure_owner(user_id, Action::Delete, FAMILY)?;

    if !UserRead::remove(&state.pool, user_id, read_id).await? {
        return Err(not_in_library(read_id));
    }
    tracing::info!("User {} removed read {} from their library", user_id, read_id);
    Ok(ApiResponse::message(format!("Deleted read {}", read_id)))
}

async fn find_user_read(state: &AppState, user_id: i64, read_id: i64) -> Result<UserRead, ApiError> {
    UserRead::find(&state.pool, user_id, read_id)
        .await?
        .ok_or_else(|| not_in_library(read_id))
}

fn not_in_library(read_id: i64) -> ApiError {
    ApiError::not_found(format!("No read in library: {}", read_id))
}
