// handlers/protected/users.rs - /api/users and /api/users/:userId

use axum::extract::{Path, Query, State};
use serde::Deserialize;

use crate::app::AppState;
use crate::auth::hash_password;
use crate::database::models::{User, UserPatch};
use crate::error::ApiError;
use crate::middleware::{Action, ApiResponse, ApiResult, JsonBody, Message, Principal};
use crate::validation::{parse_id, schemas};

const FAMILY: &str = "Profile";

#[derive(Debug, Deserialize)]
pub struct UserSearch {
    pub username: Option<String>,
}

/// GET /api/users - list profiles, optionally by username prefix
pub async fn list(
    State(state): State<AppState>,
    _principal: Principal,
    Query(search): Query<UserSearch>,
) -> ApiResult<Vec<User>> {
    let prefix = search.username.as_deref().filter(|p| !p.is_empty());
    let users = User::list(&state.pool, prefix).await?;
    Ok(ApiResponse::success(users))
}

/// GET /api/users/:userId - any authenticated user may view a profile
pub async fn get(
    State(state): State<AppState>,
    _principal: Principal,
    Path(raw_user_id): Path<String>,
) -> ApiResult<User> {
    let user_id = parse_id("userId", &raw_user_id)?;
    let user = find_user(&state, user_id).await?;
    Ok(ApiResponse::success(user))
}

/// PATCH /api/users/:userId - update the caller's own profile
///
/// Only supplied, non-empty fields change. A new password is hashed before
/// it is stored.
pub async fn update(
    State(state): State<AppState>,
    principal: Principal,
    Path(raw_user_id): Path<String>,
    body: JsonBody,
) -> ApiResult<User> {
    let user_id = parse_id("userId", &raw_user_id)?;
    principal.ensure_owner(user_id, Action::Update, FAMILY)?;

    let mut patch: UserPatch = body.validated(&schemas::USER_UPDATE)?;
    let mut user = find_user(&state, user_id).await?;

    if let Some(password) = patch.password.take().filter(|p| !p.is_empty()) {
        user.password = hash_password(password).await?;
    }
    patch.apply(&mut user);

    let user = user.save(&state.pool).await?;
    tracing::info!("Updated profile of user {}", user.id);
    Ok(ApiResponse::success(user))
}

/// DELETE /api/users/:userId - remove the caller's account and everything it owns
pub async fn delete(
    State(state): State<AppState>,
    principal: Principal,
    Path(raw_user_id): Path<String>,
) -> ApiResult<Message> {
    let user_id = parse_id("userId", &raw_user_id)?;
    principal.ensure_owner(user_id, Action::Delete, FAMILY)?;

    if !User::delete(&state.pool, user_id).await? {
        return Err(ApiError::not_found(format!("No user: {}", user_id)));
    }
    tracing::info!("Deleted user {}", user_id);
    Ok(ApiResponse::message(format!("Deleted user {}", user_id)))
}

async fn find_user(state: &AppState, user_id: i64) -> Result<User, ApiError> {
    User::find(&state.pool, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No user: {}", user_id)))
}
