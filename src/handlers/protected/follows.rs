// handlers/protected/follows.rs - followers, following, follow and unfollow
//
// The social graph is visible to any authenticated user; only the follower
// may add or remove their own edges.

use axum::extract::{Path, State};
use serde::Deserialize;

use crate::app::AppState;
use crate::database::models::{Follow, User};
use crate::error::ApiError;
use crate::middleware::{Action, ApiResponse, ApiResult, JsonBody, Message, Principal};
use crate::validation::{parse_id, schemas};

const FAMILY: &str = "Follows";

#[derive(Debug, Deserialize)]
struct FollowNew {
    followed_id: i64,
}

/// GET /api/users/:userId/followers
pub async fn followers(
    State(state): State<AppState>,
    _principal: Principal,
    Path(raw_user_id): Path<String>,
) -> ApiResult<Vec<User>> {
    let user_id = parse_id("userId", &raw_user_id)?;
    ensure_user(&state, user_id).await?;

    let users = Follow::followers(&state.pool, user_id).await?;
    Ok(ApiResponse::success(users))
}

/// GET /api/users/:userId/following
pub async fn following(
    State(state): State<AppState>,
    _principal: Principal,
    Path(raw_user_id): Path<String>,
) -> ApiResult<Vec<User>> {
    let user_id = parse_id("userId", &raw_user_id)?;
    ensure_user(&state, user_id).await?;

    let users = Follow::following(&state.pool, user_id).await?;
    Ok(ApiResponse::success(users))
}

/// POST /api/users/:userId/following - follow another user
pub async fn create(
    State(state): State<AppState>,
    principal: Principal,
    Path(raw_user_id): Path<String>,
    body: JsonBody,
) -> ApiResult<Follow> {
    let user_id = parse_id("userId", &raw_user_id)?;
    principal.ensure_owner(user_id, Action::Create, FAMILY)?;

    let new: FollowNew = body.validated(&schemas::FOLLOW_NEW)?;
    if new.followed_id == user_id {
        return Err(ApiError::bad_request("Cannot follow yourself"));
    }
    ensure_user(&state, new.followed_id).await?;

    let follow = Follow::create(&state.pool, user_id, new.followed_id).await?;
    tracing::info!("User {} followed user {}", user_id, new.followed_id);
    Ok(ApiResponse::created(follow))
}

/// DELETE /api/users/:userId/following/:followedId - unfollow
pub async fn delete(
    State(state): State<AppState>,
    principal: Principal,
    Path((raw_user_id, raw_followed_id)): Path<(String, String)>,
) -> ApiResult<Message> {
    let user_id = parse_id("userId", &raw_user_id)?;
    let followed_id = parse_id("followedId", &raw_followed_id)?;
    principal.ensure_owner(user_id, Action::Delete, FAMILY)?;

    if !Follow::delete(&state.pool, user_id, followed_id).await? {
        return Err(ApiError::not_found(format!("Not following user {}", followed_id)));
    }
    Ok(ApiResponse::message(format!("Unfollowed user {}", followed_id)))
}

async fn ensure_user(state: &AppState, user_id: i64) -> Result<(), ApiError> {
    if User::exists(&state.pool, user_id).await? {
        Ok(())
    } else {
        Err(ApiError::not_found(format!("No user: {}", user_id)))
    }
}
