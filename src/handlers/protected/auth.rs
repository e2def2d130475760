use axum::extract::State;

use crate::app::AppState;
use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Principal};

/// GET /api/auth/whoami - profile of the token's holder
pub async fn whoami(State(state): State<AppState>, principal: Principal) -> ApiResult<User> {
    let user = User::find(&state.pool, principal.id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No user: {}", principal.id)))?;
    Ok(ApiResponse::success(user))
}
