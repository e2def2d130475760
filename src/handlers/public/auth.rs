// handlers/public/auth.rs - POST /api/auth/register and POST /api/auth/login

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::auth::{hash_password, issue_token, verify_password, AuthError};
use crate::database::models::{NewUser, User};
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::validation::schemas;

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: String,
}

#[derive(Debug, Deserialize)]
struct Credentials {
    username: String,
    password: String,
}

/// POST /api/auth/register - create an account and sign a token for it
///
/// Expected Input:
/// ```json
/// { "username": "alice", "password": "pw123456", "email": "alice@example.com" }
/// ```
pub async fn register(State(state): State<AppState>, body: JsonBody) -> ApiResult<TokenResponse> {
    let new: NewUser = body.validated(&schemas::REGISTER)?;

    let password_hash = hash_password(new.password.clone()).await?;
    let user = User::create(&state.pool, &new, &password_hash).await?;
    tracing::info!("Registered user {} ({})", user.username, user.id);

    let token = issue_token(&state.config.security, user.id, &user.username)?;
    Ok(ApiResponse::created(TokenResponse { token }))
}

/// POST /api/auth/login - exchange credentials for a token
///
/// Unknown usernames and wrong passwords produce the same 400.
pub async fn login(State(state): State<AppState>, body: JsonBody) -> ApiResult<LoginResponse> {
    let credentials: Credentials = body.validated(&schemas::LOGIN)?;

    let user = User::find_by_username(&state.pool, &credentials.username)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;
    verify_password(credentials.password, user.password.clone()).await?;

    let token = issue_token(&state.config.security, user.id, &user.username)?;
    tracing::info!("User {} logged in", user.username);

    Ok(ApiResponse::success(LoginResponse {
        message: "Successfully logged in!",
        token,
    }))
}
