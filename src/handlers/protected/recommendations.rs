// handlers/protected/recommendations.rs - /api/users/:userId/recommendations
//
// A recommendation belongs to both its sender and its receiver. Either may
// list, view or delete it; only the sender may edit the content.

use axum::extract::{Path, State};

use crate::app::AppState;
use crate::database::models::{NewRecommendation, Read, Recommendation, RecommendationPatch, User};
use crate::error::ApiError;
use crate::middleware::{Action, ApiResponse, ApiResult, JsonBody, Message, Principal};
use crate::validation::{parse_id, schemas};

const FAMILY: &str = "Recommendations";

/// GET /api/users/:userId/recommendations - sent and received, newest first
pub async fn list(
    State(state): State<AppState>,
    principal: Principal,
    Path(raw_user_id): Path<String>,
) -> ApiResult<Vec<Recommendation>> {
    let user_id = parse_id("userId", &raw_user_id)?;
    principal.ensure_owner(user_id, Action::View, FAMILY)?;

    let recommendations = Recommendation::list_for_user(&state.pool, user_id).await?;
    Ok(ApiResponse::success(recommendations))
}

/// POST /api/users/:userId/recommendations - recommend a read to another user
pub async fn create(
    State(state): State<AppState>,
    principal: Principal,
    Path(raw_user_id): Path<String>,
    body: JsonBody,
) -> ApiResult<Recommendation> {
    let user_id = parse_id("userId", &raw_user_id)?;
    principal.ensure_owner(user_id, Action::Create, FAMILY)?;

    let new: NewRecommendation = body.validated(&schemas::RECOMMENDATION_NEW)?;
    if new.receiver_id == user_id {
        return Err(ApiError::bad_request("Cannot recommend a read to yourself"));
    }
    if !User::exists(&state.pool, new.receiver_id).await? {
        return Err(ApiError::not_found(format!("No user: {}", new.receiver_id)));
    }
    if !Read::exists(&state.pool, new.read_id).await? {
        return Err(ApiError::not_found(format!("No read: {}", new.read_id)));
    }

    let recommendation = Recommendation::create(&state.pool, user_id, &new).await?;
    tracing::info!(
        "User {} recommended read {} to user {}",
        user_id,
        new.read_id,
        new.receiver_id
    );
    Ok(ApiResponse::created(recommendation))
}

/// GET /api/users/:userId/recommendations/:recommendationId
pub async fn get(
    State(state): State<AppState>,
    principal: Principal,
    Path((raw_user_id, raw_recommendation_id)): Path<(String, String)>,
) -> ApiResult<Recommendation> {
    let user_id = parse_id("userId", &raw_user_id)?;
    let recommendation_id = parse_id("recommendationId", &raw_recommendation_id)?;
    principal.ensure_owner(user_id, Action::View, FAMILY)?;

    let recommendation = find_recommendation(&state, user_id, recommendation_id).await?;
    Ok(ApiResponse::success(recommendation))
}

/// PATCH /api/users/:userId/recommendations/:recommendationId - sender only
pub async fn update(
    State(state): State<AppState>,
    principal: Principal,
    Path((raw_user_id, raw_recommendation_id)): Path<(String, String)>,
    body: JsonBody,
) -> ApiResult<Recommendation> {
    let user_id = parse_id("userId", &raw_user_id)?;
    let recommendation_id = parse_id("recommendationId", &raw_recommendation_id)?;
    principal.ensure_owner(user_id, Action::Update, FAMILY)?;

    let patch: RecommendationPatch = body.validated(&schemas::RECOMMENDATION_UPDATE)?;
    let mut recommendation = find_recommendation(&state, user_id, recommendation_id).await?;
    principal.ensure_owner(recommendation.sender_id, Action::Update, FAMILY)?;
    patch.apply(&mut recommendation);

    let recommendation = recommendation.save(&state.pool).await?;
    Ok(ApiResponse::success(recommendation))
}

/// DELETE /api/users/:userId/recommendations/:recommendationId - either party
pub async fn delete(
    State(state): State<AppState>,
    principal: Principal,
    Path((raw_user_id, raw_recommendation_id)): Path<(String, String)>,
) -> ApiResult<Message> {
    let user_id = parse_id("userId", &raw_user_id)?;
    let recommendation_id = parse_id("recommendationId", &raw_recommendation_id)?;
    principal.ensure_owner(user_id, Action::Delete, FAMILY)?;

    if !Recommendation::delete(&state.pool, user_id, recommendation_id).await? {
        return Err(no_recommendation(recommendation_id));
    }
    Ok(ApiResponse::message(format!(
        "Deleted recommendation {}",
        recommendation_id
    )))
}

async fn find_recommendation(state: &AppState, user_id: i64, recommendation_id: i64) -> Result<Recommendation, ApiError> {
    Recommendation::find_for_party(&state.pool, user_id, recommendation_id)
        .await?
        .ok_or_else(|| no_recommendation(recommendation_id))
}

fn no_recommendation(recommendation_id: i64) -> ApiError {
    ApiError::not_found(format!("No recommendation: {}", recommendation_id))
}
