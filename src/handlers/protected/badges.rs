// handlers/protected/badges.rs - badge catalog and earned badges

use axum::extract::{Path, State};
use serde::Deserialize;

use crate::app::AppState;
use crate::database::models::{Badge, EarnedBadge, User};
use crate::error::ApiError;
use crate::middleware::{Action, ApiResponse, ApiResult, JsonBody, Message, Principal};
use crate::validation::{parse_id, schemas};

const FAMILY: &str = "Badges";

#[derive(Debug, Deserialize)]
struct BadgeAward {
    badge_id: i64,
}

/// GET /api/badges
pub async fn list(State(state): State<AppState>, _principal: Principal) -> ApiResult<Vec<Badge>> {
    let badges = Badge::list(&state.pool).await?;
    Ok(ApiResponse::success(badges))
}

/// GET /api/badges/:badgeId
pub async fn get(
    State(state): State<AppState>,
    _principal: Principal,
    Path(raw_badge_id): Path<String>,
) -> ApiResult<Badge> {
    let badge_id = parse_id("badgeId", &raw_badge_id)?;
    let badge = find_badge(&state, badge_id).await?;
    Ok(ApiResponse::success(badge))
}

/// GET /api/users/:userId/badges - badges the caller has earned
pub async fn earned(
    State(state): State<AppState>,
    principal: Principal,
    Path(raw_user_id): Path<String>,
) -> ApiResult<Vec<EarnedBadge>> {
    let user_id = parse_id("userId", &raw_user_id)?;
    principal.ensure_owner(user_id, Action::View, FAMILY)?;

    if !User::exists(&state.pool, user_id).await? {
        return Err(ApiError::not_found(format!("No user: {}", user_id)));
    }

    let badges = Badge::earned(&state.pool, user_id).await?;
    Ok(ApiResponse::success(badges))
}

/// POST /api/users/:userId/badges - record an earned badge
pub async fn award(
    State(state): State<AppState>,
    principal: Principal,
    Path(raw_user_id): Path<String>,
    body: JsonBody,
) -> ApiResult<EarnedBadge> {
    let user_id = parse_id("userId", &raw_user_id)?;
    principal.ensure_owner(user_id, Action::Create, FAMILY)?;

    let award: BadgeAward = body.validated(&schemas::BADGE_AWARD)?;
    let badge = find_badge(&state, award.badge_id).await?;

    let earned = Badge::award(&state.pool, user_id, badge.id).await?;
    tracing::info!("User {} earned badge {}", user_id, badge.name);
    Ok(ApiResponse::created(earned))
}

/// DELETE /api/users/:userId/badges/:badgeId
pub async fn revoke(
    State(state): State<AppState>,
    principal: Principal,
    Path((raw_user_id, raw_badge_id)): Path<(String, String)>,
) -> ApiResult<Message> {
    let user_id = parse_id("userId", &raw_user_id)?;
    let badge_id = parse_id("badgeId", &raw_badge_id)?;
    principal.ensure_owner(user_id, Action::Delete, FAMILY)?;

    if !Badge::revoke(&state.pool, user_id, badge_id).await? {
        return Err(ApiError::not_found(format!("Badge {} not earned", badge_id)));
    }
    Ok(ApiResponse::message(format!("Deleted badge {}", badge_id)))
}

async fn find_badge(state: &AppState, badge_id: i64) -> Result<Badge, ApiError> {
    Badge::find(&state.pool, badge_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No badge: {}", badge_id)))
}
