// handlers/protected/journals.rs - /api/users/:userId/journals

use axum::extract::{Path, State};

use crate::app::AppState;
use crate::database::models::{Journal, JournalPatch, NewJournal};
use crate::error::ApiError;
use crate::middleware::{Action, ApiResponse, ApiResult, JsonBody, Message, Principal};
use crate::validation::{parse_id, schemas};

const FAMILY: &str = "Journals";

/// GET /api/users/:userId/journals - newest first
pub async fn list(
    State(state): State<AppState>,
    principal: Principal,
    Path(raw_user_id): Path<String>,
) -> ApiResult<Vec<Journal>> {
    let user_id = parse_id("userId", &raw_user_id)?;
    principal.ensure_owner(user_id, Action::View, FAMILY)?;

    let journals = Journal::list(&state.pool, user_id).await?;
    Ok(ApiResponse::success(journals))
}

/// POST /api/users/:userId/journals
pub async fn create(
    State(state): State<AppState>,
    principal: Principal,
    Path(raw_user_id): Path<String>,
    body: JsonBody,
) -> ApiResult<Journal> {
    let user_id = parse_id("userId", &raw_user_id)?;
    principal.ensure_owner(user_id, Action::Create, FAMILY)?;

    let new: NewJournal = body.validated(&schemas::JOURNAL_NEW)?;
    let journal = Journal::create(&state.pool, user_id, &new).await?;
    Ok(ApiResponse::created(journal))
}

/// GET /api/users/:userId/journals/:journalId
pub async fn get(
    State(state): State<AppState>,
    principal: Principal,
    Path((raw_user_id, raw_journal_id)): Path<(String, String)>,
) -> ApiResult<Journal> {
    let user_id = parse_id("userId", &raw_user_id)?;
    let journal_id = parse_id("journalId", &raw_journal_id)?;
    principal.ensure_owner(user_id, Action::View, FAMILY)?;

    let journal = find_journal(&state, user_id, journal_id).await?;
    Ok(ApiResponse::success(journal))
}

/// PATCH /api/users/:userId/journals/:journalId
pub async fn update(
    State(state): State<AppState>,
    principal: Principal,
    Path((raw_user_id, raw_journal_id)): Path<(String, String)>,
    body: JsonBody,
) -> ApiResult<Journal> {
    let user_id = parse_id("userId", &raw_user_id)?;
    let journal_id = parse_id("journalId", &raw_journal_id)?;
    principal.ensure_owner(user_id, Action::Update, FAMILY)?;

    let patch: JournalPatch = body.validated(&schemas::JOURNAL_UPDATE)?;
    let mut journal = find_journal(&state, user_id, journal_id).await?;
    patch.apply(&mut journal);

    let journal = journal.save(&state.pool).await?;
    Ok(ApiResponse::success(journal))
}

/// DELETE /api/users/:userId/journals/:journalId
pub async fn delete(
    State(state): State<AppState>,
    principal: Principal,
    Path((raw_user_id, raw_journal_id)): Path<(String, String)>,
) -> ApiResult<Message> {
    let user_id = parse_id("userId", &raw_user_id)?;
    let journal_id = parse_id("journalId", &raw_journal_id)?;
    principal.ensure_owner(user_id, Action::Delete, FAMILY)?;

    if !Journal::delete(&state.pool, user_id, journal_id).await? {
        return Err(no_journal(journal_id));
    }
    Ok(ApiResponse::message(format!("Deleted journal {}", journal_id)))
}

async fn find_journal(state: &AppState, user_id: i64, journal_id: i64) -> Result<Journal, ApiError> {
    Journal::find(&state.pool, user_id, journal_id)
        .await?
        .ok_or_else(|| no_journal(journal_id))
}

fn no_journal(journal_id: i64) -> ApiError {
    ApiError::not_found(format!("No journal: {}", journal_id))
}
