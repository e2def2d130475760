// handlers/protected/collections.rs - /api/users/:userId/collections and their reads

use axum::extract::{Path, State};
use serde::Deserialize;

use crate::app::AppState;
use crate::database::models::{Collection, CollectionPatch, NewCollection, Read};
use crate::error::ApiError;
use crate::middleware::{Action, ApiResponse, ApiResult, JsonBody, Message, Principal};
use crate::validation::{parse_id, schemas};

const FAMILY: &str = "Collections";

#[derive(Debug, Deserialize)]
struct CollectionReadNew {
    read_id: i64,
}

/// GET /api/users/:userId/collections
pub async fn list(
    State(state): State<AppState>,
    principal: Principal,
    Path(raw_user_id): Path<String>,
) -> ApiResult<Vec<Collection>> {
    let user_id = parse_id("userId", &raw_user_id)?;
    principal.ensure_owner(user_id, Action::View, FAMILY)?;

    let collections = Collection::list(&state.pool, user_id).await?;
    Ok(ApiResponse::success(collections))
}

/// POST /api/users/:userId/collections
pub async fn create(
    State(state): State<AppState>,
    principal: Principal,
    Path(raw_user_id): Path<String>,
    body: JsonBody,
) -> ApiResult<Collection> {
    let user_id = parse_id("userId", &raw_user_id)?;
    principal.ensure_owner(user_id, Action::Create, FAMILY)?;

    let new: NewCollection = body.validated(&schemas::COLLECTION_NEW)?;
    let collection = Collection::create(&state.pool, user_id, &new).await?;
    tracing::info!("User {} created collection {}", user_id, collection.id);
    Ok(ApiResponse::created(collection))
}

/// GET /api/users/:userId/collections/:collectionId
pub async fn get(
    State(state): State<AppState>,
    principal: Principal,
    Path((raw_user_id, raw_collection_id)): Path<(String, String)>,
) -> ApiResult<Collection> {
    let user_id = parse_id("userId", &raw_user_id)?;
    let collection_id = parse_id("collectionId", &raw_collection_id)?;
    principal.ensure_owner(user_id, Action::View, FAMILY)?;

    let collection = find_collection(&state, user_id, collection_id).await?;
    Ok(ApiResponse::success(collection))
}

/// PATCH /api/users/:userId/collections/:collectionId
pub async fn update(
    State(state): State<AppState>,
    principal: Principal,
    Path((raw_user_id, raw_collection_id)): Path<(String, String)>,
    body: JsonBody,
) -> ApiResult<Collection> {
    let user_id = parse_id("userId", &raw_user_id)?;
    let collection_id = parse_id("collectionId", &raw_collection_id)?;
    principal.ensure_owner(user_id, Action::Update, FAMILY)?;

    let patch: CollectionPatch = body.validated(&schemas::COLLECTION_UPDATE)?;
    let mut collection = find_collection(&state, user_id, collection_id).await?;
    patch.apply(&mut collection);

    let collection = collection.save(&state.pool).await?;
    Ok(ApiResponse::success(collection))
}

/// DELETE /api/users/:userId/collections/:collectionId
pub async fn delete(
    State(state): State<AppState>,
    principal: Principal,
    Path((raw_user_id, raw_collection_id)): Path<(String, String)>,
) -> ApiResult<Message> {
    let user_id = parse_id("userId", &raw_user_id)?;
    let collection_id = parse_id("collectionId", &raw_collection_id)?;
    principal.ensure_owner(user_id, Action::Delete, FAMILY)?;

    if !Collection::delete(&state.pool, user_id, collection_id).await? {
        return Err(no_collection(collection_id));
    }
    tracing::info!("User {} deleted collection {}", user_id, collection_id);
    Ok(ApiResponse::message(format!("Deleted collection {}", collection_id)))
}

/// GET /api/users/:userId/collections/:collectionId/reads
pub async fn reads(
    State(state): State<AppState>,
    principal: Principal,
    Path((raw_user_id, raw_collection_id)): Path<(String, String)>,
) -> ApiResult<Vec<Read>> {
    let user_id = parse_id("userId", &raw_user_id)?;
    let collection_id = parse_id("collectionId", &raw_collection_id)?;
    principal.ensure_owner(user_id, Action::View, FAMILY)?;

    let collection = find_collection(&state, user_id, collection_id).await?;
    let reads = Collection::reads(&state.pool, collection.id).await?;
    Ok(ApiResponse::success(reads))
}

/// POST /api/users/:userId/collections/:collectionId/reads - link a catalog read
pub async fn add_read(
    State(state): State<AppState>,
    principal: Principal,
    Path((raw_user_id, raw_collection_id)): Path<(String, String)>,
    body: JsonBody,
) -> ApiResult<Read> {
    let user_id = parse_id("userId", &raw_user_id)?;
    let collection_id = parse_id("collectionId", &raw_collection_id)?;
    principal.ensure_owner(user_id, Action::Update, FAMILY)?;

    let new: CollectionReadNew = body.validated(&schemas::COLLECTION_READ_NEW)?;
    let collection = find_collection(&state, user_id, collection_id).await?;
    let read = Read::find(&state.pool, new.read_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No read: {}", new.read_id)))?;

    Collection::add_read(&state.pool, collection.id, read.id).await?;
    Ok(ApiResponse::created(read))
}

/// DELETE /api/users/:userId/collections/:collectionId/reads/:readId
pub async fn remove_read(
    State(state): State<AppState>,
    principal: Principal,
    Path((raw_user_id, raw_collection_id, raw_read_id)): Path<(String, String, String)>,
) -> ApiResult<Message> {
    let user_id = parse_id("userId", &raw_user_id)?;
    let collection_id = parse_id("collectionId", &raw_collection_id)?;
    let read_id = parse_id("readId", &raw_read_id)?;
    principal.ensure_owner(user_id, Action::Update, FAMILY)?;

    let collection = find_collection(&state, user_id, collection_id).await?;
    if !Collection::remove_read(&state.pool, collection.id, read_id).await? {
        return Err(ApiError::not_found(format!(
            "No read {} in collection {}",
            read_id, collection_id
        )));
    }
    Ok(ApiResponse::message(format!(
        "Deleted read {} from collection {}",
        read_id, collection_id
    )))
}

async fn find_collection(state: &AppState, user_id: i64, collection_id: i64) -> Result<Collection, ApiError> {
    Collection::find(&state.pool, user_id, collection_id)
        .await?
        .ok_or_else(|| no_collection(collection_id))
}

fn no_collection(collection_id: i64) -> ApiError {
    ApiError::not_found(format!("No collection: {}", collection_id))
}
