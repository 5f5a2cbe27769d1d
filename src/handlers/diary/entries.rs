use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    data::models::{DiaryEntry, DiaryEntryRequest, DiaryError, MessageResponse},
    data::repositories::ensure_content,
    features::auth::CurrentUser,
    state::AppState,
    utils::JsonBody,
};

pub async fn create_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    JsonBody(payload): JsonBody<DiaryEntryRequest>,
) -> Result<Json<DiaryEntry>, DiaryError> {
    ensure_content(&payload.content)?;

    let translated = state.translator.translate(&payload.content).await;
    let entry = state
        .store
        .create_entry(&user.id, &payload.content, &translated)?;

    log::info!("User {} created diary entry {}", user.id, entry.id);
    Ok(Json(entry))
}

pub async fn list_entries(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<DiaryEntry>>, DiaryError> {
    Ok(Json(state.store.list_entries(&user.id)?))
}

pub async fn get_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(entry_id): Path<String>,
) -> Result<Json<DiaryEntry>, DiaryError> {
    Ok(Json(state.store.get_entry(&user.id, &entry_id)?))
}

pub async fn update_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(entry_id): Path<String>,
    JsonBody(payload): JsonBody<DiaryEntryRequest>,
) -> Result<Json<DiaryEntry>, DiaryError> {
    ensure_content(&payload.content)?;
    // Ownership first, so foreign ids never reach the translator.
    state.store.get_entry(&user.id, &entry_id)?;

    let translated = state.translator.translate(&payload.content).await;
    let entry = state
        .store
        .update_entry(&user.id, &entry_id, &payload.content, &translated)?;

    log::info!("User {} updated diary entry {}", user.id, entry.id);
    Ok(Json(entry))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(entry_id): Path<String>,
) -> Result<Json<MessageResponse>, DiaryError> {
    state.store.delete_entry(&user.id, &entry_id)?;

    log::info!("User {} deleted diary entry {}", user.id, entry_id);
    Ok(Json(MessageResponse::new("Diary entry deleted successfully")))
}
