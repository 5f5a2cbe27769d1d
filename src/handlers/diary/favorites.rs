use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    data::models::{DiaryError, FavoriteExpression, NewFavorite},
    features::auth::CurrentUser,
    state::AppState,
    utils::JsonBody,
};

pub async fn add_favorite(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(entry_id): Path<String>,
    JsonBody(payload): JsonBody<NewFavorite>,
) -> Result<Json<FavoriteExpression>, DiaryError> {
    let expression = state.store.add_favorite(&user.id, &entry_id, payload)?;
    Ok(Json(expression))
}

pub async fn list_favorites(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<FavoriteExpression>>, DiaryError> {
    Ok(Json(state.store.list_favorites(&user.id)?))
}
