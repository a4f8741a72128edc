use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::{Value, json};

use super::JsonBody;
use crate::errors::SiteError;
use crate::types::{AppState, NewUser, UserPatch};
use crate::utils::parse_id;

pub async fn list_users(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "users": state.users.list().await }))
}

pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<NewUser>,
) -> Result<impl IntoResponse, SiteError> {
    let user = state.users.create(input).await?;
    Ok((StatusCode::CREATED, Json(json!({ "user": user }))))
}

pub async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>, SiteError> {
    let user = state.users.get(parse_id(&id, "user")?).await?;
    Ok(Json(json!({ "user": user })))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<UserPatch>,
) -> Result<Json<Value>, SiteError> {
    let user = state.users.update(parse_id(&id, "user")?, patch).await?;
    Ok(Json(json!({ "user": user })))
}

pub async fn delete_user(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>, SiteError> {
    state.users.delete(parse_id(&id, "user")?).await?;
    Ok(Json(json!({ "message": "User deleted successfully" })))
}
