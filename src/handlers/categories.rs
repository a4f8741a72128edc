use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::{Value, json};

use super::JsonBody;
use crate::errors::SiteError;
use crate::types::{AppState, CategoryInput};
use crate::utils::parse_id;

pub async fn list_categories(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "categories": state.categories.list().await }))
}

pub async fn create_category(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CategoryInput>,
) -> Result<impl IntoResponse, SiteError> {
    let category = state.categories.create(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Category created successfully", "category": category })),
    ))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, SiteError> {
    let category = state.categories.get(parse_id(&id, "category")?).await?;
    Ok(Json(json!({ "category": category })))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<CategoryInput>,
) -> Result<Json<Value>, SiteError> {
    let category = state.categories.update(parse_id(&id, "category")?, input).await?;
    Ok(Json(json!({ "message": "Category updated successfully", "category": category })))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, SiteError> {
    state.categories.delete(parse_id(&id, "category")?).await?;
    Ok(Json(json!({ "message": "Category deleted successfully" })))
}
