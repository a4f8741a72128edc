use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::{Value, json};
use uuid::Uuid;

use super::JsonBody;
use crate::errors::SiteError;
use crate::types::{AppState, NewService, ServicePatch};
use crate::utils::parse_id;

pub async fn list_services(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "services": state.services.list().await }))
}

pub async fn create_service(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<NewService>,
) -> Result<impl IntoResponse, SiteError> {
    let service = state.services.create(input.validate()?).await?;
    Ok((StatusCode::CREATED, Json(json!({ "service": service }))))
}

pub async fn get_service(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Value>, SiteError> {
    let service = state.services.by_slug(&slug).await?;
    Ok(Json(json!({ "service": service })))
}

pub async fn update_service(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    JsonBody(patch): JsonBody<ServicePatch>,
) -> Result<Json<Value>, SiteError> {
    let id = state.services.by_slug(&slug).await?.id;
    apply_patch(&state, id, patch).await
}

pub async fn delete_service(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Value>, SiteError> {
    let id = state.services.by_slug(&slug).await?.id;
    state.services.delete(id).await?;
    Ok(Json(json!({ "message": "Service deleted successfully" })))
}

pub async fn get_service_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, SiteError> {
    let service = state.services.by_id(parse_id(&id, "service")?).await?;
    Ok(Json(json!({ "service": service })))
}

pub async fn update_service_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<ServicePatch>,
) -> Result<Json<Value>, SiteError> {
    apply_patch(&state, parse_id(&id, "service")?, patch).await
}

pub async fn delete_service_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, SiteError> {
    let removed = state.services.delete(parse_id(&id, "service")?).await?;
    Ok(Json(json!({ "message": "Service deleted successfully", "serviceId": removed.id })))
}

async fn apply_patch(state: &AppState, id: Uuid, patch: ServicePatch) -> Result<Json<Value>, SiteError> {
    let mut patch = patch.validate()?;
    let slug = patch.slug.take();
    let service = state.services.update(id, slug, move |s| patch.apply(s)).await?;
    Ok(Json(json!({ "service": service })))
}
