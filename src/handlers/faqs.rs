use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::{Value, json};

use super::JsonBody;
use crate::errors::SiteError;
use crate::services::{FaqFilter, MoveOutcome};
use crate::types::{AppState, Direction, FaqPatch, NewFaq, ReorderRequest};
use crate::utils::parse_id;

pub async fn list_faqs(State(state): State<AppState>, Query(filter): Query<FaqFilter>) -> Json<Value> {
    let faqs = state.faqs.list(&filter).await;
    log::debug!("Found {} FAQs", faqs.len());
    Json(json!({ "faqs": faqs }))
}

pub async fn create_faq(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<NewFaq>,
) -> Result<impl IntoResponse, SiteError> {
    let faq = state.faqs.create(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "FAQ created successfully", "faq": faq })),
    ))
}

pub async fn get_faq(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>, SiteError> {
    let faq = state.faqs.get(parse_id(&id, "FAQ")?).await?;
    Ok(Json(json!({ "faq": faq })))
}

pub async fn update_faq(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<FaqPatch>,
) -> Result<Json<Value>, SiteError> {
    let faq = state.faqs.update(parse_id(&id, "FAQ")?, patch).await?;
    Ok(Json(json!({ "message": "FAQ updated successfully", "faq": faq })))
}

pub async fn delete_faq(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>, SiteError> {
    state.faqs.delete(parse_id(&id, "FAQ")?).await?;
    Ok(Json(json!({ "message": "FAQ deleted successfully" })))
}

/// Move one FAQ up or down; a boundary hit is informational, not an error
pub async fn reorder_faq(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<ReorderRequest>,
) -> Result<Json<Value>, SiteError> {
    let (direction, outcome) = state.faqs.reorder(request).await?;
    let body = match outcome {
        MoveOutcome::Moved { from, to } => json!({
            "message": format!("FAQ moved {} successfully", direction),
            "from": from,
            "to": to,
        }),
        MoveOutcome::AtBoundary(Direction::Up) => json!({ "message": "FAQ is already at the top position" }),
        MoveOutcome::AtBoundary(Direction::Down) => json!({ "message": "FAQ is already at the bottom position" }),
    };
    Ok(Json(body))
}
