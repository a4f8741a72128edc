use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::{Value, json};

use super::JsonBody;
use crate::errors::SiteError;
use crate::types::{AppState, ContactPatch, NewContact};
use crate::utils::parse_id;

pub async fn list_contacts(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "contacts": state.contacts.list().await }))
}

/// Public contact form
pub async fn submit_contact(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<NewContact>,
) -> Result<impl IntoResponse, SiteError> {
    let contact = state.contacts.submit(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Your message has been received", "contact": contact })),
    ))
}

pub async fn get_contact(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>, SiteError> {
    let contact = state.contacts.get(parse_id(&id, "contact")?).await?;
    Ok(Json(json!({ "contact": contact })))
}

pub async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<ContactPatch>,
) -> Result<Json<Value>, SiteError> {
    let contact = state.contacts.update(parse_id(&id, "contact")?, patch).await?;
    Ok(Json(json!({ "contact": contact })))
}

pub async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, SiteError> {
    state.contacts.delete(parse_id(&id, "contact")?).await?;
    Ok(Json(json!({ "message": "Contact deleted successfully" })))
}
