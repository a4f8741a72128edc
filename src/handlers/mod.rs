//! HTTP handlers
//!
//! Thin adapters: parse the request, call one service method, wrap the result
//! in the JSON envelope the site's frontend expects.

pub mod blogs;
pub mod categories;
pub mod contacts;
pub mod faqs;
pub mod services;
pub mod users;

use axum::{
    Json, async_trait,
    extract::{FromRequest, Request, State, rejection::JsonRejection},
};
use serde_json::{Value, json};

use crate::errors::SiteError;
use crate::types::AppState;

/// `Json` whose rejection is a `SiteError`, so bad bodies get the usual error envelope
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = SiteError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(SiteError::MalformedPayload(rejection.body_text())),
        }
    }
}

/// Dashboard counters
pub async fn handle_monitor(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "success": true,
        "stats": {
            "services": state.services.count().await,
            "faqs": state.faqs.count().await,
            "categories": state.categories.count().await,
            "blogs": state.blogs.count().await,
            "contacts": state.contacts.count().await,
            "users": state.users.count().await,
        }
    }))
}
