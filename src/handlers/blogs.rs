use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::{Value, json};

use super::JsonBody;
use crate::errors::SiteError;
use crate::services::BlogFilter;
use crate::types::{AppState, BlogPatch, NewBlog};

pub async fn list_blogs(State(state): State<AppState>, Query(filter): Query<BlogFilter>) -> Json<Value> {
    Json(json!({ "blogs": state.blogs.list(&filter).await }))
}

pub async fn create_blog(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<NewBlog>,
) -> Result<impl IntoResponse, SiteError> {
    let blog = state.blogs.create(input.validate()?).await?;
    Ok((StatusCode::CREATED, Json(json!({ "blog": blog }))))
}

/// One post plus its markdown body rendered to HTML
pub async fn get_blog(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Json<Value>, SiteError> {
    let blog = state.blogs.by_slug(&slug).await?;
    let rendered = state.markdown.render(&blog.content);
    Ok(Json(json!({ "blog": blog, "html": rendered.html, "toc": rendered.toc })))
}

pub async fn update_blog(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    JsonBody(patch): JsonBody<BlogPatch>,
) -> Result<Json<Value>, SiteError> {
    let mut patch = patch.validate()?;
    let id = state.blogs.by_slug(&slug).await?.id;
    let new_slug = patch.slug.take();
    let blog = state.blogs.update(id, new_slug, move |b| patch.apply(b)).await?;
    Ok(Json(json!({ "blog": blog })))
}

pub async fn delete_blog(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Json<Value>, SiteError> {
    let id = state.blogs.by_slug(&slug).await?.id;
    state.blogs.delete(id).await?;
    Ok(Json(json!({ "message": "Blog deleted successfully" })))
}
