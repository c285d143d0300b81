//! Unauthenticated endpoints for the marketing site.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::inquiry::{ContactRequest, QuotationRequest};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ProjectFilter {
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub project_type: Option<String>,
}

#[derive(Deserialize)]
pub struct BlogFilter {
    pub category: Option<String>,
}

pub async fn list_projects(
    State(state): State<AppState>,
    Query(filter): Query<ProjectFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let projects = state
        .project_repository
        .list(filter.status.as_deref(), filter.project_type.as_deref())
        .await?;

    Ok(Json(projects))
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let project = state
        .project_repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(Json(project))
}

/// Published posts only; drafts never leave the admin surface.
pub async fn list_blogs(
    State(state): State<AppState>,
    Query(filter): Query<BlogFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let blogs = state
        .blog_repository
        .list_published(filter.category.as_deref())
        .await?;

    Ok(Json(blogs))
}

pub async fn get_blog(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let blog = state
        .blog_repository
        .find_published_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Blog not found".to_string()))?;

    Ok(Json(blog))
}

pub async fn list_interior_designs(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let designs = state.gallery_repository.list().await?;
    Ok(Json(designs))
}

/// Site settings for the public chrome. `null` until an admin has saved
/// the first revision.
pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let settings = state.settings_repository.get().await?;
    Ok(Json(settings))
}

pub async fn submit_contact(
    State(state): State<AppState>,
    Json(payload): Json<ContactRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate().map_err(ApiError::Validation)?;

    let message = state.contact_repository.create(&payload).await?;
    info!(id = %message.id, "contact message received");

    Ok((
        StatusCode::CREATED,
        Json(json!({"message": "Message received"})),
    ))
}

pub async fn submit_quote(
    State(state): State<AppState>,
    Json(payload): Json<QuotationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate().map_err(ApiError::Validation)?;

    let quotation = state.quotation_repository.create(&payload).await?;
    info!(id = %quotation.id, "quotation request received");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": quotation.id,
            "created_at": quotation.created_at,
        })),
    ))
}
