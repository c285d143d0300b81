//! Support tickets for signed-in clients.
//!
//! Every query is scoped to the requester's username, so a foreign ticket
//! id behaves exactly like a missing one.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::AuthUser;
use crate::models::ticket::{
    CreateTicketRequest, EditTicketRequest, TicketStatus, TicketStatusRequest,
};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct TicketFilter {
    pub service_name: Option<String>,
}

pub async fn list_tickets(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(filter): Query<TicketFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let tickets = state
        .ticket_repository
        .list_for(&user.username, filter.service_name.as_deref())
        .await?;

    Ok(Json(tickets))
}

pub async fn create_ticket(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateTicketRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.service_name.trim().is_empty() || payload.problem_description.trim().is_empty() {
        return Err(ApiError::Validation(
            "Service name and problem description are required".to_string(),
        ));
    }

    let ticket = state
        .ticket_repository
        .create(
            &user.username,
            payload.service_name.trim(),
            payload.problem_description.trim(),
        )
        .await?;

    info!(id = %ticket.id, username = %user.username, "ticket opened");
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// Owner-side resolution: an open ticket may be marked solved or closed,
/// and a resolved one never moves again.
pub async fn update_ticket_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TicketStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let next = TicketStatus::parse(&payload.status)
        .filter(|s| *s != TicketStatus::Open)
        .ok_or_else(|| ApiError::Validation("Invalid status".to_string()))?;

    let ticket = state
        .ticket_repository
        .find_owned(id, &user.username)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ticket not found".to_string()))?;

    if !ticket.status.can_transition_to(next) {
        return Err(ApiError::Conflict(
            "Ticket has already been resolved".to_string(),
        ));
    }

    let updated = state
        .ticket_repository
        .set_status(id, next)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ticket not found".to_string()))?;

    info!(id = %id, status = next.as_str(), username = %user.username, "ticket resolved by requester");
    Ok(Json(updated))
}

/// Rewrite the problem description of an open ticket.
pub async fn edit_ticket(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EditTicketRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.problem_description.trim().is_empty() {
        return Err(ApiError::Validation(
            "Problem description is required".to_string(),
        ));
    }

    let ticket = state
        .ticket_repository
        .find_owned(id, &user.username)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ticket not found".to_string()))?;

    if !ticket.status.is_open() {
        return Err(ApiError::Conflict(
            "Ticket has already been resolved".to_string(),
        ));
    }

    let updated = state
        .ticket_repository
        .set_description(id, payload.problem_description.trim())
        .await?
        .ok_or_else(|| ApiError::NotFound("Ticket not found".to_string()))?;

    Ok(Json(updated))
}
