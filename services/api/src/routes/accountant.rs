//! Financial ledgers, gated to the accountant role.
//!
//! Totals are always computed server-side from the validated quantity and
//! rate; any total sent by the client is ignored.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::require_role;
use crate::models::ledger::{ExpenditureInput, PaymentInput};
use crate::models::{AuthUser, Role};
use crate::state::AppState;

const SLNO_TAKEN: &str = "SL No. already exists";

pub async fn list_expenditures(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::Accountant)?;

    let expenditures = state.expenditure_repository.list().await?;
    Ok(Json(expenditures))
}

pub async fn create_expenditure(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ExpenditureInput>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::Accountant)?;
    payload.validate().map_err(ApiError::Validation)?;

    let expenditure = state
        .expenditure_repository
        .create(&payload, payload.total(), user.id)
        .await
        .map_err(|e| ApiError::conflict_or_db(e, SLNO_TAKEN))?;

    info!(id = %expenditure.id, slno = %expenditure.slno, "expenditure recorded");
    Ok((StatusCode::CREATED, Json(expenditure)))
}

pub async fn update_expenditure(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ExpenditureInput>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::Accountant)?;
    payload.validate().map_err(ApiError::Validation)?;

    let expenditure = state
        .expenditure_repository
        .update(id, &payload, payload.total())
        .await
        .map_err(|e| ApiError::conflict_or_db(e, SLNO_TAKEN))?
        .ok_or_else(|| ApiError::NotFound("Record not found".to_string()))?;

    Ok(Json(expenditure))
}

pub async fn delete_expenditure(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::Accountant)?;

    if !state.expenditure_repository.delete(id).await? {
        return Err(ApiError::NotFound("Record not found".to_string()));
    }

    Ok(Json(json!({"message": "Record deleted"})))
}

pub async fn list_payments(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::Accountant)?;

    let payments = state.payment_repository.list().await?;
    Ok(Json(payments))
}

pub async fn create_payment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<PaymentInput>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::Accountant)?;
    let kind = payload.validate().map_err(ApiError::Validation)?;

    let payment = state
        .payment_repository
        .create(kind, &payload, user.id)
        .await?;

    info!(id = %payment.id, kind = kind.as_str(), "payment recorded");
    Ok((StatusCode::CREATED, Json(payment)))
}

pub async fn update_payment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PaymentInput>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::Accountant)?;
    let kind = payload.validate().map_err(ApiError::Validation)?;

    let payment = state
        .payment_repository
        .update(id, kind, &payload)
        .await?
        .ok_or_else(|| ApiError::NotFound("Record not found".to_string()))?;

    Ok(Json(payment))
}

pub async fn delete_payment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::Accountant)?;

    if !state.payment_repository.delete(id).await? {
        return Err(ApiError::NotFound("Record not found".to_string()));
    }

    Ok(Json(json!({"message": "Record deleted"})))
}
