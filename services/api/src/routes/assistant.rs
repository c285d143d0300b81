//! AI design assistant endpoint.

use axum::{Json, extract::State, response::IntoResponse};

use crate::assistant::DesignBrief;
use crate::error::ApiError;
use crate::state::AppState;

/// Turn a design brief into a suggestion from the chat backend.
pub async fn design_suggestion(
    State(state): State<AppState>,
    Json(brief): Json<DesignBrief>,
) -> Result<impl IntoResponse, ApiError> {
    brief.validate().map_err(ApiError::Validation)?;

    let suggestion = state.assistant.suggest(&brief).await?;
    Ok(Json(suggestion))
}
