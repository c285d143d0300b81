//! Bridge to the external chat/LLM backend behind the AI design assistant.
//!
//! The backend is an opaque collaborator reached over HTTP; this module only
//! turns a structured design brief into a prompt, forwards it, and relays
//! the assistant's text back.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::error::ApiError;

const DEFAULT_BACKEND_URL: &str = "http://localhost:8000/api/chat";
const DEFAULT_MODEL: &str = "llama3.1";

/// A structured design brief from the public site.
#[derive(Debug, Deserialize)]
pub struct DesignBrief {
    pub room_type: String,
    pub style: String,
    pub palette: Option<String>,
    pub budget: Option<String>,
    pub notes: Option<String>,
}

impl DesignBrief {
    pub fn validate(&self) -> Result<(), String> {
        if self.room_type.trim().is_empty() || self.style.trim().is_empty() {
            return Err("Room type and style are required".to_string());
        }
        Ok(())
    }

    /// Render the brief as the free-text prompt the chat backend expects.
    pub fn to_prompt(&self) -> String {
        let mut prompt = format!(
            "Suggest an interior design concept for a {} in a {} style.",
            self.room_type.trim(),
            self.style.trim()
        );
        if let Some(palette) = self.palette.as_deref().filter(|p| !p.trim().is_empty()) {
            prompt.push_str(&format!(" Preferred colour palette: {}.", palette.trim()));
        }
        if let Some(budget) = self.budget.as_deref().filter(|b| !b.trim().is_empty()) {
            prompt.push_str(&format!(" Budget: {}.", budget.trim()));
        }
        if let Some(notes) = self.notes.as_deref().filter(|n| !n.trim().is_empty()) {
            prompt.push_str(&format!(" Additional notes: {}.", notes.trim()));
        }
        prompt
    }
}

#[derive(Debug, Serialize)]
pub struct DesignSuggestion {
    pub suggestion: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    content: String,
}

/// HTTP client for the chat backend.
#[derive(Clone)]
pub struct AssistantClient {
    http: reqwest::Client,
    backend_url: String,
    model: String,
}

impl AssistantClient {
    pub fn new(backend_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            backend_url: backend_url.into(),
            model: model.into(),
        }
    }

    /// `CHAT_BACKEND_URL` and `CHAT_MODEL`, with local-dev defaults.
    pub fn from_env() -> Self {
        let backend_url =
            std::env::var("CHAT_BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());
        let model = std::env::var("CHAT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self::new(backend_url, model)
    }

    /// Forward the brief and relay the assistant's reply. Backend failures
    /// surface as a generic 500; the caller cannot fix them by retrying the
    /// form.
    pub async fn suggest(&self, brief: &DesignBrief) -> Result<DesignSuggestion, ApiError> {
        let payload = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": brief.to_prompt()}],
            "stream": false,
        });

        let response = self
            .http
            .post(&self.backend_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!("chat backend unreachable: {}", e);
                ApiError::Internal
            })?;

        if !response.status().is_success() {
            error!(status = %response.status(), "chat backend returned an error");
            return Err(ApiError::Internal);
        }

        let body: ChatResponse = response.json().await.map_err(|e| {
            error!("chat backend returned an unexpected body: {}", e);
            ApiError::Internal
        })?;

        Ok(DesignSuggestion {
            suggestion: body.content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brief() -> DesignBrief {
        DesignBrief {
            room_type: "living room".to_string(),
            style: "minimalist".to_string(),
            palette: Some("warm neutrals".to_string()),
            budget: None,
            notes: Some("north-facing windows".to_string()),
        }
    }

    #[test]
    fn prompt_includes_only_provided_fields() {
        let prompt = brief().to_prompt();
        assert!(prompt.contains("living room"));
        assert!(prompt.contains("minimalist"));
        assert!(prompt.contains("warm neutrals"));
        assert!(prompt.contains("north-facing windows"));
        assert!(!prompt.contains("Budget"));
    }

    #[test]
    fn empty_room_type_is_rejected() {
        let mut b = brief();
        b.room_type = "  ".to_string();
        assert!(b.validate().is_err());
    }
}
