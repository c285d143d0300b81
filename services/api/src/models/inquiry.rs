//! Public inquiries: quotation requests and contact messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct Quotation {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub project_type: String,
    pub estimated_budget: String,
    pub project_details: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Quote form payload, camelCase from the public site.
#[derive(Debug, Deserialize)]
pub struct QuotationRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(rename = "projectType")]
    pub project_type: String,
    pub budget: String,
    pub message: Option<String>,
}

impl QuotationRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.phone.trim().is_empty()
            || self.project_type.trim().is_empty()
            || self.budget.trim().is_empty()
        {
            return Err("Missing required fields".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactMessage {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
}

impl ContactRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.full_name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.message.trim().is_empty()
        {
            return Err("Missing required fields".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotation_requires_all_but_message() {
        let mut request: QuotationRequest = serde_json::from_str(
            r#"{"name":"A","email":"a@b.com","phone":"123","projectType":"residential","budget":"5-10 Lakhs"}"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());

        request.budget = "  ".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn contact_requires_name_email_message() {
        let request = ContactRequest {
            full_name: "A".to_string(),
            email: "a@b.com".to_string(),
            phone: None,
            subject: None,
            message: String::new(),
        };
        assert!(request.validate().is_err());
    }
}
