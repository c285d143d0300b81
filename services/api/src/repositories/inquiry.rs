//! Quotation requests and contact messages from the public site.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::inquiry::{ContactMessage, ContactRequest, Quotation, QuotationRequest};

fn map_quotation(row: &PgRow) -> Quotation {
    Quotation {
        id: row.get("id"),
        full_name: row.get("full_name"),
        email: row.get("email"),
        phone: row.get("phone"),
        project_type: row.get("project_type"),
        estimated_budget: row.get("estimated_budget"),
        project_details: row.get("project_details"),
        created_at: row.get("created_at"),
    }
}

#[derive(Clone)]
pub struct QuotationRepository {
    pool: PgPool,
}

impl QuotationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: &QuotationRequest) -> Result<Quotation, sqlx::Error> {
        let row = sqlx::query(
            r#"
            INSERT INTO quotations
                (full_name, email, phone, project_type, estimated_budget, project_details,
                 created_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            RETURNING *
            "#,
        )
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(&request.project_type)
        .bind(&request.budget)
        .bind(&request.message)
        .fetch_one(&self.pool)
        .await?;

        Ok(map_quotation(&row))
    }

    pub async fn list(&self) -> Result<Vec<Quotation>, sqlx::Error> {
        let rows = sqlx::query("SELECT * FROM quotations ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(map_quotation).collect())
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM quotations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn map_contact(row: &PgRow) -> ContactMessage {
    ContactMessage {
        id: row.get("id"),
        full_name: row.get("full_name"),
        email: row.get("email"),
        phone: row.get("phone"),
        subject: row.get("subject"),
        message: row.get("message"),
        created_at: row.get("created_at"),
    }
}

#[derive(Clone)]
pub struct ContactRepository {
    pool: PgPool,
}

impl ContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: &ContactRequest) -> Result<ContactMessage, sqlx::Error> {
        let row = sqlx::query(
            r#"
            INSERT INTO contact_messages (full_name, email, phone, subject, message, created_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            RETURNING *
            "#,
        )
        .bind(&request.full_name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(&request.subject)
        .bind(&request.message)
        .fetch_one(&self.pool)
        .await?;

        Ok(map_contact(&row))
    }

    pub async fn list(&self) -> Result<Vec<ContactMessage>, sqlx::Error> {
        let rows = sqlx::query("SELECT * FROM contact_messages ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(map_contact).collect())
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contact_messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
