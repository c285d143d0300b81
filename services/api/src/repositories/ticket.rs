//! Support tickets.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, QueryBuilder, Row};
use uuid::Uuid;

use crate::models::ticket::{Ticket, TicketStatus};

fn map_ticket(row: &PgRow) -> Ticket {
    Ticket {
        id: row.get("id"),
        username: row.get("username"),
        service_name: row.get("service_name"),
        problem_description: row.get("problem_description"),
        status: TicketStatus::from_db(row.get("status")),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[derive(Clone)]
pub struct TicketRepository {
    pool: PgPool,
}

impl TicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        username: &str,
        service_name: &str,
        problem_description: &str,
    ) -> Result<Ticket, sqlx::Error> {
        let row = sqlx::query(
            r#"
            INSERT INTO tickets (username, service_name, problem_description, status,
                                 created_at, updated_at)
            VALUES ($1, $2, $3, 'open', NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(service_name)
        .bind(problem_description)
        .fetch_one(&self.pool)
        .await?;

        Ok(map_ticket(&row))
    }

    /// The requester's own tickets, newest first, optionally one service.
    pub async fn list_for(
        &self,
        username: &str,
        service_name: Option<&str>,
    ) -> Result<Vec<Ticket>, sqlx::Error> {
        let mut builder = QueryBuilder::new("SELECT * FROM tickets WHERE username = ");
        builder.push_bind(username);
        if let Some(service_name) = service_name {
            builder.push(" AND service_name = ").push_bind(service_name);
        }
        builder.push(" ORDER BY created_at DESC");

        let rows = builder.build().fetch_all(&self.pool).await?;
        Ok(rows.iter().map(map_ticket).collect())
    }

    pub async fn list_all(&self) -> Result<Vec<Ticket>, sqlx::Error> {
        let rows = sqlx::query("SELECT * FROM tickets ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(map_ticket).collect())
    }

    /// A ticket only if it belongs to the given username. Callers return
    /// 404 on None so foreign ticket ids stay indistinguishable from
    /// missing ones.
    pub async fn find_owned(
        &self,
        id: Uuid,
        username: &str,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM tickets WHERE id = $1 AND username = $2")
            .bind(id)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(map_ticket))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Ticket>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM tickets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(map_ticket))
    }

    pub async fn set_status(
        &self,
        id: Uuid,
        status: TicketStatus,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let row = sqlx::query(
            "UPDATE tickets SET status = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
        )
        .bind(status.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_ticket))
    }

    pub async fn set_description(
        &self,
        id: Uuid,
        problem_description: &str,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            UPDATE tickets SET problem_description = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(problem_description)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_ticket))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tickets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
