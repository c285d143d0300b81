//! Expenditure and payment ledgers. Accountant-only at the route layer.

use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::ledger::{Expenditure, ExpenditureInput, Payment, PaymentInput, PaymentKind};

fn map_expenditure(row: &PgRow) -> Expenditure {
    Expenditure {
        id: row.get("id"),
        slno: row.get("slno"),
        item_description: row.get("item_description"),
        qty: row.get("qty"),
        unit: row.get("unit"),
        rate: row.get("rate"),
        total: row.get("total"),
        project_name: row.get("project_name"),
        location: row.get("location"),
        date: row.get("date"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

const EXPENDITURE_COLUMNS: &str = "id, slno, item_description, qty, unit, rate, total, \
     project_name, location, date, created_at, updated_at";

#[derive(Clone)]
pub struct ExpenditureRepository {
    pool: PgPool,
}

impl ExpenditureRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Expenditure>, sqlx::Error> {
        let rows = sqlx::query(&format!(
            "SELECT {EXPENDITURE_COLUMNS} FROM expenditures ORDER BY date DESC, created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_expenditure).collect())
    }

    /// Insert a line. `total` is computed by the caller from the validated
    /// input, never taken from the request.
    pub async fn create(
        &self,
        input: &ExpenditureInput,
        total: Decimal,
        created_by: Uuid,
    ) -> Result<Expenditure, sqlx::Error> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO expenditures
                (slno, item_description, qty, unit, rate, total, project_name, location, date, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {EXPENDITURE_COLUMNS}
            "#
        ))
        .bind(&input.slno)
        .bind(&input.item_description)
        .bind(input.qty)
        .bind(&input.unit)
        .bind(input.rate)
        .bind(total)
        .bind(&input.project_name)
        .bind(&input.location)
        .bind(input.date)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(map_expenditure(&row))
    }

    pub async fn update(
        &self,
        id: Uuid,
        input: &ExpenditureInput,
        total: Decimal,
    ) -> Result<Option<Expenditure>, sqlx::Error> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE expenditures
            SET slno = $1, item_description = $2, qty = $3, unit = $4, rate = $5,
                total = $6, project_name = $7, location = $8, date = $9,
                updated_at = NOW()
            WHERE id = $10
            RETURNING {EXPENDITURE_COLUMNS}
            "#
        ))
        .bind(&input.slno)
        .bind(&input.item_description)
        .bind(input.qty)
        .bind(&input.unit)
        .bind(input.rate)
        .bind(total)
        .bind(&input.project_name)
        .bind(&input.location)
        .bind(input.date)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_expenditure))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM expenditures WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn map_payment(row: &PgRow) -> Payment {
    Payment {
        id: row.get("id"),
        kind: PaymentKind::from_db(row.get("type")),
        labour_name: row.get("labour_name"),
        site_name: row.get("site_name"),
        pay_amount: row.get("pay_amount"),
        date: row.get("date"),
        description: row.get("description"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

const PAYMENT_COLUMNS: &str =
    "id, type, labour_name, site_name, pay_amount, date, description, created_at, updated_at";

#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Payment>, sqlx::Error> {
        let rows = sqlx::query(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments ORDER BY date DESC, created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_payment).collect())
    }

    pub async fn create(
        &self,
        kind: PaymentKind,
        input: &PaymentInput,
        created_by: Uuid,
    ) -> Result<Payment, sqlx::Error> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO payments
                (type, labour_name, site_name, pay_amount, date, description, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(kind.as_str())
        .bind(&input.labour_name)
        .bind(&input.site_name)
        .bind(input.pay_amount)
        .bind(input.date)
        .bind(&input.description)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(map_payment(&row))
    }

    pub async fn update(
        &self,
        id: Uuid,
        kind: PaymentKind,
        input: &PaymentInput,
    ) -> Result<Option<Payment>, sqlx::Error> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE payments
            SET type = $1, labour_name = $2, site_name = $3, pay_amount = $4,
                date = $5, description = $6, updated_at = NOW()
            WHERE id = $7
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(kind.as_str())
        .bind(&input.labour_name)
        .bind(&input.site_name)
        .bind(input.pay_amount)
        .bind(input.date)
        .bind(&input.description)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_payment))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM payments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
