//! Site settings, a single row with a fixed primary key.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::models::settings::{SettingsUpdate, SiteSettings};

const SETTINGS_ROW_ID: i32 = 1;

fn map_settings(row: &PgRow) -> SiteSettings {
    SiteSettings {
        site_name: row.get("site_name"),
        contact_email: row.get("contact_email"),
        contact_phone: row.get("contact_phone"),
        office_address: row.get("office_address"),
        facebook_url: row.get("facebook_url"),
        instagram_url: row.get("instagram_url"),
        linkedin_url: row.get("linkedin_url"),
        meta_description: row.get("meta_description"),
        updated_at: row.get("updated_at"),
    }
}

#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self) -> Result<Option<SiteSettings>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM site_settings WHERE id = $1")
            .bind(SETTINGS_ROW_ID)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(map_settings))
    }

    /// Upsert the singleton row.
    pub async fn update(&self, update: &SettingsUpdate) -> Result<SiteSettings, sqlx::Error> {
        let row = sqlx::query(
            r#"
            INSERT INTO site_settings
                (id, site_name, contact_email, contact_phone, office_address,
                 facebook_url, instagram_url, linkedin_url, meta_description, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, CURRENT_TIMESTAMP)
            ON CONFLICT (id) DO UPDATE
            SET site_name = $2, contact_email = $3, contact_phone = $4,
                office_address = $5, facebook_url = $6, instagram_url = $7,
                linkedin_url = $8, meta_description = $9,
                updated_at = CURRENT_TIMESTAMP
            RETURNING *
            "#,
        )
        .bind(SETTINGS_ROW_ID)
        .bind(&update.site_name)
        .bind(&update.contact_email)
        .bind(&update.contact_phone)
        .bind(&update.office_address)
        .bind(&update.facebook_url)
        .bind(&update.instagram_url)
        .bind(&update.linkedin_url)
        .bind(&update.meta_description)
        .fetch_one(&self.pool)
        .await?;

        Ok(map_settings(&row))
    }
}
