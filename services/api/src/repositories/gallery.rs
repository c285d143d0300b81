//! Interior-design gallery images.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::gallery::InteriorDesign;

fn map_design(row: &PgRow) -> InteriorDesign {
    InteriorDesign {
        id: row.get("id"),
        image_description: row.get("image_description"),
        image_path: row.get("image_path"),
        created_at: row.get("created_at"),
    }
}

#[derive(Clone)]
pub struct GalleryRepository {
    pool: PgPool,
}

impl GalleryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<InteriorDesign>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, image_description, image_path, created_at
            FROM interior_designs
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_design).collect())
    }

    pub async fn create(
        &self,
        image_description: &str,
        image_path: &str,
    ) -> Result<InteriorDesign, sqlx::Error> {
        let row = sqlx::query(
            r#"
            INSERT INTO interior_designs (image_description, image_path)
            VALUES ($1, $2)
            RETURNING id, image_description, image_path, created_at
            "#,
        )
        .bind(image_description)
        .bind(image_path)
        .fetch_one(&self.pool)
        .await?;

        Ok(map_design(&row))
    }

    /// Delete and return the row so the caller can unlink the image file.
    pub async fn delete(&self, id: Uuid) -> Result<Option<InteriorDesign>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            DELETE FROM interior_designs WHERE id = $1
            RETURNING id, image_description, image_path, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_design))
    }
}
