//! Blog posts. Slugs are unique; collisions get a timestamp suffix.

use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, QueryBuilder, Row};
use uuid::Uuid;

use crate::models::blog::{Blog, BlogFields, BlogStatus};

fn map_blog(row: &PgRow) -> Blog {
    Blog {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        summary: row.get("summary"),
        content: row.get("content"),
        author: row.get("author"),
        category: row.get("category"),
        status: BlogStatus::parse(row.get("status")).unwrap_or(BlogStatus::Draft),
        image_path: row.get("image_path"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[derive(Clone)]
pub struct BlogRepository {
    pool: PgPool,
}

impl BlogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Admin view: drafts included, newest first.
    pub async fn list_all(&self) -> Result<Vec<Blog>, sqlx::Error> {
        let rows = sqlx::query("SELECT * FROM blogs ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(map_blog).collect())
    }

    /// Public view: published only, optionally one category.
    pub async fn list_published(&self, category: Option<&str>) -> Result<Vec<Blog>, sqlx::Error> {
        let mut builder = QueryBuilder::new("SELECT * FROM blogs WHERE status = 'published'");
        if let Some(category) = category {
            builder.push(" AND category = ").push_bind(category);
        }
        builder.push(" ORDER BY created_at DESC");

        let rows = builder.build().fetch_all(&self.pool).await?;
        Ok(rows.iter().map(map_blog).collect())
    }

    pub async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Blog>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM blogs WHERE slug = $1 AND status = 'published'")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(map_blog))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Blog>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM blogs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(map_blog))
    }

    /// Make the slug unique by appending epoch millis when it is taken.
    /// `exclude` skips the row being updated so a post keeps its own slug.
    pub async fn ensure_unique_slug(
        &self,
        slug: &str,
        exclude: Option<Uuid>,
    ) -> Result<String, sqlx::Error> {
        let taken = match exclude {
            Some(id) => sqlx::query("SELECT id FROM blogs WHERE slug = $1 AND id <> $2")
                .bind(slug)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .is_some(),
            None => sqlx::query("SELECT id FROM blogs WHERE slug = $1")
                .bind(slug)
                .fetch_optional(&self.pool)
                .await?
                .is_some(),
        };

        if taken {
            Ok(format!("{}-{}", slug, Utc::now().timestamp_millis()))
        } else {
            Ok(slug.to_string())
        }
    }

    pub async fn create(
        &self,
        fields: &BlogFields,
        image_path: Option<&str>,
    ) -> Result<Blog, sqlx::Error> {
        let row = sqlx::query(
            r#"
            INSERT INTO blogs
                (title, slug, summary, content, author, category, status, image_path,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(&fields.title)
        .bind(&fields.slug)
        .bind(&fields.summary)
        .bind(&fields.content)
        .bind(&fields.author)
        .bind(&fields.category)
        .bind(fields.status.as_str())
        .bind(image_path)
        .fetch_one(&self.pool)
        .await?;

        Ok(map_blog(&row))
    }

    pub async fn update(
        &self,
        id: Uuid,
        fields: &BlogFields,
        image_path: Option<&str>,
    ) -> Result<Option<Blog>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            UPDATE blogs
            SET title = $1, slug = $2, summary = $3, content = $4, author = $5,
                category = $6, status = $7, image_path = $8, updated_at = NOW()
            WHERE id = $9
            RETURNING *
            "#,
        )
        .bind(&fields.title)
        .bind(&fields.slug)
        .bind(&fields.summary)
        .bind(&fields.content)
        .bind(&fields.author)
        .bind(&fields.category)
        .bind(fields.status.as_str())
        .bind(image_path)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_blog))
    }

    /// Delete and return the row so the caller can unlink the image.
    pub async fn delete(&self, id: Uuid) -> Result<Option<Blog>, sqlx::Error> {
        let row = sqlx::query("DELETE FROM blogs WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(map_blog))
    }
}
