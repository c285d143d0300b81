//! Project rows with their gallery filename arrays.

use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, QueryBuilder, Row};
use uuid::Uuid;

use crate::models::project::{Project, ProjectFields, ProjectStatus};

fn map_project(row: &PgRow) -> Project {
    Project {
        id: row.get("id"),
        status: ProjectStatus::parse(row.get("status")).unwrap_or(ProjectStatus::Ongoing),
        project_type: row.get("project_type"),
        title: row.get("title"),
        location: row.get("location"),
        description: row.get("description"),
        image_path: row.get("image_path"),
        start_date: row.get("start_date"),
        completed_date: row.get("completed_date"),
        progress: row.get("progress"),
        plot_area: row.get("plot_area"),
        plinth_area: row.get("plinth_area"),
        build_up_area: row.get("build_up_area"),
        drawing_photos: row.get("drawing_photos"),
        project_photos: row.get("project_photos"),
        project_videos: row.get("project_videos"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[derive(Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Newest first, optionally filtered by status and/or type.
    pub async fn list(
        &self,
        status: Option<&str>,
        project_type: Option<&str>,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let mut builder = QueryBuilder::new("SELECT * FROM projects");

        let mut first = true;
        if let Some(status) = status {
            builder.push(" WHERE status = ").push_bind(status);
            first = false;
        }
        if let Some(project_type) = project_type {
            builder
                .push(if first { " WHERE " } else { " AND " })
                .push("project_type = ")
                .push_bind(project_type);
        }
        builder.push(" ORDER BY created_at DESC");

        let rows = builder.build().fetch_all(&self.pool).await?;
        Ok(rows.iter().map(map_project).collect())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(map_project))
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        fields: &ProjectFields,
        image_path: Option<&str>,
        drawing_photos: &[String],
        project_photos: &[String],
        project_videos: &[String],
    ) -> Result<Project, sqlx::Error> {
        let row = sqlx::query(
            r#"
            INSERT INTO projects
                (status, project_type, title, location, description, image_path,
                 start_date, completed_date, progress, plot_area, plinth_area,
                 build_up_area, drawing_photos, project_photos, project_videos,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(fields.status.as_str())
        .bind(&fields.project_type)
        .bind(&fields.title)
        .bind(&fields.location)
        .bind(&fields.description)
        .bind(image_path)
        .bind(fields.start_date)
        .bind(fields.completed_date)
        .bind(fields.progress)
        .bind(fields.plot_area)
        .bind(fields.plinth_area)
        .bind(fields.build_up_area)
        .bind(Json(drawing_photos))
        .bind(Json(project_photos))
        .bind(Json(project_videos))
        .fetch_one(&self.pool)
        .await?;

        Ok(map_project(&row))
    }

    /// Full-row update; gallery arrays are whole-value replacements.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        fields: &ProjectFields,
        image_path: Option<&str>,
        drawing_photos: &[String],
        project_photos: &[String],
        project_videos: &[String],
    ) -> Result<Option<Project>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            UPDATE projects
            SET status = $1, project_type = $2, title = $3, location = $4,
                description = $5, image_path = $6, start_date = $7,
                completed_date = $8, progress = $9, plot_area = $10,
                plinth_area = $11, build_up_area = $12, drawing_photos = $13,
                project_photos = $14, project_videos = $15, updated_at = NOW()
            WHERE id = $16
            RETURNING *
            "#,
        )
        .bind(fields.status.as_str())
        .bind(&fields.project_type)
        .bind(&fields.title)
        .bind(&fields.location)
        .bind(&fields.description)
        .bind(image_path)
        .bind(fields.start_date)
        .bind(fields.completed_date)
        .bind(fields.progress)
        .bind(fields.plot_area)
        .bind(fields.plinth_area)
        .bind(fields.build_up_area)
        .bind(Json(drawing_photos))
        .bind(Json(project_photos))
        .bind(Json(project_videos))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_project))
    }

    /// Delete and return the row so the caller can unlink its files.
    pub async fn delete(&self, id: Uuid) -> Result<Option<Project>, sqlx::Error> {
        let row = sqlx::query("DELETE FROM projects WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(map_project))
    }
}
