//! Project portfolio entries with bounded photo/video galleries.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

pub const MAX_DRAWING_PHOTOS: usize = 4;
pub const MAX_PROJECT_PHOTOS: usize = 4;
pub const MAX_PROJECT_VIDEOS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Ongoing,
    Completed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Ongoing => "ongoing",
            ProjectStatus::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<ProjectStatus> {
        match value {
            "ongoing" => Some(ProjectStatus::Ongoing),
            "completed" => Some(ProjectStatus::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: Uuid,
    pub status: ProjectStatus,
    pub project_type: String,
    pub title: String,
    pub location: String,
    pub description: Option<String>,
    pub image_path: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub completed_date: Option<NaiveDate>,
    /// Percent complete; only meaningful (and only stored) while ongoing.
    pub progress: Option<i32>,
    pub plot_area: Option<f64>,
    pub plinth_area: Option<f64>,
    pub build_up_area: Option<f64>,
    pub drawing_photos: Json<Vec<String>>,
    pub project_photos: Json<Vec<String>>,
    pub project_videos: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Text fields collected from the multipart form.
#[derive(Debug, Default)]
pub struct ProjectForm {
    pub status: Option<String>,
    pub project_type: Option<String>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub completed_date: Option<NaiveDate>,
    pub progress: Option<i32>,
    pub plot_area: Option<f64>,
    pub plinth_area: Option<f64>,
    pub build_up_area: Option<f64>,
    pub delete_image: bool,
}

/// The validated subset of [`ProjectForm`] a row can be written from.
#[derive(Debug)]
pub struct ProjectFields {
    pub status: ProjectStatus,
    pub project_type: String,
    pub title: String,
    pub location: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub completed_date: Option<NaiveDate>,
    pub progress: Option<i32>,
    pub plot_area: Option<f64>,
    pub plinth_area: Option<f64>,
    pub build_up_area: Option<f64>,
}

impl ProjectForm {
    pub fn validate(self) -> Result<ProjectFields, String> {
        let status = self
            .status
            .as_deref()
            .and_then(ProjectStatus::parse)
            .ok_or_else(|| "Missing required fields".to_string())?;

        let project_type = non_empty(self.project_type)?;
        let title = non_empty(self.title)?;
        let location = non_empty(self.location)?;

        if let Some(progress) = self.progress {
            if !(0..=100).contains(&progress) {
                return Err("Progress must be between 0 and 100".to_string());
            }
        }

        // Progress is only meaningful while the project is ongoing.
        let progress = match status {
            ProjectStatus::Ongoing => self.progress,
            ProjectStatus::Completed => None,
        };

        Ok(ProjectFields {
            status,
            project_type,
            title,
            location,
            description: self.description.filter(|s| !s.trim().is_empty()),
            start_date: self.start_date,
            completed_date: self.completed_date,
            progress,
            plot_area: self.plot_area,
            plinth_area: self.plinth_area,
            build_up_area: self.build_up_area,
        })
    }
}

fn non_empty(field: Option<String>) -> Result<String, String> {
    match field {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err("Missing required fields".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ProjectForm {
        ProjectForm {
            status: Some("ongoing".to_string()),
            project_type: Some("residential".to_string()),
            title: Some("Hillside Residence".to_string()),
            location: Some("Pokhara".to_string()),
            progress: Some(40),
            ..Default::default()
        }
    }

    #[test]
    fn required_fields_are_enforced() {
        let mut missing_title = form();
        missing_title.title = None;
        assert!(missing_title.validate().is_err());

        let mut bad_status = form();
        bad_status.status = Some("paused".to_string());
        assert!(bad_status.validate().is_err());
    }

    #[test]
    fn progress_is_dropped_for_completed_projects() {
        let mut completed = form();
        completed.status = Some("completed".to_string());
        let fields = completed.validate().unwrap();
        assert_eq!(fields.progress, None);

        let ongoing = form().validate().unwrap();
        assert_eq!(ongoing.progress, Some(40));
    }

    #[test]
    fn progress_out_of_range_is_rejected() {
        let mut over = form();
        over.progress = Some(120);
        assert!(over.validate().is_err());
    }
}
