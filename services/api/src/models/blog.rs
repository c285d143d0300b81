//! Blog posts, addressed publicly by slug.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlogStatus {
    Published,
    Draft,
}

impl BlogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlogStatus::Published => "published",
            BlogStatus::Draft => "draft",
        }
    }

    pub fn parse(value: &str) -> Option<BlogStatus> {
        match value {
            "published" => Some(BlogStatus::Published),
            "draft" => Some(BlogStatus::Draft),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub content: String,
    pub author: Option<String>,
    pub category: Option<String>,
    pub status: BlogStatus,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Text fields collected from the multipart form.
#[derive(Debug, Default)]
pub struct BlogForm {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub delete_image: bool,
}

#[derive(Debug)]
pub struct BlogFields {
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub content: String,
    pub author: Option<String>,
    pub category: Option<String>,
    pub status: BlogStatus,
}

impl BlogForm {
    pub fn validate(self) -> Result<BlogFields, String> {
        let title = match self.title {
            Some(t) if !t.trim().is_empty() => t,
            _ => return Err("Title and content are required".to_string()),
        };
        let content = match self.content {
            Some(c) if !c.trim().is_empty() => c,
            _ => return Err("Title and content are required".to_string()),
        };

        let status = match self.status.as_deref() {
            None | Some("") => BlogStatus::Published,
            Some(raw) => BlogStatus::parse(raw)
                .ok_or_else(|| "Status must be \"published\" or \"draft\"".to_string())?,
        };

        let slug = match self.slug.filter(|s| !s.trim().is_empty()) {
            Some(explicit) => slugify(&explicit),
            None => slugify(&title),
        };
        if slug.is_empty() {
            return Err("Title does not produce a usable slug".to_string());
        }

        Ok(BlogFields {
            title,
            slug,
            summary: self.summary.filter(|s| !s.trim().is_empty()),
            content,
            author: self.author.filter(|s| !s.trim().is_empty()),
            category: self.category.filter(|s| !s.trim().is_empty()),
            status,
        })
    }
}

/// Lowercase, spaces to `-`, strip everything that is not a word character
/// or hyphen, collapse runs of hyphens.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut last_was_hyphen = true; // suppress leading hyphens

    for c in text.trim().to_lowercase().chars() {
        if c.is_alphanumeric() || c == '_' {
            slug.push(c);
            last_was_hyphen = false;
        } else if (c.is_whitespace() || c == '-') && !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_normalizes_titles() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  Modern   Interiors!  "), "modern-interiors");
        assert_eq!(slugify("Re-design: 2024 Trends"), "re-design-2024-trends");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn form_defaults_status_to_published() {
        let fields = BlogForm {
            title: Some("A Post".to_string()),
            content: Some("Body".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(fields.status, BlogStatus::Published);
        assert_eq!(fields.slug, "a-post");
    }

    #[test]
    fn explicit_slug_wins_over_title() {
        let fields = BlogForm {
            title: Some("A Post".to_string()),
            content: Some("Body".to_string()),
            slug: Some("Custom Slug".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(fields.slug, "custom-slug");
    }

    #[test]
    fn missing_title_or_content_is_rejected() {
        assert!(BlogForm::default().validate().is_err());
        assert!(
            BlogForm {
                title: Some("T".to_string()),
                ..Default::default()
            }
            .validate()
            .is_err()
        );
    }
}
