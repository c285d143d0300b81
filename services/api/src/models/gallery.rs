//! Interior-design gallery images.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct InteriorDesign {
    pub id: Uuid,
    pub image_description: String,
    pub image_path: String,
    pub created_at: DateTime<Utc>,
}
