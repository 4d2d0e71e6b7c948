use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::new_id;

/// Categories offered by the graphic-design form.
pub const DESIGN_CATEGORIES: &[&str] = &[
    "Logos",
    "T-Shirt Design",
    "Social Media Posts",
    "Branding Materials",
    "Print Design",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphicDesign {
    pub id: String,
    pub title: String,
    pub category: String,
    pub image: String,
    pub created_at: DateTime<Utc>,
}

impl GraphicDesign {
    pub fn new(title: String, category: String, image: String) -> Self {
        Self {
            id: new_id(),
            title,
            category,
            image,
            created_at: Utc::now(),
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}
