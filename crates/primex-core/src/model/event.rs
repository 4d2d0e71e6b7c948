use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::new_id;

/// Categories offered by the event form.
pub const EVENT_CATEGORIES: &[&str] = &[
    "Corporate Events",
    "Weddings",
    "Product Launches",
    "Social Events",
    "Conferences",
];

/// An event-coverage entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub images: Vec<String>,
    /// One of `images`, or empty.
    #[serde(default)]
    pub main_image: String,
    pub description: String,
    /// Event date as entered (`YYYY-MM-DD`).
    pub date: String,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn new(name: String, category: String, description: String, date: String) -> Self {
        Self {
            id: new_id(),
            name,
            category,
            images: Vec::new(),
            main_image: String::new(),
            description,
            date,
            created_at: Utc::now(),
        }
    }

    /// Attach the image list. `main_image` must be empty or one of `images`;
    /// anything else is replaced by the first image.
    pub fn with_images(mut self, images: Vec<String>, main_image: String) -> Self {
        self.main_image = if main_image.is_empty() || images.contains(&main_image) {
            main_image
        } else {
            images.first().cloned().unwrap_or_default()
        };
        self.images = images;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Image shown in summary views: the main image, falling back to the first.
    pub fn cover_image(&self) -> Option<&str> {
        if !self.main_image.is_empty() {
            Some(self.main_image.as_str())
        } else {
            self.images.first().map(String::as_str)
        }
    }
}
