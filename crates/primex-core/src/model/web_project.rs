use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::new_id;

/// Technologies offered by the web-project form.
pub const TECHNOLOGIES: &[&str] = &["React", "Node.js", "Tailwind CSS", "Express"];

/// A web-development project as stored locally.
///
/// Client, pricing and publish details only travel in the remote payload
/// (see [`crate::remote::WebsitePayload`]) and are not kept here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebProject {
    pub id: String,
    pub title: String,
    pub link: String,
    pub image: String,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl WebProject {
    pub fn new(title: String, link: String, image: String, description: String) -> Self {
        Self {
            id: new_id(),
            title,
            link,
            image,
            description,
            technologies: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_technologies(mut self, technologies: Vec<String>) -> Self {
        self.technologies = technologies;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}
