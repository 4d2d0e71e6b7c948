mod event;
mod graphic_design;
mod session;
mod web_project;


pub use event::*;
pub use graphic_design::*;
pub use session::*;
pub use web_project::*;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generate a record identifier. UUIDv7 keeps identifiers ordered by creation
/// time without colliding when two records are created in the same millisecond.
pub fn new_id() -> String {
    Uuid::now_v7().to_string()
}

/// The three portfolio collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PortfolioKind {
    WebProjects,
    Events,
    GraphicDesigns,
}

impl PortfolioKind {
    pub const ALL: [PortfolioKind; 3] = [
        PortfolioKind::WebProjects,
        PortfolioKind::Events,
        PortfolioKind::GraphicDesigns,
    ];

    /// Fixed key the collection is stored under.
    pub fn storage_key(self) -> &'static str {
        match self {
            Self::WebProjects => crate::storage::keys::WEB_PROJECTS,
            Self::Events => crate::storage::keys::EVENTS,
            Self::GraphicDesigns => crate::storage::keys::GRAPHIC_DESIGNS,
        }
    }

    /// Human-readable heading used by the dashboard cards.
    pub fn label(self) -> &'static str {
        match self {
            Self::WebProjects => "Web Projects",
            Self::Events => "Events Covered",
            Self::GraphicDesigns => "Graphic Designs",
        }
    }
}

impl fmt::Display for PortfolioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WebProjects => write!(f, "web-projects"),
            Self::Events => write!(f, "events"),
            Self::GraphicDesigns => write!(f, "graphic-designs"),
        }
    }
}

impl FromStr for PortfolioKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "web-projects" | "web-project" | "web" => Ok(Self::WebProjects),
            "events" | "event" => Ok(Self::Events),
            "graphic-designs" | "graphic-design" | "designs" | "design" => {
                Ok(Self::GraphicDesigns)
            }
            _ => Err(format!("unknown collection: {s}")),
        }
    }
}

/// Counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub web_projects: usize,
    pub events: usize,
    pub graphic_designs: usize,
    pub total_projects: usize,
}

impl DashboardStats {
    pub fn new(web_projects: usize, events: usize, graphic_designs: usize) -> Self {
        Self {
            web_projects,
            events,
            graphic_designs,
            total_projects: web_projects + events + graphic_designs,
        }
    }

    pub fn count_for(&self, kind: PortfolioKind) -> usize {
        match kind {
            PortfolioKind::WebProjects => self.web_projects,
            PortfolioKind::Events => self.events,
            PortfolioKind::GraphicDesigns => self.graphic_designs,
        }
    }
}

/// One line of the dashboard's recent-activity list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub kind: PortfolioKind,
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl ActivityEntry {
    pub fn action(&self) -> &'static str {
        match self.kind {
            PortfolioKind::WebProjects => "New web project added",
            PortfolioKind::Events => "Event documentation added",
            PortfolioKind::GraphicDesigns => "Graphic design uploaded",
        }
    }
}
