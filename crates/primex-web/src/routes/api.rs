use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use primex_core::dashboard;
use primex_core::model::{DashboardStats, Event, GraphicDesign, PortfolioKind, WebProject};
use primex_core::portfolio::{CollectionState, CollectionStatus};
use serde::Serialize;

use crate::error::ApiError;
use crate::session::AdminApi;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/stats", get(stats))
        .route("/api/v1/web-projects", get(web_projects))
        .route("/api/v1/events", get(events))
        .route("/api/v1/graphic-designs", get(graphic_designs))
}

// -- Response types --

#[derive(Debug, Serialize)]
pub struct CollectionResponse<T> {
    pub kind: PortfolioKind,
    pub status: CollectionStatus,
    pub count: usize,
    pub items: Vec<T>,
    /// Parse error for a corrupt collection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl<T> CollectionResponse<T> {
    fn new(kind: PortfolioKind, state: CollectionState<T>) -> Self {
        let status = state.status();
        let (items, reason) = match state {
            CollectionState::Missing => (Vec::new(), None),
            CollectionState::Corrupt { reason } => (Vec::new(), Some(reason)),
            CollectionState::Loaded(items) => (items, None),
        };
        Self {
            kind,
            status,
            count: items.len(),
            items,
            reason,
        }
    }
}

// -- Handlers --

async fn stats(
    _admin: AdminApi,
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardStats>, ApiError> {
    Ok(Json(dashboard::collect_stats(&state.portfolio).await?))
}

async fn web_projects(
    _admin: AdminApi,
    State(state): State<Arc<AppState>>,
) -> Result<Json<CollectionResponse<WebProject>>, ApiError> {
    let loaded = state.portfolio.load_web_projects().await?;
    Ok(Json(CollectionResponse::new(PortfolioKind::WebProjects, loaded)))
}

async fn events(
    _admin: AdminApi,
    State(state): State<Arc<AppState>>,
) -> Result<Json<CollectionResponse<Event>>, ApiError> {
    let loaded = state.portfolio.load_events().await?;
    Ok(Json(CollectionResponse::new(PortfolioKind::Events, loaded)))
}

async fn graphic_designs(
    _admin: AdminApi,
    State(state): State<Arc<AppState>>,
) -> Result<Json<CollectionResponse<GraphicDesign>>, ApiError> {
    let loaded = state.portfolio.load_graphic_designs().await?;
    Ok(Json(CollectionResponse::new(PortfolioKind::GraphicDesigns, loaded)))
}
