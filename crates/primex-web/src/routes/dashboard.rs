use std::sync::Arc;

use askama::Template;
use axum::extract::State;
use axum::response::{Html, Redirect};
use axum::routing::get;
use axum::Router;
use primex_core::dashboard::{self, RECENT_ACTIVITY};
use primex_core::model::PortfolioKind;

use crate::error::AppError;
use crate::session::AdminPage;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(home))
        .route("/dashboard", get(dashboard_page))
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    username: String,
    cards: Vec<StatCard>,
    total_projects: usize,
    activity: Vec<ActivityRow>,
}

struct StatCard {
    label: &'static str,
    count: usize,
    link: &'static str,
}

struct ActivityRow {
    action: &'static str,
    title: String,
    when: String,
}

/// Form page that adds entries of `kind`.
pub fn form_path(kind: PortfolioKind) -> &'static str {
    match kind {
        PortfolioKind::WebProjects => "/add-web-project",
        PortfolioKind::Events => "/add-event",
        PortfolioKind::GraphicDesigns => "/add-graphic-design",
    }
}

async fn home(_admin: AdminPage) -> Redirect {
    Redirect::to("/dashboard")
}

async fn dashboard_page(
    admin: AdminPage,
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, AppError> {
    let stats = dashboard::collect_stats(&state.portfolio).await?;
    let activity = dashboard::recent_activity(&state.portfolio, RECENT_ACTIVITY).await?;

    let cards = PortfolioKind::ALL
        .iter()
        .map(|&kind| StatCard {
            label: kind.label(),
            count: stats.count_for(kind),
            link: form_path(kind),
        })
        .collect();

    let activity = activity
        .iter()
        .map(|entry| ActivityRow {
            action: entry.action(),
            title: entry.title.clone(),
            when: entry.created_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        })
        .collect();

    let tmpl = DashboardTemplate {
        username: admin.username,
        cards,
        total_projects: stats.total_projects,
        activity,
    };
    Ok(Html(tmpl.render()?))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use primex_core::model::GraphicDesign;
    use tower::ServiceExt;

    use crate::test_support::*;

    #[tokio::test]
    async fn test_dashboard_requires_login() {
        let resp = test_router()
            .oneshot(Request::get("/dashboard").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/login");
    }

    #[tokio::test]
    async fn test_root_redirects_to_dashboard() {
        let app = test_router();
        let cookie = login_cookie(&app).await;
        let resp = app.oneshot(authed_get("/", &cookie)).await.unwrap();
        assert_eq!(location(&resp), "/dashboard");
    }

    #[tokio::test]
    async fn test_dashboard_shows_counts_and_activity() {
        let state = test_app_state();
        state
            .portfolio
            .save_graphic_design(&GraphicDesign::new(
                "Coffee brand".into(),
                "Branding Materials".into(),
                "c.png".into(),
            ))
            .await
            .unwrap();
        let app = router_with(state);
        let cookie = login_cookie(&app).await;

        let resp = app.oneshot(authed_get("/dashboard", &cookie)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_text(resp.into_body()).await;
        assert!(html.contains("Welcome back, admin"));
        assert!(html.contains("Graphic design uploaded"));
        assert!(html.contains("Coffee brand"));
    }

    #[tokio::test]
    async fn test_forged_cookie_is_rejected() {
        let app = test_router();
        let _ = login_cookie(&app).await;
        let resp = app
            .oneshot(authed_get("/dashboard", "primex_session=forged"))
            .await
            .unwrap();
        assert_eq!(location(&resp), "/login");
    }
}
