mod error;
mod routes;
mod session;
#[cfg(test)]
mod test_support;

use std::sync::Arc;

use anyhow::{Context, Result};
use primex_core::auth::AuthGate;
use primex_core::config::PrimexConfig;
use primex_core::forms::FormService;
use primex_core::portfolio::PortfolioStore;
use primex_core::storage;

pub struct AppState {
    pub portfolio: Arc<PortfolioStore>,
    pub auth: AuthGate,
    pub forms: FormService,
    pub config: PrimexConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "primex_web=info,primex_core=info".parse().unwrap()),
        )
        .init();

    let cwd = std::env::current_dir().ok();
    let config = PrimexConfig::load(cwd.as_deref()).unwrap_or_else(|e| {
        tracing::warn!("failed to load config, using defaults: {e}");
        PrimexConfig::default_config()
    });

    let store = Arc::new(storage::create_store(&config).context("failed to open store")?);
    tracing::info!(store = %store.describe(), "store ready");

    let auth = AuthGate::from_config(&config, Arc::clone(&store));
    if auth.restore().await? {
        tracing::info!("previous admin session restored");
    }

    let portfolio = Arc::new(PortfolioStore::new(store));
    let forms = FormService::from_config(&config, Arc::clone(&portfolio))
        .context("failed to build remote client")?;
    match forms.remote_endpoint() {
        Some(endpoint) => tracing::info!(endpoint, "remote submission enabled"),
        None => tracing::info!("remote submission disabled"),
    }

    let state = Arc::new(AppState {
        portfolio,
        auth,
        forms,
        config: config.clone(),
    });

    let app = routes::router()
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.web.host, config.web.port);
    tracing::info!("primex-web listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
