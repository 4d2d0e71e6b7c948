use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use owo_colors::OwoColorize;
use primex_core::auth::AuthGate;
use primex_core::config::PrimexConfig;
use primex_core::dashboard;
use primex_core::model::PortfolioKind;
use primex_core::portfolio::{CollectionStatus, PortfolioStore};
use primex_core::storage::{create_store, keys, KeyValueStore, Store};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "primex", about = "Prime X Studio admin tools", version)]
enum Cli {
    /// Show collection counts
    Stats {
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// List the entries of one collection
    List {
        /// Collection: web-projects, events, graphic-designs
        kind: PortfolioKind,
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Report whether each collection is missing, readable, or corrupt
    Check {
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove the persisted admin session
    Logout,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "primex_core=warn".parse().unwrap()),
        )
        .compact()
        .init();

    let cli = Cli::parse();
    let config = load_config(&std::env::current_dir()?);

    run(cli, &config).await
}

fn load_config(dir: &std::path::Path) -> PrimexConfig {
    PrimexConfig::load(Some(dir)).unwrap_or_else(|e| {
        tracing::warn!("failed to load config, using defaults: {e}");
        PrimexConfig::default_config()
    })
}

async fn run(cli: Cli, config: &PrimexConfig) -> Result<()> {
    let store = make_store(config)?;
    match cli {
        Cli::Stats { json } => cmd_stats(&PortfolioStore::new(store), json).await,
        Cli::List { kind, json } => cmd_list(&PortfolioStore::new(store), kind, json).await,
        Cli::Check { json } => cmd_check(&PortfolioStore::new(store), json).await,
        Cli::Logout => cmd_logout(config, store).await,
    }
}

fn make_store(config: &PrimexConfig) -> Result<Arc<Store>> {
    let store = create_store(config).context("failed to open store")?;
    Ok(Arc::new(store))
}

// -- Commands --

async fn cmd_stats(portfolio: &PortfolioStore, json: bool) -> Result<()> {
    let stats = dashboard::collect_stats(portfolio)
        .await
        .context("failed to read collections")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", "Prime X Studio".bold());
    for kind in PortfolioKind::ALL {
        println!(
            "  {}  {}",
            format!("{:<16}", kind.label()).dimmed(),
            stats.count_for(kind).to_string().cyan()
        );
    }
    println!(
        "  {}  {}",
        format!("{:<16}", "Total Projects").dimmed(),
        stats.total_projects.to_string().cyan().bold()
    );
    Ok(())
}

/// One table row, whatever the collection.
struct ListRow {
    id: String,
    created_at: DateTime<Utc>,
    title: String,
    detail: String,
}

async fn cmd_list(portfolio: &PortfolioStore, kind: PortfolioKind, json: bool) -> Result<()> {
    let rows: Vec<ListRow> = match kind {
        PortfolioKind::WebProjects => {
            let items = portfolio.get_web_projects().await?;
            if json {
                return print_json(&items);
            }
            items
                .into_iter()
                .map(|p| ListRow {
                    id: p.id,
                    created_at: p.created_at,
                    detail: p.technologies.join(", "),
                    title: p.title,
                })
                .collect()
        }
        PortfolioKind::Events => {
            let items = portfolio.get_events().await?;
            if json {
                return print_json(&items);
            }
            items
                .into_iter()
                .map(|e| ListRow {
                    id: e.id,
                    created_at: e.created_at,
                    detail: format!("{} · {} image(s)", e.category, e.images.len()),
                    title: e.name,
                })
                .collect()
        }
        PortfolioKind::GraphicDesigns => {
            let items = portfolio.get_graphic_designs().await?;
            if json {
                return print_json(&items);
            }
            items
                .into_iter()
                .map(|d| ListRow {
                    id: d.id,
                    created_at: d.created_at,
                    detail: d.category,
                    title: d.title,
                })
                .collect()
        }
    };

    if rows.is_empty() {
        println!("No {} found.", kind.label().to_lowercase());
        return Ok(());
    }

    println!(
        "  {}  {}  {}  {}",
        format!("{:<8}", "ID").dimmed(),
        format!("{:<10}", "Date").dimmed(),
        format!("{:<32}", "Title").dimmed(),
        "Detail".dimmed(),
    );
    println!("{}", "─".repeat(78).dimmed());

    for row in &rows {
        println!(
            "  {}  {}  {}  {}",
            short_id(&row.id).yellow(),
            row.created_at.format("%Y-%m-%d"),
            format!("{:<32}", truncate(&row.title, 32)),
            row.detail.dimmed(),
        );
    }
    println!("\n  {} {}", rows.len().to_string().cyan(), kind.label().to_lowercase());
    Ok(())
}

#[derive(Debug, Serialize)]
struct CheckEntry {
    kind: PortfolioKind,
    key: &'static str,
    status: CollectionStatus,
    count: usize,
}

#[derive(Debug, Serialize)]
struct CheckReport {
    store: String,
    collections: Vec<CheckEntry>,
    session_persisted: bool,
}

impl CheckReport {
    fn corrupt(&self) -> usize {
        self.collections
            .iter()
            .filter(|c| c.status == CollectionStatus::Corrupt)
            .count()
    }
}

async fn check_report(portfolio: &PortfolioStore) -> Result<CheckReport> {
    let mut collections = Vec::with_capacity(PortfolioKind::ALL.len());
    for kind in PortfolioKind::ALL {
        let (status, count) = portfolio
            .status(kind)
            .await
            .with_context(|| format!("failed to read {kind}"))?;
        collections.push(CheckEntry {
            kind,
            key: kind.storage_key(),
            status,
            count,
        });
    }
    let session_persisted = portfolio.store().get(keys::AUTH).await?.is_some();
    Ok(CheckReport {
        store: portfolio.store().describe(),
        collections,
        session_persisted,
    })
}

/// Fails when any collection is corrupt so scripts can act on it.
async fn cmd_check(portfolio: &PortfolioStore, json: bool) -> Result<()> {
    let report = check_report(portfolio).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", "Store check".bold());
        println!("  {}  {}", format!("{:<24}", "Store").dimmed(), report.store);
        for entry in &report.collections {
            let status = match entry.status {
                CollectionStatus::Loaded => format!("loaded ({})", entry.count).green().to_string(),
                CollectionStatus::Missing => "missing".yellow().to_string(),
                CollectionStatus::Corrupt => "corrupt".red().bold().to_string(),
            };
            println!("  {}  {}", format!("{:<24}", entry.key).dimmed(), status);
        }
        let session = if report.session_persisted {
            "persisted".green().to_string()
        } else {
            "none".dimmed().to_string()
        };
        println!("  {}  {}", format!("{:<24}", keys::AUTH).dimmed(), session);
    }

    match report.corrupt() {
        0 => Ok(()),
        n => anyhow::bail!("{n} corrupt collection(s); saves to them are refused"),
    }
}

async fn cmd_logout(config: &PrimexConfig, store: Arc<Store>) -> Result<()> {
    let gate = AuthGate::from_config(config, store);
    gate.logout().await.context("failed to clear session")?;
    println!("{} Admin session cleared.", "✓".green());
    println!(
        "  {}",
        "A running primex-web keeps its in-memory session until restart.".dimmed()
    );
    Ok(())
}

// -- Helpers --

fn print_json<T: Serialize>(items: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(items)?);
    Ok(())
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primex_core::model::{Event, GraphicDesign, WebProject};
    use primex_core::storage::MemoryStore;

    fn test_store() -> Arc<Store> {
        Arc::new(Store::Memory(MemoryStore::new()))
    }

    fn test_portfolio() -> PortfolioStore {
        PortfolioStore::new(test_store())
    }

    #[test]
    fn test_cli_parses_kind() {
        let cli = Cli::try_parse_from(["primex", "list", "events", "--json"]).unwrap();
        match cli {
            Cli::List { kind, json } => {
                assert_eq!(kind, PortfolioKind::Events);
                assert!(json);
            }
            _ => panic!("expected list"),
        }
        assert!(Cli::try_parse_from(["primex", "list", "photos"]).is_err());
    }

    #[test]
    fn test_unreadable_config_falls_back_to_defaults() {
        let dir = std::env::temp_dir().join(format!("primex-cli-cfg-{}", std::process::id()));
        std::fs::create_dir_all(dir.join(".primex")).unwrap();
        std::fs::write(
            dir.join(".primex").join("config.toml"),
            "[storage\nbackend = ",
        )
        .unwrap();

        let config = load_config(&dir);
        assert_eq!(config.storage.backend, "sqlite");
        assert_eq!(config.web.port, 8080);
        assert_eq!(config.auth.username, "admin");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_short_id_and_truncate() {
        assert_eq!(short_id("0190a1b2-c3d4"), "0190a1b2");
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long title", 7), "a very…");
    }

    #[tokio::test]
    async fn test_cmd_stats_and_list() {
        let portfolio = test_portfolio();
        portfolio
            .save_web_project(
                &WebProject::new("Site".into(), "l".into(), "i".into(), "d".into())
                    .with_technologies(vec!["React".into()]),
            )
            .await
            .unwrap();
        portfolio
            .save_event(&Event::new(
                "Expo".into(),
                "Conferences".into(),
                "d".into(),
                "2024-01-01".into(),
            ))
            .await
            .unwrap();

        cmd_stats(&portfolio, false).await.unwrap();
        cmd_stats(&portfolio, true).await.unwrap();
        for kind in PortfolioKind::ALL {
            cmd_list(&portfolio, kind, false).await.unwrap();
            cmd_list(&portfolio, kind, true).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_check_report_flags_corrupt() {
        let store = test_store();
        store.set(keys::EVENTS, "not json").await.unwrap();
        let portfolio = PortfolioStore::new(Arc::clone(&store));
        portfolio
            .save_graphic_design(&GraphicDesign::new(
                "Logo".into(),
                "Logos".into(),
                "l.png".into(),
            ))
            .await
            .unwrap();

        let report = check_report(&portfolio).await.unwrap();
        assert_eq!(report.corrupt(), 1);
        let statuses: Vec<CollectionStatus> =
            report.collections.iter().map(|c| c.status).collect();
        assert_eq!(
            statuses,
            vec![
                CollectionStatus::Missing,
                CollectionStatus::Corrupt,
                CollectionStatus::Loaded
            ]
        );
        assert!(!report.session_persisted);
        assert!(cmd_check(&portfolio, false).await.is_err());
    }

    #[tokio::test]
    async fn test_cmd_logout_removes_marker() {
        let store = test_store();
        let config = PrimexConfig::default_config();
        let gate = AuthGate::from_config(&config, Arc::clone(&store));
        assert!(gate.login("admin", "1234").await.unwrap());
        assert!(store.get(keys::AUTH).await.unwrap().is_some());

        cmd_logout(&config, Arc::clone(&store)).await.unwrap();
        assert!(store.get(keys::AUTH).await.unwrap().is_none());
    }
}
