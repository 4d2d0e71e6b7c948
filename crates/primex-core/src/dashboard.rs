//! Read-only views over the collections: counts, recent activity, and the
//! per-page recent lists.

use crate::error::Result;
use crate::model::{
    ActivityEntry, DashboardStats, Event, GraphicDesign, PortfolioKind, DESIGN_CATEGORIES,
};
use crate::portfolio::PortfolioStore;

/// Events listed under the event form.
pub const RECENT_EVENTS: usize = 3;
/// Designs listed under the design form.
pub const RECENT_DESIGNS: usize = 8;
/// Entries in the dashboard activity feed.
pub const RECENT_ACTIVITY: usize = 5;

/// Count every collection. Corrupt collections count as empty.
pub async fn collect_stats(portfolio: &PortfolioStore) -> Result<DashboardStats> {
    let web_projects = portfolio.get_web_projects().await?.len();
    let events = portfolio.get_events().await?.len();
    let graphic_designs = portfolio.get_graphic_designs().await?.len();
    Ok(DashboardStats::new(web_projects, events, graphic_designs))
}

/// Latest records across all collections, newest first.
pub async fn recent_activity(portfolio: &PortfolioStore, limit: usize) -> Result<Vec<ActivityEntry>> {
    let mut entries: Vec<ActivityEntry> = Vec::new();

    entries.extend(portfolio.get_web_projects().await?.into_iter().map(|p| ActivityEntry {
        kind: PortfolioKind::WebProjects,
        id: p.id,
        title: p.title,
        created_at: p.created_at,
    }));
    entries.extend(portfolio.get_events().await?.into_iter().map(|e| ActivityEntry {
        kind: PortfolioKind::Events,
        id: e.id,
        title: e.name,
        created_at: e.created_at,
    }));
    entries.extend(portfolio.get_graphic_designs().await?.into_iter().map(|d| ActivityEntry {
        kind: PortfolioKind::GraphicDesigns,
        id: d.id,
        title: d.title,
        created_at: d.created_at,
    }));

    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    entries.truncate(limit);
    Ok(entries)
}

/// The last `limit` events, newest first.
pub async fn recent_events(portfolio: &PortfolioStore, limit: usize) -> Result<Vec<Event>> {
    Ok(newest_first(portfolio.get_events().await?, limit))
}

/// The last `limit` designs, newest first.
pub async fn recent_designs(portfolio: &PortfolioStore, limit: usize) -> Result<Vec<GraphicDesign>> {
    Ok(newest_first(portfolio.get_graphic_designs().await?, limit))
}

/// Number of designs in each known category, in category order.
/// Designs with a category outside the list are not counted.
pub fn design_category_counts(designs: &[GraphicDesign]) -> Vec<(&'static str, usize)> {
    DESIGN_CATEGORIES
        .iter()
        .map(|&category| {
            let count = designs.iter().filter(|d| d.category == category).count();
            (category, count)
        })
        .collect()
}

// Collections are append-only, so insertion order is creation order.
fn newest_first<T>(items: Vec<T>, limit: usize) -> Vec<T> {
    items.into_iter().rev().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::model::WebProject;
    use crate::storage::{keys, KeyValueStore, MemoryStore, Store};

    fn portfolio() -> PortfolioStore {
        PortfolioStore::new(Arc::new(Store::Memory(MemoryStore::new())))
    }

    fn design(title: &str, category: &str) -> GraphicDesign {
        GraphicDesign::new(title.into(), category.into(), format!("{title}.png"))
    }

    #[tokio::test]
    async fn test_stats_on_empty_store() {
        let stats = collect_stats(&portfolio()).await.unwrap();
        assert_eq!(stats, DashboardStats::default());
    }

    #[tokio::test]
    async fn test_stats_counts_and_total() {
        let p = portfolio();
        p.save_web_project(&WebProject::new("a".into(), "l".into(), "i".into(), "d".into()))
            .await
            .unwrap();
        p.save_graphic_design(&design("logo", "Logos")).await.unwrap();
        p.save_graphic_design(&design("shirt", "T-Shirt Design")).await.unwrap();

        let stats = collect_stats(&p).await.unwrap();
        assert_eq!(stats.web_projects, 1);
        assert_eq!(stats.events, 0);
        assert_eq!(stats.graphic_designs, 2);
        assert_eq!(stats.total_projects, 3);
    }

    #[tokio::test]
    async fn test_stats_treat_corrupt_as_empty() {
        let p = portfolio();
        p.store().set(keys::EVENTS, "{not json").await.unwrap();
        let stats = collect_stats(&p).await.unwrap();
        assert_eq!(stats.events, 0);
    }

    #[tokio::test]
    async fn test_recent_activity_newest_first_across_kinds() {
        let p = portfolio();
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();

        let old = WebProject::new("old site".into(), "l".into(), "i".into(), "d".into())
            .with_created_at(base);
        let newer = design("poster", "Print Design").with_created_at(base + Duration::hours(2));
        let middle = Event::new(
            "gala".into(),
            "Social Events".into(),
            "d".into(),
            "2024-05-01".into(),
        )
        .with_created_at(base + Duration::hours(1));

        p.save_web_project(&old).await.unwrap();
        p.save_graphic_design(&newer).await.unwrap();
        p.save_event(&middle).await.unwrap();

        let activity = recent_activity(&p, 2).await.unwrap();
        let titles: Vec<&str> = activity.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["poster", "gala"]);
        assert_eq!(activity[0].action(), "Graphic design uploaded");
    }

    #[tokio::test]
    async fn test_recent_designs_limit_and_order() {
        let p = portfolio();
        for i in 0..10 {
            p.save_graphic_design(&design(&format!("d{i}"), "Logos"))
                .await
                .unwrap();
        }
        let recent = recent_designs(&p, RECENT_DESIGNS).await.unwrap();
        assert_eq!(recent.len(), 8);
        assert_eq!(recent[0].title, "d9");
        assert_eq!(recent[7].title, "d2");
    }

    #[tokio::test]
    async fn test_recent_events_fewer_than_limit() {
        let p = portfolio();
        let e = Event::new("one".into(), "Weddings".into(), "d".into(), "2024-01-01".into());
        p.save_event(&e).await.unwrap();
        let recent = recent_events(&p, RECENT_EVENTS).await.unwrap();
        assert_eq!(recent.len(), 1);
    }

    #[test]
    fn test_design_category_counts() {
        let designs = vec![
            design("a", "Logos"),
            design("b", "Logos"),
            design("c", "Print Design"),
            design("d", "Murals"),
        ];
        let counts = design_category_counts(&designs);
        assert_eq!(counts.len(), DESIGN_CATEGORIES.len());
        assert_eq!(counts[0], ("Logos", 2));
        assert!(counts.contains(&("Print Design", 1)));
        assert!(counts.contains(&("Social Media Posts", 0)));
    }
}
