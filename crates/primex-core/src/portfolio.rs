//! Collection-level persistence for the three portfolio entity types.
//!
//! Each collection lives as one JSON array under a fixed key. Reads load the
//! whole array; saves read, append and rewrite it.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::{PrimexError, Result};
use crate::model::*;
use crate::storage::{KeyValueStore, Store};

/// Outcome of reading a collection, keeping "absent" and "unreadable" apart.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionState<T> {
    /// Nothing stored under the key yet.
    Missing,
    /// A value is stored but does not parse as a collection.
    Corrupt { reason: String },
    Loaded(Vec<T>),
}

/// Serializable tag for [`CollectionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionStatus {
    Missing,
    Corrupt,
    Loaded,
}

impl std::fmt::Display for CollectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "missing"),
            Self::Corrupt => write!(f, "corrupt"),
            Self::Loaded => write!(f, "loaded"),
        }
    }
}

impl<T> CollectionState<T> {
    pub fn status(&self) -> CollectionStatus {
        match self {
            Self::Missing => CollectionStatus::Missing,
            Self::Corrupt { .. } => CollectionStatus::Corrupt,
            Self::Loaded(_) => CollectionStatus::Loaded,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Loaded(items) => items.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Items, with missing and corrupt collections both read as empty.
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Loaded(items) => items,
            _ => Vec::new(),
        }
    }
}

/// Persistence adapter for the portfolio collections.
///
/// Saves within one process are serialized so two concurrent requests cannot
/// both read the old array and drop each other's record. Separate processes
/// sharing the same database still race (last write wins).
pub struct PortfolioStore {
    store: Arc<Store>,
    write_lock: Mutex<()>,
}

impl PortfolioStore {
    pub fn new(store: Arc<Store>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    // -- Web projects --

    pub async fn load_web_projects(&self) -> Result<CollectionState<WebProject>> {
        self.load(PortfolioKind::WebProjects.storage_key()).await
    }

    pub async fn get_web_projects(&self) -> Result<Vec<WebProject>> {
        self.get(PortfolioKind::WebProjects.storage_key()).await
    }

    pub async fn save_web_project(&self, project: &WebProject) -> Result<usize> {
        self.append(PortfolioKind::WebProjects.storage_key(), project).await
    }

    // -- Events --

    pub async fn load_events(&self) -> Result<CollectionState<Event>> {
        self.load(PortfolioKind::Events.storage_key()).await
    }

    pub async fn get_events(&self) -> Result<Vec<Event>> {
        self.get(PortfolioKind::Events.storage_key()).await
    }

    pub async fn save_event(&self, event: &Event) -> Result<usize> {
        self.append(PortfolioKind::Events.storage_key(), event).await
    }

    // -- Graphic designs --

    pub async fn load_graphic_designs(&self) -> Result<CollectionState<GraphicDesign>> {
        self.load(PortfolioKind::GraphicDesigns.storage_key()).await
    }

    pub async fn get_graphic_designs(&self) -> Result<Vec<GraphicDesign>> {
        self.get(PortfolioKind::GraphicDesigns.storage_key()).await
    }

    pub async fn save_graphic_design(&self, design: &GraphicDesign) -> Result<usize> {
        self.append(PortfolioKind::GraphicDesigns.storage_key(), design).await
    }

    /// Status of a collection without caring about its item type.
    pub async fn status(&self, kind: PortfolioKind) -> Result<(CollectionStatus, usize)> {
        let (status, len) = match kind {
            PortfolioKind::WebProjects => {
                let s = self.load_web_projects().await?;
                (s.status(), s.len())
            }
            PortfolioKind::Events => {
                let s = self.load_events().await?;
                (s.status(), s.len())
            }
            PortfolioKind::GraphicDesigns => {
                let s = self.load_graphic_designs().await?;
                (s.status(), s.len())
            }
        };
        Ok((status, len))
    }

    // -- helpers --

    async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<CollectionState<T>> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(CollectionState::Missing);
        };
        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(items) => Ok(CollectionState::Loaded(items)),
            Err(e) => Ok(CollectionState::Corrupt {
                reason: e.to_string(),
            }),
        }
    }

    async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        let state = self.load(key).await?;
        if let CollectionState::Corrupt { ref reason } = state {
            tracing::warn!(key, %reason, "collection is unreadable, treating as empty");
        }
        Ok(state.into_items())
    }

    /// Append one item and rewrite the whole array. Returns the new length.
    async fn append<T>(&self, key: &str, item: &T) -> Result<usize>
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        let _guard = self.write_lock.lock().await;

        let mut items: Vec<T> = match self.load(key).await? {
            CollectionState::Missing => Vec::new(),
            CollectionState::Loaded(items) => items,
            CollectionState::Corrupt { reason } => {
                return Err(PrimexError::CorruptCollection {
                    key: key.to_string(),
                    reason,
                });
            }
        };
        items.push(item.clone());

        let serialized = serde_json::to_string(&items)?;
        self.store.set(key, &serialized).await?;
        tracing::debug!(key, len = items.len(), "collection saved");
        Ok(items.len())
    }
}
