//! # Catalog Store Module
//!
//! ## Purpose
//! Persistent item repository backed by an embedded sled database. This is
//! the authoritative source of catalog items; the category index is only a
//! cache over it.
//!
//! ## Input/Output Specification
//! - **Input**: Item records (name, latitude, longitude)
//! - **Output**: Insertion-ordered read-all enumeration, item counts
//! - **Storage**: bincode-serialized records under monotonically increasing keys
//!
//! ## Key Features
//! - Insertion order preserved via big-endian sequence keys
//! - Mid-scan failures surface per record so callers can abort cleanly
//! - Health check exercising a real write/read/delete cycle

use crate::config::CatalogConfig;
use crate::errors::{Result, SearchError};
use crate::Item;

/// Sled-backed catalog repository.
pub struct CatalogStore {
    config: CatalogConfig,
    db: sled::Db,
    items_tree: sled::Tree,
    health_tree: sled::Tree,
}

impl CatalogStore {
    /// Open (or create) the catalog database.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        if let Some(parent) = config.db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = sled::open(&config.db_path).map_err(|e| SearchError::Catalog {
            reason: format!("failed to open {}: {}", config.db_path.display(), e),
        })?;

        let items_tree = db.open_tree("items").map_err(|e| SearchError::Catalog {
            reason: format!("failed to open items tree: {}", e),
        })?;

        // Health-check writes get their own tree: the items tree holds nothing but
        // bincode item records, so enumeration and counts stay trustworthy.
        let health_tree = db.open_tree("health").map_err(|e| SearchError::Catalog {
            reason: format!("failed to open health tree: {}", e),
        })?;

        tracing::info!(
            path = %config.db_path.display(),
            items = items_tree.len(),
            "catalog store opened"
        );

        Ok(Self {
            config,
            db,
            items_tree,
            health_tree,
        })
    }

    /// Append one item to the catalog.
    pub fn insert_item(&self, item: &Item) -> Result<u64> {
        let id = self.db.generate_id()?;
        let value = bincode::serialize(item)?;
        // Big-endian keys keep sled's lexicographic iteration in insertion order.
        self.items_tree.insert(id.to_be_bytes(), value)?;
        tracing::debug!(id, name = %item.name, "stored catalog item");
        Ok(id)
    }

    /// Append a batch of items, returning how many were stored.
    pub fn insert_items(&self, items: &[Item]) -> Result<usize> {
        for item in items {
            self.insert_item(item)?;
        }
        self.db.flush()?;
        Ok(items.len())
    }

    /// Enumerate all items in insertion order.
    ///
    /// Each record is fallible: a corrupt row or a failing scan yields an
    /// error for that record instead of a silent gap.
    pub fn iter_items(&self) -> impl Iterator<Item = Result<Item>> + '_ {
        self.items_tree.iter().map(|record| {
            let (_, value) = record.map_err(SearchError::from)?;
            let item: Item = bincode::deserialize(&value)?;
            Ok(item)
        })
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.items_tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items_tree.is_empty()
    }

    /// Verify the store can serve reads and writes.
    ///
    /// Writes to a dedicated tree so concurrent item enumeration never
    /// observes the sentinel record.
    pub fn health_check(&self) -> Result<()> {
        let test_key = b"health_check";
        self.health_tree.insert(test_key, b"ok".as_slice())?;
        let read_back = self.health_tree.get(test_key)?;
        self.health_tree.remove(test_key)?;

        if read_back.is_none() {
            return Err(SearchError::Catalog {
                reason: format!(
                    "health check value not found in {}",
                    self.config.db_path.display()
                ),
            });
        }
        Ok(())
    }
}
