//! # Product Category Search
//!
//! ## Overview
//! This library implements a product-search service that classifies free-text
//! product names into a fixed set of category labels with a naive-Bayes text
//! classifier, then ranks the predicted category's catalog bucket against the
//! query by substring containment and great-circle proximity.
//!
//! ## Architecture
//! The system is composed of several key modules:
//! - `category`: Closed enumeration of product-domain labels
//! - `corpus`: Training-document loading from label-named files
//! - `classifier`: Naive-Bayes training and log-likelihood classification
//! - `index`: One-time catalog partition into per-category buckets
//! - `ranker`: Containment-then-distance ranking with bounded results
//! - `catalog`: Sled-backed item repository
//! - `service`: Lazily-initialized, single-flight pipeline facade
//! - `api`: HTTP endpoints and query validation
//! - `config`: Configuration management and settings
//! - `errors`: Centralized error handling and types
//!
//! ## Input/Output Specification
//! - **Input**: Labeled training corpus, catalog items, search queries
//! - **Output**: Ranked item names, at most the configured result limit
//! - **Determinism**: Fixed model + fixed input always yields the same result
//!
//! ## Usage
//! ```rust,no_run
//! use std::sync::Arc;
//! use product_category_search::{CatalogStore, Config, Query, SearchService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Arc::new(Config::from_file("config.toml")?);
//!     let catalog = Arc::new(CatalogStore::new(config.catalog.clone())?);
//!     let service = SearchService::new(config, catalog);
//!     let results = service
//!         .search(&Query {
//!             term: "drone".to_string(),
//!             latitude: 1.0,
//!             longitude: 1.0,
//!         })
//!         .await?;
//!     println!("Found {} results", results.len());
//!     Ok(())
//! }
//! ```

// Core modules
pub mod category;
pub mod classifier;
pub mod corpus;
pub mod index;
pub mod ranker;

// Collaborators
pub mod api;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod service;

// Re-exports for convenience
pub use catalog::CatalogStore;
pub use category::Category;
pub use classifier::{TrainedModel, TrainingCorpus};
pub use config::Config;
pub use errors::{Result, SearchError};
pub use index::CategoryIndex;
pub use service::SearchService;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One catalog entry; immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Product name as stored in the catalog
    pub name: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

/// A validated search request: exactly one term and one coordinate pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Non-empty search term
    pub term: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

/// Application state shared across request handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub service: Arc<SearchService>,
}
