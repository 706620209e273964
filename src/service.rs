//! # Search Service Module
//!
//! ## Purpose
//! Facade owning the lazily-initialized singletons (trained model, category
//! index) and orchestrating the classify-then-rank pipeline for each query.
//!
//! ## Input/Output Specification
//! - **Input**: Validated queries; corpus and catalog collaborators
//! - **Output**: Ranked item names, bounded by the configured result limit
//! - **Initialization**: Lazy, once-only, single-flight; concurrent first
//!   callers wait on the in-flight build instead of racing to rebuild
//!
//! ## Key Features
//! - Explicitly owned caches instead of ambient process-wide state
//! - Model and index are immutable after build: concurrent classify/rank
//!   calls need no locking
//! - A failed build is not cached; the next caller retries

use crate::catalog::CatalogStore;
use crate::category::Category;
use crate::classifier::TrainedModel;
use crate::config::Config;
use crate::corpus;
use crate::errors::Result;
use crate::index::CategoryIndex;
use crate::ranker;
use crate::Query;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Classify-and-rank pipeline with process-lifetime caches.
pub struct SearchService {
    config: Arc<Config>,
    catalog: Arc<CatalogStore>,
    model: OnceCell<Arc<TrainedModel>>,
    index: OnceCell<Arc<CategoryIndex>>,
}

/// Service statistics for the stats endpoint.
#[derive(Debug, Serialize)]
pub struct ServiceStats {
    pub catalog_items: usize,
    pub model_trained: bool,
    pub vocabulary_size: Option<usize>,
    pub index_built: bool,
    pub indexed_items: Option<usize>,
    pub bucket_sizes: Option<HashMap<&'static str, usize>>,
}

impl SearchService {
    pub fn new(config: Arc<Config>, catalog: Arc<CatalogStore>) -> Self {
        Self {
            config,
            catalog,
            model: OnceCell::new(),
            index: OnceCell::new(),
        }
    }

    /// The trained model, training it on first use.
    ///
    /// Single-flight: at most one training run happens regardless of how many
    /// callers arrive concurrently; repeated calls return the cached model.
    pub async fn model(&self) -> Result<Arc<TrainedModel>> {
        let model = self
            .model
            .get_or_try_init(|| async {
                let corpus = corpus::load_corpus(&self.config.corpus.directory)?;
                TrainedModel::train(&corpus, self.config.search.smoothing_alpha).map(Arc::new)
            })
            .await?;
        Ok(Arc::clone(model))
    }

    /// The category index, building it from a full catalog scan on first use.
    pub async fn index(&self) -> Result<Arc<CategoryIndex>> {
        let model = self.model().await?;
        let index = self
            .index
            .get_or_try_init(|| async {
                CategoryIndex::build(self.catalog.iter_items(), &model).map(Arc::new)
            })
            .await?;
        Ok(Arc::clone(index))
    }

    /// Classify the query term, then rank its bucket by containment and
    /// proximity. The query is assumed well-formed (gateway-validated).
    pub async fn search(&self, query: &Query) -> Result<Vec<String>> {
        let model = self.model().await?;
        let index = self.index().await?;

        let category = model.classify(&query.term);
        let bucket = index.bucket(category);
        tracing::debug!(
            term = %query.term,
            category = %category,
            candidates = bucket.len(),
            "ranking bucket"
        );

        Ok(ranker::rank(bucket, query, self.config.search.result_limit))
    }

    /// Force both lazy builds now. Called at startup so a broken corpus or
    /// catalog is fatal before the listener starts serving.
    pub async fn warm_up(&self) -> Result<()> {
        self.index().await.map(|_| ())
    }

    /// Health check: catalog reachable and, once built, caches present.
    pub fn health_check(&self) -> Result<()> {
        self.catalog.health_check()
    }

    pub fn stats(&self) -> ServiceStats {
        let model = self.model.get();
        let index = self.index.get();
        ServiceStats {
            catalog_items: self.catalog.len(),
            model_trained: model.is_some(),
            vocabulary_size: model.map(|m| m.vocabulary_size()),
            index_built: index.is_some(),
            indexed_items: index.map(|i| i.len()),
            bucket_sizes: index.map(|i| i.bucket_sizes()),
        }
    }

    /// Classify arbitrary text with the cached model (trains on first use).
    pub async fn classify(&self, text: &str) -> Result<Category> {
        Ok(self.model().await?.classify(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CatalogConfig, Config, CorpusConfig};
    use crate::Item;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn fixture(dir: &TempDir) -> SearchService {
        let corpus_dir = dir.path().join("classification");
        fs::create_dir_all(&corpus_dir).unwrap();
        fs::write(corpus_dir.join("Drones"), "drone\nquadcopter\n").unwrap();
        fs::write(corpus_dir.join("Audio"), "speaker\nmicrophone\n").unwrap();
        fs::write(corpus_dir.join("Party"), "balloon\nconfetti\n").unwrap();

        let mut config = Config::default();
        config.corpus = CorpusConfig {
            directory: corpus_dir,
        };
        config.catalog = CatalogConfig {
            db_path: PathBuf::from(dir.path()).join("catalog.db"),
        };
        let config = Arc::new(config);

        let catalog = Arc::new(CatalogStore::new(config.catalog.clone()).unwrap());
        catalog
            .insert_items(&[
                Item {
                    name: "DJI Drone".to_string(),
                    latitude: 1.0,
                    longitude: 1.0,
                },
                Item {
                    name: "Bose Speaker".to_string(),
                    latitude: 2.0,
                    longitude: 2.0,
                },
            ])
            .unwrap();

        SearchService::new(config, catalog)
    }

    #[tokio::test]
    async fn test_search_routes_to_the_predicted_bucket() {
        let dir = TempDir::new().unwrap();
        let service = fixture(&dir);

        let results = service
            .search(&Query {
                term: "drone".to_string(),
                latitude: 1.0,
                longitude: 1.0,
            })
            .await
            .unwrap();
        assert_eq!(results, vec!["DJI Drone"]);
    }

    #[tokio::test]
    async fn test_model_is_trained_exactly_once() {
        let dir = TempDir::new().unwrap();
        let service = Arc::new(fixture(&dir));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move { service.model().await.unwrap() }));
        }

        let mut models = Vec::new();
        for handle in handles {
            models.push(handle.await.unwrap());
        }
        // Every concurrent first-caller observes the same cached instance.
        for model in &models[1..] {
            assert!(Arc::ptr_eq(&models[0], model));
        }
    }

    #[tokio::test]
    async fn test_index_is_built_exactly_once() {
        let dir = TempDir::new().unwrap();
        let service = fixture(&dir);

        let first = service.index().await.unwrap();
        let second = service.index().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_empty_bucket_yields_empty_result() {
        let dir = TempDir::new().unwrap();
        let service = fixture(&dir);

        // "balloon" classifies to Party, which holds no catalog items.
        let category = service.classify("balloon").await.unwrap();
        assert_eq!(category, Category::Party);

        let results = service
            .search(&Query {
                term: "balloon".to_string(),
                latitude: 0.0,
                longitude: 0.0,
            })
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_non_containing_items_still_rank() {
        let dir = TempDir::new().unwrap();
        let service = fixture(&dir);

        // "quadcopter" routes to Drones; "DJI Drone" does not contain the
        // term but containment is a sort key, not a filter.
        let results = service
            .search(&Query {
                term: "quadcopter".to_string(),
                latitude: 0.0,
                longitude: 0.0,
            })
            .await
            .unwrap();
        assert_eq!(results, vec!["DJI Drone"]);
    }

    #[tokio::test]
    async fn test_warm_up_fails_on_missing_corpus() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.corpus.directory = dir.path().join("nope");
        config.catalog.db_path = dir.path().join("catalog.db");
        let config = Arc::new(config);
        let catalog = Arc::new(CatalogStore::new(config.catalog.clone()).unwrap());

        let service = SearchService::new(config, catalog);
        assert!(service.warm_up().await.is_err());
    }

    #[tokio::test]
    async fn test_stats_reflect_initialization() {
        let dir = TempDir::new().unwrap();
        let service = fixture(&dir);

        let before = service.stats();
        assert!(!before.model_trained);
        assert!(!before.index_built);
        assert_eq!(before.catalog_items, 2);

        service.warm_up().await.unwrap();
        let after = service.stats();
        assert!(after.model_trained);
        assert_eq!(after.indexed_items, Some(2));
    }
}
