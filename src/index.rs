//! # Category Index Module
//!
//! ## Purpose
//! Materializes the catalog-to-category partition: every catalog item is
//! classified once and appended to the bucket for its predicted category.
//! The index is a cache over the catalog store, not a source of truth.
//!
//! ## Input/Output Specification
//! - **Input**: Catalog item enumeration, a trained classifier model
//! - **Output**: `Category → Vec<Item>` buckets, catalog order preserved
//! - **Performance**: O(1) bucket lookup after a single O(catalog) build
//!
//! ## Key Features
//! - Order-preserving, total partition (every item lands in exactly one bucket)
//! - Enumeration failures propagate; no partial index is ever returned
//! - Read-only after build, safe to share across concurrent requests

use crate::category::Category;
use crate::classifier::TrainedModel;
use crate::errors::{Result, SearchError};
use crate::Item;
use std::collections::HashMap;

/// Per-category buckets built from a full catalog scan.
#[derive(Debug)]
pub struct CategoryIndex {
    buckets: HashMap<Category, Vec<Item>>,
    total_items: usize,
}

impl CategoryIndex {
    /// Classify every catalog item and partition into buckets.
    ///
    /// The enumeration yields fallible records (the repository collaborator
    /// may fail mid-scan); any failure aborts the build so a partial index is
    /// never observed.
    pub fn build<I>(catalog: I, model: &TrainedModel) -> Result<Self>
    where
        I: IntoIterator<Item = Result<Item>>,
    {
        let mut buckets: HashMap<Category, Vec<Item>> = HashMap::new();
        let mut total_items = 0usize;

        for record in catalog {
            let item = record.map_err(|e| SearchError::IndexBuild {
                reason: e.to_string(),
            })?;
            let category = model.classify(&item.name);
            buckets.entry(category).or_default().push(item);
            total_items += 1;
        }

        tracing::info!(
            items = total_items,
            buckets = buckets.len(),
            "category index built"
        );

        Ok(Self {
            buckets,
            total_items,
        })
    }

    /// The (possibly empty) bucket for a category. Never fails.
    pub fn bucket(&self, category: Category) -> &[Item] {
        self.buckets
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of indexed items.
    pub fn len(&self) -> usize {
        self.total_items
    }

    pub fn is_empty(&self) -> bool {
        self.total_items == 0
    }

    /// Bucket sizes by category label, for the stats endpoint.
    pub fn bucket_sizes(&self) -> HashMap<&'static str, usize> {
        self.buckets
            .iter()
            .map(|(category, items)| (category.as_str(), items.len()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{TrainedModel, TrainingCorpus};

    fn model() -> TrainedModel {
        let mut corpus = TrainingCorpus::new();
        corpus.insert(
            Category::Drones,
            vec![vec!["drone".to_string()], vec!["quadcopter".to_string()]],
        );
        corpus.insert(
            Category::Audio,
            vec![vec!["speaker".to_string()], vec!["microphone".to_string()]],
        );
        TrainedModel::train(&corpus, 1.0).unwrap()
    }

    fn item(name: &str, lat: f64, lng: f64) -> Item {
        Item {
            name: name.to_string(),
            latitude: lat,
            longitude: lng,
        }
    }

    #[test]
    fn test_items_partition_into_buckets() {
        let model = model();
        let catalog = vec![
            Ok(item("DJI Drone", 1.0, 1.0)),
            Ok(item("Bose Speaker", 2.0, 2.0)),
            Ok(item("FPV Drone Kit", 3.0, 3.0)),
        ];

        let index = CategoryIndex::build(catalog, &model).unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index.bucket(Category::Drones).len(), 2);
        assert_eq!(index.bucket(Category::Audio).len(), 1);
    }

    #[test]
    fn test_bucket_order_follows_catalog_order() {
        let model = model();
        let catalog = vec![
            Ok(item("Racing Drone", 0.0, 0.0)),
            Ok(item("Camera Drone", 0.0, 0.0)),
            Ok(item("Mini Drone", 0.0, 0.0)),
        ];

        let index = CategoryIndex::build(catalog, &model).unwrap();
        let names: Vec<&str> = index
            .bucket(Category::Drones)
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(names, vec!["Racing Drone", "Camera Drone", "Mini Drone"]);
    }

    #[test]
    fn test_empty_bucket_is_valid() {
        let model = model();
        let index = CategoryIndex::build(vec![Ok(item("DJI Drone", 1.0, 1.0))], &model).unwrap();
        assert!(index.bucket(Category::Clothing).is_empty());
    }

    #[test]
    fn test_enumeration_failure_aborts_build() {
        let model = model();
        let catalog = vec![
            Ok(item("DJI Drone", 1.0, 1.0)),
            Err(SearchError::Catalog {
                reason: "simulated scan failure".to_string(),
            }),
        ];

        let err = CategoryIndex::build(catalog, &model).unwrap_err();
        assert!(matches!(err, SearchError::IndexBuild { .. }));
    }
}
