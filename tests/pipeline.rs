//! End-to-end pipeline tests: corpus loading, training, catalog indexing,
//! and query ranking exercised together through the service facade.

use product_category_search::{
    CatalogStore, Category, Config, Item, Query, SearchService,
};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn item(name: &str, lat: f64, lng: f64) -> Item {
    Item {
        name: name.to_string(),
        latitude: lat,
        longitude: lng,
    }
}

fn query(term: &str, lat: f64, lng: f64) -> Query {
    Query {
        term: term.to_string(),
        latitude: lat,
        longitude: lng,
    }
}

fn build_service(dir: &TempDir, items: &[Item]) -> SearchService {
    let corpus_dir = dir.path().join("classification");
    fs::create_dir_all(&corpus_dir).unwrap();
    fs::write(corpus_dir.join("Drones"), "drone\nquadcopter\n").unwrap();
    fs::write(corpus_dir.join("Audio"), "speaker\nmicrophone\n").unwrap();

    let mut config = Config::default();
    config.corpus.directory = corpus_dir;
    config.catalog.db_path = dir.path().join("catalog.db");
    config.search.result_limit = 20;
    let config = Arc::new(config);

    let catalog = Arc::new(CatalogStore::new(config.catalog.clone()).unwrap());
    catalog.insert_items(items).unwrap();

    SearchService::new(config, catalog)
}

#[tokio::test]
async fn drone_query_returns_only_the_drone_item() {
    let dir = TempDir::new().unwrap();
    let service = build_service(
        &dir,
        &[item("DJI Drone", 1.0, 1.0), item("Bose Speaker", 2.0, 2.0)],
    );

    let results = service.search(&query("drone", 1.0, 1.0)).await.unwrap();
    assert_eq!(results, vec!["DJI Drone"]);
}

#[tokio::test]
async fn repeated_queries_are_deterministic() {
    let dir = TempDir::new().unwrap();
    let service = build_service(
        &dir,
        &[
            item("DJI Drone", 1.0, 1.0),
            item("Racing Drone", 3.0, 3.0),
            item("Bose Speaker", 2.0, 2.0),
        ],
    );

    let first = service.search(&query("drone", 0.0, 0.0)).await.unwrap();
    for _ in 0..5 {
        let again = service.search(&query("drone", 0.0, 0.0)).await.unwrap();
        assert_eq!(again, first);
    }
    assert_eq!(first, vec!["DJI Drone", "Racing Drone"]);
}

#[tokio::test]
async fn query_case_does_not_change_the_result() {
    let dir = TempDir::new().unwrap();
    let service = build_service(
        &dir,
        &[item("DJI Drone", 1.0, 1.0), item("Bose Speaker", 2.0, 2.0)],
    );

    let lower = service.search(&query("drone", 1.0, 1.0)).await.unwrap();
    let mixed = service.search(&query("Drone", 1.0, 1.0)).await.unwrap();
    let upper = service.search(&query("DRONE", 1.0, 1.0)).await.unwrap();
    assert_eq!(lower, mixed);
    assert_eq!(lower, upper);
}

#[tokio::test]
async fn results_are_capped_at_the_configured_limit() {
    let dir = TempDir::new().unwrap();
    let items: Vec<Item> = (0..30)
        .map(|i| item(&format!("Drone {}", i), i as f64 / 100.0, 0.0))
        .collect();
    let service = build_service(&dir, &items);

    let results = service.search(&query("drone", 0.0, 0.0)).await.unwrap();
    // Exactly the limit, not the historical limit + 1.
    assert_eq!(results.len(), 20);
}

#[tokio::test]
async fn nearer_items_rank_first_within_a_tier() {
    let dir = TempDir::new().unwrap();
    let service = build_service(
        &dir,
        &[item("Far Drone", 10.0, 10.0), item("Near Drone", 0.1, 0.1)],
    );

    let results = service.search(&query("drone", 0.0, 0.0)).await.unwrap();
    assert_eq!(results, vec!["Near Drone", "Far Drone"]);
}

#[tokio::test]
async fn classification_routes_each_item_to_one_bucket() {
    let dir = TempDir::new().unwrap();
    let service = build_service(
        &dir,
        &[
            item("DJI Drone", 1.0, 1.0),
            item("Bose Speaker", 2.0, 2.0),
            item("Shure Microphone", 3.0, 3.0),
        ],
    );

    let index = service.index().await.unwrap();
    assert_eq!(index.len(), 3);
    assert_eq!(index.bucket(Category::Drones).len(), 1);
    assert_eq!(index.bucket(Category::Audio).len(), 2);
}
