//! # Product Search Server Driver
//!
//! ## Purpose
//! Main entry point for the product search server. Loads configuration,
//! trains the classifier and builds the category index up front, and starts
//! the HTTP server.
//!
//! ## Input/Output Specification
//! - **Input**: Configuration file, command line arguments, environment
//!   variables
//! - **Output**: Running web server with search API endpoints
//! - **Startup**: Training or index-build failure is fatal; the server never
//!   serves queries without a trained model
//!
//! ## Architecture Flow
//! 1. Parse command line arguments and load configuration
//! 2. Initialize logging and tracing
//! 3. Open the catalog store (optionally seeding demo items)
//! 4. Train the classifier and build the category index
//! 5. Start the HTTP server and wait for shutdown signals

use clap::{Arg, Command};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use product_category_search::{
    api::ApiServer,
    config::Config,
    errors::{Result, SearchError},
    AppState, CatalogStore, Item, SearchService,
};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("category-search-server")
        .version("0.1.0")
        .about("Category-classifying product search with proximity ranking")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config.toml"),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Server port")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("seed-demo")
                .long("seed-demo")
                .help("Seed the catalog with demo items before starting")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("check-health")
                .long("check-health")
                .help("Run startup checks and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let config_path = matches.get_one::<String>("config").unwrap();
    let mut config = Config::from_file(config_path)?;

    if let Some(port) = matches.get_one::<u16>("port") {
        config.server.port = *port;
    }

    let config = Arc::new(config);
    init_logging(&config)?;

    info!("Starting product search server");
    info!("Configuration loaded from: {}", config_path);

    let catalog = Arc::new(CatalogStore::new(config.catalog.clone())?);

    if matches.get_flag("seed-demo") {
        let seeded = catalog.insert_items(&demo_items())?;
        info!("Seeded {} demo items into the catalog", seeded);
    }

    let service = Arc::new(SearchService::new(config.clone(), catalog));

    if matches.get_flag("check-health") {
        service.health_check()?;
        service.warm_up().await?;
        info!("All startup checks passed");
        return Ok(());
    }

    // Eager build: a missing corpus or unreadable catalog must abort here,
    // not surface per-request after the listener is already up.
    service.warm_up().await?;
    info!("Classifier trained and category index built");

    let app_state = AppState {
        config: config.clone(),
        service,
    };

    // Bind first: the returned server handle is Send and can be driven on a
    // spawned task while the main task waits for shutdown signals.
    let server = ApiServer::new(app_state).bind()?;
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.await {
            error!("Server error: {}", e);
        }
    });

    info!(
        "Product search server listening on {}:{}",
        config.server.host, config.server.port
    );

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = server_handle => {
            warn!("Server stopped unexpectedly");
        }
    }

    info!("Product search server shut down");
    Ok(())
}

/// Initialize logging and tracing
fn init_logging(config: &Config) -> Result<()> {
    let filter =
        EnvFilter::try_new(&config.logging.level).map_err(|_| SearchError::Config {
            message: format!("Invalid log level: {}", config.logging.level),
        })?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!("Logging initialized with level: {}", config.logging.level);
    Ok(())
}

/// Small demo catalog standing in for a pre-populated item repository.
fn demo_items() -> Vec<Item> {
    let rows: [(&str, f64, f64); 8] = [
        ("DJI Mavic Drone", 52.52, 13.40),
        ("FPV Racing Drone", 52.49, 13.37),
        ("Bose Bluetooth Speaker", 52.51, 13.42),
        ("Shure Microphone", 52.53, 13.38),
        ("Canon EOS Camera", 52.50, 13.41),
        ("Epson Projector", 52.48, 13.35),
        ("Pioneer DJ Controller", 52.54, 13.43),
        ("Cargo Bike Trailer", 52.47, 13.39),
    ];
    rows.iter()
        .map(|(name, lat, lng)| Item {
            name: name.to_string(),
            latitude: *lat,
            longitude: *lng,
        })
        .collect()
}
