//! # Configuration Management Module
//!
//! ## Purpose
//! Centralized configuration for the product search service, supporting TOML
//! files and environment variable overrides with validation and type-safe
//! access to all system settings.
//!
//! ## Input/Output Specification
//! - **Input**: Configuration files (TOML), environment variables
//! - **Output**: Validated configuration structs with defaults and overrides
//! - **Validation**: Range checks with detailed error messages
//!
//! ## Configuration Sources (in order of precedence)
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values

use crate::errors::{Result, SearchError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure containing all system settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server and API configuration
    pub server: ServerConfig,
    /// Training corpus settings
    pub corpus: CorpusConfig,
    /// Catalog store settings
    pub catalog: CatalogConfig,
    /// Search behavior
    pub search: SearchConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server and API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address
    pub host: String,
    /// Server port
    pub port: u16,
}

/// Training corpus configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Directory of label-named training files, one document per line
    pub directory: PathBuf,
}

/// Catalog store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Sled database path for the item repository
    pub db_path: PathBuf,
}

/// Search behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of results returned per query
    pub result_limit: usize,
    /// Laplace smoothing factor for the classifier
    pub smoothing_alpha: f64,
    /// Maximum accepted search term length in characters
    pub max_term_length: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::from_file("config.toml")
    }

    /// Load configuration from a specific file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| SearchError::Config {
                message: format!("Failed to read config file {:?}: {}", path, e),
            })?;
            toml::from_str(&content).map_err(|e| SearchError::Config {
                message: format!("Failed to parse config file {:?}: {}", path, e),
            })?
        } else {
            tracing::warn!("Configuration file not found: {:?}, using defaults", path);
            Self::default()
        };

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("PRODUCT_SEARCH_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("PRODUCT_SEARCH_PORT") {
            self.server.port = port.parse().map_err(|_| SearchError::Config {
                message: "Invalid port number in PRODUCT_SEARCH_PORT".to_string(),
            })?;
        }
        if let Ok(corpus_dir) = std::env::var("PRODUCT_SEARCH_CORPUS_DIR") {
            self.corpus.directory = PathBuf::from(corpus_dir);
        }
        if let Ok(db_path) = std::env::var("PRODUCT_SEARCH_DB_PATH") {
            self.catalog.db_path = PathBuf::from(db_path);
        }
        Ok(())
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(SearchError::Config {
                message: "server.port cannot be zero".to_string(),
            });
        }
        if self.search.result_limit == 0 {
            return Err(SearchError::Config {
                message: "search.result_limit must be greater than zero".to_string(),
            });
        }
        if self.search.smoothing_alpha <= 0.0 {
            return Err(SearchError::Config {
                message: "search.smoothing_alpha must be positive".to_string(),
            });
        }
        if self.search.max_term_length == 0 {
            return Err(SearchError::Config {
                message: "search.max_term_length must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            corpus: CorpusConfig {
                directory: PathBuf::from("./classification"),
            },
            catalog: CatalogConfig {
                db_path: PathBuf::from("./data/catalog.db"),
            },
            search: SearchConfig {
                result_limit: 20,
                smoothing_alpha: 1.0,
                max_term_length: 200,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}
