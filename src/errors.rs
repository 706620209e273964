//! # Error Handling Module
//!
//! ## Purpose
//! Centralized error handling for the product search service, providing
//! structured error types and conversion utilities for all system components.
//!
//! ## Input/Output Specification
//! - **Input**: Error conditions from corpus loading, catalog access,
//!   classification, indexing, and the HTTP layer
//! - **Output**: Structured error types with context
//! - **Error Categories**: Training, Index, Validation, Catalog, Config, API
//!
//! ## Key Features
//! - Hierarchical error types with detailed context
//! - Automatic conversion from io/sled/bincode/toml errors
//! - Error categories for structured logging

use thiserror::Error;

/// Result type used throughout the application
pub type Result<T> = std::result::Result<T, SearchError>;

/// Error types for the product search service
#[derive(Debug, Error)]
pub enum SearchError {
    // Training errors: the classifier stays unusable, fatal at startup.
    #[error("Training corpus unreadable at '{directory}': {reason}")]
    CorpusUnreadable { directory: String, reason: String },

    #[error("Training corpus at '{directory}' contains no documents")]
    EmptyCorpus { directory: String },

    #[error("Training set holds no documents for any category")]
    EmptyTrainingSet,

    #[error("Unrecognized category label '{label}'")]
    UnknownLabel { label: String },

    // Index errors
    #[error("Catalog index build failed: {reason}")]
    IndexBuild { reason: String },

    // Query validation errors
    #[error("Validation failed for parameter '{field}': {reason}")]
    ValidationFailed { field: String, reason: String },

    // Catalog store errors
    #[error("Catalog store error: {reason}")]
    Catalog { reason: String },

    #[error("Serialization failed: {reason}")]
    SerializationFailed { reason: String },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Internal system errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl SearchError {
    /// Get error category for metrics and logging
    pub fn category(&self) -> &'static str {
        match self {
            SearchError::CorpusUnreadable { .. }
            | SearchError::EmptyCorpus { .. }
            | SearchError::EmptyTrainingSet
            | SearchError::UnknownLabel { .. } => "training",
            SearchError::IndexBuild { .. } => "index",
            SearchError::ValidationFailed { .. } => "validation",
            SearchError::Catalog { .. } | SearchError::SerializationFailed { .. } => "catalog",
            SearchError::Config { .. } => "configuration",
            SearchError::Internal { .. } => "internal",
        }
    }

    /// Whether the error is a caller-input problem rather than a system fault.
    ///
    /// Validation failures are rejected immediately with no retry; everything
    /// else is data unavailability and fatal at startup.
    pub fn is_client_error(&self) -> bool {
        matches!(self, SearchError::ValidationFailed { .. })
    }
}

// Conversion from common error types
impl From<std::io::Error> for SearchError {
    fn from(err: std::io::Error) -> Self {
        SearchError::Internal {
            message: format!("IO error: {}", err),
        }
    }
}

impl From<sled::Error> for SearchError {
    fn from(err: sled::Error) -> Self {
        SearchError::Catalog {
            reason: err.to_string(),
        }
    }
}

impl From<bincode::Error> for SearchError {
    fn from(err: bincode::Error) -> Self {
        SearchError::SerializationFailed {
            reason: format!("Binary serialization error: {}", err),
        }
    }
}

impl From<toml::de::Error> for SearchError {
    fn from(err: toml::de::Error) -> Self {
        SearchError::Config {
            message: format!("TOML parse error: {}", err),
        }
    }
}
