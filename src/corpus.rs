//! # Training Corpus Module
//!
//! ## Purpose
//! Loads labeled training documents from a directory of plain-text files.
//! Each file is named after a category label and holds one example document
//! per line; lines are whitespace-tokenized.
//!
//! ## Input/Output Specification
//! - **Input**: Corpus directory path
//! - **Output**: [`TrainingCorpus`] mapping categories to token sequences
//! - **Unrecognized labels**: logged and skipped, never silently turned into
//!   new categories; the label mapping itself is fallible
//!
//! ## Key Features
//! - One file per category, one document per line
//! - Loud handling of label mismatches (latent-data problem, not a crash)
//! - Empty or unreadable corpus directories surface as training errors

use crate::category::Category;
use crate::classifier::TrainingCorpus;
use crate::errors::{Result, SearchError};
use std::fs;
use std::path::Path;

/// Read the training corpus from a directory of label-named files.
///
/// Fails if the directory cannot be read or yields no documents at all; a
/// file whose name is not a known category label is skipped with a warning.
pub fn load_corpus<P: AsRef<Path>>(directory: P) -> Result<TrainingCorpus> {
    let directory = directory.as_ref();

    let entries = fs::read_dir(directory).map_err(|e| SearchError::CorpusUnreadable {
        directory: directory.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut corpus = TrainingCorpus::new();
    let mut document_count = 0usize;

    for entry in entries {
        let entry = entry.map_err(|e| SearchError::CorpusUnreadable {
            directory: directory.display().to_string(),
            reason: e.to_string(),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let label = entry.file_name().to_string_lossy().to_string();
        let category = match label.parse::<Category>() {
            Ok(category) => category,
            Err(_) => {
                tracing::warn!(label = %label, "skipping corpus file with unknown label");
                continue;
            }
        };

        let content = fs::read_to_string(&path).map_err(|e| SearchError::CorpusUnreadable {
            directory: directory.display().to_string(),
            reason: format!("{}: {}", path.display(), e),
        })?;

        let documents: Vec<Vec<String>> = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.split_whitespace().map(str::to_string).collect())
            .collect();

        document_count += documents.len();
        tracing::debug!(category = %category, documents = documents.len(), "loaded corpus file");
        corpus.entry(category).or_default().extend(documents);
    }

    if document_count == 0 {
        return Err(SearchError::EmptyCorpus {
            directory: directory.display().to_string(),
        });
    }

    tracing::info!(
        categories = corpus.len(),
        documents = document_count,
        "training corpus loaded"
    );
    Ok(corpus)
}
