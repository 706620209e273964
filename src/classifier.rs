//! # Text Classifier Module
//!
//! ## Purpose
//! Supervised multi-class text classification over the fixed [`Category`]
//! enumeration using a multinomial naive-Bayes model: bag-of-words token
//! frequencies per category, Laplace smoothing, log-space scoring.
//!
//! ## Input/Output Specification
//! - **Input**: Labeled training documents (token sequences per category),
//!   then arbitrary free text to classify
//! - **Output**: An immutable [`TrainedModel`]; per-text `Category` predictions
//! - **Determinism**: Classification is a pure function of the trained model
//!   and the input text; score ties resolve to the category earliest in
//!   [`Category::ALL`]
//!
//! ## Key Features
//! - Log-likelihood scoring (no underflow from multiplying small probabilities)
//! - Laplace smoothing so unseen tokens degrade gracefully instead of erroring
//! - Case-normalized tokenization: case never affects the predicted category
//! - Classify-before-train is unrepresentable: `classify` lives on the model

use crate::category::Category;
use crate::errors::{Result, SearchError};
use regex::Regex;
use std::collections::HashMap;
use unicode_normalization::UnicodeNormalization;

/// Labeled training data: token sequences grouped by category.
pub type TrainingCorpus = HashMap<Category, Vec<Vec<String>>>;

/// Trained naive-Bayes model over the fixed category set.
///
/// Immutable after [`TrainedModel::train`]; concurrent `classify` calls
/// require no locking.
#[derive(Debug)]
pub struct TrainedModel {
    vocab: HashMap<String, usize>,
    vocab_size: usize,
    /// log P(token | category), flattened `[category priority * vocab_size + token]`
    token_log_probs: Vec<f64>,
    /// log P(category)
    priors: Vec<f64>,
    /// Smoothed log-probability for tokens never seen under a category
    unseen_log_probs: Vec<f64>,
    word_regex: Regex,
}

impl TrainedModel {
    /// Train a model from the corpus with the given Laplace smoothing factor.
    ///
    /// Fails with a training error if the corpus holds no documents at all; a
    /// category with no documents is still classifiable (uniform smoothed
    /// distribution), matching the closed-enumeration contract.
    pub fn train(corpus: &TrainingCorpus, alpha: f64) -> Result<Self> {
        let num_categories = Category::ALL.len();
        let total_docs: usize = corpus.values().map(Vec::len).sum();
        if total_docs == 0 {
            return Err(SearchError::EmptyTrainingSet);
        }

        // Build vocabulary over the whole corpus.
        let mut vocab: HashMap<String, usize> = HashMap::new();
        for documents in corpus.values() {
            for document in documents {
                for token in document {
                    let normalized = normalize(token);
                    let next = vocab.len();
                    vocab.entry(normalized).or_insert(next);
                }
            }
        }
        let vocab_size = vocab.len().max(1);

        // Per-category token and document counts.
        let mut doc_counts = vec![0usize; num_categories];
        let mut token_counts = vec![0u64; num_categories * vocab_size];
        let mut total_tokens = vec![0u64; num_categories];

        for (category, documents) in corpus {
            let c = category.priority();
            doc_counts[c] += documents.len();
            for document in documents {
                for token in document {
                    if let Some(&ti) = vocab.get(&normalize(token)) {
                        token_counts[c * vocab_size + ti] += 1;
                        total_tokens[c] += 1;
                    }
                }
            }
        }

        // Laplace-smoothed log-probabilities.
        let mut priors = vec![0f64; num_categories];
        let mut token_log_probs = vec![0f64; num_categories * vocab_size];
        let mut unseen_log_probs = vec![0f64; num_categories];

        for c in 0..num_categories {
            let prior = (doc_counts[c] as f64 + alpha)
                / (total_docs as f64 + num_categories as f64 * alpha);
            priors[c] = prior.ln();

            let denom = total_tokens[c] as f64 + alpha * vocab_size as f64;
            for ti in 0..vocab_size {
                let count = token_counts[c * vocab_size + ti] as f64;
                token_log_probs[c * vocab_size + ti] = ((count + alpha) / denom).ln();
            }
            unseen_log_probs[c] = (alpha / denom).ln();
        }

        tracing::info!(
            documents = total_docs,
            vocabulary = vocab.len(),
            "trained classifier"
        );

        Ok(Self {
            vocab,
            vocab_size,
            token_log_probs,
            priors,
            unseen_log_probs,
            word_regex: Regex::new(r"\b\w+\b").map_err(|e| SearchError::Internal {
                message: format!("Invalid tokenizer regex: {}", e),
            })?,
        })
    }

    /// Classify free text into the highest-scoring category.
    ///
    /// Never fails once trained: unseen tokens contribute the smoothing floor
    /// rather than raising an error. Ties resolve to the category earliest in
    /// [`Category::ALL`].
    pub fn classify(&self, text: &str) -> Category {
        let scores = self.log_scores(text);

        let mut best = Category::ALL[0];
        let mut best_score = scores[0];
        for (c, &score) in scores.iter().enumerate().skip(1) {
            // Strictly greater: equal scores keep the earlier category.
            if score > best_score {
                best_score = score;
                best = Category::ALL[c];
            }
        }
        best
    }

    /// Log-likelihood of the text under every category, indexed by priority.
    pub fn log_scores(&self, text: &str) -> Vec<f64> {
        let mut scores = self.priors.clone();
        for token in self.tokenize(text) {
            match self.vocab.get(&token) {
                Some(&ti) => {
                    for (c, score) in scores.iter_mut().enumerate() {
                        *score += self.token_log_probs[c * self.vocab_size + ti];
                    }
                }
                None => {
                    for (c, score) in scores.iter_mut().enumerate() {
                        *score += self.unseen_log_probs[c];
                    }
                }
            }
        }
        scores
    }

    /// Number of distinct tokens observed during training.
    pub fn vocabulary_size(&self) -> usize {
        self.vocab.len()
    }

    /// Case-normalized word tokenization; multi-word text is accepted.
    fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized = normalize(text);
        self.word_regex
            .find_iter(&normalized)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// Canonical text form: NFC then lower-case.
pub fn normalize(text: &str) -> String {
    text.nfc().collect::<String>().to_lowercase()
}
