//! Configuration for the store and the suggestion engine.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for document store implementations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Field-confidence threshold below which a freshly extracted document
    /// is routed to review instead of approval.
    pub review_threshold: u8,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            review_threshold: 80,
        }
    }
}

impl StoreConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the review threshold.
    pub fn with_review_threshold(mut self, threshold: u8) -> Self {
        self.review_threshold = threshold;
        self
    }
}

/// Configuration for the suggestion engine.
#[derive(Debug, Clone)]
pub struct SuggestionConfig {
    /// Context chunks retrieved per field.
    pub top_k: usize,

    /// Maximum concurrent per-field provider calls.
    pub concurrency: usize,

    /// Deadline applied to each upstream call (embedding, vector query,
    /// generation).
    pub upstream_timeout: Duration,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            concurrency: 4,
            upstream_timeout: Duration::from_secs(30),
        }
    }
}

impl SuggestionConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of context chunks retrieved per field.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the per-field concurrency cap.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the per-call upstream deadline.
    pub fn with_upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let store = StoreConfig::default();
        assert_eq!(store.review_threshold, 80);

        let engine = SuggestionConfig::default();
        assert_eq!(engine.top_k, 3);
        assert_eq!(engine.concurrency, 4);
        assert_eq!(engine.upstream_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_builders() {
        let config = SuggestionConfig::new()
            .with_top_k(5)
            .with_concurrency(1)
            .with_upstream_timeout(Duration::from_millis(250));
        assert_eq!(config.top_k, 5);
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.upstream_timeout, Duration::from_millis(250));
    }
}
