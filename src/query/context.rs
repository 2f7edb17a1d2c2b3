//! Query execution context
//!
//! The `QueryContext` gives query nodes access to the compiled index,
//! the analyzer, the relevance weights and a per-search filter cache.

use parking_lot::RwLock;
use roaring::RoaringBitmap;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{ScoreWeights, SearchSettings};
use crate::index::{SearchField, SearchIndex};
use crate::tokenizer::Tokenizer;
use crate::Result;

/// Query execution context over one compiled index
pub struct QueryContext<'a> {
    index: &'a SearchIndex,
    tokenizer: Arc<Tokenizer>,
    weights: ScoreWeights,
    max_prefix_expansions: usize,
    /// Filter result cache, keyed by a node's canonical cache key
    filter_cache: RwLock<HashMap<String, RoaringBitmap>>,
}

impl<'a> QueryContext<'a> {
    /// Create a context from search settings
    pub fn new(index: &'a SearchIndex, settings: &SearchSettings) -> Self {
        Self {
            index,
            tokenizer: Arc::new(Tokenizer::new(&settings.tokenizer_config)),
            weights: settings.weights.clone(),
            max_prefix_expansions: settings.max_prefix_expansions,
            filter_cache: RwLock::new(HashMap::new()),
        }
    }

    /// Create a context with an already-built tokenizer
    pub fn with_tokenizer(
        index: &'a SearchIndex,
        settings: &SearchSettings,
        tokenizer: Arc<Tokenizer>,
    ) -> Self {
        Self {
            index,
            tokenizer,
            weights: settings.weights.clone(),
            max_prefix_expansions: settings.max_prefix_expansions,
            filter_cache: RwLock::new(HashMap::new()),
        }
    }

    /// The compiled index being searched
    pub fn index(&self) -> &SearchIndex {
        self.index
    }

    /// Total number of documents
    pub fn total_docs(&self) -> usize {
        self.index.doc_count()
    }

    /// Bitmap of every document ID
    pub fn all_docs(&self) -> RoaringBitmap {
        self.index.all_docs()
    }

    /// Posting bitmap for an exact stem, empty if not indexed
    pub fn postings(&self, field: SearchField, term: &str) -> RoaringBitmap {
        self.index.postings(field, term)
    }

    /// Union of postings for all dictionary stems sharing a prefix
    ///
    /// The exact stem is excluded; it belongs to the exact lookup path.
    pub fn prefix_postings(&self, field: SearchField, prefix: &str) -> RoaringBitmap {
        let mut union = RoaringBitmap::new();
        for (_, postings) in self
            .index
            .dictionary(field)
            .prefix_search(prefix, self.max_prefix_expansions)
        {
            union |= postings;
        }
        union
    }

    /// Number of documents containing an exact stem
    pub fn doc_frequency(&self, field: SearchField, term: &str) -> u64 {
        self.index
            .dictionary(field)
            .get(term)
            .map(|p| p.len())
            .unwrap_or(0)
    }

    /// The query analyzer
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Relevance weight for a match kind
    pub fn weight(&self, field: SearchField, partial: bool) -> f32 {
        match (field, partial) {
            (SearchField::Body, false) => self.weights.term,
            (SearchField::Body, true) => self.weights.partial_term,
            (SearchField::Title, false) => self.weights.title,
            (SearchField::Title, true) => self.weights.partial_title,
        }
    }

    /// Relevance weights for object matching
    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Get or compute a cached filter result
    pub fn get_or_cache_filter<F>(&self, cache_key: &str, compute: F) -> Result<RoaringBitmap>
    where
        F: FnOnce() -> Result<RoaringBitmap>,
    {
        if let Some(cached) = self.filter_cache.read().get(cache_key) {
            return Ok(cached.clone());
        }

        let result = compute()?;
        self.filter_cache
            .write()
            .insert(cache_key.to_string(), result.clone());
        Ok(result)
    }

    /// Clear the filter cache
    pub fn clear_filter_cache(&self) {
        self.filter_cache.write().clear();
    }
}
