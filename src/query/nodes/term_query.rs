//! Term query - exact stem match in one inverted index

use crate::index::SearchField;
use crate::query::ast::QueryNode;
use crate::query::context::QueryContext;
use crate::Result;
use roaring::RoaringBitmap;
use serde::{Deserialize, Serialize};

/// Query that matches documents containing an exact stem
///
/// The most basic query type: it looks up the stem in the chosen
/// dictionary and returns the posting list as a bitmap.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TermQuery {
    /// Dictionary to search in
    pub field: SearchField,
    /// Exact stem to match
    pub term: String,
    /// Boost factor for scoring
    #[serde(default = "default_boost")]
    pub boost: f32,
}

fn default_boost() -> f32 {
    1.0
}

impl TermQuery {
    /// Create a new term query
    pub fn new(field: SearchField, term: impl Into<String>) -> Self {
        Self {
            field,
            term: term.into(),
            boost: 1.0,
        }
    }

    /// Set the boost factor
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    /// Get the cache key for this query
    pub fn cache_key(&self) -> String {
        format!("term:{}:{}", self.field, self.term)
    }
}

impl QueryNode for TermQuery {
    fn execute(&self, ctx: &QueryContext<'_>) -> Result<RoaringBitmap> {
        let cache_key = self.cache_key();
        ctx.get_or_cache_filter(&cache_key, || Ok(ctx.postings(self.field, &self.term)))
    }

    fn estimate_cost(&self, ctx: &QueryContext<'_>) -> f64 {
        let doc_freq = ctx.doc_frequency(self.field, &self.term);
        doc_freq as f64
    }

    fn query_type(&self) -> &'static str {
        "term"
    }

    fn boost(&self) -> f32 {
        self.boost
    }

    fn score(&self, ctx: &QueryContext<'_>, doc: u32) -> Option<f32> {
        let matches = self.execute(ctx).ok()?;
        if matches.contains(doc) {
            Some(ctx.weight(self.field, false) * self.boost)
        } else {
            None
        }
    }

    fn clone_box(&self) -> Box<dyn QueryNode> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::nodes::tests::sample_context_index;
    use crate::SearchSettings;

    #[test]
    fn test_term_query_creation() {
        let query = TermQuery::new(SearchField::Body, "backend");
        assert_eq!(query.field, SearchField::Body);
        assert_eq!(query.term, "backend");
        assert_eq!(query.boost, 1.0);
    }

    #[test]
    fn test_term_query_cache_key() {
        let query = TermQuery::new(SearchField::Title, "guide").with_boost(2.0);
        assert_eq!(query.cache_key(), "term:title:guide");
        assert_eq!(query.boost, 2.0);
    }

    #[test]
    fn test_term_query_execute() {
        let index = sample_context_index();
        let settings = SearchSettings::default();
        let ctx = QueryContext::new(&index, &settings);

        let query = TermQuery::new(SearchField::Body, "backend");
        let result = query.execute(&ctx).unwrap();
        assert_eq!(result.len(), 2);

        let missing = TermQuery::new(SearchField::Body, "nonexistent");
        assert!(missing.execute(&ctx).unwrap().is_empty());
    }

    #[test]
    fn test_term_query_score() {
        let index = sample_context_index();
        let settings = SearchSettings::default();
        let ctx = QueryContext::new(&index, &settings);

        let query = TermQuery::new(SearchField::Title, "guide");
        let matches = query.execute(&ctx).unwrap();
        let doc = matches.iter().next().unwrap();

        // Title weight is 15 by default
        assert_eq!(query.score(&ctx, doc), Some(15.0));
        assert_eq!(query.score(&ctx, 999), None);
    }

    #[test]
    fn test_term_query_cost_is_doc_frequency() {
        let index = sample_context_index();
        let settings = SearchSettings::default();
        let ctx = QueryContext::new(&index, &settings);

        let common = TermQuery::new(SearchField::Body, "client");
        let rare = TermQuery::new(SearchField::Body, "run");
        assert!(common.estimate_cost(&ctx) > rare.estimate_cost(&ctx));
    }
}
