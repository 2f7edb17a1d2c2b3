//! Prefix query - partial stem matching via dictionary expansion
//!
//! Search-as-you-type needs incomplete words to match: `back` should find
//! documents indexed under `backend`. The dictionary streams all stems
//! sharing the prefix and the query unions their postings. The exact stem
//! itself is excluded; pairing an exact [`super::TermQuery`] with a prefix
//! query therefore never counts the same evidence twice.

use crate::index::SearchField;
use crate::query::ast::QueryNode;
use crate::query::context::QueryContext;
use crate::Result;
use roaring::RoaringBitmap;
use serde::{Deserialize, Serialize};

/// Query that matches stems starting with a prefix
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PrefixQuery {
    /// Dictionary to search in
    pub field: SearchField,
    /// Prefix to expand
    pub prefix: String,
    /// Boost factor for scoring
    #[serde(default = "default_boost")]
    pub boost: f32,
}

fn default_boost() -> f32 {
    1.0
}

impl PrefixQuery {
    /// Create a new prefix query
    pub fn new(field: SearchField, prefix: impl Into<String>) -> Self {
        Self {
            field,
            prefix: prefix.into(),
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
        format!("prefix:{}:{}", self.field, self.prefix)
    }
}

impl QueryNode for PrefixQuery {
    fn execute(&self, ctx: &QueryContext<'_>) -> Result<RoaringBitmap> {
        let cache_key = self.cache_key();
        ctx.get_or_cache_filter(&cache_key, || {
            Ok(ctx.prefix_postings(self.field, &self.prefix))
        })
    }

    fn estimate_cost(&self, ctx: &QueryContext<'_>) -> f64 {
        // Longer prefixes expand to fewer terms
        let base_cost = ctx.total_docs() as f64;
        let prefix_factor = 1.0 / (1.0 + self.prefix.len() as f64);
        base_cost * prefix_factor
    }

    fn query_type(&self) -> &'static str {
        "prefix"
    }

    fn boost(&self) -> f32 {
        self.boost
    }

    fn score(&self, ctx: &QueryContext<'_>, doc: u32) -> Option<f32> {
        let matches = self.execute(ctx).ok()?;
        if matches.contains(doc) {
            Some(ctx.weight(self.field, true) * self.boost)
        } else {
            None
        }
    }

    fn clone_box(&self) -> Box<dyn QueryNode> {
        Box::new(self.clone())
    }
}
