//! Object query - API symbol matching
//!
//! Matches documented API symbols (`objects` in the artifact) by
//! case-insensitive containment in the full dotted name. A pattern equal
//! to the final name component is an exact name match and ranks above
//! other containment; a symbol's display priority adds a further
//! adjustment, so that e.g. module landing pages outrank deprecated
//! members with the same name.

use crate::query::ast::QueryNode;
use crate::query::context::QueryContext;
use crate::Result;
use roaring::RoaringBitmap;
use serde::{Deserialize, Serialize};

/// Query that matches documents through their documented API symbols
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ObjectQuery {
    /// Pattern to look for, matched case-insensitively
    pub pattern: String,
    /// Boost factor for scoring
    #[serde(default = "default_boost")]
    pub boost: f32,
}

fn default_boost() -> f32 {
    1.0
}

impl ObjectQuery {
    /// Create a new object query
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
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
        format!("object:{}", self.pattern.to_lowercase())
    }
}

impl QueryNode for ObjectQuery {
    fn execute(&self, ctx: &QueryContext<'_>) -> Result<RoaringBitmap> {
        let cache_key = self.cache_key();
        ctx.get_or_cache_filter(&cache_key, || {
            let pattern = self.pattern.to_lowercase();
            if pattern.is_empty() {
                return Ok(RoaringBitmap::new());
            }

            let mut matches = RoaringBitmap::new();
            for object in ctx.index().objects() {
                if object.name.to_lowercase().contains(&pattern) {
                    matches.insert(object.doc.as_u32());
                }
            }
            Ok(matches)
        })
    }

    fn estimate_cost(&self, ctx: &QueryContext<'_>) -> f64 {
        // Linear scan over the symbol table
        ctx.index().objects().len() as f64
    }

    fn query_type(&self) -> &'static str {
        "object"
    }

    fn boost(&self) -> f32 {
        self.boost
    }

    fn score(&self, ctx: &QueryContext<'_>, doc: u32) -> Option<f32> {
        let pattern = self.pattern.to_lowercase();
        if pattern.is_empty() {
            return None;
        }

        let weights = ctx.weights();
        let mut best: Option<f32> = None;

        for object in ctx.index().objects() {
            if object.doc.as_u32() != doc {
                continue;
            }
            if !object.name.to_lowercase().contains(&pattern) {
                continue;
            }

            let base = if object.tail().to_lowercase() == pattern {
                weights.object_name
            } else {
                weights.object_partial
            };
            let score = (base + weights.priority_adjustment(object.priority)) * self.boost;

            best = Some(match best {
                Some(current) => current.max(score),
                None => score,
            });
        }

        best
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
    fn test_object_query_execute() {
        let index = sample_context_index();
        let settings = SearchSettings::default();
        let ctx = QueryContext::new(&index, &settings);

        let query = ObjectQuery::new("client");
        let result = query.execute(&ctx).unwrap();
        // "acme.client" (doc 2) and "acme.client.Client" (doc 3)
        assert!(result.contains(2));
        assert!(result.contains(3));

        let miss = ObjectQuery::new("nonexistent");
        assert!(miss.execute(&ctx).unwrap().is_empty());
    }

    #[test]
    fn test_object_query_case_insensitive() {
        let index = sample_context_index();
        let settings = SearchSettings::default();
        let ctx = QueryContext::new(&index, &settings);

        let query = ObjectQuery::new("CLIENT");
        assert!(!query.execute(&ctx).unwrap().is_empty());
    }

    #[test]
    fn test_object_query_empty_pattern() {
        let index = sample_context_index();
        let settings = SearchSettings::default();
        let ctx = QueryContext::new(&index, &settings);

        let query = ObjectQuery::new("");
        assert!(query.execute(&ctx).unwrap().is_empty());
        assert_eq!(query.score(&ctx, 0), None);
    }

    #[test]
    fn test_object_query_exact_tail_outranks_partial() {
        let index = sample_context_index();
        let settings = SearchSettings::default();
        let ctx = QueryContext::new(&index, &settings);

        let query = ObjectQuery::new("client");
        // doc 2: module "acme.client", tail "client" matches exactly,
        // priority 0 -> 11 + 15
        assert_eq!(query.score(&ctx, 2), Some(26.0));
        // doc 3: class "acme.client.Client", tail lowercases to
        // "client" -> exact, priority 1 -> 11 + 5
        assert_eq!(query.score(&ctx, 3), Some(16.0));
    }

    #[test]
    fn test_object_query_partial_weight() {
        let index = sample_context_index();
        let settings = SearchSettings::default();
        let ctx = QueryContext::new(&index, &settings);

        let query = ObjectQuery::new("cli");
        // Containment without an exact tail -> 6, module priority -> +15
        assert_eq!(query.score(&ctx, 2), Some(21.0));
    }
}
