//! Abstract syntax tree for query representation
//!
//! Defines the core `QueryNode` trait that all query types implement,
//! giving one interface for execution, cost estimation and scoring.

use crate::Result;
use roaring::RoaringBitmap;
use std::fmt::Debug;

use super::context::QueryContext;

/// Core trait for all query nodes in the AST
///
/// Query nodes form a tree representing the logical structure of a
/// search. Executing a node against a [`QueryContext`] yields the set of
/// matching document IDs as a bitmap; scoring is a separate pass over
/// the matched documents.
pub trait QueryNode: Send + Sync + Debug {
    /// Execute the query and return matching document IDs as a bitmap
    fn execute(&self, ctx: &QueryContext<'_>) -> Result<RoaringBitmap>;

    /// Estimate the execution cost of this query
    ///
    /// Used to reorder boolean clauses so the most selective run first.
    fn estimate_cost(&self, ctx: &QueryContext<'_>) -> f64;

    /// Get the query type name for debugging and logging
    fn query_type(&self) -> &'static str;

    /// Whether this query contributes to relevance scores
    fn is_scoring(&self) -> bool {
        true
    }

    /// Get the boost factor for this query
    fn boost(&self) -> f32 {
        1.0
    }

    /// Score contribution for a matching document
    ///
    /// Returns None when the document does not match this node or the
    /// node does not score.
    fn score(&self, _ctx: &QueryContext<'_>, _doc: u32) -> Option<f32> {
        None
    }

    /// Clone this query node into a boxed trait object
    fn clone_box(&self) -> Box<dyn QueryNode>;
}

impl Clone for Box<dyn QueryNode> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// A query that matches every document
#[derive(Clone, Debug)]
pub struct MatchAllQuery {
    pub boost: f32,
}

impl Default for MatchAllQuery {
    fn default() -> Self {
        Self { boost: 1.0 }
    }
}

impl QueryNode for MatchAllQuery {
    fn execute(&self, ctx: &QueryContext<'_>) -> Result<RoaringBitmap> {
        Ok(ctx.all_docs())
    }

    fn estimate_cost(&self, ctx: &QueryContext<'_>) -> f64 {
        ctx.total_docs() as f64
    }

    fn query_type(&self) -> &'static str {
        "match_all"
    }

    fn is_scoring(&self) -> bool {
        false
    }

    fn boost(&self) -> f32 {
        self.boost
    }

    fn score(&self, _ctx: &QueryContext<'_>, _doc: u32) -> Option<f32> {
        Some(self.boost)
    }

    fn clone_box(&self) -> Box<dyn QueryNode> {
        Box::new(self.clone())
    }
}

/// A query that matches no documents
///
/// The parse result of an empty or all-stopword query string.
#[derive(Clone, Debug, Default)]
pub struct MatchNoneQuery;

impl QueryNode for MatchNoneQuery {
    fn execute(&self, _ctx: &QueryContext<'_>) -> Result<RoaringBitmap> {
        Ok(RoaringBitmap::new())
    }

    fn estimate_cost(&self, _ctx: &QueryContext<'_>) -> f64 {
        0.0
    }

    fn query_type(&self) -> &'static str {
        "match_none"
    }

    fn is_scoring(&self) -> bool {
        false
    }

    fn clone_box(&self) -> Box<dyn QueryNode> {
        Box::new(self.clone())
    }
}
