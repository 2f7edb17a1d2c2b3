//! Query executor
//!
//! Runs a planned query and collects the top-k results with scores,
//! resolving document IDs into their docname/filename/title entries.

use roaring::RoaringBitmap;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Instant;

use crate::index::DocId;
use crate::Result;

use super::ast::QueryNode;
use super::context::QueryContext;
use super::planner::{QueryPlan, QueryPlanner};

/// One search result with its resolved document
#[derive(Clone, Debug, Serialize)]
pub struct SearchHit {
    pub doc: DocId,
    pub docname: String,
    pub filename: String,
    pub title: String,
    pub score: f32,
}

/// Query execution statistics
#[derive(Clone, Debug, Default, Serialize)]
pub struct QueryStats {
    /// Number of documents matched before truncation
    pub docs_matched: u64,
    /// Query execution time in microseconds
    pub execution_time_us: u64,
}

/// Query execution result
#[derive(Debug)]
pub struct QueryResult {
    /// Top-k documents with scores, highest first
    pub hits: Vec<SearchHit>,
    /// Total number of matching documents
    pub total_hits: u64,
    /// Execution statistics
    pub stats: QueryStats,
}

/// Query executor
pub struct QueryExecutor;

impl QueryExecutor {
    /// Execute a query and return the top-k results
    ///
    /// Execution is read-only: running the same query against the same
    /// context twice yields identical results.
    pub fn execute(
        query: Box<dyn QueryNode>,
        ctx: &QueryContext<'_>,
        top_k: usize,
    ) -> Result<QueryResult> {
        let plan = QueryPlanner::plan(query, ctx);
        Self::execute_plan(&plan, ctx, top_k)
    }

    /// Execute a query with a pre-built plan
    pub fn execute_plan(
        plan: &QueryPlan,
        ctx: &QueryContext<'_>,
        top_k: usize,
    ) -> Result<QueryResult> {
        let start = Instant::now();

        let matches = plan.root.execute(ctx)?;
        let total_hits = matches.len();

        let hits = if plan.uses_scoring {
            Self::collect_top_k_scored(plan.root.as_ref(), ctx, &matches, top_k)
        } else {
            Self::collect_top_k_unscored(ctx, &matches, top_k)
        };

        let stats = QueryStats {
            docs_matched: total_hits,
            execution_time_us: start.elapsed().as_micros() as u64,
        };

        Ok(QueryResult {
            hits,
            total_hits,
            stats,
        })
    }

    /// Collect top-k results with scoring
    fn collect_top_k_scored(
        query: &dyn QueryNode,
        ctx: &QueryContext<'_>,
        matches: &RoaringBitmap,
        top_k: usize,
    ) -> Vec<SearchHit> {
        if matches.is_empty() || top_k == 0 {
            return Vec::new();
        }

        // Min-heap of (score, doc), lowest score on top, so the heap
        // never holds more than top_k entries
        let mut heap: BinaryHeap<Reverse<(OrderedFloat, u32)>> =
            BinaryHeap::with_capacity(top_k + 1);

        for doc in matches.iter() {
            let score = query.score(ctx, doc).unwrap_or(0.0);

            if heap.len() < top_k {
                heap.push(Reverse((OrderedFloat(score), doc)));
            } else if let Some(&Reverse((OrderedFloat(min_score), _))) = heap.peek() {
                if score > min_score {
                    heap.pop();
                    heap.push(Reverse((OrderedFloat(score), doc)));
                }
            }
        }

        let mut results: Vec<SearchHit> = heap
            .into_iter()
            .filter_map(|Reverse((OrderedFloat(score), doc))| {
                Self::resolve_hit(ctx, doc, score)
            })
            .collect();

        // Descending score; document order breaks ties deterministically
        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.doc.cmp(&b.doc))
        });

        results
    }

    /// Collect top-k results without scoring (filter-only queries)
    fn collect_top_k_unscored(
        ctx: &QueryContext<'_>,
        matches: &RoaringBitmap,
        top_k: usize,
    ) -> Vec<SearchHit> {
        matches
            .iter()
            .take(top_k)
            .filter_map(|doc| Self::resolve_hit(ctx, doc, 1.0))
            .collect()
    }

    /// Resolve a document ID into a hit
    ///
    /// Postings referencing documents outside the docnames table (a
    /// validation violation) resolve to nothing and are dropped here.
    fn resolve_hit(ctx: &QueryContext<'_>, doc: u32, score: f32) -> Option<SearchHit> {
        let entry = ctx.index().doc(DocId(doc))?;
        Some(SearchHit {
            doc: DocId(doc),
            docname: entry.docname.clone(),
            filename: entry.filename.clone(),
            title: entry.title.clone(),
            score,
        })
    }
}

/// Wrapper for f32 that implements Ord for use in BinaryHeap
#[derive(Clone, Copy, Debug, PartialEq)]
struct OrderedFloat(f32);

impl Eq for OrderedFloat {}

impl PartialOrd for OrderedFloat {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedFloat {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0
            .partial_cmp(&other.0)
            .unwrap_or(std::cmp::Ordering::Equal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::SearchField;
    use crate::query::nodes::tests::sample_context_index;
    use crate::query::nodes::{MatchQuery, TermQuery};
    use crate::SearchSettings;

    #[test]
    fn test_execute_scored() {
        let index = sample_context_index();
        let settings = SearchSettings::default();
        let ctx = QueryContext::new(&index, &settings);

        let query: Box<dyn QueryNode> = Box::new(TermQuery::new(SearchField::Body, "client"));
        let result = QueryExecutor::execute(query, &ctx, 10).unwrap();

        assert_eq!(result.total_hits, 3);
        assert_eq!(result.hits.len(), 3);
        assert!(result.hits.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(!result.hits[0].docname.is_empty());
    }

    #[test]
    fn test_execute_truncates_to_top_k() {
        let index = sample_context_index();
        let settings = SearchSettings::default();
        let ctx = QueryContext::new(&index, &settings);

        let query: Box<dyn QueryNode> = Box::new(TermQuery::new(SearchField::Body, "client"));
        let result = QueryExecutor::execute(query, &ctx, 2).unwrap();

        assert_eq!(result.total_hits, 3);
        assert_eq!(result.hits.len(), 2);
    }

    #[test]
    fn test_execute_no_matches() {
        let index = sample_context_index();
        let settings = SearchSettings::default();
        let ctx = QueryContext::new(&index, &settings);

        let query: Box<dyn QueryNode> = Box::new(TermQuery::new(SearchField::Body, "nothing"));
        let result = QueryExecutor::execute(query, &ctx, 10).unwrap();

        assert_eq!(result.total_hits, 0);
        assert!(result.hits.is_empty());
    }

    #[test]
    fn test_execute_is_idempotent() {
        let index = sample_context_index();
        let settings = SearchSettings::default();
        let ctx = QueryContext::new(&index, &settings);

        let query: Box<dyn QueryNode> = Box::new(MatchQuery::new("client"));
        let first = QueryExecutor::execute(query.clone(), &ctx, 10).unwrap();
        let second = QueryExecutor::execute(query, &ctx, 10).unwrap();

        let docs = |r: &QueryResult| r.hits.iter().map(|h| h.doc).collect::<Vec<_>>();
        assert_eq!(docs(&first), docs(&second));
        assert_eq!(first.total_hits, second.total_hits);
    }

    #[test]
    fn test_ordered_float() {
        let mut values = vec![OrderedFloat(2.0), OrderedFloat(0.5), OrderedFloat(1.0)];
        values.sort();
        assert_eq!(values[0], OrderedFloat(0.5));
        assert_eq!(values[2], OrderedFloat(2.0));
    }
}
