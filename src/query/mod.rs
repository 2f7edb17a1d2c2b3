//! Query matching and ranking over a compiled index

pub mod ast;
pub mod context;
pub mod executor;
pub mod nodes;
pub mod planner;
pub mod query_string;

pub use ast::{MatchAllQuery, MatchNoneQuery, QueryNode};
pub use context::QueryContext;
pub use executor::{QueryExecutor, QueryResult, QueryStats, SearchHit};
pub use planner::{QueryPlan, QueryPlanner};
pub use query_string::QueryStringParser;

use crate::config::SearchSettings;
use crate::index::SearchIndex;
use crate::Result;

/// Parse a query string and run it against an index
///
/// The convenience entry point behind the CLI: builds a context from the
/// settings, parses the query, and collects the top-k hits.
pub fn search(
    index: &SearchIndex,
    query: &str,
    settings: &SearchSettings,
    top_k: usize,
) -> Result<QueryResult> {
    let ctx = QueryContext::new(index, settings);
    let root = QueryStringParser::parse(query)?;
    QueryExecutor::execute(root, &ctx, top_k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::nodes::tests::sample_context_index;

    #[test]
    fn test_search_end_to_end() {
        let index = sample_context_index();
        let settings = SearchSettings::default();

        let result = search(&index, "client", &settings, 10).unwrap();
        assert!(result.total_hits > 0);
        assert!(result.hits[0].score >= result.hits[result.hits.len() - 1].score);
    }

    #[test]
    fn test_search_empty_query() {
        let index = sample_context_index();
        let settings = SearchSettings::default();

        let result = search(&index, "", &settings, 10).unwrap();
        assert_eq!(result.total_hits, 0);
    }

    #[test]
    fn test_search_exclusion() {
        let index = sample_context_index();
        let settings = SearchSettings::default();

        let with = search(&index, "connect", &settings, 10).unwrap();
        let without = search(&index, "connect -client", &settings, 10).unwrap();
        assert!(without.total_hits < with.total_hits);
    }
}
