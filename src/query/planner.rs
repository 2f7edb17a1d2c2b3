//! Query planner
//!
//! Produces an execution plan: estimated cost and whether scoring
//! applies. Clause ordering happens on the concrete [`BoolQuery`] before
//! boxing (the trait has no downcasting), via
//! [`BoolQuery::optimize_clause_order`].
//!
//! [`BoolQuery`]: super::nodes::BoolQuery
//! [`BoolQuery::optimize_clause_order`]: super::nodes::BoolQuery::optimize_clause_order

use super::ast::QueryNode;
use super::context::QueryContext;

/// Query execution plan
#[derive(Debug)]
pub struct QueryPlan {
    /// Root query node
    pub root: Box<dyn QueryNode>,
    /// Estimated total cost
    pub estimated_cost: f64,
    /// Whether the query uses scoring
    pub uses_scoring: bool,
}

/// Query planner
pub struct QueryPlanner;

impl QueryPlanner {
    /// Create an execution plan for a query
    pub fn plan(query: Box<dyn QueryNode>, ctx: &QueryContext<'_>) -> QueryPlan {
        let estimated_cost = query.estimate_cost(ctx);
        let uses_scoring = query.is_scoring();

        QueryPlan {
            root: query,
            estimated_cost,
            uses_scoring,
        }
    }
}
