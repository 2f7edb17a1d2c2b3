//! Boolean query - combines clauses with AND, OR, NOT semantics

use crate::query::ast::QueryNode;
use crate::query::context::QueryContext;
use crate::Result;
use roaring::RoaringBitmap;

/// Boolean query combining multiple clauses
///
/// - `must`: all clauses must match (AND), contributes to score
/// - `should`: at least one clause should match (OR) when no must
///   clauses are present; always contributes to score
/// - `must_not`: no clause may match (NOT), never contributes to score
#[derive(Clone, Debug, Default)]
pub struct BoolQuery {
    /// Clauses that must match (AND, scoring)
    pub must: Vec<Box<dyn QueryNode>>,
    /// Clauses where at least one should match (OR, scoring)
    pub should: Vec<Box<dyn QueryNode>>,
    /// Clauses that must not match (NOT, no scoring)
    pub must_not: Vec<Box<dyn QueryNode>>,
    /// Boost factor for scoring
    pub boost: f32,
}

impl BoolQuery {
    /// Create a new empty boolean query
    pub fn new() -> Self {
        Self {
            must: Vec::new(),
            should: Vec::new(),
            must_not: Vec::new(),
            boost: 1.0,
        }
    }

    /// Add a must clause
    pub fn must(mut self, query: impl QueryNode + 'static) -> Self {
        self.must.push(Box::new(query));
        self
    }

    /// Add a should clause
    pub fn should(mut self, query: impl QueryNode + 'static) -> Self {
        self.should.push(Box::new(query));
        self
    }

    /// Add a must_not clause
    pub fn must_not(mut self, query: impl QueryNode + 'static) -> Self {
        self.must_not.push(Box::new(query));
        self
    }

    /// Add a must clause (boxed)
    pub fn must_boxed(mut self, query: Box<dyn QueryNode>) -> Self {
        self.must.push(query);
        self
    }

    /// Add a should clause (boxed)
    pub fn should_boxed(mut self, query: Box<dyn QueryNode>) -> Self {
        self.should.push(query);
        self
    }

    /// Add a must_not clause (boxed)
    pub fn must_not_boxed(mut self, query: Box<dyn QueryNode>) -> Self {
        self.must_not.push(query);
        self
    }

    /// Set boost factor
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    /// Check if this is an empty query
    pub fn is_empty(&self) -> bool {
        self.must.is_empty() && self.should.is_empty() && self.must_not.is_empty()
    }

    /// Get total number of clauses
    pub fn clause_count(&self) -> usize {
        self.must.len() + self.should.len() + self.must_not.len()
    }

    /// Reorder must clauses by estimated cost, cheapest first
    pub fn optimize_clause_order(&mut self, ctx: &QueryContext<'_>) {
        self.must.sort_by(|a, b| {
            a.estimate_cost(ctx)
                .partial_cmp(&b.estimate_cost(ctx))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        // should clauses stay in authored order; their order never
        // changes the result set, only scoring iteration
    }
}

impl QueryNode for BoolQuery {
    fn execute(&self, ctx: &QueryContext<'_>) -> Result<RoaringBitmap> {
        // An empty bool query matches everything
        if self.is_empty() {
            return Ok(ctx.all_docs());
        }

        let mut result: Option<RoaringBitmap> = None;

        // MUST clauses: intersection, with early exit
        for query in &self.must {
            let matches = query.execute(ctx)?;
            result = Some(match result {
                Some(r) => r & matches,
                None => matches,
            });

            if let Some(ref r) = result {
                if r.is_empty() {
                    return Ok(RoaringBitmap::new());
                }
            }
        }

        // SHOULD clauses: union; decide matching only when there are no
        // must clauses, otherwise they just feed scoring
        if !self.should.is_empty() && self.must.is_empty() {
            let mut should_matches = RoaringBitmap::new();
            for query in &self.should {
                should_matches |= query.execute(ctx)?;
            }
            result = Some(should_matches);
        }

        // MUST_NOT clauses: difference
        for query in &self.must_not {
            let matches = query.execute(ctx)?;
            if let Some(ref mut r) = result {
                *r -= matches;
            }
        }

        Ok(result.unwrap_or_default())
    }

    fn estimate_cost(&self, ctx: &QueryContext<'_>) -> f64 {
        // Dominated by the most selective required clause
        let must_cost: f64 = self
            .must
            .iter()
            .map(|q| q.estimate_cost(ctx))
            .fold(f64::MAX, f64::min);

        let should_cost: f64 = self.should.iter().map(|q| q.estimate_cost(ctx)).sum();
        let must_not_cost: f64 = self.must_not.iter().map(|q| q.estimate_cost(ctx)).sum();

        let base_cost = if must_cost < f64::MAX {
            must_cost
        } else if should_cost > 0.0 {
            should_cost
        } else {
            ctx.total_docs() as f64
        };

        base_cost + should_cost * 0.1 + must_not_cost * 0.1
    }

    fn query_type(&self) -> &'static str {
        "bool"
    }

    fn is_scoring(&self) -> bool {
        self.must.iter().any(|q| q.is_scoring()) || self.should.iter().any(|q| q.is_scoring())
    }

    fn boost(&self) -> f32 {
        self.boost
    }

    fn score(&self, ctx: &QueryContext<'_>, doc: u32) -> Option<f32> {
        let mut total_score = 0.0f32;
        let mut matched = false;

        for query in &self.must {
            if let Some(score) = query.score(ctx, doc) {
                total_score += score;
                matched = true;
            }
        }

        for query in &self.should {
            if let Some(score) = query.score(ctx, doc) {
                total_score += score;
                matched = true;
            }
        }

        if matched {
            Some(total_score * self.boost)
        } else {
            None
        }
    }

    fn clone_box(&self) -> Box<dyn QueryNode> {
        Box::new(BoolQuery {
            must: self.must.iter().map(|q| q.clone_box()).collect(),
            should: self.should.iter().map(|q| q.clone_box()).collect(),
            must_not: self.must_not.iter().map(|q| q.clone_box()).collect(),
            boost: self.boost,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::SearchField;
    use crate::query::nodes::tests::sample_context_index;
    use crate::query::nodes::{ObjectQuery, TermQuery};
    use crate::SearchSettings;

    #[test]
    fn test_bool_query_creation() {
        let query = BoolQuery::new()
            .must(TermQuery::new(SearchField::Body, "client"))
            .should(ObjectQuery::new("client"))
            .must_not(TermQuery::new(SearchField::Body, "deprecated"));

        assert_eq!(query.must.len(), 1);
        assert_eq!(query.should.len(), 1);
        assert_eq!(query.must_not.len(), 1);
        assert_eq!(query.clause_count(), 3);
        assert!(!query.is_empty());
    }

    #[test]
    fn test_bool_query_empty_matches_all() {
        let index = sample_context_index();
        let settings = SearchSettings::default();
        let ctx = QueryContext::new(&index, &settings);

        let query = BoolQuery::new();
        let result = query.execute(&ctx).unwrap();
        assert_eq!(result.len() as usize, ctx.total_docs());
    }

    #[test]
    fn test_bool_query_must_intersects() {
        let index = sample_context_index();
        let settings = SearchSettings::default();
        let ctx = QueryContext::new(&index, &settings);

        // "client" body docs {2, 3, 6}; "connect" body docs {4, 6}
        let query = BoolQuery::new()
            .must(TermQuery::new(SearchField::Body, "client"))
            .must(TermQuery::new(SearchField::Body, "connect"));
        let result = query.execute(&ctx).unwrap();
        assert_eq!(result.iter().collect::<Vec<_>>(), vec![6]);
    }

    #[test]
    fn test_bool_query_must_not_excludes() {
        let index = sample_context_index();
        let settings = SearchSettings::default();
        let ctx = QueryContext::new(&index, &settings);

        let query = BoolQuery::new()
            .must(TermQuery::new(SearchField::Body, "connect"))
            .must_not(TermQuery::new(SearchField::Body, "client"));
        let result = query.execute(&ctx).unwrap();
        assert_eq!(result.iter().collect::<Vec<_>>(), vec![4]);
    }

    #[test]
    fn test_bool_query_should_unions_without_must() {
        let index = sample_context_index();
        let settings = SearchSettings::default();
        let ctx = QueryContext::new(&index, &settings);

        let query = BoolQuery::new()
            .should(TermQuery::new(SearchField::Title, "guide"))
            .should(TermQuery::new(SearchField::Title, "changelog"));
        let result = query.execute(&ctx).unwrap();
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_bool_query_scores_sum() {
        let index = sample_context_index();
        let settings = SearchSettings::default();
        let ctx = QueryContext::new(&index, &settings);

        let query = BoolQuery::new()
            .must(TermQuery::new(SearchField::Body, "client"))
            .should(TermQuery::new(SearchField::Title, "client"));

        // doc 2 matches both: 5 (body) + 15 (title)
        assert_eq!(query.score(&ctx, 2), Some(20.0));
        // doc 6 matches the body only
        assert_eq!(query.score(&ctx, 6), Some(5.0));
    }

    #[test]
    fn test_bool_query_optimize_orders_by_cost() {
        let index = sample_context_index();
        let settings = SearchSettings::default();
        let ctx = QueryContext::new(&index, &settings);

        let mut query = BoolQuery::new()
            .must(TermQuery::new(SearchField::Body, "client")) // df 3
            .must(TermQuery::new(SearchField::Body, "run")); // df 1
        query.optimize_clause_order(&ctx);

        let first_cost = query.must[0].estimate_cost(&ctx);
        let second_cost = query.must[1].estimate_cost(&ctx);
        assert!(first_cost <= second_cost);
    }

    #[test]
    fn test_bool_query_clone() {
        let query = BoolQuery::new()
            .must(TermQuery::new(SearchField::Body, "client"))
            .with_boost(2.0);

        let cloned = query.clone_box();
        assert_eq!(cloned.query_type(), "bool");
        assert_eq!(cloned.boost(), 2.0);
    }
}
