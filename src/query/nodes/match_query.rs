//! Match query - analyzed free-text search
//!
//! The behavior of the documentation site's search box: the text is
//! analyzed, every resulting word must match the document somewhere, and
//! for each word any source of evidence counts: an exact body stem, an
//! exact title stem, a prefix of either, or a documented API symbol.

use crate::index::SearchField;
use crate::query::ast::QueryNode;
use crate::query::context::QueryContext;
use crate::Result;
use roaring::RoaringBitmap;
use serde::{Deserialize, Serialize};

use super::bool_query::BoolQuery;
use super::object_query::ObjectQuery;
use super::prefix_query::PrefixQuery;
use super::term_query::TermQuery;

/// Query that performs analyzed full-text search
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchQuery {
    /// Text to search for (analyzed at execution)
    pub text: String,
    /// Restrict matching to one dictionary; None searches everything
    #[serde(default)]
    pub field: Option<SearchField>,
    /// Whether API symbols count as match evidence
    #[serde(default = "default_true")]
    pub include_objects: bool,
    /// Boost factor for scoring
    #[serde(default = "default_boost")]
    pub boost: f32,
}

fn default_boost() -> f32 {
    1.0
}

fn default_true() -> bool {
    true
}

impl MatchQuery {
    /// Create a match query over all evidence sources
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            field: None,
            include_objects: true,
            boost: 1.0,
        }
    }

    /// Create a match query restricted to one dictionary
    pub fn in_field(field: SearchField, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            field: Some(field),
            include_objects: false,
            boost: 1.0,
        }
    }

    /// Set the boost factor
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    /// Build the per-word query tree for the analyzed text
    ///
    /// Each word becomes a should-group of its evidence sources; the
    /// groups are AND-ed by the caller. Empty when analysis leaves no
    /// words (stopword-only input).
    fn word_queries(&self, ctx: &QueryContext<'_>) -> Vec<BoolQuery> {
        let fields: &[SearchField] = match self.field {
            Some(SearchField::Body) => &[SearchField::Body],
            Some(SearchField::Title) => &[SearchField::Title],
            None => &[SearchField::Body, SearchField::Title],
        };

        ctx.tokenizer()
            .token_pairs(&self.text)
            .into_iter()
            .map(|(surface, stem)| {
                let mut group = BoolQuery::new();
                for field in fields {
                    group = group
                        .should(TermQuery::new(*field, stem.clone()))
                        .should(PrefixQuery::new(*field, stem.clone()));
                }
                if self.include_objects {
                    // Symbol names are not stemmed; match the surface form
                    group = group.should(ObjectQuery::new(surface));
                }
                group
            })
            .collect()
    }
}

impl QueryNode for MatchQuery {
    fn execute(&self, ctx: &QueryContext<'_>) -> Result<RoaringBitmap> {
        let words = self.word_queries(ctx);
        if words.is_empty() {
            return Ok(RoaringBitmap::new());
        }

        let mut result: Option<RoaringBitmap> = None;
        for word in &words {
            let matches = word.execute(ctx)?;
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

        Ok(result.unwrap_or_default())
    }

    fn estimate_cost(&self, ctx: &QueryContext<'_>) -> f64 {
        self.word_queries(ctx)
            .iter()
            .map(|w| w.estimate_cost(ctx))
            .fold(0.0, f64::max)
    }

    fn query_type(&self) -> &'static str {
        "match"
    }

    fn boost(&self) -> f32 {
        self.boost
    }

    fn score(&self, ctx: &QueryContext<'_>, doc: u32) -> Option<f32> {
        let words = self.word_queries(ctx);
        if words.is_empty() {
            return None;
        }

        let mut total = 0.0f32;
        for word in &words {
            // Every word must contribute; a miss means the doc is not a
            // match for the conjunction at all
            total += word.score(ctx, doc)?;
        }
        Some(total * self.boost)
    }

    fn clone_box(&self) -> Box<dyn QueryNode> {
        Box::new(self.clone())
    }
}
