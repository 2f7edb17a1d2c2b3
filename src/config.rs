use serde::{Deserialize, Serialize};

/// Search settings configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchSettings {
    pub tokenizer_config: TokenizerConfig,
    pub weights: ScoreWeights,
    /// Upper bound on how many dictionary terms a single prefix may expand to
    pub max_prefix_expansions: usize,
    /// Refuse artifacts that fail integrity validation
    pub strict: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            tokenizer_config: TokenizerConfig::default(),
            weights: ScoreWeights::default(),
            max_prefix_expansions: 50,
            strict: false,
        }
    }
}

impl SearchSettings {
    /// Set strict integrity checking
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Override the relevance weights
    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Override the tokenizer configuration
    pub fn with_tokenizer_config(mut self, config: TokenizerConfig) -> Self {
        self.tokenizer_config = config;
        self
    }
}

/// Tokenizer configuration
///
/// Query analysis has to mirror what the documentation generator did at
/// index time: the stems in the artifact are lowercase Porter-stemmer
/// output with stopwords removed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenizerConfig {
    pub lowercase: bool,
    pub remove_stopwords: bool,
    pub stem: bool,
    pub min_token_length: usize,
    pub max_token_length: usize,
    pub language: String,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            remove_stopwords: true,
            stem: true,
            min_token_length: 1,
            max_token_length: 64,
            language: "english".to_string(),
        }
    }
}

/// Static relevance weights for ranking matches
///
/// The artifact stores bare document IDs without term frequencies, so
/// ranking uses fixed per-match-kind weights the way documentation-site
/// search widgets do, rather than a TF/IDF family scorer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Exact stem match in body terms
    pub term: f32,
    /// Prefix match in body terms
    pub partial_term: f32,
    /// Exact stem match in title terms
    pub title: f32,
    /// Prefix match in title terms
    pub partial_title: f32,
    /// Pattern equals the final component of an API symbol
    pub object_name: f32,
    /// Pattern contained elsewhere in an API symbol
    pub object_partial: f32,
    /// Additive adjustment by object display priority (0, 1, 2)
    pub priority_bonus: [f32; 3],
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            term: 5.0,
            partial_term: 2.0,
            title: 15.0,
            partial_title: 7.0,
            object_name: 11.0,
            object_partial: 6.0,
            priority_bonus: [15.0, 5.0, -5.0],
        }
    }
}

impl ScoreWeights {
    /// Additive score adjustment for an object's display priority
    ///
    /// Priorities outside the table (deprecated or hidden entries) get no
    /// adjustment.
    pub fn priority_adjustment(&self, priority: i32) -> f32 {
        match priority {
            0 => self.priority_bonus[0],
            1 => self.priority_bonus[1],
            2 => self.priority_bonus[2],
            _ => 0.0,
        }
    }
}
