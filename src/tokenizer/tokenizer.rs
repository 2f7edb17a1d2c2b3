use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use stop_words::{get, LANGUAGE};
use unicode_segmentation::UnicodeSegmentation;

use crate::config::TokenizerConfig;

/// Query analyzer with stemming and stopword removal
///
/// Mirrors the analysis the documentation generator applied when it built
/// the artifact: the `terms` and `titleterms` keys are lowercase stems.
pub struct Tokenizer {
    config: TokenizerConfig,
    stemmer: Option<Stemmer>,
    stopwords: HashSet<String>,
}

impl Tokenizer {
    /// Create a new tokenizer from configuration
    pub fn new(config: &TokenizerConfig) -> Self {
        let stemmer = if config.stem {
            Some(Stemmer::create(Algorithm::English))
        } else {
            None
        };

        let stopwords = if config.remove_stopwords {
            get(LANGUAGE::English)
                .into_iter()
                .map(|s| s.to_lowercase())
                .collect()
        } else {
            HashSet::new()
        };

        Self {
            config: config.clone(),
            stemmer,
            stopwords,
        }
    }

    /// Tokenize text into a vector of index-side stems
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.token_pairs(text).into_iter().map(|(_, s)| s).collect()
    }

    /// Tokenize text into (surface form, stem) pairs, in order
    ///
    /// The surface form is the lowercased word before stemming. Symbol
    /// matching needs it: API object names in the artifact are not stemmed,
    /// while `terms`/`titleterms` keys are.
    pub fn token_pairs(&self, text: &str) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        for word in text.unicode_words() {
            let mut token = word.to_string();

            if self.config.lowercase {
                token = token.to_lowercase();
            }

            if token.len() < self.config.min_token_length
                || token.len() > self.config.max_token_length
            {
                continue;
            }

            if self.stopwords.contains(&token) {
                continue;
            }

            let stem = match &self.stemmer {
                Some(stemmer) => stemmer.stem(&token).to_string(),
                None => token.clone(),
            };

            pairs.push((token, stem));
        }

        pairs
    }

    /// Get unique stems from text
    pub fn unique_terms(&self, text: &str) -> HashSet<String> {
        self.tokenize(text).into_iter().collect()
    }

    /// Stem a single already-normalized word
    pub fn stem(&self, word: &str) -> String {
        match &self.stemmer {
            Some(stemmer) => stemmer.stem(word).to_string(),
            None => word.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_config() -> TokenizerConfig {
        TokenizerConfig {
            lowercase: true,
            remove_stopwords: false,
            stem: false,
            min_token_length: 2,
            max_token_length: 50,
            language: "english".to_string(),
        }
    }

    #[test]
    fn test_basic_tokenization() {
        let tokenizer = Tokenizer::new(&plain_config());
        let tokens = tokenizer.tokenize("Hello World! This is a test.");

        assert!(tokens.contains(&"hello".to_string()));
        assert!(tokens.contains(&"world".to_string()));
        assert!(tokens.contains(&"test".to_string()));
    }

    #[test]
    fn test_stopword_removal() {
        let config = TokenizerConfig {
            remove_stopwords: true,
            ..plain_config()
        };

        let tokenizer = Tokenizer::new(&config);
        let tokens = tokenizer.tokenize("This is a guide about the backend");

        assert!(!tokens.contains(&"this".to_string()));
        assert!(!tokens.contains(&"the".to_string()));
        assert!(tokens.contains(&"guide".to_string()));
        assert!(tokens.contains(&"backend".to_string()));
    }

    #[test]
    fn test_stemming() {
        let config = TokenizerConfig {
            stem: true,
            ..plain_config()
        };

        let tokenizer = Tokenizer::new(&config);
        let tokens = tokenizer.tokenize("running runs runner");

        // All should stem to something starting with "run"
        assert!(tokens.iter().all(|t| t.starts_with("run")));
    }

    #[test]
    fn test_token_pairs_keep_surface_form() {
        let config = TokenizerConfig {
            stem: true,
            ..plain_config()
        };

        let tokenizer = Tokenizer::new(&config);
        let pairs = tokenizer.token_pairs("Connected Backends");

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].0, "connected");
        assert_eq!(pairs[0].1, "connect");
        assert_eq!(pairs[1].0, "backends");
        assert_eq!(pairs[1].1, "backend");
    }

    #[test]
    fn test_min_max_token_length() {
        let config = TokenizerConfig {
            min_token_length: 3,
            max_token_length: 5,
            ..plain_config()
        };

        let tokenizer = Tokenizer::new(&config);
        let tokens = tokenizer.tokenize("a ab abc abcd abcde abcdef");

        assert!(!tokens.contains(&"ab".to_string()));
        assert!(tokens.contains(&"abc".to_string()));
        assert!(tokens.contains(&"abcde".to_string()));
        assert!(!tokens.contains(&"abcdef".to_string()));
    }

    #[test]
    fn test_unique_terms() {
        let tokenizer = Tokenizer::new(&plain_config());
        let unique = tokenizer.unique_terms("backend backend provider");
        assert_eq!(unique.len(), 2);
    }

    #[test]
    fn test_stem_single_word() {
        let config = TokenizerConfig {
            stem: true,
            ..plain_config()
        };
        let tokenizer = Tokenizer::new(&config);
        assert_eq!(tokenizer.stem("connected"), "connect");
    }
}
