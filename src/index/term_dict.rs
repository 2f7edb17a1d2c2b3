//! Term dictionary using FST (Finite State Transducer)
//!
//! Maps each indexed stem to its posting bitmap. FST gives O(|key|)
//! lookups and cheap prefix streaming, which backs partial matching.

use fst::automaton::Str;
use fst::{Automaton, IntoStreamer, Map, MapBuilder, Streamer};
use roaring::RoaringBitmap;

use crate::error::DocdexError;
use crate::Result;

/// Immutable term dictionary backed by FST
///
/// The FST stores a u64 index into a postings array kept parallel to the
/// FST's output values.
pub struct TermDictionary {
    /// FST mapping stem -> index into postings
    fst: Map<Vec<u8>>,
    /// Posting bitmap for each stem
    postings: Vec<RoaringBitmap>,
}

impl TermDictionary {
    /// Create an empty dictionary
    pub fn empty() -> Self {
        TermDictionaryBuilder::new()
            .build()
            .expect("empty dictionary is always valid")
    }

    /// Look up the posting bitmap for a stem
    pub fn get(&self, term: &str) -> Option<&RoaringBitmap> {
        self.fst
            .get(term.as_bytes())
            .map(|idx| &self.postings[idx as usize])
    }

    /// Check if a stem is indexed
    pub fn contains(&self, term: &str) -> bool {
        self.fst.contains_key(term.as_bytes())
    }

    /// Number of distinct stems
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Stream all stems sharing a prefix, in lexicographic order
    ///
    /// The exact term itself is excluded: callers pair this with an exact
    /// lookup and weight the two differently, so returning the prefix as
    /// one of its own expansions would double-count it. Expansion stops
    /// after `max_expansions` terms.
    pub fn prefix_search(
        &self,
        prefix: &str,
        max_expansions: usize,
    ) -> Vec<(String, &RoaringBitmap)> {
        let matcher = Str::new(prefix).starts_with();
        let mut stream = self.fst.search(matcher).into_stream();

        let mut results = Vec::new();
        while let Some((key, idx)) = stream.next() {
            if results.len() >= max_expansions {
                break;
            }
            if key == prefix.as_bytes() {
                continue;
            }
            if let Ok(term) = std::str::from_utf8(key) {
                results.push((term.to_string(), &self.postings[idx as usize]));
            }
        }

        results
    }

    /// Total number of postings across all stems
    pub fn posting_count(&self) -> u64 {
        self.postings.iter().map(|p| p.len()).sum()
    }
}

/// Builder for term dictionaries
pub struct TermDictionaryBuilder {
    terms: Vec<(String, RoaringBitmap)>,
}

impl TermDictionaryBuilder {
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            terms: Vec::with_capacity(capacity),
        }
    }

    /// Add a stem with the documents it occurs in
    pub fn add(&mut self, term: String, docs: impl IntoIterator<Item = u32>) {
        let mut bitmap = RoaringBitmap::new();
        for doc in docs {
            bitmap.insert(doc);
        }
        self.terms.push((term, bitmap));
    }

    /// Build the dictionary
    ///
    /// Input order does not matter; the FST requires sorted unique keys,
    /// so the builder sorts and rejects duplicates.
    pub fn build(mut self) -> Result<TermDictionary> {
        self.terms.sort_by(|a, b| a.0.cmp(&b.0));

        let mut fst_builder = MapBuilder::memory();
        let mut postings = Vec::with_capacity(self.terms.len());

        let mut previous: Option<&str> = None;
        for (term, bitmap) in &self.terms {
            if previous == Some(term.as_str()) {
                return Err(DocdexError::IndexError(format!(
                    "duplicate term {:?} in dictionary",
                    term
                )));
            }
            fst_builder
                .insert(term.as_bytes(), postings.len() as u64)
                .map_err(|e| DocdexError::IndexError(e.to_string()))?;
            postings.push(bitmap.clone());
            previous = Some(term.as_str());
        }

        let fst_data = fst_builder
            .into_inner()
            .map_err(|e| DocdexError::IndexError(e.to_string()))?;
        let fst = Map::new(fst_data).map_err(|e| DocdexError::IndexError(e.to_string()))?;

        Ok(TermDictionary { fst, postings })
    }
}

impl Default for TermDictionaryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dict() -> TermDictionary {
        let mut builder = TermDictionaryBuilder::new();
        builder.add("backend".to_string(), [1, 3]);
        builder.add("backends".to_string(), [2]);
        builder.add("circuit".to_string(), [0, 1, 2]);
        builder.add("client".to_string(), [4]);
        builder.build().unwrap()
    }

    #[test]
    fn test_exact_lookup() {
        let dict = sample_dict();
        assert_eq!(dict.len(), 4);

        let postings = dict.get("circuit").unwrap();
        assert_eq!(postings.len(), 3);
        assert!(postings.contains(0));
        assert!(postings.contains(2));

        assert!(dict.get("missing").is_none());
        assert!(dict.contains("client"));
    }

    #[test]
    fn test_prefix_search_excludes_exact() {
        let dict = sample_dict();

        let results = dict.prefix_search("backend", 50);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, "backends");

        let results = dict.prefix_search("c", 50);
        let terms: Vec<&str> = results.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(terms, vec!["circuit", "client"]);
    }

    #[test]
    fn test_prefix_search_max_expansions() {
        let dict = sample_dict();
        let results = dict.prefix_search("c", 1);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_unsorted_input_accepted() {
        let mut builder = TermDictionaryBuilder::new();
        builder.add("zebra".to_string(), [0]);
        builder.add("alpha".to_string(), [1]);
        let dict = builder.build().unwrap();
        assert!(dict.contains("alpha"));
        assert!(dict.contains("zebra"));
    }

    #[test]
    fn test_duplicate_term_rejected() {
        let mut builder = TermDictionaryBuilder::new();
        builder.add("dup".to_string(), [0]);
        builder.add("dup".to_string(), [1]);
        assert!(builder.build().is_err());
    }

    #[test]
    fn test_posting_count() {
        let dict = sample_dict();
        assert_eq!(dict.posting_count(), 7);
    }

    #[test]
    fn test_empty_dictionary() {
        let dict = TermDictionary::empty();
        assert!(dict.is_empty());
        assert!(dict.get("anything").is_none());
        assert!(dict.prefix_search("a", 10).is_empty());
    }
}
