//! Raw serde mirror of the artifact structure
//!
//! Plain data, no semantics: field names and shapes match the generator's
//! output exactly. Compilation into the queryable [`SearchIndex`] happens
//! in the parent module.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Posting list as serialized: a bare document ID or a list of them
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPostings {
    One(u32),
    Many(Vec<u32>),
}

impl RawPostings {
    /// Document IDs in serialized order
    pub fn docs(&self) -> Vec<u32> {
        match self {
            RawPostings::One(doc) => vec![*doc],
            RawPostings::Many(docs) => docs.clone(),
        }
    }

    /// Number of referenced documents
    pub fn len(&self) -> usize {
        match self {
            RawPostings::One(_) => 1,
            RawPostings::Many(docs) => docs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One `objects` entry: (doc, type code, display priority, anchor, short name)
///
/// The anchor field uses two sentinels: `""` means "anchor is the full
/// name", `"-"` means "anchor is `<typename>-<fullname>`".
pub type RawObjectEntry = (u32, usize, i32, String, String);

/// One `alltitles`/`indexentries` location: (doc, anchor)
pub type RawAnchorRef = (u32, Option<String>);

/// The deserialized artifact, one-to-one with the generator's output
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawSearchIndex {
    /// Source document identifiers; position is the document ID
    pub docnames: Vec<String>,
    /// Source file paths, parallel to docnames
    pub filenames: Vec<String>,
    /// Page titles, parallel to docnames
    pub titles: Vec<String>,
    /// Extension name to schema version, generator-private
    #[serde(default)]
    pub envversion: BTreeMap<String, u32>,
    /// Namespace to documented API symbols
    #[serde(default)]
    pub objects: BTreeMap<String, Vec<RawObjectEntry>>,
    /// Type code to (domain, typename, display name)
    #[serde(default)]
    pub objnames: BTreeMap<String, (String, String, String)>,
    /// Type code to "domain:typename"
    #[serde(default)]
    pub objtypes: BTreeMap<String, String>,
    /// Inverted index over body stems
    #[serde(default)]
    pub terms: BTreeMap<String, RawPostings>,
    /// Inverted index over title/heading stems
    #[serde(default)]
    pub titleterms: BTreeMap<String, RawPostings>,
    /// Section heading text to locations; absent in some releases
    #[serde(default)]
    pub alltitles: BTreeMap<String, Vec<RawAnchorRef>>,
    /// Glossary/index entries to locations; absent in some releases
    #[serde(default)]
    pub indexentries: BTreeMap<String, Vec<RawAnchorRef>>,
}

impl RawSearchIndex {
    /// Number of documents
    pub fn doc_count(&self) -> usize {
        self.docnames.len()
    }
}
