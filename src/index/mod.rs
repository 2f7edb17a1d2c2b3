//! Compiled, queryable form of a search index artifact

pub mod objects;
pub mod raw;
pub mod term_dict;
pub mod validate;

pub use objects::{ApiObject, ObjectType, ObjectTypeTable};
pub use term_dict::{TermDictionary, TermDictionaryBuilder};
pub use validate::{validate, Violation};

use std::collections::BTreeMap;
use std::path::Path;

use roaring::RoaringBitmap;
use serde::{Deserialize, Serialize};

use crate::error::DocdexError;
use crate::loader;
use crate::Result;

use raw::RawSearchIndex;

/// Document ID: position in the artifact's `docnames` array
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocId(pub u32);

impl DocId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

/// One indexed document
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocEntry {
    /// Canonical source-document identifier
    pub docname: String,
    /// Source file path
    pub filename: String,
    /// Page title
    pub title: String,
}

/// One section heading location (from `alltitles`)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingEntry {
    pub title: String,
    pub doc: DocId,
    pub anchor: Option<String>,
}

/// One glossary/index entry location (from `indexentries`)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub entry: String,
    pub doc: DocId,
    pub anchor: Option<String>,
}

/// Which inverted index a term-level operation runs against
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    /// Body stems (`terms`)
    Body,
    /// Title/heading stems (`titleterms`)
    Title,
}

impl std::fmt::Display for SearchField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchField::Body => write!(f, "body"),
            SearchField::Title => write!(f, "title"),
        }
    }
}

/// A compiled search index, immutable once built
///
/// Lookups against missing stems or patterns yield empty results, never
/// errors: "term not indexed" is an ordinary outcome of the data.
pub struct SearchIndex {
    docs: Vec<DocEntry>,
    env_versions: BTreeMap<String, u32>,
    objects: Vec<ApiObject>,
    object_types: ObjectTypeTable,
    terms: TermDictionary,
    title_terms: TermDictionary,
    headings: Vec<HeadingEntry>,
    index_entries: Vec<IndexEntry>,
}

impl SearchIndex {
    /// Compile a raw artifact into a queryable index
    ///
    /// Structural problems that make compilation impossible (ragged
    /// parallel arrays, duplicate stems) are errors here. Referential
    /// problems (out-of-range document IDs) are tolerated and surface
    /// through [`validate`] instead; such postings simply never resolve
    /// to a document.
    pub fn compile(raw: RawSearchIndex) -> Result<Self> {
        if raw.docnames.len() != raw.filenames.len() || raw.docnames.len() != raw.titles.len() {
            return Err(DocdexError::IndexError(format!(
                "parallel array lengths differ: {} docnames, {} filenames, {} titles",
                raw.docnames.len(),
                raw.filenames.len(),
                raw.titles.len()
            )));
        }

        let docs = raw
            .docnames
            .iter()
            .zip(raw.filenames.iter())
            .zip(raw.titles.iter())
            .map(|((docname, filename), title)| DocEntry {
                docname: docname.clone(),
                filename: filename.clone(),
                title: title.clone(),
            })
            .collect();

        let object_types = compile_object_types(&raw);
        let objects = compile_objects(&raw, &object_types);
        let terms = compile_dictionary(&raw.terms)?;
        let title_terms = compile_dictionary(&raw.titleterms)?;

        let headings = raw
            .alltitles
            .iter()
            .flat_map(|(title, refs)| {
                refs.iter().map(move |(doc, anchor)| HeadingEntry {
                    title: title.clone(),
                    doc: DocId(*doc),
                    anchor: anchor.clone(),
                })
            })
            .collect();

        let index_entries = raw
            .indexentries
            .iter()
            .flat_map(|(entry, refs)| {
                refs.iter().map(move |(doc, anchor)| IndexEntry {
                    entry: entry.clone(),
                    doc: DocId(*doc),
                    anchor: anchor.clone(),
                })
            })
            .collect();

        Ok(Self {
            docs,
            env_versions: raw.envversion,
            objects,
            object_types,
            terms,
            title_terms,
            headings,
            index_entries,
        })
    }

    /// Compile after validating, refusing artifacts with violations
    pub fn compile_strict(raw: RawSearchIndex) -> Result<Self> {
        let violations = validate(&raw);
        if !violations.is_empty() {
            for violation in &violations {
                tracing::warn!(invariant = %violation.invariant, "integrity violation");
            }
            return Err(DocdexError::IntegrityCheckFailed {
                violations: violations.len(),
            });
        }
        Self::compile(raw)
    }

    /// Load and compile an artifact file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::compile(loader::load_file(path)?)
    }

    /// Load, validate and compile an artifact file
    pub fn load_strict(path: impl AsRef<Path>) -> Result<Self> {
        Self::compile_strict(loader::load_file(path)?)
    }

    /// All documents, in artifact order
    pub fn docs(&self) -> &[DocEntry] {
        &self.docs
    }

    /// Resolve a document ID
    pub fn doc(&self, id: DocId) -> Option<&DocEntry> {
        self.docs.get(id.as_usize())
    }

    /// Number of documents
    pub fn doc_count(&self) -> usize {
        self.docs.len()
    }

    /// The dictionary for a field
    pub fn dictionary(&self, field: SearchField) -> &TermDictionary {
        match field {
            SearchField::Body => &self.terms,
            SearchField::Title => &self.title_terms,
        }
    }

    /// Posting bitmap for an exact stem, empty if not indexed
    pub fn postings(&self, field: SearchField, term: &str) -> RoaringBitmap {
        self.dictionary(field)
            .get(term)
            .cloned()
            .unwrap_or_default()
    }

    /// All documented API symbols, sorted by name
    pub fn objects(&self) -> &[ApiObject] {
        &self.objects
    }

    /// Object type lookup tables
    pub fn object_types(&self) -> &ObjectTypeTable {
        &self.object_types
    }

    /// Section headings (empty when the release carries no `alltitles`)
    pub fn headings(&self) -> &[HeadingEntry] {
        &self.headings
    }

    /// Glossary/index entries (empty when absent from the release)
    pub fn index_entries(&self) -> &[IndexEntry] {
        &self.index_entries
    }

    /// Generator extension versions
    pub fn env_versions(&self) -> &BTreeMap<String, u32> {
        &self.env_versions
    }

    /// Bitmap of every document ID
    pub fn all_docs(&self) -> RoaringBitmap {
        let mut bitmap = RoaringBitmap::new();
        bitmap.insert_range(0..self.docs.len() as u32);
        bitmap
    }
}

fn compile_object_types(raw: &RawSearchIndex) -> ObjectTypeTable {
    let mut types = BTreeMap::new();
    for (code, (domain, typename, display)) in &raw.objnames {
        if let Ok(code) = code.parse::<usize>() {
            types.insert(
                code,
                ObjectType {
                    domain: domain.clone(),
                    typename: typename.clone(),
                    display: display.clone(),
                },
            );
        }
    }

    let mut aliases = BTreeMap::new();
    for (code, alias) in &raw.objtypes {
        if let Ok(code) = code.parse::<usize>() {
            aliases.insert(code, alias.clone());
        }
    }

    ObjectTypeTable::new(types, aliases)
}

fn compile_objects(raw: &RawSearchIndex, table: &ObjectTypeTable) -> Vec<ApiObject> {
    let mut objects: Vec<ApiObject> = raw
        .objects
        .iter()
        .flat_map(|(namespace, entries)| {
            entries.iter().map(move |(doc, type_code, priority, anchor, shortname)| {
                let name = objects::join_name(namespace, shortname);
                let typename = table.get(*type_code).map(|t| t.typename.as_str());
                let anchor = objects::resolve_anchor(anchor, &name, typename);
                ApiObject {
                    name,
                    doc: DocId(*doc),
                    type_code: *type_code,
                    priority: *priority,
                    anchor,
                }
            })
        })
        .collect();

    objects.sort_by(|a, b| a.name.cmp(&b.name));
    objects
}

fn compile_dictionary(terms: &BTreeMap<String, raw::RawPostings>) -> Result<TermDictionary> {
    let mut builder = TermDictionaryBuilder::with_capacity(terms.len());
    for (term, postings) in terms {
        builder.add(term.clone(), postings.docs());
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_raw() -> RawSearchIndex {
        serde_json::from_str(
            r#"{
                "docnames": ["index", "api/acme", "api/acme.client", "guide"],
                "filenames": ["index.rst", "api/acme.rst", "api/acme.client.rst", "guide.rst"],
                "titles": ["Acme SDK", "acme", "acme.client", "User guide"],
                "envversion": {"sphinx.domains.python": 3, "sphinx": 56},
                "objects": {
                    "": [[1, 0, 0, "-", "acme"]],
                    "acme": [[2, 0, 0, "-", "client"]],
                    "acme.client": [[2, 1, 1, "", "Client"]]
                },
                "objnames": {
                    "0": ["py", "module", "Python module"],
                    "1": ["py", "class", "Python class"]
                },
                "objtypes": {"0": "py:module", "1": "py:class"},
                "terms": {"client": [2, 3], "sdk": 0, "backend": [1, 2, 3]},
                "titleterms": {"acme": [1, 2], "guide": 3, "sdk": 0},
                "alltitles": {"User guide": [[3, "user-guide"]]},
                "indexentries": {"client (class)": [[2, "acme.client.Client"]]}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_compile_docs() {
        let index = SearchIndex::compile(sample_raw()).unwrap();
        assert_eq!(index.doc_count(), 4);
        let doc = index.doc(DocId(2)).unwrap();
        assert_eq!(doc.docname, "api/acme.client");
        assert_eq!(doc.title, "acme.client");
        assert!(index.doc(DocId(17)).is_none());
    }

    #[test]
    fn test_compile_dictionaries() {
        let index = SearchIndex::compile(sample_raw()).unwrap();
        assert_eq!(index.dictionary(SearchField::Body).len(), 3);
        assert_eq!(index.dictionary(SearchField::Title).len(), 3);

        let postings = index.postings(SearchField::Body, "client");
        assert!(postings.contains(2) && postings.contains(3));

        // Single-integer postings load like one-element lists
        let postings = index.postings(SearchField::Body, "sdk");
        assert_eq!(postings.len(), 1);

        // Unknown stems are empty results, not errors
        assert!(index.postings(SearchField::Body, "nope").is_empty());
    }

    #[test]
    fn test_compile_objects() {
        let index = SearchIndex::compile(sample_raw()).unwrap();
        let names: Vec<&str> = index.objects().iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["acme", "acme.client", "acme.client.Client"]);

        let module = &index.objects()[1];
        assert_eq!(module.anchor, "module-acme.client");
        assert_eq!(module.doc, DocId(2));

        let class = &index.objects()[2];
        assert_eq!(class.anchor, "acme.client.Client");
        assert_eq!(class.tail(), "Client");
    }

    #[test]
    fn test_compile_auxiliary_tables() {
        let index = SearchIndex::compile(sample_raw()).unwrap();
        assert_eq!(index.headings().len(), 1);
        assert_eq!(index.headings()[0].anchor.as_deref(), Some("user-guide"));
        assert_eq!(index.index_entries().len(), 1);
        assert_eq!(index.env_versions().get("sphinx"), Some(&56));
    }

    #[test]
    fn test_compile_ragged_arrays_rejected() {
        let mut raw = sample_raw();
        raw.filenames.pop();
        assert!(matches!(
            SearchIndex::compile(raw),
            Err(DocdexError::IndexError(_))
        ));
    }

    #[test]
    fn test_compile_strict_rejects_bad_references() {
        let mut raw = sample_raw();
        raw.terms.insert(
            "rogue".to_string(),
            raw::RawPostings::Many(vec![2, 99]),
        );
        assert!(matches!(
            SearchIndex::compile_strict(raw),
            Err(DocdexError::IntegrityCheckFailed { .. })
        ));
    }

    #[test]
    fn test_all_docs_bitmap() {
        let index = SearchIndex::compile(sample_raw()).unwrap();
        assert_eq!(index.all_docs().len(), 4);
    }
}
