//! Integrity checking for raw artifacts
//!
//! All checks run against the raw model so that a damaged artifact can be
//! diagnosed even when it cannot be compiled. Checks are static-data
//! invariants: parallel array alignment, referential ranges, posting
//! order, and type table agreement.

use std::collections::{HashMap, HashSet};
use std::fmt;

use super::raw::{RawPostings, RawSearchIndex};

/// A violation of an artifact invariant
#[derive(Clone, Debug)]
pub struct Violation {
    pub invariant: String,
    pub description: String,
    pub context: HashMap<String, String>,
}

impl Violation {
    fn new(invariant: &str, description: String) -> Self {
        Self {
            invariant: invariant.to_string(),
            description,
            context: HashMap::new(),
        }
    }

    fn with_context(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "INTEGRITY VIOLATION: {}", self.invariant)?;
        writeln!(f, "  Description: {}", self.description)?;
        if !self.context.is_empty() {
            writeln!(f, "  Context:")?;
            let mut keys: Vec<_> = self.context.keys().collect();
            keys.sort();
            for key in keys {
                writeln!(f, "    {}: {}", key, self.context[key])?;
            }
        }
        Ok(())
    }
}

/// Check all artifact invariants and return violations
pub fn validate(raw: &RawSearchIndex) -> Vec<Violation> {
    let mut violations = Vec::new();

    check_parallel_arrays(raw, &mut violations);
    check_docnames(raw, &mut violations);
    check_postings(raw, "terms", &raw.terms, &mut violations);
    check_postings(raw, "titleterms", &raw.titleterms, &mut violations);
    check_objects(raw, &mut violations);
    check_type_tables(raw, &mut violations);
    check_anchor_refs(raw, "alltitles", &raw.alltitles, &mut violations);
    check_anchor_refs(raw, "indexentries", &raw.indexentries, &mut violations);

    violations
}

/// docnames, filenames and titles must have the same length
fn check_parallel_arrays(raw: &RawSearchIndex, out: &mut Vec<Violation>) {
    if raw.docnames.len() != raw.filenames.len() || raw.docnames.len() != raw.titles.len() {
        out.push(
            Violation::new(
                "ParallelArraysAligned",
                "every docname must have a filename and a title at the same index".to_string(),
            )
            .with_context("docnames", raw.docnames.len())
            .with_context("filenames", raw.filenames.len())
            .with_context("titles", raw.titles.len()),
        );
    }
}

/// docnames must be non-empty strings and unique
fn check_docnames(raw: &RawSearchIndex, out: &mut Vec<Violation>) {
    let mut seen = HashSet::new();
    for (id, docname) in raw.docnames.iter().enumerate() {
        if docname.is_empty() {
            out.push(
                Violation::new("DocnamesNonEmpty", "empty docname".to_string())
                    .with_context("doc", id),
            );
        }
        if !seen.insert(docname.as_str()) {
            out.push(
                Violation::new("DocnamesUnique", "duplicate docname".to_string())
                    .with_context("docname", docname)
                    .with_context("doc", id),
            );
        }
    }
}

/// Posting lists must reference in-range documents, in strictly
/// ascending order (the order the generator emits)
fn check_postings(
    raw: &RawSearchIndex,
    section: &str,
    postings: &std::collections::BTreeMap<String, RawPostings>,
    out: &mut Vec<Violation>,
) {
    let doc_count = raw.doc_count() as u32;

    for (term, entry) in postings {
        let docs = entry.docs();

        for doc in &docs {
            if *doc >= doc_count {
                out.push(
                    Violation::new(
                        "PostingsInRange",
                        format!("{} posting references a document out of range", section),
                    )
                    .with_context("section", section)
                    .with_context("term", term)
                    .with_context("doc", doc)
                    .with_context("doc_count", doc_count),
                );
            }
        }

        for window in docs.windows(2) {
            if window[0] >= window[1] {
                out.push(
                    Violation::new(
                        "PostingsAscending",
                        format!("{} posting list is not strictly ascending", section),
                    )
                    .with_context("section", section)
                    .with_context("term", term),
                );
                break;
            }
        }
    }
}

/// Object entries must reference in-range documents and known type codes
fn check_objects(raw: &RawSearchIndex, out: &mut Vec<Violation>) {
    let doc_count = raw.doc_count() as u32;

    for (namespace, entries) in &raw.objects {
        for (doc, type_code, _priority, _anchor, shortname) in entries {
            if *doc >= doc_count {
                out.push(
                    Violation::new(
                        "ObjectDocInRange",
                        "object entry references a document out of range".to_string(),
                    )
                    .with_context("namespace", namespace)
                    .with_context("name", shortname)
                    .with_context("doc", doc),
                );
            }
            let code = type_code.to_string();
            if !raw.objnames.contains_key(&code) {
                out.push(
                    Violation::new(
                        "ObjectTypeKnown",
                        "object entry uses a type code missing from objnames".to_string(),
                    )
                    .with_context("namespace", namespace)
                    .with_context("name", shortname)
                    .with_context("type_code", type_code),
                );
            }
        }
    }
}

/// objtypes and objnames must describe the same codes consistently
fn check_type_tables(raw: &RawSearchIndex, out: &mut Vec<Violation>) {
    for (code, alias) in &raw.objtypes {
        match raw.objnames.get(code) {
            None => {
                out.push(
                    Violation::new(
                        "TypeTablesAligned",
                        "objtypes code missing from objnames".to_string(),
                    )
                    .with_context("type_code", code),
                );
            }
            Some((domain, typename, _display)) => {
                let expected = format!("{}:{}", domain, typename);
                if *alias != expected {
                    out.push(
                        Violation::new(
                            "TypeTablesAligned",
                            "objtypes and objnames disagree".to_string(),
                        )
                        .with_context("type_code", code)
                        .with_context("objtypes", alias)
                        .with_context("objnames", expected),
                    );
                }
            }
        }
    }
    for code in raw.objnames.keys() {
        if !raw.objtypes.contains_key(code) {
            out.push(
                Violation::new(
                    "TypeTablesAligned",
                    "objnames code missing from objtypes".to_string(),
                )
                .with_context("type_code", code),
            );
        }
    }
}

/// alltitles/indexentries locations must reference in-range documents
fn check_anchor_refs(
    raw: &RawSearchIndex,
    section: &str,
    entries: &std::collections::BTreeMap<String, Vec<(u32, Option<String>)>>,
    out: &mut Vec<Violation>,
) {
    let doc_count = raw.doc_count() as u32;

    for (entry, refs) in entries {
        for (doc, _anchor) in refs {
            if *doc >= doc_count {
                out.push(
                    Violation::new(
                        "AnchorRefInRange",
                        format!("{} entry references a document out of range", section),
                    )
                    .with_context("section", section)
                    .with_context("entry", entry)
                    .with_context("doc", doc),
                );
            }
        }
    }
}
