//! Catalog of search indexes across documentation releases
//!
//! A documentation set publishes one artifact per released version,
//! laid out as `<root>/<version>/searchindex.js`. The catalog loads all
//! of them, orders releases numerically (11.8 sorts after 8.0) and
//! answers cross-release questions such as "which releases document
//! this symbol".

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::config::SearchSettings;
use crate::error::DocdexError;
use crate::index::SearchIndex;
use crate::Result;

/// File name the generator gives every artifact
const ARTIFACT_FILE: &str = "searchindex.js";

/// A dotted-integer release label, ordered numerically
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionLabel(Vec<u32>);

impl VersionLabel {
    /// The numeric components
    pub fn components(&self) -> &[u32] {
        &self.0
    }
}

impl FromStr for VersionLabel {
    type Err = DocdexError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(DocdexError::InvalidVersion(s.to_string()));
        }
        let components = s
            .split('.')
            .map(|part| {
                part.parse::<u32>()
                    .map_err(|_| DocdexError::InvalidVersion(s.to_string()))
            })
            .collect::<Result<Vec<u32>>>()?;
        Ok(Self(components))
    }
}

impl fmt::Display for VersionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join("."))
    }
}

/// All releases of one documentation set, oldest first
pub struct VersionCatalog {
    releases: Vec<(VersionLabel, SearchIndex)>,
}

impl VersionCatalog {
    /// Scan a directory of `<version>/searchindex.js` releases
    ///
    /// Subdirectories whose names are not dotted-integer labels, and
    /// version directories without an artifact file, are skipped with a
    /// warning. Artifacts that exist but fail to load are errors. An
    /// empty scan result is an error.
    pub fn load_dir(root: impl AsRef<Path>, settings: &SearchSettings) -> Result<Self> {
        let root = root.as_ref();
        let mut releases = Vec::new();

        for entry in std::fs::read_dir(root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            let label = match name.parse::<VersionLabel>() {
                Ok(label) => label,
                Err(_) => {
                    warn!(directory = %name, "skipping non-version directory");
                    continue;
                }
            };

            let artifact = entry.path().join(ARTIFACT_FILE);
            if !artifact.is_file() {
                warn!(version = %label, "no artifact file in version directory");
                continue;
            }

            let index = if settings.strict {
                SearchIndex::load_strict(&artifact)?
            } else {
                SearchIndex::load(&artifact)?
            };
            debug!(version = %label, docs = index.doc_count(), "loaded release");
            releases.push((label, index));
        }

        if releases.is_empty() {
            return Err(DocdexError::EmptyCatalog(root.display().to_string()));
        }

        releases.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(Self { releases })
    }

    /// Number of releases
    pub fn len(&self) -> usize {
        self.releases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }

    /// Iterate releases, oldest first
    pub fn iter(&self) -> impl Iterator<Item = (&VersionLabel, &SearchIndex)> {
        self.releases.iter().map(|(label, index)| (label, index))
    }

    /// Release labels, oldest first
    pub fn labels(&self) -> Vec<String> {
        self.releases
            .iter()
            .map(|(label, _)| label.to_string())
            .collect()
    }

    /// Fetch one release by its label text
    pub fn get(&self, label: &str) -> Option<&SearchIndex> {
        let wanted = label.parse::<VersionLabel>().ok()?;
        self.releases
            .iter()
            .find(|(label, _)| *label == wanted)
            .map(|(_, index)| index)
    }

    /// The newest release
    pub fn latest(&self) -> Option<(&VersionLabel, &SearchIndex)> {
        self.releases.last().map(|(label, index)| (label, index))
    }

    /// Releases whose API documents a symbol
    ///
    /// A symbol matches by its full dotted name or by its final
    /// component, case-sensitively; symbol names in the artifact are
    /// exact identifiers.
    pub fn releases_with_symbol(&self, symbol: &str) -> Vec<&VersionLabel> {
        self.releases
            .iter()
            .filter(|(_, index)| {
                index
                    .objects()
                    .iter()
                    .any(|object| object.name == symbol || object.tail() == symbol)
            })
            .map(|(label, _)| label)
            .collect()
    }

    /// The oldest release documenting a symbol
    pub fn first_release_with(&self, symbol: &str) -> Option<&VersionLabel> {
        self.releases_with_symbol(symbol).into_iter().next()
    }
}
