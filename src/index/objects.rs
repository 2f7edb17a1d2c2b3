//! Documented API symbols and their type tables

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::DocId;

/// One object type from the artifact's lookup tables
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectType {
    /// Documentation domain, e.g. "py"
    pub domain: String,
    /// Type name within the domain, e.g. "class"
    pub typename: String,
    /// Human-readable label, e.g. "Python class"
    pub display: String,
}

impl ObjectType {
    /// The "domain:typename" form used by the `objtypes` table
    pub fn qualified(&self) -> String {
        format!("{}:{}", self.domain, self.typename)
    }
}

/// Lookup table merging the artifact's `objnames` and `objtypes`
#[derive(Clone, Debug, Default)]
pub struct ObjectTypeTable {
    types: BTreeMap<usize, ObjectType>,
    /// Raw `objtypes` values, kept for integrity checking
    aliases: BTreeMap<usize, String>,
}

impl ObjectTypeTable {
    pub fn new(
        types: BTreeMap<usize, ObjectType>,
        aliases: BTreeMap<usize, String>,
    ) -> Self {
        Self { types, aliases }
    }

    /// Look up a type by its code
    pub fn get(&self, code: usize) -> Option<&ObjectType> {
        self.types.get(&code)
    }

    /// Human-readable label for a code
    pub fn display(&self, code: usize) -> Option<&str> {
        self.types.get(&code).map(|t| t.display.as_str())
    }

    /// Raw `objtypes` alias for a code
    pub fn alias(&self, code: usize) -> Option<&str> {
        self.aliases.get(&code).map(|s| s.as_str())
    }

    /// Number of known type codes
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate (code, type) pairs
    pub fn iter(&self) -> impl Iterator<Item = (usize, &ObjectType)> {
        self.types.iter().map(|(code, t)| (*code, t))
    }
}

/// A documented API symbol
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiObject {
    /// Full dotted path, namespace included
    pub name: String,
    /// Document the symbol is described in
    pub doc: DocId,
    /// Code into the object type table
    pub type_code: usize,
    /// Display priority flag (0 highest)
    pub priority: i32,
    /// Resolved page anchor
    pub anchor: String,
}

impl ApiObject {
    /// Final dotted component of the symbol name
    pub fn tail(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

/// Resolve the anchor sentinels used by the artifact
///
/// `""` means the anchor equals the full name; `"-"` means the anchor is
/// `<typename>-<fullname>` (the form used for module targets). Anything
/// else is already a literal anchor.
pub fn resolve_anchor(raw: &str, fullname: &str, typename: Option<&str>) -> String {
    match raw {
        "" => fullname.to_string(),
        "-" => match typename {
            Some(typename) => format!("{}-{}", typename, fullname),
            // Unknown type code; validation reports it, resolution degrades
            None => fullname.to_string(),
        },
        other => other.to_string(),
    }
}

/// Join a namespace and short name into a full dotted path
pub fn join_name(namespace: &str, shortname: &str) -> String {
    if namespace.is_empty() {
        shortname.to_string()
    } else {
        format!("{}.{}", namespace, shortname)
    }
}
