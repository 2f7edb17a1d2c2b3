//! Loading of search index artifacts
//!
//! An artifact is a single JavaScript call, `Search.setIndex({...})`,
//! wrapping one large object literal. Loading strips the call wrapper,
//! parses the literal (both the quoted and the bare-key dialect) and
//! deserializes the result into [`RawSearchIndex`].

mod lexer;
mod parser;

pub use lexer::{Lexer, Token};
pub use parser::LiteralParser;

use std::path::Path;
use std::time::Instant;

use tracing::debug;

use crate::error::DocdexError;
use crate::index::raw::RawSearchIndex;
use crate::Result;

/// Call wrapper emitted by the generator around the index literal
const WRAPPER_PREFIX: &str = "Search.setIndex(";

/// Strip the `Search.setIndex(...)` call wrapper, returning the literal
fn strip_wrapper(input: &str) -> Result<&str> {
    let trimmed = input.trim();
    let rest = trimmed.strip_prefix(WRAPPER_PREFIX).ok_or_else(|| {
        DocdexError::BadWrapper(format!("input does not start with {:?}", WRAPPER_PREFIX))
    })?;

    let rest = rest.trim_end();
    let rest = rest.strip_suffix(';').unwrap_or(rest).trim_end();
    let rest = rest
        .strip_suffix(')')
        .ok_or_else(|| DocdexError::BadWrapper("unterminated call wrapper".to_string()))?;

    Ok(rest)
}

/// Load a raw search index from artifact text
pub fn load_str(input: &str) -> Result<RawSearchIndex> {
    let literal = strip_wrapper(input)?;
    let value = LiteralParser::new(literal)?.parse()?;
    let raw: RawSearchIndex = serde_json::from_value(value)?;
    Ok(raw)
}

/// Load a raw search index from an artifact file
pub fn load_file(path: impl AsRef<Path>) -> Result<RawSearchIndex> {
    let path = path.as_ref();
    let start = Instant::now();
    let input = std::fs::read_to_string(path)?;
    let raw = load_str(&input)?;
    debug!(
        path = %path.display(),
        bytes = input.len(),
        docs = raw.docnames.len(),
        terms = raw.terms.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "loaded search index artifact"
    );
    Ok(raw)
}
