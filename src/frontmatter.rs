//! Front-matter splitting and parsing.
//!
//! An article file starts with a YAML block fenced by `---` lines, followed by
//! the markdown body:
//!
//! ```text
//! ---
//! title: Spring Lineup
//! brand: Acme
//! topics: [Reviews, News]
//! ---
//! # Body starts here
//! ```
//!
//! The metadata mapping is open-ended: keys the generator doesn't know about
//! are kept and handed to templates as `meta`.

use serde_yaml_ng::{Mapping, Value};
use thiserror::Error;

const DELIMITER: &str = "---";

#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("missing `---` front-matter delimiter")]
    Malformed,
    #[error("front-matter is not valid YAML key/value text: {0}")]
    Metadata(#[from] serde_yaml_ng::Error),
    #[error("front-matter must be a key/value mapping, found {0}")]
    NotAMapping(&'static str),
}

/// A document split into its metadata and body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub meta: Mapping,
    pub body: String,
}

/// Reads a metadata-prefixed text document.
///
/// The YAML `---` convention is the only format today; the trait keeps the
/// scanner independent of it.
pub trait DocumentReader {
    fn read(&self, text: &str) -> Result<Document, FrontMatterError>;
}

/// `---`-fenced YAML front-matter.
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlFrontMatter;

impl DocumentReader for YamlFrontMatter {
    fn read(&self, text: &str) -> Result<Document, FrontMatterError> {
        let (raw, body) = split(text)?;
        let meta = parse_meta(raw)?;
        Ok(Document {
            meta,
            body: body.to_string(),
        })
    }
}

/// Split text into `(metadata block, body)`.
///
/// The opening delimiter must be the first line (a UTF-8 BOM is skipped).
/// Delimiter lines may carry trailing whitespace. The body starts on the line
/// after the closing delimiter.
pub fn split(text: &str) -> Result<(&str, &str), FrontMatterError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let (first, mut rest) = next_line(text).ok_or(FrontMatterError::Malformed)?;
    if first.trim_end() != DELIMITER {
        return Err(FrontMatterError::Malformed);
    }

    let block_start = text.len() - rest.len();
    loop {
        let line_start = text.len() - rest.len();
        let (line, after) = next_line(rest).ok_or(FrontMatterError::Malformed)?;
        if line.trim_end() == DELIMITER {
            return Ok((&text[block_start..line_start], after));
        }
        rest = after;
    }
}

/// Return the next line (without its terminator) and the text after it.
/// `None` once the input is exhausted.
fn next_line(text: &str) -> Option<(&str, &str)> {
    if text.is_empty() {
        return None;
    }
    match text.find('\n') {
        Some(pos) => {
            let line = &text[..pos];
            Some((line.strip_suffix('\r').unwrap_or(line), &text[pos + 1..]))
        }
        None => Some((text, "")),
    }
}

/// Parse a metadata block into a mapping. An empty block is an empty mapping.
pub fn parse_meta(raw: &str) -> Result<Mapping, FrontMatterError> {
    if raw.trim().is_empty() {
        return Ok(Mapping::new());
    }
    match serde_yaml_ng::from_str::<Value>(raw)? {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        Value::Sequence(_) => Err(FrontMatterError::NotAMapping("a list")),
        Value::Tagged(_) => Err(FrontMatterError::NotAMapping("a tagged value")),
        Value::String(_) | Value::Number(_) | Value::Bool(_) => {
            Err(FrontMatterError::NotAMapping("a scalar"))
        }
    }
}

/// A string field, trimmed. Numbers and bools are rendered to text; empty
/// strings and containers count as absent.
pub fn get_str(meta: &Mapping, key: &str) -> Option<String> {
    let text = match meta.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// A list field. A bare scalar is treated as a one-element list so
/// `topics: News` and `topics: [News]` mean the same thing.
pub fn get_list(meta: &Mapping, key: &str) -> Vec<String> {
    match meta.get(key) {
        Some(Value::Sequence(items)) => items.iter().filter_map(scalar_text).collect(),
        Some(value) => scalar_text(value).into_iter().collect(),
        None => Vec::new(),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
