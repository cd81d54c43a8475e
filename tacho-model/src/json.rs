//! Canonical JSON text for display and export.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::node::DataNode;

/// Indent used when showing a section inline.
pub const DISPLAY_INDENT: usize = 2;
/// Indent used for downloaded export files.
pub const EXPORT_INDENT: usize = 4;

#[derive(Debug, thiserror::Error)]
pub enum JsonWriteError {
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("serializer produced invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Pretty-print a node with `indent` spaces per level.
///
/// Map-like structures are rewritten into objects first, keeping insertion
/// order and coercing keys to strings.
pub fn to_json_string(node: &DataNode, indent: usize) -> Result<String, JsonWriteError> {
    let value = node.to_json();
    let indent = vec![b' '; indent];
    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(&indent));
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8(out)?)
}

/// Decode JSON text back into a node tree.
pub fn from_json_str(text: &str) -> Result<DataNode, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    Ok(DataNode::from(value))
}
