//! Boundary to the binary record parser.

use crate::json::from_json_str;
use crate::node::DataNode;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("no input data")]
    EmptyInput,
    #[error("invalid record JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid UTF-8 in record text: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Turns a downloaded file into a record tree.
///
/// Implemented by the binary DDD decoder; this workspace ships only the
/// JSON variant for records the decoder already dumped to disk.
pub trait RecordParser {
    fn parse(&self, bytes: &[u8]) -> Result<DataNode, ParseError>;
}

/// Reads records from their JSON dump.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRecordParser;

impl RecordParser for JsonRecordParser {
    fn parse(&self, bytes: &[u8]) -> Result<DataNode, ParseError> {
        if bytes.is_empty() {
            return Err(ParseError::EmptyInput);
        }
        let text = std::str::from_utf8(bytes)?;
        let node = from_json_str(text)?;
        log::debug!("parsed record JSON ({} bytes)", bytes.len());
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_parser() {
        let node = JsonRecordParser.parse(br#"{"header": {"generation": "FirstGeneration"}}"#).unwrap();
        assert!(node.get("header").is_some());
    }

    #[test]
    fn test_json_parser_errors() {
        assert!(matches!(JsonRecordParser.parse(b""), Err(ParseError::EmptyInput)));
        assert!(matches!(JsonRecordParser.parse(b"{not json"), Err(ParseError::Json(_))));
        assert!(matches!(JsonRecordParser.parse(&[0xFF, 0xFE]), Err(ParseError::Utf8(_))));
    }
}
