pub mod data_files;
pub mod json;
pub mod node;
pub mod parser;
pub mod part;
pub mod record;

pub use data_files::DataFiles;
pub use json::{DISPLAY_INDENT, EXPORT_INDENT, JsonWriteError, from_json_str, to_json_string};
pub use node::{DataNode, coerce_key};
pub use parser::{JsonRecordParser, ParseError, RecordParser};
pub use part::DataPart;
pub use record::*;
