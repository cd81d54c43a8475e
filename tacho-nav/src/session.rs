//! In-memory state for the currently loaded record.

use std::path::Path;

use tacho_model::{DataNode, Record};

/// Export key used for the whole record.
pub const ALL_KEY: &str = "all";

/// The section currently shown.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub key: String,
    pub data: DataNode,
}

/// Loaded record, its file name and the current selection.
///
/// A fresh session is created for every load; nothing outlives it.
#[derive(Debug, Default)]
pub struct Session {
    load_id: u64,
    file_name: Option<String>,
    record: Option<Record>,
    selection: Option<Selection>,
}

impl Session {
    pub fn new(load_id: u64, file_name: impl Into<String>, record: Record) -> Self {
        Self {
            load_id,
            file_name: Some(file_name.into()),
            record: Some(record),
            selection: None,
        }
    }

    pub fn load_id(&self) -> u64 {
        self.load_id
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn record(&self) -> Option<&Record> {
        self.record.as_ref()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn select(&mut self, key: impl Into<String>, data: DataNode) {
        self.selection = Some(Selection { key: key.into(), data });
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn can_export_all(&self) -> bool {
        self.record.is_some()
    }

    pub fn can_export_selected(&self) -> bool {
        self.selection.is_some()
    }

    /// Download name for an export of `key`.
    pub fn export_file_name(&self, key: &str) -> String {
        export_file_name(self.file_name.as_deref(), key)
    }
}

/// Replace the extension of `file_name` with `-<key>.json`.
pub fn export_file_name(file_name: Option<&str>, key: &str) -> String {
    let stem = file_name
        .map(|name| Path::new(name).with_extension(""))
        .and_then(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "record".to_string());
    format!("{stem}-{key}.json")
}
