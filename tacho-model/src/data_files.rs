use crate::node::{DataNode, coerce_key};

/// Raw card files keyed by file id, as needed for signature verification.
///
/// The parser emits these either as an object or as a map-like structure
/// keyed by numeric or named file ids. Both shapes normalize to the same
/// ordered list of string-keyed entries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataFiles {
    entries: Vec<(String, DataNode)>,
}

impl DataFiles {
    /// Normalize a `dataFiles` member. Returns `None` when the node is not a mapping.
    pub fn from_node(node: &DataNode) -> Option<DataFiles> {
        let entries = match node {
            DataNode::Object(entries) => entries
                .iter()
                .map(|(k, v)| (k.clone(), v.normalized()))
                .collect::<Vec<_>>(),
            DataNode::Map(entries) => entries
                .iter()
                .map(|(k, v)| (coerce_key(k), v.normalized()))
                .collect::<Vec<_>>(),
            _ => return None,
        };

        let mut files = DataFiles::default();
        for (id, content) in entries {
            files.insert(id, content);
        }
        Some(files)
    }

    /// Insert or replace a file. Replacing keeps the original position.
    pub fn insert(&mut self, id: impl Into<String>, content: DataNode) {
        let id = id.into();
        match self.entries.iter_mut().find(|(k, _)| *k == id) {
            Some(slot) => slot.1 = content,
            None => self.entries.push((id, content)),
        }
    }

    pub fn get(&self, id: &str) -> Option<&DataNode> {
        self.entries.iter().find(|(k, _)| k == id).map(|(_, v)| v)
    }

    /// Content of a file as raw bytes, when it is stored as a byte array.
    pub fn bytes(&self, id: &str) -> Option<Vec<u8>> {
        self.get(id).and_then(DataNode::as_bytes)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DataNode)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
