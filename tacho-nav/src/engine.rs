//! Entry point tying catalog, selection, export and verification together.

use tacho_model::{
    DISPLAY_INDENT, DataNode, EXPORT_INDENT, JsonWriteError, ParseError, Record, RecordParser,
    to_json_string,
};

use crate::menu::{self, GenerationTag, MenuItem};
use crate::resolver::resolve;
use crate::session::{ALL_KEY, Session};
use crate::sink::{ExportTarget, RenderSink};
use crate::verify::VerificationDispatcher;

/// Output formatting settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Indent for content shown in the sink.
    pub display_indent: usize,
    /// Indent for exported files.
    pub export_indent: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            display_indent: DISPLAY_INDENT,
            export_indent: EXPORT_INDENT,
        }
    }
}

/// A serialized export ready to be offered as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub contents: String,
}

impl ExportFile {
    pub fn as_bytes(&self) -> &[u8] {
        self.contents.as_bytes()
    }
}

pub struct Engine<S: RenderSink> {
    options: EngineOptions,
    sink: S,
    session: Session,
    dispatcher: VerificationDispatcher,
}

impl<S: RenderSink> Engine<S> {
    pub fn new(sink: S, dispatcher: VerificationDispatcher) -> Self {
        Self::with_options(sink, dispatcher, EngineOptions::default())
    }

    pub fn with_options(sink: S, dispatcher: VerificationDispatcher, options: EngineOptions) -> Self {
        Self {
            options,
            sink,
            session: Session::default(),
            dispatcher,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Replace the session with `record` and render its menu.
    ///
    /// Returns the menu that was rendered. Verification of the card
    /// generations is queued and runs only after this returns.
    pub fn load_record(&mut self, record: Record, file_name: &str) -> Vec<MenuItem> {
        let load_id = self.dispatcher.begin_load();
        let items = menu::build(&record);
        log::info!("loaded {file_name}: {} menu items (load {load_id})", items.len());

        self.session = Session::new(load_id, file_name, record);
        self.sink.clear();
        for item in &items {
            self.sink.render_menu_item(item);
        }
        if let Some(record) = self.session.record() {
            show(&mut self.sink, record.raw(), self.options.display_indent);
        }
        self.sink.set_export_enabled(ExportTarget::All, true);
        self.sink.set_export_enabled(ExportTarget::Selected, false);

        if let Some(record) = self.session.record() {
            self.dispatcher.dispatch(record, file_name, load_id);
        }
        items
    }

    /// Parse `bytes` with `parser` and load the result.
    pub fn load_bytes(
        &mut self,
        file_name: &str,
        bytes: &[u8],
        parser: &dyn RecordParser,
    ) -> Result<Vec<MenuItem>, ParseError> {
        let node = parser.parse(bytes)?;
        Ok(self.load_record(Record::from_node(node), file_name))
    }

    /// Show the part behind a menu entry and make it the export selection.
    ///
    /// Returns `None` when the part does not exist; the selection is then
    /// cleared rather than left pointing at an earlier part.
    pub fn on_select(&mut self, key: &str, tag: &GenerationTag) -> Option<DataNode> {
        match resolve(&self.session, key, tag) {
            Some(data) => {
                show(&mut self.sink, &data, self.options.display_indent);
                self.session.select(key, data.clone());
                self.sink.set_export_enabled(ExportTarget::Selected, true);
                Some(data)
            }
            None => {
                log::debug!("{tag}/{key}: not found");
                self.session.clear_selection();
                self.sink.set_export_enabled(ExportTarget::Selected, false);
                None
            }
        }
    }

    /// The whole record as an export file, or `None` before any load.
    pub fn export_all(&self) -> Result<Option<ExportFile>, JsonWriteError> {
        let Some(record) = self.session.record() else {
            return Ok(None);
        };
        Ok(Some(ExportFile {
            file_name: self.session.export_file_name(ALL_KEY),
            contents: to_json_string(record.raw(), self.options.export_indent)?,
        }))
    }

    /// The current selection as an export file, or `None` without one.
    pub fn export_selected(&self) -> Result<Option<ExportFile>, JsonWriteError> {
        let Some(selection) = self.session.selection() else {
            return Ok(None);
        };
        Ok(Some(ExportFile {
            file_name: self.session.export_file_name(&selection.key),
            contents: to_json_string(&selection.data, self.options.export_indent)?,
        }))
    }
}

fn show<S: RenderSink>(sink: &mut S, node: &DataNode, indent: usize) {
    match to_json_string(node, indent) {
        Ok(text) => sink.render_content(&text),
        Err(e) => log::warn!("cannot render content: {e}"),
    }
}
