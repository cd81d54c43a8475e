//! What the engine renders into.

use crate::menu::MenuItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportTarget {
    /// The whole loaded record.
    All,
    /// The currently selected part.
    Selected,
}

/// Rendering surface for menus and content.
///
/// A browser front-end maps these to DOM nodes; tests record them.
pub trait RenderSink {
    /// Drop the current menu and content.
    fn clear(&mut self);
    fn render_menu_item(&mut self, item: &MenuItem);
    fn render_content(&mut self, content: &str);
    fn set_export_enabled(&mut self, target: ExportTarget, enabled: bool);
}

/// Discards everything, for callers that only use return values.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn clear(&mut self) {}
    fn render_menu_item(&mut self, _item: &MenuItem) {}
    fn render_content(&mut self, _content: &str) {}
    fn set_export_enabled(&mut self, _target: ExportTarget, _enabled: bool) {}
}

impl<S: RenderSink + ?Sized> RenderSink for &mut S {
    fn clear(&mut self) {
        (**self).clear();
    }

    fn render_menu_item(&mut self, item: &MenuItem) {
        (**self).render_menu_item(item);
    }

    fn render_content(&mut self, content: &str) {
        (**self).render_content(content);
    }

    fn set_export_enabled(&mut self, target: ExportTarget, enabled: bool) {
        (**self).set_export_enabled(target, enabled);
    }
}
