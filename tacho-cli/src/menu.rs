use anyhow::Result;
use std::path::Path;

use tacho_nav::MenuItem;

use crate::Options;
use crate::load::open;

pub fn run_menu(input: &Path, options: &Options) -> Result<()> {
    let items = open(input, options)?.menu;
    if items.is_empty() {
        log::warn!("{}: no selectable parts (missing header or payload)", input.display());
    }
    for item in &items {
        println!("{}", format_item(item));
    }
    Ok(())
}

pub fn format_item(item: &MenuItem) -> String {
    match item {
        MenuItem::Header(label) => format!("[{label}]"),
        MenuItem::Divider => "--".to_string(),
        MenuItem::Entry(entry) => format!("  {:<28} {:<28} {}", entry.title, entry.key, entry.tag),
    }
}
