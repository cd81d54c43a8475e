//! Catalog of selectable entries for a loaded record.
//!
//! Card records get an identification header (the card type), the
//! identification entries of the root block, a divider, and then one group
//! per generation block. Vehicle-unit records get a single group with one
//! entry per distinct transfer type.

use std::collections::HashSet;
use std::fmt;

use tacho_model::{CardData, CardGeneration, Generation, Payload, Record, VuGeneration, VuItem};

use crate::catalog::{CatalogRow, Placement, rows_placed};
use crate::presence::scan;

pub const GEN1_HEADER: &str = "Card Generation 1";
pub const GEN2_HEADER: &str = "Card Generation 2";
/// Header label when the root block has no readable card type.
pub const UNKNOWN_CARD_HEADER: &str = "Unknown card";

/// Which part of a record an entry points into.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GenerationTag {
    Card(CardGeneration),
    Vu(VuGeneration),
    /// A vehicle-unit transfer type used as its own tag.
    TypeId(String),
}

impl GenerationTag {
    pub fn parse(tag: &str) -> GenerationTag {
        if let Ok(generation) = tag.parse::<CardGeneration>() {
            return GenerationTag::Card(generation);
        }
        if let Ok(generation) = tag.parse::<VuGeneration>() {
            return GenerationTag::Vu(generation);
        }
        GenerationTag::TypeId(tag.to_string())
    }
}

impl From<&str> for GenerationTag {
    fn from(tag: &str) -> Self {
        GenerationTag::parse(tag)
    }
}

impl From<CardGeneration> for GenerationTag {
    fn from(generation: CardGeneration) -> Self {
        GenerationTag::Card(generation)
    }
}

impl From<VuGeneration> for GenerationTag {
    fn from(generation: VuGeneration) -> Self {
        GenerationTag::Vu(generation)
    }
}

impl fmt::Display for GenerationTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationTag::Card(g) => f.write_str(g.as_str()),
            GenerationTag::Vu(g) => f.write_str(g.as_str()),
            GenerationTag::TypeId(id) => f.write_str(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub title: String,
    pub key: String,
    pub tag: GenerationTag,
}

impl MenuEntry {
    pub fn new(title: impl Into<String>, key: impl Into<String>, tag: impl Into<GenerationTag>) -> Self {
        Self {
            title: title.into(),
            key: key.into(),
            tag: tag.into(),
        }
    }

    fn from_row(row: &CatalogRow, tag: CardGeneration) -> Self {
        MenuEntry::new(row.label, row.key(), tag)
    }
}

/// One render instruction for the menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    Header(String),
    Divider,
    Entry(MenuEntry),
}

impl MenuItem {
    pub fn header(label: impl Into<String>) -> Self {
        MenuItem::Header(label.into())
    }

    pub fn as_entry(&self) -> Option<&MenuEntry> {
        match self {
            MenuItem::Entry(entry) => Some(entry),
            _ => None,
        }
    }
}

/// Build the menu for `record`. Malformed records produce an empty menu.
pub fn build(record: &Record) -> Vec<MenuItem> {
    let Some(header) = record.header() else {
        return Vec::new();
    };

    let items = match record.payload() {
        Payload::Card(card) => build_card(card),
        Payload::VehicleUnit(items) => build_vu(header.generation, items),
        Payload::Missing => Vec::new(),
    };

    log::debug!(
        "menu for {} {}: {} items",
        header.generation,
        header.data_type,
        items.len()
    );
    items
}

fn build_card(card: &CardData) -> Vec<MenuItem> {
    let Some((root_generation, root)) = card.root() else {
        return Vec::new();
    };

    let mut items = Vec::new();
    let label = root.type_of_tachograph_card_id().unwrap_or(UNKNOWN_CARD_HEADER);
    items.push(MenuItem::header(label));

    // tagged by where the root sits; its own cardGeneration may disagree
    let id_rows = rows_placed(root_generation, Placement::Identification);
    for row in scan(root, &id_rows) {
        items.push(MenuItem::Entry(MenuEntry::from_row(row, root_generation)));
    }
    items.push(MenuItem::Divider);

    for (generation, block) in card.generations() {
        if !card.legacy_flat {
            items.push(MenuItem::header(match generation {
                CardGeneration::Gen1 => GEN1_HEADER,
                CardGeneration::Gen2 => GEN2_HEADER,
            }));
        }
        let section_rows = rows_placed(generation, Placement::Section);
        for row in scan(block, &section_rows) {
            items.push(MenuItem::Entry(MenuEntry::from_row(row, generation)));
        }
    }

    items
}

fn build_vu(generation: Generation, items: &[VuItem]) -> Vec<MenuItem> {
    let tag = VuGeneration::from(generation);
    let mut menu = vec![MenuItem::header(tag.as_str())];
    for type_id in distinct_type_ids(items) {
        menu.push(MenuItem::Entry(MenuEntry::new(type_id, type_id, tag)));
    }
    menu
}

/// Distinct transfer types in first-occurrence order.
pub fn distinct_type_ids(items: &[VuItem]) -> Vec<&str> {
    let mut seen = HashSet::new();
    items
        .iter()
        .map(|item| item.type_id.as_str())
        .filter(|id| seen.insert(*id))
        .collect()
}
