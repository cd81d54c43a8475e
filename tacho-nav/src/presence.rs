//! Which catalog sections a card block actually carries.

use tacho_model::CardGenBlock;

use crate::catalog::CatalogRow;

/// Keep the rows whose section is present on `block`, in the given order.
pub fn scan<'r>(block: &CardGenBlock, rows: &[&'r CatalogRow]) -> Vec<&'r CatalogRow> {
    rows.iter()
        .copied()
        .filter(|row| block.section(row.part).is_some())
        .collect()
}
