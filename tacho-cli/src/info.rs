use anyhow::Result;
use std::path::Path;

use tacho_model::{CardGeneration, Payload, Record};
use tacho_nav::menu::distinct_type_ids;
use tacho_nav::{ErcaKeys, rows, scan};

use crate::Options;
use crate::load::open;

pub fn run_info(input: &Path, options: &Options) -> Result<()> {
    let loaded = open(input, options)?;
    let Some(record) = loaded.engine.session().record() else {
        return Ok(());
    };

    println!("File:        {}", input.display());
    for line in describe(record) {
        println!("{line}");
    }
    println!("Menu items:  {}", loaded.menu.len());

    for generation in [CardGeneration::Gen1, CardGeneration::Gen2] {
        if let Some(key) = loaded.keys.key(generation) {
            println!(
                "ERCA {generation}:   {} bytes (expected {})",
                key.len(),
                ErcaKeys::expected_len(generation)
            );
        }
    }
    Ok(())
}

/// Summary lines for a record, without the file name.
pub fn describe(record: &Record) -> Vec<String> {
    let mut lines = Vec::new();
    let Some(header) = record.header() else {
        lines.push("Header:      missing".to_string());
        return lines;
    };
    lines.push(format!("Generation:  {}", header.generation));
    lines.push(format!("Data type:   {}", header.data_type));

    match record.payload() {
        Payload::Card(card) => {
            let card_type = card
                .root()
                .and_then(|(_, block)| block.type_of_tachograph_card_id())
                .unwrap_or("unknown");
            lines.push(format!("Card type:   {card_type}"));
            if card.legacy_flat {
                lines.push("Layout:      flat (no generation blocks)".to_string());
            }
            for (generation, block) in card.generations() {
                let present = scan(block, &rows(generation)).len();
                let files = block.data_files.as_ref().map_or(0, |f| f.len());
                lines.push(format!(
                    "{generation}:        {present} sections, {files} data files"
                ));
            }
        }
        Payload::VehicleUnit(items) => {
            lines.push(format!(
                "Transfers:   {} ({} types)",
                items.len(),
                distinct_type_ids(items).len()
            ));
        }
        Payload::Missing => lines.push("Payload:     missing".to_string()),
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tacho_model::{JsonRecordParser, RecordParser};

    fn record(json: &str) -> Record {
        Record::from_node(JsonRecordParser.parse(json.as_bytes()).unwrap())
    }

    #[test]
    fn test_describe_card() {
        let r = record(include_str!("../../test-fixtures/records/card-gen2-combined.json"));
        assert_eq!(
            describe(&r),
            vec![
                "Generation:  SecondGeneration",
                "Data type:   Card",
                "Card type:   DriverCard",
                "Gen1:        9 sections, 3 data files",
                "Gen2:        10 sections, 2 data files",
            ]
        );
    }

    #[test]
    fn test_describe_vu() {
        let r = record(include_str!("../../test-fixtures/records/vu-gen1.json"));
        assert_eq!(
            describe(&r),
            vec![
                "Generation:  FirstGeneration",
                "Data type:   VU",
                "Transfers:   3 (2 types)",
            ]
        );
    }

    #[test]
    fn test_describe_malformed() {
        let r = record(include_str!("../../test-fixtures/records/malformed.json"));
        assert_eq!(describe(&r), vec!["Header:      missing"]);
    }
}
