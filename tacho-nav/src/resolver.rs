//! Map a menu selection back to the data it stands for.

use tacho_model::{CardGenBlock, CardGeneration, DataNode, DataPart, Payload, Record};

use crate::catalog::row_for;
use crate::menu::GenerationTag;
use crate::session::Session;

/// Resolve `(key, tag)` against the session's record.
pub fn resolve(session: &Session, key: &str, tag: &GenerationTag) -> Option<DataNode> {
    session.record().and_then(|record| resolve_in(record, key, tag))
}

/// Resolve `(key, tag)` against a record.
///
/// Card tags read the catalog section `key` from that generation's block; a
/// legacy flat block answers for `Gen1`. Keys outside the catalog, or not
/// available in that generation, are not found. Any other tag selects the
/// transfer items whose `typeId` equals `key`, which may be an empty list.
pub fn resolve_in(record: &Record, key: &str, tag: &GenerationTag) -> Option<DataNode> {
    match (tag, record.payload()) {
        (GenerationTag::Card(generation), Payload::Card(card)) => {
            section(card.block(*generation)?, *generation, key)
        }
        (GenerationTag::Card(_), _) => None,
        (_, Payload::VehicleUnit(items)) => Some(DataNode::Array(
            items
                .iter()
                .filter(|item| item.type_id == key)
                .map(|item| item.node.clone())
                .collect(),
        )),
        _ => None,
    }
}

fn section(block: &CardGenBlock, generation: CardGeneration, key: &str) -> Option<DataNode> {
    let part = DataPart::from_key(key)?;
    if !row_for(part).is_available_in(generation) {
        return None;
    }
    block.section(part).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        Record::from_node(DataNode::from(value))
    }

    fn card() -> Record {
        record(json!({
            "header": {"generation": "SecondGeneration", "dataType": "Card"},
            "cardDataResponses": {
                "gen1": {"eventsData": {"from": "gen1"}},
                "gen2": {"eventsData": {"from": "gen2"}, "gnssPlaces": [1]}
            }
        }))
    }

    #[test]
    fn test_card_tags_pick_their_block() {
        let r = card();
        let gen1 = GenerationTag::Card(CardGeneration::Gen1);
        let gen2 = GenerationTag::Card(CardGeneration::Gen2);
        assert_eq!(resolve_in(&r, "eventsData", &gen1), Some(DataNode::from(json!({"from": "gen1"}))));
        assert_eq!(resolve_in(&r, "eventsData", &gen2), Some(DataNode::from(json!({"from": "gen2"}))));
        assert_eq!(resolve_in(&r, "gnssPlaces", &gen1), None);
    }

    #[test]
    fn test_legacy_flat_answers_gen1() {
        let r = record(json!({
            "header": {"generation": "FirstGeneration", "dataType": "Card"},
            "cardDataResponses": {"places": [1, 2]}
        }));
        let gen1 = GenerationTag::Card(CardGeneration::Gen1);
        let gen2 = GenerationTag::Card(CardGeneration::Gen2);
        assert_eq!(resolve_in(&r, "places", &gen1), Some(DataNode::from(json!([1, 2]))));
        assert_eq!(resolve_in(&r, "places", &gen2), None);
    }

    #[test]
    fn test_vu_filter_keeps_order_and_allows_empty() {
        let r = record(json!({
            "header": {"generation": "FirstGeneration", "dataType": "VU"},
            "transferResParams": [
                {"typeId": "EF_Events", "n": 1},
                {"typeId": "EF_Faults", "n": 2},
                {"typeId": "EF_Events", "n": 3}
            ]
        }));
        let tag = GenerationTag::parse("VUGen1");
        assert_eq!(
            resolve_in(&r, "EF_Events", &tag),
            Some(DataNode::from(json!([
                {"typeId": "EF_Events", "n": 1},
                {"typeId": "EF_Events", "n": 3}
            ])))
        );
        assert_eq!(resolve_in(&r, "EF_Speed", &tag), Some(DataNode::Array(vec![])));
        // a literal typeId works as tag too
        assert_eq!(
            resolve_in(&r, "EF_Faults", &GenerationTag::parse("EF_Faults")),
            Some(DataNode::from(json!([{"typeId": "EF_Faults", "n": 2}])))
        );
    }

    #[test]
    fn test_only_catalog_sections_resolve() {
        let r = record(json!({
            "header": {"generation": "SecondGeneration", "dataType": "Card"},
            "cardDataResponses": {
                "gen1": {
                    "cardGeneration": "Gen1",
                    "cardNotes": "n",
                    "gnssPlaces": [1],
                    "dataFiles": {"ICC": [1]}
                }
            }
        }));
        let gen1 = GenerationTag::Card(CardGeneration::Gen1);
        assert_eq!(resolve_in(&r, "cardNotes", &gen1), None);
        assert_eq!(resolve_in(&r, "cardGeneration", &gen1), None);
        assert_eq!(resolve_in(&r, "dataFiles", &gen1), None);
        // stored, but not a Gen1 section
        assert_eq!(resolve_in(&r, "gnssPlaces", &gen1), None);
    }

    #[test]
    fn test_mismatched_payloads() {
        let r = card();
        assert_eq!(resolve_in(&r, "EF_Events", &GenerationTag::parse("VUGen1")), None);

        let malformed = record(json!({"header": {"generation": "FirstGeneration", "dataType": "Card"}}));
        assert_eq!(resolve_in(&malformed, "eventsData", &GenerationTag::parse("Gen1")), None);
    }
}
