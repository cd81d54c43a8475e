use pretty_assertions::assert_eq;
use serde_json::json;
use tacho_model::*;

fn sample_tree() -> DataNode {
    DataNode::from(json!({
        "header": {"generation": "SecondGeneration", "dataType": "Card"},
        "cardDataResponses": {
            "gen2": {
                "cardGeneration": "Gen2",
                "eventsData": [
                    {"eventType": 3, "beginTime": "2024-05-01T10:00:00Z", "flags": [true, false]},
                    {"eventType": 7, "beginTime": null, "odometer": 12.5}
                ],
                "zLast": {},
                "aFirst": []
            }
        }
    }))
}

#[test]
fn test_serialized_text_decodes_to_same_tree() {
    let tree = sample_tree();
    for indent in [DISPLAY_INDENT, EXPORT_INDENT] {
        let text = to_json_string(&tree, indent).unwrap();
        assert_eq!(from_json_str(&text).unwrap(), tree);
    }
}

#[test]
fn test_serialized_text_keeps_member_order() {
    let text = to_json_string(&sample_tree(), EXPORT_INDENT).unwrap();
    let events = text.find("\"eventsData\"").unwrap();
    let z_last = text.find("\"zLast\"").unwrap();
    let a_first = text.find("\"aFirst\"").unwrap();
    assert!(events < z_last && z_last < a_first, "insertion order must be kept:\n{text}");
}

#[test]
fn test_map_like_structures_decode_as_objects() {
    let tree = DataNode::object([
        (
            "dataFiles",
            DataNode::Map(vec![
                (DataNode::from(2u64), DataNode::from(json!([1, 2]))),
                (DataNode::from("EF_Identification"), DataNode::from(json!([3]))),
            ]),
        ),
        ("n", DataNode::from(1u64)),
    ]);

    let text = to_json_string(&tree, DISPLAY_INDENT).unwrap();
    let decoded = from_json_str(&text).unwrap();

    assert_eq!(decoded, tree.normalized());
    assert_eq!(
        decoded.get("dataFiles").unwrap().entries().len(),
        2,
        "no map entry may be lost"
    );
}

#[test]
fn test_parsed_record_exports_identically() {
    let input = r#"{
    "header": {
        "generation": "FirstGeneration",
        "dataType": "VU"
    },
    "transferResParams": [
        {
            "typeId": "EF_Events",
            "position": 1
        }
    ]
}"#;
    let node = JsonRecordParser.parse(input.as_bytes()).unwrap();
    assert_eq!(to_json_string(&node, EXPORT_INDENT).unwrap(), input);
}
