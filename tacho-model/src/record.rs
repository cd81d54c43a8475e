//! Typed view over a parsed tachograph record.
//!
//! The parser output is loosely shaped: card data comes either as a legacy
//! flat block or wrapped in `gen1`/`gen2`, and vehicle-unit data is a flat
//! list of transfer items. `Record::from_node` resolves that once, so the
//! rest of the workspace works with an explicit optional field per section.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::data_files::DataFiles;
use crate::node::DataNode;
use crate::part::DataPart;

#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownTag {
    pub kind: &'static str,
    pub value: String,
}

/// Tachograph data generation as reported in the record header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Generation {
    FirstGeneration,
    SecondGeneration,
}

impl Generation {
    pub fn as_str(self) -> &'static str {
        match self {
            Generation::FirstGeneration => "FirstGeneration",
            Generation::SecondGeneration => "SecondGeneration",
        }
    }
}

impl FromStr for Generation {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FirstGeneration" => Ok(Generation::FirstGeneration),
            "SecondGeneration" => Ok(Generation::SecondGeneration),
            other => Err(UnknownTag {
                kind: "generation",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of the record: a tachograph card or a vehicle unit download.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    Card,
    /// Anything else; the parser reports vehicle-unit data as `VU`.
    Other(String),
}

impl DataType {
    pub fn is_card(&self) -> bool {
        matches!(self, DataType::Card)
    }
}

impl From<&str> for DataType {
    fn from(value: &str) -> Self {
        match value {
            "Card" => DataType::Card,
            other => DataType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Card => f.write_str("Card"),
            DataType::Other(other) => f.write_str(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub generation: Generation,
    pub data_type: DataType,
}

impl Header {
    /// Read `{generation, dataType}`. Returns `None` when either is missing
    /// or the generation is not recognised.
    pub fn from_node(node: &DataNode) -> Option<Header> {
        let generation = node.get("generation")?.as_str()?;
        let data_type = node.get("dataType")?.as_str()?;
        match generation.parse::<Generation>() {
            Ok(generation) => Some(Header {
                generation,
                data_type: DataType::from(data_type),
            }),
            Err(e) => {
                log::warn!("record header: {e}");
                None
            }
        }
    }
}

/// Card application generation, used to tag card catalog entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardGeneration {
    Gen1,
    Gen2,
}

impl CardGeneration {
    pub fn as_str(self) -> &'static str {
        match self {
            CardGeneration::Gen1 => "Gen1",
            CardGeneration::Gen2 => "Gen2",
        }
    }
}

impl FromStr for CardGeneration {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Gen1" => Ok(CardGeneration::Gen1),
            "Gen2" => Ok(CardGeneration::Gen2),
            other => Err(UnknownTag {
                kind: "card generation",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for CardGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vehicle unit generation, used to tag vehicle-unit catalog entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VuGeneration {
    VuGen1,
    VuGen2,
}

impl VuGeneration {
    pub fn as_str(self) -> &'static str {
        match self {
            VuGeneration::VuGen1 => "VUGen1",
            VuGeneration::VuGen2 => "VUGen2",
        }
    }
}

impl From<Generation> for VuGeneration {
    fn from(value: Generation) -> Self {
        match value {
            Generation::FirstGeneration => VuGeneration::VuGen1,
            Generation::SecondGeneration => VuGeneration::VuGen2,
        }
    }
}

impl FromStr for VuGeneration {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VUGen1" => Ok(VuGeneration::VuGen1),
            "VUGen2" => Ok(VuGeneration::VuGen2),
            other => Err(UnknownTag {
                kind: "vehicle unit generation",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for VuGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One generation's worth of card data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardGenBlock {
    pub card_generation: Option<String>,
    pub identification: Option<DataNode>,
    pub card_chip_identification: Option<DataNode>,
    pub card_icc_identification: Option<DataNode>,
    pub application_identification: Option<DataNode>,
    pub driving_licence_information: Option<DataNode>,
    pub vehicles_used: Option<DataNode>,
    pub events_data: Option<DataNode>,
    pub faults_data: Option<DataNode>,
    pub places: Option<DataNode>,
    pub current_usage: Option<DataNode>,
    pub driver_activity_data: Option<DataNode>,
    pub specific_conditions: Option<DataNode>,
    pub control_activity_data: Option<DataNode>,
    pub card_certificate: Option<DataNode>,
    pub ca_certificate: Option<DataNode>,
    pub application_identification_v2: Option<DataNode>,
    pub card_sign_certificate: Option<DataNode>,
    pub link_certificate: Option<DataNode>,
    pub card_download: Option<DataNode>,
    pub vehicle_units_used: Option<DataNode>,
    pub gnss_places: Option<DataNode>,
    /// Shared so verification tasks can hold a snapshot without copying.
    pub data_files: Option<Arc<DataFiles>>,
    /// Members outside the section catalog (card notes and the like).
    pub extra: Vec<(String, DataNode)>,
}

impl CardGenBlock {
    pub fn from_node(node: &DataNode) -> CardGenBlock {
        let mut block = CardGenBlock::default();
        for (key, value) in node.entries() {
            if value.is_null() {
                continue;
            }
            if let Some(part) = DataPart::from_key(&key) {
                *block.section_mut(part) = Some(value.clone());
                continue;
            }
            if key == "cardGeneration" {
                block.card_generation = value.as_str().map(str::to_string);
            } else if key == "dataFiles" {
                match DataFiles::from_node(value) {
                    Some(files) => block.data_files = Some(Arc::new(files)),
                    None => log::warn!("ignoring dataFiles: not a mapping"),
                }
            } else {
                block.extra.push((key, value.clone()));
            }
        }
        block
    }

    pub fn section(&self, part: DataPart) -> Option<&DataNode> {
        match part {
            DataPart::Identification => self.identification.as_ref(),
            DataPart::CardChipIdentification => self.card_chip_identification.as_ref(),
            DataPart::CardIccIdentification => self.card_icc_identification.as_ref(),
            DataPart::ApplicationIdentification => self.application_identification.as_ref(),
            DataPart::DrivingLicenceInformation => self.driving_licence_information.as_ref(),
            DataPart::VehiclesUsed => self.vehicles_used.as_ref(),
            DataPart::EventsData => self.events_data.as_ref(),
            DataPart::FaultsData => self.faults_data.as_ref(),
            DataPart::Places => self.places.as_ref(),
            DataPart::CurrentUsage => self.current_usage.as_ref(),
            DataPart::DriverActivityData => self.driver_activity_data.as_ref(),
            DataPart::SpecificConditions => self.specific_conditions.as_ref(),
            DataPart::ControlActivityData => self.control_activity_data.as_ref(),
            DataPart::CardCertificate => self.card_certificate.as_ref(),
            DataPart::CaCertificate => self.ca_certificate.as_ref(),
            DataPart::ApplicationIdentificationV2 => self.application_identification_v2.as_ref(),
            DataPart::CardSignCertificate => self.card_sign_certificate.as_ref(),
            DataPart::LinkCertificate => self.link_certificate.as_ref(),
            DataPart::CardDownload => self.card_download.as_ref(),
            DataPart::VehicleUnitsUsed => self.vehicle_units_used.as_ref(),
            DataPart::GnssPlaces => self.gnss_places.as_ref(),
        }
    }

    pub fn section_mut(&mut self, part: DataPart) -> &mut Option<DataNode> {
        match part {
            DataPart::Identification => &mut self.identification,
            DataPart::CardChipIdentification => &mut self.card_chip_identification,
            DataPart::CardIccIdentification => &mut self.card_icc_identification,
            DataPart::ApplicationIdentification => &mut self.application_identification,
            DataPart::DrivingLicenceInformation => &mut self.driving_licence_information,
            DataPart::VehiclesUsed => &mut self.vehicles_used,
            DataPart::EventsData => &mut self.events_data,
            DataPart::FaultsData => &mut self.faults_data,
            DataPart::Places => &mut self.places,
            DataPart::CurrentUsage => &mut self.current_usage,
            DataPart::DriverActivityData => &mut self.driver_activity_data,
            DataPart::SpecificConditions => &mut self.specific_conditions,
            DataPart::ControlActivityData => &mut self.control_activity_data,
            DataPart::CardCertificate => &mut self.card_certificate,
            DataPart::CaCertificate => &mut self.ca_certificate,
            DataPart::ApplicationIdentificationV2 => &mut self.application_identification_v2,
            DataPart::CardSignCertificate => &mut self.card_sign_certificate,
            DataPart::LinkCertificate => &mut self.link_certificate,
            DataPart::CardDownload => &mut self.card_download,
            DataPart::VehicleUnitsUsed => &mut self.vehicle_units_used,
            DataPart::GnssPlaces => &mut self.gnss_places,
        }
    }

    /// `applicationIdentification.typeOfTachographCardId`, e.g. `DriverCard`.
    pub fn type_of_tachograph_card_id(&self) -> Option<&str> {
        self.application_identification
            .as_ref()?
            .get("typeOfTachographCardId")?
            .as_str()
    }
}

/// Card payload resolved into the canonical `{gen1, gen2}` pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardData {
    pub gen1: Option<CardGenBlock>,
    pub gen2: Option<CardGenBlock>,
    /// `gen1` holds a legacy flat block without a generation wrapper.
    pub legacy_flat: bool,
}

impl CardData {
    pub fn from_node(node: &DataNode) -> CardData {
        let gen1 = node.get("gen1");
        let gen2 = node.get("gen2");
        if gen1.is_none() && gen2.is_none() {
            return CardData {
                gen1: Some(CardGenBlock::from_node(node)),
                gen2: None,
                legacy_flat: true,
            };
        }
        CardData {
            gen1: gen1.map(CardGenBlock::from_node),
            gen2: gen2.map(CardGenBlock::from_node),
            legacy_flat: false,
        }
    }

    pub fn block(&self, generation: CardGeneration) -> Option<&CardGenBlock> {
        match generation {
            CardGeneration::Gen1 => self.gen1.as_ref(),
            CardGeneration::Gen2 => self.gen2.as_ref(),
        }
    }

    /// Block used for the identification header: `gen1`, else `gen2`.
    pub fn root(&self) -> Option<(CardGeneration, &CardGenBlock)> {
        self.gen1
            .as_ref()
            .map(|b| (CardGeneration::Gen1, b))
            .or_else(|| self.gen2.as_ref().map(|b| (CardGeneration::Gen2, b)))
    }

    /// Generations with a block, in order.
    pub fn generations(&self) -> impl Iterator<Item = (CardGeneration, &CardGenBlock)> {
        [
            (CardGeneration::Gen1, self.gen1.as_ref()),
            (CardGeneration::Gen2, self.gen2.as_ref()),
        ]
        .into_iter()
        .filter_map(|(generation, block)| block.map(|b| (generation, b)))
    }
}

/// One vehicle-unit transfer response item.
#[derive(Debug, Clone, PartialEq)]
pub struct VuItem {
    pub type_id: String,
    /// The whole item as emitted by the parser, `typeId` included.
    pub node: DataNode,
}

impl VuItem {
    pub fn from_node(node: &DataNode) -> Option<VuItem> {
        let type_id = node.get("typeId")?.as_str()?.to_string();
        Some(VuItem {
            type_id,
            node: node.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Card(CardData),
    VehicleUnit(Vec<VuItem>),
    /// Header missing or the payload member it calls for is absent.
    Missing,
}

/// A parsed record: the raw tree plus its resolved typed view.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    raw: DataNode,
    header: Option<Header>,
    payload: Payload,
}

impl Record {
    /// Resolve the typed view. Never fails: a malformed record simply has
    /// no header or a `Missing` payload.
    pub fn from_node(raw: DataNode) -> Record {
        let header = raw.get("header").and_then(Header::from_node);
        let payload = match &header {
            None => Payload::Missing,
            Some(h) if h.data_type.is_card() => raw
                .get("cardDataResponses")
                .filter(|n| n.is_mapping())
                .map_or(Payload::Missing, |n| Payload::Card(CardData::from_node(n))),
            Some(_) => match raw.get("transferResParams").and_then(DataNode::as_array) {
                Some(items) => Payload::VehicleUnit(collect_vu_items(items)),
                None => Payload::Missing,
            },
        };

        if header.is_none() {
            log::warn!("record has no usable header");
        } else if payload == Payload::Missing {
            log::warn!("record header present but payload is missing");
        }

        Record { raw, header, payload }
    }

    pub fn raw(&self) -> &DataNode {
        &self.raw
    }

    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn card_data(&self) -> Option<&CardData> {
        match &self.payload {
            Payload::Card(card) => Some(card),
            _ => None,
        }
    }

    pub fn vu_items(&self) -> &[VuItem] {
        match &self.payload {
            Payload::VehicleUnit(items) => items,
            _ => &[],
        }
    }
}

impl From<DataNode> for Record {
    fn from(raw: DataNode) -> Self {
        Record::from_node(raw)
    }
}

fn collect_vu_items(items: &[DataNode]) -> Vec<VuItem> {
    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match VuItem::from_node(item) {
            Some(vu_item) => out.push(vu_item),
            None => log::warn!("transferResParams[{index}] has no typeId, skipping"),
        }
    }
    out
}
