//! Static catalog of card data parts.

use tacho_model::{CardGeneration, DataPart};

/// Where a part shows up in the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Listed under the card identification header.
    Identification,
    /// Feeds the identification header label; not listed on its own.
    Header,
    /// Listed under its generation header.
    Section,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogRow {
    pub part: DataPart,
    pub label: &'static str,
    pub placement: Placement,
    pub availability: &'static [CardGeneration],
}

impl CatalogRow {
    pub fn key(&self) -> &'static str {
        self.part.key()
    }

    pub fn is_available_in(&self, generation: CardGeneration) -> bool {
        self.availability.contains(&generation)
    }
}

const BOTH: &[CardGeneration] = &[CardGeneration::Gen1, CardGeneration::Gen2];
const GEN2_ONLY: &[CardGeneration] = &[CardGeneration::Gen2];

const fn row(
    part: DataPart,
    label: &'static str,
    placement: Placement,
    availability: &'static [CardGeneration],
) -> CatalogRow {
    CatalogRow {
        part,
        label,
        placement,
        availability,
    }
}

/// Every known part in declaration order.
pub static CATALOG: [CatalogRow; 21] = [
    row(DataPart::Identification, "Identification", Placement::Identification, BOTH),
    row(DataPart::CardChipIdentification, "IC", Placement::Identification, BOTH),
    row(DataPart::CardIccIdentification, "ICC", Placement::Identification, BOTH),
    row(DataPart::ApplicationIdentification, "ApplicationIdentification", Placement::Header, BOTH),
    row(DataPart::DrivingLicenceInformation, "DrivingLicenceInformation", Placement::Section, BOTH),
    row(DataPart::VehiclesUsed, "VehiclesUsed", Placement::Section, BOTH),
    row(DataPart::EventsData, "EventsData", Placement::Section, BOTH),
    row(DataPart::FaultsData, "FaultsData", Placement::Section, BOTH),
    row(DataPart::Places, "Places", Placement::Section, BOTH),
    row(DataPart::CurrentUsage, "CurrentUsage", Placement::Section, BOTH),
    row(DataPart::DriverActivityData, "DriverActivityData", Placement::Section, BOTH),
    row(DataPart::SpecificConditions, "SpecificConditions", Placement::Section, BOTH),
    row(DataPart::ControlActivityData, "ControlActivityData", Placement::Section, BOTH),
    row(DataPart::CardCertificate, "CardCertificate", Placement::Section, BOTH),
    row(DataPart::CaCertificate, "CACertificate", Placement::Section, BOTH),
    row(DataPart::ApplicationIdentificationV2, "ApplicationIdentificationV2", Placement::Section, GEN2_ONLY),
    row(DataPart::CardSignCertificate, "CardSignCertificate", Placement::Section, GEN2_ONLY),
    row(DataPart::LinkCertificate, "LinkCertificate", Placement::Section, GEN2_ONLY),
    row(DataPart::CardDownload, "CardDownload", Placement::Section, GEN2_ONLY),
    row(DataPart::VehicleUnitsUsed, "VehicleUnitsUsed", Placement::Section, GEN2_ONLY),
    row(DataPart::GnssPlaces, "GnssPlaces", Placement::Section, GEN2_ONLY),
];

/// Rows a card of `generation` can carry, in catalog order.
pub fn rows(generation: CardGeneration) -> Vec<&'static CatalogRow> {
    CATALOG.iter().filter(|r| r.is_available_in(generation)).collect()
}

/// Rows of `generation` with the given placement, in catalog order.
pub fn rows_placed(generation: CardGeneration, placement: Placement) -> Vec<&'static CatalogRow> {
    CATALOG
        .iter()
        .filter(|r| r.is_available_in(generation) && r.placement == placement)
        .collect()
}

pub fn row_for(part: DataPart) -> &'static CatalogRow {
    // CATALOG is declared in DataPart order
    &CATALOG[part as usize]
}
