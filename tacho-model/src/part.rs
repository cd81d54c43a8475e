//! Named sections of a card generation block.

use std::fmt;

/// A named, independently selectable section of card data.
///
/// Declaration order is the catalog order: the Gen1 parts first, then the
/// parts only a second generation card carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataPart {
    Identification,
    CardChipIdentification,
    CardIccIdentification,
    ApplicationIdentification,
    DrivingLicenceInformation,
    VehiclesUsed,
    EventsData,
    FaultsData,
    Places,
    CurrentUsage,
    DriverActivityData,
    SpecificConditions,
    ControlActivityData,
    CardCertificate,
    CaCertificate,
    ApplicationIdentificationV2,
    CardSignCertificate,
    LinkCertificate,
    CardDownload,
    VehicleUnitsUsed,
    GnssPlaces,
}

impl DataPart {
    pub const ALL: [DataPart; 21] = [
        DataPart::Identification,
        DataPart::CardChipIdentification,
        DataPart::CardIccIdentification,
        DataPart::ApplicationIdentification,
        DataPart::DrivingLicenceInformation,
        DataPart::VehiclesUsed,
        DataPart::EventsData,
        DataPart::FaultsData,
        DataPart::Places,
        DataPart::CurrentUsage,
        DataPart::DriverActivityData,
        DataPart::SpecificConditions,
        DataPart::ControlActivityData,
        DataPart::CardCertificate,
        DataPart::CaCertificate,
        DataPart::ApplicationIdentificationV2,
        DataPart::CardSignCertificate,
        DataPart::LinkCertificate,
        DataPart::CardDownload,
        DataPart::VehicleUnitsUsed,
        DataPart::GnssPlaces,
    ];

    /// Member name of this part in the parser output.
    pub fn key(self) -> &'static str {
        match self {
            DataPart::Identification => "identification",
            DataPart::CardChipIdentification => "cardChipIdentification",
            DataPart::CardIccIdentification => "cardIccIdentification",
            DataPart::ApplicationIdentification => "applicationIdentification",
            DataPart::DrivingLicenceInformation => "drivingLicenceInformation",
            DataPart::VehiclesUsed => "vehiclesUsed",
            DataPart::EventsData => "eventsData",
            DataPart::FaultsData => "faultsData",
            DataPart::Places => "places",
            DataPart::CurrentUsage => "currentUsage",
            DataPart::DriverActivityData => "driverActivityData",
            DataPart::SpecificConditions => "specificConditions",
            DataPart::ControlActivityData => "controlActivityData",
            DataPart::CardCertificate => "cardCertificate",
            DataPart::CaCertificate => "caCertificate",
            DataPart::ApplicationIdentificationV2 => "applicationIdentificationV2",
            DataPart::CardSignCertificate => "cardSignCertificate",
            DataPart::LinkCertificate => "linkCertificate",
            DataPart::CardDownload => "cardDownload",
            DataPart::VehicleUnitsUsed => "vehicleUnitsUsed",
            DataPart::GnssPlaces => "gnssPlaces",
        }
    }

    pub fn from_key(key: &str) -> Option<DataPart> {
        DataPart::ALL.into_iter().find(|part| part.key() == key)
    }
}

impl fmt::Display for DataPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
