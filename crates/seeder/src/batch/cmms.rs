//! CMMS seed statements, embedded in packaged order

macro_rules! statement {
    ($file:literal) => {
        ($file, include_str!(concat!("../../sql/", $file)))
    };
}

pub(super) const STATEMENTS: &[(&str, &str)] = &[
    // Schema
    statement!("createCMMSTableEquipmentTypes.sql"),
    statement!("createCMMSTableLocationTypes.sql"),
    statement!("createCMMSTableMaintTypes.sql"),
    statement!("createCMMSTableStatusTypes.sql"),
    statement!("createCMMSTableBusinessUnits.sql"),
    statement!("createCMMSTableLocations.sql"),
    statement!("createCMMSTableEquipment.sql"),
    statement!("createCMMSTableMaintenance.sql"),
    statement!("createCMMSKeyEquipment-Type.sql"),
    statement!("createCMMSKeyEquipment-Location.sql"),
    // Existing data, children first
    statement!("deleteCMMSDataMaintenance.sql"),
    statement!("deleteCMMSDataEquipment.sql"),
    statement!("deleteCMMSDataLocations.sql"),
    statement!("deleteCMMSDataBusinessUnits.sql"),
    statement!("deleteCMMSDataStatusTypes.sql"),
    statement!("deleteCMMSDataMaintTypes.sql"),
    statement!("deleteCMMSDataLocationTypes.sql"),
    statement!("deleteCMMSDataEquipmentTypes.sql"),
    // Seed data, parents first
    statement!("insertCMMSDataEquipmentTypes.sql"),
    statement!("insertCMMSDataLocationTypes.sql"),
    statement!("insertCMMSDataMaintTypes.sql"),
    statement!("insertCMMSDataStatusTypes.sql"),
    statement!("insertCMMSDataBusinessUnits.sql"),
    statement!("insertCMMSDataLocations.sql"),
    statement!("insertCMMSDataEquipment.sql"),
    statement!("insertCMMSDataMaintenanceDS.sql"),
    statement!("insertCMMSDataMaintenanceMS.sql"),
    statement!("insertCMMSDataMaintenanceINS.sql"),
];
