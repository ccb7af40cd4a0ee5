use serde::{Deserialize, Serialize};

use crate::domain::types::{EquipmentId, UnitId};

code_enum! {
    /// Imaging modality of a piece of equipment.
    Modality {
        Radiography => ("RX", "Raio-X"),
        Mammography => ("MG", "Mamografia"),
        ComputedTomography => ("CT", "Tomografia"),
        Fluoroscopy => ("RF", "Fluoroscopia"),
        Intraoral => ("IO", "Intraoral"),
        Panoramic => ("PX", "Panorâmico"),
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Equipment {
    pub id: EquipmentId,
    pub unit: UnitId,
    pub modality: Option<Modality>,
    pub manufacturer: String,
    pub model: String,
    pub series_number: Option<String>,
    pub anvisa_registry: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct NewEquipment {
    pub unit: UnitId,
    pub modality: Modality,
    pub manufacturer: String,
    pub model: String,
    pub series_number: String,
    pub anvisa_registry: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct UpdateEquipment {
    pub modality: Modality,
    pub manufacturer: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anvisa_registry: Option<String>,
}
