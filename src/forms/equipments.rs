use serde::Deserialize;
use validator::Validate;

use crate::domain::equipment::{Modality, NewEquipment, UpdateEquipment};
use crate::domain::types::UnitId;
use crate::forms::{FormError, optional};

fn parse_modality(code: &str) -> Result<Modality, FormError> {
    Modality::from_code(code.trim()).ok_or_else(|| FormError::InvalidOption(code.to_string()))
}

#[derive(Deserialize, Validate)]
/// Form data for adding equipment to a unit.
pub struct AddEquipmentForm {
    /// Client whose page the form was posted from.
    pub client_id: i32,
    pub unit_id: i32,
    pub modality: String,
    #[validate(length(min = 1, max = 30))]
    pub manufacturer: String,
    #[validate(length(min = 1, max = 30))]
    pub model: String,
    #[serde(default)]
    pub series_number: String,
    #[serde(default)]
    pub anvisa_registry: String,
}

impl TryFrom<AddEquipmentForm> for NewEquipment {
    type Error = FormError;

    fn try_from(form: AddEquipmentForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(NewEquipment {
            unit: UnitId::new(form.unit_id).map_err(|_| FormError::InvalidId)?,
            modality: parse_modality(&form.modality)?,
            manufacturer: form.manufacturer.trim().to_string(),
            model: form.model.trim().to_string(),
            series_number: form.series_number.trim().to_string(),
            anvisa_registry: form.anvisa_registry.trim().to_string(),
        })
    }
}

#[derive(Deserialize, Validate)]
/// Form data for editing equipment.
pub struct SaveEquipmentForm {
    pub client_id: i32,
    pub modality: String,
    #[validate(length(min = 1, max = 30))]
    pub manufacturer: String,
    #[validate(length(min = 1, max = 30))]
    pub model: String,
    #[serde(default)]
    pub series_number: String,
    #[serde(default)]
    pub anvisa_registry: String,
}

impl TryFrom<SaveEquipmentForm> for UpdateEquipment {
    type Error = FormError;

    fn try_from(form: SaveEquipmentForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(UpdateEquipment {
            modality: parse_modality(&form.modality)?,
            manufacturer: form.manufacturer.trim().to_string(),
            model: form.model.trim().to_string(),
            series_number: optional(&form.series_number),
            anvisa_registry: optional(&form.anvisa_registry),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_modality_is_rejected() {
        let form = AddEquipmentForm {
            client_id: 1,
            unit_id: 3,
            modality: "MRI".to_string(),
            manufacturer: "GE".to_string(),
            model: "Senographe".to_string(),
            series_number: String::new(),
            anvisa_registry: String::new(),
        };
        assert!(matches!(
            NewEquipment::try_from(form),
            Err(FormError::InvalidOption(code)) if code == "MRI"
        ));
    }

    #[test]
    fn save_form_maps_codes() {
        let form = SaveEquipmentForm {
            client_id: 1,
            modality: "MG".to_string(),
            manufacturer: "GE".to_string(),
            model: "Senographe".to_string(),
            series_number: "SN-1".to_string(),
            anvisa_registry: " ".to_string(),
        };
        let update = UpdateEquipment::try_from(form).unwrap();
        assert_eq!(update.modality, Modality::Mammography);
        assert_eq!(update.anvisa_registry, None);
    }
}
