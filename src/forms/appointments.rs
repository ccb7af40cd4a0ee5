use serde::Deserialize;
use validator::Validate;

use crate::domain::appointment::{AppointmentType, NewAppointment};
use crate::domain::types::UnitId;
use crate::forms::{FormError, optional, parse_date};

#[derive(Deserialize, Validate)]
/// Form data for scheduling a visit to a unit.
pub struct AddAppointmentForm {
    pub unit_id: i32,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub contact_name: String,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub contact_phone: String,
    #[serde(default)]
    pub current_query: String,
}

impl TryFrom<AddAppointmentForm> for NewAppointment {
    type Error = FormError;

    fn try_from(form: AddAppointmentForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(NewAppointment {
            date: parse_date(&form.date)?,
            kind: AppointmentType::from_code(form.kind.trim())
                .ok_or_else(|| FormError::InvalidOption(form.kind.clone()))?,
            unit: UnitId::new(form.unit_id).map_err(|_| FormError::InvalidId)?,
            contact_name: optional(&form.contact_name),
            contact_phone: optional(&form.contact_phone),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_appointment_payload() {
        let form = AddAppointmentForm {
            unit_id: 4,
            date: "2024-07-01".to_string(),
            kind: "O".to_string(),
            contact_name: String::new(),
            contact_phone: "84911112222".to_string(),
            current_query: String::new(),
        };
        let appointment = NewAppointment::try_from(form).unwrap();
        assert_eq!(appointment.kind, AppointmentType::InPerson);
        assert_eq!(appointment.contact_name, None);
    }

    #[test]
    fn malformed_date_is_rejected() {
        let form = AddAppointmentForm {
            unit_id: 4,
            date: "01/07/2024".to_string(),
            kind: "O".to_string(),
            contact_name: String::new(),
            contact_phone: String::new(),
            current_query: String::new(),
        };
        assert!(matches!(
            NewAppointment::try_from(form),
            Err(FormError::InvalidDate)
        ));
    }
}
