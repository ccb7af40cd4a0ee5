use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::types::{AppointmentId, ServiceOrderId, UnitId};

code_enum! {
    AppointmentStatus {
        Pending => ("P", "Pendente"),
        Rejected => ("R", "Rejeitado"),
        Confirmed => ("C", "Confirmado"),
        Fulfilled => ("F", "Realizado"),
        Unfulfilled => ("U", "Não realizado"),
    }
}

code_enum! {
    AppointmentType {
        InPerson => ("O", "Presencial"),
        Remote => ("R", "Remoto"),
    }
}

/// A scheduled visit of a physicist to a unit.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: AppointmentId,
    pub date: NaiveDate,
    pub status: AppointmentStatus,
    #[serde(rename = "type")]
    pub kind: AppointmentType,
    pub unit: UnitId,
    pub service_order: Option<ServiceOrderId>,
    pub justification: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct NewAppointment {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: AppointmentType,
    pub unit: UnitId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appointment_reads_type_field() {
        let appointment: Appointment = serde_json::from_value(serde_json::json!({
            "id": 1,
            "date": "2024-03-05",
            "status": "C",
            "type": "R",
            "unit": 2,
            "service_order": null,
            "justification": null
        }))
        .unwrap();
        assert_eq!(appointment.kind, AppointmentType::Remote);
        assert_eq!(appointment.status, AppointmentStatus::Confirmed);
    }
}
