use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::types::{EquipmentId, ReportId, UnitId, UserId};

code_enum! {
    ReportStatus {
        Pending => ("PENDING", "Pendente"),
        Overdue => ("OVERDUE", "Vencido"),
        Done => ("DONE", "Entregue"),
    }
}

/// Compliance report delivered for a unit or a specific piece of equipment.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub id: ReportId,
    pub file: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<ReportStatus>,
    pub unit: Option<UnitId>,
    pub equipment: Option<EquipmentId>,
    #[serde(default)]
    pub responsibles: Vec<UserId>,
}
