//! Change requests awaiting review by a Prophy manager.
//!
//! Client managers do not edit clients, units or equipment directly: every
//! change is filed as an operation which stays under review until accepted
//! or rejected.

use serde::{Deserialize, Serialize};

use crate::domain::types::{ClientId, EquipmentId, UnitId};

code_enum! {
    OperationStatus {
        Review => ("REV", "Em análise"),
        Accepted => ("A", "Aceito"),
        Rejected => ("R", "Rejeitado"),
    }
}

code_enum! {
    OperationType {
        Add => ("A", "Adicionar"),
        Edit => ("E", "Editar"),
        Delete => ("C", "Remover"),
    }
}

/// Operation record as returned by any of the `*/operations/` endpoints.
///
/// Only one of `client`, `unit` or `equipment` is meaningful depending on the
/// endpoint; `original_*` points at the edited entity for edit and delete
/// operations.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Operation {
    pub id: i32,
    pub operation_type: OperationType,
    pub operation_status: OperationStatus,
    #[serde(default)]
    pub client: Option<ClientId>,
    #[serde(default)]
    pub unit: Option<UnitId>,
    #[serde(default)]
    pub original_client: Option<ClientId>,
    #[serde(default)]
    pub original_unit: Option<UnitId>,
    #[serde(default)]
    pub original_equipment: Option<EquipmentId>,
}
