//! DTOs shaped for the client detail template.

use serde::Serialize;

use crate::domain::client::Client;
use crate::domain::equipment::Equipment;
use crate::domain::unit::Unit;
use crate::modal::ModalState;

/// A unit with the equipment installed in it.
#[derive(Debug, Serialize)]
pub struct UnitWithEquipment {
    pub unit: Unit,
    pub equipments: Vec<Equipment>,
}

/// Aggregated data required to render the client details page.
#[derive(Debug, Serialize)]
pub struct ClientPageData {
    pub client: Client,
    pub cnpj: String,
    pub units: Vec<UnitWithEquipment>,
    pub pending_operations: usize,
    /// Whether changes by the current user are filed for review.
    pub changes_reviewed: bool,
    pub modal: ModalState,
    pub modal_unit: Option<Unit>,
    pub modal_equipment: Option<Equipment>,
    pub modal_base_url: String,
    pub modal_close_url: String,
}

/// Where to send the browser after a client, unit or equipment mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome {
    pub redirect_to: String,
    /// `false` when the change was filed for review instead of applied.
    pub applied: bool,
}
