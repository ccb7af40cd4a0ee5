//! Which dialog is open on a page, and for what.
//!
//! Encoded in the URL as `modal=<kind>` plus `modal_id=<id>` for variants
//! carrying an entity.

use serde::Serialize;

use crate::domain::types::{ClientId, EquipmentId, Role, UnitId, UserId};
use crate::filters::codec::QueryParams;
use crate::permissions::{Action, Resource, can};

pub const MODAL_KEY: &str = "modal";
pub const MODAL_ID_KEY: &str = "modal_id";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModalState {
    #[default]
    None,
    CreateClient,
    EditClient { client_id: ClientId },
    ConfirmDeleteClient { client_id: ClientId },
    CreateUnit { client_id: ClientId },
    EditUnit { unit_id: UnitId },
    ConfirmDeleteUnit { unit_id: UnitId },
    CreateEquipment { unit_id: UnitId },
    EditEquipment { equipment_id: EquipmentId },
    ConfirmDeleteEquipment { equipment_id: EquipmentId },
    CreateProposal,
    CreateAppointment,
    EditUser { user_id: UserId },
}

impl ModalState {
    pub fn kind(&self) -> &'static str {
        match self {
            ModalState::None => "none",
            ModalState::CreateClient => "create_client",
            ModalState::EditClient { .. } => "edit_client",
            ModalState::ConfirmDeleteClient { .. } => "confirm_delete_client",
            ModalState::CreateUnit { .. } => "create_unit",
            ModalState::EditUnit { .. } => "edit_unit",
            ModalState::ConfirmDeleteUnit { .. } => "confirm_delete_unit",
            ModalState::CreateEquipment { .. } => "create_equipment",
            ModalState::EditEquipment { .. } => "edit_equipment",
            ModalState::ConfirmDeleteEquipment { .. } => "confirm_delete_equipment",
            ModalState::CreateProposal => "create_proposal",
            ModalState::CreateAppointment => "create_appointment",
            ModalState::EditUser { .. } => "edit_user",
        }
    }

    fn id(&self) -> Option<i32> {
        match *self {
            ModalState::EditClient { client_id }
            | ModalState::ConfirmDeleteClient { client_id }
            | ModalState::CreateUnit { client_id } => Some(client_id.get()),
            ModalState::EditUnit { unit_id }
            | ModalState::ConfirmDeleteUnit { unit_id }
            | ModalState::CreateEquipment { unit_id } => Some(unit_id.get()),
            ModalState::EditEquipment { equipment_id }
            | ModalState::ConfirmDeleteEquipment { equipment_id } => Some(equipment_id.get()),
            ModalState::EditUser { user_id } => Some(user_id.get()),
            _ => None,
        }
    }

    /// Reads the modal from the URL. Unknown kinds and missing or invalid ids
    /// yield [`ModalState::None`].
    pub fn from_params(params: &QueryParams) -> Self {
        let Some(kind) = params.get(MODAL_KEY) else {
            return ModalState::None;
        };
        let id = params
            .get(MODAL_ID_KEY)
            .and_then(|raw| raw.trim().parse::<i32>().ok());

        let modal = match (kind, id) {
            ("create_client", _) => Some(ModalState::CreateClient),
            ("create_proposal", _) => Some(ModalState::CreateProposal),
            ("create_appointment", _) => Some(ModalState::CreateAppointment),
            ("edit_client", Some(id)) => ClientId::new(id)
                .ok()
                .map(|client_id| ModalState::EditClient { client_id }),
            ("confirm_delete_client", Some(id)) => ClientId::new(id)
                .ok()
                .map(|client_id| ModalState::ConfirmDeleteClient { client_id }),
            ("create_unit", Some(id)) => ClientId::new(id)
                .ok()
                .map(|client_id| ModalState::CreateUnit { client_id }),
            ("edit_unit", Some(id)) => UnitId::new(id)
                .ok()
                .map(|unit_id| ModalState::EditUnit { unit_id }),
            ("confirm_delete_unit", Some(id)) => UnitId::new(id)
                .ok()
                .map(|unit_id| ModalState::ConfirmDeleteUnit { unit_id }),
            ("create_equipment", Some(id)) => UnitId::new(id)
                .ok()
                .map(|unit_id| ModalState::CreateEquipment { unit_id }),
            ("edit_equipment", Some(id)) => EquipmentId::new(id)
                .ok()
                .map(|equipment_id| ModalState::EditEquipment { equipment_id }),
            ("confirm_delete_equipment", Some(id)) => EquipmentId::new(id)
                .ok()
                .map(|equipment_id| ModalState::ConfirmDeleteEquipment { equipment_id }),
            ("edit_user", Some(id)) => UserId::new(id)
                .ok()
                .map(|user_id| ModalState::EditUser { user_id }),
            _ => None,
        };

        modal.unwrap_or_else(|| {
            log::debug!("Ignoring modal parameter `{kind}`");
            ModalState::None
        })
    }

    /// Writes the modal into `params`, replacing any previous one.
    pub fn write_params(&self, params: &mut QueryParams) {
        params.remove(MODAL_KEY);
        params.remove(MODAL_ID_KEY);
        if *self == ModalState::None {
            return;
        }
        params.set(MODAL_KEY, self.kind());
        if let Some(id) = self.id() {
            params.set(MODAL_ID_KEY, id.to_string());
        }
    }

    /// Permission needed to open the dialog.
    pub fn required_permission(&self) -> Option<(Resource, Action)> {
        match self {
            ModalState::None => None,
            ModalState::CreateClient => Some((Resource::Client, Action::Create)),
            ModalState::EditClient { .. } => Some((Resource::Client, Action::Update)),
            ModalState::ConfirmDeleteClient { .. } => Some((Resource::Client, Action::Delete)),
            ModalState::CreateUnit { .. } => Some((Resource::Unit, Action::Create)),
            ModalState::EditUnit { .. } => Some((Resource::Unit, Action::Update)),
            ModalState::ConfirmDeleteUnit { .. } => Some((Resource::Unit, Action::Delete)),
            ModalState::CreateEquipment { .. } => Some((Resource::Equipment, Action::Create)),
            ModalState::EditEquipment { .. } => Some((Resource::Equipment, Action::Update)),
            ModalState::ConfirmDeleteEquipment { .. } => {
                Some((Resource::Equipment, Action::Delete))
            }
            ModalState::CreateProposal => Some((Resource::Proposal, Action::Create)),
            ModalState::CreateAppointment => Some((Resource::Appointment, Action::Create)),
            ModalState::EditUser { .. } => Some((Resource::User, Action::Update)),
        }
    }

    /// The modal as seen by `role`: closed when the role may not open it.
    pub fn visible_for(self, role: Role) -> Self {
        match self.required_permission() {
            Some((resource, action)) if !can(role, resource, action) => ModalState::None,
            _ => self,
        }
    }
}
