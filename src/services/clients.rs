use std::collections::HashSet;

use crate::backend::pagination::{ListQuery, fetch_list};
use crate::backend::{BackendApi, detail_path};
use crate::domain::client::{Client, NewClient, UpdateClient};
use crate::domain::equipment::Equipment;
use crate::domain::types::{ClientId, UnitId};
use crate::domain::unit::Unit;
use crate::dto::clients::{ClientPageData, MutationOutcome, UnitWithEquipment};
use crate::dto::search::{modal_base_url, modal_close_url};
use crate::filters::codec::QueryParams;
use crate::forms::clients::{AddClientForm, SaveClientForm};
use crate::modal::ModalState;
use crate::models::auth::AuthenticatedUser;
use crate::permissions::{Action, Resource};
use crate::services::operations::{
    Change, ChangeOutcome, fetch_pending, requires_review, submit_change,
};
use crate::services::{ServiceError, ServiceResult, created_id, ensure_permission, to_body};

pub const CLIENTS_PATH: &str = "/clients/";

pub fn client_url(client_id: impl std::fmt::Display) -> String {
    format!("/clients/{client_id}")
}

/// Closes modals pointing at records that are not on the page.
fn resolve_modal(
    modal: ModalState,
    client_id: ClientId,
    units: &[UnitWithEquipment],
) -> (ModalState, Option<Unit>, Option<Equipment>) {
    let find_unit = |unit_id: UnitId| {
        units
            .iter()
            .find(|entry| entry.unit.id == unit_id)
            .map(|entry| entry.unit.clone())
    };
    match modal {
        ModalState::EditClient { client_id: id }
        | ModalState::ConfirmDeleteClient { client_id: id }
        | ModalState::CreateUnit { client_id: id }
            if id != client_id =>
        {
            (ModalState::None, None, None)
        }
        ModalState::EditUnit { unit_id }
        | ModalState::ConfirmDeleteUnit { unit_id }
        | ModalState::CreateEquipment { unit_id } => match find_unit(unit_id) {
            Some(unit) => (modal, Some(unit), None),
            None => (ModalState::None, None, None),
        },
        ModalState::EditEquipment { equipment_id }
        | ModalState::ConfirmDeleteEquipment { equipment_id } => {
            let equipment = units
                .iter()
                .flat_map(|entry| entry.equipments.iter())
                .find(|equipment| equipment.id == equipment_id)
                .cloned();
            match equipment {
                Some(equipment) => (modal, None, Some(equipment)),
                None => (ModalState::None, None, None),
            }
        }
        ModalState::CreateClient
        | ModalState::CreateProposal
        | ModalState::CreateAppointment
        | ModalState::EditUser { .. } => (ModalState::None, None, None),
        _ => (modal, None, None),
    }
}

/// Loads a client with its units, equipment and pending change requests.
pub async fn load_client_page<B>(
    api: &B,
    user: &AuthenticatedUser,
    client_id: i32,
    url: &QueryParams,
) -> ServiceResult<ClientPageData>
where
    B: BackendApi + ?Sized,
{
    ensure_permission(user, Resource::Client, Action::View)?;
    let client_id = ClientId::new(client_id).map_err(|_| ServiceError::NotFound)?;

    let value = api.get_json(&detail_path(CLIENTS_PATH, client_id), &[]).await?;
    let client: Client =
        serde_json::from_value(value).map_err(|err| ServiceError::Backend(err.to_string()))?;

    let units: Vec<Unit> = fetch_list(
        api,
        &ListQuery::new("/units/").filter("client", client_id.to_string()),
    )
    .await?;
    let equipments: Vec<Equipment> = if user.can(Resource::Equipment, Action::View) {
        let query = ListQuery::new("/equipments/").filter("client", client_id.to_string());
        fetch_list(api, &query).await?
    } else {
        Vec::new()
    };

    let unit_ids: HashSet<UnitId> = units.iter().map(|unit| unit.id).collect();
    let pending_operations = match fetch_pending(api).await {
        Ok(pending) => pending.count_for(client_id, &unit_ids),
        Err(err) => {
            log::warn!("Failed to count pending operations of client {client_id}: {err}");
            0
        }
    };

    let units: Vec<UnitWithEquipment> = units
        .into_iter()
        .map(|unit| UnitWithEquipment {
            equipments: equipments
                .iter()
                .filter(|equipment| equipment.unit == unit.id)
                .cloned()
                .collect(),
            unit,
        })
        .collect();

    let path = client_url(client_id);
    let modal = ModalState::from_params(url).visible_for(user.role);
    let (modal, modal_unit, modal_equipment) = resolve_modal(modal, client_id, &units);

    Ok(ClientPageData {
        cnpj: client.cnpj.formatted(),
        client,
        units,
        pending_operations,
        changes_reviewed: requires_review(user),
        modal,
        modal_unit,
        modal_equipment,
        modal_base_url: modal_base_url(url, &path),
        modal_close_url: modal_close_url(url, &path),
    })
}

/// Validates the add-client form and creates the client.
pub async fn add_client<B>(
    api: &B,
    user: &AuthenticatedUser,
    form: AddClientForm,
) -> ServiceResult<MutationOutcome>
where
    B: BackendApi + ?Sized,
{
    ensure_permission(user, Resource::Client, Action::Create)?;

    let new_client = NewClient::try_from(form).map_err(|err| {
        log::error!("Failed to validate client form: {err}");
        ServiceError::from(err)
    })?;

    let outcome = submit_change(
        api,
        user,
        CLIENTS_PATH,
        "original_client",
        Change::Add(to_body(&new_client)?),
    )
    .await
    .map_err(|err| {
        log::error!("Failed to add a client: {err}");
        ServiceError::from(err)
    })?;

    Ok(match outcome {
        ChangeOutcome::Applied(response) => MutationOutcome {
            redirect_to: created_id(&response)
                .map(client_url)
                .unwrap_or_else(|| "/search".to_string()),
            applied: true,
        },
        ChangeOutcome::Filed => MutationOutcome {
            redirect_to: "/search".to_string(),
            applied: false,
        },
    })
}

pub async fn save_client<B>(
    api: &B,
    user: &AuthenticatedUser,
    client_id: i32,
    form: SaveClientForm,
) -> ServiceResult<MutationOutcome>
where
    B: BackendApi + ?Sized,
{
    ensure_permission(user, Resource::Client, Action::Update)?;
    let client_id = ClientId::new(client_id)?;

    let update = UpdateClient::try_from(form).map_err(|err| {
        log::error!("Failed to validate client form: {err}");
        ServiceError::from(err)
    })?;

    let outcome = submit_change(
        api,
        user,
        CLIENTS_PATH,
        "original_client",
        Change::Edit(client_id.get(), to_body(&update)?),
    )
    .await
    .map_err(|err| {
        log::error!("Failed to update client {client_id}: {err}");
        ServiceError::from(err)
    })?;

    Ok(MutationOutcome {
        redirect_to: client_url(client_id),
        applied: matches!(outcome, ChangeOutcome::Applied(_)),
    })
}

pub async fn delete_client<B>(
    api: &B,
    user: &AuthenticatedUser,
    client_id: i32,
) -> ServiceResult<MutationOutcome>
where
    B: BackendApi + ?Sized,
{
    ensure_permission(user, Resource::Client, Action::Delete)?;
    let client_id = ClientId::new(client_id)?;

    let outcome = submit_change(
        api,
        user,
        CLIENTS_PATH,
        "original_client",
        Change::Delete(client_id.get()),
    )
    .await
    .map_err(|err| {
        log::error!("Failed to delete client {client_id}: {err}");
        ServiceError::from(err)
    })?;

    Ok(MutationOutcome {
        redirect_to: "/search".to_string(),
        applied: matches!(outcome, ChangeOutcome::Applied(_)),
    })
}
