use crate::backend::BackendApi;
use crate::domain::equipment::{NewEquipment, UpdateEquipment};
use crate::domain::types::{ClientId, EquipmentId};
use crate::dto::clients::MutationOutcome;
use crate::forms::equipments::{AddEquipmentForm, SaveEquipmentForm};
use crate::models::auth::AuthenticatedUser;
use crate::permissions::{Action, Resource};
use crate::services::clients::client_url;
use crate::services::operations::{Change, ChangeOutcome, submit_change};
use crate::services::{ServiceError, ServiceResult, ensure_permission, to_body};

pub const EQUIPMENTS_PATH: &str = "/equipments/";

async fn submit<B>(
    api: &B,
    user: &AuthenticatedUser,
    client_id: ClientId,
    change: Change,
) -> ServiceResult<MutationOutcome>
where
    B: BackendApi + ?Sized,
{
    let outcome = submit_change(api, user, EQUIPMENTS_PATH, "original_equipment", change)
        .await
        .map_err(|err| {
            log::error!("Failed to change equipment of client {client_id}: {err}");
            ServiceError::from(err)
        })?;
    Ok(MutationOutcome {
        redirect_to: client_url(client_id),
        applied: matches!(outcome, ChangeOutcome::Applied(_)),
    })
}

pub async fn add_equipment<B>(
    api: &B,
    user: &AuthenticatedUser,
    form: AddEquipmentForm,
) -> ServiceResult<MutationOutcome>
where
    B: BackendApi + ?Sized,
{
    ensure_permission(user, Resource::Equipment, Action::Create)?;
    let client_id = ClientId::new(form.client_id)?;

    let equipment = NewEquipment::try_from(form).map_err(|err| {
        log::error!("Failed to validate equipment form: {err}");
        ServiceError::from(err)
    })?;

    submit(api, user, client_id, Change::Add(to_body(&equipment)?)).await
}

pub async fn save_equipment<B>(
    api: &B,
    user: &AuthenticatedUser,
    equipment_id: i32,
    form: SaveEquipmentForm,
) -> ServiceResult<MutationOutcome>
where
    B: BackendApi + ?Sized,
{
    ensure_permission(user, Resource::Equipment, Action::Update)?;
    let equipment_id = EquipmentId::new(equipment_id)?;
    let client_id = ClientId::new(form.client_id)?;

    let update = UpdateEquipment::try_from(form).map_err(|err| {
        log::error!("Failed to validate equipment form: {err}");
        ServiceError::from(err)
    })?;

    submit(
        api,
        user,
        client_id,
        Change::Edit(equipment_id.get(), to_body(&update)?),
    )
    .await
}

pub async fn delete_equipment<B>(
    api: &B,
    user: &AuthenticatedUser,
    equipment_id: i32,
    client_id: i32,
) -> ServiceResult<MutationOutcome>
where
    B: BackendApi + ?Sized,
{
    ensure_permission(user, Resource::Equipment, Action::Delete)?;
    let equipment_id = EquipmentId::new(equipment_id)?;
    let client_id = ClientId::new(client_id)?;

    submit(api, user, client_id, Change::Delete(equipment_id.get())).await
}
