use crate::backend::BackendApi;
use crate::domain::types::{ClientId, UnitId};
use crate::domain::unit::{NewUnit, UpdateUnit};
use crate::dto::clients::MutationOutcome;
use crate::forms::units::{AddUnitForm, SaveUnitForm};
use crate::models::auth::AuthenticatedUser;
use crate::permissions::{Action, Resource};
use crate::services::clients::client_url;
use crate::services::operations::{Change, ChangeOutcome, submit_change};
use crate::services::{ServiceError, ServiceResult, ensure_permission, to_body};

pub const UNITS_PATH: &str = "/units/";

fn outcome(client_id: ClientId, outcome: ChangeOutcome) -> MutationOutcome {
    MutationOutcome {
        redirect_to: client_url(client_id),
        applied: matches!(outcome, ChangeOutcome::Applied(_)),
    }
}

pub async fn add_unit<B>(
    api: &B,
    user: &AuthenticatedUser,
    form: AddUnitForm,
) -> ServiceResult<MutationOutcome>
where
    B: BackendApi + ?Sized,
{
    ensure_permission(user, Resource::Unit, Action::Create)?;

    let new_unit = NewUnit::try_from(form).map_err(|err| {
        log::error!("Failed to validate unit form: {err}");
        ServiceError::from(err)
    })?;
    let client_id = new_unit.client;

    let result = submit_change(
        api,
        user,
        UNITS_PATH,
        "original_unit",
        Change::Add(to_body(&new_unit)?),
    )
    .await
    .map_err(|err| {
        log::error!("Failed to add a unit to client {client_id}: {err}");
        ServiceError::from(err)
    })?;

    Ok(outcome(client_id, result))
}

pub async fn save_unit<B>(
    api: &B,
    user: &AuthenticatedUser,
    unit_id: i32,
    form: SaveUnitForm,
) -> ServiceResult<MutationOutcome>
where
    B: BackendApi + ?Sized,
{
    ensure_permission(user, Resource::Unit, Action::Update)?;
    let unit_id = UnitId::new(unit_id)?;
    let client_id = ClientId::new(form.client_id)?;

    let update = UpdateUnit::try_from(form).map_err(|err| {
        log::error!("Failed to validate unit form: {err}");
        ServiceError::from(err)
    })?;

    let result = submit_change(
        api,
        user,
        UNITS_PATH,
        "original_unit",
        Change::Edit(unit_id.get(), to_body(&update)?),
    )
    .await
    .map_err(|err| {
        log::error!("Failed to update unit {unit_id}: {err}");
        ServiceError::from(err)
    })?;

    Ok(outcome(client_id, result))
}

pub async fn delete_unit<B>(
    api: &B,
    user: &AuthenticatedUser,
    unit_id: i32,
    client_id: i32,
) -> ServiceResult<MutationOutcome>
where
    B: BackendApi + ?Sized,
{
    ensure_permission(user, Resource::Unit, Action::Delete)?;
    let unit_id = UnitId::new(unit_id)?;
    let client_id = ClientId::new(client_id)?;

    let result = submit_change(
        api,
        user,
        UNITS_PATH,
        "original_unit",
        Change::Delete(unit_id.get()),
    )
    .await
    .map_err(|err| {
        log::error!("Failed to delete unit {unit_id}: {err}");
        ServiceError::from(err)
    })?;

    Ok(outcome(client_id, result))
}
