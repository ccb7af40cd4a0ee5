use crate::backend::BackendApi;
use crate::domain::appointment::NewAppointment;
use crate::forms::appointments::AddAppointmentForm;
use crate::models::auth::AuthenticatedUser;
use crate::permissions::{Action, Resource};
use crate::services::search::back_to_search;
use crate::services::{ServiceError, ServiceResult, ensure_permission, to_body};

pub const APPOINTMENTS_PATH: &str = "/appointments/";

/// Schedules a visit and returns the search page URL to go back to.
pub async fn add_appointment<B>(
    api: &B,
    user: &AuthenticatedUser,
    form: AddAppointmentForm,
) -> ServiceResult<String>
where
    B: BackendApi + ?Sized,
{
    ensure_permission(user, Resource::Appointment, Action::Create)?;
    let redirect_to = back_to_search(&form.current_query);

    let appointment = NewAppointment::try_from(form).map_err(|err| {
        log::error!("Failed to validate appointment form: {err}");
        ServiceError::from(err)
    })?;

    api.post_json(APPOINTMENTS_PATH, &to_body(&appointment)?)
        .await
        .map_err(|err| {
            log::error!("Failed to schedule a visit to unit {}: {err}", appointment.unit);
            ServiceError::from(err)
        })?;

    Ok(redirect_to)
}
