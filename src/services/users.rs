use crate::backend::{BackendApi, detail_path};
use crate::domain::types::UserId;
use crate::domain::user::UpdateUserRole;
use crate::forms::users::UserRoleForm;
use crate::models::auth::AuthenticatedUser;
use crate::permissions::{Action, Resource};
use crate::services::search::back_to_search;
use crate::services::{ServiceError, ServiceResult, ensure_permission, to_body};

pub const USERS_PATH: &str = "/users/";

/// Changes the role of `user_id` and returns the search page URL to go back to.
pub async fn update_role<B>(
    api: &B,
    user: &AuthenticatedUser,
    user_id: i32,
    form: UserRoleForm,
) -> ServiceResult<String>
where
    B: BackendApi + ?Sized,
{
    ensure_permission(user, Resource::User, Action::Update)?;
    let user_id = UserId::new(user_id)?;

    let update = UpdateUserRole::try_from(&form).map_err(|err| {
        log::error!("Failed to validate role form: {err}");
        ServiceError::from(err)
    })?;

    api.patch_json(&detail_path(USERS_PATH, user_id), &to_body(&update)?)
        .await
        .map_err(|err| {
            log::error!("Failed to change the role of user {user_id}: {err}");
            ServiceError::from(err)
        })?;
    log::info!("{} set the role of user {user_id} to {}", user.email, update.role.code());

    Ok(back_to_search(&form.current_query))
}
