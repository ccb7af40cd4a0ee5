use serde::Deserialize;

use crate::domain::types::Role;
use crate::domain::user::UpdateUserRole;
use crate::forms::FormError;

#[derive(Deserialize)]
/// Form data for changing a user's role.
pub struct UserRoleForm {
    pub role: String,
    #[serde(default)]
    pub current_query: String,
}

impl TryFrom<&UserRoleForm> for UpdateUserRole {
    type Error = FormError;

    fn try_from(form: &UserRoleForm) -> Result<Self, Self::Error> {
        let role = form
            .role
            .trim()
            .parse::<Role>()
            .map_err(|_| FormError::InvalidOption(form.role.clone()))?;
        Ok(UpdateUserRole { role })
    }
}
