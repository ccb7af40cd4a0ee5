use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{ClientId, Cnpj, UnitName, UserId};
use crate::domain::unit::{NewUnit, UpdateUnit};
use crate::forms::{FormError, optional, parse_optional_id};

#[derive(Deserialize, Validate)]
/// Form data for adding a unit to a client.
pub struct AddUnitForm {
    pub client_id: i32,
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(length(min = 14, max = 18))]
    pub cnpj: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 20))]
    pub phone: String,
    #[validate(length(min = 1, max = 200))]
    pub address: String,
    #[validate(length(equal = 2))]
    pub state: String,
    #[validate(length(min = 1, max = 50))]
    pub city: String,
}

impl TryFrom<AddUnitForm> for NewUnit {
    type Error = FormError;

    fn try_from(form: AddUnitForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(NewUnit {
            client: ClientId::new(form.client_id).map_err(|_| FormError::InvalidId)?,
            name: UnitName::new(form.name).map_err(|_| FormError::InvalidName)?,
            cnpj: Cnpj::new(&form.cnpj).map_err(|_| FormError::InvalidCnpj)?,
            email: form.email.trim().to_string(),
            phone: form.phone.trim().to_string(),
            address: form.address.trim().to_string(),
            state: form.state.trim().to_uppercase(),
            city: form.city.trim().to_string(),
        })
    }
}

#[derive(Deserialize, Validate)]
/// Form data for editing a unit. `client_id` only selects the page to return to.
pub struct SaveUnitForm {
    pub client_id: i32,
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    /// Unit manager id; blank keeps the current assignment.
    #[serde(default)]
    pub user: String,
}

impl TryFrom<SaveUnitForm> for UpdateUnit {
    type Error = FormError;

    fn try_from(form: SaveUnitForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let user = parse_optional_id(&form.user)?
            .map(UserId::new)
            .transpose()
            .map_err(|_| FormError::InvalidId)?;
        Ok(UpdateUnit {
            name: UnitName::new(form.name).map_err(|_| FormError::InvalidName)?,
            email: optional(&form.email),
            phone: optional(&form.phone),
            address: optional(&form.address),
            user,
        })
    }
}
