use serde::Deserialize;
use validator::Validate;

use crate::domain::client::{NewClient, UpdateClient};
use crate::domain::types::{ClientName, Cnpj, Email};
use crate::forms::FormError;

#[derive(Deserialize, Validate)]
/// Form data for registering a new client.
pub struct AddClientForm {
    #[validate(length(min = 14, max = 18))]
    pub cnpj: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
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
    /// Query string of the page to return to.
    #[serde(default)]
    pub current_query: String,
}

impl TryFrom<AddClientForm> for NewClient {
    type Error = FormError;

    fn try_from(form: AddClientForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(NewClient {
            cnpj: Cnpj::new(&form.cnpj).map_err(|_| FormError::InvalidCnpj)?,
            name: ClientName::new(form.name).map_err(|_| FormError::InvalidName)?,
            email: Email::new(form.email).map_err(|_| FormError::InvalidEmail)?,
            phone: form.phone.trim().to_string(),
            address: form.address.trim().to_string(),
            state: form.state.trim().to_uppercase(),
            city: form.city.trim().to_string(),
        })
    }
}

#[derive(Deserialize, Validate)]
/// Form data for updating an existing client.
pub struct SaveClientForm {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub city: String,
}

impl TryFrom<SaveClientForm> for UpdateClient {
    type Error = FormError;

    fn try_from(form: SaveClientForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(UpdateClient::new(
            ClientName::new(form.name).map_err(|_| FormError::InvalidName)?,
            Email::new(form.email).map_err(|_| FormError::InvalidEmail)?,
            Some(form.phone),
            Some(form.address),
            Some(form.state),
            Some(form.city),
        ))
    }
}

#[derive(Deserialize)]
/// Client page a unit or equipment deletion returns to.
pub struct ClientRefForm {
    pub client_id: i32,
}
