use serde::Deserialize;
use validator::Validate;

use crate::domain::client::ContractType;
use crate::domain::proposal::{NewProposal, ProposalStatus};
use crate::domain::types::{Cnpj, ContactName, Email};
use crate::forms::{FormError, parse_date};

#[derive(Deserialize, Validate)]
/// Form data for registering a commercial proposal.
pub struct AddProposalForm {
    #[validate(length(min = 14, max = 18))]
    pub cnpj: String,
    #[validate(length(equal = 2))]
    pub state: String,
    #[validate(length(min = 1, max = 50))]
    pub city: String,
    #[validate(length(min = 1, max = 50))]
    pub contact_name: String,
    #[validate(length(min = 1, max = 20))]
    pub contact_phone: String,
    #[validate(email)]
    pub email: String,
    pub date: String,
    #[validate(length(min = 1))]
    pub value: String,
    pub contract_type: String,
    #[serde(default)]
    pub current_query: String,
}

impl TryFrom<AddProposalForm> for NewProposal {
    type Error = FormError;

    fn try_from(form: AddProposalForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let value = form.value.trim().replace(',', ".");
        if value.parse::<f64>().map_or(true, |v| v < 0.0) {
            return Err(FormError::InvalidOption(form.value));
        }
        Ok(NewProposal {
            cnpj: Cnpj::new(&form.cnpj).map_err(|_| FormError::InvalidCnpj)?,
            state: form.state.trim().to_uppercase(),
            city: form.city.trim().to_string(),
            contact_name: ContactName::new(form.contact_name)
                .map_err(|_| FormError::InvalidName)?,
            contact_phone: form.contact_phone.trim().to_string(),
            email: Email::new(form.email).map_err(|_| FormError::InvalidEmail)?,
            date: parse_date(&form.date)?,
            value,
            contract_type: ContractType::from_code(form.contract_type.trim())
                .ok_or(FormError::InvalidOption(form.contract_type))?,
            status: ProposalStatus::Pending,
        })
    }
}
