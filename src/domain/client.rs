use serde::{Deserialize, Serialize};

use crate::domain::types::{ClientId, ClientName, Cnpj, Email};

code_enum! {
    /// Billing cadence agreed with the client.
    ContractType {
        Annual => ("A", "Anual"),
        Monthly => ("M", "Mensal"),
    }
}

code_enum! {
    /// Whether the client currently has an active contract.
    ClientStatus {
        Active => ("A", "Ativo"),
        Inactive => ("I", "Inativo"),
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub id: ClientId,
    pub cnpj: Cnpj,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    #[serde(default)]
    pub active: bool,
    pub status: Option<ClientStatus>,
    pub contract_type: Option<ContractType>,
}

/// Payload for `POST /clients/`.
#[derive(Clone, Debug, Serialize)]
pub struct NewClient {
    pub cnpj: Cnpj,
    pub name: ClientName,
    pub email: Email,
    pub phone: String,
    pub address: String,
    pub state: String,
    pub city: String,
}

/// Payload for `PATCH /clients/{id}/`.
#[derive(Clone, Debug, Serialize)]
pub struct UpdateClient {
    pub name: ClientName,
    pub email: Email,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl UpdateClient {
    #[must_use]
    pub fn new(
        name: ClientName,
        email: Email,
        phone: Option<String>,
        address: Option<String>,
        state: Option<String>,
        city: Option<String>,
    ) -> Self {
        let clean = |value: Option<String>| {
            value
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        Self {
            name,
            email,
            phone: clean(phone),
            address: clean(address),
            state: clean(state),
            city: clean(city),
        }
    }
}
