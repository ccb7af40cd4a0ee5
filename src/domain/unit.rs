use serde::{Deserialize, Serialize};

use crate::domain::types::{ClientId, Cnpj, UnitId, UnitName, UserId};

/// A facility (hospital wing, clinic branch) belonging to a client.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Unit {
    pub id: UnitId,
    pub client: ClientId,
    pub name: String,
    pub cnpj: Option<Cnpj>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    /// Unit manager assigned to the facility.
    pub user: Option<UserId>,
}

#[derive(Clone, Debug, Serialize)]
pub struct NewUnit {
    pub client: ClientId,
    pub name: UnitName,
    pub cnpj: Cnpj,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub state: String,
    pub city: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct UpdateUnit {
    pub name: UnitName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserId>,
}
