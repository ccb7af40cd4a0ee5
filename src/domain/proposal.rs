use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::client::ContractType;
use crate::domain::types::{Cnpj, ContactName, Email, ProposalId};

code_enum! {
    ProposalStatus {
        Accepted => ("A", "Aceito"),
        Rejected => ("R", "Rejeitado"),
        Pending => ("P", "Pendente"),
    }
}

/// Commercial proposal offered to a prospective client.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Proposal {
    pub id: ProposalId,
    pub cnpj: Cnpj,
    pub state: Option<String>,
    pub city: Option<String>,
    pub contact_name: String,
    pub contact_phone: Option<String>,
    pub email: Option<String>,
    pub date: NaiveDate,
    pub value: String,
    pub contract_type: ContractType,
    pub status: ProposalStatus,
    pub pdf_version: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct NewProposal {
    pub cnpj: Cnpj,
    pub state: String,
    pub city: String,
    pub contact_name: ContactName,
    pub contact_phone: String,
    pub email: Email,
    pub date: NaiveDate,
    pub value: String,
    pub contract_type: ContractType,
    pub status: ProposalStatus,
}
