//! Filter vocabularies of every search tab.

use crate::domain::appointment::AppointmentStatus;
use crate::domain::client::{ClientStatus, ContractType};
use crate::domain::material::{MaterialCategory, MaterialVisibility};
use crate::domain::proposal::ProposalStatus;
use crate::domain::report::ReportStatus;
use crate::domain::types::Role;
use crate::filters::{FilterField, FilterOption, TabKind, TabSchema};
use crate::permissions::Resource;

/// Shared key toggling the list/calendar rendering of appointments.
pub const VIEW_KEY: &str = "view";
/// Shared key holding the active tab index on the search page.
pub const TAB_KEY: &str = "tab";

const CONTRACT_TYPE_OPTIONS: &[FilterOption] = &[
    FilterOption::new(1, ContractType::Annual.code(), ContractType::Annual.label()),
    FilterOption::new(2, ContractType::Monthly.code(), ContractType::Monthly.label()),
];

const CLIENT_STATUS_OPTIONS: &[FilterOption] = &[
    FilterOption::new(1, ClientStatus::Active.code(), ClientStatus::Active.label()),
    FilterOption::new(2, ClientStatus::Inactive.code(), ClientStatus::Inactive.label()),
];

const PROPOSAL_STATUS_OPTIONS: &[FilterOption] = &[
    FilterOption::new(1, ProposalStatus::Accepted.code(), ProposalStatus::Accepted.label()),
    FilterOption::new(2, ProposalStatus::Rejected.code(), ProposalStatus::Rejected.label()),
    FilterOption::new(3, ProposalStatus::Pending.code(), ProposalStatus::Pending.label()),
];

const EXPIRING_OPTIONS: &[FilterOption] = &[
    FilterOption::new(1, "true", "Vencendo"),
    FilterOption::new(2, "false", "Não vencendo"),
];

const APPOINTMENT_STATUS_OPTIONS: &[FilterOption] = &[
    FilterOption::new(1, AppointmentStatus::Pending.code(), AppointmentStatus::Pending.label()),
    FilterOption::new(2, AppointmentStatus::Rejected.code(), AppointmentStatus::Rejected.label()),
    FilterOption::new(3, AppointmentStatus::Confirmed.code(), AppointmentStatus::Confirmed.label()),
    FilterOption::new(4, AppointmentStatus::Fulfilled.code(), AppointmentStatus::Fulfilled.label()),
    FilterOption::new(
        5,
        AppointmentStatus::Unfulfilled.code(),
        AppointmentStatus::Unfulfilled.label(),
    ),
];

const REPORT_STATUS_OPTIONS: &[FilterOption] = &[
    FilterOption::new(1, ReportStatus::Pending.code(), ReportStatus::Pending.label()),
    FilterOption::new(2, ReportStatus::Overdue.code(), ReportStatus::Overdue.label()),
    FilterOption::new(3, ReportStatus::Done.code(), ReportStatus::Done.label()),
];

const ROLE_OPTIONS: &[FilterOption] = &[
    FilterOption::new(1, Role::ProphyManager.code(), Role::ProphyManager.label()),
    FilterOption::new(2, Role::InternalPhysicist.code(), Role::InternalPhysicist.label()),
    FilterOption::new(3, Role::ExternalPhysicist.code(), Role::ExternalPhysicist.label()),
    FilterOption::new(4, Role::ClientManager.code(), Role::ClientManager.label()),
    FilterOption::new(5, Role::UnitManager.code(), Role::UnitManager.label()),
    FilterOption::new(6, Role::Commercial.code(), Role::Commercial.label()),
];

const MATERIAL_VISIBILITY_OPTIONS: &[FilterOption] = &[
    FilterOption::new(1, MaterialVisibility::Public.code(), MaterialVisibility::Public.label()),
    FilterOption::new(2, MaterialVisibility::Internal.code(), MaterialVisibility::Internal.label()),
];

const MATERIAL_CATEGORY_OPTIONS: &[FilterOption] = &[
    FilterOption::new(1, MaterialCategory::VisualIdentity.code(), MaterialCategory::VisualIdentity.label()),
    FilterOption::new(2, MaterialCategory::Signage.code(), MaterialCategory::Signage.label()),
    FilterOption::new(3, MaterialCategory::Posters.code(), MaterialCategory::Posters.label()),
    FilterOption::new(4, MaterialCategory::Training.code(), MaterialCategory::Training.label()),
    FilterOption::new(5, MaterialCategory::Procedures.code(), MaterialCategory::Procedures.label()),
    FilterOption::new(6, MaterialCategory::Other.code(), MaterialCategory::Other.label()),
];

pub static CLIENTS: TabSchema = TabSchema {
    kind: TabKind::Clients,
    prefix: "clients",
    page_key: "client_page",
    index: Some(0),
    title: "Clientes",
    endpoint: "/clients/",
    resource: Resource::Client,
    fields: &[
        FilterField::text("name", "Nome"),
        FilterField::text("cnpj", "CNPJ"),
        FilterField::text("city", "Cidade"),
        FilterField::choice("contract_type", "Tipo de contrato", CONTRACT_TYPE_OPTIONS),
        FilterField::choice("status", "Situação", CLIENT_STATUS_OPTIONS),
    ],
};

pub static PROPOSALS: TabSchema = TabSchema {
    kind: TabKind::Proposals,
    prefix: "proposals",
    page_key: "proposal_page",
    index: Some(1),
    title: "Propostas",
    endpoint: "/proposals/",
    resource: Resource::Proposal,
    fields: &[
        FilterField::text("cnpj", "CNPJ"),
        FilterField::text("contact_name", "Contato"),
        FilterField::choice("contract_type", "Tipo de contrato", CONTRACT_TYPE_OPTIONS),
        FilterField::choice("status", "Situação", PROPOSAL_STATUS_OPTIONS),
        FilterField::choice("expiring_annual", "Anual a vencer", EXPIRING_OPTIONS),
    ],
};

pub static APPOINTMENTS: TabSchema = TabSchema {
    kind: TabKind::Appointments,
    prefix: "appointments",
    page_key: "appointment_page",
    index: Some(2),
    title: "Agendamentos",
    endpoint: "/appointments/",
    resource: Resource::Appointment,
    fields: &[
        FilterField::date("date_start", "Data inicial"),
        FilterField::date("date_end", "Data final"),
        FilterField::choice("status", "Situação", APPOINTMENT_STATUS_OPTIONS),
        FilterField::text("client_name", "Cliente"),
        FilterField::text("unit_city", "Cidade da unidade"),
        FilterField::text("unit_name", "Unidade"),
    ],
};

pub static REPORTS: TabSchema = TabSchema {
    kind: TabKind::Reports,
    prefix: "reports",
    page_key: "report_page",
    index: Some(3),
    title: "Relatórios",
    endpoint: "/reports/",
    resource: Resource::Report,
    fields: &[
        FilterField::choice("status", "Situação", REPORT_STATUS_OPTIONS),
        FilterField::date("due_date_start", "Vencimento a partir de"),
        FilterField::date("due_date_end", "Vencimento até"),
        FilterField::text("client_name", "Cliente"),
        FilterField::text("client_cnpj", "CNPJ do cliente"),
        FilterField::text("unit_name", "Unidade"),
        FilterField::text("unit_city", "Cidade da unidade"),
        FilterField::text("responsible_cpf", "CPF do responsável"),
    ],
};

pub static EQUIPMENTS: TabSchema = TabSchema {
    kind: TabKind::Equipments,
    prefix: "equipments",
    page_key: "equipment_page",
    index: Some(4),
    title: "Equipamentos",
    endpoint: "/equipments/",
    resource: Resource::Equipment,
    fields: &[
        FilterField::text("manufacturer", "Fabricante"),
        FilterField::text("model", "Modelo"),
        FilterField::text("modality", "Modalidade"),
        FilterField::text("client_name", "Cliente"),
    ],
};

pub static USERS: TabSchema = TabSchema {
    kind: TabKind::Users,
    prefix: "users",
    page_key: "user_page",
    index: Some(5),
    title: "Usuários",
    endpoint: "/users/",
    resource: Resource::User,
    fields: &[
        FilterField::text("name", "Nome"),
        FilterField::text("email", "Email"),
        FilterField::choice("role", "Perfil", ROLE_OPTIONS),
    ],
};

pub static MATERIALS: TabSchema = TabSchema {
    kind: TabKind::Materials,
    prefix: "materials",
    page_key: "material_page",
    index: None,
    title: "Materiais",
    endpoint: "/materials/",
    resource: Resource::Material,
    fields: &[
        FilterField::choice("visibility", "Visibilidade", MATERIAL_VISIBILITY_OPTIONS),
        FilterField::choice("category", "Categoria", MATERIAL_CATEGORY_OPTIONS),
        FilterField::text("search", "Busca"),
    ],
};

/// Tabs of the search page, ordered by index.
pub static SEARCH_TABS: [&TabSchema; 6] =
    [&CLIENTS, &PROPOSALS, &APPOINTMENTS, &REPORTS, &EQUIPMENTS, &USERS];

/// Every known tab, including standalone pages.
pub static ALL_TABS: [&TabSchema; 7] = [
    &CLIENTS,
    &PROPOSALS,
    &APPOINTMENTS,
    &REPORTS,
    &EQUIPMENTS,
    &USERS,
    &MATERIALS,
];

pub fn search_tab(index: usize) -> Option<&'static TabSchema> {
    SEARCH_TABS.get(index).copied()
}

pub fn tab_by_kind(kind: TabKind) -> &'static TabSchema {
    match kind {
        TabKind::Clients => &CLIENTS,
        TabKind::Proposals => &PROPOSALS,
        TabKind::Appointments => &APPOINTMENTS,
        TabKind::Reports => &REPORTS,
        TabKind::Equipments => &EQUIPMENTS,
        TabKind::Users => &USERS,
        TabKind::Materials => &MATERIALS,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::filters::FieldKind;

    #[test]
    fn search_tab_indexes_match_positions() {
        for (position, tab) in SEARCH_TABS.iter().enumerate() {
            assert_eq!(tab.index, Some(position));
            assert_eq!(search_tab(position), Some(*tab));
        }
        assert_eq!(search_tab(SEARCH_TABS.len()), None);
    }

    #[test]
    fn url_keys_never_collide_across_tabs() {
        let mut seen = HashSet::new();
        for tab in ALL_TABS {
            assert!(seen.insert(tab.page_key.to_string()));
            for field in tab.fields {
                assert!(seen.insert(tab.url_key(field.key)));
            }
        }
        for tab in ALL_TABS {
            for other in ALL_TABS.iter().filter(|other| other.kind != tab.kind) {
                assert!(!other.owns(tab.page_key));
            }
        }
    }

    #[test]
    fn option_tables_reserve_zero_and_are_unique() {
        for tab in ALL_TABS {
            for field in tab.fields {
                if let FieldKind::Choice(options) = field.kind {
                    let ids: HashSet<_> = options.iter().map(|o| o.id).collect();
                    let values: HashSet<_> = options.iter().map(|o| o.value).collect();
                    assert!(!ids.contains(&0));
                    assert_eq!(ids.len(), options.len());
                    assert_eq!(values.len(), options.len());
                }
            }
        }
    }
}
