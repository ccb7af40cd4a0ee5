//! Capability resolver mapping (role, resource, action) to a yes/no answer.

use serde::Serialize;

use crate::domain::types::Role;
use crate::filters::TabSchema;
use crate::filters::tabs::SEARCH_TABS;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Client,
    Unit,
    Equipment,
    Appointment,
    ServiceOrder,
    Report,
    Proposal,
    Material,
    User,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    View,
    Create,
    Update,
    Delete,
}

/// Whether `role` may perform `action` on `resource`.
pub fn can(role: Role, resource: Resource, action: Action) -> bool {
    use Action::*;
    use Resource::*;

    match role {
        Role::ProphyManager => true,
        Role::InternalPhysicist => match resource {
            Client | Unit | Equipment | Material => action == View,
            Appointment | ServiceOrder | Report => action != Delete,
            Proposal | User => false,
        },
        Role::ExternalPhysicist => match resource {
            Client | Unit | Equipment | Appointment | ServiceOrder | Material => action == View,
            Report => matches!(action, View | Update),
            Proposal | User => false,
        },
        Role::ClientManager => match resource {
            Client => matches!(action, View | Update),
            Unit | Equipment => true,
            Appointment => matches!(action, View | Create),
            ServiceOrder | Report | Material => action == View,
            Proposal | User => false,
        },
        Role::UnitManager => match resource {
            Unit => matches!(action, View | Update),
            Equipment => true,
            Appointment | ServiceOrder | Report | Material => action == View,
            Client | Proposal | User => false,
        },
        Role::Commercial => match resource {
            Proposal => action != Delete,
            Client | Material => action == View,
            _ => false,
        },
    }
}

/// Capabilities of a role flattened for templates, e.g. `client_delete`.
pub fn capability_names(role: Role) -> Vec<String> {
    const RESOURCES: [(Resource, &str); 9] = [
        (Resource::Client, "client"),
        (Resource::Unit, "unit"),
        (Resource::Equipment, "equipment"),
        (Resource::Appointment, "appointment"),
        (Resource::ServiceOrder, "service_order"),
        (Resource::Report, "report"),
        (Resource::Proposal, "proposal"),
        (Resource::Material, "material"),
        (Resource::User, "user"),
    ];
    const ACTIONS: [(Action, &str); 4] = [
        (Action::View, "view"),
        (Action::Create, "create"),
        (Action::Update, "update"),
        (Action::Delete, "delete"),
    ];

    RESOURCES
        .iter()
        .flat_map(|(resource, resource_name)| {
            ACTIONS.iter().filter_map(move |(action, action_name)| {
                can(role, *resource, *action).then(|| format!("{resource_name}_{action_name}"))
            })
        })
        .collect()
}

/// Search page tabs `role` may view, in index order.
pub fn search_tabs_for(role: Role) -> Vec<&'static TabSchema> {
    SEARCH_TABS
        .iter()
        .copied()
        .filter(|tab| can(role, tab.resource, Action::View))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prophy_manager_can_do_everything() {
        assert!(can(Role::ProphyManager, Resource::Client, Action::Delete));
        assert!(can(Role::ProphyManager, Resource::User, Action::Update));
    }

    #[test]
    fn only_prophy_manager_deletes_clients() {
        for role in Role::ALL {
            assert_eq!(
                can(role, Resource::Client, Action::Delete),
                role == Role::ProphyManager,
                "{role:?}"
            );
        }
    }

    #[test]
    fn only_prophy_manager_manages_users() {
        for role in Role::ALL {
            assert_eq!(can(role, Resource::User, Action::View), role == Role::ProphyManager);
        }
    }

    #[test]
    fn unit_manager_cannot_see_proposals_or_clients() {
        assert!(!can(Role::UnitManager, Resource::Proposal, Action::View));
        assert!(!can(Role::UnitManager, Resource::Client, Action::View));
        assert!(can(Role::UnitManager, Resource::Equipment, Action::Create));
    }

    #[test]
    fn commercial_handles_proposals_only() {
        assert!(can(Role::Commercial, Resource::Proposal, Action::Create));
        assert!(!can(Role::Commercial, Resource::Proposal, Action::Delete));
        assert!(!can(Role::Commercial, Resource::Report, Action::View));
    }

    #[test]
    fn search_tabs_follow_view_permission() {
        let kinds = |role| {
            search_tabs_for(role)
                .iter()
                .map(|tab| tab.prefix)
                .collect::<Vec<_>>()
        };
        assert_eq!(kinds(Role::ProphyManager).len(), SEARCH_TABS.len());
        assert_eq!(kinds(Role::Commercial), vec!["clients", "proposals"]);
        assert_eq!(
            kinds(Role::UnitManager),
            vec!["appointments", "reports", "equipments"]
        );
    }

    #[test]
    fn capability_names_list_allowed_pairs() {
        let names = capability_names(Role::ExternalPhysicist);
        assert!(names.contains(&"report_update".to_string()));
        assert!(!names.contains(&"report_delete".to_string()));
        assert!(!names.iter().any(|name| name.starts_with("proposal_")));
    }
}
