//! Change requests: filing them and counting those still under review.

use std::collections::{HashMap, HashSet};

use serde_json::{Value, json};

use crate::backend::errors::BackendResult;
use crate::backend::pagination::fetch_all;
use crate::backend::{BackendApi, detail_path};
use crate::domain::operation::{Operation, OperationStatus, OperationType};
use crate::domain::types::{ClientId, Role, UnitId};
use crate::domain::unit::Unit;
use crate::models::auth::AuthenticatedUser;

pub const CLIENT_OPERATIONS: &str = "/clients/operations/";
pub const UNIT_OPERATIONS: &str = "/units/operations/";
pub const EQUIPMENT_OPERATIONS: &str = "/equipments/operations/";

/// Pending operations of each kind, fetched in full.
#[derive(Debug, Default)]
pub struct PendingOperations {
    pub clients: Vec<Operation>,
    pub units: Vec<Operation>,
    pub equipments: Vec<Operation>,
}

impl PendingOperations {
    /// Operations under review touching `client_id`, the units in `unit_ids`
    /// or their equipment.
    pub fn count_for(&self, client_id: ClientId, unit_ids: &HashSet<UnitId>) -> usize {
        let client_ops = self
            .clients
            .iter()
            .filter(|op| op.original_client == Some(client_id) || op.client == Some(client_id))
            .count();
        let unit_ops = self
            .units
            .iter()
            .filter(|op| {
                op.client == Some(client_id)
                    || op.original_unit.is_some_and(|unit| unit_ids.contains(&unit))
            })
            .count();
        let equipment_ops = self
            .equipments
            .iter()
            .filter(|op| op.unit.is_some_and(|unit| unit_ids.contains(&unit)))
            .count();
        client_ops + unit_ops + equipment_ops
    }

    /// Per-client counts, given the unit ownership map.
    pub fn counts_by_client(&self, units: &[Unit]) -> HashMap<ClientId, usize> {
        let mut unit_ids: HashMap<ClientId, HashSet<UnitId>> = HashMap::new();
        for unit in units {
            unit_ids.entry(unit.client).or_default().insert(unit.id);
        }
        let clients: HashSet<ClientId> = self
            .clients
            .iter()
            .filter_map(|op| op.original_client.or(op.client))
            .chain(self.units.iter().filter_map(|op| op.client))
            .chain(unit_ids.keys().copied())
            .collect();

        let empty = HashSet::new();
        clients
            .into_iter()
            .map(|client| {
                let units = unit_ids.get(&client).unwrap_or(&empty);
                (client, self.count_for(client, units))
            })
            .filter(|(_, count)| *count > 0)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty() && self.units.is_empty() && self.equipments.is_empty()
    }
}

fn under_review() -> Vec<(String, String)> {
    vec![(
        "operation_status".to_string(),
        OperationStatus::Review.code().to_string(),
    )]
}

/// Fetches every operation under review. Each endpoint is auto-paginated; a
/// failure on any of them fails the whole call.
pub async fn fetch_pending<B>(api: &B) -> BackendResult<PendingOperations>
where
    B: BackendApi + ?Sized,
{
    let filters = under_review();
    let clients = fetch_all(api, CLIENT_OPERATIONS, &filters).await?;
    let units = fetch_all(api, UNIT_OPERATIONS, &filters).await?;
    let equipments = fetch_all(api, EQUIPMENT_OPERATIONS, &filters).await?;
    Ok(PendingOperations {
        clients,
        units,
        equipments,
    })
}

/// Pending counts for every client with at least one operation under review.
/// Units are only fetched when equipment operations need mapping to clients.
pub async fn pending_by_client<B>(api: &B) -> BackendResult<HashMap<ClientId, usize>>
where
    B: BackendApi + ?Sized,
{
    let pending = fetch_pending(api).await?;
    if pending.is_empty() {
        return Ok(HashMap::new());
    }
    let units: Vec<Unit> = if pending.equipments.is_empty() && pending.units.is_empty() {
        Vec::new()
    } else {
        fetch_all(api, "/units/", &[]).await?
    };
    Ok(pending.counts_by_client(&units))
}

/// A change to a client, unit or equipment record.
#[derive(Debug, Clone)]
pub enum Change {
    Add(Value),
    Edit(i32, Value),
    Delete(i32),
}

/// How the backend took a [`Change`].
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeOutcome {
    /// Written straight to the resource; carries the backend response.
    Applied(Value),
    /// Filed as an operation awaiting review.
    Filed,
}

/// Managers on the client side propose changes instead of applying them.
pub fn requires_review(user: &AuthenticatedUser) -> bool {
    matches!(user.role, Role::ClientManager | Role::UnitManager)
}

fn with_fields(mut payload: Value, fields: Value) -> Value {
    if let (Some(target), Value::Object(extra)) = (payload.as_object_mut(), fields) {
        target.extend(extra);
    }
    payload
}

/// Submits `change` to `collection` (e.g. `/units/`). `original_key` names the
/// field pointing at the edited record in an operation, e.g. `original_unit`.
pub async fn submit_change<B>(
    api: &B,
    user: &AuthenticatedUser,
    collection: &str,
    original_key: &str,
    change: Change,
) -> BackendResult<ChangeOutcome>
where
    B: BackendApi + ?Sized,
{
    if !requires_review(user) {
        let response = match change {
            Change::Add(payload) => api.post_json(collection, &payload).await?,
            Change::Edit(id, payload) => {
                api.patch_json(&detail_path(collection, id), &payload).await?
            }
            Change::Delete(id) => {
                api.delete(&detail_path(collection, id)).await?;
                Value::Null
            }
        };
        return Ok(ChangeOutcome::Applied(response));
    }

    let body = match change {
        Change::Add(payload) => with_fields(
            payload,
            json!({ "operation_type": OperationType::Add.code() }),
        ),
        Change::Edit(id, payload) => with_fields(
            payload,
            json!({ "operation_type": OperationType::Edit.code(), original_key: id }),
        ),
        Change::Delete(id) => {
            json!({ "operation_type": OperationType::Delete.code(), original_key: id })
        }
    };
    let path = format!("{}/operations/", collection.trim_end_matches('/'));
    api.post_json(&path, &body).await?;
    log::info!("{} filed a change request at {path}", user.email);
    Ok(ChangeOutcome::Filed)
}
