//! Lookup and resolve helpers.
//!
//! Translate a human-meaningful key (name, email, label value) into the
//! platform's internal identifier via an exact-match filter on a connection
//! query. When the filter matches more than one entity the platform gives no
//! ordering guarantee; these helpers take the first match and log a warning.

use serde_json::{Value, json};
use tracing::{debug, warn};

use fabops_core::error::DataError;
use fabops_core::{EntityId, Result};

use crate::client::GraphqlClient;
use crate::queries;

/// Pull the `node` values out of a relay-style connection field.
pub(crate) fn connection_nodes(data: &Value, field: &str) -> Vec<Value> {
    data[field]["edges"]
        .as_array()
        .map(|edges| edges.iter().map(|edge| edge["node"].clone()).collect())
        .unwrap_or_default()
}

fn entity_id(node: &Value) -> Option<EntityId> {
    serde_json::from_value(node["id"].clone()).ok()
}

/// Exact-match lookup on one connection query; `Err(DataError::NoMatch)`
/// when nothing matches.
async fn resolve_one(
    client: &GraphqlClient,
    document: &str,
    field: &'static str,
    filter_key: &str,
    key: &str,
    entity: &'static str,
) -> Result<EntityId> {
    let variables = json!({"filters": {filter_key: {"eq": key}}});
    let data = client.execute(document, variables).await?;
    let nodes = connection_nodes(&data, field);
    if nodes.len() > 1 {
        warn!(entity, key, matches = nodes.len(), "multiple matches, taking the first");
    }
    nodes
        .first()
        .and_then(entity_id)
        .ok_or_else(|| {
            DataError::NoMatch {
                entity,
                key: key.to_string(),
            }
            .into()
        })
}

pub async fn user_id_by_email(client: &GraphqlClient, email: &str) -> Result<EntityId> {
    resolve_one(client, queries::GET_USERS, "users", "email", email, "user").await
}

pub async fn team_id_by_name(client: &GraphqlClient, name: &str) -> Result<EntityId> {
    resolve_one(client, queries::GET_TEAMS, "teams", "name", name, "team").await
}

pub async fn role_id_by_name(client: &GraphqlClient, name: &str) -> Result<EntityId> {
    resolve_one(client, queries::GET_ROLES, "roles", "name", name, "role").await
}

pub async fn permission_group_id_by_name(client: &GraphqlClient, name: &str) -> Result<EntityId> {
    resolve_one(
        client,
        queries::GET_PERMISSION_GROUPS,
        "permissionGroups",
        "name",
        name,
        "permission group",
    )
    .await
}

/// A resolved label.
#[derive(Clone, Debug)]
pub struct Label {
    pub id: EntityId,
    pub value: String,
}

/// Look a label up by exact value, creating it when absent.
pub async fn find_or_create_label(client: &GraphqlClient, value: &str) -> Result<Label> {
    let variables = json!({"filters": {"value": {"eq": value}}});
    let data = client.execute(queries::GET_LABELS, variables).await?;
    let nodes = connection_nodes(&data, "labels");
    if nodes.len() > 1 {
        warn!(value, matches = nodes.len(), "multiple labels match, taking the first");
    }
    if let Some(id) = nodes.first().and_then(entity_id) {
        return Ok(Label {
            id,
            value: value.to_string(),
        });
    }

    debug!(value, "label not found, creating");
    let variables = json!({"input": {"value": value}});
    let data = client.execute(queries::CREATE_LABEL, variables).await?;
    let node = &data["createLabel"]["label"];
    let id = entity_id(node).ok_or_else(|| DataError::NoMatch {
        entity: "label",
        key: value.to_string(),
    })?;
    Ok(Label {
        id,
        value: value.to_string(),
    })
}

/// Look a role up by exact name, creating it when absent.
pub async fn find_or_create_role(client: &GraphqlClient, name: &str) -> Result<EntityId> {
    match role_id_by_name(client, name).await {
        Ok(id) => Ok(id),
        Err(fabops_core::Error::Data(DataError::NoMatch { .. })) => {
            debug!(name, "role not found, creating");
            let variables = json!({"input": {"name": name}});
            let data = client.execute(queries::CREATE_ROLE, variables).await?;
            entity_id(&data["createRole"]["role"]).ok_or_else(|| {
                DataError::NoMatch {
                    entity: "role",
                    key: name.to_string(),
                }
                .into()
            })
        }
        Err(other) => Err(other),
    }
}
