//! Role and permission-group operations.

use serde_json::json;
use tracing::debug;

use fabops_core::{EntityId, Result};

use crate::client::GraphqlClient;
use crate::lookup::{self, connection_nodes};
use crate::queries;

/// One platform permission group, as exported to CSV.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct PermissionGroup {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub family: Option<String>,
}

impl PermissionGroup {
    pub const CSV_HEADER: [&'static str; 3] = ["id", "name", "family"];

    pub fn csv_row(&self) -> [String; 3] {
        [
            self.id.to_string(),
            self.name.clone(),
            self.family.clone().unwrap_or_default(),
        ]
    }
}

/// Resolve both names and attach the permission group to the role.
pub async fn attach_permission_group_to_role(
    client: &GraphqlClient,
    role_name: &str,
    group_name: &str,
) -> Result<()> {
    let role_id = lookup::role_id_by_name(client, role_name).await?;
    let group_id = lookup::permission_group_id_by_name(client, group_name).await?;
    debug!(%role_id, %group_id, "attaching permission group to role");

    let variables = json!({"input": {
        "roleId": role_id.to_value(),
        "permissionGroupId": group_id.to_value(),
    }});
    client
        .execute(queries::ATTACH_PERMISSION_GROUP_TO_ROLE, variables)
        .await?;
    Ok(())
}

/// Fetch every permission group defined on the platform.
pub async fn all_permission_groups(client: &GraphqlClient) -> Result<Vec<PermissionGroup>> {
    let data = client
        .execute(queries::GET_PERMISSION_GROUPS, json!({}))
        .await?;
    connection_nodes(&data, "permissionGroups")
        .into_iter()
        .map(|node| {
            serde_json::from_value(node)
                .map_err(|e| super::shape_error(format!("unexpected permission group: {}", e)))
        })
        .collect()
}
