//! Issue operations.

use serde_json::{Value, json};
use tracing::{debug, info};

use fabops_core::error::DataError;
use fabops_core::{EntityId, Etag, Result};

use crate::client::GraphqlClient;
use crate::lookup::connection_nodes;
use crate::queries;

/// Wrap plain text in the platform's rich-text paragraph node, the shape
/// the issue editor stores in `causeCondition`.
fn rich_text_paragraph(text: &str) -> Value {
    json!([{
        "type": "paragraph",
        "children": [{"text": text}],
    }])
}

/// Create an issue against a part inventory with a plain-text cause.
pub async fn create_issue(
    client: &GraphqlClient,
    part_inventory_id: &EntityId,
    cause_text: &str,
) -> Result<EntityId> {
    debug!(%part_inventory_id, "creating issue");
    let variables = json!({"input": {
        "partInventoryId": part_inventory_id.to_value(),
        "causeCondition": rich_text_paragraph(cause_text).to_string(),
    }});
    let data = client.execute(queries::CREATE_ISSUE, variables).await?;
    let issue_id: EntityId = serde_json::from_value(data["createIssue"]["issue"]["id"].clone())
        .map_err(|_| super::shape_error("createIssue response is missing the issue id"))?;
    info!(%issue_id, %part_inventory_id, "created issue");
    Ok(issue_id)
}

/// Fetch the current etag of one issue attribute by key.
async fn attribute_etag(client: &GraphqlClient, issue_id: &EntityId, key: &str) -> Result<Etag> {
    let variables = json!({"filters": {"id": {"eq": issue_id.to_value()}}});
    let data = client.execute(queries::GET_ISSUE_ATTRIBUTES, variables).await?;
    let issues = connection_nodes(&data, "issues");
    let attribute = issues
        .iter()
        .filter_map(|issue| issue["attributes"].as_array())
        .flatten()
        .find(|attribute| attribute["key"].as_str() == Some(key))
        .ok_or_else(|| DataError::NoMatch {
            entity: "issue attribute",
            key: format!("{issue_id}/{key}"),
        })?;
    serde_json::from_value(attribute["_etag"].clone())
        .map_err(|_| super::shape_error("issue attribute is missing its _etag"))
}

/// Set one issue attribute, fetching the attribute's etag first.
pub async fn update_issue_attribute(
    client: &GraphqlClient,
    issue_id: &EntityId,
    key: &str,
    value: &str,
) -> Result<()> {
    let etag = attribute_etag(client, issue_id, key).await?;
    debug!(%issue_id, key, "updating issue attribute");
    let variables = json!({"input": {
        "issueId": issue_id.to_value(),
        "etag": etag.as_str(),
        "key": key,
        "value": value,
    }});
    client.execute(queries::UPDATE_ISSUE_ATTRIBUTE, variables).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraph_node_wraps_text() {
        let node = rich_text_paragraph("solder bridge on U4");
        assert_eq!(node[0]["type"], "paragraph");
        assert_eq!(node[0]["children"][0]["text"], "solder bridge on U4");
    }
}
