//! Run operations.

use serde_json::{Value, json};
use tracing::info;

use fabops_core::error::DataError;
use fabops_core::{EntityId, Result};

use crate::client::GraphqlClient;
use crate::ops::attachments;
use crate::queries;

fn first_step(steps: &[Value]) -> Option<&Value> {
    steps
        .iter()
        .min_by_key(|step| step["position"].as_i64().unwrap_or(i64::MAX))
}

/// Resolve the entity id of a run's first step by position. Files attach to
/// entities, and a run's documents conventionally live on the opening step.
async fn first_step_entity_id(client: &GraphqlClient, run_id: &EntityId) -> Result<EntityId> {
    let data = client
        .execute(queries::GET_RUN_STEPS, json!({"id": run_id.to_value()}))
        .await?;
    let steps = data["run"]["steps"].as_array().cloned().unwrap_or_default();
    let first = first_step(&steps).ok_or_else(|| DataError::NoMatch {
        entity: "run step",
        key: run_id.to_string(),
    })?;
    serde_json::from_value(first["entityId"].clone())
        .map_err(|_| super::shape_error("run step is missing its entityId"))
}

/// Attach a file to a run's first step: create the attachment by filename,
/// then push the bytes to the signed upload URL the platform hands back.
/// Returns the new attachment id.
pub async fn attach_file_to_run(
    client: &GraphqlClient,
    run_id: &EntityId,
    filename: &str,
    bytes: Vec<u8>,
) -> Result<EntityId> {
    let step_entity_id = first_step_entity_id(client, run_id).await?;
    let created = attachments::create_file_attachment(client, &step_entity_id, filename).await?;
    attachments::upload(client, &created.upload_url, &created.content_type, bytes).await?;
    info!(%run_id, attachment_id = %created.id, filename, "attached file to run");
    Ok(created.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_step_is_picked_by_position_not_listing_order() {
        let steps = [
            json!({"id": 2, "position": 3, "entityId": 92}),
            json!({"id": 1, "position": 1, "entityId": 91}),
        ];
        assert_eq!(first_step(&steps).unwrap()["entityId"], json!(91));
    }

    #[test]
    fn no_steps_means_no_first_step() {
        assert!(first_step(&[]).is_none());
    }
}
