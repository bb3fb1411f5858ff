//! Label operations.
//!
//! Labels attach to entities through the entity-level id (`entityId`), not
//! the run/procedure row id, so callers resolve the run first.

use serde_json::json;
use tracing::{debug, info};

use fabops_core::{EntityId, Result};

use crate::client::GraphqlClient;
use crate::lookup::{Label, find_or_create_label};
use crate::queries;

/// A run together with its entity id and attached labels.
#[derive(Clone, Debug)]
pub struct RunLabels {
    pub run_id: EntityId,
    pub entity_id: EntityId,
    pub labels: Vec<Label>,
}

/// Fetch a run's entity id and currently attached labels.
pub async fn labels_for_run(client: &GraphqlClient, run_id: &EntityId) -> Result<RunLabels> {
    let data = client
        .execute(queries::GET_RUN_LABELS, json!({"id": run_id.to_value()}))
        .await?;
    let run = &data["run"];
    let entity_id: EntityId = serde_json::from_value(run["entityId"].clone())
        .map_err(|_| super::shape_error("run is missing its entityId"))?;
    let labels = run["labels"]
        .as_array()
        .map(|labels| {
            labels
                .iter()
                .filter_map(|label| {
                    Some(Label {
                        id: serde_json::from_value(label["id"].clone()).ok()?,
                        value: label["value"].as_str()?.to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();
    Ok(RunLabels {
        run_id: run_id.clone(),
        entity_id,
        labels,
    })
}

pub async fn add_label_to_entity(
    client: &GraphqlClient,
    label_id: &EntityId,
    entity_id: &EntityId,
) -> Result<()> {
    debug!(%label_id, %entity_id, "attaching label");
    let variables = json!({"input": {
        "labelId": label_id.to_value(),
        "entityId": entity_id.to_value(),
    }});
    client.execute(queries::ADD_LABEL_TO_ENTITY, variables).await?;
    Ok(())
}

pub async fn remove_label_from_entity(
    client: &GraphqlClient,
    label_id: &EntityId,
    entity_id: &EntityId,
) -> Result<()> {
    debug!(%label_id, %entity_id, "detaching label");
    let variables = json!({"input": {
        "labelId": label_id.to_value(),
        "entityId": entity_id.to_value(),
    }});
    client.execute(queries::REMOVE_LABEL_FROM_ENTITY, variables).await?;
    Ok(())
}

/// Swap one label value for another on a run.
///
/// The new label is found or created and attached; the old label is
/// detached only when the run actually carries it. Returns whether the old
/// label was present.
pub async fn relabel_run(
    client: &GraphqlClient,
    run_id: &EntityId,
    old_value: &str,
    new_value: &str,
) -> Result<bool> {
    let run = labels_for_run(client, run_id).await?;
    let new_label = find_or_create_label(client, new_value).await?;
    add_label_to_entity(client, &new_label.id, &run.entity_id).await?;

    // Identical values must not detach the label just attached.
    if old_value == new_value {
        info!(%run_id, value = old_value, "old and new label values match, nothing to detach");
        return Ok(true);
    }

    let old = run.labels.iter().find(|label| label.value == old_value);
    match old {
        Some(label) => {
            remove_label_from_entity(client, &label.id, &run.entity_id).await?;
            info!(%run_id, old_value, new_value, "relabeled run");
            Ok(true)
        }
        None => {
            info!(%run_id, old_value, new_value, "run did not carry the old label");
            Ok(false)
        }
    }
}
