//! Location operations.

use serde_json::json;
use tracing::{debug, error, info};

use fabops_core::{EntityRef, Result};

use crate::client::GraphqlClient;
use crate::lookup::connection_nodes;
use crate::queries;

/// Outcome of a full location sweep.
#[derive(Debug, Default)]
pub struct LocationDeleteSummary {
    pub deleted: usize,
    pub failures: Vec<(String, String)>,
}

/// Delete every location in the environment.
///
/// The listing returns id and etag together, so no re-fetch is needed
/// before each delete. Individual failures (a location still referenced by
/// inventory, for instance) are recorded and the sweep continues.
pub async fn delete_all_locations(client: &GraphqlClient) -> Result<LocationDeleteSummary> {
    let data = client.execute(queries::GET_LOCATIONS, json!({})).await?;
    let nodes = connection_nodes(&data, "locations");
    info!(count = nodes.len(), "deleting locations");

    let mut summary = LocationDeleteSummary::default();
    for node in nodes {
        let location: EntityRef = match serde_json::from_value(node) {
            Ok(location) => location,
            Err(_) => {
                return Err(super::shape_error("location node is missing id or _etag"));
            }
        };
        debug!(id = %location.id, "deleting location");
        let variables = json!({
            "id": location.id.to_value(),
            "etag": location.etag.as_str(),
        });
        match client.execute(queries::DELETE_LOCATION, variables).await {
            Ok(_) => summary.deleted += 1,
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                error!(id = %location.id, %err, "failed to delete location");
                summary.failures.push((location.id.to_string(), err.to_string()));
            }
        }
    }
    Ok(summary)
}
