//! Per-domain bulk operations.
//!
//! Each module is one thin layer over the client: look up ids, fetch the
//! concurrency token, issue the mutation. Every mutating operation re-fetches
//! the entity's etag immediately before the mutating call; a stale token is
//! rejected by the platform and surfaced as an API error.

pub mod attachments;
pub mod inventory;
pub mod issues;
pub mod labels;
pub mod locations;
pub mod mboms;
pub mod procedures;
pub mod purchases;
pub mod roles;
pub mod rules;
pub mod runs;
pub mod teams;

use serde_json::json;

use fabops_core::error::{ApiError, GraphqlErrorEntry};
use fabops_core::{EntityId, Etag, Result};

use crate::client::GraphqlClient;

/// Fetch the current etag for an entity, reading `data[field]["_etag"]`.
pub(crate) async fn fetch_etag(
    client: &GraphqlClient,
    document: &str,
    field: &str,
    id: &EntityId,
) -> Result<Etag> {
    let data = client.execute(document, json!({"id": id.to_value()})).await?;
    data[field]["_etag"]
        .as_str()
        .map(Etag::new)
        .ok_or_else(|| shape_error(format!("no _etag on {}", field)))
}

/// Error for a response that parsed but did not carry the expected fields.
pub(crate) fn shape_error(message: impl Into<String>) -> fabops_core::Error {
    ApiError::new(vec![GraphqlErrorEntry {
        message: message.into(),
        path: None,
    }])
    .into()
}
