//! Purchase-order operations.

use std::collections::HashSet;
use std::str::FromStr;

use serde_json::{Value, json};
use tracing::{debug, error, info};

use fabops_core::error::ConfigError;
use fabops_core::{EntityId, Error, Result};

use crate::client::GraphqlClient;
use crate::lookup::connection_nodes;
use crate::queries;

/// Purchase-order workflow status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PurchaseStatus {
    Draft,
    Requested,
    Approved,
    Ordered,
    Canceled,
    Received,
}

impl PurchaseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PurchaseStatus::Draft => "DRAFT",
            PurchaseStatus::Requested => "REQUESTED",
            PurchaseStatus::Approved => "APPROVED",
            PurchaseStatus::Ordered => "ORDERED",
            PurchaseStatus::Canceled => "CANCELED",
            PurchaseStatus::Received => "RECEIVED",
        }
    }

    pub const ALL: [PurchaseStatus; 6] = [
        PurchaseStatus::Draft,
        PurchaseStatus::Requested,
        PurchaseStatus::Approved,
        PurchaseStatus::Ordered,
        PurchaseStatus::Canceled,
        PurchaseStatus::Received,
    ];
}

impl FromStr for PurchaseStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                ConfigError::Invalid {
                    name: "status",
                    value: s.to_string(),
                    reason: "expected one of DRAFT, REQUESTED, APPROVED, ORDERED, CANCELED, RECEIVED"
                        .to_string(),
                }
                .into()
            })
    }
}

impl std::fmt::Display for PurchaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set one purchase order's status, fetching a fresh etag first.
pub async fn set_status(
    client: &GraphqlClient,
    purchase_order_id: &EntityId,
    status: PurchaseStatus,
) -> Result<()> {
    let etag = super::fetch_etag(
        client,
        queries::GET_PURCHASE_ORDER_ETAG,
        "purchaseOrder",
        purchase_order_id,
    )
    .await?;
    debug!(%purchase_order_id, %status, "updating purchase order status");

    let variables = json!({"input": {
        "id": purchase_order_id.to_value(),
        "etag": etag.as_str(),
        "status": status.as_str(),
    }});
    client.execute(queries::UPDATE_PURCHASE, variables).await?;
    Ok(())
}

/// Accounting for one bulk purchase deletion.
#[derive(Debug, Default)]
pub struct PurchaseDeleteSummary {
    pub lines_deleted: usize,
    pub lines_skipped: usize,
    pub orders_deleted: usize,
    pub orders_skipped: usize,
    pub failures: Vec<(EntityId, String)>,
}

fn node_id(node: &Value) -> Option<EntityId> {
    serde_json::from_value(node["id"].clone()).ok()
}

fn non_empty(value: &Value) -> bool {
    value.as_array().is_some_and(|a| !a.is_empty())
}

/// True when any of the line's part inventories is already installed,
/// kitted, received, or referenced by an as-built child — deleting its
/// purchase order would orphan real material history.
fn line_blocks_order_deletion(line: &Value) -> bool {
    let Some(inventories) = line["partInventories"].as_array() else {
        return false;
    };
    inventories.iter().any(|inventory| {
        inventory["installed"].as_bool().unwrap_or(false)
            || inventory["kitted"].as_bool().unwrap_or(false)
            || inventory["received"].as_bool().unwrap_or(false)
            || inventory["abomChildren"]
                .as_array()
                .is_some_and(|children| {
                    children.iter().any(|child| !child["partInventoryId"].is_null())
                })
    })
}

/// Delete every deletable purchase-order line, then every deletable
/// purchase order.
///
/// The most defensive blocking policy is applied: an order survives when it
/// has approvals, fees, or approval requests, when any of its lines carry
/// installed/kitted/received/as-built material, or when it is listed in
/// `skip`. ORDERED orders are moved to DRAFT before their lines are deleted.
/// Per-entity failures are recorded and the sweep continues.
pub async fn delete_purchases(
    client: &GraphqlClient,
    skip: &[EntityId],
) -> Result<PurchaseDeleteSummary> {
    let mut summary = PurchaseDeleteSummary::default();
    let mut blocked: HashSet<EntityId> = skip.iter().cloned().collect();

    let data = client.execute(queries::GET_PURCHASE_LINES, json!({})).await?;
    let lines = connection_nodes(&data, "purchaseOrderLines");

    // First pass: decide which orders the lines protect.
    for line in &lines {
        if line_blocks_order_deletion(line) {
            if let Some(order_id) = node_id(&line["purchaseOrder"]) {
                blocked.insert(order_id);
            }
        }
    }
    info!(blocked = blocked.len(), lines = lines.len(), "computed purchase skip set");

    for line in &lines {
        let Some(line_id) = node_id(line) else { continue };
        let order = &line["purchaseOrder"];
        let order_id = node_id(order);

        if order_id.as_ref().is_some_and(|id| blocked.contains(id)) {
            debug!(%line_id, "skipping line on blocked purchase order");
            summary.lines_skipped += 1;
            continue;
        }

        let result = async {
            if order["status"].as_str() == Some("ORDERED") {
                if let Some(ref order_id) = order_id {
                    set_status(client, order_id, PurchaseStatus::Draft).await?;
                }
            }
            let etag = super::fetch_etag(
                client,
                queries::GET_PURCHASE_LINE_ETAG,
                "purchaseOrderLine",
                &line_id,
            )
            .await?;
            debug!(%line_id, "deleting purchase order line");
            client
                .execute(
                    queries::DELETE_PURCHASE_LINE,
                    json!({"id": line_id.to_value(), "etag": etag.as_str()}),
                )
                .await?;
            Ok::<_, Error>(())
        }
        .await;

        match result {
            Ok(()) => summary.lines_deleted += 1,
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                error!(%line_id, %err, "failed to delete purchase line");
                summary.failures.push((line_id, err.to_string()));
            }
        }
    }

    let data = client.execute(queries::GET_PURCHASES, json!({})).await?;
    for order in connection_nodes(&data, "purchaseOrders") {
        let Some(order_id) = node_id(&order) else { continue };

        if blocked.contains(&order_id)
            || non_empty(&order["approvals"])
            || non_empty(&order["fees"])
            || non_empty(&order["approvalRequests"])
        {
            debug!(%order_id, "skipping purchase order");
            summary.orders_skipped += 1;
            continue;
        }

        let result = async {
            // The listing etag may be stale after the line sweep.
            let etag = super::fetch_etag(
                client,
                queries::GET_PURCHASE_ORDER_ETAG,
                "purchaseOrder",
                &order_id,
            )
            .await?;
            debug!(%order_id, "deleting purchase order");
            client
                .execute(
                    queries::DELETE_PURCHASE,
                    json!({"id": order_id.to_value(), "etag": etag.as_str()}),
                )
                .await?;
            Ok::<_, Error>(())
        }
        .await;

        match result {
            Ok(()) => summary.orders_deleted += 1,
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                error!(%order_id, %err, "failed to delete purchase order");
                summary.failures.push((order_id, err.to_string()));
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_round_trips() {
        assert_eq!("ordered".parse::<PurchaseStatus>().unwrap(), PurchaseStatus::Ordered);
        assert_eq!(PurchaseStatus::Received.as_str(), "RECEIVED");
        assert!("SHIPPED".parse::<PurchaseStatus>().is_err());
    }

    #[test]
    fn installed_material_blocks_order_deletion() {
        let line = json!({"partInventories": [
            {"installed": false, "kitted": false, "received": false, "abomChildren": []},
            {"installed": true, "kitted": false, "received": false, "abomChildren": []},
        ]});
        assert!(line_blocks_order_deletion(&line));
    }

    #[test]
    fn abom_children_block_order_deletion() {
        let line = json!({"partInventories": [
            {"installed": false, "kitted": false, "received": false,
             "abomChildren": [{"partInventoryId": 9}]},
        ]});
        assert!(line_blocks_order_deletion(&line));
    }

    #[test]
    fn clean_line_does_not_block() {
        let line = json!({"partInventories": [
            {"installed": false, "kitted": false, "received": false,
             "abomChildren": [{"partInventoryId": null}]},
        ]});
        assert!(!line_blocks_order_deletion(&line));
        assert!(!line_blocks_order_deletion(&json!({"partInventories": []})));
        assert!(!line_blocks_order_deletion(&json!({})));
    }
}
