//! Part-inventory operations.

use std::collections::BTreeMap;

use serde_json::{Value, json};
use tracing::{debug, info};

use fabops_core::{EntityId, Etag, Result};

use crate::client::GraphqlClient;
use crate::lookup::connection_nodes;
use crate::queries;

/// Update one inventory's quantity: fetch the current etag, then mutate.
///
/// `quantity` is the already-normalized decimal string (see
/// `fabops_core::batch::field::normalize_decimal`). Returns the etag from
/// the successful mutation, which supersedes the fetched one.
pub async fn update_quantity(
    client: &GraphqlClient,
    inventory_id: &EntityId,
    quantity: &str,
) -> Result<Etag> {
    let etag = super::fetch_etag(client, queries::GET_PART_INVENTORY, "partInventory", inventory_id)
        .await?;
    debug!(%inventory_id, quantity, "updating inventory quantity");

    let variables = json!({"input": {
        "id": inventory_id.to_value(),
        "etag": etag.as_str(),
        "quantity": quantity,
    }});
    let data = client.execute(queries::UPDATE_PART_INVENTORY, variables).await?;
    data["updatePartInventory"]["partInventory"]["_etag"]
        .as_str()
        .map(Etag::new)
        .ok_or_else(|| super::shape_error("no _etag on updated inventory"))
}

/// One flattened as-built installation, parent inventory paired with the
/// installed child.
#[derive(Clone, Debug, Default)]
pub struct AbomExportRecord {
    pub parent_part_number: String,
    pub parent_part_description: String,
    pub serial_number: String,
    pub lot_number: String,
    pub child_part_number: String,
    pub child_part_description: String,
    pub child_serial_number: String,
    pub child_lot_number: String,
}

impl AbomExportRecord {
    pub const CSV_HEADER: [&'static str; 8] = [
        "parentPartNumber",
        "parentPartDescription",
        "serialNumber",
        "lotNumber",
        "childPartNumber",
        "childPartDescription",
        "childSerialNumber",
        "childLotNumber",
    ];

    pub fn csv_row(&self) -> [String; 8] {
        [
            self.parent_part_number.clone(),
            self.parent_part_description.clone(),
            self.serial_number.clone(),
            self.lot_number.clone(),
            self.child_part_number.clone(),
            self.child_part_description.clone(),
            self.child_serial_number.clone(),
            self.child_lot_number.clone(),
        ]
    }
}

fn text(value: &serde_json::Value) -> String {
    value.as_str().unwrap_or_default().to_string()
}

/// Walk the paginated inventory connection, 50 records per page, flattening
/// each inventory's as-built installations into export records.
pub async fn export_inventories_with_abom(
    client: &GraphqlClient,
) -> Result<Vec<AbomExportRecord>> {
    let mut records = Vec::new();
    let mut after: Option<String> = None;

    loop {
        let variables = json!({"after": after});
        let data = client.execute(queries::GET_INVENTORIES_WITH_ABOM, variables).await?;

        for node in connection_nodes(&data, "partInventories") {
            let parent_part = &node["part"];
            let requirements = node["buildRequirements"].as_array().cloned().unwrap_or_default();
            for requirement in &requirements {
                let installations = requirement["abomInstallations"]
                    .as_array()
                    .cloned()
                    .unwrap_or_default();
                for installation in &installations {
                    let child = &installation["partInventory"];
                    records.push(AbomExportRecord {
                        parent_part_number: text(&parent_part["partNumber"]),
                        parent_part_description: text(&parent_part["description"]),
                        serial_number: text(&node["serialNumber"]),
                        lot_number: text(&node["lotNumber"]),
                        child_part_number: text(&child["part"]["partNumber"]),
                        child_part_description: text(&child["part"]["description"]),
                        child_serial_number: text(&child["serialNumber"]),
                        child_lot_number: text(&child["lotNumber"]),
                    });
                }
            }
        }

        let page_info = &data["partInventories"]["pageInfo"];
        if page_info["hasNextPage"].as_bool().unwrap_or(false) {
            after = page_info["endCursor"].as_str().map(str::to_string);
            debug!(?after, "fetching next inventory page");
        } else {
            break;
        }
    }

    info!(records = records.len(), "inventory export assembled");
    Ok(records)
}

/// One part's summed on-hand quantity at a location. The floor count column
/// is left blank for the physical audit to fill in.
#[derive(Clone, Debug, PartialEq)]
pub struct LocationCountRecord {
    pub part_id: i64,
    pub part_number: String,
    pub quantity: f64,
}

impl LocationCountRecord {
    pub const CSV_HEADER: [&'static str; 4] = ["partId", "partNumber", "quantity", "floor_count"];

    pub fn csv_row(&self) -> [String; 4] {
        [
            self.part_id.to_string(),
            self.part_number.clone(),
            self.quantity.to_string(),
            String::new(),
        ]
    }
}

/// The platform serves quantities as decimal strings on some entities and
/// numbers on others.
fn quantity_of(node: &Value) -> f64 {
    match &node["quantity"] {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn sum_by_part(nodes: &[Value]) -> Vec<LocationCountRecord> {
    let mut totals: BTreeMap<(i64, String), f64> = BTreeMap::new();
    for node in nodes {
        let part_id = node["part"]["partId"].as_i64().unwrap_or_default();
        let part_number = node["part"]["partNumber"].as_str().unwrap_or_default();
        *totals.entry((part_id, part_number.to_string())).or_default() += quantity_of(node);
    }
    totals
        .into_iter()
        .map(|((part_id, part_number), quantity)| LocationCountRecord {
            part_id,
            part_number,
            quantity,
        })
        .collect()
}

/// Sum the uninstalled inventory at one location by part, for a physical
/// count sheet. Installed material is excluded; it is counted on the
/// assembly, not the shelf.
pub async fn count_at_location(
    client: &GraphqlClient,
    location_id: &EntityId,
) -> Result<Vec<LocationCountRecord>> {
    let variables = json!({"filters": {
        "locationId": {"eq": location_id.to_value()},
        "status": {"neq": "INSTALLED"},
    }});
    let data = client.execute(queries::GET_INVENTORIES_AT_LOCATION, variables).await?;
    let nodes = connection_nodes(&data, "partInventories");
    let records = sum_by_part(&nodes);
    info!(%location_id, parts = records.len(), "location count assembled");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn location_count_sums_split_lots_per_part() {
        let nodes = [
            json!({"quantity": "3", "part": {"partId": 5, "partNumber": "BRKT-01"}}),
            json!({"quantity": 2, "part": {"partId": 5, "partNumber": "BRKT-01"}}),
            json!({"quantity": "1.5", "part": {"partId": 9, "partNumber": "SHIM-02"}}),
        ];
        let records = sum_by_part(&nodes);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].part_number, "BRKT-01");
        assert_eq!(records[0].quantity, 5.0);
        assert_eq!(records[1].quantity, 1.5);
    }

    #[test]
    fn count_rows_leave_the_floor_count_blank() {
        let record = LocationCountRecord {
            part_id: 5,
            part_number: "BRKT-01".to_string(),
            quantity: 5.0,
        };
        assert_eq!(record.csv_row(), ["5", "BRKT-01", "5", ""]);
    }
}
