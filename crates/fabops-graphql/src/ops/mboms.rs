//! Manufacturing bill-of-materials operations.

use serde_json::{Value, json};
use tracing::debug;

use fabops_core::{EntityId, Result};

use crate::client::GraphqlClient;
use crate::queries;

/// Which tree notation an mBOM import CSV uses for its first column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MbomNotation {
    /// Integer nesting depth per row.
    Depth,
    /// Dotted level strings such as `1.2.1`.
    Level,
}

impl MbomNotation {
    pub fn importer_type(self) -> &'static str {
        match self {
            MbomNotation::Depth => "DEPTH",
            MbomNotation::Level => "LEVEL",
        }
    }

    fn inputs_key(self) -> &'static str {
        match self {
            MbomNotation::Depth => "depthInputs",
            MbomNotation::Level => "levelInputs",
        }
    }
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MbomRowError {
    pub row_id: i64,
    pub error_msg: String,
}

/// Outcome of one bulk mBOM import call; row errors come back from the
/// platform labelled with the offending row id.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MbomImportOutcome {
    #[serde(default)]
    pub new_mbom_row_ids: Vec<i64>,
    #[serde(default)]
    pub error_messages: Vec<MbomRowError>,
}

#[derive(Debug, serde::Deserialize)]
struct MbomImportData {
    #[serde(rename = "createOrUpdateMultipleMboms")]
    result: MbomImportOutcome,
}

/// Upload a whole mBOM import in one mutation. `items` are the per-row input
/// objects already shaped for the chosen notation.
pub async fn import_mboms(
    client: &GraphqlClient,
    notation: MbomNotation,
    items: Vec<Value>,
) -> Result<MbomImportOutcome> {
    debug!(rows = items.len(), notation = notation.importer_type(), "importing mboms");
    let variables = json!({"input": {
        "importerType": notation.importer_type(),
        notation.inputs_key(): items,
    }});
    let data: MbomImportData = client
        .execute_as(queries::CREATE_OR_UPDATE_MBOMS, variables)
        .await?;
    Ok(data.result)
}

/// Add one reference designator to an existing mBOM item.
pub async fn add_reference_designator(
    client: &GraphqlClient,
    mbom_item_id: &EntityId,
    value: &str,
) -> Result<()> {
    let variables = json!({"input": {
        "mbomItemId": mbom_item_id.to_value(),
        "value": value,
    }});
    client
        .execute(queries::CREATE_MBOM_ITEM_REFERENCE_DESIGNATOR, variables)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notation_keys() {
        assert_eq!(MbomNotation::Depth.importer_type(), "DEPTH");
        assert_eq!(MbomNotation::Level.inputs_key(), "levelInputs");
    }

    #[test]
    fn outcome_parses_error_messages() {
        let data = serde_json::json!({
            "newMbomRowIds": [11, 12],
            "errorMessages": [{"rowId": 3, "errorMsg": "unknown part"}]
        });
        let outcome: MbomImportOutcome = serde_json::from_value(data).unwrap();
        assert_eq!(outcome.new_mbom_row_ids, vec![11, 12]);
        assert_eq!(outcome.error_messages[0].row_id, 3);
    }
}
