//! Rule upload.

use serde_json::json;
use tracing::{error, info};

use fabops_core::rules::RuleDefinition;
use fabops_core::Result;

use crate::client::GraphqlClient;
use crate::queries;

/// Outcome of uploading a set of rule definitions.
#[derive(Debug, Default)]
pub struct RuleUploadSummary {
    pub created: usize,
    pub failures: Vec<(String, String)>,
}

/// Create each rule on the platform, continuing past per-rule failures.
///
/// Duplicate titles are rejected server-side, so re-running an upload
/// records those rules as failures rather than duplicating them.
pub async fn upload_rules(
    client: &GraphqlClient,
    rules: &[RuleDefinition],
) -> Result<RuleUploadSummary> {
    let mut summary = RuleUploadSummary::default();
    for rule in rules {
        let variables = json!({"input": serde_json::to_value(rule)
            .map_err(|_| super::shape_error("rule definition failed to serialize"))?});
        match client.execute(queries::CREATE_RULE, variables).await {
            Ok(_) => {
                info!(title = %rule.title, "created rule");
                summary.created += 1;
            }
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                error!(title = %rule.title, %err, "failed to create rule");
                summary.failures.push((rule.title.clone(), err.to_string()));
            }
        }
    }
    Ok(summary)
}
