//! Declarative validation-rule payloads.
//!
//! A rule definition is data, not behavior: the platform's rule engine
//! evaluates the `code` expression against the resolved `context` query
//! whenever the trigger event fires. This crate only carries and serializes
//! the definitions; it never evaluates them.

use serde::{Deserialize, Serialize};

/// Entity type a rule triggers on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleTarget {
    #[serde(rename = "PARTINVENTORY")]
    PartInventory,
    #[serde(rename = "PURCHASEORDERLINE")]
    PurchaseOrderLine,
    #[serde(rename = "ISSUE")]
    Issue,
    #[serde(rename = "RECEIPTITEM")]
    ReceiptItem,
    #[serde(rename = "PROCEDURE")]
    Procedure,
    #[serde(rename = "RUN")]
    Run,
}

/// Which mutation event fires the rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RuleEventType {
    Create,
    Update,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RuleType {
    Validation,
}

/// Platform policy when the rule's guard condition fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RuleErrorState {
    /// Let the operation through with a warning.
    Allow,
    /// Hard-block the triggering operation.
    Block,
}

/// One uploadable rule definition.
///
/// `context` is a query fragment the engine resolves at evaluation time;
/// `code` is a boolean-returning expression evaluated against that context.
/// Raising a validation failure inside `code` rejects the triggering
/// operation. Both strings are opaque here and transmitted verbatim.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDefinition {
    pub enabled: bool,
    pub title: String,
    pub target: RuleTarget,
    pub event_type: RuleEventType,
    pub rule_type: RuleType,
    pub error_state: RuleErrorState,
    pub context: String,
    pub code: String,
}

impl RuleDefinition {
    fn validation(
        title: &str,
        target: RuleTarget,
        event_type: RuleEventType,
        context: &str,
        code: &str,
    ) -> Self {
        Self {
            enabled: true,
            title: title.to_string(),
            target,
            event_type,
            rule_type: RuleType::Validation,
            error_state: RuleErrorState::Allow,
            context: context.to_string(),
            code: code.to_string(),
        }
    }
}

/// The built-in rule catalog.
///
/// All rules ship with `errorState: ALLOW` (warn-through); switch individual
/// definitions to `Block` before uploading where a hard stop is wanted.
pub fn builtin_rules() -> Vec<RuleDefinition> {
    vec![
        RuleDefinition::validation(
            "Part must be approved before creating inventory",
            RuleTarget::PartInventory,
            RuleEventType::Create,
            "{ partInventory(id: $id) { part { id attributes { key value } } } }",
            "if (not any([attr['value'] for attr in context.get('partInventory', {}).get('part', {}).get('attributes', [{}]) if attr['key'] == 'Approved'])): raise ValidationError()",
        ),
        RuleDefinition::validation(
            "Block inventory creation from run creation unless user has createPartInventory permission",
            RuleTarget::Run,
            RuleEventType::Create,
            "{run(id: $id) {partInventory {createdById}} me {id permissionGroups{name}}}",
            "if context.get('me').get('id') == context.get('run', {}).get('partInventory', {}).get('createdById') and 'CreatePartInventory' not in {perm['name'] for perm in context.get('me', {}).get('permissionGroups', {})}: raise ValidationError()",
        ),
        RuleDefinition::validation(
            "Cannot change issue status without disposition, cause condition, expected condition, and all custom attributes filled out.",
            RuleTarget::Issue,
            RuleEventType::Update,
            "{issue(id: $id){id status disposition expectedCondition causeCondition attributes{key value}}}",
            "if context.get('issue').get('status') != 'PENDING' and (not context.get('issue').get('disposition') or not context.get('issue').get('expectedCondition') or not context.get('issue').get('causeCondition') or not all('value' in a and a['value'] for a in context.get('issue').get('attributes'))): raise ValidationError()",
        ),
        RuleDefinition::validation(
            "Purchase line items must have a need date",
            RuleTarget::PurchaseOrderLine,
            RuleEventType::Update,
            "{ purchaseOrderLine(id: $id) { id needDate } }",
            "if context.get('changes', {}).get('purchaseOrderLines', {}).get('status', {}).get('new') == 'ordered' and context.get('purchaseOrderLine', {}).get('needDate') is None: raise ValidationError()",
        ),
        RuleDefinition::validation(
            "Add a Manager for purchases over $10,000",
            RuleTarget::PurchaseOrderLine,
            RuleEventType::Update,
            "{purchaseOrderLine(id: $id) { id description purchaseOrder { estimatedTotalCost approvalRequests { reviewer { name roles { name } } } approvals { reviewer { name roles { name } } } } } }",
            "if (context.get('changes', {}).get('purchaseOrderLines', {}).get('status', {}).get('new') == 'ordered' and context.get('purchaseOrderLine', {}).get('purchaseOrder', {}).get('estimatedTotalCost', 0) > 10000 and not any(role.get('name') == 'Manager' for approval in context.get('purchaseOrderLine', {}).get('purchaseOrder', {}).get('approvals', []) for role in approval.get('reviewer', {}).get('roles', []))): raise ValidationError()",
        ),
        RuleDefinition::validation(
            "Receipt line items must have a location",
            RuleTarget::ReceiptItem,
            RuleEventType::Create,
            "{ receiptItem(id: $id) { id partInventory{locationId} } }",
            "if context.get('receiptItem', {}).get('partInventory', {}).get('locationId') is None: raise ValidationError()",
        ),
        RuleDefinition::validation(
            "Receiving lot-tracked parts requires that a lot number is populated",
            RuleTarget::ReceiptItem,
            RuleEventType::Create,
            "{ receiptItem(id: $id) { id partInventory {serialNumber lotNumber part{id trackingType}} } }",
            "if not context.get('receiptItem', {}).get('partInventory', {}).get('lotNumber') and context.get('receiptItem', {}).get('partInventory', {}).get('part', {}).get('trackingType') == 'LOT': raise ValidationError()",
        ),
        RuleDefinition::validation(
            "Receiving serial-tracked parts requires that a serial number is populated",
            RuleTarget::ReceiptItem,
            RuleEventType::Create,
            "{ receiptItem(id: $id) { id partInventory {serialNumber lotNumber part{id trackingType}} } }",
            "if not context.get('receiptItem', {}).get('partInventory', {}).get('serialNumber') and context.get('receiptItem', {}).get('partInventory', {}).get('part', {}).get('trackingType') == 'SERIAL': raise ValidationError()",
        ),
        RuleDefinition::validation(
            "Check if Step has dependencies",
            RuleTarget::Procedure,
            RuleEventType::Update,
            "{ procedure(id: $id) { id steps{location{name} upstreamStepIds downstreamStepIds } } }",
            "if (context.get('changes', {}).get('procedures', {}).get('status', {}).get('new') == 'in_review' and any([step for step in context.get('procedure', {}).get('steps', []) if not (step.get('upstreamStepIds') or step.get('downstreamStepIds'))])): raise ValidationError()",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_in_platform_shape() {
        let rule = &builtin_rules()[0];
        let value = serde_json::to_value(rule).unwrap();
        assert_eq!(value["enabled"], json!(true));
        assert_eq!(value["target"], json!("PARTINVENTORY"));
        assert_eq!(value["eventType"], json!("CREATE"));
        assert_eq!(value["ruleType"], json!("VALIDATION"));
        assert_eq!(value["errorState"], json!("ALLOW"));
        assert!(value["context"].as_str().unwrap().starts_with('{'));
    }

    #[test]
    fn catalog_titles_are_unique() {
        let rules = builtin_rules();
        let mut titles: Vec<_> = rules.iter().map(|r| r.title.as_str()).collect();
        titles.sort_unstable();
        titles.dedup();
        assert_eq!(titles.len(), rules.len());
    }

    #[test]
    fn compound_target_names_have_no_separators() {
        let line = serde_json::to_value(RuleTarget::PurchaseOrderLine).unwrap();
        let receipt = serde_json::to_value(RuleTarget::ReceiptItem).unwrap();
        assert_eq!(line, json!("PURCHASEORDERLINE"));
        assert_eq!(receipt, json!("RECEIPTITEM"));
    }
}
