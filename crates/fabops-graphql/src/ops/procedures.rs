//! Cross-environment procedure export.
//!
//! Copies a procedure out of one environment into another: the container
//! first, then labels onto the new family, then the step tree with fields,
//! datagrids, dependency edges, and embedded file attachments. Server-side
//! identifiers never survive the crossing; every old id is mapped to the id
//! the target hands back.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

use fabops_core::{EntityId, Etag, Result};

use crate::client::GraphqlClient;
use crate::lookup::{connection_nodes, find_or_create_label};
use crate::ops::attachments::copy_attachment;
use crate::queries;

/// A procedure as read back from the platform.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Procedure {
    pub id: EntityId,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub family_id: Option<EntityId>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One step of a procedure tree. The platform nests children at most one
/// level deep, so the tree bottoms out at `steps[].steps[]`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub id: EntityId,
    pub entity_id: Option<EntityId>,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub slate_content: Value,
    pub lead_time: Option<Value>,
    pub location_id: Option<EntityId>,
    pub location_subtype_id: Option<EntityId>,
    pub is_derived_step: Option<bool>,
    pub origin_step_id: Option<EntityId>,
    #[serde(default)]
    pub upstream_step_ids: Vec<EntityId>,
    #[serde(default)]
    pub fields: Vec<Value>,
    #[serde(default)]
    pub datagrid_columns: Value,
    #[serde(default)]
    pub datagrid_rows: Value,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Step {
    fn is_derived(&self) -> bool {
        self.is_derived_step.unwrap_or(false)
    }
}

/// Identifiers of one freshly created target-side step.
#[derive(Clone, Debug)]
struct CreatedStep {
    id: EntityId,
    entity_id: Option<EntityId>,
    etag: Etag,
}

/// End-of-export accounting.
#[derive(Debug, Default)]
pub struct ExportReport {
    pub procedure_id: Option<EntityId>,
    pub steps_created: usize,
    pub labels_attached: usize,
    pub attachments_copied: usize,
    pub edges_created: usize,
}

/// Walk a slate-content tree and collect every attachment id carried in a
/// `reference` key, depth-first.
fn collect_reference_ids(content: &Value) -> Vec<EntityId> {
    let mut found = Vec::new();
    collect_into(content, &mut found);
    found
}

fn collect_into(value: &Value, found: &mut Vec<EntityId>) {
    match value {
        Value::Object(map) => {
            if let Some(reference) = map.get("reference") {
                if let Ok(id) = serde_json::from_value::<EntityId>(reference.clone()) {
                    found.push(id);
                }
            }
            for child in map.values() {
                collect_into(child, found);
            }
        }
        Value::Array(items) => {
            for child in items {
                collect_into(child, found);
            }
        }
        _ => {}
    }
}

/// Rewrite every `reference` key in a slate-content tree through an
/// old-to-new attachment id map. References with no mapping are left alone.
fn replace_references(value: &mut Value, map: &HashMap<EntityId, EntityId>) {
    match value {
        Value::Object(object) => {
            if let Some(reference) = object.get("reference") {
                if let Ok(old) = serde_json::from_value::<EntityId>(reference.clone()) {
                    if let Some(new) = map.get(&old) {
                        object.insert("reference".to_string(), new.to_value());
                    }
                }
            }
            for child in object.values_mut() {
                replace_references(child, map);
            }
        }
        Value::Array(items) => {
            for child in items {
                replace_references(child, map);
            }
        }
        _ => {}
    }
}

/// Export one procedure from the source environment into the target.
pub async fn export_procedure(
    source: &GraphqlClient,
    target: &GraphqlClient,
    procedure_id: &EntityId,
    new_title: Option<&str>,
) -> Result<ExportReport> {
    let data = source
        .execute(queries::GET_PROCEDURE, json!({"id": procedure_id.to_value()}))
        .await?;
    let procedure: Procedure = serde_json::from_value(data["procedure"].clone())
        .map_err(|_| super::shape_error("procedure response has an unexpected shape"))?;
    info!(
        %procedure_id,
        title = %procedure.title,
        steps = procedure.steps.len(),
        "exporting procedure"
    );

    let mut report = ExportReport::default();

    // Container first.
    let variables = json!({
        "title": new_title.unwrap_or(&procedure.title),
        "description": procedure.description,
        "type": procedure.kind,
    });
    let data = target.execute(queries::CREATE_PROCEDURE, variables).await?;
    let created = &data["createProcedure"]["procedure"];
    let new_procedure_id: EntityId = serde_json::from_value(created["id"].clone())
        .map_err(|_| super::shape_error("createProcedure response is missing the id"))?;
    let family_id: Option<EntityId> = serde_json::from_value(created["familyId"].clone()).ok();
    info!(%new_procedure_id, "created procedure container");

    // Labels attach to the family, not the procedure row.
    if let Some(family_id) = &family_id {
        for value in &procedure.labels {
            let label = find_or_create_label(target, value).await?;
            let variables = json!({"input": {
                "labelId": label.id.to_value(),
                "familyId": family_id.to_value(),
            }});
            target
                .execute(queries::ADD_LABEL_TO_PROCEDURE_FAMILY, variables)
                .await?;
            report.labels_attached += 1;
        }
    } else if !procedure.labels.is_empty() {
        warn!("new procedure has no familyId, skipping label attachment");
    }

    // Step tree, collecting the old-to-new id map and the dependency pairs
    // expressed against old ids. Every (step, upstream) pair is kept; edges
    // are created once, after the whole tree exists.
    let mut step_map: HashMap<EntityId, EntityId> = HashMap::new();
    let mut dependencies: Vec<(EntityId, EntityId)> = Vec::new();

    for step in &procedure.steps {
        for upstream in &step.upstream_step_ids {
            dependencies.push((step.id.clone(), upstream.clone()));
        }
        if step.is_derived() {
            let new_id = copy_derived_step(source, target, step, &new_procedure_id, &mut report)
                .await?;
            step_map.insert(step.id.clone(), new_id);
        } else {
            create_step_tree(
                source,
                target,
                step,
                Some(&new_procedure_id),
                &mut step_map,
                &mut report,
            )
            .await?;
        }
    }

    for (old_step, old_upstream) in &dependencies {
        match (step_map.get(old_step), step_map.get(old_upstream)) {
            (Some(step_id), Some(upstream_id)) => {
                let variables = json!({
                    "stepId": step_id.to_value(),
                    "upstreamStepId": upstream_id.to_value(),
                });
                target.execute(queries::CREATE_STEP_EDGE, variables).await?;
                report.edges_created += 1;
            }
            _ => {
                warn!(%old_step, %old_upstream, "dependency references an uncopied step");
            }
        }
    }

    report.procedure_id = Some(new_procedure_id);
    info!(
        steps = report.steps_created,
        edges = report.edges_created,
        attachments = report.attachments_copied,
        "procedure export complete"
    );
    Ok(report)
}

/// Derived steps point back at a standard step. Reuse a standard step of
/// the same title when the target already has one, otherwise recreate it
/// from the source's origin step, then copy it into the new procedure.
async fn copy_derived_step(
    source: &GraphqlClient,
    target: &GraphqlClient,
    step: &Step,
    procedure_id: &EntityId,
    report: &mut ExportReport,
) -> Result<EntityId> {
    let standard_id = match existing_standard_step(target, step.title.as_deref()).await? {
        Some(id) => id,
        None => {
            let origin = step.origin_step_id.as_ref().ok_or_else(|| {
                super::shape_error("derived step carries no originStepId")
            })?;
            let data = source
                .execute(queries::GET_STEP, json!({"id": origin.to_value()}))
                .await?;
            let standard: Step = serde_json::from_value(data["step"].clone())
                .map_err(|_| super::shape_error("step response has an unexpected shape"))?;
            let mut map = HashMap::new();
            create_step_tree(source, target, &standard, None, &mut map, report).await?;
            map.get(&standard.id)
                .cloned()
                .ok_or_else(|| super::shape_error("standard step was not recorded"))?
        }
    };

    debug!(%standard_id, %procedure_id, "copying standard step into procedure");
    let variables = json!({"input": {
        "procedureId": procedure_id.to_value(),
        "stepId": standard_id.to_value(),
    }});
    let data = target.execute(queries::COPY_STEP, variables).await?;
    report.steps_created += 1;
    serde_json::from_value(data["copyStep"]["step"]["id"].clone())
        .map_err(|_| super::shape_error("copyStep response is missing the step id"))
}

async fn existing_standard_step(
    target: &GraphqlClient,
    title: Option<&str>,
) -> Result<Option<EntityId>> {
    let Some(title) = title else { return Ok(None) };
    let variables = json!({"filters": {"title": {"eq": title}}});
    let data = target.execute(queries::GET_STEPS_BY_TITLE, variables).await?;
    let nodes = connection_nodes(&data, "steps");
    Ok(nodes
        .iter()
        .find(|node| node["isStandardStep"].as_bool().unwrap_or(false))
        .and_then(|node| serde_json::from_value(node["id"].clone()).ok()))
}

/// Create one step and its direct children. With `procedure_id` absent the
/// step is created as a standard step outside any procedure.
async fn create_step_tree(
    source: &GraphqlClient,
    target: &GraphqlClient,
    step: &Step,
    procedure_id: Option<&EntityId>,
    step_map: &mut HashMap<EntityId, EntityId>,
    report: &mut ExportReport,
) -> Result<()> {
    let root = create_single_step(source, target, step, procedure_id, None, report).await?;
    step_map.insert(step.id.clone(), root.id.clone());

    for child in &step.steps {
        let created =
            create_single_step(source, target, child, procedure_id, Some(&root.id), report)
                .await?;
        step_map.insert(child.id.clone(), created.id);
    }
    Ok(())
}

async fn create_single_step(
    source: &GraphqlClient,
    target: &GraphqlClient,
    step: &Step,
    procedure_id: Option<&EntityId>,
    parent_id: Option<&EntityId>,
    report: &mut ExportReport,
) -> Result<CreatedStep> {
    let mut input = Map::new();
    input.insert("title".to_string(), json!(step.title));
    input.insert("type".to_string(), json!(step.kind));
    input.insert("slateContent".to_string(), step.slate_content.clone());
    input.insert("leadTime".to_string(), json!(step.lead_time));
    if let Some(location_id) = &step.location_id {
        input.insert("locationId".to_string(), location_id.to_value());
    }
    if let Some(subtype_id) = &step.location_subtype_id {
        input.insert("locationSubtypeId".to_string(), subtype_id.to_value());
    }
    if let Some(procedure_id) = procedure_id {
        input.insert("procedureId".to_string(), procedure_id.to_value());
    }
    if let Some(parent_id) = parent_id {
        input.insert("parentId".to_string(), parent_id.to_value());
    }

    let data = target
        .execute(queries::CREATE_STEP, json!({"input": Value::Object(input)}))
        .await?;
    let node = &data["createStep"]["step"];
    let created = CreatedStep {
        id: serde_json::from_value(node["id"].clone())
            .map_err(|_| super::shape_error("createStep response is missing the step id"))?,
        entity_id: serde_json::from_value(node["entityId"].clone()).ok(),
        etag: serde_json::from_value(node["_etag"].clone())
            .map_err(|_| super::shape_error("createStep response is missing the _etag"))?,
    };
    debug!(old = %step.id, new = %created.id, "created step");
    report.steps_created += 1;

    relink_slate_content(source, target, step, &created, report).await?;

    for field in &step.fields {
        let input = step_field_input(field, &created.id);
        target
            .execute(queries::CREATE_STEP_FIELD, json!({"input": input}))
            .await?;
    }

    if step.kind.as_deref() == Some("DATAGRID") {
        copy_datagrid(target, step, &created.id).await?;
    }
    Ok(created)
}

/// Move the attachments a step's rich-text content references across
/// environments and point the content at the new ids.
async fn relink_slate_content(
    source: &GraphqlClient,
    target: &GraphqlClient,
    step: &Step,
    created: &CreatedStep,
    report: &mut ExportReport,
) -> Result<()> {
    let references = collect_reference_ids(&step.slate_content);
    if references.is_empty() {
        return Ok(());
    }
    let Some(entity_id) = &created.entity_id else {
        warn!(step = %created.id, "step has no entityId, leaving attachments behind");
        return Ok(());
    };

    let mut attachment_map = HashMap::new();
    for old_id in references {
        if attachment_map.contains_key(&old_id) {
            continue;
        }
        let new_id = copy_attachment(source, target, &old_id, entity_id).await?;
        attachment_map.insert(old_id, new_id);
        report.attachments_copied += 1;
    }

    let mut content = step.slate_content.clone();
    replace_references(&mut content, &attachment_map);

    let variables = json!({"input": {
        "id": created.id.to_value(),
        "etag": created.etag.as_str(),
        "slateContent": content,
    }});
    target.execute(queries::UPDATE_STEP, variables).await?;
    Ok(())
}

/// Strip the server-assigned parts of a field before recreating it.
fn step_field_input(field: &Value, step_id: &EntityId) -> Value {
    let mut input = Map::new();
    if let Some(object) = field.as_object() {
        for (key, value) in object {
            if key == "id" || key == "validations" || value.is_null() {
                continue;
            }
            input.insert(key.clone(), value.clone());
        }
    }
    input.insert("stepId".to_string(), step_id.to_value());
    Value::Object(input)
}

/// Rebuild a step's datagrid: columns first (keeping an old-to-new column
/// id map), then rows, then each cell value against the new ids.
async fn copy_datagrid(target: &GraphqlClient, step: &Step, step_id: &EntityId) -> Result<()> {
    let mut column_map: HashMap<EntityId, EntityId> = HashMap::new();

    for column in embedded_nodes(&step.datagrid_columns) {
        let Some(old_id) = id_of(&column) else { continue };
        let mut input = strip_keys(&column, &["id"]);
        input.insert("stepId".to_string(), step_id.to_value());
        let data = target
            .execute(
                queries::CREATE_DATAGRID_COLUMN,
                json!({"input": Value::Object(input)}),
            )
            .await?;
        let new_id = id_of(&data["createDatagridColumn"]["datagridColumn"])
            .ok_or_else(|| super::shape_error("createDatagridColumn is missing the id"))?;
        column_map.insert(old_id, new_id);
    }

    for row in embedded_nodes(&step.datagrid_rows) {
        let mut input = strip_keys(&row, &["id", "values"]);
        input.insert("stepId".to_string(), step_id.to_value());
        let data = target
            .execute(
                queries::CREATE_DATAGRID_ROW,
                json!({"input": Value::Object(input)}),
            )
            .await?;
        let new_row_id = id_of(&data["createDatagridRow"]["datagridRow"])
            .ok_or_else(|| super::shape_error("createDatagridRow is missing the id"))?;

        let Some(values) = row["values"].as_array() else { continue };
        for value in values {
            let Some(old_column) = serde_json::from_value::<EntityId>(value["columnId"].clone())
                .ok()
            else {
                continue;
            };
            let Some(new_column) = column_map.get(&old_column) else {
                warn!(%old_column, "datagrid value references an uncopied column");
                continue;
            };
            let variables = json!({"input": {
                "rowId": new_row_id.to_value(),
                "columnId": new_column.to_value(),
                "value": value["value"],
            }});
            target.execute(queries::SET_DATAGRID_VALUE, variables).await?;
        }
    }
    Ok(())
}

/// Unwrap a connection value that is already the `{edges: [..]}` object.
fn embedded_nodes(connection: &Value) -> Vec<Value> {
    connection["edges"]
        .as_array()
        .map(|edges| edges.iter().map(|edge| edge["node"].clone()).collect())
        .unwrap_or_default()
}

fn id_of(node: &Value) -> Option<EntityId> {
    serde_json::from_value(node["id"].clone()).ok()
}

fn strip_keys(node: &Value, drop: &[&str]) -> Map<String, Value> {
    node.as_object()
        .map(|object| {
            object
                .iter()
                .filter(|(key, value)| !drop.contains(&key.as_str()) && !value.is_null())
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn slate_with_attachment(reference: i64) -> Value {
        json!([
            {"type": "paragraph", "children": [{"text": "torque to 4 Nm"}]},
            {"type": "image", "reference": reference, "children": [{"text": ""}]},
        ])
    }

    #[test]
    fn collects_references_from_nested_content() {
        let content = json!([
            {"type": "paragraph", "children": [
                {"type": "file", "reference": 17, "children": []},
            ]},
            {"type": "image", "reference": "att-9"},
        ]);
        let ids = collect_reference_ids(&content);
        assert_eq!(ids, vec![EntityId::Int(17), EntityId::from("att-9")]);
    }

    #[test]
    fn replaces_only_mapped_references() {
        let mut content = slate_with_attachment(17);
        let mut map = HashMap::new();
        map.insert(EntityId::Int(17), EntityId::Int(451));
        replace_references(&mut content, &map);
        assert_eq!(content[1]["reference"], json!(451));

        let mut untouched = slate_with_attachment(99);
        replace_references(&mut untouched, &map);
        assert_eq!(untouched[1]["reference"], json!(99));
    }

    #[test]
    fn reference_text_in_prose_is_not_collected() {
        let content = json!([
            {"type": "paragraph", "children": [{"text": "see reference: 12, above"}]},
        ]);
        assert!(collect_reference_ids(&content).is_empty());
    }

    #[test]
    fn field_input_strips_server_side_parts() {
        let field = json!({
            "id": 4, "name": "torque", "type": "NUMBER", "unit": "Nm",
            "required": true, "options": null,
            "validations": [{"functionId": 1, "fieldId": 4}],
        });
        let input = step_field_input(&field, &EntityId::Int(88));
        let object = input.as_object().unwrap();
        assert!(!object.contains_key("id"));
        assert!(!object.contains_key("validations"));
        assert!(!object.contains_key("options"));
        assert_eq!(object["stepId"], json!(88));
        assert_eq!(object["unit"], json!("Nm"));
    }

    #[test]
    fn procedure_deserializes_from_platform_shape() {
        let data = json!({
            "id": 12, "title": "Wing assembly", "description": null,
            "type": "STANDARD", "familyId": 3, "labels": ["rev-b"],
            "steps": [{
                "id": 100, "entityId": 5000, "title": "Prep", "type": "STANDARD",
                "slateContent": [], "leadTime": null, "locationId": null,
                "locationSubtypeId": null, "parentId": null, "position": 0,
                "isDerivedStep": false, "originStepId": null,
                "upstreamStepIds": [], "fields": [],
                "datagridColumns": {"edges": []}, "datagridRows": {"edges": []},
                "steps": []
            }]
        });
        let procedure: Procedure = serde_json::from_value(data).unwrap();
        assert_eq!(procedure.steps.len(), 1);
        assert!(!procedure.steps[0].is_derived());
        assert_eq!(procedure.labels, vec!["rev-b".to_string()]);
    }
}
