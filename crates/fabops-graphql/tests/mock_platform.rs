//! Mock platform tests for the fabops-graphql library.
//!
//! These tests use wiremock to simulate the manufacturing platform's token
//! endpoint and GraphQL endpoint, so the client's behavior can be exercised
//! without network access or real credentials.

use fabops_core::{ApiUrl, AuthStyle, Config, Credentials, EntityId, Error, RowOutcome};
use fabops_graphql::ops::{inventory, issues, labels, purchases, runs};
use fabops_graphql::{GraphqlClient, find_or_create_label, find_or_create_role, queries, run_batch};
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer) -> Config {
    let base = format!("http://{}", server.address());
    Config {
        api_url: ApiUrl::new(&base).unwrap(),
        auth_server: base.clone(),
        auth_style: AuthStyle::Keycloak,
        audience: base,
    }
}

/// Mount a happy-path token endpoint and authenticate against it.
async fn authenticated_client(server: &MockServer) -> GraphqlClient {
    Mock::given(method("POST"))
        .and(path("/realms/api-keys/protocol/openid-connect/token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access_token": "test-token"})),
        )
        .mount(server)
        .await;

    GraphqlClient::authenticate(&test_config(server), &Credentials::new("client-a", "s3cret"))
        .await
        .unwrap()
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn bearer_token_is_attached_verbatim() {
    let server = MockServer::start().await;
    let client = authenticated_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"teams": {"edges": []}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    client.execute(queries::GET_TEAMS, json!({})).await.unwrap();
}

#[tokio::test]
async fn rejected_grant_is_an_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/realms/api-keys/protocol/openid-connect/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client"
        })))
        .mount(&server)
        .await;

    let result =
        GraphqlClient::authenticate(&test_config(&server), &Credentials::new("bad", "creds")).await;
    match result {
        Err(Error::Auth(_)) => {}
        other => panic!("expected auth error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn token_body_without_access_token_is_an_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/realms/api-keys/protocol/openid-connect/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"expires_in": 3600})))
        .mount(&server)
        .await;

    let result =
        GraphqlClient::authenticate(&test_config(&server), &Credentials::new("client-a", "s"))
            .await;
    assert!(matches!(result, Err(Error::Auth(_))));
}

// ============================================================================
// GraphQL envelope
// ============================================================================

#[tokio::test]
async fn graphql_errors_array_is_an_api_error() {
    let server = MockServer::start().await;
    let client = authenticated_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{"message": "Team not found", "path": ["teams"]}]
        })))
        .mount(&server)
        .await;

    let result = client.execute(queries::GET_TEAMS, json!({})).await;
    match result {
        Err(Error::Api(api)) => assert!(api.to_string().contains("Team not found")),
        other => panic!("expected api error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn missing_data_is_an_api_error() {
    let server = MockServer::start().await;
    let client = authenticated_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
        .mount(&server)
        .await;

    assert!(matches!(
        client.execute(queries::GET_TEAMS, json!({})).await,
        Err(Error::Api(_))
    ));
}

#[tokio::test]
async fn non_2xx_is_a_transport_error() {
    let server = MockServer::start().await;
    let client = authenticated_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let result = client.execute(queries::GET_TEAMS, json!({})).await;
    match result {
        Err(Error::Transport(_)) => {}
        other => panic!("expected transport error, got {:?}", other.map(|_| ())),
    }
}

// ============================================================================
// Etag discipline
// ============================================================================

#[tokio::test]
async fn update_fetches_fresh_etag_and_stale_etag_is_rejected() {
    let server = MockServer::start().await;
    let client = authenticated_client(&server).await;

    // The entity starts at etag v1; a successful update rotates it to v2.
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("query PartInventory"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"partInventory": {"id": 7, "_etag": "v1", "quantity": "3"}}
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("UpdatePartInventory"))
        .and(body_partial_json(json!({"variables": {"input": {"etag": "v1"}}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"updatePartInventory": {"partInventory": {"id": 7, "_etag": "v2", "quantity": "5"}}}
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    // Any later mutation still carrying v1 hits the conflict response.
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("UpdatePartInventory"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{"message": "etag mismatch"}]
        })))
        .mount(&server)
        .await;

    let id = EntityId::Int(7);
    let new_etag = inventory::update_quantity(&client, &id, "5").await.unwrap();
    assert_eq!(new_etag.as_str(), "v2");

    // Replaying the mutation with the stale token is rejected.
    let stale = client
        .execute(
            queries::UPDATE_PART_INVENTORY,
            json!({"input": {"id": 7, "etag": "v1", "quantity": "5"}}),
        )
        .await;
    match stale {
        Err(Error::Api(api)) => assert!(api.to_string().contains("etag mismatch")),
        other => panic!("expected conflict, got {:?}", other.map(|_| ())),
    }
}

// ============================================================================
// Batch driver
// ============================================================================

#[tokio::test]
async fn batch_isolates_a_failing_row() {
    let server = MockServer::start().await;
    let client = authenticated_client(&server).await;

    // Inventory 3 does not exist; every other id reads and updates cleanly.
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("query PartInventory"))
        .and(body_partial_json(json!({"variables": {"id": 3}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{"message": "partInventory 3 not found"}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("query PartInventory"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"partInventory": {"id": 1, "_etag": "v1", "quantity": "1"}}
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("UpdatePartInventory"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"updatePartInventory": {"partInventory": {"id": 1, "_etag": "v2", "quantity": "9"}}}
        })))
        .mount(&server)
        .await;

    let rows: Vec<i64> = vec![1, 2, 3, 4, 5];
    let report = run_batch(rows, |_row_number, id| {
        let client = client.clone();
        async move {
            inventory::update_quantity(&client, &EntityId::Int(id), "9").await?;
            Ok(RowOutcome::Applied)
        }
    })
    .await
    .unwrap();

    assert_eq!(report.applied(), 4);
    assert_eq!(report.failures().len(), 1);
    assert_eq!(report.failures()[0].row, 3);
    assert!(report.failures()[0].reason.contains("not found"));
}

// ============================================================================
// Find-or-create
// ============================================================================

#[tokio::test]
async fn find_or_create_label_returns_existing_label() {
    let server = MockServer::start().await;
    let client = authenticated_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("GetLabels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"labels": {"edges": [
                {"node": {"id": 21, "_etag": "v1", "value": "rev-b"}}
            ]}}
        })))
        .mount(&server)
        .await;

    // No CreateLabel mock is mounted; hitting it would fail the test.
    let label = find_or_create_label(&client, "rev-b").await.unwrap();
    assert_eq!(label.id, EntityId::Int(21));
    assert_eq!(label.value, "rev-b");
}

#[tokio::test]
async fn find_or_create_label_creates_when_absent() {
    let server = MockServer::start().await;
    let client = authenticated_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("GetLabels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"labels": {"edges": []}}
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("CreateLabel"))
        .and(body_partial_json(json!({"variables": {"input": {"value": "rev-c"}}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"createLabel": {"label": {"id": 22, "value": "rev-c", "_etag": "v1"}}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let label = find_or_create_label(&client, "rev-c").await.unwrap();
    assert_eq!(label.id, EntityId::Int(22));
}

#[tokio::test]
async fn find_or_create_role_returns_existing_role() {
    let server = MockServer::start().await;
    let client = authenticated_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("GetRoles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"roles": {"edges": [
                {"node": {"id": 4, "name": "Quality"}}
            ]}}
        })))
        .mount(&server)
        .await;

    // No CreateRole mock is mounted; hitting it would fail the test.
    let role_id = find_or_create_role(&client, "Quality").await.unwrap();
    assert_eq!(role_id, EntityId::Int(4));
}

#[tokio::test]
async fn find_or_create_role_creates_when_absent() {
    let server = MockServer::start().await;
    let client = authenticated_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("GetRoles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"roles": {"edges": []}}
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("CreateRole"))
        .and(body_partial_json(json!({"variables": {"input": {"name": "Supplier QA"}}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"createRole": {"role": {"id": 5, "name": "Supplier QA"}}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let role_id = find_or_create_role(&client, "Supplier QA").await.unwrap();
    assert_eq!(role_id, EntityId::Int(5));
}

// ============================================================================
// Issue attributes
// ============================================================================

#[tokio::test]
async fn issue_attribute_update_carries_the_attribute_etag() {
    let server = MockServer::start().await;
    let client = authenticated_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("GetIssues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"issues": {"edges": [
                {"node": {"id": 9, "attributes": [
                    {"key": "severity", "_etag": "s1", "value": "minor"},
                    {"key": "disposition", "_etag": "a1", "value": "hold"}
                ]}}
            ]}}
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("UpdateIssueAttribute"))
        .and(body_partial_json(json!({"variables": {"input": {
            "issueId": 9, "etag": "a1", "key": "disposition", "value": "scrap"
        }}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"updateIssueAttribute": {"issueAttribute": {
                "_etag": "a2", "key": "disposition", "value": "scrap"
            }}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    issues::update_issue_attribute(&client, &EntityId::Int(9), "disposition", "scrap")
        .await
        .unwrap();
}

// ============================================================================
// Run labels and attachments
// ============================================================================

#[tokio::test]
async fn relabel_with_identical_values_keeps_the_label() {
    let server = MockServer::start().await;
    let client = authenticated_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("query GetRun"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"run": {"id": 12, "entityId": 120, "_etag": "r1",
                             "labels": [{"id": 21, "value": "rev-b"}]}}
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("GetLabels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"labels": {"edges": [
                {"node": {"id": 21, "value": "rev-b"}}
            ]}}
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("AddLabelToItem"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"addLabelToItem": {"labelId": 21, "entityId": 120}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    // No RemoveLabelFromItem mock is mounted; a detach would 404 and fail.
    let had_old = labels::relabel_run(&client, &EntityId::Int(12), "rev-b", "rev-b")
        .await
        .unwrap();
    assert!(had_old);
}

#[tokio::test]
async fn attach_file_uploads_to_the_lowest_position_step() {
    let server = MockServer::start().await;
    let client = authenticated_client(&server).await;

    // Steps are served out of order; position decides the first one.
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("query RunSteps"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"run": {"id": 31, "steps": [
                {"id": 2, "position": 2, "entityId": 302},
                {"id": 1, "position": 1, "entityId": 301}
            ]}}
        })))
        .mount(&server)
        .await;

    let upload_url = format!("http://{}/upload/travel-card", server.address());
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("CreateFileAttachment"))
        .and(body_partial_json(json!({"variables": {"input": {
            "entityId": 301, "filename": "travel-card.pdf"
        }}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"createFileAttachment": {
                "fileAttachment": {"id": 77, "entityId": 301,
                                   "filename": "travel-card.pdf",
                                   "contentType": "application/pdf"},
                "uploadUrl": upload_url
            }}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/upload/travel-card"))
        .and(header("content-type", "application/pdf"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let attachment_id =
        runs::attach_file_to_run(&client, &EntityId::Int(31), "travel-card.pdf", b"%PDF".to_vec())
            .await
            .unwrap();
    assert_eq!(attachment_id, EntityId::Int(77));
}

// ============================================================================
// Purchase deletion skip logic
// ============================================================================

#[tokio::test]
async fn purchase_delete_skips_protected_orders() {
    let server = MockServer::start().await;
    let client = authenticated_client(&server).await;

    // Line 100 sits on order 10 with installed material; line 200 on order 20
    // is clean. Order 30 has an approval and no lines.
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("PurchaseOrderLines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"purchaseOrderLines": {"edges": [
                {"node": {
                    "id": 100, "_etag": "l1",
                    "purchaseOrder": {"id": 10, "_etag": "o1", "status": "DRAFT"},
                    "partInventories": [{"installed": true, "kitted": false,
                                         "received": false, "abomChildren": []}]
                }},
                {"node": {
                    "id": 200, "_etag": "l2",
                    "purchaseOrder": {"id": 20, "_etag": "o2", "status": "DRAFT"},
                    "partInventories": [{"installed": false, "kitted": false,
                                         "received": false, "abomChildren": []}]
                }}
            ]}}
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("query PurchaseOrderLine("))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"purchaseOrderLine": {"id": 200, "_etag": "l2"}}
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("DeletePurchaseOrderLine"))
        .and(body_partial_json(json!({"variables": {"id": 200}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"deletePurchaseOrderLine": {"id": 200}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("query PurchaseOrders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"purchaseOrders": {"edges": [
                {"node": {"id": 10, "_etag": "o1", "status": "DRAFT",
                          "approvals": [], "approvalRequests": [], "fees": []}},
                {"node": {"id": 20, "_etag": "o2", "status": "DRAFT",
                          "approvals": [], "approvalRequests": [], "fees": []}},
                {"node": {"id": 30, "_etag": "o3", "status": "DRAFT",
                          "approvals": [{"id": 1}], "approvalRequests": [], "fees": []}}
            ]}}
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("query PurchaseOrder("))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"purchaseOrder": {"id": 20, "_etag": "o2"}}
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("DeletePurchaseOrder("))
        .and(body_partial_json(json!({"variables": {"id": 20}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"deletePurchaseOrder": {"id": 20}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let summary = purchases::delete_purchases(&client, &[]).await.unwrap();
    assert_eq!(summary.lines_deleted, 1);
    assert_eq!(summary.lines_skipped, 1);
    assert_eq!(summary.orders_deleted, 1);
    assert_eq!(summary.orders_skipped, 2);
    assert!(summary.failures.is_empty());
}
