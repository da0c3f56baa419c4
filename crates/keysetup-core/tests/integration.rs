//! Integration tests for key setup validation against a mocked Onspring API

use keysetup_core::{
    validate, Category, ClientConfig, ExpectedSchema, FetchError, OnspringClient, PageRequest,
    ReportEmitter, Resource, SchemaSource,
};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-key";

fn client_for(server: &MockServer, page_size: u32) -> OnspringClient {
    let config = ClientConfig::new(server.uri(), API_KEY)
        .with_page_size(page_size)
        .with_timeout_ms(2_000);
    OnspringClient::new(config).unwrap()
}

fn page(items: Vec<Value>, page_number: u32, total_pages: u32) -> Value {
    json!({
        "pageNumber": page_number,
        "pageSize": items.len(),
        "totalPages": total_pages,
        "totalRecords": items.len(),
        "items": items
    })
}

fn app(id: i64, name: &str) -> Value {
    json!({ "id": id, "name": name, "href": format!("/Apps/id/{}", id) })
}

fn field(id: i64, app_id: i64, name: &str, field_type: &str) -> Value {
    json!({
        "id": id,
        "appId": app_id,
        "name": name,
        "type": field_type,
        "status": "Enabled",
        "isRequired": false,
        "isUnique": false
    })
}

async fn mount_page(server: &MockServer, route: &str, page_number: u32, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(query_param("PageNumber", page_number.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_client_sends_paging_and_auth() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Apps"))
        .and(query_param("PageNumber", "2"))
        .and(query_param("PageSize", "50"))
        .and(header("x-apikey", API_KEY))
        .and(header("x-api-version", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![app(7, "Contacts")], 2, 2)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, 50);
    let result = client.apps_page(PageRequest::new(2, 50)).await.unwrap();

    assert_eq!(result.total_pages, 2);
    assert_eq!(result.items.len(), 1);
    assert_eq!(result.items[0].name, "Contacts");
}

#[tokio::test]
async fn test_client_maps_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Fields/appId/9"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
        .mount(&server)
        .await;

    let client = client_for(&server, 100);
    let err = client.fields_page(9, PageRequest::new(1, 100)).await.unwrap_err();

    match err {
        FetchError::Server { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "invalid key");
        }
        other => panic!("expected server error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_client_rejects_malformed_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Apps"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": [] })))
        .mount(&server)
        .await;

    let client = client_for(&server, 100);
    let err = client.apps_page(PageRequest::new(1, 100)).await.unwrap_err();

    assert!(matches!(err, FetchError::Decode(_)));
}

#[tokio::test]
async fn test_full_run_with_partial_field_failure() {
    let server = MockServer::start().await;

    // Apps over two pages.
    mount_page(&server, "/Apps", 1, page(vec![app(1, "App1"), app(2, "App2")], 1, 2)).await;
    mount_page(&server, "/Apps", 2, page(vec![app(4, "Unlisted")], 2, 2)).await;

    mount_page(
        &server,
        "/Fields/appId/1",
        1,
        page(vec![field(10, 1, "F1", "Text")], 1, 1),
    )
    .await;

    // App2: page 1 of 3 succeeds, page 2 fails, page 3 must never be requested.
    mount_page(
        &server,
        "/Fields/appId/2",
        1,
        page(vec![field(20, 2, "F3", "Formula")], 1, 3),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/Fields/appId/2"))
        .and(query_param("PageNumber", "2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Fields/appId/2"))
        .and(query_param("PageNumber", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![field(22, 2, "F5", "Text")],
            3,
            3,
        )))
        .expect(0)
        .mount(&server)
        .await;

    mount_page(&server, "/Fields/appId/4", 1, page(Vec::new(), 1, 0)).await;

    let expected = ExpectedSchema::parse(
        "App,Field\r\nApp1,F1\r\nApp1,F2\r\nApp2,F3\r\nApp2,F5\r\nApp3,X\r\n",
    )
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let artifact = dir.path().join("formula_fields.csv");
    let emitter = ReportEmitter::new(&artifact);

    let client = client_for(&server, 100);
    let summary = validate(&client, &expected, &emitter).await.unwrap();

    let result = &summary.reconciliation;
    assert_eq!(result.missing_apps, vec!["App3"]);
    assert_eq!(result.missing_fields_for("App1").unwrap(), &["F2"]);
    // F5 lives on the page that failed; reported missing under the isolation policy.
    assert_eq!(result.missing_fields_for("App2").unwrap(), &["F5"]);
    assert!(result.missing_fields_for("App3").is_none());
    assert_eq!(result.formula_fields.len(), 1);
    assert_eq!(result.formula_fields[0].app, "App2");
    assert_eq!(result.formula_fields[0].field, "F3");

    assert_eq!(summary.remote_apps, 3);
    assert!(summary.is_partial());
    assert_eq!(summary.fetch_failures.len(), 1);
    assert_eq!(summary.fetch_failures[0].page_number, 2);
    assert!(matches!(
        summary.fetch_failures[0].resource,
        Resource::Fields { app_id: 2, .. }
    ));

    assert_eq!(summary.artifact.as_deref(), Some(artifact.as_path()));
    assert_eq!(
        std::fs::read_to_string(&artifact).unwrap(),
        "App,Field\r\nApp2,F3"
    );

    let categories: Vec<Category> = summary.diagnostics.iter().map(|d| d.category).collect();
    assert!(categories.contains(&Category::FieldFetchError));
    assert!(categories.contains(&Category::MissingApp));
    assert!(categories.contains(&Category::MissingField));
    assert!(categories.contains(&Category::FormulaField));
    assert_eq!(categories.last(), Some(&Category::RunComplete));
}

#[tokio::test]
async fn test_run_without_formula_fields_writes_no_artifact() {
    let server = MockServer::start().await;

    mount_page(&server, "/Apps", 1, page(vec![app(1, "App1")], 1, 1)).await;
    mount_page(
        &server,
        "/Fields/appId/1",
        1,
        page(vec![field(10, 1, "F1", "Text")], 1, 1),
    )
    .await;

    let expected = ExpectedSchema::parse("App,Field\r\nApp1,F1").unwrap();
    let dir = tempfile::tempdir().unwrap();
    let artifact = dir.path().join("formula_fields.csv");

    let client = client_for(&server, 100);
    let summary = validate(&client, &expected, &ReportEmitter::new(&artifact))
        .await
        .unwrap();

    assert!(summary.reconciliation.discrepancies().is_empty());
    assert!(!summary.is_partial());
    assert!(summary.artifact.is_none());
    assert!(!artifact.exists());
}

#[tokio::test]
async fn test_apps_failure_marks_everything_missing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Apps"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let expected = ExpectedSchema::parse("App,Field\r\nApp1,F1\r\nApp2,F2").unwrap();
    let dir = tempfile::tempdir().unwrap();

    let client = client_for(&server, 100);
    let summary = validate(
        &client,
        &expected,
        &ReportEmitter::new(dir.path().join("formula_fields.csv")),
    )
    .await
    .unwrap();

    assert_eq!(summary.reconciliation.missing_apps, vec!["App1", "App2"]);
    assert!(summary.reconciliation.missing_fields.is_empty());
    assert_eq!(summary.fetch_failures[0].resource, Resource::Apps);
}
