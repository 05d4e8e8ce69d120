//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: typed operation → HTTP request → typed
//! model or typed error

use coda_connect::resources::{
    DeleteRow, GetColumn, GetRow, GetTable, InsertRows, ListRows, ListTables, UpdateRow,
    UpsertRows,
};
use coda_connect::{
    retry_rate_limited, BackoffType, Column, Connection, ConnectionConfig, Error, ErrorKind,
    FetchPolicy, NoContent, PageCollection, RetryPolicy, Row, RowCell, RowData, Table,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use test_case::test_case;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn connection(server: &MockServer) -> Connection {
    let config = ConnectionConfig::builder("secret-token")
        .base_url(format!("{}/apis/v1", server.uri()))
        .build();
    Connection::with_config(config).unwrap()
}

// ============================================================================
// Model Round-Trips
// ============================================================================

#[tokio::test]
async fn test_get_table_keeps_every_field_and_ignores_unknown() {
    let mock_server = MockServer::start().await;
    let fixture = json!({
        "id": "grid-pqRst-U",
        "type": "table",
        "tableType": "table",
        "href": "https://coda.io/apis/v1/docs/AbCDeFGH/tables/grid-pqRst-U",
        "browserLink": "https://coda.io/d/_dAbCDeFGH/#Teams-and-Tasks_tpqRst-U",
        "name": "Tasks",
        "parent": {"id": "canvas-IjkLmnO", "type": "page", "name": "Launch Status"},
        "rowCount": 130,
        "createdAt": "2018-04-11T00:18:57.946Z",
        "updatedAt": "2018-04-11T00:18:57.946Z",
        "layout": "default",
        "sorts": [],
        "somethingNew": {"nested": true}
    });

    Mock::given(method("GET"))
        .and(path("/apis/v1/docs/AbCDeFGH/tables/grid-pqRst-U"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixture.clone()))
        .mount(&mock_server)
        .await;

    let table = GetTable::new("AbCDeFGH", "grid-pqRst-U")
        .run(&connection(&mock_server))
        .await
        .unwrap();

    let mut expected = fixture;
    for unknown in ["layout", "sorts", "somethingNew"] {
        expected.as_object_mut().unwrap().remove(unknown);
    }
    assert_eq!(serde_json::to_value(&table).unwrap(), expected);
}

#[tokio::test]
async fn test_get_column_round_trips() {
    let mock_server = MockServer::start().await;
    let fixture = json!({
        "id": "c-tuVwxYz",
        "type": "column",
        "name": "Completed",
        "href": "https://coda.io/apis/v1/docs/d/tables/t/columns/c-tuVwxYz",
        "display": true,
        "calculated": true,
        "formula": "thisRow.Created()",
        "defaultValue": "Test",
        "format": {"type": "text", "isArray": false}
    });

    Mock::given(method("GET"))
        .and(path("/apis/v1/docs/d/tables/t/columns/c-tuVwxYz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixture.clone()))
        .mount(&mock_server)
        .await;

    let column: Column = GetColumn::new("d", "t", "c-tuVwxYz")
        .run(&connection(&mock_server))
        .await
        .unwrap();

    assert_eq!(serde_json::to_value(&column).unwrap(), fixture);
}

#[tokio::test]
async fn test_get_row_round_trips() {
    let mock_server = MockServer::start().await;
    let fixture = json!({
        "id": "i-tuVwxYz",
        "type": "row",
        "href": "https://coda.io/apis/v1/docs/d/tables/t/rows/i-tuVwxYz",
        "name": "Apple",
        "index": 7,
        "browserLink": "https://coda.io/d/_dd#_rui-tuVwxYz",
        "createdAt": "2018-04-11T00:18:57.946Z",
        "updatedAt": "2018-04-11T00:18:57.946Z",
        "values": {
            "c-tuVwxYz": "Apple",
            "c-bCdeFgh": ["$12.34", "$56.78"],
            "c-done": false,
            "c-meta": {"k": 1}
        },
        "parent": {"id": "grid-pqRst-U", "name": "Tasks"}
    });

    Mock::given(method("GET"))
        .and(path("/apis/v1/docs/d/tables/t/rows/i-tuVwxYz"))
        .and(query_param("valueFormat", "simple"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixture.clone()))
        .mount(&mock_server)
        .await;

    let row: Row = GetRow::new("d", "t", "i-tuVwxYz")
        .run(&connection(&mock_server))
        .await
        .unwrap();

    assert_eq!(serde_json::to_value(&row).unwrap(), fixture);
    assert_eq!(row.value("c-done"), Some(&json!(false)));
}

// ============================================================================
// Pagination
// ============================================================================

async fn mount_three_pages(server: &MockServer) {
    let base = format!("{}/apis/v1/docs/d/tables/t/rows", server.uri());

    Mock::given(method("GET"))
        .and(path("/apis/v1/docs/d/tables/t/rows"))
        .and(query_param_is_missing("pageToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "i-1"}, {"id": "i-2"}],
            "nextPageToken": "page2",
            "nextPageLink": format!("{base}?pageToken=page2")
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/apis/v1/docs/d/tables/t/rows"))
        .and(query_param("pageToken", "page2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [],
            "nextPageToken": "page3",
            "nextPageLink": format!("{base}?pageToken=page3")
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/apis/v1/docs/d/tables/t/rows"))
        .and(query_param("pageToken", "page3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "i-3"}]
        })))
        .mount(server)
        .await;
}

fn row_ids(rows: &PageCollection<Row>) -> Vec<&str> {
    rows.items.iter().filter_map(|r| r.id.as_deref()).collect()
}

#[tokio::test]
async fn test_fetch_all_pages_follows_links_in_order() {
    let mock_server = MockServer::start().await;
    mount_three_pages(&mock_server).await;

    let rows = ListRows::new("d", "t")
        .fetch(FetchPolicy::AllPages)
        .run(&connection(&mock_server))
        .await
        .unwrap();

    assert_eq!(row_ids(&rows), vec!["i-1", "i-2", "i-3"]);
    assert_eq!(rows.page_count, 3);
    assert_eq!(
        serde_json::to_value(&rows).unwrap()["pageCount"],
        json!(3)
    );
}

#[tokio::test]
async fn test_fetch_first_page_only() {
    let mock_server = MockServer::start().await;
    mount_three_pages(&mock_server).await;

    let rows = ListRows::new("d", "t")
        .fetch(FetchPolicy::FirstPage)
        .run(&connection(&mock_server))
        .await
        .unwrap();

    assert_eq!(row_ids(&rows), vec!["i-1", "i-2"]);
    assert_eq!(rows.page_count, 1);
}

#[tokio::test]
async fn test_next_page_link_requested_verbatim() {
    let mock_server = MockServer::start().await;

    // The link points outside the base path; it must not be re-rooted.
    Mock::given(method("GET"))
        .and(path("/apis/v1/docs/d/tables"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "grid-1"}],
            "nextPageLink": format!("{}/elsewhere/tables?cursor=xyz", mock_server.uri())
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/elsewhere/tables"))
        .and(query_param("cursor", "xyz"))
        .and(header("Authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "grid-2"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let tables: PageCollection<Table> = ListTables::new("d")
        .fetch(FetchPolicy::AllPages)
        .run(&connection(&mock_server))
        .await
        .unwrap();

    assert_eq!(tables.items.len(), 2);
    assert_eq!(tables.items[1].id.as_deref(), Some("grid-2"));
}

// ============================================================================
// Error Classification
// ============================================================================

#[test_case("GET" ; "get")]
#[test_case("POST" ; "post")]
#[test_case("PUT" ; "put")]
#[test_case("DELETE" ; "delete")]
#[tokio::test]
async fn test_401_is_authentication_on_every_verb(verb: &str) {
    let mock_server = MockServer::start().await;

    Mock::given(method(verb))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"statusCode": 401})))
        .mount(&mock_server)
        .await;

    let conn = connection(&mock_server);
    let body = json!({"x": 1});
    let result: Result<Value, Error> = match verb {
        "GET" => conn.get("/docs").await,
        "POST" => conn.post("/docs", &body).await,
        "PUT" => conn.put("/docs", &body).await,
        _ => conn.delete("/docs").await,
    };

    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authentication);
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn test_401_from_mutation_operation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let rows = vec![RowData::default().cell("c-1", "x")];
    let err = UpsertRows::new("d", "t", vec!["c-1".into()], rows)
        .run(&connection(&mock_server))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Authentication));
}

#[tokio::test]
async fn test_404_message_contains_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&mock_server)
        .await;

    let err = GetRow::new("d", "t", "i-missing")
        .run(&connection(&mock_server))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.status(), Some(404));
    let message = err.to_string();
    assert!(message.contains("404"), "{message}");
    assert!(message.contains("/docs/d/tables/t/rows/i-missing"), "{message}");
}

#[tokio::test]
async fn test_429_with_retry_after() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "30"))
        .mount(&mock_server)
        .await;

    let err = ListTables::new("d")
        .run(&connection(&mock_server))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::RateLimited {
            retry_after_seconds: Some(30)
        }
    ));
    assert!(err.is_retryable());
    assert_eq!(err.retry_after(), Some(Duration::from_secs(30)));
}

#[tokio::test]
async fn test_429_without_retry_after() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let err = DeleteRow::new("d", "t", "i-1")
        .run(&connection(&mock_server))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::RateLimited {
            retry_after_seconds: None
        }
    ));
    assert_eq!(err.retry_after(), None);
}

#[test_case(400 ; "bad request")]
#[test_case(403 ; "forbidden")]
#[test_case(500 ; "server error")]
#[test_case(503 ; "unavailable")]
#[tokio::test]
async fn test_other_statuses_carry_status_and_body(status: u16) {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(status).set_body_string("raw failure body"))
        .mount(&mock_server)
        .await;

    let err = UpdateRow::new("d", "t", "i-1", vec![RowCell::new("c-1", "v")])
        .run(&connection(&mock_server))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(err.status(), Some(status));
    assert!(!err.is_retryable());
    match err {
        Error::Api { body, .. } => assert_eq!(body, "raw failure body"),
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_success_body_is_transport_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&mock_server)
        .await;

    let err = GetTable::new("d", "t")
        .run(&connection(&mock_server))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_empty_success_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&mock_server)
        .await;

    let conn = connection(&mock_server);
    let ack: NoContent = conn.post("/hooks", &json!({})).await.unwrap();
    assert_eq!(ack, NoContent);

    let nothing: Option<Table> = conn.post("/hooks", &json!({})).await.unwrap();
    assert!(nothing.is_none());
}

// ============================================================================
// Caller-side retry
// ============================================================================

#[tokio::test]
async fn test_retry_rides_out_rate_limit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/apis/v1/docs/d/tables/t/rows"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/apis/v1/docs/d/tables/t/rows"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "requestId": "req-1",
            "addedRowIds": ["i-9"]
        })))
        .mount(&mock_server)
        .await;

    let conn = connection(&mock_server);
    let op = InsertRows::new("d", "t", vec![RowData::default().cell("c-1", "x")]);
    let policy = RetryPolicy::default().backoff(
        BackoffType::Constant,
        Duration::from_millis(1),
        Duration::from_millis(1),
    );

    let counter = AtomicU32::new(0);
    let attempts = &counter;
    let output = retry_rate_limited(&policy, || {
        attempts.fetch_add(1, Ordering::SeqCst);
        op.run(&conn)
    })
    .await
    .unwrap();

    assert_eq!(output.added_row_ids, vec!["i-9".to_string()]);
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}
