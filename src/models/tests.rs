//! Tests for wire models

use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;

// ============================================================================
// Entity Tests
// ============================================================================

#[test]
fn test_table_keeps_every_fixture_field() {
    let fixture = json!({
        "id": "grid-pqRst-U",
        "type": "table",
        "tableType": "table",
        "name": "Tasks",
        "parent": {"id": "canvas-1", "type": "page", "name": "Project"},
        "parentName": "Project",
        "browserLink": "https://coda.io/d/_dabc#Tasks_tu",
        "href": "https://coda.io/apis/v1/docs/abc/tables/grid-pqRst-U",
        "rowCount": 130,
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-02-01T00:00:00Z"
    });

    let table: Table = serde_json::from_value(fixture.clone()).unwrap();
    assert_eq!(table.name.as_deref(), Some("Tasks"));
    assert_eq!(table.row_count, Some(130));
    assert_eq!(table.parent.as_ref().and_then(ParentRef::id), Some("canvas-1"));
    assert_eq!(serde_json::to_value(&table).unwrap(), fixture);
}

#[test]
fn test_table_parent_as_plain_id() {
    let table: Table =
        serde_json::from_value(json!({"id": "table-2", "parent": "grid-1"})).unwrap();
    assert_eq!(table.parent, Some(ParentRef::Id("grid-1".to_string())));
}

#[test]
fn test_unknown_fields_are_ignored() {
    let column: Column = serde_json::from_value(json!({
        "id": "c-1",
        "name": "Status",
        "brandNewField": {"nested": [1, 2, 3]},
        "anotherOne": true
    }))
    .unwrap();

    assert_eq!(column.id.as_deref(), Some("c-1"));
    assert_eq!(column.name.as_deref(), Some("Status"));
}

#[test]
fn test_column_keeps_every_fixture_field() {
    let fixture = json!({
        "id": "c-tuVwxYz",
        "type": "column",
        "name": "Completed",
        "display": true,
        "calculated": true,
        "formula": "thisRow.Created()",
        "defaultValue": "Test",
        "format": {"type": "text", "isArray": false},
        "href": "https://coda.io/apis/v1/docs/abc/tables/grid-1/columns/c-tuVwxYz"
    });

    let column: Column = serde_json::from_value(fixture.clone()).unwrap();
    assert_eq!(column.display, Some(true));
    assert_eq!(serde_json::to_value(&column).unwrap(), fixture);
}

#[test]
fn test_row_keeps_every_fixture_field() {
    let fixture = json!({
        "id": "i-tuVwxYz",
        "type": "row",
        "name": "Apple",
        "index": 7,
        "browserLink": "https://coda.io/d/_dabc#Tasks_tu/r7",
        "href": "https://coda.io/apis/v1/docs/abc/tables/grid-1/rows/i-tuVwxYz",
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-02T00:00:00Z",
        "values": {
            "c-1": "Apple",
            "c-2": 12.5,
            "c-3": true,
            "c-4": ["a", "b"],
            "c-5": {"@type": "MonetaryAmount", "amount": 10}
        },
        "parent": {"id": "i-parent", "name": "Fruit", "browserLink": "https://coda.io/x"}
    });

    let row: Row = serde_json::from_value(fixture.clone()).unwrap();
    assert_eq!(row.index, Some(7));
    assert_eq!(row.value("c-2"), Some(&json!(12.5)));
    assert_eq!(row.value("c-4"), Some(&json!(["a", "b"])));
    assert!(row.value("missing").is_none());
    assert_eq!(serde_json::to_value(&row).unwrap(), fixture);
}

#[test]
fn test_row_with_no_fields() {
    let row: Row = serde_json::from_value(json!({})).unwrap();
    assert_eq!(row, Row::default());
    assert!(row.value("c-1").is_none());
}

// ============================================================================
// PagedResponse Tests
// ============================================================================

#[test]
fn test_paged_response_preserves_order() {
    let page: PagedResponse<Row> = serde_json::from_value(json!({
        "items": [{"id": "i-3"}, {"id": "i-1"}, {"id": "i-2"}],
        "nextPageToken": "tok",
        "nextPageLink": "https://coda.io/apis/v1/docs/d/tables/t/rows?pageToken=tok"
    }))
    .unwrap();

    let ids: Vec<_> = page.items.iter().filter_map(|r| r.id.as_deref()).collect();
    assert_eq!(ids, vec!["i-3", "i-1", "i-2"]);
    assert!(page.has_more_pages());
}

#[test]
fn test_paged_response_missing_items() {
    let page: PagedResponse<Table> = serde_json::from_value(json!({})).unwrap();
    assert!(page.items.is_empty());
    assert!(!page.has_more_pages());
}

#[test]
fn test_paged_response_null_items() {
    let page: PagedResponse<Table> =
        serde_json::from_value(json!({"items": null, "nextPageToken": "t"})).unwrap();
    assert!(page.items.is_empty());
    assert!(page.has_more_pages());
}

// ============================================================================
// Request Body Tests
// ============================================================================

#[test]
fn test_insert_request_wire_shape() {
    let request = InsertRowsRequest::insert(vec![
        RowData::default().cell("Name", "Alice").cell("Age", 30),
        RowData::default().cell("Name", "Bob"),
    ]);

    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({
            "rows": [
                {"cells": [{"column": "Name", "value": "Alice"}, {"column": "Age", "value": 30}]},
                {"cells": [{"column": "Name", "value": "Bob"}]}
            ]
        })
    );
}

#[test]
fn test_upsert_request_includes_key_columns() {
    let request = InsertRowsRequest::upsert(
        vec![RowData::default().cell("c-abc", "ProjectA")],
        vec!["c-abc".to_string(), "c-def".to_string()],
    );

    let body = serde_json::to_value(&request).unwrap();
    assert_eq!(body["keyColumns"], json!(["c-abc", "c-def"]));
    assert_eq!(body["rows"][0]["cells"][0]["value"], "ProjectA");
}

#[test]
fn test_update_request_wire_shape() {
    let request = UpdateRowRequest::new(vec![RowCell::new("Status", "Done")]);
    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({"row": {"cells": [{"column": "Status", "value": "Done"}]}})
    );
}

#[test]
fn test_mutation_response() {
    let response: MutationResponse = serde_json::from_value(json!({
        "requestId": "abc-123",
        "addedRowIds": ["i-1", "i-2"],
        "extra": 1
    }))
    .unwrap();
    assert_eq!(response.request_id, "abc-123");
    assert_eq!(response.added_row_ids, vec!["i-1", "i-2"]);
    assert!(response.id.is_none());

    let response: MutationResponse =
        serde_json::from_value(json!({"requestId": "r", "id": "i-9"})).unwrap();
    assert_eq!(response.id.as_deref(), Some("i-9"));
    assert!(response.added_row_ids.is_empty());
}

#[test]
fn test_no_content_accepts_anything() {
    assert_eq!(serde_json::from_str::<NoContent>("null").unwrap(), NoContent);
    assert_eq!(
        serde_json::from_str::<NoContent>(r#"{"requestId": "x"}"#).unwrap(),
        NoContent
    );
    assert_eq!(serde_json::from_str::<NoContent>("[1,2]").unwrap(), NoContent);
}
