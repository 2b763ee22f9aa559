use crate::*;

use remote_model::{
    Error, Grid, Method, Record, RemoteModelOptions, Request, Response, RowRange,
    Settlement, SortDirection, Total, TransportError, TransportErrorKind,
};
use serde_json::json;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct TestGrid {
    viewport: RowRange,
    row_count: Total,
    selected: Vec<usize>,
}

impl Grid for TestGrid {
    fn viewport(&mut self, top: Option<usize>) -> RowRange {
        if let Some(top) = top {
            let len = self.viewport.len();
            self.viewport = RowRange::new(top, top + len);
        }
        self.viewport
    }

    fn invalidate_row(&mut self, _row: usize) {}

    fn set_row_count(&mut self, total: Total) {
        self.row_count = total;
    }

    fn selected_rows(&self) -> Vec<usize> {
        self.selected.clone()
    }

    fn set_selected_rows(&mut self, rows: Vec<usize>) {
        self.selected = rows;
    }
}

fn controller(from: usize, to: usize) -> Controller<TestGrid> {
    Controller::new(
        RemoteModelOptions::new()
            .with_url("./@@contents")
            .with_sorting("title", SortDirection::Ascending)
            .with_extra_query("filter", ""),
        TestGrid {
            viewport: RowRange::new(from, to),
            ..TestGrid::default()
        },
    )
}

fn page(from: usize, to: usize, total: usize) -> String {
    let records: Vec<_> = (from..to)
        .map(|i| json!({ "id": format!("doc_{i}"), "title": format!("Document {i}") }))
        .collect();
    json!({ "from": from, "to": to, "total": total, "records": records }).to_string()
}

#[test]
fn json_records_use_string_or_numeric_ids() {
    assert_eq!(JsonRecord(json!({ "id": "doc_1" })).id(), Some("doc_1".to_string()));
    assert_eq!(JsonRecord(json!({ "id": 42 })).id(), Some("42".to_string()));
    assert_eq!(JsonRecord(json!({ "title": "x" })).id(), None);
    assert_eq!(JsonRecord(json!({ "id": null })).id(), None);
}

#[test]
fn decode_response_reads_rows_and_side_payload() {
    let body = json!({
        "from": 10,
        "to": 12,
        "total": 300,
        "records": [{ "id": "a" }, { "id": "b" }],
        "flash": "Renamed 1 item",
        "count": 2
    })
    .to_string();

    let response = decode_response(&body).unwrap();
    assert_eq!(response.range, Some(RowRange::new(10, 12)));
    assert_eq!(response.total, 300);
    assert_eq!(response.records.len(), 2);
    assert_eq!(response.records[1].get("id"), Some(&json!("b")));
    assert_eq!(
        response.extra.get("flash").map(String::as_str),
        Some("Renamed 1 item")
    );
    assert_eq!(response.extra.get("count").map(String::as_str), Some("2"));
    assert!(!response.extra.contains_key("records"));
}

#[test]
fn decode_response_accepts_an_empty_object() {
    let response = decode_response("{}").unwrap();
    assert_eq!(response, Response::empty());
}

#[test]
fn decode_response_rejects_bodies_that_are_not_json() {
    let body = "<html><body>Not logged in</body></html>";
    let err = decode_response(body).unwrap_err();
    assert_eq!(err.kind, TransportErrorKind::Parse);
    assert_eq!(err.detail, body);

    let err = decode_response(r#"{"from": 0, "to": 2, "records": []}"#).unwrap_err();
    assert_eq!(err.kind, TransportErrorKind::Parse);
}

#[test]
fn decode_response_rejects_ranges_that_overflow() {
    let body = r#"{"from":18446744073709551615,"total":1,"records":[{"id":1}]}"#;
    let err = decode_response(body).unwrap_err();
    assert_eq!(err.kind, TransportErrorKind::Parse);
    assert_eq!(err.detail, body);
}

#[test]
fn decode_response_bounds_the_range_by_the_records_sent() {
    let body = r#"{"from":0,"to":1000000000000000000,"total":1,"records":[]}"#;
    let response = decode_response(body).unwrap();
    assert_eq!(response.range, Some(RowRange::new(0, 0)));
    assert_eq!(response.total, 1);

    let body = json!({ "from": 5, "to": 10, "total": 7, "records": [{ "id": "a" }, { "id": "b" }] });
    let response = decode_response(&body.to_string()).unwrap();
    assert_eq!(response.range, Some(RowRange::new(5, 7)));
}

#[test]
fn decode_reply_maps_error_statuses() {
    let outcome = decode_reply(500, "boom");
    assert_eq!(
        outcome,
        remote_model::Outcome::Failure(TransportError::new(
            TransportErrorKind::Http,
            Some(500),
            "boom"
        ))
    );

    let remote_model::Outcome::Failure(err) = decode_reply(200, "not json") else {
        panic!("expected a parse failure");
    };
    assert_eq!(err.kind, TransportErrorKind::Parse);
    assert_eq!(err.status, Some(200));
}

#[test]
fn params_encode_in_key_order() {
    let mut params = BTreeMap::new();
    params.insert("to".to_string(), "20".to_string());
    params.insert("from".to_string(), "0".to_string());
    params.insert("filter".to_string(), "".to_string());

    assert_eq!(query_pairs(&params), "filter=&from=0&to=20");
    assert_eq!(
        params_to_json(&params),
        json!({ "filter": "", "from": "0", "to": "20" })
    );
}

#[test]
fn query_values_are_percent_encoded() {
    let mut params = BTreeMap::new();
    params.insert("filter".to_string(), "a&sortCol=x two".to_string());
    params.insert("from".to_string(), "0".to_string());

    assert_eq!(query_pairs(&params), "filter=a%26sortCol%3Dx+two&from=0");
}

#[test]
fn queued_transport_drops_requests_aborted_before_start() {
    let mut c = controller(0, 10);
    let first = c.on_viewport_changed().unwrap();
    // Supersede before the host ever started the first request.
    let second = c.model_mut().reset_data().unwrap();

    let dispatch = c.poll();
    assert_eq!(dispatch.start.len(), 1);
    assert_eq!(dispatch.start[0].0, second);
    assert!(dispatch.cancel.is_empty());
    assert!(c.poll().is_empty());

    // A started request that gets superseded is reported for cancellation.
    let third = c.model_mut().reset_data().unwrap();
    let dispatch = c.poll();
    assert_eq!(dispatch.cancel, vec![second]);
    assert_eq!(dispatch.start[0].0, third);
    assert_ne!(first, third);
}

#[test]
fn controller_round_trip_loads_rows() {
    let mut c = controller(0, 10);
    let id = c.on_viewport_changed().unwrap();

    let dispatch = c.poll();
    let (sent_id, request) = &dispatch.start[0];
    assert_eq!(*sent_id, id);
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.url.as_deref(), Some("./@@contents"));
    assert_eq!(
        query_pairs(&request.params),
        "filter=&from=0&sortCol=title&sortDir=true&to=10"
    );

    let settlement = c.deliver(id, 200, &page(0, 10, 500)).unwrap();
    assert_eq!(
        settlement,
        Settlement::Loaded {
            range: Some(RowRange::new(0, 10)),
            follow_up: None
        }
    );
    let model = c.model();
    assert_eq!(model.total(), Total::Known(500));
    assert_eq!(model.get(9).and_then(|r| r.get("title")), Some(&json!("Document 9")));
    assert_eq!(model.grid().row_count, Total::Known(500));
}

#[test]
fn stale_replies_are_rejected() {
    let mut c = controller(0, 10);
    let first = c.on_viewport_changed().unwrap();
    c.poll();
    c.model_mut().grid_mut().viewport = RowRange::new(200, 210);
    let second = c.model_mut().reset_data().unwrap();

    assert_eq!(
        c.deliver(first, 200, &page(0, 10, 500)),
        Err(Error::Cancelled(first))
    );
    assert!(c.model().cache().is_empty());
    assert!(c.deliver(second, 200, &page(200, 210, 500)).is_ok());
    assert_eq!(c.model().cache().indexes(), (200..210).collect::<Vec<_>>());
}

#[test]
fn search_refetches_from_the_top() {
    let mut c = controller(40, 50);
    let id = c.on_viewport_changed().unwrap();
    c.deliver(id, 200, &page(40, 50, 500)).unwrap();
    c.poll();

    assert_eq!(c.set_search(""), None);
    let id = c.set_search("report").unwrap();
    let dispatch = c.poll();
    assert_eq!(dispatch.start[0].0, id);
    assert_eq!(
        dispatch.start[0].1.params.get("filter").map(String::as_str),
        Some("report")
    );
    assert_eq!(
        dispatch.start[0].1.params.get("from").map(String::as_str),
        Some("0")
    );
}

#[test]
fn expired_session_suspends_the_model() {
    let mut c = controller(0, 10).with_suspend_on(|err| {
        err.kind == TransportErrorKind::Parse && err.detail.contains("Not logged in")
    });
    let id = c.on_viewport_changed().unwrap();

    let settlement = c
        .deliver(id, 200, "<html>Not logged in</html>")
        .unwrap();
    assert_eq!(settlement, Settlement::Failed);
    assert!(c.model().is_suspended());
    assert_eq!(c.on_viewport_changed(), None);

    c.model_mut().set_suspended(false);
    let id = c.on_viewport_changed().unwrap();
    let settlement = c
        .deliver_failure(
            id,
            TransportError::new(TransportErrorKind::Timeout, None, "timed out"),
        )
        .unwrap();
    assert_eq!(settlement, Settlement::Failed);
    assert!(!c.model().is_suspended());
}

#[test]
fn reorder_posts_through_the_queue_and_refreshes() {
    let mut c = controller(0, 10);
    let id = c.on_viewport_changed().unwrap();
    c.deliver(id, 200, &page(0, 10, 10)).unwrap();
    c.model_mut().grid_mut().selected = vec![2, 3];
    c.model_mut().sync_grid_selection(true);
    c.poll();

    let request = Request::post("./@@contents")
        .with_param("ajax.reorder", "ajax.reorder")
        .with_param("item-modify", "doc_2/doc_3")
        .with_param("insert-before", "doc_0");
    let id = c.model_mut().request(request, true).unwrap();
    let dispatch = c.poll();
    assert_eq!(dispatch.start[0].1.method, Method::Post);
    assert_eq!(
        dispatch.start[0].1.params.get("to").map(String::as_str),
        Some("10")
    );

    // The server moved doc_2 and doc_3 to the top.
    let records = json!([
        { "id": "doc_2" }, { "id": "doc_3" }, { "id": "doc_0" }, { "id": "doc_1" },
        { "id": "doc_4" }, { "id": "doc_5" }, { "id": "doc_6" }, { "id": "doc_7" },
        { "id": "doc_8" }, { "id": "doc_9" }
    ]);
    let body = json!({ "from": 0, "to": 10, "total": 10, "records": records, "flash": "Moved" });
    c.deliver(id, 200, &body.to_string()).unwrap();
    assert_eq!(c.model().grid().selected, vec![0, 1]);
}

#[test]
fn host_abort_of_the_current_request_refetches() {
    let mut c = controller(0, 10);
    let id = c.on_viewport_changed().unwrap();
    c.poll();

    let Settlement::Aborted { follow_up: Some(next) } = c.deliver_aborted(id).unwrap() else {
        panic!("expected the viewport to be fetched again");
    };
    assert_ne!(next, id);
    assert_eq!(c.poll().start[0].0, next);
    assert_eq!(c.deliver_aborted(id), Err(Error::Cancelled(id)));
}
