// Integration tests for `LogClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use loglook_api::{Error, LogClient, SearchParams, TroubleCreate, TroubleUpdate};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, LogClient) {
    let server = MockServer::start().await;
    let client = LogClient::from_reqwest(&server.uri(), "tester", reqwest::Client::new()).unwrap();
    (server, client)
}

fn entry(id: &str, level: &str, ts: &str, msg: &str) -> serde_json::Value {
    json!({
        "id": id,
        "message_timestamp": ts,
        "log_level": level,
        "keyword": "db",
        "message": msg,
        "host_name": "web-01"
    })
}

// ── Log queries ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_recent_logs_window_index() {
    let (server, client) = setup().await;

    let body = json!([
        entry("a1", "INFO", "2026-03-01T10:00:00Z", "started"),
        entry("a2", "ERROR", "2026-03-01T10:01:00Z", "boom"),
    ]);

    Mock::given(method("GET"))
        .and(path("/log/recent"))
        .and(query_param("project_id", "proj-1"))
        .and(query_param("count", "3"))
        .and(header("x-user-id", "tester"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let entries = client.recent_logs("proj-1", 3).await.unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id, "a1");
    assert_eq!(entries[1].log_level, "ERROR");
    assert_eq!(entries[1].message.as_deref(), Some("boom"));
}

#[tokio::test]
async fn test_recent_logs_empty_window() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/log/recent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let entries = client.recent_logs("proj-1", 9).await.unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn test_mainboard_logs_period_param() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/log/mainboard"))
        .and(query_param("project_id", "proj-1"))
        .and(query_param("log_time", "week"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            entry("w1", "WARN", "2026-02-26T08:00:00Z", "slow query"),
        ])))
        .mount(&server)
        .await;

    let entries = client.mainboard_logs("proj-1", "week").await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].keyword.as_deref(), Some("db"));
}

#[tokio::test]
async fn test_search_logs_bare_array() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/log/search"))
        .and(query_param("query", "timeout"))
        .and(query_param("log_level", "ERROR"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            entry("s1", "ERROR", "2026-03-01T11:00:00Z", "timeout on shard 2"),
        ])))
        .mount(&server)
        .await;

    let params = SearchParams {
        query: Some("timeout".into()),
        log_level: Some("ERROR".into()),
        ..SearchParams::default()
    };
    let entries = client.search_logs("proj-1", &params).await.unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, "s1");
}

#[tokio::test]
async fn test_search_logs_wrapped_results() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/log/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [entry("s2", "INFO", "2026-03-01T12:00:00Z", "ok")],
            "took_ms": 12
        })))
        .mount(&server)
        .await;

    let entries = client
        .search_logs("proj-1", &SearchParams::default())
        .await
        .unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, "s2");
}

#[tokio::test]
async fn test_log_detail_source_shape() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/log/detail"))
        .and(query_param("project_id", "proj-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "_id": "d1",
                "_source": {
                    "message": null,
                    "event": { "original": "raw line" },
                    "message_timestamp": null,
                    "@timestamp": "2026-03-01T13:00:00Z",
                    "log_level": "INFO",
                    "keyword": "auth"
                }
            }
        ])))
        .mount(&server)
        .await;

    let hits = client
        .log_detail("proj-1", &["d1".to_string()])
        .await
        .unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "d1");

    // Fallbacks kick in when flattening to the common entry shape.
    let raw: loglook_api::RawLogEntry = hits[0].clone().into();
    assert_eq!(raw.message.as_deref(), Some("raw line"));
    assert_eq!(raw.message_timestamp, "2026-03-01T13:00:00Z");
}

// ── Troubleshooting reports ─────────────────────────────────────────

#[tokio::test]
async fn test_create_trouble() {
    let (server, client) = setup().await;

    let req = TroubleCreate {
        is_shared: false,
        project_id: "proj-1".into(),
        related_logs: vec!["a1".into(), "a2".into()],
        user_query: "why did the checkout service crash?".into(),
    };

    Mock::given(method("POST"))
        .and(path("/trouble"))
        .and(body_json(&req))
        .and(header("x-user-id", "tester"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "t-77",
            "report_name": "Checkout crash analysis",
            "content": "The crash was caused by ...",
            "user_query": "why did the checkout service crash?",
            "is_shared": false,
            "project_id": "proj-1",
            "created_by": "tester",
            "created_at": "2026-03-01T14:00:00Z"
        })))
        .mount(&server)
        .await;

    let report = client.create_trouble(&req).await.unwrap();

    assert_eq!(report.id, "t-77");
    assert_eq!(report.report_name, "Checkout crash analysis");
    assert!(!report.is_shared);
}

#[tokio::test]
async fn test_get_trouble_with_logs() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/troubles/t-77"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "trouble": {
                "id": "t-77",
                "report_name": "Checkout crash analysis",
                "content": "The crash was caused by ...",
                "user_query": "why?",
                "is_shared": true,
                "project_id": "proj-1",
                "created_by": "tester"
            },
            "logs": ["a1", "a2"]
        })))
        .mount(&server)
        .await;

    let got = client.get_trouble("t-77").await.unwrap();

    assert_eq!(got.trouble.id, "t-77");
    assert!(got.trouble.is_shared);
    assert_eq!(got.logs, vec!["a1".to_string(), "a2".to_string()]);
}

#[tokio::test]
async fn test_update_trouble() {
    let (server, client) = setup().await;

    let req = TroubleUpdate {
        report_name: Some("Renamed".into()),
        content: None,
        is_shared: Some(true),
    };

    // `content: None` must be omitted from the body, not sent as null.
    Mock::given(method("PUT"))
        .and(path("/troubles/t-77"))
        .and(body_json(json!({ "report_name": "Renamed", "is_shared": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "t-77",
            "report_name": "Renamed",
            "content": "The crash was caused by ...",
            "is_shared": true
        })))
        .mount(&server)
        .await;

    let report = client.update_trouble("t-77", &req).await.unwrap();

    assert_eq!(report.report_name, "Renamed");
    assert!(report.is_shared);
}

#[tokio::test]
async fn test_delete_trouble() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/troubles/t-77"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    client.delete_trouble("t-77").await.unwrap();
}

#[tokio::test]
async fn test_list_troubles_pagination() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/project/proj-1/troubles"))
        .and(query_param("page", "2"))
        .and(query_param("size", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "id": "t-11", "report_name": "Disk pressure", "is_shared": true, "created_by": "kim" },
                { "id": "t-12", "report_name": "OOM loop", "is_shared": false, "created_by": "lee" }
            ],
            "total": 12,
            "page": 2,
            "size": 10,
            "pages": 2
        })))
        .mount(&server)
        .await;

    let page = client.list_troubles("proj-1", 2, 10).await.unwrap();

    assert_eq!(page.total, 12);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].report_name, "Disk pressure");
    assert!(!page.items[1].is_shared);
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_error_401_unauthorized() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "detail": "unknown user" })),
        )
        .mount(&server)
        .await;

    let result = client.recent_logs("proj-1", 1).await;

    match result {
        Err(Error::Authentication { ref message }) => assert_eq!(message, "unknown user"),
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_404_detail_envelope() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/troubles/t-gone"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "detail": "Trouble not found" })),
        )
        .mount(&server)
        .await;

    let result = client.get_trouble("t-gone").await;

    match result {
        Err(ref e @ Error::Api { status, ref message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "Trouble not found");
            assert!(e.is_not_found());
        }
        other => panic!("expected Api 404 error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_422_validation() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/trouble"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "detail": "related_logs required" })),
        )
        .mount(&server)
        .await;

    let req = TroubleCreate {
        is_shared: false,
        project_id: "proj-1".into(),
        related_logs: vec![],
        user_query: "?".into(),
    };
    let result = client.create_trouble(&req).await;

    match result {
        Err(Error::Api { status, ref message }) => {
            assert_eq!(status, 422);
            assert_eq!(message, "related_logs required");
        }
        other => panic!("expected Api 422 error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_500_no_envelope() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = client.recent_logs("proj-1", 1).await;

    match result {
        Err(ref e @ Error::Api { status, .. }) => {
            assert_eq!(status, 500);
            assert!(e.is_transient());
        }
        other => panic!("expected Api 500 error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_malformed_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client.recent_logs("proj-1", 1).await;

    match result {
        Err(Error::Deserialization { ref body, .. }) => assert_eq!(body, "not json"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}
