//! Tests for the HTTP catalog client against a local axum server.

use std::collections::HashMap;

use axum::extract::Query;
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use artcat::cli::{cmd_page, cmd_select};
use artcat::{
    fetch_page_or_empty, CatalogClient, CatalogController, CatalogError, CatalogSource, Settings,
    PAGE_SIZE,
};

const TOTAL: u64 = 30;

async fn artworks(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let page: u64 = params
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(1);
    let first = (page.max(1) - 1) * PAGE_SIZE as u64 + 1;
    let last = (first + PAGE_SIZE as u64 - 1).min(TOTAL);

    let data: Vec<Value> = (first..=last)
        .map(|id| {
            json!({
                "id": id,
                "title": format!("Artwork {id}"),
                "place_of_origin": "Japan",
                "artist_display": "Katsushika Hokusai\nJapanese, 1760-1849",
                "inscriptions": null,
                "date_start": 1830,
                "date_end": 1833,
                "image_id": "abc123",
            })
        })
        .collect();

    Json(json!({
        "pagination": {
            "total": TOTAL,
            "limit": PAGE_SIZE,
            "current_page": page,
        },
        "data": data,
        "info": {"license_text": "CC0"},
    }))
}

/// One-record page whose title is the caller's user agent.
async fn agent(headers: HeaderMap) -> Json<Value> {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    Json(json!({
        "pagination": {"total": 1},
        "data": [{"id": 1, "title": user_agent}],
    }))
}

async fn malformed() -> &'static str {
    "<html>not json</html>"
}

async fn server_error() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

/// Start the test server and return its address.
async fn spawn_server() -> String {
    let router = Router::new()
        .route("/api/v1/artworks", get(artworks))
        .route("/agent", get(agent))
        .route("/malformed", get(malformed))
        .route("/error", get(server_error));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base_url: String) -> CatalogClient {
    let settings = Settings {
        base_url,
        ..Default::default()
    };
    CatalogClient::new(&settings).unwrap()
}

#[tokio::test]
async fn fetches_page_from_server() {
    let addr = spawn_server().await;
    let client = client(format!("{addr}/api/v1/artworks"));

    let page = client.fetch_page(2).await.unwrap();
    assert_eq!(page.page, 2);
    assert_eq!(page.total, Some(TOTAL));
    assert_eq!(
        page.records.iter().map(|r| r.id).collect::<Vec<_>>(),
        (13..=24).collect::<Vec<_>>()
    );

    let first = &page.records[0];
    assert_eq!(first.title(), "Artwork 13");
    assert_eq!(first.origin(), "Japan");
    assert_eq!(first.inscriptions(), "");
    assert_eq!(first.end_label(), "1833");
}

#[tokio::test]
async fn last_page_is_short() {
    let addr = spawn_server().await;
    let client = client(format!("{addr}/api/v1/artworks"));

    let page = fetch_page_or_empty(&client, 3).await;
    assert_eq!(page.records.len(), 6);
}

#[tokio::test]
async fn requests_carry_default_user_agent() {
    let addr = spawn_server().await;
    let client = client(format!("{addr}/agent"));

    let page = client.fetch_page(1).await.unwrap();
    assert_eq!(
        page.records[0].title(),
        concat!("artcat/", env!("CARGO_PKG_VERSION"))
    );
}

#[tokio::test]
async fn requests_carry_configured_user_agent() {
    let addr = spawn_server().await;
    let settings = Settings {
        base_url: format!("{addr}/agent"),
        user_agent: Some("MyBot/1.0".to_string()),
        ..Default::default()
    };
    let client = CatalogClient::new(&settings).unwrap();

    let page = client.fetch_page(1).await.unwrap();
    assert_eq!(page.records[0].title(), "MyBot/1.0");
}

#[tokio::test]
async fn malformed_payload_is_parse_error() {
    let addr = spawn_server().await;
    let client = client(format!("{addr}/malformed"));

    let err = client.fetch_page(1).await.unwrap_err();
    assert!(matches!(err, CatalogError::Parse { page: 1, .. }));

    let page = fetch_page_or_empty(&client, 1).await;
    assert!(page.records.is_empty());
    assert!(!page.is_loaded());
}

#[tokio::test]
async fn server_error_is_status_error() {
    let addr = spawn_server().await;
    let client = client(format!("{addr}/error"));

    let err = client.fetch_page(4).await.unwrap_err();
    match err {
        CatalogError::Status { page, status } => {
            assert_eq!(page, 4);
            assert_eq!(status.as_u16(), 500);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    // Grab a free port, then close it so nothing is listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client(format!("http://{addr}/api/v1/artworks"));
    let err = client.fetch_page(1).await.unwrap_err();
    assert!(matches!(err, CatalogError::Transport { page: 1, .. }));
}

#[tokio::test]
async fn bulk_selection_over_http() {
    let addr = spawn_server().await;
    let client = client(format!("{addr}/api/v1/artworks"));

    let mut controller = CatalogController::new(PAGE_SIZE);
    let ticket = controller.reload();
    assert!(controller.load_page(&client, ticket).await);

    let outcome = controller.select_first_n(&client, 25).await.unwrap();
    assert_eq!(outcome.pages_fetched, 3);
    assert_eq!(controller.selection().len(), 25);
    assert_eq!(controller.page(), 3);
    assert_eq!(controller.data().len(), 6);
}

#[tokio::test]
async fn page_command_prints_table() {
    let addr = spawn_server().await;
    let client = client(format!("{addr}/api/v1/artworks"));

    let mut out = Vec::new();
    cmd_page(&client, 2, &mut out).await.unwrap();
    let text = String::from_utf8(out).unwrap();

    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("id\tTitle\tOrigin\tArtist\tInscriptions\tStart\tEnd")
    );
    assert!(text.contains("13\tArtwork 13\tJapan\tKatsushika Hokusai Japanese, 1760-1849\t\t1830\t1833"));
    assert!(text.ends_with("-- page 2 of 3 (30 records total)\n"));
}

#[tokio::test]
async fn page_command_fails_when_page_cannot_load() {
    let addr = spawn_server().await;
    let client = client(format!("{addr}/error"));

    let mut out = Vec::new();
    assert!(cmd_page(&client, 1, &mut out).await.is_err());
    assert!(out.is_empty());
}

#[tokio::test]
async fn select_command_lists_titles() {
    let addr = spawn_server().await;
    let client = client(format!("{addr}/api/v1/artworks"));

    let mut out = Vec::new();
    cmd_select(&client, "40", &mut out).await.unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.starts_with("Selected Rows (30)\n1\tArtwork 1\n"));
    assert!(text.contains("-- 30 of 40 requested records available"));
    assert!(text.ends_with("-- now showing page 3\n"));
}

#[tokio::test]
async fn select_command_rejects_invalid_count() {
    let addr = spawn_server().await;
    let client = client(format!("{addr}/api/v1/artworks"));

    let mut out = Vec::new();
    let err = cmd_select(&client, "-5", &mut out).await.unwrap_err();
    assert!(err.to_string().starts_with("Enter a valid number"));
    assert!(out.is_empty());
}
