//! Data loader against a local HTTP server.
//!
//! Each test binds an axum router on 127.0.0.1:0 that serves a few fixed
//! "sites" and counts every request, so memoization can be checked by
//! observing that no second request reaches the server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use tokio::net::TcpListener;

use tvdir_proto::loader::{DataLoader, LoadError, ResourceNames};
use tvdir_proto::source::HttpSource;

const CHANNELS: &str = r#"[
  {"category": "กีฬา", "name": "ESPN", "img_src": "a.png", "data_url": "http://x/espn", "aria_label": "ESPN"},
  {"category": "IPTV", "name": "News 24", "img_src": "n.png", "data_url": "http://x/news", "aria_label": "News 24"}
]"#;

const TEXTS: &str = r#"{"runningText": "ยินดีต้อนรับ", "footerText": "© tvdir"}"#;

#[derive(Clone, Default)]
struct Hits(Arc<AtomicUsize>);

impl Hits {
    fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

fn json(body: &'static str) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], body)
}

async fn ok_channels(State(hits): State<Hits>) -> impl IntoResponse {
    hits.0.fetch_add(1, Ordering::SeqCst);
    json(CHANNELS)
}

async fn ok_texts(State(hits): State<Hits>) -> impl IntoResponse {
    hits.0.fetch_add(1, Ordering::SeqCst);
    json(TEXTS)
}

async fn server_error(State(hits): State<Hits>) -> impl IntoResponse {
    hits.0.fetch_add(1, Ordering::SeqCst);
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

async fn garbage(State(hits): State<Hits>) -> impl IntoResponse {
    hits.0.fetch_add(1, Ordering::SeqCst);
    json("[{\"category\": ")
}

async fn not_found(State(hits): State<Hits>) -> impl IntoResponse {
    hits.0.fetch_add(1, Ordering::SeqCst);
    StatusCode::NOT_FOUND
}

/// Start the fixture server and return its base URL plus the hit counter.
async fn start_server() -> (String, Hits) {
    let hits = Hits::default();
    let app = Router::new()
        .route("/ok/channels.json", get(ok_channels))
        .route("/ok/texts.json", get(ok_texts))
        .route("/half/texts.json", get(ok_texts))
        .route("/broken/channels.json", get(server_error))
        .route("/garbage/channels.json", get(garbage))
        .fallback(not_found)
        .with_state(hits.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), hits)
}

fn loader(base: &str) -> DataLoader {
    let source = HttpSource::new(base).unwrap();
    DataLoader::new(Arc::new(source), ResourceNames::default())
}

#[tokio::test]
async fn startup_loads_run_concurrently_and_memoize() {
    let (server, hits) = start_server().await;
    let mut loader = loader(&format!("{}/ok", server));

    let channels = loader.begin_channels().unwrap();
    let texts = loader.begin_texts().unwrap();
    let (channels, texts) = tokio::join!(channels, texts);
    loader.finish_channels(channels);
    loader.finish_texts(texts);
    assert_eq!(hits.count(), 2);

    let list = loader.ensure_channels().await.unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].name, "ESPN");
    assert_eq!(list[1].category, "IPTV");

    let bundle = loader.ensure_texts().await.unwrap();
    assert_eq!(bundle.running_text.as_deref(), Some("ยินดีต้อนรับ"));
    assert_eq!(hits.count(), 2, "memoized loads must not refetch");
}

#[tokio::test]
async fn not_found_resolves_to_empty_without_refetching() {
    let (server, hits) = start_server().await;
    let mut loader = loader(&format!("{}/nowhere", server));

    assert_eq!(loader.ensure_channels().await.map(<[_]>::len), Some(0));
    assert_eq!(hits.count(), 1);
    let err = loader.channels().error().cloned().unwrap();
    assert_eq!(
        err,
        LoadError::NotFound {
            resource: "channels.json".into()
        }
    );
    assert!(err.to_string().contains("not found (HTTP 404)"));

    for _ in 0..3 {
        assert_eq!(loader.ensure_channels().await.map(<[_]>::len), Some(0));
    }
    assert_eq!(hits.count(), 1, "failed load must stay memoized");
}

#[tokio::test]
async fn other_statuses_are_http_errors() {
    let (server, _hits) = start_server().await;
    let mut loader = loader(&format!("{}/broken", server));

    loader.ensure_channels().await;
    let err = loader.channels().error().cloned().unwrap();
    assert_eq!(
        err,
        LoadError::Http {
            resource: "channels.json".into(),
            status: 500
        }
    );
    assert_eq!(
        err.to_string(),
        "Failed to load channels.json: HTTP error! status: 500"
    );
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let (server, _hits) = start_server().await;
    let mut loader = loader(&format!("{}/garbage", server));

    loader.ensure_channels().await;
    assert!(matches!(
        loader.channels().error(),
        Some(LoadError::Parse { .. })
    ));
}

#[tokio::test]
async fn one_failed_resource_does_not_affect_the_other() {
    let (server, _hits) = start_server().await;
    let mut loader = loader(&format!("{}/half", server));

    let channels = loader.begin_channels().unwrap();
    let texts = loader.begin_texts().unwrap();
    let (channels, texts) = tokio::join!(channels, texts);
    assert!(channels.is_err());
    assert!(texts.is_ok());

    loader.finish_channels(channels);
    loader.finish_texts(texts);
    assert!(loader.channels().error().is_some());
    assert!(loader.texts().error().is_none());
    assert_eq!(
        loader.ensure_texts().await.and_then(|b| b.footer_text.as_deref()),
        Some("© tvdir")
    );
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    // Bind and drop to get a port that is very likely closed.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut loader = loader(&format!("http://{}/", addr));
    loader.ensure_texts().await;
    assert!(matches!(
        loader.texts().error(),
        Some(LoadError::Transport { .. })
    ));
}
