#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, header::CONTENT_TYPE, HeaderMap, Uri},
    response::{Html, IntoResponse, Response},
    routing::post,
    Json, Router,
};
use ballot_relay::{build_app, config::AppConfig, AppState};
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

pub const BIO_STYLE: &str = "margin-bottom:10px; padding:5px 10px; background-color:#f9f9f9;";

/// Requests seen by the mock completion endpoint.
#[derive(Default)]
pub struct MockLlm {
    pub status: u16,
    pub reply: String,
    pub requests: Mutex<Vec<(Option<String>, Value)>>,
}

impl MockLlm {
    pub fn hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

async fn completions(
    State(mock): State<Arc<MockLlm>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let auth = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    mock.requests.lock().unwrap().push((auth, body));

    (
        StatusCode::from_u16(mock.status).unwrap(),
        [(CONTENT_TYPE, "application/json")],
        mock.reply.clone(),
    )
        .into_response()
}

/// Serves `reply` with `status` from `/openai/v1/chat/completions`; returns the base URL.
pub async fn spawn_mock_llm(status: u16, reply: &str) -> (String, Arc<MockLlm>) {
    let mock = Arc::new(MockLlm {
        status,
        reply: reply.to_string(),
        requests: Mutex::new(Vec::new()),
    });
    let app = Router::new()
        .route("/openai/v1/chat/completions", post(completions))
        .with_state(mock.clone());
    let addr = serve(app).await;
    (format!("http://{addr}/openai/v1"), mock)
}

pub fn completion_body(content: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": content }, "finish_reason": "stop" }
        ]
    })
    .to_string()
}

/// Static pages keyed by request path.
pub struct MockSite {
    pub pages: HashMap<String, String>,
    pub hits: AtomicUsize,
}

impl MockSite {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn page(State(site): State<Arc<MockSite>>, uri: Uri) -> Response {
    site.hits.fetch_add(1, Ordering::SeqCst);
    match site.pages.get(uri.path()) {
        Some(html) => Html(html.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Html("<h1>Not found</h1>")).into_response(),
    }
}

pub async fn spawn_mock_site(pages: &[(&str, String)]) -> (String, Arc<MockSite>) {
    let site = Arc::new(MockSite {
        pages: pages
            .iter()
            .map(|(path, html)| (path.to_string(), html.clone()))
            .collect(),
        hits: AtomicUsize::new(0),
    });
    let app = Router::new().fallback(page).with_state(site.clone());
    let addr = serve(app).await;
    (format!("http://{addr}"), site)
}

async fn serve(app: Router) -> std::net::SocketAddr {
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Base URL that refuses connections.
pub const UNREACHABLE: &str = "http://127.0.0.1:1";

pub fn test_config() -> AppConfig {
    AppConfig {
        groq_base_url: UNREACHABLE.to_string(),
        ballot_base_url: UNREACHABLE.to_string(),
        description_style: BIO_STYLE.to_string(),
        timeout_ms: 5_000,
        ..AppConfig::default()
    }
}

pub fn build_test_app(config: AppConfig) -> Router {
    build_app(AppState::new(config).unwrap())
}

pub fn json_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}
