//! Shared harness: the real router over a fresh in-memory store.

#![allow(dead_code)]

use std::sync::Arc;

use api_adapters::handlers::AppState;
use api_adapters::{app, Assets};
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use services::ThreadService;
use storage_adapters::InMemoryThreadRepository;
use tower::ServiceExt;

pub struct TestApp {
    router: Router,
    pub repo: Arc<InMemoryThreadRepository>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body)
            .unwrap_or_else(|err| panic!("body is not JSON ({err}): {}", self.body))
    }
}

impl TestApp {
    pub fn new() -> Self {
        let repo = Arc::new(InMemoryThreadRepository::new());
        let service = ThreadService::new(repo.clone());
        let router = app(AppState::new(service), &Assets::default());
        Self { router, repo }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        TestResponse {
            status,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::DELETE, uri, Some(body)).await
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    /// Creates a thread and returns its id.
    pub async fn create_thread(&self, board: &str, text: &str, password: &str) -> String {
        let resp = self
            .post(
                &format!("/api/threads/{board}"),
                serde_json::json!({ "text": text, "delete_password": password }),
            )
            .await;
        assert_eq!(resp.status, StatusCode::OK, "{}", resp.body);
        resp.json()["_id"].as_str().unwrap().to_string()
    }

    /// Adds a reply and returns its id (the last entry of the shaped thread).
    pub async fn create_reply(&self, board: &str, thread_id: &str, text: &str, password: &str) -> String {
        let resp = self
            .post(
                &format!("/api/replies/{board}"),
                serde_json::json!({ "thread_id": thread_id, "text": text, "delete_password": password }),
            )
            .await;
        assert_eq!(resp.status, StatusCode::OK, "{}", resp.body);
        let view = resp.json();
        let replies = view["replies"].as_array().unwrap();
        replies.last().unwrap()["_id"].as_str().unwrap().to_string()
    }

    pub async fn view_thread(&self, board: &str, thread_id: &str) -> TestResponse {
        self.get(&format!("/api/replies/{board}?thread_id={thread_id}")).await
    }
}
