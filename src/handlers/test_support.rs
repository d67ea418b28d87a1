use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use bytes::Bytes;
use http_body_util::BodyExt;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::config::Config;
use crate::db::Database;
use crate::storage::StorageManager;
use crate::{create_router, AppState};

const BOUNDARY: &str = "medivault-test-boundary";
const HOST: &str = "localhost:5000";

/// One multipart form part
pub enum Part<'a> {
    Text(&'a str, &'a str),
    /// field name, file name, content
    File(&'a str, &'a str, &'a [u8]),
}

/// Full router over an in-memory database and a temporary storage root
pub struct TestApp {
    router: Router,
    temp: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    pub async fn with_config(configure: impl FnOnce(&mut Config)) -> Self {
        let temp = TempDir::new().unwrap();
        let mut config = Config::default();
        configure(&mut config);
        config.storage.root = temp.path().to_string_lossy().into_owned();

        let state = AppState {
            db: Database::in_memory().await.unwrap(),
            storage: Arc::new(StorageManager::new(temp.path())),
            config: Arc::new(config),
        };

        Self {
            router: create_router(state),
            temp,
        }
    }

    pub fn storage_root(&self) -> &Path {
        self.temp.path()
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Bytes) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body)
    }

    async fn send_json(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = self.send(request).await;
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    }

    fn request(method: Method, uri: &str) -> axum::http::request::Builder {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::HOST, HOST)
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Self::request(Method::POST, uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send_json(request).await
    }

    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let request = Self::request(Method::GET, uri).body(Body::empty()).unwrap();
        self.send_json(request).await
    }

    pub async fn get_raw(&self, uri: &str) -> (StatusCode, Bytes) {
        let request = Self::request(Method::GET, uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        let request = Self::request(Method::DELETE, uri).body(Body::empty()).unwrap();
        self.send_json(request).await
    }

    pub async fn send_multipart(
        &self,
        method: &str,
        uri: &str,
        parts: &[Part<'_>],
    ) -> (StatusCode, Value) {
        let method = Method::from_bytes(method.as_bytes()).unwrap();
        let request = Self::request(method, uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap();
        self.send_json(request).await
    }
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, file_name, content) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n",
                        name, file_name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(content);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}
