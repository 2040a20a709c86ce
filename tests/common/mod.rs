//! Shared test helpers for integration tests.
//!
//! Every `TestApp` runs the full router over the in-memory database, the
//! in-memory cache and local storage rooted in a temporary directory.

#![allow(dead_code)]

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use petfinder_api::{AppState, build_router};
use petfinder_cache::CacheManager;
use petfinder_core::config::AppConfig;
use petfinder_database::Repositories;
use petfinder_storage::StorageManager;

/// Smallest byte sequence the image sniffer recognizes as PNG.
pub const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

const BOUNDARY: &str = "petfinder-test-boundary";
const BASE_URL: &str = "http://test.local";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Repositories behind the router, for direct assertions
    pub repos: Repositories,
    /// Application config
    pub config: AppConfig,
    _uploads: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Content-Type header, if any
    pub content_type: Option<String>,
    /// Raw body
    pub bytes: Bytes,
    /// Parsed JSON body (`Null` when the body is not JSON)
    pub body: Value,
}

/// A registered user with a token.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: String,
    pub email: String,
    pub token: String,
}

/// A file part of a multipart request.
pub struct FilePart<'a> {
    pub field: &'a str,
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub data: &'a [u8],
}

impl<'a> FilePart<'a> {
    /// A PNG photo in the `images` field.
    pub fn png(file_name: &'a str) -> Self {
        Self {
            field: "images",
            file_name,
            content_type: "image/png",
            data: PNG,
        }
    }
}

impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a test application after adjusting the default test config
    pub async fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let uploads = TempDir::new().expect("Failed to create temp dir");

        let mut config = AppConfig::default();
        config.database.provider = "memory".to_string();
        config.cache.provider = "memory".to_string();
        config.storage.provider = "local".to_string();
        config.storage.local.root_path = uploads.path().to_string_lossy().into_owned();
        config.server.public_base_url = BASE_URL.to_string();
        config.auth.jwt_secret = "integration-test-secret".to_string();
        adjust(&mut config);

        let repos = Repositories::connect(&config.database)
            .await
            .expect("Failed to init repositories");
        let cache = CacheManager::new(&config.cache)
            .await
            .expect("Failed to init cache");
        let storage = StorageManager::new(&config.storage, &config.server.public_base_url)
            .await
            .expect("Failed to init storage");

        let state = AppState::new(config.clone(), repos.clone(), cache, storage);

        Self {
            router: build_router(state),
            repos,
            config,
            _uploads: uploads,
        }
    }

    /// Send a JSON request
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");
        self.send(req).await
    }

    /// Send a multipart/form-data request
    pub async fn multipart(
        &self,
        path: &str,
        fields: &[(&str, &str)],
        files: &[FilePart<'_>],
        token: Option<&str>,
    ) -> TestResponse {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        for file in files {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                    file.field, file.file_name, file.content_type
                )
                .as_bytes(),
            );
            body.extend_from_slice(file.data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let mut req = Request::builder()
            .method("POST")
            .uri(path)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            );
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let req = req.body(Body::from(body)).expect("Failed to build request");
        self.send(req).await
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            content_type,
            bytes,
            body,
        }
    }

    /// Register a user and log in
    pub async fn register(&self, name: &str, email: &str) -> TestUser {
        let password = "correct-horse-42";
        let response = self
            .request(
                "POST",
                "/users",
                Some(json!({
                    "name": name,
                    "email": email,
                    "password": password,
                    "confirmPassword": password,
                })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);

        let token = self.login(email, password).await;
        TestUser {
            id: response.body["id"].as_str().unwrap_or_default().to_string(),
            email: email.to_string(),
            token,
        }
    }

    /// Log in and return the token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/login",
                Some(json!({ "email": email, "password": password })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.body["token"]
            .as_str()
            .expect("login response has a token")
            .to_string()
    }

    /// Create a lost-dog listing with one photo and return its id
    pub async fn create_listing(&self, owner: &TestUser, name: &str) -> String {
        let response = self
            .multipart(
                "/pets",
                &[
                    ("name", name),
                    ("species", "dog"),
                    ("breed", "Vira-lata"),
                    ("location", "Boa Viagem"),
                    ("status", "lost"),
                    ("latitude", "-8.11"),
                    ("longitude", "-34.89"),
                ],
                &[FilePart::png("photo.png")],
                Some(&owner.token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["id"]
            .as_str()
            .expect("listing has an id")
            .to_string()
    }
}
