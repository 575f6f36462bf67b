#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{DefaultBodyLimit, State};
use axum::routing::post;
use axum::{Json, Router};
use base64::{engine::general_purpose, Engine as _};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::{json, Value};

use estate_photo_kit::routes::create_routes;
use estate_photo_kit::services::fal::FalClient;
use estate_photo_kit::AppState;

pub struct TestApp {
    pub base_url: String,
    pub db: DatabaseConnection,
    pub client: reqwest::Client,
    fal_hits: Arc<AtomicUsize>,
}

async fn stub_edit(State(hits): State<Arc<AtomicUsize>>, Json(_body): Json<Value>) -> Json<Value> {
    hits.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "images": [{
            "url": "https://cdn.stub.test/edited.jpeg",
            "width": 1024,
            "height": 768
        }],
        "description": "Edited per instructions"
    }))
}

impl TestApp {
    pub async fn start() -> Self {
        // Stub image editing upstream, counting every request it receives
        let fal_hits = Arc::new(AtomicUsize::new(0));
        // Raise the default body cap so multi-MB base64 uploads reach the stub
        let stub = Router::new()
            .route("/{*path}", post(stub_edit))
            .layer(DefaultBodyLimit::max(20 * 1024 * 1024))
            .with_state(fal_hits.clone());
        let stub_listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub listener");
        let stub_url = format!("http://{}", stub_listener.local_addr().expect("stub addr"));
        tokio::spawn(async move {
            axum::serve(stub_listener, stub).await.expect("serve stub");
        });

        // Single connection keeps the in-memory database shared
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1);
        let db = Database::connect(opts).await.expect("connect sqlite");
        Migrator::up(&db, None).await.expect("run migrations");

        let fal = FalClient::new(
            stub_url,
            Some("test-key".to_string()),
            "fal-ai/nano-banana/edit".to_string(),
            1,
            "jpeg".to_string(),
            Duration::from_secs(5),
        );

        let app = create_routes(AppState {
            db: db.clone(),
            fal,
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind app listener");
        let base_url = format!("http://{}", listener.local_addr().expect("app addr"));
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve app");
        });

        TestApp {
            base_url,
            db,
            client: reqwest::Client::new(),
            fal_hits,
        }
    }

    pub fn fal_hits(&self) -> usize {
        self.fal_hits.load(Ordering::SeqCst)
    }

    pub async fn signup(&self, email: &str, password: &str, name: Option<&str>) -> Value {
        let mut body = json!({ "email": email, "password": password });
        if let Some(name) = name {
            body["name"] = json!(name);
        }
        self.signup_with(body).await
    }

    pub async fn signup_with(&self, body: Value) -> Value {
        let resp = self
            .client
            .post(format!("{}/auth/signup", self.base_url))
            .json(&body)
            .send()
            .await
            .expect("signup request");
        assert_eq!(resp.status(), 200, "signup should succeed");
        resp.json().await.expect("parse signup response")
    }

    pub async fn get(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
            .send()
            .await
            .expect("GET request")
    }

    pub async fn get_json(&self, path: &str, token: &str) -> Value {
        let resp = self.get(path, token).await;
        assert_eq!(resp.status(), 200, "GET {} should succeed", path);
        resp.json().await.expect("parse GET response")
    }

    pub async fn post(&self, path: &str, token: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("POST request")
    }

    pub async fn put(&self, path: &str, token: &str, body: &Value) -> reqwest::Response {
        self.client
            .put(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("PUT request")
    }

    pub async fn delete(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .delete(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
            .send()
            .await
            .expect("DELETE request")
    }
}

/// Builds a data URI carrying JPEG magic bytes padded with zeros to the
/// requested size. Format sniffing only reads the leading bytes.
pub fn jpeg_data_uri(total_bytes: usize) -> String {
    const JPEG_MAGIC: [u8; 11] = [
        0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00,
    ];
    let mut bytes = vec![0u8; total_bytes.max(JPEG_MAGIC.len())];
    bytes[..JPEG_MAGIC.len()].copy_from_slice(&JPEG_MAGIC);
    format!(
        "data:image/jpeg;base64,{}",
        general_purpose::STANDARD.encode(&bytes)
    )
}
