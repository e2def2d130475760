#![allow(dead_code)]

use anyhow::{Context, Result};
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use readlog_api::app::{router, AppState};
use readlog_api::config::AppConfig;
use readlog_api::database::DatabaseManager;

/// In-process server bound to a free port, backed by the database named in
/// `DATABASE_URL`.
pub struct TestApp {
    pub base_url: String,
    client: reqwest::Client,
}

/// A freshly registered account
pub struct TestUser {
    pub id: i64,
    pub username: String,
    pub token: String,
}

impl TestApp {
    /// Start a server, or return `None` when no database is configured so
    /// database-backed tests skip instead of failing.
    pub async fn spawn() -> Result<Option<Self>> {
        let _ = dotenvy::dotenv();
        let Ok(database_url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set; skipping database test");
            return Ok(None);
        };

        let mut config = AppConfig::development();
        config.database.url = database_url;
        config.database.max_connections = 5;
        config.security.jwt_secret = "integration-test-secret".to_string();

        let pool = DatabaseManager::connect(&config.database).await?;
        DatabaseManager::migrate(&pool).await?;

        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = TcpListener::bind(("127.0.0.1", port)).await?;
        let app = router(AppState::new(pool, config));
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("test server stopped: {e}");
            }
        });

        Ok(Some(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            client: reqwest::Client::new(),
        }))
    }

    pub async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut request = self.client.request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = token {
            request = request.header("x-auth-token", token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let value = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).with_context(|| format!("non-JSON response: {text}"))?
        };
        Ok((status, value))
    }

    pub async fn get(&self, path: &str, user: &TestUser) -> Result<(StatusCode, Value)> {
        self.send(Method::GET, path, Some(&user.token), None).await
    }

    pub async fn post(&self, path: &str, user: &TestUser, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, path, Some(&user.token), Some(body)).await
    }

    pub async fn patch(&self, path: &str, user: &TestUser, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::PATCH, path, Some(&user.token), Some(body)).await
    }

    pub async fn delete(&self, path: &str, user: &TestUser) -> Result<(StatusCode, Value)> {
        self.send(Method::DELETE, path, Some(&user.token), None).await
    }

    /// Register a user with a unique name and resolve its id via whoami
    pub async fn register(&self, prefix: &str) -> Result<TestUser> {
        let username = unique(prefix);
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({ "username": username, "password": "pw123456" })),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "register failed: {status} {body}");

        let token = body["token"].as_str().context("missing token")?.to_string();
        let (status, me) = self
            .send(Method::GET, "/api/auth/whoami", Some(&token), None)
            .await?;
        anyhow::ensure!(status == StatusCode::OK, "whoami failed: {status} {me}");
        let id = me["id"].as_i64().context("missing id")?;

        Ok(TestUser { id, username, token })
    }

    /// Add a catalog read with a unique isbn
    pub async fn create_read(&self, user: &TestUser, title: &str, pages: i64) -> Result<Value> {
        let (status, body) = self
            .post(
                "/api/reads",
                user,
                json!({ "title": title, "isbn": unique("isbn"), "pages": pages }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create read failed: {status} {body}");
        Ok(body)
    }
}

/// `prefix` plus a random suffix, short enough for the username limit
pub fn unique(prefix: &str) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}_{}", prefix, &suffix[..12])
}
