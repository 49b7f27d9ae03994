#![allow(dead_code)]

use anyhow::{Context, Result};
use axum::body::{self, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::util::ServiceExt; // for `oneshot`

use team_dashboard::config::{AppConfig, ResetCodePolicy};
use team_dashboard::{bootstrap, create_app, AppState};

pub const ADMIN: (&str, &str) = ("admin@qa-team.com", "admin123");
pub const LEAD: (&str, &str) = ("lead@qa-team.com", "lead123");
pub const ANALYST: (&str, &str) = ("analyst@qa-team.com", "analyst123");

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    // kept alive so the data directory outlives the test
    pub dir: TempDir,
}

pub async fn spawn_app() -> Result<TestApp> {
    spawn_app_with(ResetCodePolicy::AcceptAny).await
}

/// Seeded, reconciled app over a fresh temp data directory.
pub async fn spawn_app_with(reset_code_policy: ResetCodePolicy) -> Result<TestApp> {
    let dir = tempdir().context("failed to create tempdir")?;
    let config = AppConfig {
        data_dir: dir.path().join("data"),
        reset_code_policy,
        ..AppConfig::default()
    };

    let state = bootstrap(config).await?;
    let router = create_app(state.clone());

    Ok(TestApp { router, state, dir })
}

impl TestApp {
    pub async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }

        let req = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))?,
            None => builder.body(Body::empty())?,
        };

        let resp = self.router.clone().oneshot(req).await?;
        let status = resp.status();
        let bytes = body::to_bytes(resp.into_body(), 10_485_760).await?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).with_context(|| format!("non-JSON body from {uri}"))?
        };

        Ok((status, value))
    }

    pub async fn get(&self, uri: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::PUT, uri, Some(token), Some(body)).await
    }

    /// Logs in and returns the bearer token, failing the test on anything but 200.
    pub async fn login(&self, (email, password): (&str, &str)) -> Result<String> {
        let (status, body) = self
            .post("/api/auth/login", None, json!({ "email": email, "password": password }))
            .await?;
        anyhow::ensure!(status == StatusCode::OK, "login as {email} failed: {status} {body}");

        body["token"]
            .as_str()
            .map(str::to_string)
            .context("login response has no token")
    }
}
