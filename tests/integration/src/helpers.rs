//! Test helpers for integration tests
//!
//! [`TestApp`] owns a router over the in-process backends and sends requests
//! through it with `tower::ServiceExt::oneshot`.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde::{de::DeserializeOwned, Serialize};
use streak_api::middleware::REQUEST_ID_HEADER;
use streak_api::{create_app, create_app_state, AppState};
use streak_common::AppConfig;
use streak_core::memory::{FixedClock, MemoryEventLog, MemoryLeaderboard, MemoryUserRecordRepository};
use streak_service::{IoPolicy, ServiceContextBuilder};
use tower::ServiceExt;

use crate::fixtures::day;

/// Router plus handles on the backends the tests inspect directly
pub struct TestApp {
    pub router: Router,
    pub clock: Arc<FixedClock>,
    pub index: Arc<MemoryLeaderboard>,
    pub stream: Arc<MemoryEventLog>,
}

/// Status and parsed JSON body of one response
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub request_id: Option<String>,
    pub body: serde_json::Value,
}

impl TestResponse {
    /// Error code of a JSON error body, if any
    pub fn error_code(&self) -> Option<&str> {
        self.body["error"]["code"].as_str()
    }

    /// Deserialize the body after checking the status
    pub fn json<T: DeserializeOwned>(self, expected: StatusCode) -> Result<T> {
        if self.status != expected {
            anyhow::bail!(
                "Expected status {}, got {}. Body: {}",
                expected,
                self.status,
                self.body
            );
        }
        Ok(serde_json::from_value(self.body)?)
    }
}

impl TestApp {
    /// In-process app with a clock pinned to the first test day
    pub fn new() -> Result<Self> {
        Self::with_config(test_config(&[])?)
    }

    /// In-process app over `config`'s policy and leaderboard limits
    pub fn with_config(config: AppConfig) -> Result<Self> {
        let clock = Arc::new(FixedClock::new(day(1)));
        let index = Arc::new(MemoryLeaderboard::new());
        let stream = Arc::new(MemoryEventLog::new());

        let ctx = ServiceContextBuilder::new()
            .records(Arc::new(MemoryUserRecordRepository::new()))
            .index(index.clone())
            .publisher(stream.clone())
            .event_log(stream.clone())
            .clock(clock.clone())
            .policy(IoPolicy::from(&config.checkin))
            .leaderboard(config.leaderboard.clone())
            .build()?;

        Ok(Self {
            router: create_app(AppState::new(ctx, config)),
            clock,
            index,
            stream,
        })
    }

    pub async fn get(&self, path: &str) -> Result<TestResponse> {
        self.send(Method::GET, path, None::<&()>).await
    }

    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<TestResponse> {
        self.send(Method::POST, path, Some(body)).await
    }

    /// POST without a body
    pub async fn post_empty(&self, path: &str) -> Result<TestResponse> {
        self.send(Method::POST, path, None::<&()>).await
    }

    pub async fn put<T: Serialize>(&self, path: &str, body: &T) -> Result<TestResponse> {
        self.send(Method::PUT, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<TestResponse> {
        self.send(Method::DELETE, path, None::<&()>).await
    }

    /// Send a raw body with a JSON content type
    pub async fn post_raw(&self, path: &str, body: &'static str) -> Result<TestResponse> {
        let request = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))?;
        dispatch(self.router.clone(), request).await
    }

    async fn send<T: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&T>,
    ) -> Result<TestResponse> {
        dispatch(self.router.clone(), build_request(method, path, body)?).await
    }
}

/// Build a request, with a JSON body when one is given
pub fn build_request<T: Serialize>(
    method: Method,
    path: &str,
    body: Option<&T>,
) -> Result<Request<Body>> {
    let builder = Request::builder().method(method).uri(path);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(body)?))?,
        None => builder.body(Body::empty())?,
    };
    Ok(request)
}

/// Run one request through `router` and collect the JSON body
pub async fn dispatch(router: Router, request: Request<Body>) -> Result<TestResponse> {
    let response = router.oneshot(request).await?;
    let status = response.status();
    let request_id = response
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = response.into_body().collect().await?.to_bytes();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok(TestResponse {
        status,
        request_id,
        body,
    })
}

/// In-memory configuration with fast retries, plus `overrides`
pub fn test_config(overrides: &[(&str, &str)]) -> Result<AppConfig> {
    let mut vars: HashMap<String, String> = [
        ("STORAGE_BACKEND", "memory"),
        ("API_PORT", "0"),
        ("CHECKIN_RETRY_BASE_DELAY_MS", "1"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    for (k, v) in overrides {
        vars.insert((*k).to_string(), (*v).to_string());
    }

    AppConfig::from_lookup(|key| vars.get(key).cloned())
        .map_err(|e| anyhow::anyhow!("Config error: {e}"))
}

/// Router built by the production wiring path, memory backend
pub async fn wired_router() -> Result<Router> {
    let state = create_app_state(test_config(&[])?).await?;
    Ok(create_app(state))
}

/// Helper to check if the Postgres + Redis environment is available
pub fn check_test_env() -> bool {
    dotenvy::dotenv().ok();
    for var in ["DATABASE_URL", "REDIS_URL"] {
        if std::env::var(var).is_err() {
            eprintln!("Skipping test: {var} not set");
            return false;
        }
    }
    true
}
