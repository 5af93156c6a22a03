#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use bastion::bastion_config::{
    AppConfig, AuthConfig, CorsConfig, DatabaseConfig, Environment, JwtConfig, RateLimitConfig,
    ServerConfig,
};
use bastion::bastion_db::MemoryUserStore;
use bastion::router::init_router;
use bastion::state::AppState;

pub const TEST_SECRET: &str = "integration-test-secret-key-32-chars-min";
pub const PASSWORD: &str = "SecurePass123";

pub fn test_config(environment: Environment, rate_limit: RateLimitConfig) -> AppConfig {
    AppConfig {
        environment,
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            run_migrations: false,
        },
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            access_token_ttl_secs: 24 * 60 * 60,
        },
        auth: AuthConfig {
            bcrypt_cost: 4,
            password_reset_ttl_secs: 15 * 60,
        },
        cors: CorsConfig::default(),
        rate_limit,
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryUserStore>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with(Environment::Development, RateLimitConfig::disabled())
    }

    pub fn production() -> Self {
        Self::with(Environment::Production, RateLimitConfig::disabled())
    }

    pub fn with(environment: Environment, rate_limit: RateLimitConfig) -> Self {
        let store = Arc::new(MemoryUserStore::new());
        let config = test_config(environment, rate_limit);
        let state = AppState::new(&config, store.clone(), None).unwrap();
        Self {
            router: init_router(state),
            store,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = self.send(json_request(uri, &body)).await;
        let status = response.status();
        (status, body_json(response).await)
    }

    pub async fn get_with_token(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let response = self.send(request).await;
        let status = response.status();
        (status, body_json(response).await)
    }

    pub async fn post_with_token(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let response = self.send(request).await;
        let status = response.status();
        (status, body_json(response).await)
    }

    /// Registers `email` with [`PASSWORD`] and returns the response body.
    pub async fn register(&self, email: &str) -> Value {
        let (status, body) = self
            .post_json(
                "/auth/register",
                json!({ "name": "Jane Doe", "email": email, "password": PASSWORD }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        body
    }

    pub async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.post_json(
            "/auth/login",
            json!({ "email": email, "password": password }),
        )
        .await
    }
}

pub fn json_request(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

pub fn unique_email(prefix: &str) -> String {
    use std::sync::atomic::{AtomicUsize, Ordering};
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    format!("{prefix}-{}@example.com", COUNTER.fetch_add(1, Ordering::SeqCst))
}
