#![allow(dead_code)]

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{header, StatusCode};
use actix_web::{test, web};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use taskvault::config::{Config, Environment};
use taskvault::create_app;
use taskvault::routes::API_PREFIX;
use taskvault::state::AppState;
use taskvault::store::{MemoryStore, Store};

pub const TEST_SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "Password123!";

pub fn test_config() -> Config {
    Config {
        database_url: None,
        server_port: 0,
        server_host: "127.0.0.1".to_string(),
        jwt_secret: TEST_SECRET.to_string(),
        jwt_expires_in: Duration::from_secs(15 * 60),
        // Lowest bcrypt cost keeps the suite fast.
        bcrypt_cost: 4,
        environment: Environment::Production,
        cors_origins: Vec::new(),
    }
}

pub fn state_with(store: Arc<dyn Store>, config: Config) -> web::Data<AppState> {
    web::Data::new(AppState::new(config, store))
}

pub fn test_state() -> web::Data<AppState> {
    state_with(Arc::new(MemoryStore::new()), test_config())
}

pub async fn test_app(
    state: web::Data<AppState>,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    test::init_service(create_app(state)).await
}

pub fn api(path: &str) -> String {
    format!("{}{}", API_PREFIX, path)
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

/// Calls the service and returns the status with the body parsed as JSON.
pub async fn send<S, B>(app: &S, req: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let json = serde_json::from_slice(&body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()));
    (status, json)
}

pub struct TestUser {
    pub id: i64,
    pub token: String,
}

pub async fn signup_user<S, B>(app: &S, name: &str, email: &str) -> TestUser
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri(&api("/auth/signup"))
        .set_json(json!({
            "name": name,
            "email": email,
            "password": PASSWORD,
            "confirmPassword": PASSWORD
        }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {}", body);

    TestUser {
        id: body["data"]["id"].as_i64().expect("user id"),
        token: body["token"].as_str().expect("token").to_string(),
    }
}
