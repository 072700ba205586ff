//! Shared fixtures for the console integration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use wiremock::MockServer;

use sapore_client::{ClientConfig, Session};
use sapore_console::state::AppContext;

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
}

pub fn issue_token(sub: &str) -> String {
    let claims = json!({
        "sub": sub,
        "name": "Ana Souza",
        "role": "ADMIN",
        "exp": 4_102_444_800i64,
    });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(b"backend-secret")).unwrap()
}

pub fn config_for(server: &MockServer) -> ClientConfig {
    let mut config = ClientConfig::default();
    config.api.base_url = server.uri();
    config.api.timeout_secs = 5;
    config.search.debounce_ms = 50;
    config
}

/// A context pointed at the mock server, with no one logged in.
pub fn anonymous_context(server: &MockServer) -> AppContext {
    AppContext::new(config_for(server), Session::in_memory()).unwrap()
}

/// A context pointed at the mock server, logged in as Ana.
pub fn logged_in_context(server: &MockServer) -> AppContext {
    let ctx = anonymous_context(server);
    ctx.client
        .session()
        .set_token(&issue_token("ana@santsapore.com.br"))
        .unwrap();
    ctx
}

pub fn product_json(id: u64, name: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "category": "Doces",
        "yield": 10,
        "pricingStatus": status,
        "ingredients": []
    })
}
