//! Shared fixtures for the client integration tests.

#![allow(dead_code)]

use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use wiremock::MockServer;

use sapore_client::{ApiClient, ClientConfig, Session};

/// A token signed the way the backend signs them.
pub fn issue_token(sub: &str) -> String {
    let claims = json!({
        "sub": sub,
        "name": "Ana Souza",
        "role": "ADMIN",
        "exp": 4_102_444_800i64,
    });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(b"backend-secret")).unwrap()
}

/// A client pointed at the mock server, with no one logged in.
pub fn anonymous_client(server: &MockServer) -> ApiClient {
    let mut config = ClientConfig::default();
    config.api.base_url = server.uri();
    config.api.timeout_secs = 5;
    ApiClient::new(&config, Session::in_memory()).unwrap()
}

/// A client pointed at the mock server, logged in. Returns the token too.
pub fn logged_in_client(server: &MockServer) -> (ApiClient, String) {
    let client = anonymous_client(server);
    let token = issue_token("ana@santsapore.com.br");
    client.session().set_token(&token).unwrap();
    (client, token)
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
