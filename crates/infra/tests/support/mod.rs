//! Shared fixtures for `pvekit-infra` integration tests.

#![allow(dead_code)]

use pvekit_domain::ClientConfig;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TICKET_PATH: &str = "/api2/json/access/ticket";
pub const CSRF_TOKEN: &str = "65F0A1B2:csrf-token";

pub fn ticket_body(ticket: &str) -> Value {
    json!({
        "data": {
            "ticket": ticket,
            "CSRFPreventionToken": CSRF_TOKEN,
            "username": "root@pam",
            "cap": {}
        }
    })
}

pub fn config_for(server: &MockServer) -> ClientConfig {
    let mut config = ClientConfig::new(server.uri(), "root@pam", "s3cret");
    config.timeout_secs = 5;
    config
}

/// Mount a login endpoint that answers every call with `ticket`.
pub async fn mount_login(server: &MockServer, ticket: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path(TICKET_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(ticket_body(ticket)))
        .expect(expected_calls)
        .mount(server)
        .await;
}

pub fn data(value: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "data": value }))
}
