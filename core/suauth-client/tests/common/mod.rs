//! Shared test helpers for client tests.

#![allow(dead_code)]

use serde_json::{json, Value};
use suauth_client::{ClientConfig, ValidationClient, ValidationResult};

pub const OWNER_ID: &str = "68a73ab4127fbc8d4d9c51aa";
pub const APP_ID: &str = "68a74291127fbc8d4d9c51ab";
pub const APP_NAME: &str = "Test";
pub const USER_AGENT: &str = "Test/1.0.0 (Rust SDK)";

/// Returns a config pointing at `base_url`.
pub fn test_config(base_url: &str) -> ClientConfig {
    ClientConfig::new(OWNER_ID, APP_ID, APP_NAME, "1.0.0").with_base_url(base_url)
}

/// Builds a successful server body with the given `expires_at`.
pub fn active_license_body(expires_at: Value) -> Value {
    json!({
        "success": true,
        "license": {
            "id": "68a7430f127fbc8d4d9c51ac",
            "key": "ABCD-EFGH-IJKL-MNOP",
            "status": "active",
            "expires_at": expires_at,
            "created_at": "2025-08-21T12:00:00.000Z",
            "hwid_limit": 2,
            "hwids": ["device-one", "device-two"],
            "app_name": APP_NAME,
            "app_id": APP_ID,
        }
    })
}

/// Runs a validation on the blocking pool so the blocking HTTP client never
/// touches the test runtime.
pub async fn validate_blocking(
    config: ClientConfig,
    license_key: &str,
    hwid: Option<&str>,
) -> ValidationResult {
    let license_key = license_key.to_string();
    let hwid = hwid.map(str::to_string);
    tokio::task::spawn_blocking(move || {
        let client = ValidationClient::new(config).unwrap();
        client.validate_with_hwid(&license_key, hwid.as_deref())
    })
    .await
    .unwrap()
}

/// Returns a base URL on which nothing is listening.
pub fn refused_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}
