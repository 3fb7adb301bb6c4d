//! The validation client.

use crate::config::ClientConfig;
use crate::device::HardwareFingerprint;
use crate::error::{ClientError, ClientResult};
use crate::expiry::ExpiresAt;
use crate::response::{ServerResponse, ValidationRequest, ValidationResult};
use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, Response};
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Path of the validation endpoint, relative to `{base_url}/api/`.
pub const VALIDATE_ENDPOINT: &str = "validate";

/// Validates license keys against a SuAuth server.
///
/// Holds an immutable config and a pooled HTTP session. Every call is
/// independent; the client is `Send + Sync` and can be shared across threads.
#[derive(Debug, Clone)]
pub struct ValidationClient {
    config: ClientConfig,
    http: Client,
}

impl ValidationClient {
    /// Creates a client. Performs no network activity.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP session cannot be built (e.g. the app name
    /// is not a valid header value).
    pub fn new(mut config: ClientConfig) -> ClientResult<Self> {
        config.base_url = config.normalized_base_url().to_string();

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        let http = Client::builder()
            .user_agent(config.user_agent())
            .default_headers(headers)
            .timeout(config.timeout())
            .build()?;

        Ok(Self { config, http })
    }

    /// Returns the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Computes this machine's hardware fingerprint.
    #[must_use]
    pub fn hardware_id(&self) -> HardwareFingerprint {
        HardwareFingerprint::compute()
    }

    /// Validates a license key for this machine.
    pub fn validate(&self, license_key: &str) -> ValidationResult {
        self.validate_with_hwid(license_key, None)
    }

    /// Validates a license key for the given device fingerprint, or for this
    /// machine when `hwid` is `None` or empty.
    pub fn validate_with_hwid(&self, license_key: &str, hwid: Option<&str>) -> ValidationResult {
        if license_key.trim().is_empty() {
            return ValidationResult::MissingKey;
        }

        let hwid = match hwid.filter(|h| !h.is_empty()) {
            Some(hwid) => hwid.to_string(),
            None => self.hardware_id().into_string(),
        };
        let request = ValidationRequest::new(license_key, hwid, &self.config);

        let body = match self.post(VALIDATE_ENDPOINT, &request) {
            Ok(body) => body,
            Err(failure) => {
                warn!("License validation request failed: {}", failure.detail);
                return ValidationResult::TransportFailed {
                    detail: failure.detail,
                };
            }
        };

        interpret(&body, Utc::now()).unwrap_or_else(|e| ValidationResult::Malformed {
            detail: e.to_string(),
        })
    }

    /// Sends a JSON POST to `{base_url}/api/{endpoint}` and returns the body
    /// of a 2xx response.
    fn post<T: Serialize>(&self, endpoint: &str, body: &T) -> Result<String, TransportFailure> {
        let url = format!("{}/api/{endpoint}", self.config.base_url);
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .map_err(|e| TransportFailure::from_error(&e))?;

        let status = response.status();
        debug!("{} responded with {}", url, status);

        if let Some(e) = response.error_for_status_ref().err() {
            return Err(TransportFailure::from_response(response, &e));
        }

        response.text().map_err(|e| TransportFailure::from_error(&e))
    }
}

/// A failed round trip with its best available diagnostic.
#[derive(Debug)]
struct TransportFailure {
    detail: String,
}

impl TransportFailure {
    fn from_error(error: &reqwest::Error) -> Self {
        Self {
            detail: error.to_string(),
        }
    }

    fn from_response(response: Response, error: &reqwest::Error) -> Self {
        let body = response.text().ok();
        Self {
            detail: best_error_message(body.as_deref(), &error.to_string()),
        }
    }
}

/// Picks the first available diagnostic: the JSON body's `message`, then the
/// raw body text, then the transport description.
fn best_error_message(body: Option<&str>, transport: &str) -> String {
    body.and_then(json_message)
        .or_else(|| raw_text(body))
        .unwrap_or_else(|| transport.to_string())
}

fn json_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value.get("message")?.as_str().map(str::to_string)
}

fn raw_text(body: Option<&str>) -> Option<String> {
    body.filter(|b| !b.trim().is_empty()).map(str::to_string)
}

/// Reads `license.expires_at`, treating a missing, null or empty value as
/// "never expires".
fn expiration(response: &ServerResponse) -> ClientResult<Option<ExpiresAt>> {
    match response.license_value().and_then(|l| l.get("expires_at")) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) if raw.trim().is_empty() => Ok(None),
        Some(Value::String(raw)) => ExpiresAt::parse(raw).map(Some),
        Some(other) => Err(ClientError::InvalidTimestamp {
            value: other.to_string(),
            reason: "expected a string".to_string(),
        }),
    }
}

/// Decodes a 2xx body and applies the client-side expiration re-check.
fn interpret(body: &str, now: DateTime<Utc>) -> ClientResult<ValidationResult> {
    let response: ServerResponse = serde_json::from_str(body)?;

    if !response.success() {
        debug!("Server rejected license: {:?}", response.message());
        return Ok(ValidationResult::Rejected(response));
    }

    match expiration(&response)? {
        Some(expires) if expires.has_passed_at(now) => {
            warn!("Server accepted license but it expired at {:?}", expires);
            let license = response.license_value().cloned().unwrap_or(Value::Null);
            Ok(ValidationResult::Expired { license })
        }
        _ => Ok(ValidationResult::Valid(response)),
    }
}
