//! Wire types and the normalized validation result.

use crate::config::ClientConfig;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Message for a missing license key.
pub const MISSING_KEY_MESSAGE: &str = "License key is required";

/// Message for a license whose expiration has passed.
pub const EXPIRED_MESSAGE: &str = "License has expired";

/// Body of `POST /api/validate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRequest {
    pub license_key: String,
    pub hwid: String,
    pub owner_id: String,
    pub app_id: String,
    pub app_name: String,
}

impl ValidationRequest {
    /// Builds a request carrying the client's identity.
    pub fn new(license_key: impl Into<String>, hwid: impl Into<String>, config: &ClientConfig) -> Self {
        Self {
            license_key: license_key.into(),
            hwid: hwid.into(),
            owner_id: config.owner_id.clone(),
            app_id: config.app_id.clone(),
            app_name: config.app_name.clone(),
        }
    }
}

/// Python-style truthiness, the way servers and older SDKs read `success`.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Read-only view of a server license object.
///
/// Every field is optional; values of an unexpected type read as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LicenseInfo {
    pub key: Option<String>,
    pub status: Option<String>,
    /// ISO-8601 expiration; `None` means the license never expires.
    pub expires_at: Option<String>,
    pub hwid_limit: Option<u64>,
    /// Registered device fingerprints, in registration order.
    pub hwids: Vec<String>,
}

impl LicenseInfo {
    /// Reads the known fields out of a license object.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let text = |field: &str| value.get(field).and_then(Value::as_str).map(str::to_string);
        Self {
            key: text("key"),
            status: text("status"),
            expires_at: text("expires_at"),
            hwid_limit: value.get("hwid_limit").and_then(Value::as_u64),
            hwids: value
                .get("hwids")
                .and_then(Value::as_array)
                .map(|ids| ids.iter().filter_map(Value::as_str).map(str::to_string).collect())
                .unwrap_or_default(),
        }
    }

    /// Maximum number of registered devices; 1 when unspecified.
    #[must_use]
    pub fn hwid_limit(&self) -> u64 {
        self.hwid_limit.unwrap_or(1)
    }

    /// Returns the expiration if one is set and non-empty.
    #[must_use]
    pub fn expiration(&self) -> Option<&str> {
        self.expires_at.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// A decoded response body from the validation endpoint, kept exactly as sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerResponse(Map<String, Value>);

impl ServerResponse {
    /// The server's verdict. Absent or falsy counts as failure.
    #[must_use]
    pub fn success(&self) -> bool {
        self.0.get("success").is_some_and(is_truthy)
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.0.get("message").and_then(Value::as_str)
    }

    /// The `license` value as received, if present.
    #[must_use]
    pub fn license_value(&self) -> Option<&Value> {
        self.0.get("license")
    }

    /// A lenient view of the license object, if one was sent.
    #[must_use]
    pub fn license(&self) -> Option<LicenseInfo> {
        self.license_value()
            .filter(|v| v.is_object())
            .map(LicenseInfo::from_value)
    }

    /// The raw body.
    #[must_use]
    pub fn body(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for ServerResponse {
    fn from(body: Map<String, Value>) -> Self {
        Self(body)
    }
}

/// Discriminant of a [`ValidationResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    /// Server accepted the key and it has not expired.
    Valid,
    /// Empty key, rejected before any network activity.
    MissingKey,
    /// Server reported `success: false`.
    Rejected,
    /// Server accepted the key but its expiration has passed.
    Expired,
    /// Connection error, timeout, or non-2xx status.
    TransportFailed,
    /// Response body or timestamp could not be interpreted.
    Malformed,
}

/// Outcome of a single validation call.
///
/// Serializes to the uniform shape `{success, message?, expired?, license?}`.
/// `Valid` and `Rejected` serialize as the server's body.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    Valid(ServerResponse),
    MissingKey,
    Rejected(ServerResponse),
    Expired { license: Value },
    TransportFailed { detail: String },
    Malformed { detail: String },
}

impl ValidationResult {
    /// Returns the discriminant.
    #[must_use]
    pub fn kind(&self) -> ResultKind {
        match self {
            Self::Valid(_) => ResultKind::Valid,
            Self::MissingKey => ResultKind::MissingKey,
            Self::Rejected(_) => ResultKind::Rejected,
            Self::Expired { .. } => ResultKind::Expired,
            Self::TransportFailed { .. } => ResultKind::TransportFailed,
            Self::Malformed { .. } => ResultKind::Malformed,
        }
    }

    /// Returns true only for [`ValidationResult::Valid`].
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// The `success` flag of the uniform shape.
    #[must_use]
    pub fn success(&self) -> bool {
        self.is_valid()
    }

    /// Returns true only for [`ValidationResult::Expired`].
    #[must_use]
    pub fn expired(&self) -> bool {
        matches!(self, Self::Expired { .. })
    }

    /// The `message` of the uniform shape.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Valid(response) | Self::Rejected(response) => {
                response.message().map(str::to_string)
            }
            Self::MissingKey => Some(MISSING_KEY_MESSAGE.to_string()),
            Self::Expired { .. } => Some(EXPIRED_MESSAGE.to_string()),
            Self::TransportFailed { detail } => Some(format!("Request failed: {detail}")),
            Self::Malformed { detail } => Some(format!("Validation error: {detail}")),
        }
    }

    /// A view of the license object, when the server sent one.
    #[must_use]
    pub fn license(&self) -> Option<LicenseInfo> {
        match self {
            Self::Valid(response) | Self::Rejected(response) => response.license(),
            Self::Expired { license } if license.is_object() => Some(LicenseInfo::from_value(license)),
            _ => None,
        }
    }

    /// Renders the uniform shape as a JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Serialize for ValidationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Valid(response) | Self::Rejected(response) => response.serialize(serializer),
            Self::Expired { license } => {
                let mut map = serializer.serialize_map(Some(4))?;
                map.serialize_entry("success", &false)?;
                map.serialize_entry("message", EXPIRED_MESSAGE)?;
                map.serialize_entry("expired", &true)?;
                map.serialize_entry("license", license)?;
                map.end()
            }
            _ => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("success", &false)?;
                map.serialize_entry("message", &self.message())?;
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn license_view_defaults_hwid_limit_to_one() {
        let license = LicenseInfo::from_value(&json!({"key": "K", "status": "active"}));
        assert_eq!(license.hwid_limit(), 1);
        assert!(license.hwids.is_empty());
        assert_eq!(license.expiration(), None);
    }

    #[test]
    fn license_view_ignores_unexpected_types() {
        let license = LicenseInfo::from_value(&json!({
            "key": null,
            "status": 7,
            "hwid_limit": "two",
            "hwids": ["a", 1, "b"],
        }));
        assert_eq!(license.key, None);
        assert_eq!(license.status, None);
        assert_eq!(license.hwid_limit(), 1);
        assert_eq!(license.hwids, vec!["a", "b"]);
    }

    #[test]
    fn blank_expiration_means_never() {
        let license = LicenseInfo::from_value(&json!({"key": "K", "expires_at": "  "}));
        assert_eq!(license.expiration(), None);
    }

    #[test]
    fn success_is_truthy() {
        let read = |body: Value| serde_json::from_value::<ServerResponse>(body).unwrap().success();
        assert!(!read(json!({"message": "nope"})));
        assert!(!read(json!({"success": false})));
        assert!(!read(json!({"success": 0})));
        assert!(!read(json!({"success": ""})));
        assert!(read(json!({"success": true})));
        assert!(read(json!({"success": 1})));
        assert!(read(json!({"success": "yes"})));
    }

    #[test]
    fn non_object_body_is_rejected() {
        assert!(serde_json::from_str::<ServerResponse>("[1, 2]").is_err());
    }

    #[test]
    fn kinds_match_variants() {
        assert_eq!(ValidationResult::MissingKey.kind(), ResultKind::MissingKey);
        assert_eq!(
            ValidationResult::Malformed { detail: "x".into() }.kind(),
            ResultKind::Malformed
        );
    }
}
