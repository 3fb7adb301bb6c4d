//! License validation client for SuAuth.
//!
//! This crate handles:
//! - Hardware fingerprinting for seat counting
//! - A single validation round trip against `{base_url}/api/validate`
//! - Client-side re-check of the license expiration
//! - Normalizing every outcome into one tagged [`ValidationResult`]
//!
//! # Example
//!
//! ```no_run
//! use suauth_client::{ClientConfig, ValidationClient};
//!
//! let config = ClientConfig::new("owner", "app", "MyApp", "1.0.0");
//! let client = ValidationClient::new(config)?;
//! let result = client.validate("AAAA-BBBB-CCCC");
//! if result.is_valid() {
//!     println!("licensed");
//! }
//! # Ok::<(), suauth_client::ClientError>(())
//! ```

mod client;
mod config;
mod device;
mod error;
mod expiry;
mod response;

pub use client::{ValidationClient, VALIDATE_ENDPOINT};
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, SDK_NAME};
pub use device::{HardwareFingerprint, HostDescriptors};
pub use error::{ClientError, ClientResult};
pub use expiry::ExpiresAt;
pub use response::{
    LicenseInfo, ResultKind, ServerResponse, ValidationRequest, ValidationResult,
    EXPIRED_MESSAGE, MISSING_KEY_MESSAGE,
};
