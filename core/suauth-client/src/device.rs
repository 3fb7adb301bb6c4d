//! Hardware fingerprinting for license seat counting.
//!
//! The fingerprint is the SHA-256 of a small set of host descriptors,
//! serialized as JSON with sorted keys. It approximates "this device" for seat
//! counting only; none of the descriptors survive every reinstall or VM move.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::env;
use std::fmt;

/// Host attributes that feed the fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostDescriptors {
    /// Host name.
    pub node: String,
    /// Processor description. Empty when the platform does not expose one.
    pub processor: String,
    /// Machine architecture (e.g. `x86_64`).
    pub machine: String,
    /// Operating system name (e.g. `Linux`, `Darwin`, `Windows`).
    pub system: String,
    /// Decimal 48-bit numeric host identifier.
    pub uuid: String,
}

impl HostDescriptors {
    /// Collects descriptors for the current host.
    #[must_use]
    pub fn collect() -> Self {
        Self {
            node: get_hostname(),
            processor: get_processor(),
            machine: env::consts::ARCH.to_string(),
            system: system_name(env::consts::OS),
            uuid: get_node_id().to_string(),
        }
    }

    /// Returns the descriptors as a key-sorted map.
    #[must_use]
    pub fn to_sorted_map(&self) -> BTreeMap<&'static str, &str> {
        BTreeMap::from([
            ("machine", self.machine.as_str()),
            ("node", self.node.as_str()),
            ("processor", self.processor.as_str()),
            ("system", self.system.as_str()),
            ("uuid", self.uuid.as_str()),
        ])
    }

    /// Canonical serialization: compact JSON with sorted keys.
    #[must_use]
    pub fn canonical_json(&self) -> String {
        // A map of strings always serializes.
        serde_json::to_string(&self.to_sorted_map()).unwrap_or_default()
    }
}

/// A hex-encoded SHA-256 device fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HardwareFingerprint(String);

impl HardwareFingerprint {
    /// Computes the fingerprint of the current host.
    #[must_use]
    pub fn compute() -> Self {
        Self::from_descriptors(&HostDescriptors::collect())
    }

    /// Computes the fingerprint of a given descriptor set.
    #[must_use]
    pub fn from_descriptors(descriptors: &HostDescriptors) -> Self {
        let hash = Sha256::digest(descriptors.canonical_json().as_bytes());
        Self(hex::encode(hash))
    }

    /// Returns the hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the fingerprint, returning the hex digest.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for HardwareFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps `std::env::consts::OS` to the conventional kernel name.
fn system_name(os: &str) -> String {
    match os {
        "linux" => "Linux".to_string(),
        "macos" => "Darwin".to_string(),
        "windows" => "Windows".to_string(),
        "freebsd" => "FreeBSD".to_string(),
        "netbsd" => "NetBSD".to_string(),
        "openbsd" => "OpenBSD".to_string(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

/// Gets the machine hostname.
fn get_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_default()
}

/// Gets the processor description.
fn get_processor() -> String {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/proc/cpuinfo")
            .ok()
            .and_then(|content| {
                content
                    .lines()
                    .find(|l| l.starts_with("model name"))
                    .and_then(|l| l.split_once(':'))
                    .map(|(_, v)| v.trim().to_string())
            })
            .unwrap_or_default()
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("sysctl")
            .args(["-n", "machdep.cpu.brand_string"])
            .output()
            .ok()
            .and_then(|o| String::from_utf8(o.stdout).ok())
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    }

    #[cfg(target_os = "windows")]
    {
        env::var("PROCESSOR_IDENTIFIER").unwrap_or_default()
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        String::new()
    }
}

/// Gets a stable 48-bit host identifier.
///
/// Prefers the lowest non-zero universal MAC of a physical interface, then
/// the platform machine id folded to 48 bits, then 0.
fn get_node_id() -> u64 {
    get_mac_address()
        .or_else(|| get_machine_id().map(|id| fold_to_48_bits(&id)))
        .unwrap_or(0)
}

fn fold_to_48_bits(value: &str) -> u64 {
    let hash = Sha256::digest(value.as_bytes());
    hash[..6]
        .iter()
        .fold(0u64, |acc, b| (acc << 8) | u64::from(*b))
}

/// Parses `aa:bb:cc:dd:ee:ff` into its integer value, skipping all-zero MACs.
fn parse_mac(mac: &str) -> Option<u64> {
    let hex: String = mac.trim().chars().filter(|c| *c != ':' && *c != '-').collect();
    if hex.len() != 12 {
        return None;
    }
    u64::from_str_radix(&hex, 16).ok().filter(|v| *v != 0)
}

/// True for a globally administered MAC. Bridges, veth pairs and other
/// software interfaces set the locally administered bit (`0x02` of the first
/// octet).
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn is_universal_mac(mac: u64) -> bool {
    (mac >> 40) & 0x02 == 0
}

/// Lowest universal MAC among the given candidates.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn lowest_hardware_mac<'a>(addresses: impl IntoIterator<Item = &'a str>) -> Option<u64> {
    addresses
        .into_iter()
        .filter_map(parse_mac)
        .filter(|mac| is_universal_mac(*mac))
        .min()
}

fn get_mac_address() -> Option<u64> {
    #[cfg(target_os = "linux")]
    {
        // Only interfaces backed by a physical device have a `device` link;
        // loopback, docker0, veth and tun do not.
        let entries = std::fs::read_dir("/sys/class/net").ok()?;
        let addresses: Vec<String> = entries
            .flatten()
            .filter(|entry| entry.path().join("device").exists())
            .filter_map(|entry| std::fs::read_to_string(entry.path().join("address")).ok())
            .collect();
        lowest_hardware_mac(addresses.iter().map(String::as_str))
    }

    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

/// Gets the machine ID (platform-specific unique identifier).
fn get_machine_id() -> Option<String> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("ioreg")
            .args(["-rd1", "-c", "IOPlatformExpertDevice"])
            .output()
            .ok()
            .and_then(|o| String::from_utf8(o.stdout).ok())
            .and_then(|output| {
                output
                    .lines()
                    .find(|l| l.contains("IOPlatformUUID"))
                    .and_then(|l| l.split('"').nth(3))
                    .map(String::from)
            })
    }

    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/etc/machine-id")
            .or_else(|_| std::fs::read_to_string("/var/lib/dbus/machine-id"))
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("reg")
            .args([
                "query",
                r"HKLM\SOFTWARE\Microsoft\Cryptography",
                "/v",
                "MachineGuid",
            ])
            .output()
            .ok()
            .and_then(|o| String::from_utf8(o.stdout).ok())
            .and_then(|output| {
                output
                    .lines()
                    .find(|l| l.contains("MachineGuid"))
                    .and_then(|l| l.split_whitespace().last())
                    .map(String::from)
            })
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
    {
        None
    }
}
