use suauth_client::{HardwareFingerprint, HostDescriptors};

fn fixed_descriptors() -> HostDescriptors {
    HostDescriptors {
        node: "build-box".to_string(),
        processor: "Intel(R) Xeon(R) CPU @ 2.20GHz".to_string(),
        machine: "x86_64".to_string(),
        system: "Linux".to_string(),
        uuid: "52543209867".to_string(),
    }
}

#[test]
fn host_descriptors_collection() {
    let info = HostDescriptors::collect();
    assert!(!info.machine.is_empty());
    assert!(!info.system.is_empty());
    assert!(info.uuid.parse::<u64>().is_ok());
}

#[test]
fn canonical_json_sorts_keys() {
    let json = fixed_descriptors().canonical_json();
    let positions: Vec<usize> = ["\"machine\"", "\"node\"", "\"processor\"", "\"system\"", "\"uuid\""]
        .iter()
        .map(|k| json.find(k).unwrap())
        .collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);
}

#[test]
fn fingerprint_is_sha256_hex() {
    let fp = HardwareFingerprint::from_descriptors(&fixed_descriptors());
    assert_eq!(fp.as_str().len(), 64);
    assert!(fp
        .as_str()
        .chars()
        .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
}

#[test]
fn fingerprint_is_deterministic_for_fixed_host() {
    let a = HardwareFingerprint::from_descriptors(&fixed_descriptors());
    let b = HardwareFingerprint::from_descriptors(&fixed_descriptors());
    assert_eq!(a, b);
}

#[test]
fn fingerprint_changes_with_any_descriptor() {
    let base = HardwareFingerprint::from_descriptors(&fixed_descriptors());

    let mut renamed = fixed_descriptors();
    renamed.node = "other-box".to_string();
    assert_ne!(HardwareFingerprint::from_descriptors(&renamed), base);

    let mut other_nic = fixed_descriptors();
    other_nic.uuid = "1".to_string();
    assert_ne!(HardwareFingerprint::from_descriptors(&other_nic), base);
}

#[test]
fn fingerprint_stability() {
    let fp1 = HardwareFingerprint::compute();
    let fp2 = HardwareFingerprint::compute();
    assert_eq!(fp1, fp2);
    assert_eq!(fp1.to_string(), fp1.as_str());
}

#[test]
fn fingerprint_serializes_as_plain_string() {
    let fp = HardwareFingerprint::from_descriptors(&fixed_descriptors());
    let json = serde_json::to_string(&fp).unwrap();
    assert_eq!(json, format!("\"{}\"", fp.as_str()));
}
