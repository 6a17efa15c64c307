use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a rule result.
///
/// Identity fields:
/// - rule_id
/// - verdict
/// - unit keys, in report order
pub fn fingerprint_for_result(rule_id: &str, verdict: &str, unit_keys: &[&str]) -> String {
    let mut parts = vec![rule_id, verdict];
    parts.extend_from_slice(unit_keys);
    let canonical = parts.join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_stable_and_identity_sensitive() {
        let a = fingerprint_for_result("R304", "matched", &["task:1"]);
        let b = fingerprint_for_result("R304", "matched", &["task:1"]);
        let c = fingerprint_for_result("R304", "matched", &["task:2"]);
        let d = fingerprint_for_result("R304", "clear", &["task:1"]);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert_eq!(a.len(), 64);
    }
}
