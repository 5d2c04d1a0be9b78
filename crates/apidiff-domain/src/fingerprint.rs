use apidiff_types::ElementKind;
use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a diff entry.
///
/// Identity fields:
/// - element kind token
/// - canonical signature
///
/// The change kind is not part of the identity.
pub fn fingerprint_for_entry(kind: ElementKind, signature: &str) -> String {
    let canonical = [kind.as_str(), signature].join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}
