//! Content fingerprinting — the evidence identity anchor.
//!
//! Every evidence record is content-addressed by the SHA-512 digest of its
//! raw bytes. Two records with identical bytes always carry identical
//! digests, regardless of when or where they were ingested.

use sha2::{Digest, Sha512};

/// Compute the lowercase-hex SHA-512 digest of `bytes` (128 hex characters).
///
/// Pure: identical input always yields identical output.
pub fn fingerprint(bytes: &[u8]) -> String {
  let mut hasher = Sha512::new();
  hasher.update(bytes);
  hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn same_bytes_same_digest() {
    let a = fingerprint(b"signed statement, page one");
    let b = fingerprint(b"signed statement, page one");
    assert_eq!(a, b);
  }

  #[test]
  fn different_bytes_different_digest() {
    let a = fingerprint(b"statement v1");
    let b = fingerprint(b"statement v2");
    assert_ne!(a, b);
  }

  #[test]
  fn digest_is_512_bits_of_hex() {
    let d = fingerprint(b"");
    assert_eq!(d.len(), 128);
    assert!(d.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(d, d.to_lowercase());
  }
}
