//! One-way PIN digest.
//!
//! SHA-256 over the PIN's UTF-8 bytes, rendered as lowercase hex. The digest
//! is unsalted and single-round; it keeps plaintext PINs out of the data
//! files and nothing more.

use sha2::{Digest, Sha256};

/// Length in characters of every digest produced by [`digest`].
pub const DIGEST_HEX_LEN: usize = 64;

/// Returns the hex digest of `pin`.
pub fn digest(pin: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pin.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Returns `true` if `pin` hashes to `expected`.
pub fn verify(pin: &str, expected: &str) -> bool {
    digest(pin) == expected
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_known_vector() {
        assert_eq!(
            digest("1234"),
            "03ac674216f3e15c761ee1a5e255f067953623c8b388b4459e13f978d7c846f4"
        );
    }

    #[test]
    fn test_digest_is_fixed_length_lowercase_hex() {
        for pin in ["0000", "1234", "9999", ""] {
            let d = digest(pin);
            assert_eq!(d.len(), DIGEST_HEX_LEN);
            assert!(d.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }
    }

    #[test]
    fn test_all_four_digit_pins_are_distinct_and_deterministic() {
        let mut seen = HashSet::new();
        for n in 0..10_000 {
            let pin = format!("{:04}", n);
            let d = digest(&pin);
            assert_eq!(d, digest(&pin));
            assert!(seen.insert(d), "collision for {}", pin);
        }
        assert_eq!(seen.len(), 10_000);
    }

    #[test]
    fn test_verify() {
        let stored = digest("4321");
        assert!(verify("4321", &stored));
        assert!(!verify("1234", &stored));
    }
}
