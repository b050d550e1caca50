//! One-time verification codes.
//!
//! Pure functions: generation draws each digit independently, hashing is an
//! unsalted SHA-256 hex digest so a stored digest can be compared against a
//! freshly hashed submission. Only digests are ever persisted.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Number of digits in a verification code.
pub const CODE_LENGTH: usize = 6;

/// Generate a verification code: 6 digits, each drawn independently and
/// uniformly from 0-9. Leading zeros are allowed.
#[must_use]
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

/// Hash a verification code for storage and comparison.
#[must_use]
pub fn hash_code(code: &str) -> String {
    let digest = Sha256::digest(code.as_bytes());
    hex::encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_code_format() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), CODE_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_generate_code_allows_leading_zeros() {
        // Each digit is drawn independently, so codes below 100000 are valid.
        // Parsing to u32 must never fail regardless of leading zeros.
        for _ in 0..100 {
            let code = generate_code();
            assert!(code.parse::<u32>().is_ok());
        }
    }

    #[test]
    fn test_hash_code_is_deterministic() {
        assert_eq!(hash_code("123456"), hash_code("123456"));
    }

    #[test]
    fn test_hash_code_is_sha256_hex() {
        let digest = hash_code("123456");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        // Known SHA-256 of "123456".
        assert_eq!(
            digest,
            "8d969eef6ecad3c29a3a629280e686cf0c3f5d5a86aff3ca12020c923adc6c92"
        );
    }

    #[test]
    fn test_hash_code_differs_per_code() {
        assert_ne!(hash_code("123456"), hash_code("123457"));
    }
}
