//! Token service for generation, hashing, and credential verification.

use rand::RngExt;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Token prefix.
const TOKEN_PREFIX: &str = "vms_";
/// Length of the random part of the token.
const TOKEN_RANDOM_LENGTH: usize = 40;

/// Generate a new random auth token.
///
/// Returns the plaintext (shown to the caller once) and its hash for storage.
pub fn generate_token() -> (String, String) {
    let random_part: String = rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(TOKEN_RANDOM_LENGTH)
        .map(char::from)
        .collect();

    let plaintext = format!("{}{}", TOKEN_PREFIX, random_part);
    let hash = hash_token(&plaintext);

    (plaintext, hash)
}

/// Hash a token using SHA-256.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Hash a password using SHA-256.
pub fn hash_password(password: &str) -> String {
    hash_token(password)
}

/// Verify a password against a stored hash in constant time.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let computed = hash_password(password);
    computed.as_bytes().ct_eq(stored_hash.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_shape() {
        let (plaintext, hash) = generate_token();

        assert!(plaintext.starts_with(TOKEN_PREFIX));
        assert_eq!(plaintext.len(), TOKEN_PREFIX.len() + TOKEN_RANDOM_LENGTH);
        assert_eq!(hash, hash_token(&plaintext));
        assert_eq!(hash.len(), 64); // SHA-256 produces 64 hex chars
    }

    #[test]
    fn test_tokens_are_unique() {
        let (a, _) = generate_token();
        let (b, _) = generate_token();
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(hash_token("vms_abc"), hash_token("vms_abc"));
        assert_ne!(hash_token("vms_abc"), hash_token("vms_abd"));
    }

    #[test]
    fn test_verify_password() {
        let stored = hash_password("hunter2");
        assert!(verify_password("hunter2", &stored));
        assert!(!verify_password("hunter3", &stored));
    }
}
