//! Authentication module for token verification.

mod extractor;

use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

pub use extractor::TokenAuth;

/// Wrapper type for the bootstrap token.
/// Uses `SecretString` to prevent accidental logging and zeroize on drop.
///
/// # Security features
/// - `Debug` prints `[REDACTED]` instead of the actual value
/// - Memory is zeroed when dropped (via `zeroize`)
/// - Explicit `.expose_secret()` required to access the value
#[derive(Clone)]
pub struct BootstrapToken(Option<SecretString>);

impl BootstrapToken {
    /// Create a new BootstrapToken from an optional string.
    pub fn new(token: Option<String>) -> Self {
        Self(token.map(SecretString::from))
    }

    /// Securely compare the provided token with the stored bootstrap token.
    ///
    /// Uses `subtle::ConstantTimeEq` which performs a constant-time
    /// byte-by-byte comparison without early-exit branching, so neither the
    /// content nor the length leaks through timing.
    pub fn verify(&self, provided: &str) -> bool {
        match &self.0 {
            Some(secret) => {
                let expected = secret.expose_secret();
                expected.as_bytes().ct_eq(provided.as_bytes()).into()
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for BootstrapToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(_) => write!(f, "BootstrapToken([REDACTED])"),
            None => write!(f, "BootstrapToken(None)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_matches_exact_token() {
        let token = BootstrapToken::new(Some("secret-token".to_string()));
        assert!(token.verify("secret-token"));
        assert!(!token.verify("secret-tokem"));
        assert!(!token.verify("secret-token-longer"));
    }

    #[test]
    fn test_absent_token_never_verifies() {
        let token = BootstrapToken::new(None);
        assert!(!token.verify(""));
        assert!(!token.verify("anything"));
    }

    #[test]
    fn test_debug_redacts_value() {
        let token = BootstrapToken::new(Some("secret-token".to_string()));
        assert_eq!(format!("{:?}", token), "BootstrapToken([REDACTED])");
    }
}
