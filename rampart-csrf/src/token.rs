//! Token binding and verification.
//!
//! A token is `salt ‖ HMAC(secret, salt)`. Nothing about issued tokens is
//! stored; validity depends only on the token bytes and the session secret.

use crate::ct::constant_time_eq;
use crate::error::{CsrfError, Result};
use crate::random::{SecureRandom, generate};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::{Sha256, Sha512};
use std::str::FromStr;
use std::sync::Arc;

type HmacSha256 = Hmac<Sha256>;
type HmacSha512 = Hmac<Sha512>;

/// Keyed-hash construction used to bind tokens to a secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyedHash {
    #[default]
    HmacSha256,
    HmacSha512,
}

impl KeyedHash {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyedHash::HmacSha256 => "hmac-sha256",
            KeyedHash::HmacSha512 => "hmac-sha512",
        }
    }

    /// Digest length in bytes
    pub fn output_len(&self) -> usize {
        match self {
            KeyedHash::HmacSha256 => 32,
            KeyedHash::HmacSha512 => 64,
        }
    }

    /// `HMAC(key, message)`
    pub fn digest(&self, key: &[u8], message: &[u8]) -> Vec<u8> {
        match self {
            KeyedHash::HmacSha256 => {
                let mut mac =
                    HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
                mac.update(message);
                mac.finalize().into_bytes().to_vec()
            }
            KeyedHash::HmacSha512 => {
                let mut mac =
                    HmacSha512::new_from_slice(key).expect("HMAC can take key of any size");
                mac.update(message);
                mac.finalize().into_bytes().to_vec()
            }
        }
    }

    /// `salt ‖ HMAC(secret, salt)`
    pub fn bind(&self, secret: &[u8], salt: &[u8]) -> Vec<u8> {
        let mut token = Vec::with_capacity(salt.len() + self.output_len());
        token.extend_from_slice(salt);
        token.extend_from_slice(&self.digest(secret, salt));
        token
    }
}

impl std::fmt::Display for KeyedHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyedHash {
    type Err = CsrfError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hmac-sha256" | "sha256" => Ok(KeyedHash::HmacSha256),
            "hmac-sha512" | "sha512" => Ok(KeyedHash::HmacSha512),
            other => Err(CsrfError::InvalidConfig(format!(
                "unknown keyed-hash algorithm '{}'",
                other
            ))),
        }
    }
}

/// Derives fresh tokens from a secret.
#[derive(Clone)]
pub struct TokenBinder {
    algorithm: KeyedHash,
    salt_length: usize,
    random: Arc<dyn SecureRandom>,
}

impl TokenBinder {
    pub fn new(algorithm: KeyedHash, salt_length: usize, random: Arc<dyn SecureRandom>) -> Self {
        Self {
            algorithm,
            salt_length,
            random,
        }
    }

    /// Draw a new salt and bind it to `secret`.
    pub fn bind(&self, secret: &[u8]) -> Result<Vec<u8>> {
        let salt = generate(self.random.as_ref(), self.salt_length)?;
        Ok(self.algorithm.bind(secret, &salt))
    }

    /// Bind a caller-chosen salt. Deterministic.
    pub fn bind_with_salt(&self, secret: &[u8], salt: &[u8]) -> Vec<u8> {
        self.algorithm.bind(secret, salt)
    }

    /// Verifier matching this binder's algorithm and salt length.
    pub fn verifier(&self) -> TokenVerifier {
        TokenVerifier::new(self.algorithm, self.salt_length)
    }

    pub fn algorithm(&self) -> KeyedHash {
        self.algorithm
    }

    pub fn salt_length(&self) -> usize {
        self.salt_length
    }
}

impl std::fmt::Debug for TokenBinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenBinder")
            .field("algorithm", &self.algorithm)
            .field("salt_length", &self.salt_length)
            .finish_non_exhaustive()
    }
}

/// Checks that a token was derived from a given secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenVerifier {
    algorithm: KeyedHash,
    salt_length: usize,
}

impl TokenVerifier {
    pub fn new(algorithm: KeyedHash, salt_length: usize) -> Self {
        Self {
            algorithm,
            salt_length,
        }
    }

    /// Length of every well-formed token
    pub fn token_length(&self) -> usize {
        self.salt_length + self.algorithm.output_len()
    }

    /// `true` iff `token` is `salt ‖ HMAC(secret, salt)`.
    ///
    /// Tokens of the wrong length fail closed. The digest comparison does not
    /// exit early on a mismatching byte.
    pub fn verify(&self, token: &[u8], secret: &[u8]) -> bool {
        if token.len() < self.token_length() {
            return false;
        }

        let (salt, provided) = token.split_at(self.salt_length);
        let expected = self.algorithm.digest(secret, salt);

        constant_time_eq(provided, &expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::OsRandom;
    use proptest::prelude::*;

    fn binder(salt_length: usize) -> TokenBinder {
        TokenBinder::new(KeyedHash::HmacSha256, salt_length, Arc::new(OsRandom))
    }

    #[test]
    fn test_token_layout() {
        let binder = binder(8);
        let secret = [7u8; 18];
        let token = binder.bind(&secret).unwrap();

        assert_eq!(token.len(), 8 + 32);
        assert_eq!(&token[8..], KeyedHash::HmacSha256.digest(&secret, &token[..8]));
    }

    #[test]
    fn test_rfc4231_case_2() {
        let digest = KeyedHash::HmacSha256.digest(b"Jefe", b"what do ya want for nothing?");
        let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
        assert_eq!(
            hex,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_binding_is_deterministic_per_salt() {
        let secret = b"secret-secret-secr";
        let a = KeyedHash::HmacSha512.bind(secret, b"saltsalt");
        let b = KeyedHash::HmacSha512.bind(secret, b"saltsalt");
        assert_eq!(a, b);
        assert_eq!(a.len(), 8 + 64);
    }

    #[test]
    fn test_fresh_salts_give_distinct_tokens() {
        let binder = binder(8);
        let secret = [1u8; 18];
        let first = binder.bind(&secret).unwrap();
        let second = binder.bind(&secret).unwrap();

        assert_ne!(first, second);
        assert!(binder.verifier().verify(&first, &secret));
        assert!(binder.verifier().verify(&second, &secret));
    }

    #[test]
    fn test_wrong_secret_fails() {
        let binder = binder(8);
        let token = binder.bind(&[1u8; 18]).unwrap();
        assert!(!binder.verifier().verify(&token, &[2u8; 18]));
    }

    #[test]
    fn test_short_tokens_fail_closed() {
        let verifier = TokenVerifier::new(KeyedHash::HmacSha256, 8);
        let secret = [3u8; 18];

        assert!(!verifier.verify(&[], &secret));
        assert!(!verifier.verify(&[0u8; 4], &secret));
        assert!(!verifier.verify(&[0u8; 39], &secret));
    }

    #[test]
    fn test_trailing_bytes_fail() {
        let binder = binder(8);
        let secret = [5u8; 18];
        let mut token = binder.bind(&secret).unwrap();
        token.push(0);
        assert!(!binder.verifier().verify(&token, &secret));
    }

    #[test]
    fn test_algorithm_names() {
        assert_eq!("hmac-sha256".parse::<KeyedHash>().unwrap(), KeyedHash::HmacSha256);
        assert_eq!("HMAC-SHA512".parse::<KeyedHash>().unwrap(), KeyedHash::HmacSha512);
        assert!("md5".parse::<KeyedHash>().is_err());
        assert_eq!(KeyedHash::default().to_string(), "hmac-sha256");
        assert_eq!(
            serde_json::to_string(&KeyedHash::HmacSha512).unwrap(),
            "\"hmac-sha512\""
        );
    }

    proptest! {
        #[test]
        fn prop_sound_for_any_secret_and_salt(
            secret in proptest::collection::vec(any::<u8>(), 1..64),
            salt in proptest::collection::vec(any::<u8>(), 1..32),
        ) {
            let token = KeyedHash::HmacSha256.bind(&secret, &salt);
            let verifier = TokenVerifier::new(KeyedHash::HmacSha256, salt.len());
            prop_assert!(verifier.verify(&token, &secret));
        }

        #[test]
        fn prop_any_digest_bit_flip_fails(bit in 0usize..(32 * 8)) {
            let secret = [9u8; 18];
            let salt = [4u8; 8];
            let mut token = KeyedHash::HmacSha256.bind(&secret, &salt);
            token[8 + bit / 8] ^= 1 << (bit % 8);
            let verifier = TokenVerifier::new(KeyedHash::HmacSha256, 8);
            prop_assert!(!verifier.verify(&token, &secret));
        }
    }
}
