//! Text form of secrets and tokens.
//!
//! URL-safe base64 without padding: the alphabet `A-Z a-z 0-9 - _` needs no
//! escaping inside a cookie value or a header value.

use crate::error::Result;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

/// Encode bytes for a cookie or header.
pub fn encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode text produced by [`encode`].
///
/// Fails with `MalformedEncoding` on characters outside the alphabet,
/// padding, a length no byte count encodes to, or non-zero trailing bits.
pub fn decode(text: &str) -> Result<Vec<u8>> {
    Ok(URL_SAFE_NO_PAD.decode(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CsrfError;
    use proptest::prelude::*;

    #[test]
    fn test_known_vectors() {
        assert_eq!(encode(b""), "");
        assert_eq!(encode(&[0xfb, 0xff]), "-_8");
        assert_eq!(encode(b"csrf"), "Y3NyZg");
        assert_eq!(decode("Y3NyZg").unwrap(), b"csrf");
    }

    #[test]
    fn test_output_is_cookie_safe() {
        let bytes: Vec<u8> = (0..=255).collect();
        let text = encode(&bytes);
        assert!(
            text.bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        );
    }

    #[test]
    fn test_rejects_foreign_characters() {
        for bad in ["Y3Ny+g", "Y3Ny/g", "Y3NyZg==", "Y3 NyZg", "Y3NyZg%3D", "é"] {
            assert!(
                matches!(decode(bad), Err(CsrfError::MalformedEncoding(_))),
                "{bad} should not decode"
            );
        }
    }

    #[test]
    fn test_rejects_impossible_length() {
        // 4n+1 characters never come out of the encoder
        assert!(decode("A").is_err());
        assert!(decode("AAAAA").is_err());
    }

    #[test]
    fn test_rejects_non_canonical_trailing_bits() {
        // "-_8" is canonical for [0xfb, 0xff]; "-_9" sets a dangling bit
        assert!(decode("-_9").is_err());
    }

    proptest! {
        #[test]
        fn prop_round_trip(bytes in proptest::collection::vec(any::<u8>(), 0..=256)) {
            prop_assert_eq!(decode(&encode(&bytes)).unwrap(), bytes);
        }
    }
}
