//! Cryptographically secure byte source for secrets and salts.

use crate::error::{CsrfError, Result};
use rand::RngCore;
use rand::rngs::OsRng;
use tracing::error;

/// Source of secure random bytes.
///
/// Injected into the engine so tests can substitute a deterministic source.
/// Implementations must be safe to share across concurrent requests.
pub trait SecureRandom: Send + Sync {
    /// Fill `buf` entirely, or fail without a partial fallback.
    fn fill(&self, buf: &mut [u8]) -> Result<()>;
}

/// The operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl SecureRandom for OsRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<()> {
        OsRng.try_fill_bytes(buf).map_err(|e| {
            error!(error = %e, "operating system random source failed");
            CsrfError::SecureRandomUnavailable(e.to_string())
        })
    }
}

/// Draw `n` bytes from `source`.
pub fn generate(source: &dyn SecureRandom, n: usize) -> Result<Vec<u8>> {
    let mut bytes = vec![0u8; n];
    source.fill(&mut bytes)?;
    Ok(bytes)
}
