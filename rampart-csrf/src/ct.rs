//! Constant-time byte comparison.

use subtle::ConstantTimeEq;

/// Compare two byte strings without an early exit on the first difference.
///
/// Only the lengths are compared eagerly; equal-length inputs are always
/// scanned in full.
#[inline]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    bool::from(a.ct_eq(b))
}
