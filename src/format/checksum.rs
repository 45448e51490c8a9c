//! Additive checksum for stored entries
//!
//! Every container on disk carries a 32-bit checksum of its entry bytes.
//! The value is the two's-complement negation of the byte sum, so a span
//! and its checksum add up to zero modulo 2^32.
//!
//! This detects bit flips and truncation cheaply. It is not cryptographic:
//! reordering bytes within a span leaves the checksum unchanged.

/// Computes the checksum over the provided bytes.
///
/// Bytes are summed as unsigned 8-bit values into a wrapping 32-bit
/// accumulator which is then negated. The empty span yields `0`.
///
/// This function is deterministic: the same input always produces the same output.
pub fn generate(data: &[u8]) -> u32 {
    data.iter()
        .fold(0u32, |sum, &byte| sum.wrapping_add(u32::from(byte)))
        .wrapping_neg()
}

/// Verifies that the computed checksum matches the expected checksum.
pub fn verify(data: &[u8], expected: u32) -> bool {
    generate(data) == expected
}
