//! Checksummed entry container
//!
//! Containers are what the store writes into each slot:
//!
//! ```text
//! [checksum:u32 LE][entry: E::SIZE bytes]
//! ```
//!
//! A container built through [`EntryContainer::new`] is always valid. A
//! container decoded from disk keeps the checksum it was stored with, so a
//! corrupted or half-written slot shows up through [`EntryContainer::is_valid`].

use super::checksum;
use super::entry::FixedEntry;

/// Size of the checksum prefix.
pub const CHECKSUM_SIZE: usize = 4;

/// A caller entry paired with its checksum.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryContainer<E> {
    /// Checksum of the encoded entry bytes.
    pub checksum: u32,
    /// The wrapped entry.
    pub entry: E,
}

impl<E: FixedEntry> EntryContainer<E> {
    /// Encoded size of a container holding an `E`.
    pub const SIZE: usize = CHECKSUM_SIZE + E::SIZE;

    /// Wraps `entry`, computing its checksum.
    pub fn new(entry: E) -> Self {
        let checksum = checksum::generate(&entry.to_bytes());
        Self { checksum, entry }
    }

    /// Builds a container with an explicit checksum, valid or not.
    pub fn from_parts(checksum: u32, entry: E) -> Self {
        Self { checksum, entry }
    }

    /// Recomputes the entry checksum and compares it with the stored one.
    pub fn is_valid(&self) -> bool {
        checksum::verify(&self.entry.to_bytes(), self.checksum)
    }

    /// Consumes the container and returns the entry.
    pub fn into_entry(self) -> E {
        self.entry
    }

    /// Writes the container into `buf`, which must be exactly [`Self::SIZE`] bytes.
    pub fn encode_into(&self, buf: &mut [u8]) {
        buf[..CHECKSUM_SIZE].copy_from_slice(&self.checksum.to_le_bytes());
        self.entry.encode_into(&mut buf[CHECKSUM_SIZE..]);
    }

    /// Decodes a container from `buf`, which must be exactly [`Self::SIZE`] bytes.
    pub fn decode_from(buf: &[u8]) -> Self {
        let checksum = u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
        let entry = E::decode_from(&buf[CHECKSUM_SIZE..]);
        Self { checksum, entry }
    }

    /// Encodes a run of containers back to back.
    pub fn encode_all(containers: &[Self]) -> Vec<u8> {
        let mut buf = vec![0u8; containers.len() * Self::SIZE];
        for (container, slot) in containers.iter().zip(buf.chunks_exact_mut(Self::SIZE)) {
            container.encode_into(slot);
        }
        buf
    }

    /// Decodes every whole container in `buf`.
    pub fn decode_all(buf: &[u8]) -> Vec<Self> {
        buf.chunks_exact(Self::SIZE).map(Self::decode_from).collect()
    }
}

impl<E: FixedEntry> From<E> for EntryContainer<E> {
    fn from(entry: E) -> Self {
        Self::new(entry)
    }
}
