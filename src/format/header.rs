//! File header: identity, format version, capacity and cursor state
//!
//! The header occupies the first [`HEADER_SIZE`] bytes of every log file:
//!
//! ```text
//! offset  size  field
//! 0       4     magic     (u32 LE)
//! 4       4     version   (u32 LE)
//! 8       4     capacity  (u32 LE, 0 = unbounded)
//! 12      4     count     (u32 LE)
//! 16      4     cursor    (u32 LE)
//! ```
//!
//! Fields are encoded one by one; the in-memory layout of [`FileHeader`]
//! never reaches the disk.

use std::cmp::Ordering;

use crate::store::{StoreError, StoreResult};

/// Encoded size of [`FileHeader`] in bytes.
pub const HEADER_SIZE: usize = 20;

/// Header of a fixed-record log file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FileHeader {
    /// Identifies the logical file type. A mismatch means the file is not ours.
    pub magic: u32,
    /// Format version written by the producer of the file.
    pub version: u32,
    /// Maximum number of slots before the cursor wraps. `0` means unbounded.
    pub capacity: u32,
    /// Records ever appended. Keeps growing across wraparound.
    pub count: u32,
    /// Slot index of the next write.
    pub cursor: u32,
}

/// Result of comparing a stored header against the expected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderCheck {
    pub magic_matches: bool,
    /// Stored version compared to the expected version.
    pub version: Ordering,
    pub capacity_changed: bool,
}

impl HeaderCheck {
    /// True when nothing beyond the magic needs attention.
    pub fn is_exact(&self) -> bool {
        self.magic_matches && self.version == Ordering::Equal && !self.capacity_changed
    }
}

impl FileHeader {
    /// Creates an unbounded header.
    pub fn new(magic: u32, version: u32) -> Self {
        Self::with_capacity(magic, version, 0)
    }

    /// Creates a header whose log wraps after `capacity` records.
    pub fn with_capacity(magic: u32, version: u32, capacity: u32) -> Self {
        Self {
            magic,
            version,
            capacity,
            count: 0,
            cursor: 0,
        }
    }

    /// Returns true if the log never wraps.
    pub fn is_unbounded(&self) -> bool {
        self.capacity == 0
    }

    /// Returns a copy with the cursor state cleared.
    pub fn reset_cursor_state(mut self) -> Self {
        self.count = 0;
        self.cursor = 0;
        self
    }

    /// Encodes the header into its on-disk form.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(&self.magic.to_le_bytes());
        buf[4..8].copy_from_slice(&self.version.to_le_bytes());
        buf[8..12].copy_from_slice(&self.capacity.to_le_bytes());
        buf[12..16].copy_from_slice(&self.count.to_le_bytes());
        buf[16..20].copy_from_slice(&self.cursor.to_le_bytes());
        buf
    }

    /// Decodes a header from the start of `data`.
    ///
    /// # Errors
    ///
    /// Returns `NO_HEADER` if fewer than [`HEADER_SIZE`] bytes are supplied.
    pub fn from_bytes(data: &[u8]) -> StoreResult<Self> {
        if data.len() < HEADER_SIZE {
            return Err(StoreError::no_header(data.len() as u64));
        }

        let field = |at: usize| u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]]);

        Ok(Self {
            magic: field(0),
            version: field(4),
            capacity: field(8),
            count: field(12),
            cursor: field(16),
        })
    }

    /// Checks the cursor invariants of a header read from disk.
    ///
    /// `cursor == capacity` is accepted; the store folds it back to slot 0
    /// before the next write.
    ///
    /// # Errors
    ///
    /// Returns `HEADER_MALFORMED` if the cursor lies beyond the capacity or
    /// ahead of the record count.
    pub fn validate(&self) -> StoreResult<()> {
        if self.capacity != 0 && self.cursor > self.capacity {
            return Err(StoreError::header_malformed(format!(
                "cursor {} exceeds capacity {}",
                self.cursor, self.capacity
            )));
        }
        if self.cursor > self.count {
            return Err(StoreError::header_malformed(format!(
                "cursor {} is ahead of record count {}",
                self.cursor, self.count
            )));
        }
        Ok(())
    }

    /// Compares this (stored) header against the expected header.
    pub fn check_against(&self, expected: &FileHeader) -> HeaderCheck {
        HeaderCheck {
            magic_matches: self.magic == expected.magic,
            version: self.version.cmp(&expected.version),
            capacity_changed: self.capacity != expected.capacity,
        }
    }
}
