//! On-disk format of a fixed-record log
//!
//! ```text
//! [0 .. 20)                       FileHeader
//! [20 .. 20 + n * container_size) EntryContainer slots
//! ```
//!
//! Slot `i` always starts at `HEADER_SIZE + i * container_size`. There is
//! no index and no free list.

pub mod checksum;
mod container;
mod entry;
mod header;

pub use container::{EntryContainer, CHECKSUM_SIZE};
pub use entry::FixedEntry;
pub use header::{FileHeader, HeaderCheck, HEADER_SIZE};

/// Byte offset of slot `index` for containers of `container_size` bytes.
pub fn slot_offset(index: u32, container_size: usize) -> u64 {
    HEADER_SIZE as u64 + u64::from(index) * container_size as u64
}
