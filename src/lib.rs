//! fixlog - fixed-record binary log files
//!
//! Append-only or ring-buffered files of fixed-size, checksummed records
//! with random, ranged and chunked reads.
//!
//! ```no_run
//! use fixlog::{FileHeader, RecordStore};
//!
//! let expected = FileHeader::with_capacity(0x4C4F_4731, 1, 1024);
//! let mut store: RecordStore<u64> = RecordStore::open("/tmp/samples.bin", expected)?;
//! store.append(42)?;
//! let first = store.get_entry(0)?;
//! assert!(first.is_valid());
//! # Ok::<(), fixlog::StoreError>(())
//! ```

pub mod format;
pub mod observability;
pub mod store;

pub use format::{EntryContainer, FileHeader, FixedEntry, HEADER_SIZE};
pub use store::{
    AppendOutcome, ReadPolicy, RecordStore, SharedRecordStore, StoreConfig, StoreError,
    StoreErrorCode, StoreHooks, StoreOptions, StoreResult, SyncPolicy,
};
