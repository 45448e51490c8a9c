//! Fixed-record log store
//!
//! A store is one file: a 20-byte header followed by checksummed
//! containers of one fixed size. A non-zero capacity turns the file into
//! a ring that overwrites its oldest slot once full.
//!
//! Guarantees:
//! - Every record reaches the disk as `checksum || entry`
//! - The header cursor only moves after the data it covers was written
//! - A file with a foreign or damaged header is replaced on open, never
//!   interpreted
//! - Reads return containers as stored; verification is opt-in via
//!   `ReadPolicy::Verify`

mod config;
mod errors;
mod hooks;
mod record_store;
mod shared;

pub use config::{ConfigError, ReadPolicy, StoreConfig, SyncPolicy, DEFAULT_CHUNK_SIZE};
pub use errors::{Severity, StoreError, StoreErrorCode, StoreResult};
pub use hooks::{NoopHooks, StoreHooks};
pub use record_store::{AppendOutcome, RecordStore, StoreOptions};
pub use shared::SharedRecordStore;
