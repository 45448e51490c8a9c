//! Record store metrics
//!
//! - Counters only, monotonic
//! - Thread-safe, lock-free
//! - One registry may be shared by several stores

use std::sync::atomic::{AtomicU64, Ordering};

/// Operational counters of one or more record stores
///
/// All counters use Relaxed ordering; exact cross-counter consistency is
/// not required.
#[derive(Debug, Default)]
pub struct StoreMetrics {
    /// Records committed by appends
    records_appended: AtomicU64,
    /// Records returned by reads
    records_read: AtomicU64,
    /// Bytes written, data and header
    bytes_written: AtomicU64,
    /// Bytes read, data and header
    bytes_read: AtomicU64,
    /// Times the cursor returned to slot 0
    wraparounds: AtomicU64,
    /// Headers replaced on open
    header_repairs: AtomicU64,
    /// Successful fsync calls
    fsyncs: AtomicU64,
    /// Containers that failed checksum verification on read
    checksum_failures: AtomicU64,
    /// Operations that returned an error
    errors: AtomicU64,
}

impl StoreMetrics {
    /// Create a new registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Add committed records
    pub fn add_records_appended(&self, count: u64) {
        self.records_appended.fetch_add(count, Ordering::Relaxed);
    }

    /// Add records returned to callers
    pub fn add_records_read(&self, count: u64) {
        self.records_read.fetch_add(count, Ordering::Relaxed);
    }

    /// Add bytes written
    pub fn add_bytes_written(&self, bytes: u64) {
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Add bytes read
    pub fn add_bytes_read(&self, bytes: u64) {
        self.bytes_read.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Increment wraparounds
    pub fn increment_wraparounds(&self) {
        self.wraparounds.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment header repairs
    pub fn increment_header_repairs(&self) {
        self.header_repairs.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment fsyncs
    pub fn increment_fsyncs(&self) {
        self.fsyncs.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment checksum failures
    pub fn increment_checksum_failures(&self) {
        self.checksum_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment errors
    pub fn increment_errors(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current snapshot of all metrics as JSON
    pub fn to_json(&self) -> String {
        let s = self.snapshot();
        format!(
            r#"{{"records_appended":{},"records_read":{},"bytes_written":{},"bytes_read":{},"wraparounds":{},"header_repairs":{},"fsyncs":{},"checksum_failures":{},"errors":{}}}"#,
            s.records_appended,
            s.records_read,
            s.bytes_written,
            s.bytes_read,
            s.wraparounds,
            s.header_repairs,
            s.fsyncs,
            s.checksum_failures,
            s.errors,
        )
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            records_appended: self.records_appended.load(Ordering::Relaxed),
            records_read: self.records_read.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            wraparounds: self.wraparounds.load(Ordering::Relaxed),
            header_repairs: self.header_repairs.load(Ordering::Relaxed),
            fsyncs: self.fsyncs.load(Ordering::Relaxed),
            checksum_failures: self.checksum_failures.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub records_appended: u64,
    pub records_read: u64,
    pub bytes_written: u64,
    pub bytes_read: u64,
    pub wraparounds: u64,
    pub header_repairs: u64,
    pub fsyncs: u64,
    pub checksum_failures: u64,
    pub errors: u64,
}
