//! Observable record store events
//!
//! Events are explicit and typed. Each maps to a stable event name and a
//! default severity.

use std::fmt;

use super::logger::Severity;

/// Observable events of a record store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Store opened with a valid header
    StoreOpened,
    /// Backing file could not be opened (FATAL)
    OpenFailed,
    /// Header flushed and file handle released
    StoreClosed,
    /// Backing file removed
    StoreDeleted,

    // Header
    /// Missing, foreign or malformed header replaced by the expected one
    HeaderRepaired,
    /// Stored version older than expected
    VersionOlder,
    /// Stored version newer than expected
    VersionNewer,
    /// Stored capacity replaced by the expected capacity
    CapacityChanged,
    /// Header repair failed, store unusable (FATAL)
    HeaderRepairFailed,
    /// Pending header could not be written when the store was dropped
    HeaderFlushFailed,

    // Data
    /// Cursor returned to slot 0
    Wraparound,
    /// Append failed, possibly after committing a prefix
    AppendFailed,
    /// Body truncated to an empty log
    Cleared,
    /// A record was removed and the file shrank
    RecordRemoved,
    /// A read found a container failing its checksum
    ChecksumMismatch,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::StoreOpened => "STORE_OPENED",
            Event::OpenFailed => "STORE_OPEN_FAILED",
            Event::StoreClosed => "STORE_CLOSED",
            Event::StoreDeleted => "STORE_DELETED",

            Event::HeaderRepaired => "STORE_HEADER_REPAIRED",
            Event::VersionOlder => "STORE_VERSION_OLDER",
            Event::VersionNewer => "STORE_VERSION_NEWER",
            Event::CapacityChanged => "STORE_CAPACITY_CHANGED",
            Event::HeaderRepairFailed => "STORE_HEADER_REPAIR_FAILED",
            Event::HeaderFlushFailed => "STORE_HEADER_FLUSH_FAILED",

            Event::Wraparound => "STORE_WRAPAROUND",
            Event::AppendFailed => "STORE_APPEND_FAILED",
            Event::Cleared => "STORE_CLEARED",
            Event::RecordRemoved => "STORE_RECORD_REMOVED",
            Event::ChecksumMismatch => "STORE_CHECKSUM_MISMATCH",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::Wraparound => Severity::Trace,
            Event::HeaderRepaired
            | Event::VersionOlder
            | Event::VersionNewer
            | Event::CapacityChanged
            | Event::ChecksumMismatch => Severity::Warn,
            Event::AppendFailed | Event::HeaderFlushFailed => Severity::Error,
            Event::OpenFailed | Event::HeaderRepairFailed => Severity::Fatal,
            _ => Severity::Info,
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::OpenFailed | Event::HeaderRepairFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
