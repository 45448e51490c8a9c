//! Record store error types
//!
//! Error codes:
//! - OPEN_ERROR, MAGIC_MISMATCH, HEADER_WRITE_ERROR (FATAL severity)
//! - SEEK_ERROR, READ_ERROR, WRITE_ERROR, SYNC_ERROR, TRUNCATE_ERROR (ERROR severity)
//! - NO_HEADER, HEADER_MALFORMED (ERROR severity, repaired on open)
//! - CHECKSUM_MISMATCH (ERROR severity, integrity)
//! - INVALID_ARGUMENT, DELETE_ERROR (ERROR severity)

use std::fmt;
use std::io;
use std::path::Path;

/// Severity levels for store errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, store stays usable
    Error,
    /// Store instance is unusable
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Failure taxonomy of the record store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreErrorCode {
    /// Backing file could not be opened or created
    OpenError,
    /// File belongs to a different logical format
    MagicMismatch,
    /// Seek to a slot or the header failed
    SeekError,
    /// Read failed or came back short
    ReadError,
    /// Write failed or came back short
    WriteError,
    /// fsync failed
    SyncError,
    /// Truncation failed
    TruncateError,
    /// Expected header could not be written during repair
    HeaderWriteError,
    /// File is shorter than a header
    NoHeader,
    /// Header decoded but its cursor state is inconsistent
    HeaderMalformed,
    /// Stored checksum does not match the entry
    ChecksumMismatch,
    /// Caller supplied an unusable index, range or size
    InvalidArgument,
    /// Backing file could not be removed
    DeleteError,
}

impl StoreErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            StoreErrorCode::OpenError => "OPEN_ERROR",
            StoreErrorCode::MagicMismatch => "MAGIC_MISMATCH",
            StoreErrorCode::SeekError => "SEEK_ERROR",
            StoreErrorCode::ReadError => "READ_ERROR",
            StoreErrorCode::WriteError => "WRITE_ERROR",
            StoreErrorCode::SyncError => "SYNC_ERROR",
            StoreErrorCode::TruncateError => "TRUNCATE_ERROR",
            StoreErrorCode::HeaderWriteError => "HEADER_WRITE_ERROR",
            StoreErrorCode::NoHeader => "NO_HEADER",
            StoreErrorCode::HeaderMalformed => "HEADER_MALFORMED",
            StoreErrorCode::ChecksumMismatch => "CHECKSUM_MISMATCH",
            StoreErrorCode::InvalidArgument => "INVALID_ARGUMENT",
            StoreErrorCode::DeleteError => "DELETE_ERROR",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            StoreErrorCode::OpenError
            | StoreErrorCode::MagicMismatch
            | StoreErrorCode::HeaderWriteError => Severity::Fatal,
            _ => Severity::Error,
        }
    }

    /// Returns true for failures of the underlying file system calls
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            StoreErrorCode::OpenError
                | StoreErrorCode::SeekError
                | StoreErrorCode::ReadError
                | StoreErrorCode::WriteError
                | StoreErrorCode::SyncError
                | StoreErrorCode::TruncateError
                | StoreErrorCode::HeaderWriteError
                | StoreErrorCode::DeleteError
        )
    }
}

impl fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Store error type with full context
#[derive(Debug)]
pub struct StoreError {
    /// Error code
    code: StoreErrorCode,
    /// Human-readable message
    message: String,
    /// Optional details about the error context
    details: Option<String>,
    /// Underlying IO error if applicable
    source: Option<io::Error>,
}

impl StoreError {
    fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    fn io(code: StoreErrorCode, message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    fn at_offset(mut self, offset: u64) -> Self {
        self.details = Some(format!("byte_offset: {}", offset));
        self
    }

    /// Backing file could not be opened
    pub fn open_failed(path: &Path, source: io::Error) -> Self {
        Self::io(
            StoreErrorCode::OpenError,
            format!("Failed to open log file: {}", path.display()),
            source,
        )
    }

    /// Stored magic differs from the expected magic
    pub fn magic_mismatch(found: u32, expected: u32) -> Self {
        let mut err = Self::new(StoreErrorCode::MagicMismatch, "Header magic does not match");
        err.details = Some(format!("found: {:#010x}, expected: {:#010x}", found, expected));
        err
    }

    /// Seek to `offset` failed
    pub fn seek_failed(offset: u64, source: io::Error) -> Self {
        Self::io(StoreErrorCode::SeekError, "Seek failed", source).at_offset(offset)
    }

    /// Read at `offset` failed or was short
    pub fn read_failed(offset: u64, message: impl Into<String>, source: io::Error) -> Self {
        Self::io(StoreErrorCode::ReadError, message, source).at_offset(offset)
    }

    /// Write at `offset` failed or was short
    pub fn write_failed(offset: u64, message: impl Into<String>, source: io::Error) -> Self {
        Self::io(StoreErrorCode::WriteError, message, source).at_offset(offset)
    }

    /// fsync failed
    pub fn sync_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self::io(StoreErrorCode::SyncError, message, source)
    }

    /// Truncation to `len` bytes failed
    pub fn truncate_failed(len: u64, source: io::Error) -> Self {
        let mut err = Self::io(StoreErrorCode::TruncateError, "Failed to truncate log file", source);
        err.details = Some(format!("target_len: {}", len));
        err
    }

    /// Writing the expected header during repair failed
    pub fn header_write_failed(cause: StoreError) -> Self {
        let mut err = Self::new(
            StoreErrorCode::HeaderWriteError,
            format!("Failed to write expected header: {}", cause.message),
        );
        err.details = Some(match cause.details {
            Some(details) => format!("cause: {}, {}", cause.code, details),
            None => format!("cause: {}", cause.code),
        });
        err.source = cause.source;
        err
    }

    /// File holds fewer than a header's worth of bytes
    pub fn no_header(file_len: u64) -> Self {
        let mut err = Self::new(StoreErrorCode::NoHeader, "File is shorter than a header");
        err.details = Some(format!("file_len: {}", file_len));
        err
    }

    /// Header decoded but is internally inconsistent
    pub fn header_malformed(reason: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::HeaderMalformed, reason)
    }

    /// Container at slot `index` failed checksum verification
    pub fn checksum_mismatch(index: u32, stored: u32, computed: u32) -> Self {
        let mut err = Self::new(StoreErrorCode::ChecksumMismatch, "Entry checksum mismatch");
        err.details = Some(format!(
            "slot: {}, stored: {:#010x}, computed: {:#010x}",
            index, stored, computed
        ));
        err
    }

    /// Caller passed an unusable argument
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::InvalidArgument, message)
    }

    /// Backing file could not be removed
    pub fn delete_failed(path: &Path, source: io::Error) -> Self {
        Self::io(
            StoreErrorCode::DeleteError,
            format!("Failed to delete log file: {}", path.display()),
            source,
        )
    }

    /// Returns the error code
    pub fn code(&self) -> StoreErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Returns the OS error text of the underlying I/O failure, if any
    pub fn os_error(&self) -> Option<String> {
        self.source.as_ref().map(|e| e.to_string())
    }

    /// Returns whether this error leaves the store unusable
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        if let Some(ref source) = self.source {
            write!(f, ": {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
