//! Extension points of the record store
//!
//! Hooks observe the store; they cannot veto or alter an operation. All
//! methods default to no-ops so implementors override only what they need.

use super::errors::StoreError;
use super::record_store::AppendOutcome;
use crate::format::FileHeader;

/// Callbacks invoked by the record store.
pub trait StoreHooks: Send {
    /// The stored version is older than the expected version.
    ///
    /// Runs during open, after the magic check passed. The stored version
    /// is kept; migrating data is up to the implementor.
    fn on_version_older(&mut self, _found: u32, _expected: u32) {}

    /// The stored version is newer than the expected version.
    fn on_version_newer(&mut self, _found: u32, _expected: u32) {}

    /// The stored capacity differs from the expected capacity.
    ///
    /// Existing records stay; the new capacity governs future wraparound.
    fn on_capacity_changed(&mut self, _old: u32, _new: u32) {}

    /// Called before `pending` records are written.
    fn before_append(&mut self, _header: &FileHeader, _pending: usize) {}

    /// Called after `appended` records were committed.
    fn on_append_success(&mut self, _outcome: &AppendOutcome, _appended: usize) {}

    /// Called when an append of `pending` records failed.
    fn on_append_failure(&mut self, _error: &StoreError, _pending: usize) {}
}

/// Hooks that do nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl StoreHooks for NoopHooks {}
