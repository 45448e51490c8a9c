//! Thread-safe handle to a record store
//!
//! A `RecordStore` is single-owner. `SharedRecordStore` puts it behind a
//! mutex so that concurrent appends serialize and every reader sees a
//! header consistent with the data it reads.

use std::sync::{Arc, Mutex, MutexGuard};

use super::errors::StoreResult;
use super::record_store::{AppendOutcome, RecordStore};
use crate::format::{EntryContainer, FileHeader, FixedEntry};

/// Cloneable, lock-protected record store.
pub struct SharedRecordStore<E: FixedEntry> {
    inner: Arc<Mutex<RecordStore<E>>>,
}

impl<E: FixedEntry> Clone for SharedRecordStore<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: FixedEntry> SharedRecordStore<E> {
    pub fn new(store: RecordStore<E>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Locks the store for a sequence of operations. A poisoned lock is
    /// recovered.
    pub fn lock(&self) -> MutexGuard<'_, RecordStore<E>> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Runs `f` with the store locked.
    pub fn with<T>(&self, f: impl FnOnce(&mut RecordStore<E>) -> T) -> T {
        let mut guard = self.lock();
        f(&mut guard)
    }

    pub fn append(&self, entry: E) -> StoreResult<AppendOutcome> {
        self.lock().append(entry)
    }

    pub fn append_entries<I>(&self, entries: I) -> StoreResult<AppendOutcome>
    where
        I: IntoIterator<Item = E>,
    {
        self.lock().append_entries(entries)
    }

    pub fn get_entry(&self, index: u32) -> StoreResult<EntryContainer<E>> {
        self.lock().get_entry(index)
    }

    pub fn get_all_entries(&self) -> StoreResult<Vec<EntryContainer<E>>> {
        self.lock().get_all_entries()
    }

    pub fn header(&self) -> FileHeader {
        self.lock().header()
    }

    /// Returns the store if this is the last handle.
    pub fn into_inner(self) -> Result<RecordStore<E>, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(mutex) => Ok(mutex
                .into_inner()
                .unwrap_or_else(|poisoned| poisoned.into_inner())),
            Err(inner) => Err(Self { inner }),
        }
    }
}
