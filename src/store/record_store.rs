//! Fixed-record store backed by a single file
//!
//! The store owns the file handle and an in-memory copy of the header.
//! Slot `i` lives at `HEADER_SIZE + i * container_size`; appends write at
//! the header cursor and, for a bounded log, wrap back to slot 0 once the
//! cursor reaches the capacity.
//!
//! # Open
//!
//! 1. Open or create the file (never creates parent directories)
//! 2. Read and validate the stored header
//! 3. Matching magic: adopt it, run version/capacity hooks
//! 4. Anything else: write the expected header, truncate the body,
//!    fsync, read back and check again
//!
//! # Durability
//!
//! Under `SyncPolicy::Always` every data segment is fsynced before the
//! cursor moves, and the header is rewritten and fsynced before the call
//! returns. Under `SyncPolicy::OnClose` the header is written on
//! `flush()`, `clear()`, `close()` and drop.
//!
//! # Failure
//!
//! No operation is retried. A failed batch may leave a committed prefix;
//! the header then reflects exactly the committed segments.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::config::StoreConfig;
use super::errors::{StoreError, StoreErrorCode, StoreResult};
use super::hooks::{NoopHooks, StoreHooks};
use crate::format::{checksum, slot_offset, EntryContainer, FileHeader, FixedEntry, HEADER_SIZE};
use crate::observability::{log_event_with_fields, Event, Logger, StoreMetrics};

/// Result of a successful append.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AppendOutcome {
    /// The cursor returned to slot 0 at least once during the call.
    pub wrapped: bool,
    /// Slot the first record of the call was written to.
    pub first_slot: u32,
    /// Cursor after the call.
    pub cursor: u32,
    /// Logical record count after the call.
    pub count: u32,
}

/// Builder for [`RecordStore`].
pub struct StoreOptions<E> {
    path: PathBuf,
    expected: FileHeader,
    config: StoreConfig,
    hooks: Box<dyn StoreHooks>,
    metrics: Arc<StoreMetrics>,
    _entry: PhantomData<fn() -> E>,
}

impl<E: FixedEntry> StoreOptions<E> {
    /// Options for the file at `path` that must carry `expected`'s magic.
    pub fn new(path: impl Into<PathBuf>, expected: FileHeader) -> Self {
        Self {
            path: path.into(),
            expected,
            config: StoreConfig::default(),
            hooks: Box::new(NoopHooks),
            metrics: Arc::new(StoreMetrics::new()),
            _entry: PhantomData,
        }
    }

    /// Sets the store configuration.
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Installs hooks.
    pub fn hooks(mut self, hooks: impl StoreHooks + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    /// Shares a metrics registry with the store.
    pub fn metrics(mut self, metrics: Arc<StoreMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Opens the store.
    ///
    /// # Errors
    ///
    /// - `OPEN_ERROR` if the file cannot be opened or created
    /// - `HEADER_WRITE_ERROR` if a missing or foreign header cannot be replaced
    /// - `MAGIC_MISMATCH` if the replaced header does not read back correctly
    pub fn open(self) -> StoreResult<RecordStore<E>> {
        RecordStore::open_with(self)
    }
}

/// A file of checksummed fixed-size records with optional ring semantics.
///
/// Methods take `&mut self`; wrap the store in
/// [`SharedRecordStore`](super::SharedRecordStore) to use it from several threads.
pub struct RecordStore<E: FixedEntry> {
    /// Path to the backing file
    path: PathBuf,
    /// Underlying file handle
    file: File,
    /// Header the caller asked for
    expected: FileHeader,
    /// Current header state, ahead of the disk while `header_dirty`
    header: FileHeader,
    config: StoreConfig,
    hooks: Box<dyn StoreHooks>,
    metrics: Arc<StoreMetrics>,
    header_dirty: bool,
    last_error: Option<StoreErrorCode>,
    /// OS error text of every failed system call
    captured_errors: Vec<String>,
    /// Set once the handle is released; drop then skips the header flush
    closed: bool,
    _entry: PhantomData<fn() -> E>,
}

impl<E: FixedEntry> RecordStore<E> {
    /// Opens or creates the store at `path` with the default configuration.
    pub fn open(path: impl Into<PathBuf>, expected: FileHeader) -> StoreResult<Self> {
        StoreOptions::new(path, expected).open()
    }

    /// Opens or creates the store at `path` with `config`.
    pub fn open_with_config(
        path: impl Into<PathBuf>,
        expected: FileHeader,
        config: StoreConfig,
    ) -> StoreResult<Self> {
        StoreOptions::new(path, expected).config(config).open()
    }

    fn open_with(options: StoreOptions<E>) -> StoreResult<Self> {
        let StoreOptions {
            path,
            expected,
            config,
            hooks,
            metrics,
            ..
        } = options;

        config
            .validate()
            .map_err(|e| StoreError::invalid_argument(e.to_string()))?;

        let file = match OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&path)
        {
            Ok(file) => file,
            Err(e) => {
                let err = StoreError::open_failed(&path, e);
                metrics.increment_errors();
                let path_str = path.display().to_string();
                let os_error = err.os_error().unwrap_or_default();
                log_event_with_fields(
                    Event::OpenFailed,
                    &[("path", &path_str), ("os_error", &os_error)],
                );
                return Err(err);
            }
        };

        let mut store = Self {
            path,
            file,
            expected,
            header: FileHeader::default(),
            config,
            hooks,
            metrics,
            header_dirty: false,
            last_error: None,
            captured_errors: Vec::new(),
            closed: false,
            _entry: PhantomData,
        };

        if let Err(e) = store.initialize() {
            store.closed = true;
            let code = e.code().to_string();
            store.emit(Event::HeaderRepairFailed, &[("code", &code)]);
            return Err(e);
        }

        let capacity = store.header.capacity.to_string();
        let count = store.header.count.to_string();
        let cursor = store.header.cursor.to_string();
        store.emit(
            Event::StoreOpened,
            &[("capacity", &capacity), ("count", &count), ("cursor", &cursor)],
        );
        Ok(store)
    }

    /// Loads the stored header, repairing it when it cannot be used.
    fn initialize(&mut self) -> StoreResult<()> {
        let loaded = self.read_header().and_then(|header| {
            header.validate()?;
            Ok(header)
        });

        match loaded {
            Ok(stored) if stored.magic == self.expected.magic => self.adopt_header(stored),
            Ok(stored) => {
                let reason = StoreError::magic_mismatch(stored.magic, self.expected.magic);
                self.record_error(&reason);
                self.fix_header(&reason)
            }
            Err(reason) => {
                self.record_error(&reason);
                self.fix_header(&reason)
            }
        }
    }

    /// Accepts a stored header whose magic matches.
    fn adopt_header(&mut self, stored: FileHeader) -> StoreResult<()> {
        let check = stored.check_against(&self.expected);
        let found = stored.version.to_string();
        let expected = self.expected.version.to_string();

        match check.version {
            std::cmp::Ordering::Less => {
                self.hooks.on_version_older(stored.version, self.expected.version);
                self.emit(Event::VersionOlder, &[("expected", &expected), ("found", &found)]);
            }
            std::cmp::Ordering::Greater => {
                self.hooks.on_version_newer(stored.version, self.expected.version);
                self.emit(Event::VersionNewer, &[("expected", &expected), ("found", &found)]);
            }
            std::cmp::Ordering::Equal => {}
        }

        let mut header = stored;
        let mut changed = false;

        if check.capacity_changed {
            self.hooks
                .on_capacity_changed(stored.capacity, self.expected.capacity);
            let old = stored.capacity.to_string();
            let new = self.expected.capacity.to_string();
            self.emit(Event::CapacityChanged, &[("new", &new), ("old", &old)]);
            header.capacity = self.expected.capacity;
            changed = true;
        }

        // A full ring, or a cursor beyond a shrunken capacity, restarts at slot 0
        if header.capacity != 0 && header.cursor >= header.capacity {
            header.cursor = 0;
            changed = true;
        }

        self.header = header;
        if changed {
            self.commit_header()?;
        }
        Ok(())
    }

    /// Replaces the header with the expected one and discards the body.
    fn fix_header(&mut self, reason: &StoreError) -> StoreResult<()> {
        let fresh = self.expected.reset_cursor_state();

        if let Err(e) = self.write_fresh_header(&fresh) {
            self.record_error(&e);
            return Err(StoreError::header_write_failed(e));
        }

        let reread = self.read_header()?;
        if reread.magic != self.expected.magic {
            return Err(StoreError::magic_mismatch(reread.magic, self.expected.magic));
        }

        self.header = reread;
        self.header_dirty = false;
        self.metrics.increment_header_repairs();
        let code = reason.code().to_string();
        self.emit(Event::HeaderRepaired, &[("reason", &code)]);
        Ok(())
    }

    fn write_fresh_header(&mut self, fresh: &FileHeader) -> StoreResult<()> {
        self.write_at(0, &fresh.to_bytes())?;
        self.file
            .set_len(HEADER_SIZE as u64)
            .map_err(|e| StoreError::truncate_failed(HEADER_SIZE as u64, e))?;
        self.sync()
    }

    // =========================================================================
    // Append
    // =========================================================================

    /// Appends one entry.
    pub fn append(&mut self, entry: E) -> StoreResult<AppendOutcome> {
        self.append_container(&EntryContainer::new(entry))
    }

    /// Appends one prepared container as is.
    pub fn append_container(&mut self, container: &EntryContainer<E>) -> StoreResult<AppendOutcome> {
        self.append_containers(std::slice::from_ref(container))
    }

    /// Appends entries in order.
    pub fn append_entries<I>(&mut self, entries: I) -> StoreResult<AppendOutcome>
    where
        I: IntoIterator<Item = E>,
    {
        let containers: Vec<EntryContainer<E>> =
            entries.into_iter().map(EntryContainer::new).collect();
        self.append_containers(&containers)
    }

    /// Appends containers in order.
    ///
    /// On a bounded log the batch is split at the end of the ring: the
    /// records that fit are written at the cursor, the cursor returns to 0
    /// and the rest follows, as many times as needed. Each segment is one
    /// write.
    ///
    /// # Errors
    ///
    /// `SEEK_ERROR`, `WRITE_ERROR` or `SYNC_ERROR` from the failing segment.
    /// Segments written before the failure stay committed; compare
    /// `header().count` before and after to detect a partial append.
    pub fn append_containers(
        &mut self,
        containers: &[EntryContainer<E>],
    ) -> StoreResult<AppendOutcome> {
        let pending = containers.len();
        let count_before = self.header.count;
        self.hooks.before_append(&self.header, pending);

        match self.write_segments(containers) {
            Ok(outcome) => {
                self.hooks.on_append_success(&outcome, pending);
                Ok(outcome)
            }
            Err(e) => {
                self.record_error(&e);
                self.hooks.on_append_failure(&e, pending);
                let code = e.code().to_string();
                let pending_str = pending.to_string();
                let committed = self.header.count.wrapping_sub(count_before).to_string();
                self.emit(
                    Event::AppendFailed,
                    &[("code", &code), ("committed", &committed), ("pending", &pending_str)],
                );
                Err(e)
            }
        }
    }

    fn write_segments(&mut self, containers: &[EntryContainer<E>]) -> StoreResult<AppendOutcome> {
        let mut outcome = AppendOutcome {
            wrapped: false,
            first_slot: self.header.cursor,
            cursor: self.header.cursor,
            count: self.header.count,
        };
        if containers.is_empty() {
            return Ok(outcome);
        }

        if self.header.is_unbounded()
            && u64::from(self.header.cursor) + containers.len() as u64 > u64::from(u32::MAX)
        {
            return Err(StoreError::invalid_argument(format!(
                "appending {} records would overflow the slot index",
                containers.len()
            )));
        }

        let size = EntryContainer::<E>::SIZE;
        let mut remaining = containers;
        let mut committed_any = false;

        outcome.wrapped = self.wrap_if_full();
        outcome.first_slot = self.header.cursor;

        while !remaining.is_empty() {
            let room = if self.header.is_unbounded() {
                remaining.len()
            } else {
                ((self.header.capacity - self.header.cursor) as usize).min(remaining.len())
            };
            let (segment, rest) = remaining.split_at(room);

            let offset = slot_offset(self.header.cursor, size);
            let bytes = EntryContainer::encode_all(segment);
            if let Err(e) = self.write_segment(offset, &bytes) {
                if committed_any {
                    self.commit_after_partial_append();
                }
                return Err(e);
            }

            outcome.wrapped |= self.advance(segment.len() as u32);
            self.metrics.add_records_appended(segment.len() as u64);
            committed_any = true;
            remaining = rest;
        }

        self.commit_header()?;
        outcome.cursor = self.header.cursor;
        outcome.count = self.header.count;
        Ok(outcome)
    }

    /// Brings the header in step with the segments that reached the disk.
    /// A failure here is recorded; the append error is what the caller sees.
    fn commit_after_partial_append(&mut self) {
        if let Err(e) = self.commit_header() {
            self.record_error(&e);
        }
    }

    fn write_segment(&mut self, offset: u64, bytes: &[u8]) -> StoreResult<()> {
        self.write_at(offset, bytes)?;
        if self.config.syncs_every_write() {
            self.sync()?;
        }
        Ok(())
    }

    /// Moves the cursor past `n` written slots.
    fn advance(&mut self, n: u32) -> bool {
        self.header.cursor += n;
        self.header.count = self.header.count.saturating_add(n);
        self.wrap_if_full()
    }

    /// Returns the cursor to 0 when a bounded ring is full.
    fn wrap_if_full(&mut self) -> bool {
        if self.header.capacity != 0 && self.header.cursor >= self.header.capacity {
            self.header.cursor = 0;
            self.metrics.increment_wraparounds();
            if Logger::enabled(Event::Wraparound.severity()) {
                let count = self.header.count.to_string();
                self.emit(Event::Wraparound, &[("count", &count)]);
            }
            return true;
        }
        false
    }

    // =========================================================================
    // Read
    // =========================================================================

    /// Reads the container in slot `index`.
    ///
    /// No bounds check against the record count: reading past the end of
    /// the file fails with `READ_ERROR`.
    pub fn get_entry(&mut self, index: u32) -> StoreResult<EntryContainer<E>> {
        self.tracked(|s| {
            let mut containers = s.read_slots(index, 1)?;
            containers
                .pop()
                .ok_or_else(|| StoreError::invalid_argument("empty read"))
        })
    }

    /// Reads the entry in slot `index` without its checksum.
    pub fn get_entry_value(&mut self, index: u32) -> StoreResult<E> {
        self.get_entry(index).map(EntryContainer::into_entry)
    }

    /// Reads `count` containers starting at slot `index` in one read.
    pub fn get_entries_from(&mut self, index: u32, count: u32) -> StoreResult<Vec<EntryContainer<E>>> {
        self.tracked(|s| s.read_slots(index, count))
    }

    /// Reads the containers in slots `start..end`.
    pub fn get_entries_from_to(&mut self, start: u32, end: u32) -> StoreResult<Vec<EntryContainer<E>>> {
        self.tracked(|s| {
            if end < start {
                return Err(StoreError::invalid_argument(format!(
                    "range end {} precedes start {}",
                    end, start
                )));
            }
            s.read_slots(start, end - start)
        })
    }

    /// Reads every slot in the file.
    pub fn get_all_entries(&mut self) -> StoreResult<Vec<EntryContainer<E>>> {
        self.tracked(|s| {
            let count = s.entry_count()?;
            s.read_slots(0, count)
        })
    }

    /// Streams slots `begin..end` to `callback` in chunks.
    ///
    /// `end` defaults to the number of slots in the file and `chunk_size`
    /// to the configured chunk size. At most one chunk is held in memory.
    /// Stops at the first failed read; the failing chunk is not delivered.
    pub fn get_entries_chunked<F>(
        &mut self,
        begin: u32,
        end: Option<u32>,
        chunk_size: Option<u32>,
        mut callback: F,
    ) -> StoreResult<()>
    where
        F: FnMut(Vec<EntryContainer<E>>),
    {
        self.tracked(|s| {
            let chunk_size = chunk_size.unwrap_or(s.config.chunk_size);
            if chunk_size == 0 {
                return Err(StoreError::invalid_argument("chunk size must be greater than zero"));
            }
            let end = match end {
                Some(end) => end,
                None => s.entry_count()?,
            };
            if end < begin {
                return Err(StoreError::invalid_argument(format!(
                    "range end {} precedes start {}",
                    end, begin
                )));
            }

            let mut at = begin;
            while at < end {
                let n = chunk_size.min(end - at);
                let chunk = s.read_slots(at, n)?;
                callback(chunk);
                at += n;
            }
            Ok(())
        })
    }

    fn read_slots(&mut self, index: u32, count: u32) -> StoreResult<Vec<EntryContainer<E>>> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let size = EntryContainer::<E>::SIZE;
        let offset = slot_offset(index, size);
        let wanted = u64::from(count) * size as u64;

        // Never allocate for bytes the file does not hold
        let file_len = self.file_size()?;
        if offset.saturating_add(wanted) > file_len {
            return Err(StoreError::read_failed(
                offset,
                format!(
                    "Failed to read {} bytes, file holds {} bytes",
                    wanted, file_len
                ),
                io::Error::from(io::ErrorKind::UnexpectedEof),
            ));
        }

        let mut buf = vec![0u8; wanted as usize];
        self.read_at(offset, &mut buf)?;
        let containers = EntryContainer::<E>::decode_all(&buf);

        if self.config.verifies_reads() {
            for (i, container) in containers.iter().enumerate() {
                if !container.is_valid() {
                    let slot = index.saturating_add(i as u32);
                    let computed = checksum::generate(&container.entry.to_bytes());
                    self.metrics.increment_checksum_failures();
                    let slot_str = slot.to_string();
                    self.emit(Event::ChecksumMismatch, &[("slot", &slot_str)]);
                    return Err(StoreError::checksum_mismatch(slot, container.checksum, computed));
                }
            }
        }

        self.metrics.add_records_read(u64::from(count));
        Ok(containers)
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Overwrites slot `index` with `entry`. The header is unchanged.
    pub fn set_entry_at(&mut self, entry: E, index: u32) -> StoreResult<()> {
        self.set_container_at(&EntryContainer::new(entry), index)
    }

    /// Overwrites slot `index` with `container` as is.
    ///
    /// # Errors
    ///
    /// `INVALID_ARGUMENT` unless `index < entry_count()`.
    pub fn set_container_at(&mut self, container: &EntryContainer<E>, index: u32) -> StoreResult<()> {
        self.tracked(|s| {
            s.check_slot(index)?;
            let bytes = EntryContainer::encode_all(std::slice::from_ref(container));
            s.write_segment(slot_offset(index, EntryContainer::<E>::SIZE), &bytes)
        })
    }

    /// Removes the most recently written record by shrinking the file.
    ///
    /// The most recent record is the slot before the cursor, or the last
    /// slot of a full ring when the cursor is 0. It must also be the last
    /// slot of the file.
    ///
    /// # Errors
    ///
    /// `INVALID_ARGUMENT` if the log is empty or a wrapped ring keeps older
    /// records after the most recent one; nothing changes in that case.
    pub fn remove_entry_at_end(&mut self) -> StoreResult<()> {
        self.tracked(|s| {
            let stored = s.entry_count()?;
            if stored == 0 {
                return Err(StoreError::invalid_argument("log is empty"));
            }

            let last = if s.header.cursor > 0 {
                s.header.cursor - 1
            } else if s.header.capacity != 0 && stored >= s.header.capacity {
                s.header.capacity - 1
            } else {
                return Err(StoreError::invalid_argument("no record precedes the cursor"));
            };
            if last != stored - 1 {
                return Err(StoreError::invalid_argument(format!(
                    "most recent record in slot {} is not the last slot {}",
                    last,
                    stored - 1
                )));
            }

            s.truncate_to(slot_offset(last, EntryContainer::<E>::SIZE))?;
            s.header.cursor = last;
            s.header.count = s.header.count.saturating_sub(1);
            s.commit_header()?;

            let slot = last.to_string();
            s.emit(Event::RecordRemoved, &[("slot", &slot)]);
            Ok(())
        })
    }

    /// Removes slot `index`, shifting every later slot down by one.
    ///
    /// Runs in O(n) of the trailing slots, moving at most `chunk_size`
    /// records per read/write pair.
    ///
    /// # Errors
    ///
    /// `INVALID_ARGUMENT` unless `index < entry_count()`.
    pub fn remove_entry_at(&mut self, index: u32) -> StoreResult<()> {
        self.tracked(|s| {
            let stored = s.check_slot(index)?;
            let size = EntryContainer::<E>::SIZE;
            let chunk = s.config.chunk_size.max(1);

            let mut from = index + 1;
            while from < stored {
                let n = chunk.min(stored - from);
                let mut buf = vec![0u8; n as usize * size];
                s.read_at(slot_offset(from, size), &mut buf)?;
                s.write_at(slot_offset(from - 1, size), &buf)?;
                from += n;
            }

            s.truncate_to(slot_offset(stored - 1, size))?;
            s.header.count = s.header.count.saturating_sub(1);
            if s.header.cursor > index {
                s.header.cursor -= 1;
            }
            s.commit_header()?;

            let slot = index.to_string();
            s.emit(Event::RecordRemoved, &[("slot", &slot)]);
            Ok(())
        })
    }

    /// Drops every record. Magic, version and capacity are kept.
    pub fn clear(&mut self) -> StoreResult<()> {
        self.tracked(|s| {
            s.truncate_to(HEADER_SIZE as u64)?;
            s.header = s.header.reset_cursor_state();
            s.header_dirty = true;
            s.flush_header()?;
            s.emit(Event::Cleared, &[]);
            Ok(())
        })
    }

    /// Writes a pending header and fsyncs the file.
    pub fn flush(&mut self) -> StoreResult<()> {
        self.tracked(|s| {
            if s.header_dirty {
                s.flush_header()
            } else {
                s.sync()
            }
        })
    }

    /// Flushes and releases the file handle.
    pub fn close(mut self) -> StoreResult<()> {
        let result = self.flush();
        self.closed = true;
        self.emit(Event::StoreClosed, &[]);
        result
    }

    /// Releases the file handle and removes the file.
    pub fn delete_file(mut self) -> StoreResult<()> {
        self.closed = true;
        let path = self.path.clone();
        drop(self);

        fs::remove_file(&path).map_err(|e| StoreError::delete_failed(&path, e))?;

        let path_str = path.display().to_string();
        log_event_with_fields(Event::StoreDeleted, &[("path", &path_str)]);
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current header, including cursor state not yet flushed.
    pub fn header(&self) -> FileHeader {
        self.header
    }

    /// Header the store was opened with.
    pub fn expected_header(&self) -> FileHeader {
        self.expected
    }

    /// Slot index of the next write.
    pub fn cursor(&self) -> u32 {
        self.header.cursor
    }

    /// Number of slots physically present in the file.
    ///
    /// This differs from `header().count`, which keeps counting across
    /// wraparound.
    pub fn entry_count(&self) -> StoreResult<u32> {
        let body = self.file_size()?.saturating_sub(HEADER_SIZE as u64);
        let slots = body / EntryContainer::<E>::SIZE as u64;
        Ok(u32::try_from(slots).unwrap_or(u32::MAX))
    }

    /// Returns true if the file holds no slots.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.entry_count()? == 0)
    }

    /// Size of the backing file in bytes.
    pub fn file_size(&self) -> StoreResult<u64> {
        self.file
            .metadata()
            .map(|m| m.len())
            .map_err(|e| StoreError::read_failed(0, "Failed to read file metadata", e))
    }

    /// Code of the most recent failed operation, `None` if none failed.
    pub fn last_error_code(&self) -> Option<StoreErrorCode> {
        self.last_error
    }

    /// OS error text of every failed system call, oldest first.
    pub fn captured_errors(&self) -> &[String] {
        &self.captured_errors
    }

    /// Forgets the recorded error state.
    pub fn clear_errors(&mut self) {
        self.last_error = None;
        self.captured_errors.clear();
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Configuration the store was opened with.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Counters shared with any other holder of the registry.
    pub fn metrics(&self) -> &Arc<StoreMetrics> {
        &self.metrics
    }

    /// Encoded header size in bytes.
    pub fn header_size(&self) -> usize {
        HEADER_SIZE
    }

    /// Encoded entry size in bytes, without the checksum.
    pub fn entry_size(&self) -> usize {
        E::SIZE
    }

    /// Size of one slot in bytes: checksum plus entry.
    pub fn container_size(&self) -> usize {
        EntryContainer::<E>::SIZE
    }

    // =========================================================================
    // File primitives
    // =========================================================================

    /// Runs `op` and records its failure.
    fn tracked<T>(&mut self, op: impl FnOnce(&mut Self) -> StoreResult<T>) -> StoreResult<T> {
        let result = op(self);
        if let Err(ref e) = result {
            self.record_error(e);
        }
        result
    }

    fn record_error(&mut self, error: &StoreError) {
        self.last_error = Some(error.code());
        if let Some(os_error) = error.os_error() {
            self.captured_errors.push(os_error);
        }
        self.metrics.increment_errors();
    }

    /// Fails unless slot `index` exists; returns the slot count.
    fn check_slot(&self, index: u32) -> StoreResult<u32> {
        let stored = self.entry_count()?;
        if index >= stored {
            return Err(StoreError::invalid_argument(format!(
                "slot {} out of range, log holds {} slots",
                index, stored
            )));
        }
        Ok(stored)
    }

    fn read_header(&mut self) -> StoreResult<FileHeader> {
        let len = self.file_size()?;
        if len < HEADER_SIZE as u64 {
            return Err(StoreError::no_header(len));
        }
        let mut buf = [0u8; HEADER_SIZE];
        self.read_at(0, &mut buf)?;
        FileHeader::from_bytes(&buf)
    }

    /// Marks the header changed and writes it if the policy asks for it.
    fn commit_header(&mut self) -> StoreResult<()> {
        self.header_dirty = true;
        if self.config.syncs_every_write() {
            self.flush_header()
        } else {
            Ok(())
        }
    }

    fn flush_header(&mut self) -> StoreResult<()> {
        let bytes = self.header.to_bytes();
        self.write_at(0, &bytes)?;
        self.sync()?;
        self.header_dirty = false;
        Ok(())
    }

    fn seek_to(&mut self, offset: u64) -> StoreResult<()> {
        self.file
            .seek(SeekFrom::Start(offset))
            .map(|_| ())
            .map_err(|e| StoreError::seek_failed(offset, e))
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> StoreResult<()> {
        let len = buf.len();
        self.seek_to(offset)?;
        self.file.read_exact(buf).map_err(|e| {
            StoreError::read_failed(offset, format!("Failed to read {} bytes", len), e)
        })?;
        self.metrics.add_bytes_read(len as u64);
        Ok(())
    }

    fn write_at(&mut self, offset: u64, buf: &[u8]) -> StoreResult<()> {
        self.seek_to(offset)?;
        self.file.write_all(buf).map_err(|e| {
            StoreError::write_failed(offset, format!("Failed to write {} bytes", buf.len()), e)
        })?;
        self.metrics.add_bytes_written(buf.len() as u64);
        Ok(())
    }

    fn sync(&mut self) -> StoreResult<()> {
        self.file
            .sync_all()
            .map_err(|e| StoreError::sync_failed("fsync failed", e))?;
        self.metrics.increment_fsyncs();
        Ok(())
    }

    fn truncate_to(&mut self, len: u64) -> StoreResult<()> {
        self.file
            .set_len(len)
            .map_err(|e| StoreError::truncate_failed(len, e))?;
        if self.config.syncs_every_write() {
            self.sync()?;
        }
        Ok(())
    }

    fn emit(&self, event: Event, fields: &[(&str, &str)]) {
        if !Logger::enabled(event.severity()) {
            return;
        }
        let path = self.path.display().to_string();
        let mut all = Vec::with_capacity(fields.len() + 1);
        all.push(("path", path.as_str()));
        all.extend_from_slice(fields);
        log_event_with_fields(event, &all);
    }
}

impl<E: FixedEntry> Drop for RecordStore<E> {
    fn drop(&mut self) {
        if self.closed || !self.header_dirty {
            return;
        }
        if let Err(e) = self.flush_header() {
            let path = self.path.display().to_string();
            let message = e.to_string();
            log_event_with_fields(
                Event::HeaderFlushFailed,
                &[("path", &path), ("error", &message)],
            );
        }
    }
}
