//! Ring buffer and bulk read tests
//!
//! Covers:
//! - Wraparound at capacity for single and batched appends
//! - Batch splitting across the end of the ring
//! - Chunked reads matching ranged reads for any chunk size
//! - Large unbounded logs

use fixlog::{EntryContainer, FileHeader, FixedEntry, RecordStore, StoreConfig};
use rand::Rng;
use tempfile::TempDir;

const MAGIC: u32 = 0x5249_4E47;

fn create_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

fn values<E: FixedEntry>(containers: Vec<EntryContainer<E>>) -> Vec<E> {
    containers.into_iter().map(EntryContainer::into_entry).collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Sample {
    timestamp: u64,
    reading: f32,
}

impl FixedEntry for Sample {
    const SIZE: usize = 12;

    fn encode_into(&self, buf: &mut [u8]) {
        buf[..8].copy_from_slice(&self.timestamp.to_le_bytes());
        buf[8..].copy_from_slice(&self.reading.to_le_bytes());
    }

    fn decode_from(buf: &[u8]) -> Self {
        let mut ts = [0u8; 8];
        ts.copy_from_slice(&buf[..8]);
        let mut reading = [0u8; 4];
        reading.copy_from_slice(&buf[8..12]);
        Self {
            timestamp: u64::from_le_bytes(ts),
            reading: f32::from_le_bytes(reading),
        }
    }
}

// =============================================================================
// Wraparound
// =============================================================================

#[test]
fn test_eleventh_append_overwrites_slot_zero() {
    let temp_dir = create_temp_dir();
    let path = temp_dir.path().join("ring.bin");
    let mut store: RecordStore<u32> =
        RecordStore::open(&path, FileHeader::with_capacity(MAGIC, 1, 10)).unwrap();

    for v in 1..=10 {
        store.append(v).unwrap();
    }
    assert_eq!(store.cursor(), 0);
    assert_eq!(store.header().count, 10);

    let outcome = store.append(11).unwrap();
    assert_eq!(outcome.first_slot, 0);
    assert_eq!(store.cursor(), 1);
    assert_eq!(store.header().count, 11);

    assert_eq!(
        values(store.get_all_entries().unwrap()),
        vec![11, 2, 3, 4, 5, 6, 7, 8, 9, 10]
    );
    assert_eq!(store.file_size().unwrap(), 20 + 10 * 8);
    assert_eq!(store.get_entry(0).unwrap(), EntryContainer::new(11));
}

#[test]
fn test_random_entries_round_trip() {
    let temp_dir = create_temp_dir();
    let mut store: RecordStore<[u8; 24]> = RecordStore::open(
        temp_dir.path().join("raw.bin"),
        FileHeader::with_capacity(MAGIC, 1, 32),
    )
    .unwrap();
    let mut rng = rand::thread_rng();

    for _ in 0..100 {
        let mut entry = [0u8; 24];
        rng.fill(&mut entry[..]);

        let slot = store.cursor();
        store.append(entry).unwrap();

        let container = store.get_entry(slot).unwrap();
        assert!(container.is_valid());
        assert_eq!(container.entry, entry);
    }
}

#[test]
fn test_batch_from_last_slot_continues_at_zero() {
    let temp_dir = create_temp_dir();
    let capacity = 8;
    let mut store: RecordStore<u32> = RecordStore::open(
        temp_dir.path().join("ring.bin"),
        FileHeader::with_capacity(MAGIC, 1, capacity),
    )
    .unwrap();
    store.append_entries(0..capacity - 1).unwrap();
    assert_eq!(store.cursor(), capacity - 1);

    let k = 5;
    store.append_entries(1000..1000 + k).unwrap();

    assert_eq!(store.cursor(), k - 1);
    assert_eq!(store.get_entry_value(capacity - 1).unwrap(), 1000);
    for i in 0..k - 1 {
        assert_eq!(store.get_entry_value(i).unwrap(), 1001 + i);
    }
}

#[test]
fn test_ring_keeps_only_latest_capacity_records() {
    let temp_dir = create_temp_dir();
    let mut store: RecordStore<u64> = RecordStore::open(
        temp_dir.path().join("ring.bin"),
        FileHeader::with_capacity(MAGIC, 1, 16),
    )
    .unwrap();

    for v in 0..100u64 {
        store.append(v).unwrap();
    }

    let mut stored = values(store.get_all_entries().unwrap());
    stored.sort_unstable();
    assert_eq!(stored, (84..100).collect::<Vec<_>>());
    assert_eq!(store.header().count, 100);
    assert_eq!(store.cursor(), 100 % 16);
    assert_eq!(store.entry_count().unwrap(), 16);
}

#[test]
fn test_batch_splits_across_end_of_ring() {
    let temp_dir = create_temp_dir();
    let mut store: RecordStore<u32> = RecordStore::open(
        temp_dir.path().join("ring.bin"),
        FileHeader::with_capacity(MAGIC, 1, 10),
    )
    .unwrap();

    for v in 0..7 {
        store.append(v).unwrap();
    }
    let outcome = store.append_entries([100, 101, 102, 103, 104]).unwrap();

    assert!(outcome.wrapped);
    assert_eq!(outcome.first_slot, 7);
    assert_eq!(outcome.cursor, 2);
    assert_eq!(outcome.count, 12);
    assert_eq!(
        values(store.get_all_entries().unwrap()),
        vec![103, 104, 2, 3, 4, 5, 6, 100, 101, 102]
    );
}

#[test]
fn test_batch_matches_single_appends() {
    let temp_dir = create_temp_dir();
    let header = FileHeader::with_capacity(MAGIC, 1, 13);
    let mut rng = rand::thread_rng();
    let data: Vec<u64> = (0..57).map(|_| rng.gen()).collect();

    let mut single: RecordStore<u64> =
        RecordStore::open(temp_dir.path().join("single.bin"), header).unwrap();
    for v in &data {
        single.append(*v).unwrap();
    }

    let mut batched: RecordStore<u64> =
        RecordStore::open(temp_dir.path().join("batched.bin"), header).unwrap();
    for chunk in data.chunks(9) {
        batched.append_entries(chunk.iter().copied()).unwrap();
    }

    assert_eq!(single.header(), batched.header());
    assert_eq!(
        single.get_all_entries().unwrap(),
        batched.get_all_entries().unwrap()
    );
}

#[test]
fn test_struct_entries_round_trip() {
    let temp_dir = create_temp_dir();
    let path = temp_dir.path().join("samples.bin");
    let header = FileHeader::new(MAGIC, 3);

    let samples: Vec<Sample> = (0..20)
        .map(|i| Sample {
            timestamp: 1_700_000_000 + i,
            reading: i as f32 * 0.5,
        })
        .collect();

    {
        let mut store: RecordStore<Sample> = RecordStore::open(&path, header).unwrap();
        assert_eq!(store.container_size(), 16);
        store.append_entries(samples.iter().copied()).unwrap();
        store.close().unwrap();
    }

    let mut store: RecordStore<Sample> = RecordStore::open(&path, header).unwrap();
    let read = store.get_entries_from(5, 3).unwrap();
    assert!(read.iter().all(EntryContainer::is_valid));
    assert_eq!(values(read), samples[5..8].to_vec());
}

// =============================================================================
// Chunked reads
// =============================================================================

#[test]
fn test_chunked_reads_match_ranged_read() {
    let temp_dir = create_temp_dir();
    let mut store: RecordStore<u32> = RecordStore::open(
        temp_dir.path().join("chunks.bin"),
        FileHeader::new(MAGIC, 1),
    )
    .unwrap();
    store.append_entries(0..50).unwrap();

    let expected = store.get_entries_from_to(3, 45).unwrap();

    for chunk_size in [1u32, 7, 1000] {
        let mut collected = Vec::new();
        let mut calls = 0;
        store
            .get_entries_chunked(3, Some(45), Some(chunk_size), |chunk| {
                assert!(chunk.len() <= chunk_size as usize);
                calls += 1;
                collected.extend(chunk);
            })
            .unwrap();

        assert_eq!(collected, expected, "chunk size {}", chunk_size);
        assert_eq!(calls, (42 + chunk_size - 1) / chunk_size);
    }
}

#[test]
fn test_chunked_read_defaults_to_whole_file() {
    let temp_dir = create_temp_dir();
    let mut store: RecordStore<u16> = RecordStore::open(
        temp_dir.path().join("chunks.bin"),
        FileHeader::new(MAGIC, 1),
    )
    .unwrap();
    store.append_entries(0..25).unwrap();

    let mut total = 0;
    store
        .get_entries_chunked(0, None, None, |chunk| total += chunk.len())
        .unwrap();
    assert_eq!(total, 25);
}

#[test]
fn test_chunked_read_stops_on_error() {
    let temp_dir = create_temp_dir();
    let mut store: RecordStore<u32> = RecordStore::open(
        temp_dir.path().join("chunks.bin"),
        FileHeader::new(MAGIC, 1),
    )
    .unwrap();
    store.append_entries(0..10).unwrap();

    // Range runs past the file: the first chunk succeeds, the second fails
    let mut delivered = Vec::new();
    let err = store
        .get_entries_chunked(0, Some(20), Some(8), |chunk| delivered.push(chunk.len()))
        .unwrap_err();

    assert_eq!(err.code(), fixlog::StoreErrorCode::ReadError);
    assert_eq!(delivered, vec![8]);
}

#[test]
fn test_oversized_range_is_read_error() {
    let temp_dir = create_temp_dir();
    let mut store: RecordStore<[u8; 60]> = RecordStore::open(
        temp_dir.path().join("wide.bin"),
        FileHeader::new(MAGIC, 1),
    )
    .unwrap();
    store.append([7u8; 60]).unwrap();

    let err = store.get_entries_from(0, u32::MAX).unwrap_err();
    assert_eq!(err.code(), fixlog::StoreErrorCode::ReadError);

    let err = store.get_entries_from_to(1, u32::MAX).unwrap_err();
    assert_eq!(err.code(), fixlog::StoreErrorCode::ReadError);

    let err = store
        .get_entries_chunked(0, Some(u32::MAX), Some(u32::MAX), |_| {
            panic!("no chunk may be delivered")
        })
        .unwrap_err();
    assert_eq!(err.code(), fixlog::StoreErrorCode::ReadError);

    // The store stays usable
    assert_eq!(store.get_entry_value(0).unwrap(), [7u8; 60]);
}

// =============================================================================
// Unbounded logs
// =============================================================================

#[test]
fn test_unbounded_log_holds_a_million_records() {
    let temp_dir = create_temp_dir();
    let path = temp_dir.path().join("big.bin");
    let header = FileHeader::new(MAGIC, 1);

    {
        let mut store: RecordStore<u32> =
            RecordStore::open_with_config(&path, header, StoreConfig::fast()).unwrap();
        store.append_entries(0..1_000_000).unwrap();
        store.close().unwrap();
    }

    let mut store: RecordStore<u32> = RecordStore::open(&path, header).unwrap();
    assert_eq!(store.header().count, 1_000_000);
    assert_eq!(store.cursor(), 1_000_000);
    assert_eq!(store.entry_count().unwrap(), 1_000_000);
    assert_eq!(store.file_size().unwrap(), 20 + 1_000_000 * 8);
    assert_eq!(store.get_entry_value(999_999).unwrap(), 999_999);

    let mut chunks = 0;
    let mut next = 0u32;
    store
        .get_entries_chunked(0, None, None, |chunk| {
            chunks += 1;
            for container in chunk {
                assert_eq!(container.entry, next);
                next += 1;
            }
        })
        .unwrap();
    assert_eq!(chunks, 10);
    assert_eq!(next, 1_000_000);
}
