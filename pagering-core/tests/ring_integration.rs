//! Integration tests for the persistent ring buffer
//!
//! Runs the engine against the 32 KiB reference device and covers:
//! - Full detection and FIFO order at capacity
//! - Wrapping with and without an unusable remainder
//! - Drain-then-refill parity
//! - Side-effect free queries
//! - Power cycles and brownouts

mod common;

use pagering_core::{
    constants::layout::{FLIP_CLEAR, FLIP_SET},
    is_initialized, MemoryStore, RingBuffer,
};

use common::{
    drain_all, fill, formatted_ring, page, reboot,
    store::{BrownoutStore, CountingStore},
    FramStore,
};

#[test]
fn test_reference_device_capacity() {
    let mut ring = formatted_ring(64);
    assert_eq!(ring.layout().metadata_start(), 32736);
    assert_eq!(ring.capacity().unwrap(), 511);

    for i in 0..511 {
        assert!(ring.write(&page(i, 64)).unwrap(), "write {} should fit", i);
    }
    assert!(ring.is_full().unwrap());
    assert!(!ring.write(&page(511, 64)).unwrap(), "512th write must be refused");

    let mut buf = [0u8; 64];
    for i in 0..511 {
        assert!(ring.read(&mut buf).unwrap(), "read {} should succeed", i);
        assert_eq!(buf.as_slice(), page(i, 64).as_slice(), "record {} out of order", i);
    }
    assert!(!ring.read(&mut buf).unwrap());
    assert!(!ring.contains_data().unwrap());
}

#[test]
fn test_refused_write_keeps_content() {
    let mut ring = formatted_ring(64);
    assert_eq!(fill(&mut ring, 0, 600), 511);

    let mut buf = [0u8; 64];
    assert!(ring.read(&mut buf).unwrap());
    assert_eq!(buf.as_slice(), page(0, 64).as_slice());
    assert_eq!(ring.len().unwrap(), 510);
}

#[test]
fn test_wrap_boundary_with_remainder() {
    // 32736 = 327 * 100 + 36: the last 36 bytes never hold a page
    let mut ring = formatted_ring(100);
    assert_eq!(ring.capacity().unwrap(), 327);
    assert_eq!(fill(&mut ring, 0, 327), 327);
    assert_eq!(ring.status().head, 32700);

    let mut buf = [0u8; 100];
    for i in 0..5 {
        assert!(ring.read(&mut buf).unwrap());
        assert_eq!(buf.as_slice(), page(i, 100).as_slice());
    }

    // next write lands at 0 and toggles the flip marker
    assert!(ring.write(&page(327, 100)).unwrap());
    let status = ring.status();
    assert_eq!((status.head, status.tail, status.flip_marker), (100, 500, FLIP_SET));
    assert_eq!(&ring.store().image()[..100], page(327, 100).as_slice());

    assert_eq!(fill(&mut ring, 328, 10), 4);
    assert!(ring.is_full().unwrap());

    // reader follows through the same wrap without loss or duplication
    let pages = drain_all(&mut ring);
    let expected: Vec<Vec<u8>> = (5..332).map(|i| page(i, 100)).collect();
    assert_eq!(pages, expected);

    let status = ring.status();
    assert_eq!((status.head, status.tail, status.flip_marker), (500, 500, FLIP_CLEAR));
}

#[test]
fn test_drain_then_refill() {
    // 64 leaves a remainder, 32 divides the data region exactly
    for page_size in [64u16, 32] {
        let mut ring = formatted_ring(page_size);
        let capacity = ring.capacity().unwrap() as u32;

        assert_eq!(fill(&mut ring, 0, capacity), capacity);
        assert_eq!(drain_all(&mut ring).len() as u32, capacity);
        assert!(!ring.contains_data().unwrap());

        assert_eq!(fill(&mut ring, capacity, capacity + 1), capacity);
        let status = ring.status();
        assert_eq!(status.flip_marker, FLIP_SET, "page size {}", page_size);
        assert_eq!(status.head, status.tail, "page size {}", page_size);

        let pages = drain_all(&mut ring);
        let expected: Vec<Vec<u8>> = (capacity..2 * capacity)
            .map(|i| page(i, page_size as usize))
            .collect();
        assert_eq!(pages, expected);
    }
}

#[test]
fn test_many_laps_preserve_order() {
    let mut ring = formatted_ring(64);
    let mut buf = [0u8; 64];
    let mut next_read = 0u32;

    for i in 0..3000u32 {
        assert!(ring.write(&page(i, 64)).unwrap(), "write {} refused", i);
        // keep the reader ~400 records behind
        if i >= 400 {
            assert!(ring.read(&mut buf).unwrap());
            assert_eq!(buf.as_slice(), page(next_read, 64).as_slice());
            next_read += 1;
        }
    }

    assert_eq!(ring.len().unwrap() as u32, 3000 - next_read);
    let rest = drain_all(&mut ring);
    assert_eq!(rest.len() as u32, 3000 - next_read);
    assert_eq!(rest.last().unwrap(), &page(2999, 64));
}

#[test]
fn test_queries_are_side_effect_free() {
    let mut ring = RingBuffer::new(CountingStore::new(FramStore::new())).unwrap();
    ring.format(64).unwrap();
    fill(&mut ring, 0, 511);

    ring.store_mut().reset();
    let mut buf = [0u8; 64];
    for _ in 0..3 {
        assert!(ring.is_full().unwrap());
        assert!(ring.contains_data().unwrap());
        assert_eq!(ring.len().unwrap(), 511);
        assert!(ring.peek(&mut buf).unwrap());
    }

    assert_eq!(ring.store().writes, 0);
    assert!(ring.store().reads > 0);
}

#[test]
fn test_write_persists_only_changed_fields() {
    let mut ring = RingBuffer::new(CountingStore::new(FramStore::new())).unwrap();
    ring.format(16).unwrap();
    ring.store_mut().reset();

    assert!(ring.write(&[0xA5; 16]).unwrap());

    // 16 data bytes + 2 head bytes; page size, head, tail, flip read once
    assert_eq!(ring.store().writes, 18);
    assert_eq!(ring.store().reads, 7);
}

#[test]
fn test_initialization_handshake() {
    let mut store = FramStore::new();
    assert!(!is_initialized(&mut store));

    let mut ring = RingBuffer::new(store).unwrap();
    assert!(!ring.is_initialized());
    ring.format(64).unwrap();
    assert!(ring.is_initialized());

    let mut store = ring.into_inner();
    assert!(is_initialized(&mut store));
}

#[test]
fn test_resume_after_power_cycle() {
    let mut ring = formatted_ring(64);
    fill(&mut ring, 0, 10);

    let mut buf = [0u8; 64];
    for _ in 0..3 {
        ring.read(&mut buf).unwrap();
    }

    let mut ring = reboot(ring);
    assert!(ring.is_initialized());
    assert_eq!(ring.len().unwrap(), 7);

    assert_eq!(fill(&mut ring, 10, 2), 2);
    let pages = drain_all(&mut ring);
    let expected: Vec<Vec<u8>> = (3..12).map(|i| page(i, 64)).collect();
    assert_eq!(pages, expected);
}

#[test]
fn test_brownout_after_wrap_commit() {
    let mut ring = formatted_ring(64);
    fill(&mut ring, 0, 511);
    let mut buf = [0u8; 64];
    ring.read(&mut buf).unwrap();

    // power fails right after head (2 bytes) and flip marker (1 byte) land
    let store = BrownoutStore::new(ring.into_inner(), 3);
    let mut ring = RingBuffer::new(store).unwrap();
    assert!(ring.write(&page(511, 64)).unwrap());

    let mut ring = RingBuffer::new(ring.into_inner().into_inner()).unwrap();
    let status = ring.status();
    assert_eq!((status.head, status.tail, status.flip_marker), (0, 64, FLIP_SET));

    // the wrapped record is lost, everything before it survives
    let pages = drain_all(&mut ring);
    let expected: Vec<Vec<u8>> = (1..511).map(|i| page(i, 64)).collect();
    assert_eq!(pages, expected);
}

#[test]
fn test_independent_rings_on_independent_stores() {
    let mut small = RingBuffer::new(MemoryStore::<256>::new()).unwrap();
    let mut large = formatted_ring(32);
    small.format(8).unwrap();

    fill(&mut small, 0, 100);
    fill(&mut large, 1000, 5);

    assert_eq!(small.len().unwrap(), 28);
    assert_eq!(large.len().unwrap(), 5);
}
