//! Common test utilities for integration tests
//!
//! This module provides:
//! - Store doubles that count or drop device traffic
//! - Deterministic page generators
//! - Helpers to fill and drain a ring

#![allow(dead_code)]

use pagering_core::{ByteStore, MemoryStore, RingBuffer};

pub mod store;

/// Reference device: 32 KiB, boot sector at 32736
pub type FramStore = MemoryStore<32768>;

/// Build a formatted ring over a fresh reference device
pub fn formatted_ring(page_size: u16) -> RingBuffer<FramStore> {
    let mut ring = RingBuffer::new(FramStore::new()).expect("reference capacity is valid");
    ring.format(page_size).expect("page size fits data region");
    ring
}

/// Distinct, recognisable page content for record `index`
pub fn page(index: u32, len: usize) -> Vec<u8> {
    let tag = index.to_le_bytes();
    (0..len)
        .map(|i| tag[i % 4] ^ (i as u8).wrapping_mul(31))
        .collect()
}

/// Write records `first..first + count`; returns how many were accepted
pub fn fill<S: ByteStore>(ring: &mut RingBuffer<S>, first: u32, count: u32) -> u32 {
    let page_size = ring.page_size().unwrap() as usize;
    (first..first + count)
        .take_while(|&i| ring.write(&page(i, page_size)).unwrap())
        .count() as u32
}

/// Read until empty, returning every page in order
pub fn drain_all<S: ByteStore>(ring: &mut RingBuffer<S>) -> Vec<Vec<u8>> {
    let page_size = ring.page_size().unwrap() as usize;
    let mut pages = Vec::new();
    let mut buf = vec![0u8; page_size];
    while ring.read(&mut buf).unwrap() {
        pages.push(buf.clone());
    }
    pages
}

/// Power-cycle: rebuild the engine over a copy of the device contents
pub fn reboot<const N: usize>(ring: RingBuffer<MemoryStore<N>>) -> RingBuffer<MemoryStore<N>> {
    let image = *ring.into_inner().image();
    RingBuffer::new(MemoryStore::from_image(image)).expect("capacity unchanged")
}
