//! Store doubles for integration testing
//!
//! Wrap a real store and observe the traffic the engine generates.

use pagering_core::store::ByteStore;

/// Counts every byte access that reaches the inner store
pub struct CountingStore<S> {
    inner: S,
    pub reads: usize,
    pub writes: usize,
}

impl<S: ByteStore> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner, reads: 0, writes: 0 }
    }

    pub fn reset(&mut self) {
        self.reads = 0;
        self.writes = 0;
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: ByteStore> ByteStore for CountingStore<S> {
    fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    fn read_byte(&mut self, address: u16) -> u8 {
        self.reads += 1;
        self.inner.read_byte(address)
    }

    fn write_byte(&mut self, address: u16, value: u8) {
        self.writes += 1;
        self.inner.write_byte(address, value)
    }
}

/// Simulates power loss: accepts `budget` writes, silently drops the rest
pub struct BrownoutStore<S> {
    inner: S,
    budget: usize,
}

impl<S: ByteStore> BrownoutStore<S> {
    pub fn new(inner: S, budget: usize) -> Self {
        Self { inner, budget }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: ByteStore> ByteStore for BrownoutStore<S> {
    fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    fn read_byte(&mut self, address: u16) -> u8 {
        self.inner.read_byte(address)
    }

    fn write_byte(&mut self, address: u16, value: u8) {
        if self.budget > 0 {
            self.budget -= 1;
            self.inner.write_byte(address, value);
        }
    }
}
