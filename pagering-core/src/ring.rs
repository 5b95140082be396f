//! Persistent Ring Buffer of Fixed-Size Pages
//!
//! ## Overview
//!
//! [`RingBuffer`] queues fixed-size records ("pages") in a byte-addressable
//! non-volatile store so they survive power cycles. The control state lives
//! in the boot sector at the top of the store and is the *only* state: the
//! engine keeps no copy of head, tail or the flip marker between calls.
//!
//! ```text
//! Producer                          Consumer
//!    ↓                                 ↑
//!  write ──→ data region [0, start) ──→ read
//!    ↓                                 ↑
//!  head ─────── boot sector ─────── tail, flip
//! ```
//!
//! ## Operations
//!
//! Every operation is a short read-modify-write transaction:
//!
//! 1. Read `page_size`, `head`, `tail` and the flip marker from the store
//! 2. Plan the operation with the pure [`Cursor`] state machine
//! 3. Commit a pending wrap (pointer reset + parity toggle), if any
//! 4. Transfer the page
//! 5. Persist the advanced pointer
//!
//! Only fields whose value changes are written back.
//!
//! ## Power Loss
//!
//! There is no journal. A wrap is committed as its own step before the page
//! transfer, so losing power between steps 3 and 5 leaves a wrapped pointer
//! with no new page behind it. The buffer stays consistent but the record in
//! flight is lost. Losing power inside step 3 itself (pointer written, flip
//! marker not yet) leaves the parity out of step with the pointers.
//!
//! ## Thread Safety
//!
//! Operations are synchronous and non-reentrant. Share one store between
//! tasks by wrapping the `RingBuffer` in a mutex; every call performs
//! unprotected multi-step updates of persisted state.
//!
//! ## Example
//!
//! ```rust
//! use pagering_core::{RingBuffer, MemoryStore};
//!
//! let mut ring = RingBuffer::new(MemoryStore::<1024>::new()).unwrap();
//! if !ring.is_initialized() {
//!     ring.format(64).unwrap();
//! }
//!
//! assert!(ring.write(b"sample #1").unwrap());
//!
//! let mut page = [0u8; 64];
//! assert!(ring.read(&mut page).unwrap());
//! assert_eq!(&page[..9], b"sample #1");
//! assert!(!ring.contains_data().unwrap());
//! ```

use crate::boot_sector::{write_bytes, BootSector, ControlFields};
use crate::constants::layout::{HEAD_OFFSET, MAGIC_OFFSET};
use crate::cursor::{Cursor, Geometry, ReadPlan, WritePlan};
use crate::errors::{RingError, RingResult};
use crate::layout::Layout;
use crate::store::ByteStore;

/// Ring buffer engine over a [`ByteStore`]
///
/// Owns the store for its lifetime; get it back with
/// [`into_inner`](RingBuffer::into_inner). Only the immutable [`Layout`] is
/// held in memory.
pub struct RingBuffer<S: ByteStore> {
    store: S,
    layout: Layout,
    fields: ControlFields,
}

impl<S: ByteStore> RingBuffer<S> {
    /// Take ownership of `store` and partition its address space
    ///
    /// Performs no store I/O. Fails only when the capacity cannot hold the
    /// boot sector plus data, or does not fit 2-byte addresses.
    pub fn new(store: S) -> RingResult<Self> {
        let layout = Layout::for_capacity(store.capacity())?;

        Ok(Self {
            store,
            fields: ControlFields::new(&layout),
            layout,
        })
    }

    /// Initialize the boot sector for pages of `page_size` bytes
    ///
    /// Resets head, tail and the flip marker and stamps the sentinel. The
    /// data region is left as is: stale bytes are never read back.
    ///
    /// `page_size` must be in `[1, metadata_start]`; any remainder of the
    /// data region past the last whole page is unused.
    pub fn format(&mut self, page_size: u16) -> RingResult<()> {
        let max = self.layout.metadata_start();
        if page_size == 0 || page_size > max {
            return Err(RingError::InvalidPageSize { page_size, max });
        }

        let image = BootSector::formatted(page_size).to_bytes();
        let start = self.layout.metadata_start();

        // Sentinel last: a torn format never reads as initialized
        let fields_start = HEAD_OFFSET as usize;
        write_bytes(&mut self.store, start + HEAD_OFFSET, &image[fields_start..]);
        write_bytes(&mut self.store, start + MAGIC_OFFSET, &image[..fields_start]);

        log_debug!(
            "formatted ring: page_size={} capacity={} pages",
            page_size,
            self.layout.capacity_in_pages(page_size)
        );
        Ok(())
    }

    /// Zero the data region, then [`format`](RingBuffer::format)
    pub fn format_and_clear(&mut self, page_size: u16) -> RingResult<()> {
        let max = self.layout.metadata_start();
        if page_size == 0 || page_size > max {
            return Err(RingError::InvalidPageSize { page_size, max });
        }

        for address in 0..self.layout.data_len() {
            self.store.write_byte(address, 0x00);
        }
        self.format(page_size)
    }

    /// Append one page
    ///
    /// Pages shorter than the page size are zero-padded; the full page is
    /// always transferred. Returns `Ok(false)` when the buffer is full, in
    /// which case no data byte is written (a pending head wrap may still be
    /// committed).
    pub fn write(&mut self, page: &[u8]) -> RingResult<bool> {
        let (geometry, cursor) = self.load()?;
        let page_size = geometry.page_size();

        if page.len() > page_size as usize {
            log_warn!("rejected page of {} bytes, page size is {}", page.len(), page_size);
            return Err(RingError::PageTooLarge { len: page.len(), page_size });
        }

        match cursor.plan_write(&geometry) {
            WritePlan::Write { at, next } => {
                self.store_page(at, page_size, page);
                self.persist(&cursor, &next);
                Ok(true)
            }
            WritePlan::WrapThenWrite { wrapped, at, next } => {
                log_debug!("head wrapped at {:#06x}, tail at {:#06x}", cursor.head, cursor.tail);
                self.persist(&cursor, &wrapped);
                self.store_page(at, page_size, page);
                self.persist(&wrapped, &next);
                Ok(true)
            }
            WritePlan::WrapThenFull { wrapped } => {
                log_debug!("head wrapped onto tail at {:#06x}, buffer full", cursor.tail);
                self.persist(&cursor, &wrapped);
                Ok(false)
            }
            WritePlan::Full => {
                log_trace!("write refused, buffer full");
                Ok(false)
            }
        }
    }

    /// Remove the oldest page into `buf[..page_size]`
    ///
    /// Returns `Ok(false)` when the buffer is empty. `buf` must hold at
    /// least one page; bytes past the page size are left untouched.
    pub fn read(&mut self, buf: &mut [u8]) -> RingResult<bool> {
        let (geometry, cursor) = self.load()?;
        let page_size = geometry.page_size();
        Self::check_buffer(buf, page_size)?;

        match cursor.plan_read(&geometry) {
            ReadPlan::Read { at, next } => {
                self.fetch_page(at, &mut buf[..page_size as usize]);
                self.persist(&cursor, &next);
                Ok(true)
            }
            ReadPlan::WrapThenRead { wrapped, at, next } => {
                log_debug!("tail wrapped at {:#06x}, head at {:#06x}", cursor.tail, cursor.head);
                self.persist(&cursor, &wrapped);
                self.fetch_page(at, &mut buf[..page_size as usize]);
                self.persist(&wrapped, &next);
                Ok(true)
            }
            ReadPlan::WrapThenEmpty { wrapped } => {
                log_debug!("tail wrapped onto head, buffer empty");
                self.persist(&cursor, &wrapped);
                Ok(false)
            }
            ReadPlan::Empty => {
                log_trace!("read refused, buffer empty");
                Ok(false)
            }
        }
    }

    /// Copy the oldest page without removing it
    pub fn peek(&mut self, buf: &mut [u8]) -> RingResult<bool> {
        let (geometry, cursor) = self.load()?;
        let page_size = geometry.page_size();
        Self::check_buffer(buf, page_size)?;

        match cursor.plan_read(&geometry).address() {
            Some(at) => {
                self.fetch_page(at, &mut buf[..page_size as usize]);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Would the next `write` be refused?
    pub fn is_full(&mut self) -> RingResult<bool> {
        let (geometry, cursor) = self.load()?;
        Ok(!cursor.plan_write(&geometry).accepts())
    }

    /// Would the next `read` yield a page?
    pub fn contains_data(&mut self) -> RingResult<bool> {
        let (geometry, cursor) = self.load()?;
        Ok(cursor.plan_read(&geometry).yields())
    }

    /// Does the boot sector carry the sentinel written by `format`?
    pub fn is_initialized(&mut self) -> bool {
        BootSector::read_from(&mut self.store, &self.layout).is_initialized()
    }

    /// Number of pages currently queued
    pub fn len(&mut self) -> RingResult<u16> {
        let (geometry, cursor) = self.load()?;
        Ok(cursor.len(&geometry))
    }

    /// True when no page is queued
    pub fn is_empty(&mut self) -> RingResult<bool> {
        self.contains_data().map(|has_data| !has_data)
    }

    /// Maximum number of pages the buffer holds
    pub fn capacity(&mut self) -> RingResult<u16> {
        Ok(self.geometry()?.capacity())
    }

    /// Page size fixed at format time
    pub fn page_size(&mut self) -> RingResult<u16> {
        Ok(self.geometry()?.page_size())
    }

    /// Decoded copy of the boot sector
    pub fn status(&mut self) -> BootSector {
        BootSector::read_from(&mut self.store, &self.layout)
    }

    /// Address space partition of the underlying store
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Non-blocking `write`: `WouldBlock` while the buffer is full
    pub fn poll_write(&mut self, page: &[u8]) -> nb::Result<(), RingError> {
        match self.write(page) {
            Ok(true) => Ok(()),
            Ok(false) => Err(nb::Error::WouldBlock),
            Err(e) => Err(nb::Error::Other(e)),
        }
    }

    /// Non-blocking `read`: `WouldBlock` while the buffer is empty
    pub fn poll_read(&mut self, buf: &mut [u8]) -> nb::Result<(), RingError> {
        match self.read(buf) {
            Ok(true) => Ok(()),
            Ok(false) => Err(nb::Error::WouldBlock),
            Err(e) => Err(nb::Error::Other(e)),
        }
    }

    /// Read pages until the buffer is empty
    ///
    /// `N` is the largest page size the iterator can carry; a larger
    /// formatted page size yields a single `BufferTooSmall` error.
    pub fn drain<const N: usize>(&mut self) -> Drain<'_, S, N> {
        Drain { ring: self, done: false }
    }

    /// Shared access to the store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Exclusive access to the store
    ///
    /// Writes into the boot sector through this handle bypass every check.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Release the store
    pub fn into_inner(self) -> S {
        self.store
    }

    fn geometry(&mut self) -> RingResult<Geometry> {
        let page_size = self.fields.page_size(&mut self.store);
        Geometry::new(page_size, &self.layout).map_err(Self::report_corruption)
    }

    fn load(&mut self) -> RingResult<(Geometry, Cursor)> {
        let geometry = self.geometry()?;
        let cursor = Cursor {
            head: self.fields.head(&mut self.store),
            tail: self.fields.tail(&mut self.store),
            flipped: self.fields.flipped(&mut self.store),
        };
        cursor.check(&geometry).map_err(Self::report_corruption)?;
        Ok((geometry, cursor))
    }

    fn report_corruption(err: RingError) -> RingError {
        log_warn!("{}", err);
        err
    }

    fn check_buffer(buf: &[u8], page_size: u16) -> RingResult<()> {
        if buf.len() < page_size as usize {
            return Err(RingError::BufferTooSmall { len: buf.len(), page_size });
        }
        Ok(())
    }

    /// Write back the fields that differ between `from` and `to`
    fn persist(&mut self, from: &Cursor, to: &Cursor) {
        if from.head != to.head {
            self.fields.set_head(&mut self.store, to.head);
        }
        if from.tail != to.tail {
            self.fields.set_tail(&mut self.store, to.tail);
        }
        if from.flipped != to.flipped {
            self.fields.set_flipped(&mut self.store, to.flipped);
        }
    }

    fn store_page(&mut self, at: u16, page_size: u16, page: &[u8]) {
        for offset in 0..page_size {
            let byte = page.get(offset as usize).copied().unwrap_or(0);
            self.store.write_byte(at + offset, byte);
        }
    }

    fn fetch_page(&mut self, at: u16, buf: &mut [u8]) {
        for (offset, byte) in buf.iter_mut().enumerate() {
            *byte = self.store.read_byte(at + offset as u16);
        }
    }
}

/// Draining iterator returned by [`RingBuffer::drain`]
pub struct Drain<'a, S: ByteStore, const N: usize> {
    ring: &'a mut RingBuffer<S>,
    done: bool,
}

impl<'a, S: ByteStore, const N: usize> Iterator for Drain<'a, S, N> {
    type Item = RingResult<heapless::Vec<u8, N>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.ring.page_size().and_then(|page_size| {
            let mut page = heapless::Vec::<u8, N>::new();
            page.resize(page_size as usize, 0)
                .map_err(|_| RingError::BufferTooSmall { len: N, page_size })?;
            self.ring.read(&mut page).map(|read| read.then_some(page))
        });

        match result {
            Ok(Some(page)) => Some(Ok(page)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
