//! Error Types for Ring Buffer Operations
//!
//! ## Design Philosophy
//!
//! Errors follow the same rules as the rest of the crate:
//!
//! 1. **Small Size**: every variant carries a few integers or a `&'static str`,
//!    so the whole enum fits in 16 bytes and can be returned by value.
//!
//! 2. **No Heap Allocation**: no `String`s, messages are static.
//!
//! 3. **Copy Semantics**: errors are `Copy` and cheap to pass around.
//!
//! ## What Is *Not* an Error
//!
//! A full buffer on `write` and an empty buffer on `read` are normal outcomes
//! and are reported as `Ok(false)`. Errors are reserved for misuse (wrong
//! page size, undersized buffers) and for control fields that would make the
//! engine address memory outside the store.
//!
//! ```rust
//! use pagering_core::{RingBuffer, RingError, MemoryStore};
//!
//! let mut ring = RingBuffer::new(MemoryStore::<1024>::new()).unwrap();
//! ring.format(16).unwrap();
//!
//! match ring.write(&[0u8; 32]) {
//!     Ok(true) => {}                                  // stored
//!     Ok(false) => {}                                 // full, retry later
//!     Err(RingError::PageTooLarge { .. }) => {}       // caller bug
//!     Err(_) => {}
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for ring buffer operations
pub type RingResult<T> = Result<T, RingError>;

/// Ring buffer errors - kept small for embedded use
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingError {
    /// Store cannot hold the metadata region plus at least one data byte
    #[error("Store of {capacity} bytes is too small, need at least {required}")]
    StoreTooSmall {
        /// Capacity reported by the store
        capacity: usize,
        /// Smallest usable capacity
        required: usize,
    },

    /// Store addresses do not fit the 2-byte pointer fields
    #[error("Store of {capacity} bytes exceeds the {max} byte address space")]
    StoreTooLarge {
        /// Capacity reported by the store
        capacity: usize,
        /// Largest supported capacity
        max: usize,
    },

    /// Page size is zero or larger than the data region
    #[error("Page size {page_size} invalid, must be in [1, {max}]")]
    InvalidPageSize {
        page_size: u16,
        max: u16,
    },

    /// Page handed to `write` is longer than the formatted page size
    #[error("Page of {len} bytes exceeds page size {page_size}")]
    PageTooLarge {
        len: usize,
        page_size: u16,
    },

    /// Destination buffer cannot hold a full page
    #[error("Buffer of {len} bytes cannot hold page size {page_size}")]
    BufferTooSmall {
        len: usize,
        page_size: u16,
    },

    /// Persisted head/tail/page size would address outside the data region
    #[error("Corrupt control block: {reason}")]
    CorruptControlBlock {
        reason: &'static str,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for RingError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::StoreTooSmall { capacity, required } =>
                defmt::write!(fmt, "Store {} bytes < {}", capacity, required),
            Self::StoreTooLarge { capacity, max } =>
                defmt::write!(fmt, "Store {} bytes > {}", capacity, max),
            Self::InvalidPageSize { page_size, max } =>
                defmt::write!(fmt, "Page size {} not in [1, {}]", page_size, max),
            Self::PageTooLarge { len, page_size } =>
                defmt::write!(fmt, "Page {} bytes > {}", len, page_size),
            Self::BufferTooSmall { len, page_size } =>
                defmt::write!(fmt, "Buffer {} bytes < {}", len, page_size),
            Self::CorruptControlBlock { reason } =>
                defmt::write!(fmt, "Corrupt control block: {}", reason),
        }
    }
}
