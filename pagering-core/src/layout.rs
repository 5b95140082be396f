//! Address Space Partition
//!
//! Splits a store into the data region `[0, metadata_start)` and the
//! metadata region `[metadata_start, capacity)`:
//!
//! ```text
//! 0                                         metadata_start     capacity
//! ├──────────────── data region ──────────────────┼── boot sector ──┤
//! │ page 0 │ page 1 │  ...  │ page n-1 │ unusable │     32 bytes    │
//! ```
//!
//! When the page size does not divide `metadata_start`, the remainder at the
//! top of the data region is never used.

use crate::constants::layout::{MAX_STORE_CAPACITY, METADATA_SIZE};
use crate::errors::{RingError, RingResult};

/// Geometry of one store, fixed for the lifetime of a `RingBuffer`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Layout {
    metadata_start: u16,
}

impl Layout {
    /// Smallest store that leaves at least one data byte
    pub const MIN_CAPACITY: usize = METADATA_SIZE + 1;

    /// Partition a store of `capacity` bytes
    pub const fn for_capacity(capacity: usize) -> RingResult<Self> {
        if capacity < Self::MIN_CAPACITY {
            return Err(RingError::StoreTooSmall {
                capacity,
                required: Self::MIN_CAPACITY,
            });
        }
        if capacity > MAX_STORE_CAPACITY {
            return Err(RingError::StoreTooLarge {
                capacity,
                max: MAX_STORE_CAPACITY,
            });
        }

        Ok(Self {
            metadata_start: (capacity - METADATA_SIZE) as u16,
        })
    }

    /// First address of the metadata region, one past the data region
    pub const fn metadata_start(&self) -> u16 {
        self.metadata_start
    }

    /// Number of bytes available for pages
    pub const fn data_len(&self) -> u16 {
        self.metadata_start
    }

    /// Whole pages of `page_size` that fit in the data region
    pub const fn capacity_in_pages(&self, page_size: u16) -> u16 {
        if page_size == 0 {
            0
        } else {
            self.metadata_start / page_size
        }
    }

    /// Bytes at the top of the data region too small to hold a page
    pub const fn unusable_bytes(&self, page_size: u16) -> u16 {
        if page_size == 0 {
            self.metadata_start
        } else {
            self.metadata_start % page_size
        }
    }
}
