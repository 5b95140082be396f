//! Persisted Layout of the Metadata Region
//!
//! This module defines the byte-exact layout of the boot sector that sits at
//! the top of the store. These values are load-bearing: changing any of them
//! makes previously formatted devices unreadable.
//!
//! ```text
//! metadata_start = capacity - METADATA_SIZE
//! ┌──────────┬────────┬────────┬───────────┬──────┬──────────────┐
//! │  magic   │  head  │  tail  │ page_size │ flip │   reserved   │
//! │ 4 bytes  │ 2 bytes│ 2 bytes│  2 bytes  │ 1 B  │   21 bytes   │
//! └──────────┴────────┴────────┴───────────┴──────┴──────────────┘
//!  +0         +4       +6       +8          +10    +11
//! ```
//!
//! All multi-byte fields are little-endian.

// ===== DEVICE GEOMETRY =====

/// Capacity of the reference device in bytes.
///
/// Matches a 256 Kbit I2C FRAM (MB85RC256V class part):
/// - 32768 addressable bytes
/// - Single-byte random read/write
///
/// Source: MB85RC256V datasheet
pub const DEFAULT_STORE_CAPACITY: usize = 32 * 1024;

/// Largest store the engine will drive.
///
/// Every address, and both pointer fields, are 2 bytes wide, so the
/// address space tops out at 64 KiB.
pub const MAX_STORE_CAPACITY: usize = 1 << 16;

/// Size of the metadata region (boot sector) in bytes.
pub const METADATA_SIZE: usize = 32;

// ===== FIELD OFFSETS (relative to metadata_start) =====

/// Offset of the 4-byte initialization sentinel.
pub const MAGIC_OFFSET: u16 = 0;

/// Offset of the 2-byte head pointer (next page to write).
pub const HEAD_OFFSET: u16 = 4;

/// Offset of the 2-byte tail pointer (next page to read).
pub const TAIL_OFFSET: u16 = 6;

/// Offset of the 2-byte page size, fixed at format time.
pub const PAGE_SIZE_OFFSET: u16 = 8;

/// Offset of the 1-byte flip marker.
pub const FLIP_OFFSET: u16 = 10;

// ===== FIELD VALUES =====

/// Sentinel written by `format`; its presence marks the store as initialized.
pub const MAGIC: u32 = 0xFEED_C0DE;

/// Flip marker value when head and tail are on the same lap.
pub const FLIP_CLEAR: u8 = 0x00;

/// Flip marker value written when head has lapped tail.
///
/// Readers treat any nonzero byte as set.
pub const FLIP_SET: u8 = 0xFF;

/// First address of the data region.
pub const DATA_START: u16 = 0;
