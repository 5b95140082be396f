//! Boot Sector Codec
//!
//! Translates the control fields of the ring buffer to and from the bytes
//! stored in the metadata region. Byte order is **little-endian** for every
//! multi-byte field; this is the only compatibility contract for data that
//! is already on a device.
//!
//! Field accessors issue one store access per byte and never cache, so a
//! value read here is always the last value that reached the device.

use crate::constants::layout::{
    FLIP_CLEAR, FLIP_OFFSET, FLIP_SET, HEAD_OFFSET, MAGIC, MAGIC_OFFSET, METADATA_SIZE,
    PAGE_SIZE_OFFSET, TAIL_OFFSET,
};
use crate::layout::Layout;
use crate::store::ByteStore;

/// Encode a 2-byte field
pub const fn encode_u16(value: u16) -> [u8; 2] {
    value.to_le_bytes()
}

/// Decode a 2-byte field
pub const fn decode_u16(bytes: [u8; 2]) -> u16 {
    u16::from_le_bytes(bytes)
}

/// Encode a 4-byte field
pub const fn encode_u32(value: u32) -> [u8; 4] {
    value.to_le_bytes()
}

/// Decode a 4-byte field
pub const fn decode_u32(bytes: [u8; 4]) -> u32 {
    u32::from_le_bytes(bytes)
}

/// Read `N` consecutive bytes starting at `address`
pub(crate) fn read_bytes<S: ByteStore, const N: usize>(store: &mut S, address: u16) -> [u8; N] {
    let mut bytes = [0u8; N];
    for (i, byte) in bytes.iter_mut().enumerate() {
        *byte = store.read_byte(address + i as u16);
    }
    bytes
}

/// Write `bytes` to consecutive addresses starting at `address`
pub(crate) fn write_bytes<S: ByteStore>(store: &mut S, address: u16, bytes: &[u8]) {
    for (i, byte) in bytes.iter().enumerate() {
        store.write_byte(address + i as u16, *byte);
    }
}

/// True iff the sentinel at the start of the metadata region matches
///
/// Used by callers to decide whether `format` is required. Stores too small
/// to hold a metadata region are never initialized.
pub fn is_initialized<S: ByteStore>(store: &mut S) -> bool {
    match Layout::for_capacity(store.capacity()) {
        Ok(layout) => {
            let bytes = read_bytes::<_, 4>(store, layout.metadata_start() + MAGIC_OFFSET);
            decode_u32(bytes) == MAGIC
        }
        Err(_) => false,
    }
}

/// Typed accessors for the individual control fields
///
/// Each getter is a store read and each setter a store write, so the
/// engine can persist exactly the fields an operation changes.
pub(crate) struct ControlFields {
    base: u16,
}

impl ControlFields {
    pub(crate) const fn new(layout: &Layout) -> Self {
        Self { base: layout.metadata_start() }
    }

    pub(crate) fn head<S: ByteStore>(&self, store: &mut S) -> u16 {
        decode_u16(read_bytes(store, self.base + HEAD_OFFSET))
    }

    pub(crate) fn set_head<S: ByteStore>(&self, store: &mut S, head: u16) {
        write_bytes(store, self.base + HEAD_OFFSET, &encode_u16(head));
    }

    pub(crate) fn tail<S: ByteStore>(&self, store: &mut S) -> u16 {
        decode_u16(read_bytes(store, self.base + TAIL_OFFSET))
    }

    pub(crate) fn set_tail<S: ByteStore>(&self, store: &mut S, tail: u16) {
        write_bytes(store, self.base + TAIL_OFFSET, &encode_u16(tail));
    }

    pub(crate) fn page_size<S: ByteStore>(&self, store: &mut S) -> u16 {
        decode_u16(read_bytes(store, self.base + PAGE_SIZE_OFFSET))
    }

    pub(crate) fn flipped<S: ByteStore>(&self, store: &mut S) -> bool {
        store.read_byte(self.base + FLIP_OFFSET) != FLIP_CLEAR
    }

    pub(crate) fn set_flipped<S: ByteStore>(&self, store: &mut S, flipped: bool) {
        let marker = if flipped { FLIP_SET } else { FLIP_CLEAR };
        store.write_byte(self.base + FLIP_OFFSET, marker);
    }
}

/// Decoded snapshot of the whole metadata region
///
/// Produced by `RingBuffer::status` and the diagnostics module; holding one
/// does not keep the store in sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BootSector {
    /// Initialization sentinel
    pub magic: u32,
    /// Next page to write
    pub head: u16,
    /// Next page to read
    pub tail: u16,
    /// Fixed page size in bytes
    pub page_size: u16,
    /// Raw flip marker byte
    pub flip_marker: u8,
}

impl BootSector {
    /// Image written by `format(page_size)`
    pub const fn formatted(page_size: u16) -> Self {
        Self {
            magic: MAGIC,
            head: 0,
            tail: 0,
            page_size,
            flip_marker: FLIP_CLEAR,
        }
    }

    /// Decode from the raw metadata region
    pub fn from_bytes(bytes: &[u8; METADATA_SIZE]) -> Self {
        let field = |offset: u16| [bytes[offset as usize], bytes[offset as usize + 1]];
        let m = MAGIC_OFFSET as usize;

        Self {
            magic: decode_u32([bytes[m], bytes[m + 1], bytes[m + 2], bytes[m + 3]]),
            head: decode_u16(field(HEAD_OFFSET)),
            tail: decode_u16(field(TAIL_OFFSET)),
            page_size: decode_u16(field(PAGE_SIZE_OFFSET)),
            flip_marker: bytes[FLIP_OFFSET as usize],
        }
    }

    /// Encode into a metadata region image; reserved bytes are zero
    pub fn to_bytes(&self) -> [u8; METADATA_SIZE] {
        let mut bytes = [0u8; METADATA_SIZE];
        let mut put = |offset: u16, field: &[u8]| {
            let start = offset as usize;
            bytes[start..start + field.len()].copy_from_slice(field);
        };

        put(MAGIC_OFFSET, &encode_u32(self.magic));
        put(HEAD_OFFSET, &encode_u16(self.head));
        put(TAIL_OFFSET, &encode_u16(self.tail));
        put(PAGE_SIZE_OFFSET, &encode_u16(self.page_size));
        put(FLIP_OFFSET, &[self.flip_marker]);
        bytes
    }

    /// Read the metadata region of `store` described by `layout`
    pub fn read_from<S: ByteStore>(store: &mut S, layout: &Layout) -> Self {
        Self::from_bytes(&read_bytes(store, layout.metadata_start()))
    }

    /// True when the sentinel matches
    pub fn is_initialized(&self) -> bool {
        self.magic == MAGIC
    }

    /// True when head has lapped tail
    pub fn is_flipped(&self) -> bool {
        self.flip_marker != FLIP_CLEAR
    }
}
