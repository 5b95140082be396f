//! Persistent page ring buffer for PageRing
//!
//! Queues fixed-size records durably on byte-addressable non-volatile
//! memory (I2C/SPI FRAM, byte-writable EEPROM) that has no block or
//! filesystem layer of its own.
//!
//! Key constraints:
//! - Only single-byte reads and writes reach the device
//! - No heap allocation
//! - Control state lives on the device, never cached in RAM
//! - Full and empty are told apart by one parity byte, no counter
//!
//! ```no_run
//! use pagering_core::{RingBuffer, MemoryStore};
//!
//! let mut ring = RingBuffer::new(MemoryStore::<32768>::new())?;
//! if !ring.is_initialized() {
//!     ring.format(64)?;
//! }
//!
//! // Queue a record, drop it if the buffer is full
//! if !ring.write(&[0x42; 64])? {
//!     // full, retry later
//! }
//! # Ok::<(), pagering_core::RingError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod boot_sector;
pub mod constants;
pub mod cursor;
pub mod diagnostics;
pub mod errors;
pub mod layout;
pub mod ring;
pub mod store;

// Public API
pub use boot_sector::{is_initialized, BootSector};
pub use errors::{RingError, RingResult};
pub use layout::Layout;
pub use ring::{Drain, RingBuffer};
pub use store::{ByteStore, MemoryStore};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
