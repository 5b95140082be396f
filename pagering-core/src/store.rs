//! Byte-Addressable Store Abstraction
//!
//! The ring buffer never talks to hardware directly. It drives a
//! [`ByteStore`]: a fixed-capacity linear address space with single-byte
//! random read and write, which is exactly what an I2C/SPI FRAM or a
//! byte-writable EEPROM driver exposes.
//!
//! ## Contract
//!
//! - Addresses run from `0` to `capacity() - 1`
//! - Reads and writes are synchronous and complete before returning
//! - Transport errors are the driver's concern; at this layer both
//!   primitives are infallible
//! - No larger atomic unit than a single byte may be assumed
//!
//! ## Implementations
//!
//! - [`MemoryStore`]: RAM-backed array, used for tests and host simulation
//! - Hardware drivers implement the trait in the application crate
//!
//! ```rust
//! use pagering_core::store::{ByteStore, MemoryStore};
//!
//! let mut store = MemoryStore::<64>::new();
//! store.write_byte(10, 0xAB);
//! assert_eq!(store.read_byte(10), 0xAB);
//! assert_eq!(store.capacity(), 64);
//! ```

/// Single-byte random access to non-volatile memory
///
/// Both primitives take `&mut self`: bus drivers need exclusive access to
/// the peripheral for the duration of a transfer.
///
/// ## Example Implementation
///
/// ```rust
/// use pagering_core::store::ByteStore;
///
/// struct Fram {
///     // ... I2C bus handle and device address
/// #   cells: [u8; 256],
/// }
///
/// impl ByteStore for Fram {
///     fn capacity(&self) -> usize {
///         256
///     }
///
///     fn read_byte(&mut self, address: u16) -> u8 {
///         // Issue a random-read transaction
/// #       self.cells[address as usize]
///     }
///
///     fn write_byte(&mut self, address: u16, value: u8) {
///         // Issue a byte-write transaction
/// #       self.cells[address as usize] = value;
///     }
/// }
/// ```
pub trait ByteStore {
    /// Total number of addressable bytes
    fn capacity(&self) -> usize;

    /// Read the byte at `address`
    fn read_byte(&mut self, address: u16) -> u8;

    /// Write `value` at `address`
    fn write_byte(&mut self, address: u16, value: u8);
}

impl<S: ByteStore + ?Sized> ByteStore for &mut S {
    fn capacity(&self) -> usize {
        (**self).capacity()
    }

    fn read_byte(&mut self, address: u16) -> u8 {
        (**self).read_byte(address)
    }

    fn write_byte(&mut self, address: u16, value: u8) {
        (**self).write_byte(address, value)
    }
}

/// RAM-backed store for testing and host-side simulation
///
/// ## Use Cases
///
/// 1. **Unit Testing**: deterministic, inspectable device contents
/// 2. **Power-Cycle Simulation**: copy the [`image`](MemoryStore::image) and
///    rebuild a store with [`from_image`](MemoryStore::from_image)
/// 3. **Host Tools**: load a dump read off a device and inspect it
///
/// Fresh stores are filled with `0xFF`, like erased EEPROM and most FRAM
/// parts shipped from the factory, so an unformatted store never reads as
/// initialized by accident.
///
/// The default capacity matches the 32 KiB reference device.
#[derive(Clone)]
pub struct MemoryStore<const N: usize = { crate::constants::DEFAULT_STORE_CAPACITY }> {
    cells: [u8; N],
}

impl<const N: usize> MemoryStore<N> {
    /// Create a store in the erased (`0xFF`) state
    pub const fn new() -> Self {
        Self { cells: [0xFF; N] }
    }

    /// Create a store filled with `value`
    pub const fn filled(value: u8) -> Self {
        Self { cells: [value; N] }
    }

    /// Create a store from a previously captured image
    pub const fn from_image(image: [u8; N]) -> Self {
        Self { cells: image }
    }

    /// Raw device contents
    pub fn image(&self) -> &[u8; N] {
        &self.cells
    }

    /// Mutable raw device contents, for fault injection in tests
    pub fn image_mut(&mut self) -> &mut [u8; N] {
        &mut self.cells
    }
}

impl<const N: usize> Default for MemoryStore<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ByteStore for MemoryStore<N> {
    fn capacity(&self) -> usize {
        N
    }

    fn read_byte(&mut self, address: u16) -> u8 {
        self.cells[address as usize]
    }

    fn write_byte(&mut self, address: u16, value: u8) {
        self.cells[address as usize] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_store_is_erased() {
        let mut store = MemoryStore::<16>::new();
        assert_eq!(store.capacity(), 16);
        assert!((0..16).all(|a| store.read_byte(a) == 0xFF));
    }

    #[test]
    fn image_round_trip() {
        let mut store = MemoryStore::<8>::filled(0);
        store.write_byte(3, 0x42);

        let mut copy = MemoryStore::from_image(*store.image());
        assert_eq!(copy.read_byte(3), 0x42);
        assert_eq!(copy.read_byte(4), 0x00);
    }

    #[test]
    fn mutable_reference_is_a_store() {
        fn poke<S: ByteStore>(mut store: S) -> usize {
            store.write_byte(1, 7);
            store.capacity()
        }

        let mut store = MemoryStore::<8>::filled(0);
        assert_eq!(poke(&mut store), 8);
        assert_eq!(store.read_byte(1), 7);
    }
}
