//! Constants for PageRing Core
//!
//! Centralized constants used throughout the crate. The layout constants
//! describe persisted state and must never change between releases; the
//! diagnostics constants only affect human-readable output.
//!
//! ## Organization
//!
//! - **Layout**: device geometry, boot sector offsets and field values
//! - **Diagnostics**: formatting of hex dumps

/// Device geometry and the byte-exact boot sector layout.
pub mod layout;

/// Diagnostic output formatting.
pub mod diagnostics {
    /// Bytes rendered per line of a hex dump.
    pub const BYTES_PER_DUMP_LINE: usize = 32;
}

// Re-export commonly used constants for convenience
pub use layout::{
    DEFAULT_STORE_CAPACITY, MAX_STORE_CAPACITY, METADATA_SIZE, MAGIC,
    FLIP_CLEAR, FLIP_SET,
};

pub use diagnostics::BYTES_PER_DUMP_LINE;
