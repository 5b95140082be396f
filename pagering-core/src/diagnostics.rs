//! Read-only diagnostic rendering
//!
//! Both renderers write to any [`core::fmt::Write`] sink (a UART wrapper,
//! a `heapless::String`, a `std::string::String`) and never write to the
//! store.
//!
//! ```text
//! 0x0000: 0x00 0x01 0x02 ... (32 bytes per line)
//! 0x0020: ...
//! ```

use core::fmt::{self, Write};

use crate::boot_sector::BootSector;
use crate::constants::{BYTES_PER_DUMP_LINE, MAX_STORE_CAPACITY};
use crate::layout::Layout;
use crate::store::ByteStore;

/// Hex dump of the whole address space, one line per 32 bytes
pub fn dump<S: ByteStore, W: Write>(store: &mut S, sink: &mut W) -> fmt::Result {
    let end = store.capacity().min(MAX_STORE_CAPACITY);
    for address in 0..end {
        if address % BYTES_PER_DUMP_LINE == 0 {
            if address > 0 {
                writeln!(sink)?;
            }
            write!(sink, "{:#06x}:", address)?;
        }
        write!(sink, " {:#04x}", store.read_byte(address as u16))?;
    }
    writeln!(sink)
}

/// Field-by-field rendering of the boot sector
///
/// Stores too small to carry one render nothing.
pub fn dump_boot_sector<S: ByteStore, W: Write>(store: &mut S, sink: &mut W) -> fmt::Result {
    match Layout::for_capacity(store.capacity()) {
        Ok(layout) => write!(sink, "{}", BootSector::read_from(store, &layout)),
        Err(_) => Ok(()),
    }
}

impl fmt::Display for BootSector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Magic\t\t{:#010x}", self.magic)?;
        writeln!(f, "Head\t\t{:#06x}", self.head)?;
        writeln!(f, "Tail\t\t{:#06x}", self.tail)?;
        writeln!(f, "Pagesize\t{:#06x}", self.page_size)?;
        writeln!(f, "Flip\t\t{:#04x}", self.flip_marker)
    }
}
