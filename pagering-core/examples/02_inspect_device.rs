//! Device Inspection Example
//!
//! Renders the boot sector and the start of the data region of a store
//! the way a bring-up or field-service tool would.
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 02_inspect_device
//! ```

use pagering_core::{diagnostics, MemoryStore, RingBuffer, RingResult};

fn main() -> RingResult<()> {
    let mut ring = RingBuffer::new(MemoryStore::<1024>::new())?;
    ring.format_and_clear(32)?;

    for i in 0..40u8 {
        ring.write(&[i; 32])?;
    }
    let mut page = [0u8; 32];
    for _ in 0..3 {
        ring.read(&mut page)?;
    }

    let mut report = String::new();
    // Writing into a String cannot fail
    let _ = diagnostics::dump_boot_sector(ring.store_mut(), &mut report);
    println!("Boot sector\n-----------\n{}", report);

    report.clear();
    let _ = diagnostics::dump(ring.store_mut(), &mut report);
    println!("Device contents\n---------------");
    for line in report.lines().take(4) {
        println!("{}", line);
    }
    println!("...");
    for line in report.lines().skip(30) {
        println!("{}", line);
    }

    println!("\nQueued: {} of {} pages, full: {}", ring.len()?, ring.capacity()?, ring.is_full()?);
    Ok(())
}
