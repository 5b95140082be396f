//! Durable Sensor Log Example
//!
//! Queues timestamped readings in a simulated 32 KiB FRAM, survives a
//! power cycle, and drains what was stored.
//!
//! ## What You'll Learn
//!
//! - The initialization handshake (`is_initialized` / `format`)
//! - Writing and reading fixed-size pages
//! - Handling a full buffer
//! - Resuming after a restart
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_sensor_log
//! ```

use pagering_core::{MemoryStore, RingBuffer, RingResult};

const PAGE_SIZE: u16 = 16;

/// One log record: timestamp (ms) + sensor id + reading in centi-degrees
fn encode(timestamp: u64, sensor: u16, centi_celsius: i32) -> [u8; PAGE_SIZE as usize] {
    let mut page = [0u8; PAGE_SIZE as usize];
    page[..8].copy_from_slice(&timestamp.to_le_bytes());
    page[8..10].copy_from_slice(&sensor.to_le_bytes());
    page[10..14].copy_from_slice(&centi_celsius.to_le_bytes());
    page
}

fn decode(page: &[u8]) -> (u64, u16, i32) {
    let timestamp = u64::from_le_bytes(page[..8].try_into().unwrap_or_default());
    let sensor = u16::from_le_bytes([page[8], page[9]]);
    let reading = i32::from_le_bytes([page[10], page[11], page[12], page[13]]);
    (timestamp, sensor, reading)
}

fn main() -> RingResult<()> {
    println!("PageRing Sensor Log Example");
    println!("===========================\n");

    let mut ring = RingBuffer::new(MemoryStore::<32768>::new())?;
    if !ring.is_initialized() {
        println!("Device not initialized, formatting with {}-byte pages", PAGE_SIZE);
        ring.format(PAGE_SIZE)?;
    }
    println!("Capacity: {} pages\n", ring.capacity()?);

    // Log a burst of readings
    let mut dropped = 0;
    for i in 0..2100u64 {
        let page = encode(i * 1000, 1, 2150 + (i as i32 % 40));
        if !ring.write(&page)? {
            dropped += 1;
        }
    }
    println!("Logged {} pages, dropped {} (buffer full)", ring.len()?, dropped);

    // Simulate a power cycle: rebuild everything from the device bytes
    let image = *ring.into_inner().image();
    let mut ring = RingBuffer::new(MemoryStore::from_image(image))?;
    println!("After restart: initialized={}, {} pages queued\n", ring.is_initialized(), ring.len()?);

    // Upload the first few records
    let mut page = [0u8; PAGE_SIZE as usize];
    for _ in 0..5 {
        if ring.read(&mut page)? {
            let (timestamp, sensor, reading) = decode(&page);
            println!("  t={:6}ms sensor={} {:.2}°C", timestamp, sensor, reading as f32 / 100.0);
        }
    }

    let remaining = ring.drain::<{ PAGE_SIZE as usize }>().filter(Result::is_ok).count();
    println!("\nDrained {} more pages, buffer empty: {}", remaining, ring.is_empty()?);

    Ok(())
}
