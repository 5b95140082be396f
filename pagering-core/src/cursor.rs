//! Head/Tail State Machine
//!
//! ## Overview
//!
//! The persisted control state is two pointers and one parity bit:
//!
//! ```text
//! flipped = false (same lap)            flipped = true (head lapped tail)
//! ┌────┬────┬────┬────┬────┬──┐         ┌────┬────┬────┬────┬────┬──┐
//! │    │ ## │ ## │ ## │    │  │         │ ## │    │    │ ## │ ## │  │
//! └────┴────┴────┴────┴────┴──┘         └────┴────┴────┴────┴────┴──┘
//!        ↑              ↑                       ↑         ↑
//!       tail          head                    head      tail
//! ```
//!
//! `head == tail` means **empty** when `flipped` is clear and **full** when it
//! is set. No element counter is stored.
//!
//! ## Lazy Wrap
//!
//! A pointer is only moved back to 0 when the *next* operation finds that a
//! page would overrun the data region. The wrap is committed (pointer reset
//! plus parity toggle) before the room/data check, so a write refused
//! because the buffer is full may still leave `head` wrapped.
//!
//! Everything here is pure: plans are computed from a [`Cursor`] snapshot
//! and applied to the store by `RingBuffer`, which keeps every branch
//! testable without a device.

use crate::errors::{RingError, RingResult};
use crate::layout::Layout;

/// Page size and the end of the data region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    page_size: u16,
    data_end: u16,
}

impl Geometry {
    /// Check a persisted page size against the data region
    pub fn new(page_size: u16, layout: &Layout) -> RingResult<Self> {
        let data_end = layout.metadata_start();

        if page_size == 0 {
            return Err(RingError::CorruptControlBlock { reason: "page size is zero" });
        }
        if page_size > data_end {
            return Err(RingError::CorruptControlBlock {
                reason: "page size exceeds data region",
            });
        }

        Ok(Self { page_size, data_end })
    }

    /// Page size in bytes
    pub const fn page_size(&self) -> u16 {
        self.page_size
    }

    /// One past the last data byte
    pub const fn data_end(&self) -> u16 {
        self.data_end
    }

    /// Pages that fit in the data region
    pub const fn capacity(&self) -> u16 {
        self.data_end / self.page_size
    }

    /// Address a pointer wraps from: the end of the last whole page
    pub const fn lap_end(&self) -> u16 {
        self.capacity() * self.page_size
    }

    /// Would a page starting at `address` overrun the data region?
    const fn overruns(&self, address: u16) -> bool {
        address as u32 + self.page_size as u32 > self.data_end as u32
    }
}

/// Snapshot of the persisted pointers and parity bit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Next page to write
    pub head: u16,
    /// Next page to read
    pub tail: u16,
    /// Head has wrapped past tail's lap
    pub flipped: bool,
}

/// Outcome of planning a write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePlan {
    /// Room at `at`; persist `next` afterwards
    Write { at: u16, next: Cursor },
    /// Commit `wrapped`, then write at `at` and persist `next`
    WrapThenWrite { wrapped: Cursor, at: u16, next: Cursor },
    /// Commit `wrapped`; the wrap ran straight into tail
    WrapThenFull { wrapped: Cursor },
    /// Head has caught up with tail
    Full,
}

/// Outcome of planning a read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadPlan {
    /// Data at `at`; persist `next` afterwards
    Read { at: u16, next: Cursor },
    /// Commit `wrapped`, then read at `at` and persist `next`
    WrapThenRead { wrapped: Cursor, at: u16, next: Cursor },
    /// Commit `wrapped`; tail wrapped exactly onto head
    WrapThenEmpty { wrapped: Cursor },
    /// Tail has caught up with head
    Empty,
}

impl WritePlan {
    /// Does this plan store a page?
    pub const fn accepts(&self) -> bool {
        matches!(self, Self::Write { .. } | Self::WrapThenWrite { .. })
    }
}

impl ReadPlan {
    /// Does this plan yield a page?
    pub const fn yields(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::WrapThenRead { .. })
    }

    /// Address of the page this plan yields
    pub const fn address(&self) -> Option<u16> {
        match self {
            Self::Read { at, .. } | Self::WrapThenRead { at, .. } => Some(*at),
            Self::WrapThenEmpty { .. } | Self::Empty => None,
        }
    }
}

impl Cursor {
    /// State right after `format`
    pub const fn formatted() -> Self {
        Self { head: 0, tail: 0, flipped: false }
    }

    /// Reject pointers that would address outside the data region
    ///
    /// A pointer may sit exactly on `data_end` until the next operation
    /// wraps it.
    pub fn check(&self, geometry: &Geometry) -> RingResult<()> {
        for pointer in [self.head, self.tail] {
            if pointer > geometry.data_end {
                return Err(RingError::CorruptControlBlock {
                    reason: "pointer beyond data region",
                });
            }
            if pointer % geometry.page_size != 0 {
                return Err(RingError::CorruptControlBlock {
                    reason: "pointer not page aligned",
                });
            }
        }
        Ok(())
    }

    /// Decide where the next write goes
    pub fn plan_write(&self, geometry: &Geometry) -> WritePlan {
        let page_size = geometry.page_size;

        if !self.flipped {
            if geometry.overruns(self.head) {
                let wrapped = Cursor { head: 0, flipped: true, ..*self };
                // Same rule as the flipped branch below: room while head < tail
                if page_size <= self.tail {
                    WritePlan::WrapThenWrite {
                        wrapped,
                        at: 0,
                        next: Cursor { head: page_size, ..wrapped },
                    }
                } else {
                    WritePlan::WrapThenFull { wrapped }
                }
            } else {
                WritePlan::Write {
                    at: self.head,
                    next: Cursor { head: self.head + page_size, ..*self },
                }
            }
        } else if self.head < self.tail {
            WritePlan::Write {
                at: self.head,
                next: Cursor { head: self.head + page_size, ..*self },
            }
        } else {
            WritePlan::Full
        }
    }

    /// Decide where the next read comes from
    pub fn plan_read(&self, geometry: &Geometry) -> ReadPlan {
        let page_size = geometry.page_size;

        if !self.flipped {
            if self.tail < self.head {
                ReadPlan::Read {
                    at: self.tail,
                    next: Cursor { tail: self.tail + page_size, ..*self },
                }
            } else {
                ReadPlan::Empty
            }
        } else if geometry.overruns(self.tail) {
            let wrapped = Cursor { tail: 0, flipped: false, ..*self };
            if self.head > 0 {
                ReadPlan::WrapThenRead {
                    wrapped,
                    at: 0,
                    next: Cursor { tail: page_size, ..wrapped },
                }
            } else {
                ReadPlan::WrapThenEmpty { wrapped }
            }
        } else {
            ReadPlan::Read {
                at: self.tail,
                next: Cursor { tail: self.tail + page_size, ..*self },
            }
        }
    }

    /// Pages currently stored
    pub fn len(&self, geometry: &Geometry) -> u16 {
        let page_size = geometry.page_size;

        if self.flipped {
            let lap_remaining = geometry.lap_end().saturating_sub(self.tail);
            lap_remaining / page_size + self.head / page_size
        } else {
            self.head.saturating_sub(self.tail) / page_size
        }
    }
}
