use mips_air_stark::septic_curve::SepticCurve;
use serde::{Deserialize, Serialize};

/// The state of a memory word at some point of the execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(C)]
pub struct MemoryRecord {
    /// The shard of the last access.
    pub shard: u32,
    /// The timestamp of the last access.
    pub timestamp: u32,
    /// The stored value.
    pub value: u32,
}

impl MemoryRecord {
    /// Create a new [`MemoryRecord`].
    #[must_use]
    pub const fn new(shard: u32, timestamp: u32, value: u32) -> Self {
        Self { shard, timestamp, value }
    }

    /// The seven limbs hashed onto the curve for this state of `addr`:
    /// `[shard, timestamp, addr, value bytes (little endian)]`.
    #[must_use]
    pub const fn interaction_message(&self, addr: u32) -> [u32; 7] {
        let bytes = self.value.to_le_bytes();
        [
            self.shard,
            self.timestamp,
            addr,
            bytes[0] as u32,
            bytes[1] as u32,
            bytes[2] as u32,
            bytes[3] as u32,
        ]
    }
}

/// Whether an access reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MemoryAccessKind {
    /// The value is observed and left unchanged.
    Read = 0,
    /// A new value replaces the old one.
    Write = 1,
}

/// A memory access, reduced to the state it observed and the state it left.
///
/// `prev_digest` is the running curve sum of every earlier event of the shard, in the affine
/// column encoding where both coordinates zero stand for the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(C)]
pub struct MemoryLocalEvent {
    /// The address.
    pub addr: u32,
    /// Read or write.
    pub kind: MemoryAccessKind,
    /// The state observed by the access.
    pub initial_mem_access: MemoryRecord,
    /// The state left by the access.
    pub final_mem_access: MemoryRecord,
    /// The accumulator before this event.
    pub prev_digest: SepticCurve<u32>,
}

impl MemoryLocalEvent {
    /// An event whose accumulator predecessor is still unknown (the identity).
    #[must_use]
    pub fn new(
        addr: u32,
        kind: MemoryAccessKind,
        initial_mem_access: MemoryRecord,
        final_mem_access: MemoryRecord,
    ) -> Self {
        Self {
            addr,
            kind,
            initial_mem_access,
            final_mem_access,
            prev_digest: SepticCurve::default(),
        }
    }

    /// A read at `(shard, timestamp)` of a word last touched at `initial`.
    #[must_use]
    pub fn read(addr: u32, initial: MemoryRecord, shard: u32, timestamp: u32) -> Self {
        let final_mem_access = MemoryRecord::new(shard, timestamp, initial.value);
        Self::new(addr, MemoryAccessKind::Read, initial, final_mem_access)
    }

    /// A write of `value` at `(shard, timestamp)` over a word last touched at `initial`.
    #[must_use]
    pub fn write(
        addr: u32,
        initial: MemoryRecord,
        shard: u32,
        timestamp: u32,
        value: u32,
    ) -> Self {
        let final_mem_access = MemoryRecord::new(shard, timestamp, value);
        Self::new(addr, MemoryAccessKind::Write, initial, final_mem_access)
    }

    /// The same event with its accumulator predecessor set.
    #[must_use]
    pub fn with_prev_digest(mut self, prev_digest: SepticCurve<u32>) -> Self {
        self.prev_digest = prev_digest;
        self
    }
}
