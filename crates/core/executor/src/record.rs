use serde::{Deserialize, Serialize};

use crate::events::{AluEvent, MemoryLocalEvent};

/// The events of one shard, grouped by the chip that proves them.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ExecutionRecord {
    /// The ADD, ADDU, ADDI and ADDIU events.
    pub add_events: Vec<AluEvent>,
    /// The SUB and SUBU events.
    pub sub_events: Vec<AluEvent>,
    /// The shard's local memory events, in accumulation order.
    pub cpu_local_memory_access: Vec<MemoryLocalEvent>,
}

impl ExecutionRecord {
    /// Routes an ALU event to its chip's list. Opcodes the add/sub chip does not prove are
    /// dropped.
    pub fn add_alu_event(&mut self, event: AluEvent) {
        if event.opcode.is_addition() {
            self.add_events.push(event);
        } else if event.opcode.is_subtraction() {
            self.sub_events.push(event);
        } else {
            tracing::debug!("no chip for {} in this record, dropping event", event.opcode);
        }
    }

    /// Appends a local memory event.
    pub fn add_local_memory_event(&mut self, event: MemoryLocalEvent) {
        self.cpu_local_memory_access.push(event);
    }

    /// The add events followed by the sub events, the row order of the add/sub chip.
    pub fn add_sub_events(&self) -> impl Iterator<Item = &AluEvent> {
        self.add_events.iter().chain(self.sub_events.iter())
    }

    /// The local memory events.
    pub fn get_local_mem_events(&self) -> impl Iterator<Item = &MemoryLocalEvent> {
        self.cpu_local_memory_access.iter()
    }
}
