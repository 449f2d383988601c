//! C-ABI entry points for the row fillers, instantiated at BabyBear.
//!
//! Each takes the event and the row to fill, in that order, and keeps no reference to either
//! after returning.

use mips_air_core_executor::events::{AluEvent, MemoryLocalEvent};
use p3_baby_bear::BabyBear;

use crate::{
    alu::{AddSubChip, AddSubCols},
    memory::{MemoryLocalChip, MemoryLocalCols},
};

/// Fills an add/sub row.
#[no_mangle]
pub extern "C" fn add_sub_event_to_row_babybear(event: &AluEvent, cols: &mut AddSubCols<BabyBear>) {
    AddSubChip::event_to_row(event, cols);
}

/// Fills a memory local row, accumulating onto the event's `prev_digest`.
#[no_mangle]
pub extern "C" fn memory_local_event_to_row_babybear(
    event: &MemoryLocalEvent,
    cols: &mut MemoryLocalCols<BabyBear>,
) {
    MemoryLocalChip::event_to_row(event, cols);
}

#[cfg(test)]
mod tests {
    use core::borrow::BorrowMut;

    use mips_air_core_executor::{
        events::{MemoryAccessKind, MemoryRecord},
        ExecutionRecord, Opcode,
    };
    use mips_air_stark::{air::MachineAir, TraceGenOpts};
    use p3_field::AbstractField;
    use p3_matrix::dense::RowMajorMatrix;

    use super::*;
    use crate::{alu::NUM_ADD_SUB_COLS, memory::NUM_MEMORY_LOCAL_COLS};

    #[test]
    fn test_add_sub_shim_matches_filler() {
        for (opcode, a, b, c) in [
            (Opcode::ADD, 7, 3, 4),
            (Opcode::ADDI, 0, u32::MAX, 1),
            (Opcode::SUBU, u32::MAX, 0, 1),
        ] {
            let event = AluEvent::new(0x1000, opcode, a, b, c, false);
            let mut via_shim = vec![BabyBear::zero(); NUM_ADD_SUB_COLS];
            add_sub_event_to_row_babybear(&event, via_shim.as_mut_slice().borrow_mut());
            let mut direct = vec![BabyBear::zero(); NUM_ADD_SUB_COLS];
            AddSubChip::event_to_row(&event, direct.as_mut_slice().borrow_mut());
            assert_eq!(via_shim, direct);
        }
    }

    #[test]
    fn test_memory_local_shim_matches_trace() {
        let mut events = vec![
            MemoryLocalEvent::write(0x20, MemoryRecord::new(1, 0, 11), 1, 4, 12),
            MemoryLocalEvent::read(0x24, MemoryRecord::new(1, 2, 5), 1, 8),
            MemoryLocalEvent::new(
                0x20,
                MemoryAccessKind::Read,
                MemoryRecord::new(1, 4, 12),
                MemoryRecord::new(1, 12, 12),
            ),
        ];
        let chip = MemoryLocalChip::new(TraceGenOpts::default());
        chip.assign_prev_digests::<BabyBear>(&mut events);

        let mut record = ExecutionRecord::default();
        events.iter().for_each(|event| record.add_local_memory_event(*event));
        let trace: RowMajorMatrix<BabyBear> = chip.generate_trace(&record).unwrap();

        for (event, row) in events.iter().zip(trace.values.chunks(NUM_MEMORY_LOCAL_COLS)) {
            let mut via_shim = vec![BabyBear::zero(); NUM_MEMORY_LOCAL_COLS];
            memory_local_event_to_row_babybear(event, via_shim.as_mut_slice().borrow_mut());
            assert_eq!(via_shim.as_slice(), row);
        }
    }
}
