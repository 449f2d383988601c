use core::{
    borrow::{Borrow, BorrowMut},
    mem::size_of,
};

use mips_air_core_executor::{events::AluEvent, ExecutionRecord};
use mips_air_stark::{
    air::{check_row_buffer, MachineAir, TraceGenError},
    TraceGenOpts, Word,
};
use p3_air::BaseAir;
use p3_field::{AbstractField, Field, PrimeField32};
use p3_matrix::dense::RowMajorMatrix;
use p3_maybe_rayon::prelude::{ParallelBridge, ParallelIterator};
use sp1_derive::AlignedBorrow;
use tracing::instrument;

use crate::{
    operations::AddOperation,
    utils::{next_power_of_two, zeroed_f_vec},
};

/// The number of main trace columns for `AddSubChip`.
pub const NUM_ADD_SUB_COLS: usize = size_of::<AddSubCols<u8>>();

/// A chip that implements addition for the opcodes ADD, ADDU, ADDI, ADDIU, SUB and SUBU.
///
/// SUB is an ADD with a re-arrangement of the operands and result. Given `a = b OP c`,
/// `a = b + c` is verified for ADD and `b = a + c` (that is, `a = b - c`) for SUB.
#[derive(Debug, Clone, Copy)]
pub struct AddSubChip {
    /// Parallelism and padding knobs.
    pub opts: TraceGenOpts,
}

/// The column layout for the chip.
#[derive(AlignedBorrow, Default, Debug, Clone, Copy)]
#[repr(C)]
pub struct AddSubCols<T> {
    /// The program counter.
    pub pc: T,

    /// The addition checked by the row. Its result is `a` for an add and `b` for a sub.
    pub add_operation: AddOperation<T>,

    /// The first input operand. This is `b` for add operations and `a` for sub operations.
    pub operand_1: Word<T>,

    /// The second input operand. This is `c` for both operations.
    pub operand_2: Word<T>,

    /// Whether the destination is not register 0.
    pub op_a_not_0: T,

    /// Whether the row is an add.
    pub is_add: T,

    /// Whether the row is a sub.
    pub is_sub: T,

    /// Whether the row holds an event.
    pub is_real: T,
}

impl Default for AddSubChip {
    /// The chip configured from the `TRACEGEN_*` environment variables.
    fn default() -> Self {
        Self::new(TraceGenOpts::from_env())
    }
}

impl AddSubChip {
    /// Creates the chip with the given knobs.
    #[must_use]
    pub const fn new(opts: TraceGenOpts) -> Self {
        Self { opts }
    }

    /// Create a row from an event.
    pub fn event_to_row<F: Field>(event: &AluEvent, cols: &mut AddSubCols<F>) {
        cols.pc = F::from_canonical_u32(event.pc);

        let is_add = event.opcode.is_addition();
        cols.is_add = F::from_bool(is_add);
        cols.is_sub = F::from_bool(event.opcode.is_subtraction());
        cols.is_real = F::one();

        let operand_1 = if is_add { event.b } else { event.a };
        let operand_2 = event.c;

        cols.add_operation.populate(operand_1, operand_2);
        cols.operand_1 = Word::from(operand_1);
        cols.operand_2 = Word::from(operand_2);
        cols.op_a_not_0 = F::from_bool(!event.op_a_0);
    }

    /// Fills one row per event into a caller-owned buffer of whole rows and returns the number of
    /// rows in the buffer. Rows past the events are zeroed.
    pub fn generate_trace_into<'a, F: Field>(
        &self,
        events: impl IntoIterator<Item = &'a AluEvent>,
        values: &mut [F],
    ) -> Result<usize, TraceGenError> {
        let events = events.into_iter().collect::<Vec<_>>();
        let nb_rows = check_row_buffer(values.len(), NUM_ADD_SUB_COLS, events.len())?;
        let chunk_size = self.opts.chunk_size(events.len());

        values.chunks_mut(chunk_size * NUM_ADD_SUB_COLS).enumerate().par_bridge().for_each(
            |(i, rows)| {
                rows.chunks_mut(NUM_ADD_SUB_COLS).enumerate().for_each(|(j, row)| {
                    let idx = i * chunk_size + j;
                    let cols: &mut AddSubCols<F> = row.borrow_mut();
                    if idx < events.len() {
                        Self::event_to_row(events[idx], cols);
                    } else {
                        *cols = AddSubCols::default();
                    }
                });
            },
        );
        Ok(nb_rows)
    }
}

impl<F: PrimeField32> MachineAir<F> for AddSubChip {
    type Record = ExecutionRecord;

    fn name(&self) -> String {
        "AddSub".to_string()
    }

    fn num_rows(&self, input: &Self::Record) -> Result<usize, TraceGenError> {
        next_power_of_two(
            input.add_events.len() + input.sub_events.len(),
            self.opts.fixed_log2_rows,
        )
    }

    #[instrument(name = "generate add/sub trace", level = "debug", skip_all)]
    fn generate_trace(&self, input: &ExecutionRecord) -> Result<RowMajorMatrix<F>, TraceGenError> {
        let padded_nb_rows = <AddSubChip as MachineAir<F>>::num_rows(self, input)?;
        let mut values = zeroed_f_vec(padded_nb_rows * NUM_ADD_SUB_COLS);
        self.generate_trace_into(input.add_sub_events(), &mut values)?;
        tracing::debug!(
            events = input.add_events.len() + input.sub_events.len(),
            rows = padded_nb_rows,
            "add/sub trace filled"
        );

        // Convert the trace to a row major matrix.
        Ok(RowMajorMatrix::new(values, NUM_ADD_SUB_COLS))
    }

    fn included(&self, shard: &Self::Record) -> bool {
        !shard.add_events.is_empty() || !shard.sub_events.is_empty()
    }
}

impl<F> BaseAir<F> for AddSubChip {
    fn width(&self) -> usize {
        NUM_ADD_SUB_COLS
    }
}

#[cfg(test)]
mod tests {
    use mips_air_core_executor::Opcode;
    use p3_baby_bear::BabyBear;
    use p3_field::AbstractField;
    use p3_matrix::Matrix;
    use rand::{thread_rng, Rng};
    use strum::IntoEnumIterator;

    use super::*;

    fn row(event: &AluEvent) -> AddSubCols<BabyBear> {
        let mut cols = AddSubCols::<BabyBear>::default();
        AddSubChip::event_to_row(event, &mut cols);
        cols
    }

    fn row_values(event: &AluEvent) -> Vec<BabyBear> {
        let mut values = vec![BabyBear::zero(); NUM_ADD_SUB_COLS];
        let cols: &mut AddSubCols<BabyBear> = values.as_mut_slice().borrow_mut();
        AddSubChip::event_to_row(event, cols);
        values
    }

    #[test]
    fn test_add_row() {
        let cols = row(&AluEvent::new(0x40, Opcode::ADDU, 0x1_0000, 0xFFFF, 1, false));
        assert_eq!(cols.pc, BabyBear::from_canonical_u32(0x40));
        assert_eq!(cols.operand_1.to_u32(), 0xFFFF);
        assert_eq!(cols.operand_2.to_u32(), 1);
        assert_eq!(cols.add_operation.value.to_u32(), 0x1_0000);
        assert_eq!(cols.add_operation.carry, [BabyBear::one(), BabyBear::one(), BabyBear::zero()]);
        assert_eq!(
            (cols.is_add, cols.is_sub, cols.is_real),
            (BabyBear::one(), BabyBear::zero(), BabyBear::one())
        );
        assert_eq!(cols.op_a_not_0, BabyBear::one());
    }

    #[test]
    fn test_sub_row_checks_b_equals_a_plus_c() {
        // 5 - 7 wraps to 0xFFFFFFFE.
        let cols = row(&AluEvent::new(0, Opcode::SUB, 0xFFFF_FFFE, 5, 7, true));
        assert_eq!(cols.operand_1.to_u32(), 0xFFFF_FFFE);
        assert_eq!(cols.operand_2.to_u32(), 7);
        assert_eq!(cols.add_operation.value.to_u32(), 5);
        assert_eq!(cols.add_operation.carry, [BabyBear::one(); 3]);
        assert_eq!((cols.is_add, cols.is_sub), (BabyBear::zero(), BabyBear::one()));
        assert_eq!(cols.op_a_not_0, BabyBear::zero());
    }

    #[test]
    fn test_selectors_follow_opcode() {
        for opcode in Opcode::iter() {
            let cols = row(&AluEvent::new(0, opcode, 3, 1, 2, false));
            assert_eq!(cols.is_add, BabyBear::from_bool(opcode.is_addition()), "{opcode}");
            assert_eq!(cols.is_sub, BabyBear::from_bool(opcode.is_subtraction()), "{opcode}");
        }
    }

    #[test]
    fn test_random_events() {
        let mut rng = thread_rng();
        for _ in 0..200 {
            let (b, c) = (rng.gen::<u32>(), rng.gen::<u32>());
            let add = row(&AluEvent::new(0, Opcode::ADDIU, b.wrapping_add(c), b, c, false));
            assert_eq!(add.add_operation.value.to_u32(), b.wrapping_add(c));
            let sub = row(&AluEvent::new(0, Opcode::SUBU, b.wrapping_sub(c), b, c, false));
            assert_eq!(sub.add_operation.value.to_u32(), b);
            assert_eq!(sub.operand_1.to_u32(), b.wrapping_sub(c));
        }
    }

    #[test]
    fn test_generate_trace() {
        let mut record = ExecutionRecord::default();
        for i in 0..37u32 {
            record.add_alu_event(AluEvent::new(4 * i, Opcode::ADD, 2 * i, i, i, false));
            if i % 3 == 0 {
                record.add_alu_event(AluEvent::new(4 * i, Opcode::SUB, 0, i, i, false));
            }
        }
        let chip =
            AddSubChip::new(TraceGenOpts { chunking_multiplier: 3, ..TraceGenOpts::default() });
        let trace: RowMajorMatrix<BabyBear> = chip.generate_trace(&record).unwrap();
        assert_eq!(trace.width(), NUM_ADD_SUB_COLS);
        assert_eq!(trace.height(), 64);

        let events = record.add_sub_events().collect::<Vec<_>>();
        for (i, values) in trace.values.chunks(NUM_ADD_SUB_COLS).enumerate() {
            if let Some(event) = events.get(i) {
                assert_eq!(values, row_values(event).as_slice());
            } else {
                let cols: &AddSubCols<BabyBear> = values.borrow();
                assert_eq!(cols.is_real, BabyBear::zero());
                assert!(values.iter().all(|v| *v == BabyBear::zero()));
            }
        }
    }

    #[test]
    fn test_rejects_short_buffer() {
        let events = vec![AluEvent::new(0, Opcode::ADD, 2, 1, 1, false); 3];
        let mut values = vec![BabyBear::zero(); 2 * NUM_ADD_SUB_COLS];
        assert_eq!(
            AddSubChip::default().generate_trace_into(&events, &mut values),
            Err(TraceGenError::RowBufferHeight { rows: 2, required: 3 })
        );
        let mut ragged = vec![BabyBear::zero(); 3 * NUM_ADD_SUB_COLS + 1];
        assert!(matches!(
            AddSubChip::default().generate_trace_into(&events, &mut ragged),
            Err(TraceGenError::RowBufferWidth { .. })
        ));
    }

    #[test]
    fn test_reused_buffer_is_repadded() {
        let events = (0..3).map(|i| AluEvent::new(4 * i, Opcode::ADD, i, i, 0, false));
        let events = events.collect::<Vec<_>>();
        let chip = AddSubChip::default();
        let mut values = vec![BabyBear::zero(); 4 * NUM_ADD_SUB_COLS];
        chip.generate_trace_into(&events, &mut values).unwrap();
        chip.generate_trace_into(&events[..1], &mut values).unwrap();
        assert!(values[NUM_ADD_SUB_COLS..].iter().all(|v| *v == BabyBear::zero()));
    }

    #[test]
    fn test_default_reads_environment() {
        assert_eq!(AddSubChip::default().opts, TraceGenOpts::from_env());
    }

    #[test]
    fn test_empty_record() {
        let record = ExecutionRecord::default();
        let chip = AddSubChip::default();
        assert!(!<AddSubChip as MachineAir<BabyBear>>::included(&chip, &record));
        let trace: RowMajorMatrix<BabyBear> = chip.generate_trace(&record).unwrap();
        assert_eq!(trace.height(), 16);
    }
}
