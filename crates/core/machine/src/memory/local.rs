use std::{
    borrow::{Borrow, BorrowMut},
    mem::size_of,
};

use mips_air_core_executor::{
    events::{MemoryAccessKind, MemoryLocalEvent},
    ExecutionRecord,
};
use mips_air_stark::{
    air::{check_row_buffer, MachineAir, TraceGenError},
    septic_curve::{SepticCurve, SepticCurveComplete},
    TraceGenOpts, Word,
};
use p3_air::BaseAir;
use p3_field::{AbstractField, PrimeField32};
use p3_matrix::dense::RowMajorMatrix;
use p3_maybe_rayon::prelude::{
    IndexedParallelIterator, IntoParallelIterator, IntoParallelRefIterator,
    IntoParallelRefMutIterator, ParallelBridge, ParallelIterator,
};
use rayon_scan::ScanParallelIterator;
use sp1_derive::AlignedBorrow;
use tracing::{debug_span, instrument};

use crate::{
    operations::{GlobalAccumulationOperation, GlobalInteractionOperation},
    utils::{next_power_of_two, zeroed_f_vec},
};

/// The number of main trace columns for `MemoryLocalChip`.
pub const NUM_MEMORY_LOCAL_COLS: usize = size_of::<MemoryLocalCols<u8>>();

/// The column layout for the chip: one memory event per row, followed by the running digest.
#[derive(AlignedBorrow, Default, Debug, Clone, Copy)]
#[repr(C)]
pub struct MemoryLocalCols<T> {
    /// The address of the memory access.
    pub addr: T,

    /// The initial shard of the memory access.
    pub initial_shard: T,

    /// The final shard of the memory access.
    pub final_shard: T,

    /// The initial clk of the memory access.
    pub initial_clk: T,

    /// The final clk of the memory access.
    pub final_clk: T,

    /// The initial value of the memory access.
    pub initial_value: Word<T>,

    /// The final value of the memory access.
    pub final_value: Word<T>,

    /// Whether the access is a read.
    pub is_read: T,

    /// Whether the access is a write.
    pub is_write: T,

    /// The global interaction columns for initial access.
    pub initial_global_interaction_cols: GlobalInteractionOperation<T>,

    /// The global interaction columns for final access.
    pub final_global_interaction_cols: GlobalInteractionOperation<T>,

    /// The digest before and after this row.
    pub accumulation: GlobalAccumulationOperation<T>,

    /// Whether the memory access is a real access.
    pub is_real: T,
}

/// A chip that folds every local memory access of a shard into one curve point.
///
/// The state an access observes is received and the state it leaves is sent. Once every access
/// has been added, states that were handed from one access to the next cancel.
#[derive(Debug, Clone, Copy)]
pub struct MemoryLocalChip {
    /// Parallelism and padding knobs.
    pub opts: TraceGenOpts,
}

impl Default for MemoryLocalChip {
    /// The chip configured from the `TRACEGEN_*` environment variables.
    fn default() -> Self {
        Self::new(TraceGenOpts::from_env())
    }
}

impl MemoryLocalChip {
    /// Creates a new memory chip with the given knobs.
    #[must_use]
    pub const fn new(opts: TraceGenOpts) -> Self {
        Self { opts }
    }

    /// Create a row from an event, accumulating onto its `prev_digest`.
    pub fn event_to_row<F: PrimeField32>(event: &MemoryLocalEvent, cols: &mut MemoryLocalCols<F>) {
        let contribution = Self::populate_interactions(event, cols);
        let prev = SepticCurveComplete::from_encoded(SepticCurve::convert(
            event.prev_digest,
            F::from_canonical_u32,
        ));
        cols.accumulation.populate(prev, contribution);
    }

    /// The point an event adds to the digest: its initial state received, its final state sent.
    pub fn contribution<F: PrimeField32>(event: &MemoryLocalEvent) -> SepticCurveComplete<F> {
        let mut cols = MemoryLocalCols::<F>::default();
        Self::populate_interactions(event, &mut cols)
    }

    /// Fills every column except the accumulation and returns the event's contribution.
    fn populate_interactions<F: PrimeField32>(
        event: &MemoryLocalEvent,
        cols: &mut MemoryLocalCols<F>,
    ) -> SepticCurveComplete<F> {
        cols.addr = F::from_canonical_u32(event.addr);
        cols.initial_shard = F::from_canonical_u32(event.initial_mem_access.shard);
        cols.final_shard = F::from_canonical_u32(event.final_mem_access.shard);
        cols.initial_clk = F::from_canonical_u32(event.initial_mem_access.timestamp);
        cols.final_clk = F::from_canonical_u32(event.final_mem_access.timestamp);
        cols.initial_value = event.initial_mem_access.value.into();
        cols.final_value = event.final_mem_access.value.into();
        cols.is_read = F::from_bool(event.kind == MemoryAccessKind::Read);
        cols.is_write = F::from_bool(event.kind == MemoryAccessKind::Write);
        cols.is_real = F::one();

        let initial = cols.initial_global_interaction_cols.populate_memory(
            event.addr,
            &event.initial_mem_access,
            true,
        );
        let final_ = cols.final_global_interaction_cols.populate_memory(
            event.addr,
            &event.final_mem_access,
            false,
        );
        SepticCurveComplete::Affine(initial) + SepticCurveComplete::Affine(final_)
    }

    /// The inclusive running sums of `contributions`, starting from the identity.
    fn prefix_sums<F: PrimeField32>(
        &self,
        contributions: Vec<SepticCurveComplete<F>>,
    ) -> Vec<SepticCurveComplete<F>> {
        if contributions.is_empty() {
            return Vec::new();
        }
        contributions
            .into_par_iter()
            .with_min_len(self.opts.scan_min_len)
            .scan(|a, b| *a + *b, SepticCurveComplete::Infinity)
            .collect()
    }

    /// Writes into every event the digest of all events before it. The first event starts from
    /// the identity.
    pub fn assign_prev_digests<F: PrimeField32>(&self, events: &mut [MemoryLocalEvent]) {
        let contributions =
            events.par_iter().map(|event| Self::contribution::<F>(event)).collect::<Vec<_>>();
        let sums = self.prefix_sums(contributions);
        events.par_iter_mut().enumerate().for_each(|(i, event)| {
            let prev = if i == 0 { SepticCurveComplete::Infinity } else { sums[i - 1] };
            *event = event.with_prev_digest(SepticCurve::convert(prev.to_encoded(), |c: F| {
                c.as_canonical_u32()
            }));
        });
    }

    /// Fills one row per event into a caller-owned buffer of whole rows, overwrites every remaining
    /// row with padding, and returns the final digest. The `prev_digest` of the events is not
    /// read; the chain starts from the identity.
    pub fn generate_trace_into<'a, F: PrimeField32>(
        &self,
        events: impl IntoIterator<Item = &'a MemoryLocalEvent>,
        values: &mut [F],
    ) -> Result<SepticCurveComplete<F>, TraceGenError> {
        let events = events.into_iter().collect::<Vec<_>>();
        let nb_events = events.len();
        check_row_buffer(values.len(), NUM_MEMORY_LOCAL_COLS, nb_events)?;
        let chunk_size = self.opts.chunk_size(nb_events);

        let contributions = debug_span!("populate interactions").in_scope(|| {
            let mut chunks = values[..nb_events * NUM_MEMORY_LOCAL_COLS]
                .chunks_mut(chunk_size * NUM_MEMORY_LOCAL_COLS)
                .collect::<Vec<_>>();
            let point_chunks = chunks
                .par_iter_mut()
                .enumerate()
                .map(|(i, rows)| {
                    rows.chunks_mut(NUM_MEMORY_LOCAL_COLS)
                        .enumerate()
                        .map(|(j, row)| {
                            let cols: &mut MemoryLocalCols<F> = row.borrow_mut();
                            Self::populate_interactions(events[i * chunk_size + j], cols)
                        })
                        .collect::<Vec<_>>()
                })
                .collect::<Vec<_>>();
            point_chunks.into_iter().flatten().collect::<Vec<_>>()
        });

        let cumulative_sum =
            debug_span!("prefix scan").in_scope(|| self.prefix_sums(contributions));
        let final_digest = cumulative_sum.last().copied().unwrap_or(SepticCurveComplete::Infinity);

        debug_span!("populate accumulation").in_scope(|| {
            values.chunks_mut(chunk_size * NUM_MEMORY_LOCAL_COLS).enumerate().par_bridge().for_each(
                |(i, rows)| {
                    rows.chunks_mut(NUM_MEMORY_LOCAL_COLS).enumerate().for_each(|(j, row)| {
                        let idx = i * chunk_size + j;
                        let cols: &mut MemoryLocalCols<F> = row.borrow_mut();
                        if idx < nb_events {
                            let prev = if idx == 0 {
                                SepticCurveComplete::Infinity
                            } else {
                                cumulative_sum[idx - 1]
                            };
                            cols.accumulation.populate_sums(prev, cumulative_sum[idx]);
                        } else {
                            *cols = MemoryLocalCols::default();
                            cols.initial_global_interaction_cols.populate_dummy();
                            cols.final_global_interaction_cols.populate_dummy();
                            cols.accumulation.populate_dummy(final_digest);
                        }
                    });
                },
            );
        });

        Ok(final_digest)
    }
}

impl<F> BaseAir<F> for MemoryLocalChip {
    fn width(&self) -> usize {
        NUM_MEMORY_LOCAL_COLS
    }
}

impl<F: PrimeField32> MachineAir<F> for MemoryLocalChip {
    type Record = ExecutionRecord;

    fn name(&self) -> String {
        "MemoryLocal".to_string()
    }

    fn num_rows(&self, input: &Self::Record) -> Result<usize, TraceGenError> {
        next_power_of_two(input.cpu_local_memory_access.len(), self.opts.fixed_log2_rows)
    }

    #[instrument(name = "generate memory local trace", level = "debug", skip_all)]
    fn generate_trace(&self, input: &ExecutionRecord) -> Result<RowMajorMatrix<F>, TraceGenError> {
        let padded_nb_rows = <MemoryLocalChip as MachineAir<F>>::num_rows(self, input)?;
        let mut values = zeroed_f_vec(padded_nb_rows * NUM_MEMORY_LOCAL_COLS);
        let final_digest = self.generate_trace_into(input.get_local_mem_events(), &mut values)?;
        tracing::debug!(
            events = input.cpu_local_memory_access.len(),
            rows = padded_nb_rows,
            identity = final_digest.is_infinity(),
            "memory local trace filled"
        );

        // Convert the trace to a row major matrix.
        Ok(RowMajorMatrix::new(values, NUM_MEMORY_LOCAL_COLS))
    }

    fn included(&self, shard: &Self::Record) -> bool {
        shard.get_local_mem_events().next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use mips_air_core_executor::events::MemoryRecord;
    use mips_air_stark::air::InteractionKind;
    use p3_baby_bear::BabyBear;
    use p3_matrix::Matrix;
    use rand::{thread_rng, Rng};

    use super::*;

    type F = BabyBear;

    fn random_events(n: u32) -> Vec<MemoryLocalEvent> {
        let mut rng = thread_rng();
        (0..n)
            .map(|i| {
                let initial = MemoryRecord::new(1, rng.gen_range(0..1 << 20), rng.gen());
                if rng.gen() {
                    MemoryLocalEvent::read(4 * i, initial, 1, initial.timestamp + 4)
                } else {
                    MemoryLocalEvent::write(4 * i, initial, 1, initial.timestamp + 4, rng.gen())
                }
            })
            .collect()
    }

    fn row_values(event: &MemoryLocalEvent) -> Vec<F> {
        let mut values = vec![F::zero(); NUM_MEMORY_LOCAL_COLS];
        let cols: &mut MemoryLocalCols<F> = values.as_mut_slice().borrow_mut();
        MemoryLocalChip::event_to_row(event, cols);
        values
    }

    #[test]
    fn test_event_to_row_columns() {
        let initial = MemoryRecord::new(2, 10, 0x0403_0201);
        let event = MemoryLocalEvent::write(0x40, initial, 3, 20, 0xdead_beef);
        let values = row_values(&event);
        let cols: &MemoryLocalCols<F> = values.as_slice().borrow();
        assert_eq!(cols.addr, F::from_canonical_u32(0x40));
        assert_eq!((cols.initial_shard, cols.final_shard), (F::two(), F::from_canonical_u32(3)));
        assert_eq!(
            (cols.initial_clk, cols.final_clk),
            (F::from_canonical_u32(10), F::from_canonical_u32(20))
        );
        assert_eq!(cols.initial_value.to_u32(), 0x0403_0201);
        assert_eq!(cols.final_value.to_u32(), 0xdead_beef);
        assert_eq!((cols.is_read, cols.is_write, cols.is_real), (F::zero(), F::one(), F::one()));

        let p_initial = cols.initial_global_interaction_cols.point();
        let p_final = cols.final_global_interaction_cols.point();
        assert!(p_initial.y.is_receive());
        assert!(p_final.y.is_send());
        assert_eq!(
            cols.accumulation.cumulative(),
            SepticCurveComplete::Affine(p_initial) + SepticCurveComplete::Affine(p_final)
        );
    }

    #[test]
    fn test_write_then_read_cancels() {
        let start = MemoryRecord::new(1, 0, 5);
        let write = MemoryLocalEvent::write(0x100, start, 1, 8, 77);
        let read = MemoryLocalEvent::read(0x100, write.final_mem_access, 1, 12);
        let undo = MemoryLocalEvent::new(
            0x100,
            MemoryAccessKind::Write,
            read.final_mem_access,
            start,
        );

        let point = |record: &MemoryRecord, is_receive: bool| {
            let (point, _) = GlobalInteractionOperation::<F>::get_digest(
                record.interaction_message(0x100),
                is_receive,
                InteractionKind::Memory,
            );
            SepticCurveComplete::Affine(point)
        };

        let chip = MemoryLocalChip::default();
        let mut values = vec![F::zero(); 4 * NUM_MEMORY_LOCAL_COLS];
        let digest = chip.generate_trace_into(&[write, read], &mut values).unwrap();
        assert_eq!(digest, point(&start, true) + point(&read.final_mem_access, false));

        // Returning to the starting state closes the loop.
        let digest = chip.generate_trace_into(&[write, read, undo], &mut values).unwrap();
        assert!(digest.is_infinity());
    }

    #[test]
    fn test_trace_matches_sequential_filling() {
        let mut events = random_events(45);
        let chip = MemoryLocalChip::new(TraceGenOpts {
            chunking_multiplier: 2,
            scan_min_len: 4,
            fixed_log2_rows: None,
        });
        chip.assign_prev_digests::<F>(&mut events);

        let mut record = ExecutionRecord::default();
        events.iter().for_each(|e| record.add_local_memory_event(*e));
        let trace: RowMajorMatrix<F> = chip.generate_trace(&record).unwrap();
        assert_eq!(trace.height(), 64);
        assert_eq!(trace.width(), NUM_MEMORY_LOCAL_COLS);

        let mut acc = SepticCurveComplete::<F>::Infinity;
        for (i, row) in trace.values.chunks(NUM_MEMORY_LOCAL_COLS).enumerate() {
            let cols: &MemoryLocalCols<F> = row.borrow();
            if let Some(event) = events.get(i) {
                assert_eq!(row, row_values(event).as_slice());
                acc = acc + MemoryLocalChip::contribution(event);
                assert_eq!(cols.accumulation.cumulative(), acc);
            } else {
                assert_eq!(cols.is_real, F::zero());
                assert_eq!(cols.initial_global_interaction_cols.point(), SepticCurve::dummy());
                assert_eq!(cols.final_global_interaction_cols.point(), SepticCurve::dummy());
                assert_eq!(cols.accumulation.initial_digest, cols.accumulation.cumulative_sum);
                assert_eq!(cols.accumulation.cumulative(), acc);
            }
        }
    }

    #[test]
    fn test_reused_buffer_is_repadded() {
        let events = random_events(3);
        let chip = MemoryLocalChip::default();
        let mut values = vec![F::zero(); 4 * NUM_MEMORY_LOCAL_COLS];
        chip.generate_trace_into(&events, &mut values).unwrap();
        let digest = chip.generate_trace_into(&events[..2], &mut values).unwrap();

        let mut fresh = vec![F::zero(); 4 * NUM_MEMORY_LOCAL_COLS];
        assert_eq!(chip.generate_trace_into(&events[..2], &mut fresh).unwrap(), digest);
        assert_eq!(values, fresh);

        for row in values.chunks(NUM_MEMORY_LOCAL_COLS).skip(2) {
            let cols: &MemoryLocalCols<F> = row.borrow();
            assert_eq!(cols.is_real, F::zero());
            assert_eq!((cols.is_read, cols.is_write), (F::zero(), F::zero()));
            assert_eq!(cols.addr, F::zero());
            assert_eq!(cols.initial_value.to_u32(), 0);
            assert_eq!(cols.accumulation.cumulative(), digest);
        }
    }

    #[test]
    fn test_deterministic() {
        let events = random_events(20);
        let chip = MemoryLocalChip::default();
        let mut a = vec![F::zero(); 32 * NUM_MEMORY_LOCAL_COLS];
        let mut b = vec![F::zero(); 32 * NUM_MEMORY_LOCAL_COLS];
        let da = chip.generate_trace_into(&events, &mut a).unwrap();
        let db = chip.generate_trace_into(&events, &mut b).unwrap();
        assert_eq!(da, db);
        assert_eq!(a, b);
    }

    #[test]
    fn test_repeated_contribution_doubles() {
        // The same event twice exercises the tangent rule.
        let event = random_events(1)[0];
        let chip = MemoryLocalChip::default();
        let mut values = vec![F::zero(); 16 * NUM_MEMORY_LOCAL_COLS];
        let digest = chip.generate_trace_into(&[event, event], &mut values).unwrap();
        let single = MemoryLocalChip::contribution::<F>(&event);
        assert_eq!(digest, single + single);
        assert_eq!(digest + (-single), single);
        assert_eq!((digest + single) + (-digest), single);
        if let SepticCurveComplete::Affine(point) = single {
            assert_eq!(digest, SepticCurveComplete::Affine(point.double()));
        }
    }

    #[test]
    fn test_default_reads_environment() {
        assert_eq!(MemoryLocalChip::default().opts, TraceGenOpts::from_env());
    }

    #[test]
    fn test_empty() {
        let record = ExecutionRecord::default();
        let chip = MemoryLocalChip::default();
        assert!(!<MemoryLocalChip as MachineAir<F>>::included(&chip, &record));
        let trace: RowMajorMatrix<F> = chip.generate_trace(&record).unwrap();
        assert_eq!(trace.height(), 16);
        for row in trace.values.chunks(NUM_MEMORY_LOCAL_COLS) {
            let cols: &MemoryLocalCols<F> = row.borrow();
            assert!(cols.accumulation.cumulative().is_infinity());
            assert!(cols.initial_global_interaction_cols.point().check_on_point());
        }
    }

    #[test]
    fn test_rejects_short_buffer() {
        let events = random_events(3);
        let mut values = vec![F::zero(); 2 * NUM_MEMORY_LOCAL_COLS];
        assert_eq!(
            MemoryLocalChip::default().generate_trace_into(&events, &mut values),
            Err(TraceGenError::RowBufferHeight { rows: 2, required: 3 })
        );
    }
}
