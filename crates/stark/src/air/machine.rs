use p3_air::BaseAir;
use p3_field::Field;
use p3_matrix::dense::RowMajorMatrix;

use super::TraceGenError;

/// A chip of the machine: a fixed-width table whose rows are derived from a record of events.
pub trait MachineAir<F: Field>: BaseAir<F> + 'static + Send + Sync {
    /// The record containing the events this chip consumes.
    type Record: Send + Sync;

    /// A unique identifier for this AIR as part of a machine.
    fn name(&self) -> String;

    /// The number of rows of the generated trace, padding included.
    fn num_rows(&self, input: &Self::Record) -> Result<usize, TraceGenError>;

    /// Generate the trace for a given record, padded to [`MachineAir::num_rows`] rows.
    fn generate_trace(&self, input: &Self::Record) -> Result<RowMajorMatrix<F>, TraceGenError>;

    /// Whether the record contains events for this chip.
    fn included(&self, record: &Self::Record) -> bool;
}
