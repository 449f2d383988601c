mod logger;

pub use logger::*;

use mips_air_stark::air::TraceGenError;
use p3_field::{AbstractField, Field};

/// The smallest trace height a chip pads to.
pub const MIN_TRACE_ROWS: usize = 16;

/// The padded height for `n` rows: `2^fixed_log2_rows` when given, otherwise the next power of
/// two, at least [`MIN_TRACE_ROWS`].
pub fn next_power_of_two(n: usize, fixed_log2_rows: Option<usize>) -> Result<usize, TraceGenError> {
    match fixed_log2_rows {
        Some(log2_rows) => {
            let rows = u32::try_from(log2_rows).ok().and_then(|shift| 1usize.checked_shl(shift));
            match rows {
                Some(rows) if rows >= n => Ok(rows),
                _ => Err(TraceGenError::FixedHeightTooSmall { log2_rows, required: n }),
            }
        }
        None => Ok(n.next_power_of_two().max(MIN_TRACE_ROWS)),
    }
}

/// A zero-initialized vector of field elements.
pub fn zeroed_f_vec<F: Field>(len: usize) -> Vec<F> {
    vec![F::zero(); len]
}
