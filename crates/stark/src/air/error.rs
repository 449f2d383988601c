use thiserror::Error;

/// Caller mistakes detected before any row is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TraceGenError {
    /// The buffer does not split into whole rows.
    #[error("row buffer of {len} elements is not a multiple of the chip width {width}")]
    RowBufferWidth {
        /// The buffer length.
        len: usize,
        /// The chip width.
        width: usize,
    },
    /// The buffer has fewer rows than there are events.
    #[error("row buffer holds {rows} rows but {required} events need filling")]
    RowBufferHeight {
        /// The rows available.
        rows: usize,
        /// The rows required.
        required: usize,
    },
    /// A fixed trace height was requested that cannot hold every event.
    #[error("fixed trace height 2^{log2_rows} cannot hold {required} rows")]
    FixedHeightTooSmall {
        /// The requested log2 height.
        log2_rows: usize,
        /// The rows required.
        required: usize,
    },
}

/// Checks that `len` elements form at least `required` rows of `width` columns, and returns the
/// number of rows.
pub fn check_row_buffer(len: usize, width: usize, required: usize) -> Result<usize, TraceGenError> {
    if width == 0 || len % width != 0 {
        return Err(TraceGenError::RowBufferWidth { len, width });
    }
    let rows = len / width;
    if rows < required {
        return Err(TraceGenError::RowBufferHeight { rows, required });
    }
    Ok(rows)
}
