use core::borrow::{Borrow, BorrowMut};
use std::mem::size_of;

use mips_air_stark::{
    septic_curve::{SepticCurve, SepticCurveComplete},
    septic_extension::SepticBlock,
};
use p3_field::{Field, PrimeField32};
use sp1_derive::AlignedBorrow;

/// The columns carrying the running curve sum across rows.
///
/// Both digests use the affine column encoding, where the all-zero point stands for the identity.
#[derive(AlignedBorrow, Default, Debug, Clone, Copy)]
#[repr(C)]
pub struct GlobalAccumulationOperation<T> {
    /// The sum before this row, as `[x, y]`.
    pub initial_digest: [SepticBlock<T>; 2],
    /// The sum after this row, as `[x, y]`.
    pub cumulative_sum: [SepticBlock<T>; 2],
}

impl<F: PrimeField32> GlobalAccumulationOperation<F> {
    /// Fills the row that adds `contribution` to `prev` and returns the new sum.
    pub fn populate(
        &mut self,
        prev: SepticCurveComplete<F>,
        contribution: SepticCurveComplete<F>,
    ) -> SepticCurveComplete<F> {
        let next = prev + contribution;
        self.populate_sums(prev, next);
        next
    }
}

impl<F: Field> GlobalAccumulationOperation<F> {
    /// Fills the row from a precomputed pair of consecutive sums.
    pub fn populate_sums(&mut self, prev: SepticCurveComplete<F>, next: SepticCurveComplete<F>) {
        self.initial_digest = Self::blocks(prev.to_encoded());
        self.cumulative_sum = Self::blocks(next.to_encoded());
    }

    /// Fills a padding row, which carries the final sum unchanged.
    pub fn populate_dummy(&mut self, final_digest: SepticCurveComplete<F>) {
        let blocks = Self::blocks(final_digest.to_encoded());
        self.initial_digest = blocks;
        self.cumulative_sum = blocks;
    }

    /// The sum after this row.
    pub fn cumulative(&self) -> SepticCurveComplete<F> {
        SepticCurveComplete::from_encoded(SepticCurve {
            x: self.cumulative_sum[0].as_extension(),
            y: self.cumulative_sum[1].as_extension(),
        })
    }

    fn blocks(point: SepticCurve<F>) -> [SepticBlock<F>; 2] {
        [SepticBlock::from(point.x), SepticBlock::from(point.y)]
    }
}
