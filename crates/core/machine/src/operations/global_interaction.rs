use core::borrow::{Borrow, BorrowMut};
use std::mem::size_of;

use mips_air_core_executor::events::MemoryRecord;
use mips_air_stark::{
    air::InteractionKind,
    septic_curve::SepticCurve,
    septic_extension::{SepticBlock, SepticExtension},
};
use p3_field::{AbstractField, Field, PrimeField32};
use sp1_derive::AlignedBorrow;

/// The number of bits of `y6 - offset` that are range checked.
pub const Y6_BITS: usize = 30;

/// The columns witnessing one message hashed onto the septic curve.
#[derive(AlignedBorrow, Default, Debug, Clone, Copy)]
#[repr(C)]
pub struct GlobalInteractionOperation<T> {
    /// The bits of the hash offset used by `lift_x`.
    pub offset_bits: [T; 8],
    /// The x-coordinate of the point.
    pub x_coordinate: SepticBlock<T>,
    /// The y-coordinate of the point, sign-adjusted for the interaction direction.
    pub y_coordinate: SepticBlock<T>,
    /// The bits of `y6 - 1` for a receive or `y6 - (p + 1) / 2` for a send.
    pub y6_bit_decomp: [T; Y6_BITS],
    /// The inverse of `(sum of the top four bits) - 4`, showing the value stays below
    /// `(p - 1) / 2`.
    pub range_check_witness: T,
}

impl<F: PrimeField32> GlobalInteractionOperation<F> {
    /// The curve point of a message: `values[0]` is offset by `kind << 16` before hashing, and a
    /// send takes the negated point.
    pub fn get_digest(
        values: [u32; 7],
        is_receive: bool,
        kind: InteractionKind,
    ) -> (SepticCurve<F>, u8) {
        let x_start = SepticExtension::<F>::from_canonical_u32s(values)
            + F::from_canonical_u32(u32::from(kind.as_u8()) << 16);
        let (point, offset) = SepticCurve::<F>::lift_x(x_start);
        if is_receive {
            (point, offset)
        } else {
            (-point, offset)
        }
    }

    /// Fills the columns for a real interaction and returns its point.
    pub fn populate(
        &mut self,
        values: [u32; 7],
        is_receive: bool,
        kind: InteractionKind,
    ) -> SepticCurve<F> {
        let (point, offset) = Self::get_digest(values, is_receive, kind);
        for (i, bit) in self.offset_bits.iter_mut().enumerate() {
            *bit = F::from_canonical_u8((offset >> i) & 1);
        }
        self.x_coordinate = SepticBlock::from(point.x);
        self.y_coordinate = SepticBlock::from(point.y);

        let y6 = point.y.0[6].as_canonical_u32();
        let range_check_value = if is_receive { y6 - 1 } else { y6 - (F::ORDER_U32 + 1) / 2 };
        let mut top_4_bits = F::zero();
        for (i, bit) in self.y6_bit_decomp.iter_mut().enumerate() {
            *bit = F::from_canonical_u32((range_check_value >> i) & 1);
            if i >= Y6_BITS - 4 {
                top_4_bits += *bit;
            }
        }
        top_4_bits -= F::from_canonical_u32(4);
        self.range_check_witness = top_4_bits.inverse();
        point
    }

    /// Fills the columns for the memory state `record` of `addr`.
    pub fn populate_memory(
        &mut self,
        addr: u32,
        record: &MemoryRecord,
        is_receive: bool,
    ) -> SepticCurve<F> {
        self.populate(record.interaction_message(addr), is_receive, InteractionKind::Memory)
    }
}

impl<F: Field> GlobalInteractionOperation<F> {
    /// Fills the columns of a padding row: the dummy point and zero witnesses.
    pub fn populate_dummy(&mut self) {
        self.offset_bits = [F::zero(); 8];
        self.x_coordinate = SepticBlock::from(SepticCurve::<F>::dummy().x);
        self.y_coordinate = SepticBlock::from(SepticCurve::<F>::dummy().y);
        self.y6_bit_decomp = [F::zero(); Y6_BITS];
        self.range_check_witness = F::zero();
    }

    /// The point held in the coordinate columns.
    pub fn point(&self) -> SepticCurve<F> {
        SepticCurve { x: self.x_coordinate.as_extension(), y: self.y_coordinate.as_extension() }
    }
}
