use core::borrow::{Borrow, BorrowMut};
use std::mem::size_of;

use mips_air_primitives::consts::{BYTE_RADIX, WORD_SIZE};
use mips_air_stark::Word;
use p3_field::{AbstractField, Field};
use sp1_derive::AlignedBorrow;

/// A set of columns needed to compute the add of two words.
#[derive(AlignedBorrow, Default, Debug, Clone, Copy)]
#[repr(C)]
pub struct AddOperation<T> {
    /// The result of `a + b`.
    pub value: Word<T>,

    /// `carry[i]` is the carry out of limb `i` into limb `i + 1`. The carry out of the top limb
    /// is dropped.
    pub carry: [T; WORD_SIZE - 1],
}

impl<F: Field> AddOperation<F> {
    /// Fills the sum and carries of `a + b` and returns the wrapped sum.
    pub fn populate(&mut self, a_u32: u32, b_u32: u32) -> u32 {
        let expected = a_u32.wrapping_add(b_u32);
        self.value = Word::from(expected);

        let a = a_u32.to_le_bytes();
        let b = b_u32.to_le_bytes();
        let mut carry_in = 0u32;
        for i in 0..WORD_SIZE - 1 {
            let limb_sum = u32::from(a[i]) + u32::from(b[i]) + carry_in;
            carry_in = u32::from(limb_sum >= BYTE_RADIX);
            self.carry[i] = F::from_canonical_u32(carry_in);
        }
        expected
    }
}
