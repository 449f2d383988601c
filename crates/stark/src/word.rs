use core::borrow::{Borrow, BorrowMut};
use std::{
    mem::size_of,
    ops::{Index, IndexMut},
};

use mips_air_primitives::consts::WORD_SIZE;
use p3_field::{AbstractField, PrimeField32};
use serde::{Deserialize, Serialize};
use sp1_derive::AlignedBorrow;

/// A 32-bit word held as four little-endian byte limbs.
#[derive(
    AlignedBorrow, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[repr(C)]
pub struct Word<T>(pub [T; WORD_SIZE]);

impl<T> Word<T> {
    /// Applies `f` to every limb.
    pub fn map<F, S>(self, f: F) -> Word<S>
    where
        F: FnMut(T) -> S,
    {
        Word(self.0.map(f))
    }
}

impl<F: PrimeField32> Word<F> {
    /// Recombines the limbs, `sum(limb[i] * 256^i)`.
    ///
    /// Only meaningful when every limb is a canonical byte.
    pub fn to_u32(&self) -> u32 {
        mips_air_primitives::consts::limbs_to_word(self.0.map(|limb| limb.as_canonical_u32()))
    }
}

impl<T> Index<usize> for Word<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<T> IndexMut<usize> for Word<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl<F: AbstractField> From<u32> for Word<F> {
    fn from(value: u32) -> Self {
        Word(mips_air_primitives::consts::word_to_limbs(value).map(F::from_canonical_u8))
    }
}

impl<T> IntoIterator for Word<T> {
    type Item = T;
    type IntoIter = std::array::IntoIter<T, WORD_SIZE>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
