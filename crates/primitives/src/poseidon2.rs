//! The width-16 Poseidon2 permutation over BabyBear used to hash interaction messages onto the
//! septic curve.
//!
//! Round constants come from the reference instance in `zkhash`. The linear layers are the
//! Plonky3 ones.

use lazy_static::lazy_static;
use p3_baby_bear::{BabyBear, DiffusionMatrixBabyBear};
use p3_field::AbstractField;
use p3_poseidon2::{Poseidon2, Poseidon2ExternalMatrixGeneral};
use p3_symmetric::Permutation;
use zkhash::{
    ark_ff::PrimeField as ArkPrimeField,
    fields::babybear::FpBabyBear,
    poseidon2::poseidon2_instance_babybear::RC16,
};

/// The state width of the permutation.
pub const POSEIDON2_WIDTH: usize = 16;

/// The number of full (external) rounds.
pub const NUM_FULL_ROUNDS: usize = 8;

/// The number of partial (internal) rounds.
pub const NUM_PARTIAL_ROUNDS: usize = 13;

/// The S-box degree.
pub const SBOX_DEGREE: u64 = 7;

/// The concrete permutation type.
pub type Poseidon2InnerPerm = Poseidon2<
    BabyBear,
    Poseidon2ExternalMatrixGeneral,
    DiffusionMatrixBabyBear,
    POSEIDON2_WIDTH,
    SBOX_DEGREE,
>;

lazy_static! {
    static ref PERM: Poseidon2InnerPerm = inner_perm();
}

fn babybear_from_ark_ff(input: &FpBabyBear) -> BabyBear {
    BabyBear::from_canonical_u32(input.into_bigint().0[0] as u32)
}

/// The round constants, one row per round. Partial rounds only use the first entry of their row.
#[must_use]
pub fn round_constants() -> Vec<[BabyBear; POSEIDON2_WIDTH]> {
    RC16.iter()
        .map(|row| core::array::from_fn(|i| babybear_from_ark_ff(&row[i])))
        .collect()
}

/// Builds the permutation: the first and last `NUM_FULL_ROUNDS / 2` rows of constants are the
/// external rounds, the rows in between feed the internal rounds.
#[must_use]
pub fn inner_perm() -> Poseidon2InnerPerm {
    let mut constants = round_constants();
    debug_assert_eq!(constants.len(), NUM_FULL_ROUNDS + NUM_PARTIAL_ROUNDS);

    let internal_start = NUM_FULL_ROUNDS / 2;
    let internal_end = internal_start + NUM_PARTIAL_ROUNDS;
    let internal_round_constants =
        constants.drain(internal_start..internal_end).map(|row| row[0]).collect::<Vec<_>>();
    let external_round_constants = constants;

    Poseidon2::new(
        NUM_FULL_ROUNDS,
        external_round_constants,
        Poseidon2ExternalMatrixGeneral,
        NUM_PARTIAL_ROUNDS,
        internal_round_constants,
        DiffusionMatrixBabyBear,
    )
}

/// Applies the shared permutation instance to `input`.
#[must_use]
pub fn poseidon2_permute(input: [BabyBear; POSEIDON2_WIDTH]) -> [BabyBear; POSEIDON2_WIDTH] {
    PERM.permute(input)
}
