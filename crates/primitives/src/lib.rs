//! Shared primitives for the MIPS AIR crates.

pub mod consts;
pub mod poseidon2;

pub use poseidon2::{poseidon2_permute, Poseidon2InnerPerm, POSEIDON2_WIDTH};
