//! Field-side building blocks for the MIPS AIR chips: words, the septic extension and its
//! elliptic curve, and the chip trait.

#![warn(clippy::pedantic)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![warn(missing_docs)]

pub mod air;
mod opts;
pub mod septic_curve;
pub mod septic_extension;
mod word;

pub use opts::*;
pub use word::*;
