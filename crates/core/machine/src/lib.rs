//! Trace generation for the MIPS AIR chips: column layouts, row fillers and the chips that
//! assemble them into padded traces.

#![allow(
    clippy::new_without_default,
    clippy::field_reassign_with_default,
    clippy::needless_range_loop,
    clippy::type_complexity
)]
#![warn(unused_extern_crates)]

pub mod alu;
pub mod cpu;
pub mod memory;
pub mod operations;
pub mod sys;
pub mod utils;
