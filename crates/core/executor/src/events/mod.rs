//! Type definitions for the events the trace generators consume.

mod alu;
mod memory;

pub use alu::*;
pub use memory::*;
