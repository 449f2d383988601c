//! Column groups a CPU chip derives from the instruction it executes.

mod instruction;
mod opcode;

pub use instruction::*;
pub use opcode::*;
