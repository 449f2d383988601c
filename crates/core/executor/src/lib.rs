//! Opcodes, instructions and execution events of the MIPS zkVM, as consumed by the trace
//! generators.

#![warn(clippy::pedantic)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::missing_panics_doc)]
#![warn(missing_docs)]

pub mod events;
mod instruction;
mod opcode;
mod record;

pub use instruction::*;
pub use opcode::*;
pub use record::*;
