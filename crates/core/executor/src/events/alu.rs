use serde::{Deserialize, Serialize};

use crate::Opcode;

/// Arithmetic Logic Unit (ALU) Event.
///
/// The operands and result of one ALU operation, `a = b op c`, as the executor observed them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(C)]
pub struct AluEvent {
    /// The program counter.
    pub pc: u32,
    /// The opcode.
    pub opcode: Opcode,
    /// The result.
    pub a: u32,
    /// The first operand.
    pub b: u32,
    /// The second operand.
    pub c: u32,
    /// Whether the destination register is the hard-wired zero register.
    pub op_a_0: bool,
}

impl AluEvent {
    /// Create a new [`AluEvent`].
    #[must_use]
    pub const fn new(pc: u32, opcode: Opcode, a: u32, b: u32, c: u32, op_a_0: bool) -> Self {
        Self { pc, opcode, a, b, c, op_a_0 }
    }
}
