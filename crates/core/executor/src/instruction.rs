//! Instructions for the MIPS zkVM.

use core::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::opcode::Opcode;

/// A decoded MIPS instruction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(C)]
pub struct Instruction {
    /// The operation to execute.
    pub opcode: Opcode,
    /// The first operand.
    pub op_a: u8,
    /// The second operand.
    pub op_b: u32,
    /// The third operand.
    pub op_c: u32,
    /// The fourth operand.
    pub op_d: u32,
    /// Whether the second operand is an immediate value.
    pub imm_b: bool,
    /// Whether the third operand is an immediate value.
    pub imm_c: bool,
}

impl Instruction {
    /// Create a new [`Instruction`].
    #[must_use]
    pub const fn new(
        opcode: Opcode,
        op_a: u8,
        op_b: u32,
        op_c: u32,
        op_d: u32,
        imm_b: bool,
        imm_c: bool,
    ) -> Self {
        Self { opcode, op_a, op_b, op_c, op_d, imm_b, imm_c }
    }

    /// Returns if the instruction is a syscall instruction.
    #[must_use]
    pub const fn is_syscall_instruction(&self) -> bool {
        self.opcode.class().syscall
    }

    /// Returns if the instruction is a conditional branch.
    #[must_use]
    pub const fn is_branch_instruction(&self) -> bool {
        self.opcode.class().branch
    }

    /// Returns if the instruction is a jump instruction.
    #[must_use]
    pub const fn is_jump_instruction(&self) -> bool {
        self.opcode.class().jump
    }

    /// Returns if the instruction loads from memory.
    #[must_use]
    pub const fn is_memory_load_instruction(&self) -> bool {
        self.opcode.class().load
    }

    /// Returns if the instruction stores to memory, store-conditional included.
    #[must_use]
    pub const fn is_memory_store_instruction(&self) -> bool {
        let class = self.opcode.class();
        class.plain_store || class.store_conditional
    }

    /// Returns if the instruction stores to memory and is not a store-conditional.
    #[must_use]
    pub const fn is_memory_store_instruction_except_sc(&self) -> bool {
        self.opcode.class().plain_store
    }

    /// Returns if the instruction reads register `a` as well as writing it.
    #[must_use]
    pub const fn is_rw_a_instruction(&self) -> bool {
        self.opcode.class().rw_a
    }

    /// Returns if the instruction goes through the multiply/divide unit.
    #[must_use]
    pub const fn is_mult_div_instruction(&self) -> bool {
        self.opcode.class().mult_div
    }
}

impl Debug for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mnemonic = self.opcode.mnemonic();
        let op_a_formatted = format!("%x{}", self.op_a);
        let op_b_formatted =
            if self.imm_b { format!("{}", self.op_b as i32) } else { format!("%x{}", self.op_b) };
        let op_c_formatted =
            if self.imm_c { format!("{}", self.op_c as i32) } else { format!("%x{}", self.op_c) };

        let width = 10;
        write!(f, "{mnemonic:<width$} {op_a_formatted:<width$} ")?;
        write!(f, "{op_b_formatted:<width$} {op_c_formatted:<width$}")
    }
}
