use core::borrow::{Borrow, BorrowMut};
use std::{mem::size_of, vec::IntoIter};

use mips_air_core_executor::Instruction;
use p3_field::{AbstractField, Field};
use sp1_derive::AlignedBorrow;

pub const NUM_OPCODE_SELECTOR_COLS: usize = size_of::<OpcodeSelectorCols<u8>>();

/// The column layout for opcode selectors.
#[derive(AlignedBorrow, Clone, Copy, Default, Debug, PartialEq, Eq)]
#[repr(C)]
pub struct OpcodeSelectorCols<T> {
    /// Whether op_b is an immediate value.
    pub imm_b: T,

    /// Whether op_c is an immediate value.
    pub imm_c: T,

    pub is_syscall: T,
    pub is_branch: T,
    pub is_jump: T,

    /// Memory instructions. A store-conditional sets `is_memory_store` only.
    pub is_memory_load: T,
    pub is_memory_store: T,
    pub is_memory_store_except_sc: T,

    /// Instructions that read their destination register.
    pub is_rw_a: T,

    /// Instructions writing hi/lo.
    pub is_mult_div: T,
}

impl<F: Field> OpcodeSelectorCols<F> {
    pub fn populate(&mut self, instruction: Instruction) {
        self.imm_b = F::from_bool(instruction.imm_b);
        self.imm_c = F::from_bool(instruction.imm_c);
        self.is_syscall = F::from_bool(instruction.is_syscall_instruction());
        self.is_branch = F::from_bool(instruction.is_branch_instruction());
        self.is_jump = F::from_bool(instruction.is_jump_instruction());
        self.is_memory_load = F::from_bool(instruction.is_memory_load_instruction());
        self.is_memory_store = F::from_bool(instruction.is_memory_store_instruction());
        self.is_memory_store_except_sc =
            F::from_bool(instruction.is_memory_store_instruction_except_sc());
        self.is_rw_a = F::from_bool(instruction.is_rw_a_instruction());
        self.is_mult_div = F::from_bool(instruction.is_mult_div_instruction());
    }
}

impl<T> IntoIterator for OpcodeSelectorCols<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        let columns = vec![
            self.imm_b,
            self.imm_c,
            self.is_syscall,
            self.is_branch,
            self.is_jump,
            self.is_memory_load,
            self.is_memory_store,
            self.is_memory_store_except_sc,
            self.is_rw_a,
            self.is_mult_div,
        ];
        assert_eq!(columns.len(), NUM_OPCODE_SELECTOR_COLS);
        columns.into_iter()
    }
}
