//! Opcodes for the MIPS zkVM.

use std::fmt::Display;

use p3_field::Field;
use serde::{Deserialize, Serialize};
use strum_macros::{EnumIter, IntoStaticStr};

/// An opcode specifies the operation to be performed by the processor.
///
/// Register and immediate forms that the VM proves differently keep separate opcodes (`ADD` and
/// `ADDI`); the `imm_b`/`imm_c` flags of an [`crate::Instruction`] say which operands are
/// immediates.
#[allow(non_camel_case_types, clippy::upper_case_acronyms)]
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum Opcode {
    /// rd ← rs + rt, trapping on overflow.
    ADD = 0,
    /// rd ← rs + rt.
    ADDU = 1,
    /// rt ← rs + sx(imm), trapping on overflow.
    ADDI = 2,
    /// rt ← rs + sx(imm).
    ADDIU = 3,
    /// rd ← rs - rt, trapping on overflow.
    SUB = 4,
    /// rd ← rs - rt.
    SUBU = 5,
    /// (hi, lo) ← rs * rt (signed).
    MULT = 6,
    /// (hi, lo) ← rs * rt (unsigned).
    MULTU = 7,
    /// rd ← (rs * rt)[31:0].
    MUL = 8,
    /// (hi, lo) ← (rs % rt, rs / rt) (signed).
    DIV = 9,
    /// (hi, lo) ← (rs % rt, rs / rt) (unsigned).
    DIVU = 10,
    /// rd ← rt << rs[4:0].
    SLLV = 11,
    /// rd ← rt >> rs[4:0] (logical).
    SRLV = 12,
    /// rd ← rt >> rs[4:0] (arithmetic).
    SRAV = 13,
    /// rd ← rt << sa.
    SLL = 14,
    /// rd ← rt >> sa (logical).
    SRL = 15,
    /// rd ← rt >> sa (arithmetic).
    SRA = 16,
    /// rd ← rt rotated right by sa.
    ROR = 17,
    /// rd ← (rs < rt) ? 1 : 0 (signed).
    SLT = 18,
    /// rd ← (rs < rt) ? 1 : 0 (unsigned).
    SLTU = 19,
    /// rt ← (rs < sx(imm)) ? 1 : 0 (signed).
    SLTI = 20,
    /// rt ← (rs < sx(imm)) ? 1 : 0 (unsigned).
    SLTIU = 21,
    /// rt ← imm << 16.
    LUI = 22,
    /// rd ← hi.
    MFHI = 23,
    /// hi ← rs.
    MTHI = 24,
    /// rd ← lo.
    MFLO = 25,
    /// lo ← rs.
    MTLO = 26,
    /// rd ← rs & rt.
    AND = 27,
    /// rd ← rs | rt.
    OR = 28,
    /// rd ← rs ^ rt.
    XOR = 29,
    /// rd ← !(rs | rt).
    NOR = 30,
    /// rd ← leading zeros of rs.
    CLZ = 31,
    /// rd ← leading ones of rs.
    CLO = 32,
    /// rd ← rs if rt == 0 (MOVZ).
    MEQ = 33,
    /// rd ← rs if rt != 0 (MOVN).
    MNE = 34,
    /// rd ← rt with the bytes of each halfword swapped.
    WSBH = 35,
    /// rd ← sign extension of the low byte or halfword of rt.
    SEXT = 36,
    /// rt ← bit field of rs.
    EXT = 37,
    /// Bit field of rt ← rs.
    INS = 38,
    /// (hi, lo) += rs * rt (signed).
    MADD = 39,
    /// (hi, lo) += rs * rt (unsigned).
    MADDU = 40,
    /// (hi, lo) -= rs * rt (signed).
    MSUB = 41,
    /// (hi, lo) -= rs * rt (unsigned).
    MSUBU = 42,
    /// Trap if rs == rt.
    TEQ = 43,
    /// Branch if rs == rt.
    BEQ = 44,
    /// Branch if rs != rt.
    BNE = 45,
    /// Branch if rs < 0.
    BLTZ = 46,
    /// Branch if rs >= 0.
    BGEZ = 47,
    /// Branch if rs <= 0.
    BLEZ = 48,
    /// Branch if rs > 0.
    BGTZ = 49,
    /// Jump to a register target.
    Jump = 50,
    /// Jump to an immediate target.
    Jumpi = 51,
    /// Jump to a pc-relative immediate target.
    JumpDirect = 52,
    /// rt ← sx(m8(rs + imm)).
    LB = 53,
    /// rt ← sx(m16(rs + imm)).
    LH = 54,
    /// rt ← m32(rs + imm).
    LW = 55,
    /// rt ← merge of rt with the unaligned word's left part.
    LWL = 56,
    /// rt ← merge of rt with the unaligned word's right part.
    LWR = 57,
    /// rt ← zx(m8(rs + imm)).
    LBU = 58,
    /// rt ← zx(m16(rs + imm)).
    LHU = 59,
    /// rt ← m32(rs + imm), opening a link for `SC`.
    LL = 60,
    /// m8(rs + imm) ← rt[7:0].
    SB = 61,
    /// m16(rs + imm) ← rt[15:0].
    SH = 62,
    /// m32(rs + imm) ← rt.
    SW = 63,
    /// Unaligned store of the left part of rt.
    SWL = 64,
    /// Unaligned store of the right part of rt.
    SWR = 65,
    /// Store conditional: m32(rs + imm) ← rt, rt ← 1.
    SC = 66,
    /// Floating point doubleword store, proven as a no-op.
    SDC1 = 67,
    /// Transfer control to the operating system.
    SYSCALL = 68,
    /// No operation.
    NOP = 69,
    /// An undecodable instruction.
    INVALID = 70,
}

/// Membership of an opcode in each instruction class.
///
/// A single exhaustive table decides every classifier predicate, so adding an opcode fails to
/// compile until it is classified.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpcodeClass {
    /// Enters the syscall handler.
    pub syscall: bool,
    /// Conditional branch.
    pub branch: bool,
    /// Unconditional jump.
    pub jump: bool,
    /// Memory load.
    pub load: bool,
    /// Memory store other than store-conditional.
    pub plain_store: bool,
    /// Store-conditional.
    pub store_conditional: bool,
    /// Reads its destination register `a` as an input.
    pub rw_a: bool,
    /// Writes the hi/lo pair through the multiply/divide unit.
    pub mult_div: bool,
}

impl OpcodeClass {
    const NONE: Self = Self {
        syscall: false,
        branch: false,
        jump: false,
        load: false,
        plain_store: false,
        store_conditional: false,
        rw_a: false,
        mult_div: false,
    };
    const SYSCALL: Self = Self { syscall: true, rw_a: true, ..Self::NONE };
    const BRANCH: Self = Self { branch: true, ..Self::NONE };
    const JUMP: Self = Self { jump: true, ..Self::NONE };
    const LOAD: Self = Self { load: true, ..Self::NONE };
    const STORE: Self = Self { plain_store: true, ..Self::NONE };
    const STORE_CONDITIONAL: Self = Self { store_conditional: true, ..Self::NONE };
    const RW_A: Self = Self { rw_a: true, ..Self::NONE };
    const MULT_DIV: Self = Self { mult_div: true, ..Self::NONE };
}

impl Opcode {
    /// The class table. No wildcard arm.
    #[must_use]
    pub const fn class(self) -> OpcodeClass {
        match self {
            Opcode::SYSCALL => OpcodeClass::SYSCALL,
            Opcode::BEQ
            | Opcode::BNE
            | Opcode::BLTZ
            | Opcode::BGEZ
            | Opcode::BLEZ
            | Opcode::BGTZ => OpcodeClass::BRANCH,
            Opcode::Jump | Opcode::Jumpi | Opcode::JumpDirect => OpcodeClass::JUMP,
            Opcode::LB
            | Opcode::LH
            | Opcode::LW
            | Opcode::LWL
            | Opcode::LWR
            | Opcode::LBU
            | Opcode::LHU
            | Opcode::LL => OpcodeClass::LOAD,
            Opcode::SB | Opcode::SH | Opcode::SW | Opcode::SWL | Opcode::SWR => OpcodeClass::STORE,
            Opcode::SC => OpcodeClass::STORE_CONDITIONAL,
            Opcode::INS
            | Opcode::MADD
            | Opcode::MADDU
            | Opcode::MSUB
            | Opcode::MSUBU
            | Opcode::MEQ
            | Opcode::MNE => OpcodeClass::RW_A,
            Opcode::MULT | Opcode::MULTU | Opcode::DIV | Opcode::DIVU => OpcodeClass::MULT_DIV,
            Opcode::ADD
            | Opcode::ADDU
            | Opcode::ADDI
            | Opcode::ADDIU
            | Opcode::SUB
            | Opcode::SUBU
            | Opcode::MUL
            | Opcode::SLLV
            | Opcode::SRLV
            | Opcode::SRAV
            | Opcode::SLL
            | Opcode::SRL
            | Opcode::SRA
            | Opcode::ROR
            | Opcode::SLT
            | Opcode::SLTU
            | Opcode::SLTI
            | Opcode::SLTIU
            | Opcode::LUI
            | Opcode::MFHI
            | Opcode::MTHI
            | Opcode::MFLO
            | Opcode::MTLO
            | Opcode::AND
            | Opcode::OR
            | Opcode::XOR
            | Opcode::NOR
            | Opcode::CLZ
            | Opcode::CLO
            | Opcode::WSBH
            | Opcode::SEXT
            | Opcode::EXT
            | Opcode::TEQ
            | Opcode::SDC1
            | Opcode::NOP
            | Opcode::INVALID => OpcodeClass::NONE,
        }
    }

    /// Whether the add/sub chip proves this opcode as an addition.
    #[must_use]
    pub const fn is_addition(self) -> bool {
        matches!(self, Opcode::ADD | Opcode::ADDU | Opcode::ADDI | Opcode::ADDIU)
    }

    /// Whether the add/sub chip proves this opcode as a subtraction.
    #[must_use]
    pub const fn is_subtraction(self) -> bool {
        matches!(self, Opcode::SUB | Opcode::SUBU)
    }

    /// Returns the lowercase assembly mnemonic.
    #[must_use]
    pub fn mnemonic(self) -> &'static str {
        self.into()
    }

    /// Converts the opcode to a field element.
    #[must_use]
    pub fn as_field<F: Field>(self) -> F {
        F::from_canonical_u8(self as u8)
    }
}

impl Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}
