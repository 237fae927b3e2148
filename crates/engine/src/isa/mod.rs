//! Instruction set surface: mnemonics, operation classes, and unit classes.
//!
//! This module tables the MIPS/DLX-like assembly surface. It provides:
//! 1. **Classification:** Every mnemonic maps to an [`OpClass`] (what the
//!    operation *is*) and through it to a [`UnitClass`] (which reservation
//!    stations may hold it).
//! 2. **Dispatch data:** The ALU operator or branch condition is resolved
//!    here, at parse time, so the execute stage is a direct match on the
//!    class — it never inspects mnemonic text.

/// Assembly parsing (source text → program + label map).
pub mod asm;

use serde::Serialize;
use std::fmt;

/// Functional-unit classes, in the fixed order reservation stations are
/// created and scanned: ADD units first, then MULT, LOAD, STORE, INTEGER.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UnitClass {
    /// Floating-point adders (FP add and subtract).
    Add,
    /// Floating-point multipliers (FP multiply and divide).
    Mult,
    /// Load units.
    Load,
    /// Store units.
    Store,
    /// Integer ALUs, shared with branches.
    Integer,
}

impl UnitClass {
    /// All unit classes in scan order.
    pub const ALL: [Self; 5] = [Self::Add, Self::Mult, Self::Load, Self::Store, Self::Integer];

    /// Station-name prefix, e.g. `MULT` in `MULT2`.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Mult => "MULT",
            Self::Load => "LOAD",
            Self::Store => "STORE",
            Self::Integer => "INT",
        }
    }
}

impl fmt::Display for UnitClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Operation classes: what an opcode does, independent of its spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpClass {
    /// Memory read into a register.
    Load,
    /// Memory write from a register.
    Store,
    /// Floating-point addition.
    FpAdd,
    /// Floating-point subtraction.
    FpSub,
    /// Floating-point multiplication.
    FpMult,
    /// Floating-point division.
    FpDiv,
    /// Integer add/subtract, register or immediate second source.
    IntAlu,
    /// Conditional branch.
    Branch,
}

impl OpClass {
    /// The reservation-station class this operation issues into.
    pub fn unit(self) -> UnitClass {
        match self {
            Self::Load => UnitClass::Load,
            Self::Store => UnitClass::Store,
            Self::FpAdd | Self::FpSub => UnitClass::Add,
            Self::FpMult | Self::FpDiv => UnitClass::Mult,
            Self::IntAlu | Self::Branch => UnitClass::Integer,
        }
    }

    /// Whether this operation writes a destination register (and therefore
    /// claims a register-alias-table tag and a CDB broadcast slot).
    pub fn writes_register(self) -> bool {
        !matches!(self, Self::Store | Self::Branch)
    }

    /// Whether this operation addresses memory.
    pub fn is_memory(self) -> bool {
        matches!(self, Self::Load | Self::Store)
    }
}

/// Arithmetic operator for ALU-family opcodes, resolved at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AluOp {
    /// `vj + vk`.
    Add,
    /// `vj - vk`.
    Sub,
}

/// Branch condition: when the branch is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchCond {
    /// Taken when `vj != vk` (BNE family).
    NotEqual,
    /// Taken when `vj == vk` (BEQ family).
    Equal,
}

impl BranchCond {
    /// Evaluates the condition against resolved operand values.
    pub fn taken(self, vj: f64, vk: f64) -> bool {
        match self {
            Self::NotEqual => vj != vk,
            Self::Equal => vj == vk,
        }
    }
}

/// Static description of one mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OpDesc {
    /// Canonical (uppercase) mnemonic.
    pub mnemonic: &'static str,
    /// Operation class.
    pub class: OpClass,
    /// ALU operator, for `IntAlu` and FP arithmetic.
    pub alu: Option<AluOp>,
    /// Branch condition, for `Branch`.
    pub cond: Option<BranchCond>,
    /// True for the one-register branch forms (`BNEZ`/`BEQZ`) that compare
    /// against a literal zero and carry their label in the first source slot.
    pub compares_zero: bool,
}

/// One table row. Most rows need no ALU operator or condition.
const fn op(mnemonic: &'static str, class: OpClass) -> OpDesc {
    OpDesc { mnemonic, class, alu: None, cond: None, compares_zero: false }
}

/// An ALU row with its operator.
const fn alu(mnemonic: &'static str, class: OpClass, operator: AluOp) -> OpDesc {
    OpDesc { mnemonic, class, alu: Some(operator), cond: None, compares_zero: false }
}

/// A branch row.
const fn branch(mnemonic: &'static str, cond: BranchCond, compares_zero: bool) -> OpDesc {
    OpDesc { mnemonic, class: OpClass::Branch, alu: None, cond: Some(cond), compares_zero }
}

/// The full mnemonic table. Lookup is case-insensitive.
static OPCODES: &[OpDesc] = &[
    // Loads
    op("L.D", OpClass::Load),
    op("LW", OpClass::Load),
    op("LD", OpClass::Load),
    op("L.S", OpClass::Load),
    // Stores
    op("S.D", OpClass::Store),
    op("SW", OpClass::Store),
    op("SD", OpClass::Store),
    op("S.S", OpClass::Store),
    // FP arithmetic
    alu("ADD.D", OpClass::FpAdd, AluOp::Add),
    alu("ADD.S", OpClass::FpAdd, AluOp::Add),
    alu("SUB.D", OpClass::FpSub, AluOp::Sub),
    alu("SUB.S", OpClass::FpSub, AluOp::Sub),
    op("MUL", OpClass::FpMult),
    op("MUL.D", OpClass::FpMult),
    op("MUL.S", OpClass::FpMult),
    op("DIV", OpClass::FpDiv),
    op("DIV.D", OpClass::FpDiv),
    op("DIV.S", OpClass::FpDiv),
    // Integer ALU
    alu("ADD", OpClass::IntAlu, AluOp::Add),
    alu("ADDI", OpClass::IntAlu, AluOp::Add),
    alu("DADD", OpClass::IntAlu, AluOp::Add),
    alu("DADDI", OpClass::IntAlu, AluOp::Add),
    alu("SUB", OpClass::IntAlu, AluOp::Sub),
    alu("SUBI", OpClass::IntAlu, AluOp::Sub),
    alu("DSUB", OpClass::IntAlu, AluOp::Sub),
    alu("DSUBI", OpClass::IntAlu, AluOp::Sub),
    // Branches
    branch("BNE", BranchCond::NotEqual, false),
    branch("BNEZ", BranchCond::NotEqual, true),
    branch("BEQ", BranchCond::Equal, false),
    branch("BEQZ", BranchCond::Equal, true),
];

/// Looks up a mnemonic, case-insensitively.
pub fn lookup(mnemonic: &str) -> Option<&'static OpDesc> {
    let upper = mnemonic.to_ascii_uppercase();
    OPCODES.iter().find(|d| d.mnemonic == upper)
}
