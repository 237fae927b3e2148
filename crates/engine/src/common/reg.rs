//! Architectural register names.
//!
//! The machine has 32 integer registers `R0..R31` and 32 floating-point
//! registers `F0..F31`. Names are parsed case-insensitively and always
//! display in their canonical uppercase form.

use serde::{Serialize, Serializer};
use std::fmt;

/// Number of registers per bank.
pub const REGS_PER_BANK: usize = 32;

/// Register bank: integer (`R`) or floating-point (`F`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bank {
    /// Integer registers, `R` prefix.
    Int,
    /// Floating-point registers, `F` prefix.
    Fp,
}

impl Bank {
    /// The name prefix letter.
    pub fn prefix(self) -> char {
        match self {
            Self::Int => 'R',
            Self::Fp => 'F',
        }
    }
}

/// A parsed register name, e.g. `R2` or `F10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegName {
    /// The bank this register lives in.
    pub bank: Bank,
    /// Index within the bank, `0..32`.
    pub index: usize,
}

impl RegName {
    /// Parses a register name. Returns `None` for anything that is not
    /// `R0..R31` or `F0..F31` (case-insensitive).
    pub fn parse(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        let bank = match chars.next()?.to_ascii_uppercase() {
            'R' => Bank::Int,
            'F' => Bank::Fp,
            _ => return None,
        };
        let rest = chars.as_str();
        if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let index: usize = rest.parse().ok()?;
        (index < REGS_PER_BANK).then_some(Self { bank, index })
    }
}

impl fmt::Display for RegName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.bank.prefix(), self.index)
    }
}

impl Serialize for RegName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
