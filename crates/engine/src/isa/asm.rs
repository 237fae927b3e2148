//! Assembly parser: source text → decoded program + label map.
//!
//! This module turns assembly source into issue-ready instructions. It performs:
//! 1. **Line normalization:** Trim, skip blanks, split a leading `LABEL:`
//!    prefix, then tokenize on commas and whitespace.
//! 2. **Operand decoding:** The three-operand form `OP D, S1, S2` and the
//!    memory form `OP D, OFFSET(BASE)`.
//! 3. **Addressing:** PC addresses are assigned in steps of 4 from 0; labels
//!    bind to the PC of the next instruction.
//!
//! Label *references* (branch targets) are kept as strings; they resolve at
//! branch execution so forward references cost nothing here.

use crate::common::error::ParseError;
use crate::common::reg::RegName;
use crate::isa::{self, OpClass, OpDesc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Width of one instruction slot in the address space.
pub const INST_BYTES: u64 = 4;

/// One decoded static instruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInst {
    /// The instruction text as written (label prefix stripped).
    pub text: String,
    /// Mnemonic in canonical uppercase.
    pub opcode: String,
    /// Operation descriptor resolved from the mnemonic table.
    pub op: OpDesc,
    /// Destination field. For stores this is the register whose value is
    /// written to memory; for branches, the first compared register.
    pub dest: Option<String>,
    /// First source field: a register, or the base register for memory ops,
    /// or the target label for `BNEZ`/`BEQZ`.
    pub src1: Option<String>,
    /// Second source field: a register, an immediate as written, an offset
    /// as written, or the target label for `BNE`/`BEQ`.
    pub src2: Option<String>,
    /// Parsed immediate (ALU immediates and memory offsets).
    pub imm: Option<i64>,
    /// Program-counter address of this instruction.
    pub pc: u64,
}

/// A parsed program: instructions in source order plus the label map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    /// Instructions with sequential PC addresses.
    pub instructions: Vec<SourceInst>,
    /// Label name → PC address of the instruction it precedes.
    pub labels: BTreeMap<String, u64>,
}

/// Parses assembly source into a [`Program`].
///
/// # Errors
///
/// Returns a [`ParseError`] naming the first offending line and token; no
/// partial program is produced.
pub fn parse(source: &str) -> Result<Program, ParseError> {
    let mut instructions = Vec::new();
    let mut labels = BTreeMap::new();
    let mut pc = 0u64;

    for (idx, raw) in source.lines().enumerate() {
        let line = idx + 1;
        let mut text = raw.trim();
        if text.is_empty() {
            continue;
        }

        if let Some(colon) = text.find(':') {
            let label = text[..colon].trim();
            if is_label_name(label) {
                if labels.insert(label.to_string(), pc).is_some() {
                    return Err(ParseError::DuplicateLabel { line, label: label.to_string() });
                }
                text = text[colon + 1..].trim();
                if text.is_empty() {
                    continue; // pure label line: binds the next instruction
                }
            }
        }

        instructions.push(parse_inst(text, line, pc)?);
        pc += INST_BYTES;
    }

    if instructions.is_empty() {
        return Err(ParseError::EmptyProgram);
    }
    Ok(Program { instructions, labels })
}

/// A label is a bare identifier: letters, digits, underscores, not starting
/// with a digit.
fn is_label_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Decodes one instruction line (label already stripped).
fn parse_inst(text: &str, line: usize, pc: u64) -> Result<SourceInst, ParseError> {
    let tokens: Vec<&str> = text.split([',', ' ', '\t']).filter(|t| !t.is_empty()).collect();
    let (mnemonic, operands) = match tokens.split_first() {
        Some(split) => split,
        None => return Err(ParseError::MissingOperand { line }),
    };

    let op = *isa::lookup(mnemonic)
        .ok_or_else(|| ParseError::UnknownOpcode { line, token: (*mnemonic).to_string() })?;

    let mut inst = SourceInst {
        text: text.to_string(),
        opcode: mnemonic.to_ascii_uppercase(),
        op,
        dest: None,
        src1: None,
        src2: None,
        imm: None,
        pc,
    };

    match op.class {
        OpClass::Load | OpClass::Store => {
            let [reg, mem] = expect_operands::<2>(operands, line)?;
            inst.dest = Some(parse_register(reg, line)?);
            let (offset, base) = parse_mem_operand(mem, line)?;
            inst.src1 = Some(base);
            inst.src2 = Some(offset.to_string());
            inst.imm = Some(offset);
        }
        OpClass::FpAdd | OpClass::FpSub | OpClass::FpMult | OpClass::FpDiv => {
            let [dest, src1, src2] = expect_operands::<3>(operands, line)?;
            inst.dest = Some(parse_register(dest, line)?);
            inst.src1 = Some(parse_register(src1, line)?);
            inst.src2 = Some(parse_register(src2, line)?);
        }
        OpClass::IntAlu => {
            let [dest, src1, src2] = expect_operands::<3>(operands, line)?;
            inst.dest = Some(parse_register(dest, line)?);
            inst.src1 = Some(parse_register(src1, line)?);
            // Third token: a decimal immediate or a register.
            if let Ok(value) = src2.parse::<i64>() {
                inst.imm = Some(value);
                inst.src2 = Some(src2.to_string());
            } else {
                inst.src2 = Some(parse_register(src2, line)?);
            }
        }
        OpClass::Branch if op.compares_zero => {
            let [reg, label] = expect_operands::<2>(operands, line)?;
            inst.dest = Some(parse_register(reg, line)?);
            inst.src1 = Some(label.to_string());
        }
        OpClass::Branch => {
            let [r1, r2, label] = expect_operands::<3>(operands, line)?;
            inst.dest = Some(parse_register(r1, line)?);
            inst.src1 = Some(parse_register(r2, line)?);
            inst.src2 = Some(label.to_string());
        }
    }

    Ok(inst)
}

/// Requires exactly `N` operand tokens.
fn expect_operands<'a, const N: usize>(
    operands: &[&'a str],
    line: usize,
) -> Result<[&'a str; N], ParseError> {
    match <[&str; N]>::try_from(operands) {
        Ok(array) => Ok(array),
        Err(_) if operands.len() < N => Err(ParseError::MissingOperand { line }),
        Err(_) => Err(ParseError::MalformedOperand { line, token: operands[N].to_string() }),
    }
}

/// Validates a register token and returns its canonical spelling.
fn parse_register(token: &str, line: usize) -> Result<String, ParseError> {
    RegName::parse(token)
        .map(|r| r.to_string())
        .ok_or_else(|| ParseError::MalformedOperand { line, token: token.to_string() })
}

/// Decodes `OFFSET(BASE)`, e.g. `0(R2)` or `-8(R1)`.
fn parse_mem_operand(token: &str, line: usize) -> Result<(i64, String), ParseError> {
    let malformed = |t: &str| ParseError::MalformedOperand { line, token: t.to_string() };

    let open = token.find('(').ok_or_else(|| malformed(token))?;
    if !token.ends_with(')') {
        return Err(malformed(token));
    }
    let offset = token[..open].parse::<i64>().map_err(|_| malformed(token))?;
    let base = parse_register(&token[open + 1..token.len() - 1], line)?;
    Ok((offset, base))
}
