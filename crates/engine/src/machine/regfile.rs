//! Register file with renaming tags.
//!
//! Each register holds its architectural value plus an optional tag naming
//! the reservation station that will produce its next value. A tagged
//! register is "renamed": new issues read the tag, not the stale value.

use crate::common::error::EngineError;
use crate::common::reg::{Bank, RegName, REGS_PER_BANK};
use crate::machine::station::StationId;
use serde::Serialize;

/// One architectural register.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Register {
    /// Current architectural value.
    pub value: f64,
    /// Pending producer, if the register is renamed.
    pub tag: Option<StationId>,
}

/// The architectural register file: 32 integer + 32 floating-point registers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterFile {
    int: Vec<Register>,
    fp: Vec<Register>,
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterFile {
    /// Creates a register file with all values 0 and no tags.
    pub fn new() -> Self {
        Self {
            int: vec![Register::default(); REGS_PER_BANK],
            fp: vec![Register::default(); REGS_PER_BANK],
        }
    }

    /// Reads a register.
    pub fn get(&self, name: RegName) -> Register {
        match name.bank {
            Bank::Int => self.int[name.index],
            Bank::Fp => self.fp[name.index],
        }
    }

    fn get_mut(&mut self, name: RegName) -> &mut Register {
        match name.bank {
            Bank::Int => &mut self.int[name.index],
            Bank::Fp => &mut self.fp[name.index],
        }
    }

    /// Overwrites a register's architectural value, clearing any tag.
    pub fn set_value(&mut self, name: RegName, value: f64) {
        let reg = self.get_mut(name);
        reg.value = value;
        reg.tag = None;
    }

    /// Marks `name` as renamed: its next value comes from `tag`.
    pub fn set_producer(&mut self, name: RegName, tag: StationId) {
        self.get_mut(name).tag = Some(tag);
    }

    /// Applies a CDB broadcast: every register waiting on `tag` takes the
    /// value and drops its tag.
    pub fn broadcast(&mut self, tag: StationId, value: f64) {
        for reg in self.int.iter_mut().chain(self.fp.iter_mut()) {
            if reg.tag == Some(tag) {
                reg.value = value;
                reg.tag = None;
            }
        }
    }

    /// Iterates all registers with their names, integer bank first.
    pub fn iter(&self) -> impl Iterator<Item = (RegName, Register)> + '_ {
        let ints = self
            .int
            .iter()
            .enumerate()
            .map(|(index, reg)| (RegName { bank: Bank::Int, index }, *reg));
        let fps = self
            .fp
            .iter()
            .enumerate()
            .map(|(index, reg)| (RegName { bank: Bank::Fp, index }, *reg));
        ints.chain(fps)
    }

    /// Parses `name` and reads the register, for callers holding a string.
    pub fn get_named(&self, name: &str) -> Result<Register, EngineError> {
        let parsed = RegName::parse(name)
            .ok_or_else(|| EngineError::UnknownRegister { name: name.to_string() })?;
        Ok(self.get(parsed))
    }
}
