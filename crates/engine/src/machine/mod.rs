//! Machine state: everything one clock cycle transforms.
//!
//! This module aggregates the architectural and microarchitectural state of
//! the simulated machine. It provides:
//! 1. **Dynamic instructions:** One entry per runtime occurrence of a static
//!    instruction, carrying the four lifecycle timestamps.
//! 2. **The aggregate:** Cycle, PC, reservation stations, register file,
//!    memory, cache, CDB slot, event log, and the control flags.
//! 3. **Validation:** The invariant check the engine runs before every step.
//!
//! The cycle engine reads a prior state and returns a new one; callers hold
//! exactly one current state.

/// Fully-associative LRU data cache.
pub mod cache;
/// Append-only event log.
pub mod log;
/// Sparse data memory.
pub mod memory;
/// Register file with renaming tags.
pub mod regfile;
/// Reservation stations and operand slots.
pub mod station;

use crate::common::error::EngineError;
use crate::common::reg::RegName;
use crate::config::Config;
use crate::isa::asm::SourceInst;
use crate::isa::{OpDesc, UnitClass};
use serde::Serialize;

pub use cache::{CacheAccess, CacheBlock, DataCache};
pub use log::{Event, EventKind, EventLog};
pub use memory::Memory;
pub use regfile::{Register, RegisterFile};
pub use station::{Operand, ReservationStation, StationId};

/// One runtime occurrence of a static instruction.
///
/// The four timestamps start absent and are set exactly once each, in
/// non-decreasing order. A looped instruction gets a fresh instance (fresh
/// identity, absent timestamps) every time control revisits its PC.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DynInst {
    /// Monotonically increasing identity.
    pub id: u64,
    /// The instruction text as written.
    pub text: String,
    /// Mnemonic in canonical uppercase.
    pub opcode: String,
    /// Operation descriptor.
    pub op: OpDesc,
    /// Destination field (store-data register for stores, first compared
    /// register for branches).
    pub dest: Option<String>,
    /// First source field.
    pub src1: Option<String>,
    /// Second source field (register, immediate text, offset text, or label).
    pub src2: Option<String>,
    /// Parsed immediate, when present.
    pub imm: Option<i64>,
    /// PC address of the static instruction this instance came from.
    pub pc_address: u64,
    /// Cycle the instruction entered a reservation station.
    pub issue_cycle: Option<u64>,
    /// Cycle execution began.
    pub exec_start_cycle: Option<u64>,
    /// Cycle execution completed.
    pub exec_end_cycle: Option<u64>,
    /// Cycle the result was written (CDB broadcast, or execute-end for
    /// stores and branches).
    pub write_cycle: Option<u64>,
}

impl DynInst {
    /// Builds the initial dynamic instance of a parsed instruction.
    pub fn from_source(src: &SourceInst, id: u64) -> Self {
        Self {
            id,
            text: src.text.clone(),
            opcode: src.opcode.clone(),
            op: src.op,
            dest: src.dest.clone(),
            src1: src.src1.clone(),
            src2: src.src2.clone(),
            imm: src.imm,
            pc_address: src.pc,
            issue_cycle: None,
            exec_start_cycle: None,
            exec_end_cycle: None,
            write_cycle: None,
        }
    }

    /// Clones this instance for loop re-entry: fresh identity, absent
    /// timestamps, same decoded fields.
    pub fn respawn(&self, id: u64) -> Self {
        Self {
            id,
            issue_cycle: None,
            exec_start_cycle: None,
            exec_end_cycle: None,
            write_cycle: None,
            ..self.clone()
        }
    }

    /// The instance has fully retired.
    pub fn retired(&self) -> bool {
        self.write_cycle.is_some()
    }
}

/// The value riding the Common Data Bus this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CdbBroadcast {
    /// Identity of the producing reservation station.
    pub tag: StationId,
    /// The broadcast value.
    pub value: f64,
}

/// The complete machine state at one cycle boundary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineState {
    /// Current cycle; 0 before the first step.
    pub cycle: u64,
    /// Current program counter.
    pub pc: u64,
    /// All dynamic instructions, in issue-eligibility order.
    pub instructions: Vec<DynInst>,
    /// Reservation stations in the fixed scan order (ADD, MULT, LOAD,
    /// STORE, INTEGER, each by ordinal).
    pub stations: Vec<ReservationStation>,
    /// Register file.
    pub registers: RegisterFile,
    /// Data memory.
    pub memory: Memory,
    /// Data cache.
    pub cache: DataCache,
    /// The Common Data Bus slot: at most one broadcast per cycle, published
    /// in the write-back phase and cleared when the next cycle begins.
    pub cdb: Option<CdbBroadcast>,
    /// Append-only event log.
    pub log: EventLog,
    /// The program has fully drained.
    pub finished: bool,
    /// An unresolved branch is in flight; issue is suppressed.
    pub branch_stall: bool,
    next_id: u64,
}

impl MachineState {
    /// Builds the initial state: stations per the configuration, registers
    /// seeded from `initial_registers` with empty tags, memory zeroed, cache
    /// empty, cycle 0, PC 0.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnknownRegister`] if a seed names a register the
    /// machine does not have.
    pub fn initialize(
        instructions: &[SourceInst],
        config: &Config,
        initial_registers: &[(&str, f64)],
    ) -> Result<Self, EngineError> {
        let mut stations = Vec::new();
        for unit in UnitClass::ALL {
            for ordinal in 1..=config.stations.count(unit) {
                stations.push(ReservationStation::new(StationId { unit, ordinal }));
            }
        }

        let mut registers = RegisterFile::new();
        for (name, value) in initial_registers {
            let reg = RegName::parse(name)
                .ok_or_else(|| EngineError::UnknownRegister { name: (*name).to_string() })?;
            registers.set_value(reg, *value);
        }

        let instructions: Vec<DynInst> = instructions
            .iter()
            .enumerate()
            .map(|(i, src)| DynInst::from_source(src, i as u64))
            .collect();
        let next_id = instructions.len() as u64;

        Ok(Self {
            cycle: 0,
            pc: 0,
            instructions,
            stations,
            registers,
            memory: Memory::new(),
            cache: DataCache::new(&config.cache),
            cdb: None,
            log: EventLog::new(),
            finished: false,
            branch_stall: false,
            next_id,
        })
    }

    /// Seeds a starting register value. Permitted only before the clock has
    /// advanced.
    ///
    /// # Errors
    ///
    /// [`EngineError::WriteAfterStart`] once the cycle counter is nonzero;
    /// [`EngineError::UnknownRegister`] for a bad name.
    pub fn set_register_value(&mut self, name: &str, value: f64) -> Result<(), EngineError> {
        if self.cycle != 0 {
            return Err(EngineError::WriteAfterStart { cycle: self.cycle });
        }
        let reg = RegName::parse(name)
            .ok_or_else(|| EngineError::UnknownRegister { name: name.to_string() })?;
        self.registers.set_value(reg, value);
        Ok(())
    }

    /// Allocates a fresh dynamic-instruction identity.
    pub fn fresh_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Index of the dynamic instruction with identity `id`.
    ///
    /// Identities are handed out in push order, so this is a direct index
    /// in practice; the scan keeps it honest.
    pub fn inst_index(&self, id: u64) -> Option<usize> {
        let guess = id as usize;
        if self.instructions.get(guess).is_some_and(|i| i.id == id) {
            return Some(guess);
        }
        self.instructions.iter().position(|i| i.id == id)
    }

    /// The station with identity `id`.
    pub fn station(&self, id: StationId) -> Option<&ReservationStation> {
        self.stations.iter().find(|s| s.id == id)
    }

    /// Index of the first free station of `unit`, in scan order.
    pub fn free_station(&self, unit: UnitClass) -> Option<usize> {
        self.stations.iter().position(|s| s.id.unit == unit && !s.busy)
    }

    /// Checks the structural invariants the engine relies on.
    ///
    /// # Errors
    ///
    /// [`EngineError::StationCorrupt`] when a station's fields contradict
    /// each other; [`EngineError::DanglingTag`] when an operand or register
    /// tag names no busy station.
    pub fn validate(&self) -> Result<(), EngineError> {
        for station in &self.stations {
            let corrupt = || EngineError::StationCorrupt { station: station.id.to_string() };
            if station.busy {
                let inst = station
                    .inst
                    .and_then(|id| self.inst_index(id))
                    .map(|i| &self.instructions[i])
                    .ok_or_else(|| corrupt())?;
                if inst.issue_cycle.is_none() || station.op.is_none() {
                    return Err(corrupt());
                }
                for slot in [station.vj, station.vk] {
                    if let Some(tag) = slot.tag() {
                        self.check_tag(tag)?;
                    }
                }
            } else if station.inst.is_some()
                || station.op.is_some()
                || station.result.is_some()
                || station.vj != Operand::Empty
                || station.vk != Operand::Empty
            {
                return Err(corrupt());
            }
        }

        for (_, reg) in self.registers.iter() {
            if let Some(tag) = reg.tag {
                self.check_tag(tag)?;
            }
        }

        Ok(())
    }

    fn check_tag(&self, tag: StationId) -> Result<(), EngineError> {
        match self.station(tag) {
            Some(s) if s.busy => Ok(()),
            _ => Err(EngineError::DanglingTag { tag: tag.to_string() }),
        }
    }

    /// Recomputes the finished flag: every dynamic instruction has written
    /// and the PC points past any pending (or re-enterable) instruction.
    pub fn update_finished(&mut self) {
        self.finished = self.instructions.iter().all(DynInst::retired)
            && !self.instructions.iter().any(|i| i.pc_address == self.pc);
    }
}
