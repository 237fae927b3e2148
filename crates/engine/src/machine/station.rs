//! Reservation stations and their operand slots.
//!
//! A reservation station binds one in-flight dynamic instruction and holds
//! its operands as either resolved values or producer tags. The tagged
//! [`Operand`] union structurally enforces the value-or-tag invariant: a slot
//! is a value, a pending tag, or empty — never two at once.

use crate::isa::{OpDesc, UnitClass};
use serde::{Serialize, Serializer};
use std::fmt;

/// Identity of a reservation station: unit-class prefix plus 1-based ordinal,
/// e.g. `ADD1` or `MULT2`. Also used as the renaming tag (Qi/Qj/Qk).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StationId {
    /// The functional-unit class.
    pub unit: UnitClass,
    /// 1-based ordinal within the class.
    pub ordinal: usize,
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.unit.prefix(), self.ordinal)
    }
}

impl Serialize for StationId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One operand slot of a reservation station.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Operand {
    /// A resolved value, ready for execution.
    Value(f64),
    /// Waiting on the broadcast of the named station.
    Tag(StationId),
    /// Unused by this instruction (or the station is idle).
    #[default]
    Empty,
}

impl Operand {
    /// The slot does not block execution: a value or unused.
    pub fn is_ready(self) -> bool {
        !matches!(self, Self::Tag(_))
    }

    /// The resolved value, or 0 for an unused slot.
    pub fn value(self) -> f64 {
        match self {
            Self::Value(v) => v,
            _ => 0.0,
        }
    }

    /// The pending tag, if the slot is waiting on one.
    pub fn tag(self) -> Option<StationId> {
        match self {
            Self::Tag(t) => Some(t),
            _ => None,
        }
    }

    /// Fills the slot with `value` if it is waiting on `tag`.
    pub fn capture(&mut self, tag: StationId, value: f64) {
        if *self == Self::Tag(tag) {
            *self = Self::Value(value);
        }
    }
}

/// A reservation station.
///
/// `busy` tracks the bound instruction: both are set at issue and cleared
/// together when the station retires (CDB write-back, or execute-end for
/// stores and branches).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationStation {
    /// Station identity; doubles as the renaming tag.
    pub id: StationId,
    /// Occupied by an in-flight instruction.
    pub busy: bool,
    /// Operation of the bound instruction.
    pub op: Option<OpDesc>,
    /// First operand slot.
    pub vj: Operand,
    /// Second operand slot.
    pub vk: Operand,
    /// Effective address, for loads and stores (resolved at issue).
    pub address: Option<u64>,
    /// Identity of the bound dynamic instruction.
    pub inst: Option<u64>,
    /// Remaining execution cycles once execution has begun.
    pub remaining: u64,
    /// Computed result, pending CDB write-back.
    pub result: Option<f64>,
}

impl ReservationStation {
    /// Creates an idle station with the given identity.
    pub fn new(id: StationId) -> Self {
        Self {
            id,
            busy: false,
            op: None,
            vj: Operand::Empty,
            vk: Operand::Empty,
            address: None,
            inst: None,
            remaining: 0,
            result: None,
        }
    }

    /// Binds an instruction at issue time.
    pub fn issue(&mut self, op: OpDesc, inst: u64, vj: Operand, vk: Operand, address: Option<u64>) {
        self.busy = true;
        self.op = Some(op);
        self.vj = vj;
        self.vk = vk;
        self.address = address;
        self.inst = Some(inst);
        self.remaining = 0;
        self.result = None;
    }

    /// Both operand slots are resolved; the instruction may execute.
    pub fn operands_ready(&self) -> bool {
        self.busy && self.vj.is_ready() && self.vk.is_ready()
    }

    /// Execution is finished and a result is waiting for the CDB.
    pub fn wants_cdb(&self) -> bool {
        self.busy && self.remaining == 0 && self.result.is_some()
    }

    /// Releases the station back to the free pool.
    pub fn release(&mut self) {
        *self = Self::new(self.id);
    }
}
