//! Phase C — Issue: renaming, disambiguation, and structural allocation.
//!
//! At most one instruction enters a reservation station per cycle:
//! 1. **Selection:** The not-yet-issued dynamic instruction at the PC, or a
//!    fresh clone of the retired instance there (loop re-entry).
//! 2. **Address resolution:** Loads and stores compute their effective
//!    address now; a renamed base register stalls the issue unless its value
//!    is riding this cycle's CDB.
//! 3. **Disambiguation:** A memory op conflicting with an older in-flight
//!    memory op at the same address stalls (RAW for loads, WAR/WAW for
//!    stores).
//! 4. **Allocation & renaming:** A free station of the right class is
//!    claimed, operands become values or producer tags (with single-cycle
//!    CDB forwarding), and the destination register is re-tagged.

use crate::common::reg::RegName;
use crate::isa::asm::INST_BYTES;
use crate::isa::OpClass;
use crate::machine::{DynInst, EventKind, MachineState, Operand};
use tracing::debug;

/// Runs the issue phase on `state`.
pub(crate) fn run(state: &mut MachineState) {
    if state.branch_stall {
        return;
    }
    let cycle = state.cycle;
    let pc = state.pc;

    let Some(inst_idx) = select(state, pc) else { return };
    let inst = state.instructions[inst_idx].clone();
    let unit = inst.op.class.unit();

    // Effective address, resolved at issue.
    let mut address = None;
    if inst.op.class.is_memory() {
        let Some(resolved) = resolve_address(state, &inst) else { return };
        if has_memory_conflict(state, &inst, resolved) {
            return;
        }
        address = Some(resolved);
    }

    // Structural check: a free station of the required class.
    let Some(station_idx) = state.free_station(unit) else { return };

    // Commit the issue.
    state.instructions[inst_idx].issue_cycle = Some(cycle);
    state.pc += INST_BYTES;
    if inst.op.class == OpClass::Branch {
        state.branch_stall = true;
    }

    let (vj, vk) = rename_operands(state, &inst);
    let station_id = state.stations[station_idx].id;
    state.stations[station_idx].issue(inst.op, inst.id, vj, vk, address);

    // Register alias table: the destination's next value comes from here.
    if inst.op.class.writes_register() {
        if let Some(dest) = inst.dest.as_deref().and_then(RegName::parse) {
            state.registers.set_producer(dest, station_id);
        }
    }

    debug!(cycle, station = %station_id, inst = inst.id, text = %inst.text, "issued");
}

/// Picks the dynamic instruction to issue at `pc`: the pending instance, or
/// a fresh clone of the retired one (loop re-entry). `None` stalls issue.
fn select(state: &mut MachineState, pc: u64) -> Option<usize> {
    if let Some(idx) = state
        .instructions
        .iter()
        .position(|i| i.pc_address == pc && i.issue_cycle.is_none())
    {
        return Some(idx);
    }

    // Loop re-entry: control is back on an already-run PC. Clone the latest
    // instance once it has fully retired.
    let template_idx = state
        .instructions
        .iter()
        .enumerate()
        .filter(|(_, i)| i.pc_address == pc)
        .max_by_key(|(_, i)| i.id)
        .map(|(idx, _)| idx)?;
    if !state.instructions[template_idx].retired() {
        return None;
    }
    let id = state.fresh_id();
    let respawned = state.instructions[template_idx].respawn(id);
    state.instructions.push(respawned);
    Some(state.instructions.len() - 1)
}

/// Computes the effective address of a memory op, or `None` when the base
/// register's producer has not broadcast yet (issue stalls).
fn resolve_address(state: &mut MachineState, inst: &DynInst) -> Option<u64> {
    let base_name = inst.src1.as_deref().and_then(RegName::parse)?;
    let base = state.registers.get(base_name);
    let base_value = match base.tag {
        Some(tag) => match state.cdb {
            Some(broadcast) if broadcast.tag == tag => broadcast.value,
            _ => return None,
        },
        None => base.value,
    };

    let offset = inst.imm.unwrap_or(0);
    let sum = base_value as i64 + offset;
    if sum < 0 {
        state
            .log
            .push(state.cycle, EventKind::NegativeAddress { base: base_value, offset });
        return Some(0);
    }
    Some(sum as u64)
}

/// True when an older in-flight memory op at the same address forbids this
/// issue: load-after-store (RAW), or store-after-anything (WAR/WAW).
fn has_memory_conflict(state: &MachineState, inst: &DynInst, address: u64) -> bool {
    state.stations.iter().any(|station| {
        if !station.busy || station.address != Some(address) {
            return false;
        }
        let older = station.inst.is_some_and(|other| other < inst.id);
        let hazard = match inst.op.class {
            OpClass::Load => station.op.is_some_and(|o| o.class == OpClass::Store),
            _ => true,
        };
        older && hazard
    })
}

/// Renames the two operand slots for `inst` per its instruction family.
fn rename_operands(state: &MachineState, inst: &DynInst) -> (Operand, Operand) {
    match inst.op.class {
        OpClass::FpAdd | OpClass::FpSub | OpClass::FpMult | OpClass::FpDiv => (
            resolve_register(state, inst.src1.as_deref()),
            resolve_register(state, inst.src2.as_deref()),
        ),
        OpClass::IntAlu => {
            let vj = resolve_register(state, inst.src1.as_deref());
            let vk = match inst.imm {
                Some(imm) => Operand::Value(imm as f64),
                None => resolve_register(state, inst.src2.as_deref()),
            };
            (vj, vk)
        }
        // Loads execute purely from the address slot.
        OpClass::Load => (Operand::Empty, Operand::Empty),
        // The store's data register travels in vk.
        OpClass::Store => (Operand::Empty, resolve_register(state, inst.dest.as_deref())),
        OpClass::Branch => {
            let vj = resolve_register(state, inst.dest.as_deref());
            let vk = if inst.op.compares_zero {
                Operand::Value(0.0)
            } else {
                resolve_register(state, inst.src1.as_deref())
            };
            (vj, vk)
        }
    }
}

/// Reads a register into an operand slot: the broadcast value when its tag
/// rides this cycle's CDB, the tag when renamed, the value otherwise.
fn resolve_register(state: &MachineState, name: Option<&str>) -> Operand {
    let Some(reg_name) = name.and_then(RegName::parse) else {
        return Operand::Empty;
    };
    let reg = state.registers.get(reg_name);
    match reg.tag {
        Some(tag) => match state.cdb {
            Some(broadcast) if broadcast.tag == tag => Operand::Value(broadcast.value),
            _ => Operand::Tag(tag),
        },
        None => Operand::Value(reg.value),
    }
}
