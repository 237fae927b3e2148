//! Phase B — Execute: latency accounting and functional-unit semantics.
//!
//! Every busy station with resolved operands makes progress here:
//! 1. **Start:** The first ready cycle charges the latency (plus any cache
//!    penalty for loads) into the remaining-time counter.
//! 2. **Advance:** The counter drops by one per cycle.
//! 3. **Finish:** When it reaches zero the result is computed. Stores write
//!    memory and retire on the spot; branches resolve the PC, clear the
//!    stall, and retire; everything else parks the result for the CDB.

use crate::config::Config;
use crate::isa::{AluOp, OpClass, OpDesc};
use crate::machine::{EventKind, MachineState};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Runs the execute phase on `state`.
pub(crate) fn run(state: &mut MachineState, config: &Config, labels: &BTreeMap<String, u64>) {
    let cycle = state.cycle;

    for idx in 0..state.stations.len() {
        if !state.stations[idx].operands_ready() {
            continue;
        }
        let (Some(op), Some(inst_id)) = (state.stations[idx].op, state.stations[idx].inst) else {
            continue;
        };
        let Some(inst_idx) = state.inst_index(inst_id) else { continue };

        // First ready cycle: charge the latency.
        if state.instructions[inst_idx].exec_start_cycle.is_none() {
            state.instructions[inst_idx].exec_start_cycle = Some(cycle);
            let mut latency = config.latencies.for_class(op.class);
            if op.class == OpClass::Load {
                let address = state.stations[idx].address.unwrap_or(0);
                let access = state.cache.lookup(address, cycle);
                if !access.hit {
                    state.log.push(cycle, EventKind::CacheMiss { address });
                    latency += access.penalty;
                }
            }
            state.stations[idx].remaining = latency;
            debug!(cycle, station = %state.stations[idx].id, inst = inst_id, latency, "exec start");
        }

        if state.stations[idx].remaining > 0 {
            state.stations[idx].remaining -= 1;
        }

        if state.stations[idx].remaining == 0
            && state.instructions[inst_idx].exec_end_cycle.is_none()
        {
            state.instructions[inst_idx].exec_end_cycle = Some(cycle);
            finish(state, idx, inst_idx, op, labels);
        }
    }
}

/// Computes the result of a finished instruction and applies its side
/// effects.
fn finish(
    state: &mut MachineState,
    idx: usize,
    inst_idx: usize,
    op: OpDesc,
    labels: &BTreeMap<String, u64>,
) {
    let cycle = state.cycle;
    let vj = state.stations[idx].vj.value();
    let vk = state.stations[idx].vk.value();

    match op.class {
        OpClass::FpAdd | OpClass::FpSub | OpClass::IntAlu => {
            let result = match op.alu {
                Some(AluOp::Sub) => vj - vk,
                _ => vj + vk,
            };
            state.stations[idx].result = Some(result);
        }
        OpClass::FpMult => {
            state.stations[idx].result = Some(vj * vk);
        }
        OpClass::FpDiv => {
            let result = if vk == 0.0 {
                let station = state.stations[idx].id;
                state.log.push(cycle, EventKind::DivideByZero { station });
                warn!(cycle, station = %station, "divide by zero, result forced to 0");
                0.0
            } else {
                vj / vk
            };
            state.stations[idx].result = Some(result);
        }
        OpClass::Load => {
            let address = state.stations[idx].address.unwrap_or(0);
            state.stations[idx].result = Some(state.memory.read(address));
        }
        OpClass::Store => {
            // Stores bypass the CDB: write memory and retire immediately.
            let address = state.stations[idx].address.unwrap_or(0);
            state.memory.write(address, vk);
            state.instructions[inst_idx].write_cycle = Some(cycle);
            state.stations[idx].release();
            debug!(cycle, address, value = vk, "store retired");
        }
        OpClass::Branch => {
            resolve_branch(state, idx, inst_idx, op, vj, vk, labels);
        }
    }
}

/// Resolves a branch: tests the condition, redirects the PC through the
/// label map when taken, clears the stall, and retires the station.
fn resolve_branch(
    state: &mut MachineState,
    idx: usize,
    inst_idx: usize,
    op: OpDesc,
    vj: f64,
    vk: f64,
    labels: &BTreeMap<String, u64>,
) {
    let cycle = state.cycle;
    let taken = op.cond.is_some_and(|cond| cond.taken(vj, vk));

    if taken {
        // Zero-compare forms carry the label in the first source slot.
        let label = if op.compares_zero {
            state.instructions[inst_idx].src1.clone()
        } else {
            state.instructions[inst_idx].src2.clone()
        };
        match label.as_deref().and_then(|l| labels.get(l)) {
            Some(&target) => {
                state.pc = target;
                state.log.push(cycle, EventKind::BranchResolved { taken: true, target: Some(target) });
                debug!(cycle, target, "branch taken");
            }
            None => {
                let label = label.unwrap_or_default();
                warn!(cycle, label = %label, "branch to undefined label, PC unchanged");
                state.log.push(cycle, EventKind::UndefinedLabel { label });
            }
        }
    } else {
        state.log.push(cycle, EventKind::BranchResolved { taken: false, target: None });
        debug!(cycle, "branch not taken");
    }

    state.branch_stall = false;
    state.instructions[inst_idx].write_cycle = Some(cycle);
    state.stations[idx].release();
}
