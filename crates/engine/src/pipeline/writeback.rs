//! Phase A — Write-Back: CDB arbitration and broadcast.
//!
//! Scans busy stations for finished results, lets the earliest-issued
//! instruction win the bus, and flows its value into every waiting register
//! and operand slot. Stores and branches never appear here; they retire at
//! execute-end without touching the CDB.

use crate::machine::{CdbBroadcast, MachineState};
use tracing::debug;

/// Runs the write-back phase on `state`.
pub(crate) fn run(state: &mut MachineState) {
    // Arbitration: smallest bound-instruction identity wins; the fixed
    // station scan order breaks any remaining tie by ordinal.
    let mut winner: Option<(usize, u64)> = None;
    for (idx, station) in state.stations.iter().enumerate() {
        if !station.wants_cdb() {
            continue;
        }
        let Some(inst) = station.inst else { continue };
        if winner.is_none_or(|(_, best)| inst < best) {
            winner = Some((idx, inst));
        }
    }
    let Some((idx, inst_id)) = winner else { return };

    let tag = state.stations[idx].id;
    let Some(value) = state.stations[idx].result else { return };

    state.cdb = Some(CdbBroadcast { tag, value });
    if let Some(i) = state.inst_index(inst_id) {
        state.instructions[i].write_cycle = Some(state.cycle);
    }

    state.registers.broadcast(tag, value);
    for station in &mut state.stations {
        if station.busy && station.id != tag {
            station.vj.capture(tag, value);
            station.vk.capture(tag, value);
        }
    }

    state.stations[idx].release();
    debug!(cycle = state.cycle, tag = %tag, value, inst = inst_id, "CDB broadcast");
}
