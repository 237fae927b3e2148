//! The cycle engine: one atomic clock advance per call.
//!
//! A step reads the prior state and returns the next one. Internally it runs
//! three ordered phases over a working copy:
//! 1. **Write-Back** — one finished result wins the CDB and flows into every
//!    waiting register and operand slot.
//! 2. **Execute** — ready stations charge latencies, make progress, and
//!    apply memory/branch side effects.
//! 3. **Issue** — at most one instruction enters a station, with renamed
//!    operands and a resolved address.
//!
//! All reads inside a phase see the updates of earlier phases of the same
//! cycle; callers only ever see whole-cycle boundaries.

mod execute;
mod issue;
mod writeback;

use crate::common::error::EngineError;
use crate::config::Config;
use crate::machine::MachineState;
use std::collections::BTreeMap;
use tracing::trace;

/// Advances the machine by one clock cycle.
///
/// A finished state steps to itself (the cycle does not advance). The input
/// state is validated first; on failure the error is returned and the caller
/// keeps its (untouched) state.
///
/// # Errors
///
/// [`EngineError`] when the prior state violates a structural invariant —
/// a programming bug, not a property of the simulated program.
pub fn step(
    state: &MachineState,
    config: &Config,
    labels: &BTreeMap<String, u64>,
) -> Result<MachineState, EngineError> {
    if state.finished {
        return Ok(state.clone());
    }
    state.validate()?;

    let mut next = state.clone();
    next.cycle += 1;
    next.cdb = None;

    writeback::run(&mut next);
    execute::run(&mut next, config, labels);
    issue::run(&mut next);

    next.update_finished();
    trace!(cycle = next.cycle, pc = next.pc, finished = next.finished, "cycle complete");
    Ok(next)
}
