//! Shared test infrastructure.
//!
//! Provides:
//! - **Builders**: one-line construction of a `Simulator` from source text.
//! - **Checked runs**: a step loop that asserts the universal invariants
//!   after every cycle, so every scenario doubles as an invariant test.
//! - **Accessors**: terse register/instruction lookups for assertions.

use tomsim_core::isa::UnitClass;
use tomsim_core::machine::{DynInst, MachineState};
use tomsim_core::{Config, RunOutcome, Simulator};

/// Builds a simulator or panics with the parse/seed error.
pub fn sim(source: &str, config: Config, registers: &[(&str, f64)]) -> Simulator {
    match Simulator::new(source, config, registers) {
        Ok(sim) => sim,
        Err(e) => panic!("simulator construction failed: {e}"),
    }
}

/// Builds a simulator with the default configuration.
pub fn sim_default(source: &str, registers: &[(&str, f64)]) -> Simulator {
    sim(source, Config::default(), registers)
}

/// Steps until finished or `max_cycles`, asserting the universal invariants
/// between every pair of consecutive states.
pub fn run_checked(sim: &mut Simulator, max_cycles: u64) -> RunOutcome {
    let mut prev = sim.state().clone();
    while !sim.state().finished && sim.state().cycle < max_cycles {
        if let Err(e) = sim.step() {
            panic!("step failed at cycle {}: {e}", prev.cycle);
        }
        assert_invariants(&prev, sim.state());
        prev = sim.state().clone();
    }
    if sim.state().finished {
        RunOutcome::Finished { cycles: sim.state().cycle }
    } else {
        RunOutcome::CycleLimit { cycles: sim.state().cycle }
    }
}

/// Runs to completion and returns the finish cycle; panics on a cycle-limit
/// hit so hung programs fail loudly.
pub fn finish(sim: &mut Simulator) -> u64 {
    match run_checked(sim, 100_000) {
        RunOutcome::Finished { cycles } => cycles,
        RunOutcome::CycleLimit { cycles } => panic!("program did not drain in {cycles} cycles"),
    }
}

/// The universal invariants that must hold after every step.
pub fn assert_invariants(prev: &MachineState, next: &MachineState) {
    if let Err(e) = next.validate() {
        panic!("structural invariant broken at cycle {}: {e}", next.cycle);
    }
    assert_eq!(next.cycle, prev.cycle + 1, "one step advances exactly one cycle");

    for inst in &next.instructions {
        let stamps =
            [inst.issue_cycle, inst.exec_start_cycle, inst.exec_end_cycle, inst.write_cycle];

        // Later lifecycle stages imply the earlier ones.
        assert!(inst.exec_start_cycle.is_none() || inst.issue_cycle.is_some());
        assert!(inst.exec_end_cycle.is_none() || inst.exec_start_cycle.is_some());
        assert!(inst.write_cycle.is_none() || inst.exec_end_cycle.is_some());

        for window in stamps.windows(2) {
            if let (Some(a), Some(b)) = (window[0], window[1]) {
                assert!(a <= b, "timestamps out of order for instruction {}", inst.id);
            }
        }
        for stamp in stamps.into_iter().flatten() {
            assert!(stamp <= next.cycle, "timestamp in the future for instruction {}", inst.id);
        }
    }

    if let Some(broadcast) = next.cdb {
        assert_ne!(broadcast.tag.unit, UnitClass::Store, "a store never sets the CDB");
    }

    assert!(next.cache.len() <= next.cache.capacity(), "cache exceeded its capacity");

    // A stall that survives the whole cycle forbids issue. (The cycle the
    // branch resolves, the stall drops in Execute and issue legally resumes
    // in the same cycle's Issue phase.)
    if prev.branch_stall && next.branch_stall {
        assert!(
            next.instructions.iter().all(|i| i.issue_cycle != Some(next.cycle)),
            "an instruction issued while the branch stall was up"
        );
    }
}

/// Current value of a register, by name.
pub fn reg(sim: &Simulator, name: &str) -> f64 {
    match sim.state().registers.get_named(name) {
        Ok(register) => register.value,
        Err(e) => panic!("{e}"),
    }
}

/// The dynamic instruction at `index`.
pub fn inst(sim: &Simulator, index: usize) -> DynInst {
    sim.state().instructions[index].clone()
}

/// `(issue, exec_start, exec_end, write)` for the instruction at `index`,
/// panicking if any timestamp is still absent.
pub fn timeline(sim: &Simulator, index: usize) -> (u64, u64, u64, u64) {
    let inst = inst(sim, index);
    match (inst.issue_cycle, inst.exec_start_cycle, inst.exec_end_cycle, inst.write_cycle) {
        (Some(i), Some(s), Some(e), Some(w)) => (i, s, e, w),
        _ => panic!("instruction {} has not retired: {inst:?}", inst.id),
    }
}
