//! Run statistics derived from a machine state.
//!
//! This module summarizes a run for reporting. It provides:
//! 1. **Counts:** Dynamic instructions by class, retirements, CDB traffic.
//! 2. **Memory behavior:** Cache miss count (hits are the remaining started
//!    loads).
//! 3. **Timing:** Total cycles and mean issue-to-write latency.
//!
//! Statistics are presentation-derived: they read the state and never feed
//! back into the engine.

use crate::isa::OpClass;
use crate::machine::{EventKind, MachineState};
use std::fmt::Write as _;

/// Summary statistics for a (possibly still-running) simulation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimStats {
    /// Cycles elapsed.
    pub cycles: u64,
    /// Dynamic instructions created (loop iterations count separately).
    pub instructions: u64,
    /// Dynamic instructions fully retired.
    pub retired: u64,
    /// Retired loads.
    pub loads: u64,
    /// Retired stores.
    pub stores: u64,
    /// Retired FP arithmetic instructions.
    pub fp_arith: u64,
    /// Retired integer ALU instructions.
    pub int_alu: u64,
    /// Retired branches.
    pub branches: u64,
    /// Branches that resolved taken.
    pub branches_taken: u64,
    /// Data cache misses.
    pub cache_misses: u64,
    /// Divides that saw a zero divisor.
    pub divides_by_zero: u64,
    /// CDB broadcasts (every retired register-writing instruction).
    pub cdb_broadcasts: u64,
    /// Mean cycles from issue to write, over retired instructions.
    pub mean_issue_to_write: Option<f64>,
}

impl SimStats {
    /// Gathers statistics from `state`.
    pub fn collect(state: &MachineState) -> Self {
        let mut stats = Self { cycles: state.cycle, ..Self::default() };
        let mut latency_sum = 0u64;

        for inst in &state.instructions {
            stats.instructions += 1;
            if !inst.retired() {
                continue;
            }
            stats.retired += 1;
            if let (Some(issue), Some(write)) = (inst.issue_cycle, inst.write_cycle) {
                latency_sum += write.saturating_sub(issue) + 1;
            }
            match inst.op.class {
                OpClass::Load => stats.loads += 1,
                OpClass::Store => stats.stores += 1,
                OpClass::FpAdd | OpClass::FpSub | OpClass::FpMult | OpClass::FpDiv => {
                    stats.fp_arith += 1;
                }
                OpClass::IntAlu => stats.int_alu += 1,
                OpClass::Branch => stats.branches += 1,
            }
            if inst.op.class.writes_register() {
                stats.cdb_broadcasts += 1;
            }
        }

        if stats.retired > 0 {
            stats.mean_issue_to_write = Some(latency_sum as f64 / stats.retired as f64);
        }

        for event in state.log.events() {
            match event.kind {
                EventKind::CacheMiss { .. } => stats.cache_misses += 1,
                EventKind::DivideByZero { .. } => stats.divides_by_zero += 1,
                EventKind::BranchResolved { taken: true, .. } => stats.branches_taken += 1,
                _ => {}
            }
        }

        stats
    }

    /// Formats a human-readable report block.
    pub fn report(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Cycles:            {}", self.cycles);
        let _ = writeln!(
            out,
            "Instructions:      {} dynamic, {} retired",
            self.instructions, self.retired
        );
        let _ = writeln!(
            out,
            "Mix:               {} load / {} store / {} fp / {} int / {} branch",
            self.loads, self.stores, self.fp_arith, self.int_alu, self.branches
        );
        let _ = writeln!(out, "Branches taken:    {}", self.branches_taken);
        let _ = writeln!(out, "Cache misses:      {}", self.cache_misses);
        let _ = writeln!(out, "CDB broadcasts:    {}", self.cdb_broadcasts);
        if self.divides_by_zero > 0 {
            let _ = writeln!(out, "Divides by zero:   {}", self.divides_by_zero);
        }
        if let Some(mean) = self.mean_issue_to_write {
            let _ = writeln!(out, "Issue-to-write:    {mean:.1} cycles mean");
        }
        out
    }
}
