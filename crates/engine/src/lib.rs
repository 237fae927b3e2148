//! Tomasulo pipeline simulator library.
//!
//! This crate implements a cycle-accurate simulator of a classical Tomasulo
//! out-of-order pipeline for a MIPS/DLX-like instruction set:
//! 1. **ISA:** Mnemonic table, operation/unit classification, and the
//!    assembly parser.
//! 2. **Machine:** Reservation stations, tagged register file, sparse
//!    memory, fully-associative LRU data cache, CDB slot, and event log.
//! 3. **Engine:** The three-phase cycle transition
//!    (Write-Back → Execute → Issue) with issue-time memory disambiguation,
//!    branch stalls, cache-miss penalties, and dynamic loop re-entry.
//! 4. **Simulation:** The `Simulator` facade, configuration, and statistics.
//!
//! There is no speculation and no reorder buffer: branches stall issue until
//! they resolve, and results commit straight off the Common Data Bus.

/// Common types (errors, register names).
pub mod common;
/// Simulator configuration (defaults, station counts, latencies, cache).
pub mod config;
/// Instruction set (classification tables) and assembly parsing.
pub mod isa;
/// Machine state (stations, registers, memory, cache, log).
pub mod machine;
/// The cycle engine (Write-Back, Execute, Issue phases).
pub mod pipeline;
/// Simulation driver.
pub mod sim;
/// Run statistics.
pub mod stats;

/// Combined and per-surface error types.
pub use crate::common::error::{EngineError, ParseError, SimError};
/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Assembly parsing entry point.
pub use crate::isa::asm::{parse, Program};
/// The complete per-cycle machine state.
pub use crate::machine::MachineState;
/// One-cycle state transition.
pub use crate::pipeline::step;
/// Top-level simulator; owns state, config, and labels side-by-side.
pub use crate::sim::{RunOutcome, Simulator};
/// Run statistics derived from a state.
pub use crate::stats::SimStats;
