//! Simulator: owns the machine state, configuration, and label map
//! side-by-side.
//!
//! The cycle engine itself is a pure `state -> state` function; this facade
//! keeps its three inputs together and gives callers the parse-initialize-
//! step-inspect workflow in one place.

use crate::common::error::{EngineError, SimError};
use crate::config::Config;
use crate::isa::asm;
use crate::machine::MachineState;
use crate::pipeline;
use crate::stats::SimStats;
use std::collections::BTreeMap;

/// How a bounded run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The program drained completely.
    Finished {
        /// Cycle at which the finished flag was raised.
        cycles: u64,
    },
    /// The cycle cap was reached first.
    CycleLimit {
        /// The cap, which is also the current cycle.
        cycles: u64,
    },
}

/// Top-level simulator: machine state + configuration + labels.
#[derive(Debug, Clone)]
pub struct Simulator {
    state: MachineState,
    config: Config,
    labels: BTreeMap<String, u64>,
}

impl Simulator {
    /// Parses `source` and builds the initial machine state.
    ///
    /// # Errors
    ///
    /// [`SimError::Parse`] for malformed assembly (no state is built);
    /// [`SimError::Engine`] when a register seed names a register the
    /// machine does not have.
    pub fn new(
        source: &str,
        config: Config,
        initial_registers: &[(&str, f64)],
    ) -> Result<Self, SimError> {
        let program = asm::parse(source)?;
        let state = MachineState::initialize(&program.instructions, &config, initial_registers)?;
        Ok(Self { state, config, labels: program.labels })
    }

    /// Advances one clock cycle. A no-op once the machine is finished.
    ///
    /// # Errors
    ///
    /// [`EngineError`] on an invariant violation; the held state does not
    /// advance.
    pub fn step(&mut self) -> Result<(), EngineError> {
        self.state = pipeline::step(&self.state, &self.config, &self.labels)?;
        Ok(())
    }

    /// Steps until the program finishes or `max_cycles` total cycles have
    /// elapsed, whichever comes first.
    ///
    /// # Errors
    ///
    /// Propagates the first [`EngineError`] from a step.
    pub fn run(&mut self, max_cycles: u64) -> Result<RunOutcome, EngineError> {
        while !self.state.finished && self.state.cycle < max_cycles {
            self.step()?;
        }
        if self.state.finished {
            Ok(RunOutcome::Finished { cycles: self.state.cycle })
        } else {
            Ok(RunOutcome::CycleLimit { cycles: self.state.cycle })
        }
    }

    /// Seeds a starting register value; permitted only at cycle 0.
    ///
    /// # Errors
    ///
    /// [`EngineError::WriteAfterStart`] once the clock has advanced;
    /// [`EngineError::UnknownRegister`] for a bad name.
    pub fn set_register_value(&mut self, name: &str, value: f64) -> Result<(), EngineError> {
        self.state.set_register_value(name, value)
    }

    /// The current machine state.
    pub fn state(&self) -> &MachineState {
        &self.state
    }

    /// The active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Label name → PC address.
    pub fn labels(&self) -> &BTreeMap<String, u64> {
        &self.labels
    }

    /// Statistics over the current state.
    pub fn stats(&self) -> SimStats {
        SimStats::collect(&self.state)
    }

    /// The current state as pretty-printed JSON, for UI consumers.
    ///
    /// # Errors
    ///
    /// Propagates the `serde_json` error, which cannot occur for this type
    /// in practice.
    pub fn snapshot(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.state)
    }
}
