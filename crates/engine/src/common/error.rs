//! Error types for the simulator.
//!
//! This module defines the three error surfaces of the core. It provides:
//! 1. **Parse errors:** Malformed assembly; initialization is never reached.
//! 2. **Engine errors:** Invariant violations inside the cycle engine; the
//!    step aborts and the caller's state is left untouched.
//! 3. **A combined error:** For the `Simulator` facade, which can fail either way.
//!
//! Recovered runtime anomalies (division by zero, undefined branch labels,
//! cache misses) are *not* errors; they land in the machine event log.

use thiserror::Error;

/// Errors produced while parsing assembly source.
///
/// Line numbers are 1-based and refer to the original source text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The first token of a line is not a recognized mnemonic.
    #[error("line {line}: unknown opcode `{token}`")]
    UnknownOpcode {
        /// 1-based source line.
        line: usize,
        /// The offending token, as written.
        token: String,
    },

    /// An operand token does not fit the shape its opcode requires.
    #[error("line {line}: malformed operand `{token}`")]
    MalformedOperand {
        /// 1-based source line.
        line: usize,
        /// The offending token, as written.
        token: String,
    },

    /// A line has fewer operands than its opcode requires.
    #[error("line {line}: missing operand(s)")]
    MissingOperand {
        /// 1-based source line.
        line: usize,
    },

    /// The same label is bound twice.
    #[error("line {line}: duplicate label `{label}`")]
    DuplicateLabel {
        /// 1-based source line.
        line: usize,
        /// The label name, without the trailing colon.
        label: String,
    },

    /// The source contains no instructions at all.
    #[error("program contains no instructions")]
    EmptyProgram,
}

/// Invariant violations inside the cycle engine.
///
/// These indicate programming bugs, not user errors. `step` returns them
/// without advancing the cycle, so the caller still holds a consistent state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A reservation station's fields contradict each other (busy without a
    /// bound instruction, an operand slot occupied while idle, ...).
    #[error("reservation station {station} violates its invariants")]
    StationCorrupt {
        /// Display name of the station, e.g. `MULT2`.
        station: String,
    },

    /// An operand or register tag names no currently-busy reservation station.
    #[error("tag {tag} does not name a busy reservation station")]
    DanglingTag {
        /// Display name of the dangling tag.
        tag: String,
    },

    /// Register seeding was attempted after the clock started.
    #[error("register values may only be seeded at cycle 0 (cycle is {cycle})")]
    WriteAfterStart {
        /// The current cycle.
        cycle: u64,
    },

    /// A register name does not exist in the machine.
    #[error("unknown register `{name}`")]
    UnknownRegister {
        /// The name as supplied by the caller.
        name: String,
    },
}

/// Either kind of failure, for callers that parse and run in one motion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// The assembly source did not parse.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The engine detected an invariant violation.
    #[error(transparent)]
    Engine(#[from] EngineError),
}
