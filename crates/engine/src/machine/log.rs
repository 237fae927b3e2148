//! Append-only event log.
//!
//! The log is the user-visible surface for recovered runtime anomalies
//! (division by zero, undefined branch labels) and for notable but normal
//! events (cache misses, branch resolutions). Each step may append any
//! number of entries in phase order.

use crate::machine::station::StationId;
use serde::Serialize;
use std::fmt;

/// What happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum EventKind {
    /// A load missed the data cache.
    CacheMiss {
        /// The effective address of the load.
        address: u64,
    },
    /// A divide saw a zero divisor; the result is 0.
    DivideByZero {
        /// The station executing the divide.
        station: StationId,
    },
    /// A branch targeted a label the program never defines; the PC is
    /// left unchanged.
    UndefinedLabel {
        /// The missing label.
        label: String,
    },
    /// A branch resolved.
    BranchResolved {
        /// Whether the branch was taken.
        taken: bool,
        /// The target PC, when taken and defined.
        target: Option<u64>,
    },
    /// An effective address computed below zero and was clamped to 0.
    NegativeAddress {
        /// Base register value at issue.
        base: f64,
        /// The signed offset.
        offset: i64,
    },
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CacheMiss { address } => write!(f, "cache miss at address {address}"),
            Self::DivideByZero { station } => write!(f, "divide by zero in {station}"),
            Self::UndefinedLabel { label } => write!(f, "branch to undefined label `{label}`"),
            Self::BranchResolved { taken: true, target: Some(t) } => {
                write!(f, "branch taken to {t}")
            }
            Self::BranchResolved { taken: true, target: None } => write!(f, "branch taken"),
            Self::BranchResolved { taken: false, .. } => write!(f, "branch not taken"),
            Self::NegativeAddress { base, offset } => {
                write!(f, "negative effective address ({base} + {offset}), clamped to 0")
            }
        }
    }
}

/// One log entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Cycle in which the event occurred.
    pub cycle: u64,
    /// The event itself.
    #[serde(flatten)]
    pub kind: EventKind,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.cycle, self.kind)
    }
}

/// The append-only event log.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event.
    pub fn push(&mut self, cycle: u64, kind: EventKind) {
        self.events.push(Event { cycle, kind });
    }

    /// All events, oldest first.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True when nothing has been logged.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Counts events matching a predicate, a convenience for statistics.
    pub fn count_where(&self, pred: impl Fn(&EventKind) -> bool) -> usize {
        self.events.iter().filter(|e| pred(&e.kind)).count()
    }
}
