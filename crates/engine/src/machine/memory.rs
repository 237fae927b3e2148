//! Sparse data memory.
//!
//! Programs under simulation touch a handful of words, so memory is a sparse
//! map from word address to value. Reads of unmapped addresses yield 0.

use serde::Serialize;
use std::collections::BTreeMap;

/// Sparse word-addressed data memory.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Memory {
    words: BTreeMap<u64, f64>,
}

impl Memory {
    /// Creates an empty (all-zero) memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the word at `address`; unmapped addresses read as 0.
    pub fn read(&self, address: u64) -> f64 {
        self.words.get(&address).copied().unwrap_or(0.0)
    }

    /// Writes the word at `address`.
    pub fn write(&mut self, address: u64, value: f64) {
        let _ = self.words.insert(address, value);
    }

    /// Iterates mapped words in address order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, f64)> + '_ {
        self.words.iter().map(|(&a, &v)| (a, v))
    }
}
