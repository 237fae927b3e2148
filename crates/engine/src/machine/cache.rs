//! Fully-associative LRU data cache.
//!
//! The cache only shapes load latency: a lookup reports hit or miss plus the
//! penalty cycles a missing load must add to its execution time. Misses
//! install the block immediately; when the set is at capacity the block with
//! the oldest last-access cycle is evicted, ties broken by insertion order.

use crate::config::CacheConfig;
use serde::Serialize;

/// One resident cache block.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheBlock {
    /// Block tag, `address / block_bytes`.
    pub tag: u64,
    /// Cycle of the most recent access.
    pub last_access: u64,
    /// Monotonic installation ordinal, the LRU tie-break.
    #[serde(skip)]
    inserted: u64,
}

/// Outcome of one cache lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheAccess {
    /// Whether the block was resident.
    pub hit: bool,
    /// Extra execution cycles (0 on a hit or with the cache disabled).
    pub penalty: u64,
}

/// The data cache.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataCache {
    enabled: bool,
    block_bytes: u64,
    capacity: usize,
    miss_penalty: u64,
    blocks: Vec<CacheBlock>,
    #[serde(skip)]
    insertions: u64,
}

impl DataCache {
    /// Creates an empty cache from its configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let safe_block = if config.block_bytes == 0 { 1 } else { config.block_bytes };
        let capacity = ((config.size_bytes / safe_block) as usize).max(1);
        Self {
            enabled: config.enabled,
            block_bytes: safe_block,
            capacity,
            miss_penalty: config.miss_penalty,
            blocks: Vec::new(),
            insertions: 0,
        }
    }

    /// Maximum number of resident blocks.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of resident blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// True when no blocks are resident.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Whether a block for `address` is currently resident.
    pub fn contains(&self, address: u64) -> bool {
        let tag = address / self.block_bytes;
        self.blocks.iter().any(|b| b.tag == tag)
    }

    /// Resident blocks in no particular order.
    pub fn blocks(&self) -> &[CacheBlock] {
        &self.blocks
    }

    /// Looks up `address` at `cycle`.
    ///
    /// On a hit the block's last-access is refreshed. On a miss the block is
    /// installed (evicting the LRU block if the set is full) and the miss
    /// penalty is returned. A disabled cache always hits and stays empty.
    pub fn lookup(&mut self, address: u64, cycle: u64) -> CacheAccess {
        if !self.enabled {
            return CacheAccess { hit: true, penalty: 0 };
        }

        let tag = address / self.block_bytes;
        if let Some(block) = self.blocks.iter_mut().find(|b| b.tag == tag) {
            block.last_access = cycle;
            return CacheAccess { hit: true, penalty: 0 };
        }

        if self.blocks.len() == self.capacity {
            if let Some(victim) = self
                .blocks
                .iter()
                .enumerate()
                .min_by_key(|(_, b)| (b.last_access, b.inserted))
                .map(|(i, _)| i)
            {
                let _ = self.blocks.swap_remove(victim);
            }
        }

        self.blocks.push(CacheBlock { tag, last_access: cycle, inserted: self.insertions });
        self.insertions += 1;

        CacheAccess { hit: false, penalty: self.miss_penalty }
    }
}
