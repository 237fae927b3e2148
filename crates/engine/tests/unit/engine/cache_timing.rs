//! Cache-driven load timing.

use crate::common::{finish, sim, sim_default, timeline};
use tomsim_core::config::CacheConfig;
use tomsim_core::machine::EventKind;
use tomsim_core::Config;

fn two_block_config() -> Config {
    Config {
        cache: CacheConfig { enabled: true, block_bytes: 4, size_bytes: 8, miss_penalty: 10 },
        ..Config::default()
    }
}

/// Three loads at 0, 4, 8 through a two-block cache: all three miss, and
/// the third evicts the block with the oldest last-access.
#[test]
fn three_loads_evict_the_oldest_block() {
    let mut s = sim("L.D F0, 0(R0)\nL.D F2, 4(R0)\nL.D F4, 8(R0)", two_block_config(), &[]);
    let _ = finish(&mut s);

    assert_eq!(s.state().log.count_where(|k| matches!(k, EventKind::CacheMiss { .. })), 3);

    // Each miss stretches execution to 2 + 10 cycles.
    for index in 0..3 {
        let (_, start, end, _) = timeline(&s, index);
        assert_eq!(end - start + 1, 12, "load {index}");
    }

    let cache = &s.state().cache;
    assert_eq!(cache.len(), 2);
    assert!(!cache.contains(0), "tag 0 was the LRU victim");
    assert!(cache.contains(4));
    assert!(cache.contains(8));

    let mut tags: Vec<u64> = cache.blocks().iter().map(|b| b.tag).collect();
    tags.sort_unstable();
    assert_eq!(tags, [1, 2]);
}

/// A warm second load to the same block hits and runs at the base latency.
#[test]
fn warm_load_runs_at_base_latency() {
    let mut s = sim("L.D F0, 0(R0)\nL.D F2, 0(R0)", two_block_config(), &[]);
    let _ = finish(&mut s);

    let (_, start0, end0, _) = timeline(&s, 0);
    let (_, start1, end1, _) = timeline(&s, 1);
    assert_eq!(end0 - start0 + 1, 12, "cold miss");
    assert_eq!(end1 - start1 + 1, 2, "warm hit");
    assert_eq!(s.state().log.count_where(|k| matches!(k, EventKind::CacheMiss { .. })), 1);
}

/// With the cache disabled, loads never miss and no blocks ever appear.
#[test]
fn disabled_cache_never_misses() {
    let config = Config {
        cache: CacheConfig { enabled: false, ..CacheConfig::default() },
        ..Config::default()
    };
    let mut s = sim("L.D F0, 0(R0)\nL.D F2, 4(R0)\nL.D F4, 8(R0)", config, &[]);
    let _ = finish(&mut s);

    assert_eq!(s.state().log.count_where(|k| matches!(k, EventKind::CacheMiss { .. })), 0);
    assert!(s.state().cache.is_empty());
    for index in 0..3 {
        let (_, start, end, _) = timeline(&s, index);
        assert_eq!(end - start + 1, 2, "load {index} at base latency");
    }
}

/// Stores do not consult the cache; a store between two loads of the same
/// block leaves the hit/miss pattern untouched.
#[test]
fn stores_bypass_the_cache() {
    let mut s = sim_default("S.D F0, 32(R0)\nL.D F2, 32(R0)", &[]);
    let _ = finish(&mut s);

    // Only the load's access appears: one compulsory miss.
    assert_eq!(s.state().log.count_where(|k| matches!(k, EventKind::CacheMiss { .. })), 1);
    assert_eq!(s.state().cache.len(), 1);
}
