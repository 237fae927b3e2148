//! Structural hazards and memory disambiguation.

use crate::common::{finish, inst, reg, sim, sim_default, timeline};
use tomsim_core::Config;

// ══════════════════════════════════════════════════════════
// 1. Structural hazard: more multiplies than MULT stations
// ══════════════════════════════════════════════════════════

/// Four independent multiplies over two MULT stations: the third and fourth
/// must wait for a station to free, i.e. issue strictly after the previous
/// occupant's completion.
#[test]
fn multiplies_stall_on_station_shortage() {
    let mut config = Config::default();
    config.stations.mult = 2;
    let mut s = sim(
        "MUL.D F0, F2, F4\nMUL.D F6, F8, F10\nMUL.D F12, F14, F16\nMUL.D F18, F20, F22",
        config,
        &[],
    );
    let _ = finish(&mut s);

    let (first, second, third, fourth) =
        (timeline(&s, 0), timeline(&s, 1), timeline(&s, 2), timeline(&s, 3));

    assert_eq!((first.0, second.0), (1, 2), "the first two issue back to back");
    assert!(third.0 >= first.2 + 1, "third multiply issues after the first completes");
    assert!(fourth.0 >= second.2 + 1, "fourth multiply issues after the second completes");

    // With the default 10-cycle multiply the exact stalls are fixed: the
    // freed station is reclaimed in the write-back cycle itself.
    assert_eq!(third.0, first.3);
    assert_eq!(fourth.0, second.3);
}

// ══════════════════════════════════════════════════════════
// 2. Memory disambiguation
// ══════════════════════════════════════════════════════════

/// Load after store to the same resolved address (RAW): the load stalls at
/// issue until the store has retired, then reads the stored value.
#[test]
fn load_after_store_same_address_stalls() {
    let mut s = sim_default("S.D F0, 0(R1)\nL.D F2, 0(R1)", &[("R1", 16.0), ("F0", 3.5)]);
    let _ = finish(&mut s);

    let store = inst(&s, 0);
    let load = inst(&s, 1);
    assert_eq!(load.issue_cycle, store.write_cycle, "load issues the cycle the store retires");
    assert_eq!(s.state().memory.read(16), 3.5);
    assert_eq!(reg(&s, "F2"), 3.5, "the load observes the stored value");
}

/// Store after load to the same address (WAR): the store stalls at issue
/// until the load has retired, so the load cannot observe the new value.
#[test]
fn store_after_load_same_address_stalls() {
    let mut s = sim_default("L.D F2, 0(R1)\nS.D F4, 0(R1)", &[("R1", 16.0), ("F4", 9.0)]);
    let _ = finish(&mut s);

    let load = inst(&s, 0);
    let store = inst(&s, 1);
    assert_eq!(store.issue_cycle, load.write_cycle);
    assert_eq!(reg(&s, "F2"), 0.0, "the load read memory before the store");
    assert_eq!(s.state().memory.read(16), 9.0);
}

/// Stores to the same address are serialized (WAW): the second store waits
/// for the first and its value wins.
#[test]
fn store_after_store_same_address_stalls() {
    let mut s = sim_default("S.D F0, 0(R1)\nS.D F4, 0(R1)", &[("R1", 8.0), ("F0", 1.0), ("F4", 2.0)]);
    let _ = finish(&mut s);

    let first = inst(&s, 0);
    let second = inst(&s, 1);
    assert_eq!(second.issue_cycle, first.write_cycle);
    assert_eq!(s.state().memory.read(8), 2.0);
}

/// Different addresses never conflict: the load issues right behind the
/// store.
#[test]
fn disjoint_addresses_do_not_stall() {
    let mut s = sim_default("S.D F0, 0(R1)\nL.D F2, 8(R1)", &[("R1", 16.0)]);
    let _ = finish(&mut s);

    assert_eq!(inst(&s, 0).issue_cycle, Some(1));
    assert_eq!(inst(&s, 1).issue_cycle, Some(2));
}

/// A load whose base register has an in-flight producer stalls at issue
/// until the producer broadcasts, because the address resolves at issue.
#[test]
fn renamed_base_register_stalls_address_resolution() {
    let mut s = sim_default("DADDI R1, R0, 16\nL.D F0, 0(R1)", &[]);
    let _ = finish(&mut s);

    let daddi = inst(&s, 0);
    let load = inst(&s, 1);
    // The load cannot issue in cycle 2 (R1 still renamed, nothing on the
    // CDB); it catches the broadcast in cycle 3.
    assert_eq!(load.issue_cycle, daddi.write_cycle);
}
