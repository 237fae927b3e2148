//! The classic Tomasulo textbook program, end to end.
//!
//! Seven FP instructions with RAW chains through F2, F6, F0, and F8, a
//! store that must disambiguate against an in-flight load at the same
//! address, and two compulsory cache misses. With the default machine the
//! whole timing table is fixed, so it is asserted exactly.

use crate::common::{finish, inst, sim_default, timeline};
use tomsim_core::machine::EventKind;

const PROGRAM: &str = "\
L.D  F6, 0(R2)
L.D  F2, 8(R2)
MUL.D F0, F2, F4
SUB.D F8, F2, F6
DIV.D F10, F0, F6
ADD.D F6, F8, F2
S.D  F6, 8(R2)
";

fn run() -> tomsim_core::Simulator {
    let mut sim = sim_default(PROGRAM, &[("F2", 1.33), ("F4", 0.0), ("F6", 0.0)]);
    let _ = finish(&mut sim);
    sim
}

// ══════════════════════════════════════════════════════════
// 1. The exact timing table
// ══════════════════════════════════════════════════════════

#[test]
fn timing_table_matches_hand_simulation() {
    let sim = run();

    // (issue, exec start, exec end, write) per instruction. Loads miss cold
    // (latency 2+10); the store waits out the load at address 8, then its
    // data register's producer.
    let expected = [
        (1, 2, 13, 14),  // L.D  F6, 0(R2)
        (2, 3, 14, 15),  // L.D  F2, 8(R2)
        (3, 15, 24, 25), // MUL.D F0, F2, F4
        (4, 15, 16, 17), // SUB.D F8, F2, F6
        (5, 25, 64, 65), // DIV.D F10, F0, F6
        (6, 17, 18, 19), // ADD.D F6, F8, F2
        (15, 19, 20, 20), // S.D  F6, 8(R2)
    ];
    for (index, want) in expected.iter().enumerate() {
        assert_eq!(timeline(&sim, index), *want, "instruction {index}");
    }
    assert_eq!(sim.state().cycle, 65);
    assert!(sim.state().finished);
}

// ══════════════════════════════════════════════════════════
// 2. The dependence relations the table encodes
// ══════════════════════════════════════════════════════════

/// MUL.D reads F2: it must not begin executing until the load into F2 has
/// written back.
#[test]
fn mul_waits_for_second_load() {
    let sim = run();
    let load_f2 = inst(&sim, 1);
    let mul = inst(&sim, 2);
    assert!(mul.exec_start_cycle >= load_f2.write_cycle);
}

/// DIV.D reads F0 (from MUL.D) and F6 (from the first load): both producers
/// must have written back first.
#[test]
fn div_waits_for_mul_and_first_load() {
    let sim = run();
    let load_f6 = inst(&sim, 0);
    let mul = inst(&sim, 2);
    let div = inst(&sim, 4);
    assert!(div.exec_start_cycle >= mul.write_cycle);
    assert!(div.exec_start_cycle >= load_f6.write_cycle);
}

/// The store's write cycle is its execute-end cycle, and it never rides
/// the CDB.
#[test]
fn store_retires_at_execute_end() {
    let sim = run();
    let store = inst(&sim, 6);
    assert_eq!(store.write_cycle, store.exec_end_cycle);
}

// ══════════════════════════════════════════════════════════
// 3. Side effects
// ══════════════════════════════════════════════════════════

#[test]
fn store_lands_the_adder_result_in_memory() {
    let sim = run();
    // ADD.D F6 = F8 + F2, all zeros here since memory starts zeroed.
    assert_eq!(sim.state().memory.read(8), 0.0);
    assert_eq!(
        sim.state().log.count_where(|k| matches!(k, EventKind::CacheMiss { .. })),
        2,
        "both loads miss cold"
    );
}
