//! The `Simulator` facade: seeding, snapshots, statistics, run outcomes.

use crate::common::{finish, run_checked, sim_default};
use tomsim_core::{Config, EngineError, RunOutcome, SimError, Simulator};

// ══════════════════════════════════════════════════════════
// 1. Construction and register seeding
// ══════════════════════════════════════════════════════════

#[test]
fn parse_failure_surfaces_without_a_state() {
    let err = Simulator::new("FROB R1, R2, R3", Config::default(), &[]);
    assert!(matches!(err, Err(SimError::Parse(_))));
}

#[test]
fn unknown_seed_register_is_rejected() {
    let err = Simulator::new("DADD R1, R2, R3", Config::default(), &[("Q7", 1.0)]);
    assert!(matches!(err, Err(SimError::Engine(EngineError::UnknownRegister { .. }))));
}

/// Register seeding is a cycle-0-only operation.
#[test]
fn seeding_is_locked_after_the_first_step() {
    let mut s = sim_default("DADD R1, R2, R3", &[]);
    s.set_register_value("R2", 4.0).unwrap();

    s.step().unwrap();
    assert!(matches!(
        s.set_register_value("R2", 5.0),
        Err(EngineError::WriteAfterStart { cycle: 1 })
    ));

    let _ = finish(&mut s);
    assert_eq!(s.state().registers.get_named("R1").unwrap().value, 4.0);
}

// ══════════════════════════════════════════════════════════
// 2. Bounded runs
// ══════════════════════════════════════════════════════════

#[test]
fn cycle_cap_stops_an_unfinished_run() {
    let mut s = sim_default("DIV.D F0, F2, F4", &[("F4", 2.0)]);
    let outcome = s.run(5).unwrap();
    assert_eq!(outcome, RunOutcome::CycleLimit { cycles: 5 });
    assert!(!s.state().finished);

    // Resuming past the cap drains normally.
    let outcome = s.run(100).unwrap();
    assert!(matches!(outcome, RunOutcome::Finished { .. }));
}

// ══════════════════════════════════════════════════════════
// 3. Snapshot and statistics
// ══════════════════════════════════════════════════════════

/// The JSON snapshot speaks the UI vocabulary: camelCase timestamps and
/// flags.
#[test]
fn snapshot_uses_camel_case_field_names() {
    let mut s = sim_default("DADD R1, R2, R3", &[]);
    let _ = finish(&mut s);
    let json = s.snapshot().unwrap();

    for key in ["\"issueCycle\"", "\"execStartCycle\"", "\"writeCycle\"", "\"pcAddress\"", "\"branchStall\""] {
        assert!(json.contains(key), "snapshot missing {key}");
    }
}

#[test]
fn stats_summarize_the_run() {
    let mut s = sim_default("DADDI R1, R0, 1\nS.D F0, 0(R2)", &[]);
    let outcome = run_checked(&mut s, 1_000);
    assert!(matches!(outcome, RunOutcome::Finished { .. }));

    let stats = s.stats();
    assert_eq!(stats.instructions, 2);
    assert_eq!(stats.retired, 2);
    assert_eq!(stats.int_alu, 1);
    assert_eq!(stats.stores, 1);
    assert_eq!(stats.cdb_broadcasts, 1, "only the DADDI rides the CDB");
    assert_eq!(stats.cache_misses, 0, "stores do not consult the cache");
    assert!(stats.mean_issue_to_write.is_some());

    let report = stats.report();
    assert!(report.contains("Instructions"));
}
