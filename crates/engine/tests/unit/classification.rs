//! Mnemonic classification tables.
//!
//! Every opcode the assembly surface recognizes must land in the right
//! operation class, functional-unit class, and latency row.

use rstest::rstest;
use tomsim_core::config::LatencyConfig;
use tomsim_core::isa::{self, OpClass, UnitClass};

#[rstest]
#[case("L.D", OpClass::Load, UnitClass::Load)]
#[case("LW", OpClass::Load, UnitClass::Load)]
#[case("LD", OpClass::Load, UnitClass::Load)]
#[case("L.S", OpClass::Load, UnitClass::Load)]
#[case("S.D", OpClass::Store, UnitClass::Store)]
#[case("SW", OpClass::Store, UnitClass::Store)]
#[case("SD", OpClass::Store, UnitClass::Store)]
#[case("S.S", OpClass::Store, UnitClass::Store)]
#[case("ADD.D", OpClass::FpAdd, UnitClass::Add)]
#[case("ADD.S", OpClass::FpAdd, UnitClass::Add)]
#[case("SUB.D", OpClass::FpSub, UnitClass::Add)]
#[case("SUB.S", OpClass::FpSub, UnitClass::Add)]
#[case("MUL", OpClass::FpMult, UnitClass::Mult)]
#[case("MUL.D", OpClass::FpMult, UnitClass::Mult)]
#[case("MUL.S", OpClass::FpMult, UnitClass::Mult)]
#[case("DIV", OpClass::FpDiv, UnitClass::Mult)]
#[case("DIV.D", OpClass::FpDiv, UnitClass::Mult)]
#[case("DIV.S", OpClass::FpDiv, UnitClass::Mult)]
#[case("ADD", OpClass::IntAlu, UnitClass::Integer)]
#[case("ADDI", OpClass::IntAlu, UnitClass::Integer)]
#[case("DADD", OpClass::IntAlu, UnitClass::Integer)]
#[case("DADDI", OpClass::IntAlu, UnitClass::Integer)]
#[case("SUB", OpClass::IntAlu, UnitClass::Integer)]
#[case("SUBI", OpClass::IntAlu, UnitClass::Integer)]
#[case("DSUB", OpClass::IntAlu, UnitClass::Integer)]
#[case("DSUBI", OpClass::IntAlu, UnitClass::Integer)]
#[case("BNE", OpClass::Branch, UnitClass::Integer)]
#[case("BEQ", OpClass::Branch, UnitClass::Integer)]
#[case("BNEZ", OpClass::Branch, UnitClass::Integer)]
#[case("BEQZ", OpClass::Branch, UnitClass::Integer)]
fn classification(#[case] mnemonic: &str, #[case] class: OpClass, #[case] unit: UnitClass) {
    let desc = isa::lookup(mnemonic).unwrap_or_else(|| panic!("{mnemonic} not in the table"));
    assert_eq!(desc.class, class);
    assert_eq!(desc.class.unit(), unit);
}

#[rstest]
#[case(OpClass::Load, 2)]
#[case(OpClass::Store, 2)]
#[case(OpClass::FpAdd, 2)]
#[case(OpClass::FpSub, 2)]
#[case(OpClass::FpMult, 10)]
#[case(OpClass::FpDiv, 40)]
#[case(OpClass::IntAlu, 1)]
#[case(OpClass::Branch, 1)]
fn default_latencies(#[case] class: OpClass, #[case] cycles: u64) {
    assert_eq!(LatencyConfig::default().for_class(class), cycles);
}
