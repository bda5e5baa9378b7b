//! Branch History Table Tests.
//!
//! Verifies cold predictions, convergence of a repeatedly taken branch and
//! aliasing between entries.

use rstest::rstest;
use rvtiming_core::config::{BranchConfig, PipelineConfig};
use rvtiming_core::core::PipelineTiming;
use rvtiming_core::core::units::bru::BranchPredictor;
use rvtiming_core::core::units::bru::bht::Bht;

// ══════════════════════════════════════════════════════════
// 1. Direction table
// ══════════════════════════════════════════════════════════

#[test]
fn cold_table_predicts_not_taken_everywhere() {
    let bht = Bht::new(128, 1, 2);
    assert!((0..512u64).all(|i| !bht.predict(i * 4)));
}

#[test]
fn entries_alias_modulo_size() {
    let mut bht = Bht::new(128, 1, 2);
    assert_eq!(bht.index(0x1000), bht.index(0x1000 + 128 * 4));
    bht.update(0x1000, true);
    bht.update(0x1000, true);
    assert!(bht.predict(0x1000 + 128 * 4));
    assert!(!bht.predict(0x1004));
}

#[test]
fn history_selects_counter() {
    let mut bht = Bht::new(16, 1, 2);
    let pc = 0x40;
    for i in 0..8 {
        bht.update(pc, i % 2 == 0);
    }
    assert_eq!(bht.entry(pc).history(), 0);
    assert!(!bht.predict(pc));
    bht.update(pc, true);
    assert_eq!(bht.entry(pc).history(), 1);
    assert!(bht.predict(pc));
}

// ══════════════════════════════════════════════════════════
// 2. Convergence through the predictor
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(0x2000, 0x1F00)]
#[case(0x0, 0x400)]
#[case(0x8000_1234, 0x8000_0000)]
fn loop_branch_free_from_third_taken(#[case] pc: u64, #[case] target: u64) {
    let mut bp = BranchPredictor::new(&BranchConfig::default());
    let mut t = PipelineTiming::new(&PipelineConfig::default(), 0);

    let penalties: Vec<u64> = (0..6)
        .map(|_| {
            let before = t.total_cycles();
            let _ = bp.update_branch_prediction(&mut t, pc, target, true);
            t.total_cycles() - before
        })
        .collect();
    assert_eq!(penalties, vec![3, 3, 0, 0, 0, 0]);
    assert_eq!(t.stats().branch_lookups, 6);
    assert_eq!(t.stats().branch_mispredictions, 2);
}

#[test]
fn loop_exit_costs_one_penalty() {
    let mut bp = BranchPredictor::new(&BranchConfig::default());
    let mut t = PipelineTiming::new(&PipelineConfig::default(), 0);
    for _ in 0..4 {
        let _ = bp.update_branch_prediction(&mut t, 0x100, 0xF0, true);
    }
    let before = t.total_cycles();
    assert!(bp.update_branch_prediction(&mut t, 0x100, 0x104, false));
    assert_eq!(t.total_cycles() - before, 3);
}
