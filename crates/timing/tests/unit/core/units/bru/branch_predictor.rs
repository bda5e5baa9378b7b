//! Branch Predictor Tests.
//!
//! Verifies penalties charged for jumps, calls and returns, BTB aliasing and
//! the statistics recorded along the way.

use rvtiming_core::config::{BranchConfig, PipelineConfig};
use rvtiming_core::core::PipelineTiming;
use rvtiming_core::core::units::bru::BranchPredictor;
use rvtiming_core::core::units::bru::btb::Btb;

fn setup() -> (BranchPredictor, PipelineTiming) {
    (
        BranchPredictor::new(&BranchConfig::default()),
        PipelineTiming::new(&PipelineConfig::default(), 0),
    )
}

// ══════════════════════════════════════════════════════════
// 1. BTB
// ══════════════════════════════════════════════════════════

#[test]
fn btb_aliases_every_forty_words() {
    let mut btb = Btb::new(40);
    btb.update(0x100, 0x900);
    assert_eq!(btb.lookup(0x100 + 40 * 4), 0x900);
    assert_eq!(btb.lookup(0x104), 0);
}

#[test]
fn aliasing_jumps_evict_each_other() {
    let (mut bp, mut t) = setup();
    let a = 0x1000;
    let b = a + 40 * 4;
    assert!(bp.do_jump(&mut t, a, 0x2000, a + 4));
    assert!(bp.do_jump(&mut t, b, 0x3000, b + 4));
    assert!(bp.do_jump(&mut t, a, 0x2000, a + 4));
    assert_eq!(t.stats().jump_mispredictions, 3);
    assert_eq!(t.total_cycles(), 9);
}

// ══════════════════════════════════════════════════════════
// 2. Returns
// ══════════════════════════════════════════════════════════

#[test]
fn return_with_empty_ras_charges_jump_penalty() {
    let (mut bp, mut t) = setup();
    assert!(bp.do_ret(&mut t, 0x500, 0x104, 0x504));
    assert_eq!(t.total_cycles(), 3);
    assert_eq!(t.stats().stalls_control, 3);
    assert_eq!(t.stats().ras_misses, 1);
    assert_eq!(bp.btb().lookup(0x500), 0x104);
}

#[test]
fn return_to_unexpected_address_charges_penalty() {
    let (mut bp, mut t) = setup();
    let _ = bp.do_call(&mut t, 0x100, 0x800, 0x104);
    let before = t.total_cycles();
    assert!(bp.do_ret(&mut t, 0x810, 0x200, 0x814));
    assert_eq!(t.total_cycles() - before, 3);
    assert!(bp.ras().is_empty(), "a mismatched return still consumes the entry");
}

#[test]
fn return_ignores_btb_even_when_it_matches() {
    let (mut bp, mut t) = setup();
    assert!(bp.do_ret(&mut t, 0x500, 0x104, 0x504));
    assert!(
        bp.do_ret(&mut t, 0x500, 0x104, 0x504),
        "returns are predicted from the RAS alone"
    );
    assert_eq!(t.total_cycles(), 6);
}

#[test]
fn nested_calls_beyond_depth_lose_outer_return() {
    let (mut bp, mut t) = setup();
    let _ = bp.do_call(&mut t, 0x100, 0x1000, 0x104);
    let _ = bp.do_call(&mut t, 0x1000, 0x2000, 0x1004);
    let _ = bp.do_call(&mut t, 0x2000, 0x3000, 0x2004);
    let before = t.total_cycles();
    assert!(!bp.do_ret(&mut t, 0x3010, 0x2004, 0x3014));
    assert!(!bp.do_ret(&mut t, 0x2010, 0x1004, 0x2014));
    assert_eq!(t.total_cycles(), before);
    assert!(bp.do_ret(&mut t, 0x1010, 0x104, 0x1014));
    assert_eq!(t.total_cycles() - before, 3);
    assert_eq!((t.stats().ras_hits, t.stats().ras_misses), (2, 1));
}

// ══════════════════════════════════════════════════════════
// 3. Calls
// ══════════════════════════════════════════════════════════

#[test]
fn repeated_call_site_hits_btb() {
    let (mut bp, mut t) = setup();
    assert!(bp.do_call(&mut t, 0x100, 0x800, 0x104));
    let _ = bp.do_ret(&mut t, 0x810, 0x104, 0x814);
    assert!(!bp.do_call(&mut t, 0x100, 0x800, 0x104));
    assert_eq!(t.total_cycles(), 3);
    assert_eq!(bp.ras().top(), Some(0x104));
}
