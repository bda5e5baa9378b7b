//! Statistics Tests.
//!
//! Verifies stall attribution by cause, derived ratios, section filtering of
//! the text report and the JSON encoding.

use pretty_assertions::assert_eq;
use rstest::rstest;
use rvtiming_core::stats::{STATS_SECTIONS, StallCause, TimingStats};

fn sample() -> TimingStats {
    let mut s = TimingStats {
        cycles: 40,
        instructions_retired: 20,
        branch_lookups: 10,
        branch_mispredictions: 1,
        icache_hits: 15,
        icache_misses: 5,
        ..TimingStats::default()
    };
    s.record_stall(StallCause::Data, 6);
    s.record_stall(StallCause::Structural, 4);
    s.record_stall(StallCause::StoreForward, 5);
    s.record_stall(StallCause::Fetch, 5);
    s
}

#[test]
fn ratios() {
    let s = sample();
    assert!((s.cpi() - 2.0).abs() < 1e-9);
    assert!((s.ipc() - 0.5).abs() < 1e-9);
    assert_eq!(s.total_stalls(), 20);
}

#[rstest]
#[case("summary", "sim_insts", "STALL BREAKDOWN")]
#[case("stalls", "stalls.store_forward", "sim_insts")]
#[case("branch", "bp.accuracy            90.00%", "INSTRUCTION CACHE")]
#[case("icache", "miss_rate: 25.00%", "BRANCH PREDICTION")]
fn single_section(#[case] section: &str, #[case] present: &str, #[case] absent: &str) {
    let text = sample().render_sections(&[section.to_string()]);
    assert!(text.contains(present), "missing {present:?} in:\n{text}");
    assert!(!text.contains(absent), "unexpected {absent:?} in:\n{text}");
}

#[test]
fn empty_selection_renders_everything() {
    let all: Vec<String> = STATS_SECTIONS.iter().map(ToString::to_string).collect();
    assert_eq!(sample().render_sections(&[]), sample().render_sections(&all));
}

#[test]
fn json_field_names() {
    let v = serde_json::to_value(sample()).unwrap();
    assert_eq!(v["cycles"], 40);
    assert_eq!(v["stalls_store_forward"], 5);
    assert_eq!(v["icache_misses"], 5);
}

#[test]
fn stall_cause_serializes_snake_case() {
    assert_eq!(
        serde_json::to_string(&StallCause::StoreForward).unwrap(),
        "\"store_forward\""
    );
}
