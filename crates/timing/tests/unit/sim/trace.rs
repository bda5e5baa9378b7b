//! Trace Replay Tests.
//!
//! Reads JSON-lines traces the way the command-line replayer does and checks
//! the resulting statistics.

use std::io::Cursor;

use pretty_assertions::assert_eq;
use rvtiming_core::config::TimingConfig;
use rvtiming_core::core::CoreTiming;
use rvtiming_core::sim::trace::{Effect, Retired, TraceError, TraceReader, read_trace};
use rvtiming_core::soc::FlatMemory;

use crate::common::harness::init_tracing;

const PROGRAM: &str = r#"
# mul feeding an add, then a loop back-edge
{"pc": 4096, "reads": [1, 2], "effect": {"kind": "mul", "rd": 3, "a": 6, "b": 7}}
{"pc": 4100, "reads": [3]}
{"pc": 4104, "effect": {"kind": "store", "addr": 8192, "size": 2}}
{"pc": 4108, "effect": {"kind": "load", "rd": 4, "addr": 8192, "size": 2, "latency": 1}}
{"pc": 4112, "reads": [4], "effect": {"kind": "branch", "target": 4096, "taken": false}}
{"pc": 4116, "effect": {"kind": "call", "target": 8000}}
{"pc": 8000, "len": 2, "effect": {"kind": "ret", "target": 4120}}
"#;

#[test]
fn parses_every_effect_kind() {
    let records = read_trace(Cursor::new(PROGRAM)).unwrap();
    assert_eq!(records.len(), 7);
    assert_eq!(
        records[0].effect,
        Effect::Mul { rd: 3, a: 6, b: 7 }
    );
    assert_eq!(records[1], Retired { reads: vec![3], ..Retired::plain(4100) });
    assert_eq!(
        records[3].effect,
        Effect::Load {
            rd: 4,
            addr: 8192,
            size: 2,
            latency: 1
        }
    );
    assert_eq!(records[6].len, 2);
    assert_eq!(records[6].effect, Effect::Ret { target: 4120 });
}

#[test]
fn replayed_program_cycle_breakdown() {
    init_tracing();
    let mut config = TimingConfig::default();
    config.icache.enabled = false;
    let mut core = CoreTiming::new(&config);
    let mut mem = FlatMemory::default();
    for record in TraceReader::new(Cursor::new(PROGRAM)) {
        let _ = core.retire(&record.unwrap(), &mut mem);
    }

    let s = core.stats();
    assert_eq!(s.instructions_retired, 7);
    assert_eq!(s.stalls_data, 6 + 2);
    assert_eq!(s.stalls_store_forward, 5);
    assert_eq!(s.stalls_control, 3);
    assert_eq!((s.ras_hits, s.ras_misses), (1, 0));
    assert_eq!(s.cycles, 7 + 6 + 2 + 5 + 3);
}

#[test]
fn repeated_destination_replays_in_order() {
    let text = "{\"pc\": 0, \"effect\": {\"kind\": \"div\", \"rd\": 5}}\n\
                {\"pc\": 4, \"effect\": {\"kind\": \"csr\", \"rd\": 5}}\n\
                {\"pc\": 8, \"reads\": [5]}\n";
    let mut config = TimingConfig::default();
    config.icache.enabled = false;
    let mut core = CoreTiming::new(&config);
    core.run(&read_trace(Cursor::new(text)).unwrap(), &mut FlatMemory::default());

    let csr = config.pipeline.csr_latency;
    let s = core.stats();
    assert_eq!(s.instructions_retired, 3);
    assert_eq!(s.stalls_data, s.cycles - 3);
    assert!(s.stalls_data >= config.pipeline.div_latency_min + csr - 1);
}

#[test]
fn reader_tracks_line_numbers() {
    let mut reader = TraceReader::new(Cursor::new("\n# c\n{\"pc\": 0}\n"));
    assert!(reader.next().unwrap().is_ok());
    assert_eq!(reader.line(), 3);
    assert!(reader.next().is_none());
}

#[test]
fn unknown_effect_kind_rejected() {
    let err = read_trace(Cursor::new(r#"{"pc": 0, "effect": {"kind": "fence"}}"#)).unwrap_err();
    assert!(matches!(err, TraceError::Parse { line: 1, .. }));
}
