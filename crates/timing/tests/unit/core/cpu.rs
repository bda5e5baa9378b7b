//! Whole-Core Retirement Tests.
//!
//! Drives `CoreTiming` through short instruction sequences and checks the
//! cycles each instruction is charged, the way a functional simulator
//! would report them.

use pretty_assertions::assert_eq;
use rvtiming_core::config::TimingConfig;
use rvtiming_core::sim::trace::{Effect, Retired};

use crate::common::harness::{RAM_BASE, TestContext, insn, reader};

// ══════════════════════════════════════════════════════════
// 1. Data hazards
// ══════════════════════════════════════════════════════════

#[test]
fn mul_result_consumer_waits_six_cycles() {
    let mut ctx = TestContext::new();
    let pc = RAM_BASE;
    assert_eq!(
        ctx.retire(&insn(pc, &[1, 2], Effect::Mul { rd: 3, a: 6, b: 7 })),
        1
    );
    assert_eq!(ctx.stalls(&reader(pc + 4, &[3, 1])), 6);
    assert_eq!(ctx.stalls(&reader(pc + 8, &[5])), 0);
    assert_eq!(ctx.cycles(), 9);
    assert_eq!(ctx.core.stats().stalls_data, 6);
}

#[test]
fn independent_work_hides_mul_latency() {
    let mut ctx = TestContext::new();
    let pc = RAM_BASE;
    let _ = ctx.retire(&insn(pc, &[], Effect::Mul { rd: 3, a: 1, b: 1 }));
    for i in 1..=4 {
        assert_eq!(ctx.stalls(&reader(pc + 4 * i, &[5])), 0);
    }
    assert_eq!(ctx.stalls(&reader(pc + 20, &[3])), 2);
}

#[test]
fn csr_read_consumer_waits_four_cycles() {
    let mut ctx = TestContext::new();
    let _ = ctx.retire(&insn(RAM_BASE, &[], Effect::Csr { rd: 10 }));
    assert_eq!(ctx.stalls(&reader(RAM_BASE + 4, &[10])), 4);
}

#[test]
fn back_to_back_muls_share_the_unit() {
    let mut ctx = TestContext::new();
    let _ = ctx.retire(&insn(RAM_BASE, &[], Effect::Mul { rd: 3, a: 1, b: 1 }));
    assert_eq!(
        ctx.stalls(&insn(RAM_BASE + 4, &[], Effect::Mul { rd: 4, a: 1, b: 1 })),
        5
    );
    assert_eq!(ctx.core.stats().stalls_structural, 5);
}

#[test]
fn back_to_back_muls_to_same_register_serialize() {
    let mut ctx = TestContext::new();
    let mul = |pc| insn(pc, &[1, 2], Effect::Mul { rd: 3, a: 6, b: 7 });
    let _ = ctx.retire(&mul(RAM_BASE));
    assert_eq!(ctx.stalls(&mul(RAM_BASE + 4)), 6);
    assert_eq!(ctx.core.pipeline.pending_latency(3), Some(6));
    assert_eq!(ctx.stalls(&reader(RAM_BASE + 8, &[3])), 6);
    assert_eq!(ctx.core.stats().stalls_data, 12);
    assert_eq!(ctx.core.stats().stalls_structural, 0);
}

#[test]
fn back_to_back_loads_to_same_register_serialize() {
    let mut ctx = TestContext::new();
    let load = |pc| {
        insn(
            pc,
            &[2],
            Effect::Load {
                rd: 6,
                addr: 0x2000_8000,
                size: 4,
                latency: 3,
            },
        )
    };
    let _ = ctx.retire(&load(RAM_BASE));
    assert_eq!(ctx.stalls(&load(RAM_BASE + 4)), 2);
    assert_eq!(ctx.core.pipeline.pending_latency(6), Some(2));
}

#[test]
fn csr_after_pending_mul_waits_for_product() {
    let mut ctx = TestContext::new();
    let _ = ctx.retire(&insn(RAM_BASE, &[], Effect::Mul { rd: 3, a: 1, b: 1 }));
    assert_eq!(ctx.stalls(&insn(RAM_BASE + 4, &[], Effect::Csr { rd: 3 })), 6);
}

// ══════════════════════════════════════════════════════════
// 2. Memory
// ══════════════════════════════════════════════════════════

#[test]
fn subword_load_after_store() {
    let mut ctx = TestContext::new();
    let store = insn(
        RAM_BASE,
        &[2],
        Effect::Store {
            addr: 0x2000_8000,
            size: 4,
            cycles: 1,
        },
    );
    let load = insn(
        RAM_BASE + 4,
        &[2],
        Effect::Load {
            rd: 6,
            addr: 0x2000_8001,
            size: 1,
            latency: 1,
        },
    );
    let _ = ctx.retire(&store);
    assert_eq!(ctx.stalls(&load), 5);
    assert_eq!(ctx.stalls(&reader(RAM_BASE + 8, &[6])), 2);
}

// ══════════════════════════════════════════════════════════
// 3. Control flow
// ══════════════════════════════════════════════════════════

#[test]
fn call_and_return_through_driver() {
    let mut ctx = TestContext::new();
    let call = insn(RAM_BASE, &[], Effect::Call { target: RAM_BASE + 0x100 });
    let ret = insn(RAM_BASE + 0x100, &[1], Effect::Ret { target: RAM_BASE + 4 });

    assert_eq!(ctx.stalls(&call), 3, "cold BTB");
    assert_eq!(ctx.stalls(&ret), 0, "RAS holds the fall-through");
    assert_eq!(ctx.stalls(&call), 0, "BTB warmed");
    assert_eq!(ctx.stalls(&ret), 0);
}

#[test]
fn compressed_call_pushes_two_byte_fall_through() {
    let mut ctx = TestContext::new();
    let call = Retired {
        len: 2,
        ..insn(RAM_BASE, &[], Effect::Call { target: RAM_BASE + 0x40 })
    };
    let _ = ctx.retire(&call);
    assert_eq!(ctx.core.predictor.ras().top(), Some(RAM_BASE + 2));
}

#[test]
fn counted_loop_converges() {
    let mut ctx = TestContext::new();
    let body = reader(RAM_BASE + 0x10, &[]);
    let branch = insn(
        RAM_BASE + 0x14,
        &[5],
        Effect::Branch {
            target: RAM_BASE + 0x10,
            taken: true,
        },
    );
    let stalls: Vec<u64> = (0..5)
        .map(|_| {
            let _ = ctx.retire(&body);
            ctx.stalls(&branch)
        })
        .collect();
    assert_eq!(stalls, vec![3, 3, 0, 0, 0]);
}

// ══════════════════════════════════════════════════════════
// 4. Fetch and reproducibility
// ══════════════════════════════════════════════════════════

#[test]
fn retire_returns_fetched_word() {
    let mut ctx = TestContext::new();
    ctx.mem.write_u32(RAM_BASE, 0x0010_0093);
    assert_eq!(ctx.core.retire(&Retired::plain(RAM_BASE), &mut ctx.mem), 0x0010_0093);
}

#[test]
fn straight_line_code_misses_once_per_line() {
    let mut ctx = TestContext::with_config(&TimingConfig::default());
    for i in 0..16 {
        let _ = ctx.retire(&Retired::plain(RAM_BASE + 4 * i));
    }
    let s = ctx.core.stats();
    assert_eq!(s.icache_misses, 4);
    assert_eq!(s.icache_hits, 12);
    assert_eq!(s.cycles, 16 + s.stalls_fetch);
}

fn mixed_program() -> Vec<Retired> {
    let mut prog = Vec::new();
    for i in 0..50u64 {
        let pc = RAM_BASE + (i % 10) * 0x1000;
        prog.push(insn(pc, &[], Effect::Div { rd: 1, a: i, b: 3 }));
        prog.push(reader(pc + 4, &[1]));
        prog.push(insn(
            pc + 8,
            &[1],
            Effect::Branch {
                target: pc,
                taken: i % 3 == 0,
            },
        ));
    }
    prog
}

#[test]
fn fixed_seed_reproduces_cycle_count() {
    let mut config = TimingConfig::default();
    config.seed = 2024;
    let run = || {
        let mut ctx = TestContext::with_config(&config);
        ctx.core.run(&mixed_program(), &mut ctx.mem);
        ctx.core.stats().clone()
    };
    let first = run();
    assert_eq!(first, run());
    assert_eq!(first.instructions_retired, 150);
    assert_eq!(first.cycles, first.instructions_retired + first.total_stalls());
}
