//! Property-based tests using proptest.
//!
//! These tests verify assembler invariants across large, randomly generated
//! input spaces — complementing the targeted unit/integration tests.

use proptest::prelude::*;
use rvasm::{assemble, assemble_strict, Assembler};

// ── Strategies ──────────────────────────────────────────────────────────

/// Generates arbitrary ASCII strings (the assembler only accepts text input).
fn arb_asm_input() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::char::range('\0', '\x7f'), 0..256)
        .prop_map(|v| v.into_iter().collect())
}

/// Generates valid RISC-V instruction strings from a curated pool.
fn valid_riscv_insn() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "nop",
        "ecall",
        "ebreak",
        "wfi",
        "add a0, a1, a2",
        "sub t0, t1, t2",
        "xor s1, s2, s3",
        "and a3, a4, a5",
        "mul a0, a1, a2",
        "divu t3, t4, t5",
        "addi sp, sp, -16",
        "andi a0, a0, 0xFF",
        "slli a1, a1, 2",
        "srai a2, a2, 31",
        "addiw a0, a0, 1",
        "sraw a0, a1, a2",
        "lw a0, 0(sp)",
        "lb t0, -1(s0)",
        "lhu a1, 6(a2)",
        "sw ra, 12(sp)",
        "sb a0, 3(t0)",
        "beq a0, x0, 8",
        "bne t0, t1, -4",
        "bltu a0, a1, 0x40",
        "lui a0, 0x10000",
        "auipc t0, 0x1000",
        "jal ra, 0",
        "jal -8",
        "jalr x0, ra, 0",
    ])
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    /// The assembler never panics, whatever the input.
    #[test]
    fn no_panic_on_arbitrary_input(input in arb_asm_input()) {
        let _ = assemble(&input);
        let _ = assemble_strict(&input);
    }

    /// A run never produces more words than the input has lines.
    #[test]
    fn word_count_bounded_by_line_count(input in arb_asm_input()) {
        if let Ok(words) = assemble(&input) {
            prop_assert!(words.len() <= input.lines().count());
        }
    }

    /// Valid instructions always encode, in both modes, to the same word.
    #[test]
    fn valid_instructions_encode(insns in prop::collection::vec(valid_riscv_insn(), 1..32)) {
        let source = insns.join("\n");
        let lenient = assemble(&source).unwrap();
        let strict = assemble_strict(&source).unwrap();
        prop_assert_eq!(lenient.len(), insns.len());
        prop_assert_eq!(lenient, strict);
    }

    /// Feeding source line by line matches feeding it all at once.
    #[test]
    fn incremental_emit_matches_batch(insns in prop::collection::vec(valid_riscv_insn(), 0..16)) {
        let source = insns.join("\n");
        let batch = assemble(&source).unwrap();

        let mut asm = Assembler::new();
        for insn in &insns {
            asm.emit(insn).unwrap();
            asm.emit("\n").unwrap();
        }
        prop_assert_eq!(asm.finish().into_words(), batch);
    }

    /// I-type immediates land in bits [31:20] for any in-range value.
    #[test]
    fn addi_immediate_field_round_trips(imm in -2048i64..=2047) {
        let words = assemble_strict(&format!("addi a0, a1, {imm}")).unwrap();
        let field = (words[0] >> 20) as i32;
        let recovered = i64::from((field << 20) >> 20); // sign-extend 12 bits
        prop_assert_eq!(recovered, imm);
    }

    /// S-type immediates survive the hi/lo field split.
    #[test]
    fn store_offset_round_trips(imm in -2048i64..=2047) {
        let words = assemble_strict(&format!("sw a0, {imm}(sp)")).unwrap();
        let w = words[0];
        let field = ((w >> 25) << 5) | ((w >> 7) & 0x1F);
        let recovered = i64::from(((field as i32) << 20) >> 20);
        prop_assert_eq!(recovered, imm);
    }

    /// B-type offsets survive the bit permutation.
    #[test]
    fn branch_offset_round_trips(halfwords in -2048i64..=2047) {
        let offset = halfwords * 2;
        let words = assemble_strict(&format!("beq a0, a1, {offset}")).unwrap();
        let w = words[0];
        let field = (((w >> 31) & 1) << 12)
            | (((w >> 7) & 1) << 11)
            | (((w >> 25) & 0x3F) << 5)
            | (((w >> 8) & 0xF) << 1);
        let recovered = i64::from(((field as i32) << 19) >> 19); // sign-extend 13 bits
        prop_assert_eq!(recovered, offset);
    }

    /// J-type offsets survive the bit permutation.
    #[test]
    fn jump_offset_round_trips(halfwords in -524288i64..=524287) {
        let offset = halfwords * 2;
        let words = assemble_strict(&format!("jal ra, {offset}")).unwrap();
        let w = words[0];
        let field = (((w >> 31) & 1) << 20)
            | (((w >> 12) & 0xFF) << 12)
            | (((w >> 20) & 1) << 11)
            | (((w >> 21) & 0x3FF) << 1);
        let recovered = i64::from(((field as i32) << 11) >> 11); // sign-extend 21 bits
        prop_assert_eq!(recovered, offset);
    }

    /// U-type constants keep their upper twenty bits in place.
    #[test]
    fn lui_upper_bits_round_trip(upper in 0u32..=0xFFFFF) {
        let value = u64::from(upper) << 12;
        let words = assemble_strict(&format!("lui a0, {value}")).unwrap();
        prop_assert_eq!(words[0] >> 12, upper);
        prop_assert_eq!(words[0] & 0x7F, 0x37);
    }

    /// Register numbers pass through unchanged in R-type fields.
    #[test]
    fn r_type_register_fields(rd in 0u32..32, rs1 in 0u32..32, rs2 in 0u32..32) {
        let words = assemble_strict(&format!("add x{rd}, x{rs1}, x{rs2}")).unwrap();
        let w = words[0];
        prop_assert_eq!((w >> 7) & 0x1F, rd);
        prop_assert_eq!((w >> 15) & 0x1F, rs1);
        prop_assert_eq!((w >> 20) & 0x1F, rs2);
    }
}
