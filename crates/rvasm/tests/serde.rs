//! Serde round-trip tests for `rvasm` public types.
//!
//! Validates that the error and result types serialize to JSON and
//! deserialize back to identical values.

#![cfg(feature = "serde")]

use rvasm::{AsmError, Assembler, Register, Span, Strictness};

/// Helper: serialize to JSON, deserialize back, assert equality.
fn round_trip<T>(val: &T)
where
    T: serde::Serialize + serde::de::DeserializeOwned + PartialEq + core::fmt::Debug,
{
    let json = serde_json::to_string(val).expect("serialize");
    let back: T = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(val, &back, "round-trip mismatch for JSON: {json}");
}

// ─── Span ───────────────────────────────────────────────────────────────────

#[test]
fn serde_span() {
    round_trip(&Span::new(1, 5, 10, 3));
    round_trip(&Span::default());
}

// ─── Register ───────────────────────────────────────────────────────────────

#[test]
fn serde_register() {
    for n in 0..32u8 {
        let reg = Register::from_name(&format!("x{n}")).unwrap();
        round_trip(&reg);
    }
}

// ─── Strictness ─────────────────────────────────────────────────────────────

#[test]
fn serde_strictness() {
    round_trip(&Strictness::Lenient);
    round_trip(&Strictness::Strict);
}

// ─── AsmError ───────────────────────────────────────────────────────────────

#[test]
fn serde_asm_error() {
    let span = Span::new(2, 14, 20, 5);
    round_trip(&AsmError::UnknownMnemonic {
        mnemonic: "frobnicate".into(),
        span,
    });
    round_trip(&AsmError::UnknownRegister {
        name: "q7".into(),
        span,
    });
    round_trip(&AsmError::MalformedImmediate {
        token: "12ab3".into(),
        span,
    });
    round_trip(&AsmError::ImmediateOverflow {
        value: 4096,
        min: -2048,
        max: 2047,
        span,
    });
    round_trip(&AsmError::InvalidOperands {
        detail: "expected register".into(),
        span,
    });
    round_trip(&AsmError::Syntax {
        msg: "expected mnemonic".into(),
        span,
    });
}

#[test]
fn serde_live_error() {
    let err = rvasm::assemble_strict("addi a0, a1, 4096").unwrap_err();
    round_trip(&err);
}

// ─── AssemblyResult ─────────────────────────────────────────────────────────

#[test]
fn serde_assembly_result() {
    let mut asm = Assembler::new();
    asm.emit("add a0, a1, a2\necall\n").unwrap();
    round_trip(&asm.finish());
}
