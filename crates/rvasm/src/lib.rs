//! # rvasm — Pure Rust RISC-V Runtime Assembler
//!
//! `rvasm` turns line-oriented RISC-V assembly text into 32-bit
//! instruction words. It covers the RV32I/RV64I base integer set, the M
//! (multiply/divide) extension, and a handful of privileged system
//! instructions.
//!
//! ## Quick Start
//!
//! ```rust
//! use rvasm::assemble;
//!
//! let words = assemble("add a0, a1, a2").unwrap();
//! assert_eq!(words, vec![0x00C58533]);
//! ```
//!
//! ## Features
//!
//! - **Pure Rust** — no binutils, no system assembler at runtime.
//! - **One word per line** — each instruction line encodes independently;
//!   there is no label resolution or address tracking.
//! - **Lenient by default** — unknown mnemonics drop, unknown registers
//!   resolve to `x0`, out-of-range immediates truncate. [`Strictness::Strict`]
//!   turns each of these into a spanned diagnostic instead.
//! - **`no_std` + `alloc`** — embeddable in firmware, kernels, WASM.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
// ── Pedantic lint policy ─────────────────────────────────────────────────
// An assembler intentionally performs many narrowing / sign-changing casts
// between integer widths (i64→u32 etc.) and uses dense hex literals without
// separators (0xFF010113).  The lints below are expected and acceptable in
// this context.
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::unreadable_literal,
    clippy::match_same_arms,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc
)]

extern crate alloc;

/// Public assembler API — builder pattern, one-shot assembly, and `AssemblyResult`.
pub mod assembler;
/// Error types and source-span diagnostics.
pub mod error;
/// Intermediate representation: registers, operands, instructions.
pub mod ir;
/// Zero-copy lexer (tokenizer) with span tracking.
pub mod lexer;
/// Line parser producing IR instructions.
pub mod parser;
/// RISC-V instruction formats and the mnemonic dispatch table.
pub mod riscv;

// Re-exports
pub use assembler::{Assembler, AssemblyResult};
pub use error::{AsmError, Span};
pub use ir::{Instruction, Operand, Register, Strictness};
pub use riscv::encode_instruction;

use alloc::vec::Vec;

/// Assemble a string of RISC-V assembly into instruction words.
///
/// Newlines separate instructions; `#` starts a comment. Lines that
/// encode nothing (blanks, comments, unknown mnemonics) are skipped.
///
/// # Errors
///
/// Returns [`AsmError`] for malformed numeric literals and missing
/// operands; everything else is tolerated. Use [`assemble_strict`] for
/// full diagnostics.
///
/// # Examples
///
/// ```rust
/// use rvasm::assemble;
///
/// let words = assemble("lui a0, 0x10000\naddi a0, a0, 42").unwrap();
/// assert_eq!(words, vec![0x00010537, 0x02A50513]);
/// ```
pub fn assemble(source: &str) -> Result<Vec<u32>, AsmError> {
    let mut asm = Assembler::new();
    asm.emit(source)?;
    Ok(asm.finish().into_words())
}

/// Assemble with every tolerance turned into a diagnostic.
///
/// # Errors
///
/// Returns [`AsmError`] for unknown mnemonics, unknown registers,
/// out-of-range immediates, and syntax that lenient mode would silently
/// drop, in addition to the failures [`assemble`] reports.
///
/// # Examples
///
/// ```rust
/// use rvasm::{assemble_strict, AsmError};
///
/// let err = assemble_strict("addi a0, a0, 4096").unwrap_err();
/// assert!(matches!(err, AsmError::ImmediateOverflow { .. }));
/// ```
pub fn assemble_strict(source: &str) -> Result<Vec<u32>, AsmError> {
    let mut asm = Assembler::new().strictness(Strictness::Strict);
    asm.emit(source)?;
    Ok(asm.finish().into_words())
}
