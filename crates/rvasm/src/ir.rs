//! Intermediate representation: registers, operands, instructions.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::error::Span;

/// A RISC-V integer register, `x0` through `x31`.
///
/// Construction goes through [`Register::from_name`], which accepts both the
/// hardware names and the standard ABI aliases. The discriminant is the
/// 5-bit register number, so [`Register::number`] is a plain cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Register {
    X0 = 0,
    X1,
    X2,
    X3,
    X4,
    X5,
    X6,
    X7,
    X8,
    X9,
    X10,
    X11,
    X12,
    X13,
    X14,
    X15,
    X16,
    X17,
    X18,
    X19,
    X20,
    X21,
    X22,
    X23,
    X24,
    X25,
    X26,
    X27,
    X28,
    X29,
    X30,
    X31,
}

impl Register {
    /// Resolve a register name, case-insensitively.
    ///
    /// Accepts the hardware names `x0`–`x31` and the ABI aliases. `s0` and
    /// `fp` both resolve to x8. Returns `None` for anything else; the
    /// lenient-mode fallback to x0 happens at encode time, not here.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        use Register::*;
        // Register names are at most 4 bytes ("zero"); lowercase into a
        // stack buffer to keep resolution allocation-free.
        let bytes = name.as_bytes();
        if bytes.len() > 4 {
            return None;
        }
        let mut buf = [0u8; 4];
        for (dst, &b) in buf.iter_mut().zip(bytes) {
            *dst = b.to_ascii_lowercase();
        }
        let name = &buf[..bytes.len()];

        Some(match name {
            // Hardware names
            b"x0" => X0,
            b"x1" => X1,
            b"x2" => X2,
            b"x3" => X3,
            b"x4" => X4,
            b"x5" => X5,
            b"x6" => X6,
            b"x7" => X7,
            b"x8" => X8,
            b"x9" => X9,
            b"x10" => X10,
            b"x11" => X11,
            b"x12" => X12,
            b"x13" => X13,
            b"x14" => X14,
            b"x15" => X15,
            b"x16" => X16,
            b"x17" => X17,
            b"x18" => X18,
            b"x19" => X19,
            b"x20" => X20,
            b"x21" => X21,
            b"x22" => X22,
            b"x23" => X23,
            b"x24" => X24,
            b"x25" => X25,
            b"x26" => X26,
            b"x27" => X27,
            b"x28" => X28,
            b"x29" => X29,
            b"x30" => X30,
            b"x31" => X31,
            // ABI names
            b"zero" => X0,
            b"ra" => X1,
            b"sp" => X2,
            b"gp" => X3,
            b"tp" => X4,
            b"t0" => X5,
            b"t1" => X6,
            b"t2" => X7,
            b"s0" => X8,
            b"fp" => X8, // fp is an alias for s0
            b"s1" => X9,
            b"a0" => X10,
            b"a1" => X11,
            b"a2" => X12,
            b"a3" => X13,
            b"a4" => X14,
            b"a5" => X15,
            b"a6" => X16,
            b"a7" => X17,
            b"s2" => X18,
            b"s3" => X19,
            b"s4" => X20,
            b"s5" => X21,
            b"s6" => X22,
            b"s7" => X23,
            b"s8" => X24,
            b"s9" => X25,
            b"s10" => X26,
            b"s11" => X27,
            b"t3" => X28,
            b"t4" => X29,
            b"t5" => X30,
            b"t6" => X31,
            _ => return None,
        })
    }

    /// The 5-bit register number (0–31).
    #[must_use]
    pub fn number(self) -> u32 {
        self as u32
    }

    /// The preferred ABI name for display.
    #[must_use]
    pub fn abi_name(self) -> &'static str {
        const NAMES: [&str; 32] = [
            "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3",
            "a4", "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11",
            "t3", "t4", "t5", "t6",
        ];
        NAMES[self as usize]
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abi_name())
    }
}

/// One operand of a parsed instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// A recognized register name.
    Register(Register),
    /// A numeric literal.
    Immediate(i64),
    /// The `offset(base)` memory form used by loads and stores.
    Memory {
        /// Base register (an unrecognized base name resolves per strictness
        /// before this operand is built).
        base: Register,
        /// Byte displacement.
        disp: i64,
    },
    /// An identifier that is not a register name. Its meaning — unknown
    /// register or malformed immediate — depends on the slot it ends up in.
    Symbol(String),
}

/// How the assembler reacts to recoverable problems.
///
/// Lenient mode reproduces the historical observable behavior: unknown
/// mnemonics and malformed load/store operand shapes drop their line from
/// the output with no diagnostic, unknown register names resolve to `x0`,
/// and out-of-range immediates are truncated by masking. Strict mode turns
/// every one of those into an error. Malformed numeric literals and missing
/// operands are hard errors in both modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strictness {
    /// Drop unencodable lines silently; mask out-of-range immediates.
    #[default]
    Lenient,
    /// Surface a diagnostic for every recoverable condition.
    Strict,
}

/// A parsed source line: mnemonic plus operands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// The mnemonic, lowercased.
    pub mnemonic: String,
    /// Operands in source order.
    pub operands: Vec<Operand>,
    /// Span of the mnemonic token.
    pub span: Span,
}
