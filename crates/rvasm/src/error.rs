//! Error types and source span tracking for diagnostics.

use alloc::string::String;
use core::fmt;

/// Source location for diagnostics.
///
/// Tracks the line, column, byte offset, and length of a token or construct
/// in the original assembly source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number (byte offset within line).
    pub col: u32,
    /// 0-based byte offset within the line.
    pub offset: usize,
    /// Byte length of the spanned region.
    pub len: usize,
}

impl Span {
    /// Create a new span.
    #[must_use]
    pub fn new(line: u32, col: u32, offset: usize, len: usize) -> Self {
        Self {
            line,
            col,
            offset,
            len,
        }
    }

    /// A dummy span for generated/internal constructs.
    #[must_use]
    pub fn dummy() -> Self {
        Self {
            line: 0,
            col: 0,
            offset: 0,
            len: 0,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Assembly error with source location and descriptive message.
///
/// Which conditions actually surface as errors depends on the configured
/// [`Strictness`](crate::Strictness): in lenient mode unrecognized mnemonics
/// and malformed load/store operand shapes drop their line instead of
/// erroring, and out-of-range immediates are truncated by masking. Malformed
/// numeric literals and missing operands are hard errors in both modes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AsmError {
    /// Unknown mnemonic (strict mode only; lenient mode drops the line).
    UnknownMnemonic {
        /// The mnemonic that was not recognized.
        mnemonic: String,
        /// Source location of the mnemonic.
        span: Span,
    },

    /// A register slot held a name that is not a register (strict mode only;
    /// lenient mode resolves it to `x0`).
    UnknownRegister {
        /// The name that did not resolve.
        name: String,
        /// Source location of the name.
        span: Span,
    },

    /// A numeric literal could not be parsed, or an immediate slot held a
    /// non-numeric token. Aborts the run in both modes.
    MalformedImmediate {
        /// The offending token text.
        token: String,
        /// Source location of the token.
        span: Span,
    },

    /// Immediate value exceeds the format's range (strict mode only; lenient
    /// mode truncates by masking).
    ImmediateOverflow {
        /// The immediate value that overflowed.
        value: i64,
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
        /// Source location of the immediate.
        span: Span,
    },

    /// Invalid operand combination for the instruction.
    InvalidOperands {
        /// Description of why the operands are invalid.
        detail: String,
        /// Source location of the instruction.
        span: Span,
    },

    /// Syntax error during lexing or parsing.
    Syntax {
        /// The syntax error message.
        msg: String,
        /// Source location of the syntax error.
        span: Span,
    },
}

impl AsmError {
    /// The source location the error points at.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            AsmError::UnknownMnemonic { span, .. }
            | AsmError::UnknownRegister { span, .. }
            | AsmError::MalformedImmediate { span, .. }
            | AsmError::ImmediateOverflow { span, .. }
            | AsmError::InvalidOperands { span, .. }
            | AsmError::Syntax { span, .. } => *span,
        }
    }
}

impl fmt::Display for AsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsmError::UnknownMnemonic { mnemonic, span } => {
                write!(f, "{}: unknown mnemonic '{}'", span, mnemonic)
            }
            AsmError::UnknownRegister { name, span } => {
                write!(f, "{}: unknown register '{}'", span, name)
            }
            AsmError::MalformedImmediate { token, span } => {
                write!(f, "{}: malformed immediate '{}'", span, token)
            }
            AsmError::ImmediateOverflow {
                value,
                min,
                max,
                span,
            } => {
                write!(
                    f,
                    "{}: immediate value {} out of range [{}..{}]",
                    span, value, min, max
                )
            }
            AsmError::InvalidOperands { detail, span } => {
                write!(f, "{}: invalid operand combination: {}", span, detail)
            }
            AsmError::Syntax { msg, span } => {
                write!(f, "{}: {}", span, msg)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AsmError {}
