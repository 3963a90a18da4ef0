//! The assembler driver: source text in, instruction words out.
//!
//! [`Assembler`] is a builder that accepts source in chunks via
//! [`emit`](Assembler::emit) and tracks line numbers across calls, so a
//! caller can feed a file line by line or all at once. [`finish`]
//! (Assembler::finish) consumes it and hands back the accumulated words.

use alloc::string::String;
use alloc::vec::Vec;

use crate::error::AsmError;
use crate::ir::Strictness;
use crate::parser::parse_line;
use crate::riscv::encode_instruction;

/// Streaming assembler for RISC-V assembly source.
///
/// ```
/// use rvasm::Assembler;
///
/// let result = Assembler::new()
///     .emit("addi sp, sp, -16\n")?
///     .emit("sw ra, 12(sp)\n")?
///     .finish();
/// assert_eq!(result.words(), &[0xFF010113, 0x00112623]);
/// # Ok::<(), rvasm::AsmError>(())
/// ```
#[derive(Debug, Default)]
pub struct Assembler {
    strictness: Strictness,
    words: Vec<u32>,
    next_line: u32,
}

impl Assembler {
    /// Create an assembler with the default lenient strictness.
    pub fn new() -> Self {
        Self {
            strictness: Strictness::Lenient,
            words: Vec::new(),
            next_line: 1,
        }
    }

    /// Set the strictness for all subsequent [`emit`](Assembler::emit) calls.
    #[must_use]
    pub fn strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    /// Assemble a chunk of source text, appending one word per encodable
    /// instruction line.
    ///
    /// Line numbering continues from the previous call, so error spans stay
    /// accurate when source is fed incrementally.
    ///
    /// # Errors
    ///
    /// The first failing line aborts the call; words from earlier lines of
    /// the chunk are kept.
    pub fn emit(&mut self, source: &str) -> Result<&mut Self, AsmError> {
        for line in source.lines() {
            let line_no = self.next_line;
            self.next_line += 1;
            if let Some(instr) = parse_line(line, line_no, self.strictness)? {
                if let Some(word) = encode_instruction(&instr, self.strictness)? {
                    self.words.push(word);
                }
            }
        }
        Ok(self)
    }

    /// Finish assembly and return the accumulated words.
    pub fn finish(&mut self) -> AssemblyResult {
        AssemblyResult {
            words: core::mem::take(&mut self.words),
        }
    }
}

/// The output of an assembly run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssemblyResult {
    words: Vec<u32>,
}

impl AssemblyResult {
    /// The encoded instruction words, in source order.
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Consume the result, yielding the words.
    pub fn into_words(self) -> Vec<u32> {
        self.words
    }

    /// Number of encoded instructions.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the run produced no instructions.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Render the words as a hex listing, one zero-padded 8-digit
    /// lowercase word per line.
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(self.words.len() * 9);
        for word in &self.words {
            out.push_str(&alloc::format!("{word:08x}\n"));
        }
        out
    }
}
