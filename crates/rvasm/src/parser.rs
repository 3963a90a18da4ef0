//! Line parser: token stream → [`Instruction`].
//!
//! One source line yields at most one instruction. Blank lines, comment
//! lines, and (in lenient mode) lines that do not fit the grammar yield
//! nothing. The grammar per line is:
//!
//! ```text
//! line    := mnemonic operand*
//! operand := ident | number | number '(' ident ')'
//! ```
//!
//! Commas between operands are optional separators and carry no meaning.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::error::AsmError;
use crate::ir::{Instruction, Operand, Register, Strictness};
use crate::lexer::{tokenize_line, Token, TokenKind};

/// Parse one source line into an instruction.
///
/// Returns `Ok(None)` for lines that produce nothing: blank or
/// comment-only lines in both modes, and ungrammatical lines in lenient
/// mode. In strict mode ungrammatical lines are [`AsmError::Syntax`].
///
/// # Errors
///
/// A malformed numeric literal is [`AsmError::MalformedImmediate`] in both
/// modes; it is the one lexical failure that aborts a run rather than
/// dropping the line.
pub fn parse_line(
    line: &str,
    line_no: u32,
    strictness: Strictness,
) -> Result<Option<Instruction>, AsmError> {
    let tokens = match tokenize_line(line, line_no) {
        Ok(tokens) => tokens,
        Err(err @ AsmError::MalformedImmediate { .. }) => return Err(err),
        Err(err) => {
            return match strictness {
                Strictness::Lenient => Ok(None),
                Strictness::Strict => Err(err),
            }
        }
    };

    let Some(first) = tokens.first() else {
        return Ok(None);
    };

    if first.kind != TokenKind::Ident {
        // A line that does not start with a mnemonic is not an instruction.
        return match strictness {
            Strictness::Lenient => Ok(None),
            Strictness::Strict => Err(AsmError::Syntax {
                msg: String::from("expected mnemonic"),
                span: first.span,
            }),
        };
    }

    let mnemonic = first.text.to_ascii_lowercase();
    let span = first.span;

    let mut operands = Vec::new();
    let mut rest = &tokens[1..];
    loop {
        // commas are skipped wherever they appear between operands
        while matches!(rest.first().map(|t| t.kind), Some(TokenKind::Comma)) {
            rest = &rest[1..];
        }
        let Some(token) = rest.first() else {
            break;
        };
        match parse_operand(token, &rest[1..], strictness)? {
            Some((operand, consumed)) => {
                operands.push(operand);
                rest = &rest[consumed..];
            }
            None => return Ok(None),
        }
    }

    Ok(Some(Instruction {
        mnemonic,
        operands,
        span,
    }))
}

/// Parse one operand starting at `token`, with `rest` the tokens after it.
///
/// Returns the operand and the total number of tokens consumed (including
/// `token` itself), or `Ok(None)` when the stream is ungrammatical and the
/// line drops.
fn parse_operand(
    token: &Token<'_>,
    rest: &[Token<'_>],
    strictness: Strictness,
) -> Result<Option<(Operand, usize)>, AsmError> {
    match token.kind {
        TokenKind::Ident => {
            let operand = match Register::from_name(token.text) {
                Some(reg) => Operand::Register(reg),
                None => Operand::Symbol(token.text.to_string()),
            };
            Ok(Some((operand, 1)))
        }
        TokenKind::Number(disp) => {
            // `number ( ident )` is a memory operand; a bare number is an
            // immediate.
            if let [open, base, close, ..] = rest {
                if open.kind == TokenKind::OpenParen && close.kind == TokenKind::CloseParen {
                    if base.kind != TokenKind::Ident {
                        return match strictness {
                            Strictness::Lenient => Ok(None),
                            Strictness::Strict => Err(AsmError::Syntax {
                                msg: String::from("expected base register"),
                                span: base.span,
                            }),
                        };
                    }
                    let base_reg = match Register::from_name(base.text) {
                        Some(reg) => reg,
                        None => match strictness {
                            Strictness::Lenient => Register::X0,
                            Strictness::Strict => {
                                return Err(AsmError::UnknownRegister {
                                    name: base.text.to_string(),
                                    span: base.span,
                                })
                            }
                        },
                    };
                    return Ok(Some((
                        Operand::Memory {
                            base: base_reg,
                            disp,
                        },
                        4,
                    )));
                }
            }
            if matches!(rest.first().map(|t| t.kind), Some(TokenKind::OpenParen)) {
                // An unclosed `number (` shape fits no rule.
                return match strictness {
                    Strictness::Lenient => Ok(None),
                    Strictness::Strict => Err(AsmError::Syntax {
                        msg: String::from("unterminated memory operand"),
                        span: token.span,
                    }),
                };
            }
            Ok(Some((Operand::Immediate(disp), 1)))
        }
        TokenKind::Comma => unreachable!("commas are skipped by the caller"),
        TokenKind::OpenParen | TokenKind::CloseParen => match strictness {
            Strictness::Lenient => Ok(None),
            Strictness::Strict => Err(AsmError::Syntax {
                msg: String::from("unexpected parenthesis"),
                span: token.span,
            }),
        },
    }
}
