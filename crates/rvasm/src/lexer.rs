//! Line tokenizer with span tracking.
//!
//! The assembler is strictly line-oriented, so the lexer works one line at a
//! time: it produces a flat list of [`Token`]s for a single source line, each
//! carrying its [`Span`](crate::error::Span) so diagnostics can point back at
//! the exact column. `#` starts a comment running to end of line; commas and
//! whitespace both act as operand separators.

use alloc::string::String;
use alloc::vec::Vec;

use crate::error::{AsmError, Span};

/// A token produced by the lexer.
///
/// Token text is borrowed from the source line; the lexer never allocates
/// per token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    /// Token classification.
    pub kind: TokenKind,
    /// Source text of the token.
    pub text: &'src str,
    /// Source location.
    pub span: Span,
}

/// The type of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// An identifier: mnemonic or register name.
    Ident,
    /// A numeric literal (decimal or `0x` hex).
    Number(i64),
    /// Comma separator.
    Comma,
    /// Open parenthesis `(` (memory operand).
    OpenParen,
    /// Close parenthesis `)` (memory operand).
    CloseParen,
}

/// Tokenize a single source line.
///
/// `line_no` is the 1-based line number recorded in each token's span.
///
/// # Errors
///
/// Returns [`AsmError::MalformedImmediate`] for unparseable numeric literals
/// (including the unsupported negative-hex form `-0x...`) and
/// [`AsmError::Syntax`] for characters that cannot start any token.
pub fn tokenize_line(line: &str, line_no: u32) -> Result<Vec<Token<'_>>, AsmError> {
    let bytes = line.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let ch = bytes[pos];

        if ch.is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        // Comment runs to end of line.
        if ch == b'#' {
            break;
        }

        if ch == b',' {
            tokens.push(punct(TokenKind::Comma, line, line_no, pos));
            pos += 1;
            continue;
        }
        if ch == b'(' {
            tokens.push(punct(TokenKind::OpenParen, line, line_no, pos));
            pos += 1;
            continue;
        }
        if ch == b')' {
            tokens.push(punct(TokenKind::CloseParen, line, line_no, pos));
            pos += 1;
            continue;
        }

        // Numeric literal, possibly with a leading minus.
        if ch.is_ascii_digit() || (ch == b'-' && pos + 1 < bytes.len() && bytes[pos + 1].is_ascii_digit())
        {
            tokens.push(lex_number(line, line_no, &mut pos)?);
            continue;
        }

        // Identifier: mnemonic or register name. `.` appears in mnemonics
        // like `fence.tso` on other assemblers; accepting it here keeps such
        // input flowing to the unknown-mnemonic path instead of erroring.
        if ch.is_ascii_alphabetic() || ch == b'_' || ch == b'.' {
            let start = pos;
            while pos < bytes.len() && is_ident_byte(bytes[pos]) {
                pos += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Ident,
                text: &line[start..pos],
                span: span_at(line_no, start, pos - start),
            });
            continue;
        }

        return Err(AsmError::Syntax {
            msg: alloc::format!("unexpected character '{}'", ch as char),
            span: span_at(line_no, pos, 1),
        });
    }

    Ok(tokens)
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'.'
}

fn punct(kind: TokenKind, line: &str, line_no: u32, pos: usize) -> Token<'_> {
    Token {
        kind,
        text: &line[pos..pos + 1],
        span: span_at(line_no, pos, 1),
    }
}

fn span_at(line_no: u32, offset: usize, len: usize) -> Span {
    Span::new(line_no, offset as u32 + 1, offset, len)
}

/// Lex one numeric literal starting at `*pos`.
///
/// The literal must end at a separator (whitespace, `,`, `(`, `)`, `#`, or
/// end of line); a trailing letter run like `12ab3` makes the whole word a
/// malformed immediate rather than two tokens.
fn lex_number<'src>(
    line: &'src str,
    line_no: u32,
    pos: &mut usize,
) -> Result<Token<'src>, AsmError> {
    let bytes = line.as_bytes();
    let start = *pos;

    let negative = bytes[*pos] == b'-';
    if negative {
        *pos += 1;
    }

    let is_hex = bytes[*pos] == b'0'
        && *pos + 1 < bytes.len()
        && (bytes[*pos + 1] == b'x' || bytes[*pos + 1] == b'X');

    if is_hex {
        *pos += 2;
    }

    let digits_start = *pos;
    while *pos < bytes.len() && bytes[*pos].is_ascii_hexdigit() {
        *pos += 1;
    }

    // Absorb any trailing identifier characters so the whole word is
    // reported, then re-validate below.
    let mut word_end = *pos;
    while word_end < bytes.len() && is_ident_byte(bytes[word_end]) {
        word_end += 1;
    }

    let malformed = |tok: &str| AsmError::MalformedImmediate {
        token: String::from(tok),
        span: span_at(line_no, start, tok.len()),
    };

    let word = &line[start..word_end];
    if word_end != *pos || digits_start == *pos {
        *pos = word_end;
        return Err(malformed(word));
    }

    // Hex parses as an unsigned magnitude only; there is no negative-hex
    // literal form.
    if negative && is_hex {
        return Err(malformed(word));
    }

    let digits = &line[digits_start..*pos];
    let value = if is_hex {
        i64::from_str_radix(digits, 16).map_err(|_| malformed(word))?
    } else {
        let magnitude: i64 = digits.parse().map_err(|_| malformed(word))?;
        if negative {
            -magnitude
        } else {
            magnitude
        }
    };

    let text = &line[start..*pos];
    if !is_hex {
        // Non-hex digit runs must be pure decimal: `12ef` scanned as hex
        // digits above would otherwise sneak through.
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed(text));
        }
    }

    Ok(Token {
        kind: TokenKind::Number(value),
        text,
        span: span_at(line_no, start, text.len()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(line: &str) -> Vec<TokenKind> {
        tokenize_line(line, 1)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn simple_instruction() {
        let tokens = tokenize_line("add a0, a1, a2", 1).unwrap();
        assert_eq!(tokens.len(), 6);
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[0].text, "add");
        assert_eq!(tokens[1].text, "a0");
        assert_eq!(tokens[2].kind, TokenKind::Comma);
    }

    #[test]
    fn decimal_and_negative() {
        assert_eq!(
            kinds("addi sp, sp, -16"),
            vec![
                TokenKind::Ident,
                TokenKind::Ident,
                TokenKind::Comma,
                TokenKind::Ident,
                TokenKind::Comma,
                TokenKind::Number(-16)
            ]
        );
    }

    #[test]
    fn hex_literal() {
        let tokens = tokenize_line("lui a0, 0x10000", 1).unwrap();
        assert_eq!(tokens[3].kind, TokenKind::Number(0x10000));
        let tokens = tokenize_line("lui a0, 0XdeadBEEF", 1).unwrap();
        assert_eq!(tokens[3].kind, TokenKind::Number(0xDEAD_BEEF));
    }

    #[test]
    fn memory_operand_shape() {
        assert_eq!(
            kinds("lw a0, -8(sp)"),
            vec![
                TokenKind::Ident,
                TokenKind::Ident,
                TokenKind::Comma,
                TokenKind::Number(-8),
                TokenKind::OpenParen,
                TokenKind::Ident,
                TokenKind::CloseParen
            ]
        );
    }

    #[test]
    fn comment_stops_lexing() {
        let tokens = tokenize_line("nop # comment, with (tokens) 0x99", 1).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "nop");
    }

    #[test]
    fn comment_only_and_blank() {
        assert!(tokenize_line("# just a comment", 1).unwrap().is_empty());
        assert!(tokenize_line("   ", 1).unwrap().is_empty());
        assert!(tokenize_line("", 1).unwrap().is_empty());
    }

    #[test]
    fn whitespace_separates_without_commas() {
        let tokens = tokenize_line("add a0 a1 a2", 1).unwrap();
        assert_eq!(tokens.len(), 4);
    }

    #[test]
    fn negative_hex_is_malformed() {
        let err = tokenize_line("addi a0, a1, -0x10", 1).unwrap_err();
        assert!(matches!(err, AsmError::MalformedImmediate { .. }));
    }

    #[test]
    fn trailing_letters_are_malformed() {
        let err = tokenize_line("addi a0, a1, 12ab3z", 1).unwrap_err();
        match err {
            AsmError::MalformedImmediate { token, .. } => assert_eq!(token, "12ab3z"),
            other => panic!("unexpected error {other:?}"),
        }
        assert!(tokenize_line("addi a0, a1, 0x", 1).is_err());
    }

    #[test]
    fn bare_minus_is_rejected() {
        // A minus not followed by a digit cannot start any token.
        let err = tokenize_line("addi a0, a1, -", 1).unwrap_err();
        assert!(matches!(err, AsmError::Syntax { .. }));
    }

    #[test]
    fn spans_point_at_columns() {
        let tokens = tokenize_line("beq t0, t1, 8", 2).unwrap();
        let imm = tokens.last().unwrap();
        assert_eq!(imm.span.line, 2);
        assert_eq!(imm.span.col, 13);
        assert_eq!(imm.span.len, 1);
    }
}
