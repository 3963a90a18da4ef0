//! RISC-V (RV32I / RV64I + M) instruction encoder.
//!
//! Implements encoding for the base integer instruction set, the M
//! (multiply/divide) extension, and a handful of privileged system
//! instructions. All instructions are 32 bits wide.
//!
//! ## RISC-V Instruction Formats
//!
//! ```text
//! R-type:  [funct7 | rs2 | rs1 | funct3 | rd  | opcode]
//! I-type:  [  imm[11:0]  | rs1 | funct3 | rd  | opcode]
//! S-type:  [imm[11:5]|rs2| rs1 | funct3 |imm[4:0]|opcode]
//! B-type:  [imm[12|10:5]|rs2|rs1|funct3|imm[4:1|11]|opcode]
//! U-type:  [      imm[31:12]             | rd  | opcode]
//! J-type:  [imm[20|10:1|11|19:12]        | rd  | opcode]
//! ```
//!
//! The scattered B/J immediate layouts exist so branch and jump offsets
//! share decode wiring with the S/I/U formats; the helpers below name every
//! bit group rather than folding the permutation into arithmetic.
//!
//! Every immediate field is masked to its width before shifting, so each
//! encoder's output is always a well-formed 32-bit word. In lenient mode
//! that masking doubles as the documented silent-truncation behavior for
//! out-of-range immediates; in strict mode the range is checked first.

use alloc::string::String;

use crate::error::{AsmError, Span};
use crate::ir::{Instruction, Operand, Strictness};

// ── Opcodes ─────────────────────────────────────────────────────────────

const OP_LUI: u32 = 0b011_0111;
const OP_AUIPC: u32 = 0b001_0111;
const OP_JAL: u32 = 0b110_1111;
const OP_JALR: u32 = 0b110_0111;
const OP_BRANCH: u32 = 0b110_0011;
const OP_LOAD: u32 = 0b000_0011;
const OP_STORE: u32 = 0b010_0011;
const OP_IMM: u32 = 0b001_0011;
const OP_REG: u32 = 0b011_0011;
const OP_IMM_W: u32 = 0b001_1011; // RV64I W-suffix immediate ops
const OP_REG_W: u32 = 0b011_1011; // RV64I W-suffix register ops
const OP_SYSTEM: u32 = 0b111_0011;

// ── funct7 values ───────────────────────────────────────────────────────

/// funct7 for SUB/SRA/SRAI (bit 30 of the instruction word).
const FUNCT7_ALT: u32 = 0b010_0000;
/// funct7 selecting the M extension on the OP/OP-32 opcodes.
const FUNCT7_MULDIV: u32 = 0b000_0001;

// ── Immediate ranges ────────────────────────────────────────────────────

const IMM12_MIN: i64 = -(1 << 11);
const IMM12_MAX: i64 = (1 << 11) - 1;
const BRANCH_MIN: i64 = -(1 << 12);
const BRANCH_MAX: i64 = (1 << 12) - 2;
const JUMP_MIN: i64 = -(1 << 20);
const JUMP_MAX: i64 = (1 << 20) - 2;

// ── Format encoders ─────────────────────────────────────────────────────

/// Encode an R-type instruction.
#[inline]
fn r_type(opcode: u32, rd: u32, funct3: u32, rs1: u32, rs2: u32, funct7: u32) -> u32 {
    (funct7 << 25) | (rs2 << 20) | (rs1 << 15) | (funct3 << 12) | (rd << 7) | opcode
}

/// Encode an I-type instruction.
///
/// The immediate is truncated to 12 bits; its sign bits stay implicit in
/// the two's-complement pattern.
#[inline]
fn i_type(opcode: u32, rd: u32, funct3: u32, rs1: u32, imm: i64) -> u32 {
    let imm = (imm as u32) & 0xFFF;
    (imm << 20) | (rs1 << 15) | (funct3 << 12) | (rd << 7) | opcode
}

/// Encode an S-type instruction. The 12-bit immediate splits into
/// `imm[11:5]` at [31:25] and `imm[4:0]` at [11:7].
#[inline]
fn s_type(opcode: u32, funct3: u32, rs1: u32, rs2: u32, imm: i64) -> u32 {
    let imm = imm as u32;
    let imm_hi = (imm >> 5) & 0x7F;
    let imm_lo = imm & 0x1F;
    (imm_hi << 25) | (rs2 << 20) | (rs1 << 15) | (funct3 << 12) | (imm_lo << 7) | opcode
}

/// Encode a B-type instruction. The offset is an even byte offset; bit 0
/// is implicitly zero and the remaining bits scatter as
/// `[12]`→31, `[10:5]`→[30:25], `[4:1]`→[11:8], `[11]`→7.
#[inline]
fn b_type(opcode: u32, funct3: u32, rs1: u32, rs2: u32, imm: i64) -> u32 {
    let imm = imm as u32;
    let bit12 = (imm >> 12) & 1;
    let bit11 = (imm >> 11) & 1;
    let bits10_5 = (imm >> 5) & 0x3F;
    let bits4_1 = (imm >> 1) & 0xF;
    (bit12 << 31)
        | (bits10_5 << 25)
        | (rs2 << 20)
        | (rs1 << 15)
        | (funct3 << 12)
        | (bits4_1 << 8)
        | (bit11 << 7)
        | opcode
}

/// Encode a U-type instruction. The immediate's low 12 bits are discarded
/// and the rest lands in [31:12] unshifted — callers pass an already
/// upper-aligned constant.
#[inline]
fn u_type(opcode: u32, rd: u32, imm: i64) -> u32 {
    ((imm as u32) & 0xFFFF_F000) | (rd << 7) | opcode
}

/// Encode a J-type instruction. The offset is an even byte offset up to
/// ±1 MiB; bits scatter as `[20]`→31, `[10:1]`→[30:21], `[11]`→20,
/// `[19:12]`→[19:12].
#[inline]
fn j_type(opcode: u32, rd: u32, imm: i64) -> u32 {
    let imm = imm as u32;
    let bit20 = (imm >> 20) & 1;
    let bits10_1 = (imm >> 1) & 0x3FF;
    let bit11 = (imm >> 11) & 1;
    let bits19_12 = (imm >> 12) & 0xFF;
    (bit20 << 31) | (bits10_1 << 21) | (bit11 << 20) | (bits19_12 << 12) | (rd << 7) | opcode
}

// ── Operand extraction helpers ──────────────────────────────────────────

fn operand<'a>(
    instr: &'a Instruction,
    idx: usize,
    span: Span,
) -> Result<&'a Operand, AsmError> {
    instr.operands.get(idx).ok_or_else(|| AsmError::InvalidOperands {
        detail: alloc::format!(
            "'{}' requires at least {} operand(s), got {}",
            instr.mnemonic,
            idx + 1,
            instr.operands.len()
        ),
        span,
    })
}

/// Resolve a register-slot operand to its 5-bit number.
///
/// Any operand that is not a recognized register resolves to x0 in lenient
/// mode — the historical resolver cannot distinguish an explicit `zero`
/// from a typo.
fn reg(
    instr: &Instruction,
    idx: usize,
    span: Span,
    strictness: Strictness,
) -> Result<u32, AsmError> {
    match operand(instr, idx, span)? {
        Operand::Register(r) => Ok(r.number()),
        Operand::Symbol(name) => match strictness {
            Strictness::Lenient => Ok(0),
            Strictness::Strict => Err(AsmError::UnknownRegister {
                name: name.clone(),
                span,
            }),
        },
        _ => match strictness {
            Strictness::Lenient => Ok(0),
            Strictness::Strict => Err(AsmError::InvalidOperands {
                detail: String::from("expected register"),
                span,
            }),
        },
    }
}

/// Extract an immediate-slot operand.
///
/// A non-numeric token in an immediate slot is a malformed immediate in
/// both modes; this is the failure that aborts a whole run.
fn imm(instr: &Instruction, idx: usize, span: Span) -> Result<i64, AsmError> {
    match operand(instr, idx, span)? {
        Operand::Immediate(v) => Ok(*v),
        Operand::Symbol(name) => Err(AsmError::MalformedImmediate {
            token: name.clone(),
            span,
        }),
        Operand::Register(r) => Err(AsmError::MalformedImmediate {
            token: String::from(r.abi_name()),
            span,
        }),
        Operand::Memory { .. } => Err(AsmError::MalformedImmediate {
            token: String::from("offset(base)"),
            span,
        }),
    }
}

/// Extract an `offset(base)` memory operand for loads and stores.
///
/// `Ok(None)` means the operand is not of that shape and the line drops in
/// lenient mode.
fn mem(
    instr: &Instruction,
    idx: usize,
    span: Span,
    strictness: Strictness,
) -> Result<Option<(u32, i64)>, AsmError> {
    match operand(instr, idx, span)? {
        Operand::Memory { base, disp } => Ok(Some((base.number(), *disp))),
        _ => match strictness {
            Strictness::Lenient => Ok(None),
            Strictness::Strict => Err(AsmError::InvalidOperands {
                detail: String::from("expected memory operand offset(reg)"),
                span,
            }),
        },
    }
}

/// Strict-mode range check; lenient mode leaves the value for the packer's
/// mask to truncate.
fn check_range(
    value: i64,
    min: i64,
    max: i64,
    span: Span,
    strictness: Strictness,
) -> Result<(), AsmError> {
    if strictness == Strictness::Strict && !(min..=max).contains(&value) {
        return Err(AsmError::ImmediateOverflow {
            value,
            min,
            max,
            span,
        });
    }
    Ok(())
}

/// Strict-mode alignment check for branch/jump byte offsets (bit 0 must be
/// zero; lenient packing simply drops it).
fn check_even(value: i64, min: i64, max: i64, span: Span, strictness: Strictness) -> Result<(), AsmError> {
    if strictness == Strictness::Strict && value & 1 != 0 {
        return Err(AsmError::ImmediateOverflow {
            value,
            min,
            max,
            span,
        });
    }
    Ok(())
}

/// Strict-mode U-type check: the packer keeps only bits [31:12], so flag
/// values with a nonzero low 12 bits or beyond 32 bits.
fn check_upper(value: i64, span: Span, strictness: Strictness) -> Result<(), AsmError> {
    if strictness == Strictness::Strict {
        let fits_32 = (-(1i64 << 31)..(1i64 << 32)).contains(&value);
        if !fits_32 || value & 0xFFF != 0 {
            return Err(AsmError::ImmediateOverflow {
                value,
                min: i64::from(i32::MIN),
                max: (1 << 32) - 0x1000,
                span,
            });
        }
    }
    Ok(())
}

// ── Main encoder ────────────────────────────────────────────────────────

/// Encode a single parsed instruction into its 32-bit word.
///
/// `Ok(None)` means the line produces no word: an unknown mnemonic or a
/// load/store whose operand is not of the `offset(base)` shape, both of
/// which drop silently in lenient mode.
///
/// # Errors
///
/// Malformed immediates and missing operands error in both modes; unknown
/// mnemonics, unknown registers, and out-of-range immediates error only in
/// [`Strictness::Strict`].
pub fn encode_instruction(
    instr: &Instruction,
    strictness: Strictness,
) -> Result<Option<u32>, AsmError> {
    let span = instr.span;
    let mnemonic = instr.mnemonic.as_str();

    let word = match mnemonic {
        // ── R-type ALU ────────────────────────────────────────
        "add" | "sub" | "sll" | "slt" | "sltu" | "xor" | "srl" | "sra" | "or" | "and" => {
            let (funct3, funct7) = match mnemonic {
                "add" => (0b000, 0),
                "sub" => (0b000, FUNCT7_ALT),
                "sll" => (0b001, 0),
                "slt" => (0b010, 0),
                "sltu" => (0b011, 0),
                "xor" => (0b100, 0),
                "srl" => (0b101, 0),
                "sra" => (0b101, FUNCT7_ALT),
                "or" => (0b110, 0),
                _ => (0b111, 0), // and
            };
            let rd = reg(instr, 0, span, strictness)?;
            let rs1 = reg(instr, 1, span, strictness)?;
            let rs2 = reg(instr, 2, span, strictness)?;
            r_type(OP_REG, rd, funct3, rs1, rs2, funct7)
        }

        // ── RV64I W-suffix R-type ─────────────────────────────
        "addw" | "subw" | "sllw" | "srlw" | "sraw" => {
            let (funct3, funct7) = match mnemonic {
                "addw" => (0b000, 0),
                "subw" => (0b000, FUNCT7_ALT),
                "sllw" => (0b001, 0),
                "srlw" => (0b101, 0),
                _ => (0b101, FUNCT7_ALT), // sraw
            };
            let rd = reg(instr, 0, span, strictness)?;
            let rs1 = reg(instr, 1, span, strictness)?;
            let rs2 = reg(instr, 2, span, strictness)?;
            r_type(OP_REG_W, rd, funct3, rs1, rs2, funct7)
        }

        // ── M extension ───────────────────────────────────────
        "mul" | "mulh" | "mulhsu" | "mulhu" | "div" | "divu" | "rem" | "remu" => {
            let funct3 = match mnemonic {
                "mul" => 0b000,
                "mulh" => 0b001,
                "mulhsu" => 0b010,
                "mulhu" => 0b011,
                "div" => 0b100,
                "divu" => 0b101,
                "rem" => 0b110,
                _ => 0b111, // remu
            };
            let rd = reg(instr, 0, span, strictness)?;
            let rs1 = reg(instr, 1, span, strictness)?;
            let rs2 = reg(instr, 2, span, strictness)?;
            r_type(OP_REG, rd, funct3, rs1, rs2, FUNCT7_MULDIV)
        }

        // ── I-type ALU ────────────────────────────────────────
        "addi" | "slti" | "sltiu" | "xori" | "ori" | "andi" => {
            let funct3 = match mnemonic {
                "addi" => 0b000,
                "slti" => 0b010,
                "sltiu" => 0b011,
                "xori" => 0b100,
                "ori" => 0b110,
                _ => 0b111, // andi
            };
            let rd = reg(instr, 0, span, strictness)?;
            let rs1 = reg(instr, 1, span, strictness)?;
            let value = imm(instr, 2, span)?;
            check_range(value, IMM12_MIN, IMM12_MAX, span, strictness)?;
            i_type(OP_IMM, rd, funct3, rs1, value)
        }

        "addiw" => {
            let rd = reg(instr, 0, span, strictness)?;
            let rs1 = reg(instr, 1, span, strictness)?;
            let value = imm(instr, 2, span)?;
            check_range(value, IMM12_MIN, IMM12_MAX, span, strictness)?;
            i_type(OP_IMM_W, rd, 0b000, rs1, value)
        }

        // ── Shifts ────────────────────────────────────────────
        "slli" | "srli" | "srai" | "slliw" | "srliw" | "sraiw" => {
            let (opcode, funct3, funct7, max_shamt) = match mnemonic {
                "slli" => (OP_IMM, 0b001, 0, 63),
                "srli" => (OP_IMM, 0b101, 0, 63),
                "srai" => (OP_IMM, 0b101, FUNCT7_ALT, 63),
                "slliw" => (OP_IMM_W, 0b001, 0, 31),
                "srliw" => (OP_IMM_W, 0b101, 0, 31),
                _ => (OP_IMM_W, 0b101, FUNCT7_ALT, 31), // sraiw
            };
            let rd = reg(instr, 0, span, strictness)?;
            let rs1 = reg(instr, 1, span, strictness)?;
            let shamt = imm(instr, 2, span)?;
            check_range(shamt, 0, max_shamt, span, strictness)?;
            i_type(opcode, rd, funct3, rs1, shamt) | (funct7 << 25)
        }

        // ── Loads ─────────────────────────────────────────────
        "lb" | "lh" | "lw" | "lbu" | "lhu" => {
            let funct3 = match mnemonic {
                "lb" => 0b000,
                "lh" => 0b001,
                "lw" => 0b010,
                "lbu" => 0b100,
                _ => 0b101, // lhu
            };
            let rd = reg(instr, 0, span, strictness)?;
            let Some((base, offset)) = mem(instr, 1, span, strictness)? else {
                return Ok(None);
            };
            check_range(offset, IMM12_MIN, IMM12_MAX, span, strictness)?;
            i_type(OP_LOAD, rd, funct3, base, offset)
        }

        // ── Stores ────────────────────────────────────────────
        "sb" | "sh" | "sw" => {
            let funct3 = match mnemonic {
                "sb" => 0b000,
                "sh" => 0b001,
                _ => 0b010, // sw
            };
            let rs2 = reg(instr, 0, span, strictness)?;
            let Some((base, offset)) = mem(instr, 1, span, strictness)? else {
                return Ok(None);
            };
            check_range(offset, IMM12_MIN, IMM12_MAX, span, strictness)?;
            s_type(OP_STORE, funct3, base, rs2, offset)
        }

        // ── Branches ──────────────────────────────────────────
        "beq" | "bne" | "blt" | "bge" | "bltu" | "bgeu" => {
            let funct3 = match mnemonic {
                "beq" => 0b000,
                "bne" => 0b001,
                "blt" => 0b100,
                "bge" => 0b101,
                "bltu" => 0b110,
                _ => 0b111, // bgeu
            };
            let rs1 = reg(instr, 0, span, strictness)?;
            let rs2 = reg(instr, 1, span, strictness)?;
            let offset = imm(instr, 2, span)?;
            check_range(offset, BRANCH_MIN, BRANCH_MAX, span, strictness)?;
            check_even(offset, BRANCH_MIN, BRANCH_MAX, span, strictness)?;
            b_type(OP_BRANCH, funct3, rs1, rs2, offset)
        }

        // ── U-type ────────────────────────────────────────────
        "lui" | "auipc" => {
            let opcode = if mnemonic == "lui" { OP_LUI } else { OP_AUIPC };
            let rd = reg(instr, 0, span, strictness)?;
            let value = imm(instr, 1, span)?;
            check_upper(value, span, strictness)?;
            u_type(opcode, rd, value)
        }

        // ── J-type ────────────────────────────────────────────
        "jal" => {
            // One-operand form implies rd = ra.
            let (rd, offset) = if instr.operands.len() == 1 {
                (1, imm(instr, 0, span)?)
            } else {
                (reg(instr, 0, span, strictness)?, imm(instr, 1, span)?)
            };
            check_range(offset, JUMP_MIN, JUMP_MAX, span, strictness)?;
            check_even(offset, JUMP_MIN, JUMP_MAX, span, strictness)?;
            j_type(OP_JAL, rd, offset)
        }

        // ── JALR ──────────────────────────────────────────────
        "jalr" => {
            let rd = reg(instr, 0, span, strictness)?;
            let rs1 = reg(instr, 1, span, strictness)?;
            let value = imm(instr, 2, span)?;
            check_range(value, IMM12_MIN, IMM12_MAX, span, strictness)?;
            i_type(OP_JALR, rd, 0b000, rs1, value)
        }

        // ── System ────────────────────────────────────────────
        // Fixed literal words; no field assembly.
        "ecall" => i_type(OP_SYSTEM, 0, 0, 0, 0x000),
        "ebreak" => i_type(OP_SYSTEM, 0, 0, 0, 0x001),
        "mret" => i_type(OP_SYSTEM, 0, 0, 0, 0x302),
        "sret" => i_type(OP_SYSTEM, 0, 0, 0, 0x102),
        "wfi" => i_type(OP_SYSTEM, 0, 0, 0, 0x105),
        "nop" => i_type(OP_IMM, 0, 0, 0, 0),

        _ => {
            return match strictness {
                Strictness::Lenient => Ok(None),
                Strictness::Strict => Err(AsmError::UnknownMnemonic {
                    mnemonic: String::from(mnemonic),
                    span,
                }),
            }
        }
    };

    Ok(Some(word))
}
