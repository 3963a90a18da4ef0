//! Command-line front end: assemble a source file into a hex listing.
//!
//! ```text
//! assemble [--strict] <input.s> [output.hex]
//! ```
//!
//! The output file (default `instruction.hex`) holds one zero-padded
//! 8-digit lowercase hex word per line, and is only written once the whole
//! input has assembled.

use std::process::ExitCode;

use rvasm::{Assembler, Strictness};

fn usage() -> ExitCode {
    eprintln!("Usage: assemble [--strict] <input.s> [output.hex]");
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    let mut strictness = Strictness::Lenient;
    let mut paths = Vec::new();

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--strict" => strictness = Strictness::Strict,
            "--help" | "-h" => return usage(),
            _ if arg.starts_with('-') => {
                eprintln!("error: unknown option '{arg}'");
                return usage();
            }
            _ => paths.push(arg),
        }
    }

    let (input, output) = match paths.as_slice() {
        [input] => (input.clone(), String::from("instruction.hex")),
        [input, output] => (input.clone(), output.clone()),
        _ => return usage(),
    };

    let source = match std::fs::read_to_string(&input) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: cannot read {input}: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut asm = Assembler::new().strictness(strictness);
    if let Err(err) = asm.emit(&source) {
        eprintln!("error: {input}:{err}");
        return ExitCode::FAILURE;
    }
    let result = asm.finish();

    if let Err(err) = std::fs::write(&output, result.to_hex()) {
        eprintln!("error: cannot write {output}: {err}");
        return ExitCode::FAILURE;
    }

    println!("Assembled {} instructions to {output}", result.len());
    ExitCode::SUCCESS
}
