use clap::Parser;
use machina::lexer::{Lexer, LexerError, ScanError};
use std::path::PathBuf;
use std::process::ExitCode;
use std::{fs, io};
use thiserror::Error;

mod cmm;

/// Tokenise a C-like source file and print the token list and the final
/// line count
#[derive(Parser, Debug)]
#[command(name = "machina-cli", version)]
struct MachinaArgs {
    /// The source file to scan
    file: PathBuf,
    /// Also print whitespace and newline tokens
    #[arg(short, long)]
    all: bool,
}

#[derive(Debug, Error)]
enum Error {
    #[error("error reading {0}: {1}")]
    File(PathBuf, io::Error),
    #[error("error compiling the token table: {0}")]
    Lexer(#[from] LexerError),
    #[error("{0}")]
    Scan(#[from] ScanError),
}

fn main() -> ExitCode {
    let args = MachinaArgs::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            match error {
                Error::Scan(_) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn run(args: &MachinaArgs) -> Result<(), Error> {
    let source =
        fs::read_to_string(&args.file).map_err(|e| Error::File(args.file.clone(), e))?;
    let lexer = Lexer::new(cmm::token_rules())?;
    let (tokens, lines) = lexer.scan_counting_lines(&source)?;
    for token in &tokens {
        if args.all || !matches!(token.kind.as_ref(), "BLANK" | "TAB" | "ENDLINE") {
            println!("{token}");
        }
    }
    println!("Lines: {lines}");
    Ok(())
}
