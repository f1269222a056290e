//! Compiler selection
//!
//! Picks one candidate: automatically when only one exists, otherwise by
//! asking for a 1-based index until a valid one is given.

use crate::toolchain::CompilerCandidate;
use inquire::{InquireError, Text};
use std::fmt;
use std::io::{self, BufRead, Write};

/// Error type for the selection prompt
#[derive(Debug)]
pub enum SelectError {
    /// The user interrupted the prompt (Ctrl-C / Esc)
    Cancelled,
    /// Input stream closed before a choice was made
    EndOfInput,
    /// The prompt itself failed
    Prompt(String),
    /// IO error
    Io(io::Error),
}

impl fmt::Display for SelectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectError::Cancelled => write!(f, "Operation cancelled by user"),
            SelectError::EndOfInput => write!(f, "input ended before a compiler was selected"),
            SelectError::Prompt(msg) => write!(f, "prompt failed: {}", msg),
            SelectError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for SelectError {}

impl From<io::Error> for SelectError {
    fn from(e: io::Error) -> Self {
        SelectError::Io(e)
    }
}

/// Source of answers to the selection prompt.
pub trait ChoiceInput {
    /// Show `prompt` and return one raw line of input (without the newline).
    fn read_choice(&mut self, prompt: &str) -> Result<String, SelectError>;
}

/// Interactive prompt for terminals
pub struct InquireInput;

impl ChoiceInput for InquireInput {
    fn read_choice(&mut self, prompt: &str) -> Result<String, SelectError> {
        match Text::new(prompt).prompt() {
            Ok(answer) => Ok(answer),
            Err(InquireError::OperationInterrupted | InquireError::OperationCanceled) => {
                Err(SelectError::Cancelled)
            }
            Err(InquireError::IO(e)) => Err(SelectError::Io(e)),
            Err(e) => Err(SelectError::Prompt(e.to_string())),
        }
    }
}

/// Line-oriented prompt for piped stdin
pub struct LineInput<R> {
    reader: R,
}

impl<R: BufRead> LineInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> ChoiceInput for LineInput<R> {
    fn read_choice(&mut self, prompt: &str) -> Result<String, SelectError> {
        print!("{} ", prompt);
        io::stdout().flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(SelectError::EndOfInput);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Outcome of parsing one answer against `count` candidates
#[derive(Debug, PartialEq, Eq)]
enum Answer {
    Index(usize),
    OutOfRange,
    NotANumber,
}

fn parse_answer(raw: &str, count: usize) -> Answer {
    let raw = raw.trim();
    match raw.parse::<i64>() {
        Ok(n) if n >= 1 && (n as u64) <= count as u64 => Answer::Index(n as usize - 1),
        Ok(_) => Answer::OutOfRange,
        // Still an integer, just too large to be any index
        Err(_) if is_integer(raw) => Answer::OutOfRange,
        Err(_) => Answer::NotANumber,
    }
}

fn is_integer(raw: &str) -> bool {
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Choose one candidate.
///
/// A single candidate is returned without prompting. Otherwise the list is
/// printed to `out` and `input` is asked until it yields a valid index.
/// Cancellation is returned as [`SelectError::Cancelled`]; the caller decides
/// how to exit.
pub fn select_compiler(
    candidates: &[CompilerCandidate],
    input: &mut dyn ChoiceInput,
    out: &mut dyn Write,
) -> Result<CompilerCandidate, SelectError> {
    match candidates {
        [] => Err(SelectError::Prompt("no compilers to choose from".to_string())),
        [only] => {
            writeln!(out, "Found one compiler: {} at {}", only.display_name, only.path)?;
            Ok(only.clone())
        }
        _ => {
            let count = candidates.len();
            writeln!(out, "Available compilers:")?;
            for (i, candidate) in candidates.iter().enumerate() {
                writeln!(out, "{}. {}", i + 1, candidate)?;
            }

            let prompt = format!("Select a compiler (1-{}):", count);
            loop {
                let raw = input.read_choice(&prompt)?;
                match parse_answer(&raw, count) {
                    Answer::Index(i) => return Ok(candidates[i].clone()),
                    Answer::OutOfRange => {
                        writeln!(out, "Please enter a number between 1 and {}", count)?
                    }
                    Answer::NotANumber => {
                        writeln!(out, "Please enter a valid number between 1 and {}", count)?
                    }
                }
            }
        }
    }
}
