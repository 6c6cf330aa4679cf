use std::io::{self, BufRead, Write};
use std::process;

use crate::exit_codes;

/// Operator's answer at a confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Approve,
    Reject,
    Quit,
}

impl Confirmation {
    /// Interprets one answer line: `n` rejects, `q` quits, and anything else,
    /// including an empty line, approves. End of input never reaches this;
    /// [`read_confirmation`] reads it as [`Confirmation::Quit`] so a detached
    /// stdin cannot approve commands.
    pub fn from_input(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "n" => Confirmation::Reject,
            "q" => Confirmation::Quit,
            _ => Confirmation::Approve,
        }
    }
}

/// The human side of the loop: approvals and free-text clarifications.
pub trait Operator {
    fn confirm(&mut self, message: &str) -> io::Result<Confirmation>;

    fn clarify(&mut self, question: &str) -> io::Result<String>;
}

/// Writes `message` with the default indicator and reads one answer line.
/// End of input is read as [`Confirmation::Quit`].
pub fn read_confirmation<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    message: &str,
) -> io::Result<Confirmation> {
    write!(out, "\n{message} [Y/n/q]: ")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(Confirmation::Quit);
    }
    Ok(Confirmation::from_input(&line))
}

pub fn read_clarification<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    question: &str,
) -> io::Result<String> {
    writeln!(out, "\n❓ shai needs clarification:\n{question}")?;
    write!(out, "Your response to shai: ")?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Terminal operator. A quit answer ends the process on the spot.
pub struct ConsoleOperator<R, W> {
    input: R,
    out: W,
}

impl ConsoleOperator<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleOperator<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }
}

impl<R: BufRead, W: Write> Operator for ConsoleOperator<R, W> {
    fn confirm(&mut self, message: &str) -> io::Result<Confirmation> {
        let answer = read_confirmation(&mut self.input, &mut self.out, message)?;
        if answer == Confirmation::Quit {
            let _ = writeln!(self.out, "👋 Quitting shai.");
            let _ = self.out.flush();
            process::exit(exit_codes::OK);
        }
        Ok(answer)
    }

    fn clarify(&mut self, question: &str) -> io::Result<String> {
        read_clarification(&mut self.input, &mut self.out, question)
    }
}
