pub mod ll1;
pub mod lr;

use serde::Serialize;
use thiserror::Error;

use crate::grammar::{Symbol, END_MARK};

pub use ll1::Ll1Driver;
pub use lr::LrDriver;

/// One scanned token. The drivers only ever look at `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: String,
    pub text: String,
}

impl Token {
    pub fn new(kind: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            text: text.into(),
        }
    }

    pub fn end() -> Self {
        Self::new(END_MARK, END_MARK)
    }

    pub fn terminal(&self) -> Symbol {
        Symbol::terminal(self.kind.clone())
    }

    pub fn is_end(&self) -> bool {
        self.kind == END_MARK
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum ParseError {
    #[error("expected \"{expected}\" but found \"{found}\" at token {at}")]
    TerminalMismatch {
        expected: String,
        found: String,
        at: usize,
    },
    #[error("no table entry for ({non_terminal}, \"{lookahead}\") at token {at}")]
    NoTableEntry {
        non_terminal: String,
        lookahead: String,
        at: usize,
    },
    #[error("no action for state {state} on \"{lookahead}\" at token {at}")]
    NoAction {
        state: usize,
        lookahead: String,
        at: usize,
    },
    #[error("no goto for state {state} on {non_terminal}")]
    NoGoto { state: usize, non_terminal: String },
    #[error("token stream ended without the end marker")]
    UnterminatedInput,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Accepted,
    Rejected(ParseError),
}

/// The verdict plus the production indices applied, in the order the
/// driver used them. On rejection the trace covers everything applied
/// before the failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseOutcome {
    pub verdict: Verdict,
    pub derivation: Vec<usize>,
}

impl ParseOutcome {
    pub fn is_accepted(&self) -> bool {
        self.verdict == Verdict::Accepted
    }
}
