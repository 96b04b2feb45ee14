use serde::{Serialize, Serializer};

use super::{END_MARK, EPSILON};

/// A grammar symbol, compared and hashed by (kind, name).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    Terminal(String),
    NonTerminal(String),
}

/// Symbols render as their name everywhere, including as JSON map keys.
impl Serialize for Symbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl Symbol {
    pub fn terminal(name: impl Into<String>) -> Self {
        Symbol::Terminal(name.into())
    }

    pub fn non_terminal(name: impl Into<String>) -> Self {
        Symbol::NonTerminal(name.into())
    }

    pub fn epsilon() -> Self {
        Symbol::Terminal(EPSILON.to_string())
    }

    pub fn end() -> Self {
        Symbol::Terminal(END_MARK.to_string())
    }

    pub fn name(&self) -> &str {
        match self {
            Symbol::Terminal(name) | Symbol::NonTerminal(name) => name.as_str(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }

    pub fn is_non_terminal(&self) -> bool {
        matches!(self, Symbol::NonTerminal(_))
    }

    pub fn is_epsilon(&self) -> bool {
        matches!(self, Symbol::Terminal(name) if name == EPSILON)
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Symbol::Terminal(name) if name == END_MARK)
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
