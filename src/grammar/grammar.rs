use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

use super::symbol::Symbol;
use super::{END_MARK, EPSILON};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
    #[error("symbol \"{0}\" is declared both as a terminal and as a non-terminal")]
    DuplicateSymbol(String),
    #[error("symbol \"{0}\" is used in a production but never declared")]
    UndeclaredSymbol(String),
    #[error("non-terminal \"{0}\" never appears on the left side of a production")]
    DanglingNonTerminal(String),
    #[error("start symbol \"{0}\" is not a declared non-terminal")]
    UnknownStartSymbol(String),
    #[error("\"{0}\" is reserved and may not appear in a production")]
    ReservedSymbol(String),
    #[error("\"{0}\" may only appear as the sole right-hand side of a production")]
    MisplacedEpsilon(String),
    #[error("cannot introduce \"{0}\": the name is already taken")]
    NameCollision(String),
}

/// A rewrite rule. Identified everywhere else (tables, conflicts, derivations)
/// by its index in the owning grammar's production list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Production {
    pub left: Symbol,
    pub right: Vec<Symbol>,
}

impl Production {
    pub fn new(left: Symbol, right: Vec<Symbol>) -> Self {
        Self { left, right }
    }

    pub fn is_epsilon(&self) -> bool {
        self.right.len() == 1 && self.right[0].is_epsilon()
    }

    /// Right-hand side with the empty marker elided, so an ε-production
    /// contributes zero symbols to stacks and item dots.
    pub fn rhs(&self) -> &[Symbol] {
        if self.is_epsilon() {
            &[]
        } else {
            &self.right
        }
    }
}

impl std::fmt::Display for Production {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ->", self.left)?;
        for symbol in &self.right {
            write!(f, " {}", symbol)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grammar {
    terminals: Vec<Symbol>,
    non_terminals: Vec<Symbol>,
    productions: Vec<Production>,
    start: Symbol,
}

impl Grammar {
    /// Builds a validated grammar from declared symbol names and rules given
    /// as (left name, right-hand side names). The end marker is always part
    /// of the terminal alphabet and need not be declared.
    pub fn new(
        terminals: Vec<String>,
        non_terminals: Vec<String>,
        rules: Vec<(String, Vec<String>)>,
        start: &str,
    ) -> Result<Self, GrammarError> {
        let mut terminal_set: HashSet<&str> = HashSet::new();
        for name in &terminals {
            terminal_set.insert(name.as_str());
        }
        let mut non_terminal_set: HashSet<&str> = HashSet::new();
        for name in &non_terminals {
            if terminal_set.contains(name.as_str()) {
                return Err(GrammarError::DuplicateSymbol(name.clone()));
            }
            non_terminal_set.insert(name.as_str());
        }
        if non_terminal_set.contains(END_MARK) || terminal_set.contains(END_MARK) {
            return Err(GrammarError::ReservedSymbol(END_MARK.to_string()));
        }
        if !non_terminal_set.contains(start) {
            return Err(GrammarError::UnknownStartSymbol(start.to_string()));
        }

        let classify = |name: &str| -> Result<Symbol, GrammarError> {
            if non_terminal_set.contains(name) {
                Ok(Symbol::non_terminal(name))
            } else if terminal_set.contains(name) {
                Ok(Symbol::terminal(name))
            } else {
                Err(GrammarError::UndeclaredSymbol(name.to_string()))
            }
        };

        let mut productions = Vec::with_capacity(rules.len());
        for (left, right) in rules {
            if !non_terminal_set.contains(left.as_str()) {
                return Err(GrammarError::UndeclaredSymbol(left));
            }
            let mut symbols = Vec::with_capacity(right.len());
            for name in &right {
                if name == END_MARK {
                    return Err(GrammarError::ReservedSymbol(name.clone()));
                }
                if name == EPSILON {
                    if right.len() != 1 {
                        return Err(GrammarError::MisplacedEpsilon(name.clone()));
                    }
                    symbols.push(Symbol::epsilon());
                } else {
                    symbols.push(classify(name)?);
                }
            }
            if symbols.is_empty() {
                symbols.push(Symbol::epsilon());
            }
            productions.push(Production::new(Symbol::non_terminal(left), symbols));
        }

        let mut grammar = Self {
            terminals: terminals
                .iter()
                .map(|name| Symbol::terminal(name.as_str()))
                .collect(),
            non_terminals: non_terminals
                .iter()
                .map(|name| Symbol::non_terminal(name.as_str()))
                .collect(),
            productions,
            start: Symbol::non_terminal(start),
        };
        grammar.terminals.push(Symbol::end());
        grammar.check_dangling()?;
        Ok(grammar)
    }

    fn check_dangling(&self) -> Result<(), GrammarError> {
        let defined: HashSet<&Symbol> = self.productions.iter().map(|p| &p.left).collect();
        if !defined.contains(&self.start) {
            return Err(GrammarError::DanglingNonTerminal(
                self.start.name().to_string(),
            ));
        }
        for production in &self.productions {
            for symbol in production.rhs() {
                if symbol.is_non_terminal() && !defined.contains(symbol) {
                    return Err(GrammarError::DanglingNonTerminal(
                        symbol.name().to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn terminals(&self) -> &[Symbol] {
        &self.terminals
    }

    pub fn non_terminals(&self) -> &[Symbol] {
        &self.non_terminals
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn start(&self) -> &Symbol {
        &self.start
    }

    pub fn contains(&self, name: &str) -> bool {
        self.terminals.iter().any(|s| s.name() == name)
            || self.non_terminals.iter().any(|s| s.name() == name)
    }

    /// Appends primes until the name is unused.
    pub fn fresh_name(&self, base: &str) -> String {
        let mut name = base.to_string();
        while self.contains(&name) {
            name.push('\'');
        }
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn rule(left: &str, right: &[&str]) -> (String, Vec<String>) {
        (left.to_string(), names(right))
    }

    #[test]
    fn end_mark_is_implicit() {
        let g = Grammar::new(
            names(&["a"]),
            names(&["S"]),
            vec![rule("S", &["a"])],
            "S",
        )
        .unwrap();
        assert!(g.terminals().iter().any(|t| t.is_end()));
        assert_eq!(g.start(), &Symbol::non_terminal("S"));
    }

    #[test]
    fn undeclared_symbol_is_rejected() {
        let err = Grammar::new(
            names(&["a"]),
            names(&["S"]),
            vec![rule("S", &["a", "b"])],
            "S",
        )
        .unwrap_err();
        assert_eq!(err, GrammarError::UndeclaredSymbol("b".to_string()));
    }

    #[test]
    fn dangling_non_terminal_is_rejected() {
        let err = Grammar::new(
            names(&["a"]),
            names(&["S", "B"]),
            vec![rule("S", &["B"])],
            "S",
        )
        .unwrap_err();
        assert_eq!(err, GrammarError::DanglingNonTerminal("B".to_string()));
    }

    #[test]
    fn epsilon_only_alone() {
        let err = Grammar::new(
            names(&["a"]),
            names(&["S"]),
            vec![rule("S", &["a", "ε"])],
            "S",
        )
        .unwrap_err();
        assert!(matches!(err, GrammarError::MisplacedEpsilon(_)));

        let g = Grammar::new(names(&["a"]), names(&["S"]), vec![rule("S", &["ε"])], "S").unwrap();
        assert!(g.productions()[0].is_epsilon());
        assert!(g.productions()[0].rhs().is_empty());
    }

    #[test]
    fn end_mark_is_reserved_in_rules() {
        let err = Grammar::new(
            names(&["a"]),
            names(&["S"]),
            vec![rule("S", &["a", "$"])],
            "S",
        )
        .unwrap_err();
        assert_eq!(err, GrammarError::ReservedSymbol("$".to_string()));
    }

    #[test]
    fn terminal_and_non_terminal_sets_are_disjoint() {
        let err = Grammar::new(
            names(&["a", "S"]),
            names(&["S"]),
            vec![rule("S", &["a"])],
            "S",
        )
        .unwrap_err();
        assert_eq!(err, GrammarError::DuplicateSymbol("S".to_string()));
    }
}
