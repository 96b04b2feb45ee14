use crate::grammar::{Grammar, Ll1Table, Symbol};

use super::{ParseError, ParseOutcome, Token, Verdict};

/// Table-driven predictive parser. Borrows the table read-only; the symbol
/// stack lives only for the duration of one `parse` call, so one driver can
/// serve any number of parses.
pub struct Ll1Driver<'a> {
    grammar: &'a Grammar,
    table: &'a Ll1Table,
}

impl<'a> Ll1Driver<'a> {
    pub fn new(grammar: &'a Grammar, table: &'a Ll1Table) -> Self {
        Self { grammar, table }
    }

    pub fn parse(&self, tokens: &[Token]) -> ParseOutcome {
        let mut stack: Vec<Symbol> = vec![Symbol::end(), self.grammar.start().clone()];
        let mut position = 0;
        let mut derivation: Vec<usize> = Vec::new();

        let rejected = |reason: ParseError, derivation: Vec<usize>| ParseOutcome {
            verdict: Verdict::Rejected(reason),
            derivation,
        };

        loop {
            let lookahead = match tokens.get(position) {
                Some(token) => token.terminal(),
                None => return rejected(ParseError::UnterminatedInput, derivation),
            };
            let top = stack.last().cloned().unwrap_or_else(Symbol::end);

            if top.is_end() && lookahead.is_end() {
                return ParseOutcome {
                    verdict: Verdict::Accepted,
                    derivation,
                };
            }

            if top.is_terminal() {
                if top == lookahead {
                    log::trace!("match {}", top);
                    stack.pop();
                    position += 1;
                } else {
                    return rejected(
                        ParseError::TerminalMismatch {
                            expected: top.name().to_string(),
                            found: lookahead.name().to_string(),
                            at: position,
                        },
                        derivation,
                    );
                }
                continue;
            }

            match self.table.get(&top, &lookahead) {
                Some(index) => {
                    let production = &self.grammar.productions()[index];
                    log::trace!("expand {}", production);
                    derivation.push(index);
                    stack.pop();
                    for symbol in production.rhs().iter().rev() {
                        stack.push(symbol.clone());
                    }
                }
                None => {
                    return rejected(
                        ParseError::NoTableEntry {
                            non_terminal: top.name().to_string(),
                            lookahead: lookahead.name().to_string(),
                            at: position,
                        },
                        derivation,
                    )
                }
            }
        }
    }
}
