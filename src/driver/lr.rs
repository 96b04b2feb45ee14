use crate::grammar::{LrAction, LrAutomaton, LrTable, Symbol};

use super::{ParseError, ParseOutcome, Token, Verdict};

/// Shift-reduce parser over the ACTION/GOTO tables. Owns nothing but the
/// two per-parse stacks; tables and automaton are borrowed read-only.
pub struct LrDriver<'a> {
    automaton: &'a LrAutomaton,
    table: &'a LrTable,
}

impl<'a> LrDriver<'a> {
    pub fn new(automaton: &'a LrAutomaton, table: &'a LrTable) -> Self {
        Self { automaton, table }
    }

    pub fn parse(&self, tokens: &[Token]) -> ParseOutcome {
        let mut state_stack: Vec<usize> = vec![0];
        let mut symbol_stack: Vec<Symbol> = vec![Symbol::end()];
        let mut position = 0;
        let mut derivation: Vec<usize> = Vec::new();

        let rejected = |reason: ParseError, derivation: Vec<usize>| ParseOutcome {
            verdict: Verdict::Rejected(reason),
            derivation,
        };

        loop {
            let state = *state_stack.last().unwrap();
            let lookahead = match tokens.get(position) {
                Some(token) => token.terminal(),
                None => return rejected(ParseError::UnterminatedInput, derivation),
            };

            match self.table.action(state, &lookahead) {
                Some(LrAction::Shift(target)) => {
                    log::trace!("shift {} -> state {}", lookahead, target);
                    symbol_stack.push(lookahead);
                    state_stack.push(target);
                    position += 1;
                }
                Some(LrAction::Reduce(index)) => {
                    let production = self.automaton.production(index);
                    log::trace!("reduce {}", production);
                    for _ in 0..production.rhs().len() {
                        state_stack.pop();
                        symbol_stack.pop();
                    }
                    let top = *state_stack.last().unwrap();
                    match self.table.goto(top, &production.left) {
                        Some(target) => {
                            symbol_stack.push(production.left.clone());
                            state_stack.push(target);
                            derivation.push(index);
                        }
                        None => {
                            return rejected(
                                ParseError::NoGoto {
                                    state: top,
                                    non_terminal: production.left.name().to_string(),
                                },
                                derivation,
                            )
                        }
                    }
                }
                Some(LrAction::Accept) => {
                    log::trace!("accept");
                    return ParseOutcome {
                        verdict: Verdict::Accepted,
                        derivation,
                    };
                }
                None => {
                    return rejected(
                        ParseError::NoAction {
                            state,
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
