use std::collections::BTreeMap;

use serde::Serialize;

use super::{FirstFollow, LrAutomaton, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LrAction {
    Shift(usize),
    Reduce(usize),
    Accept,
}

/// Two actions claimed the same ACTION cell; the first one stays and the
/// grammar is not deterministic under this construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LrConflict {
    pub state: usize,
    pub terminal: Symbol,
    pub kept: LrAction,
    pub rejected: LrAction,
}

/// ACTION/GOTO tables derived from the LR(0) automaton, with FOLLOW sets as
/// reduce lookahead. This is weaker than LR(1) item lookahead: it can report
/// conflicts on grammars a full LR(1) construction would accept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LrTable {
    action: Vec<BTreeMap<Symbol, LrAction>>,
    goto: Vec<BTreeMap<Symbol, usize>>,
    conflicts: Vec<LrConflict>,
}

impl LrTable {
    pub fn build(automaton: &LrAutomaton, sets: &FirstFollow) -> Self {
        let states = automaton.states().len();
        let mut table = Self {
            action: vec![BTreeMap::new(); states],
            goto: vec![BTreeMap::new(); states],
            conflicts: Vec::new(),
        };

        for (index, state) in automaton.states().iter().enumerate() {
            for (symbol, &target) in &state.edges {
                if symbol.is_terminal() {
                    table.set(index, symbol.clone(), LrAction::Shift(target));
                } else {
                    table.goto[index].insert(symbol.clone(), target);
                }
            }

            for item in &state.items {
                let production = automaton.production(item.production);
                if item.dot != production.rhs().len() {
                    continue;
                }
                if item.production == automaton.augmented_index() {
                    table.set(index, Symbol::end(), LrAction::Accept);
                } else {
                    for terminal in sets.follow(&production.left) {
                        table.set(index, terminal, LrAction::Reduce(item.production));
                    }
                }
            }
        }

        table
    }

    fn set(&mut self, state: usize, terminal: Symbol, action: LrAction) {
        match self.action[state].get(&terminal) {
            None => {
                self.action[state].insert(terminal, action);
            }
            Some(&kept) if kept != action => {
                self.conflicts.push(LrConflict {
                    state,
                    terminal,
                    kept,
                    rejected: action,
                });
            }
            Some(_) => {}
        }
    }

    pub fn action(&self, state: usize, terminal: &Symbol) -> Option<LrAction> {
        self.action.get(state)?.get(terminal).copied()
    }

    pub fn goto(&self, state: usize, non_terminal: &Symbol) -> Option<usize> {
        self.goto.get(state)?.get(non_terminal).copied()
    }

    pub fn states(&self) -> usize {
        self.action.len()
    }

    pub fn conflicts(&self) -> &[LrConflict] {
        &self.conflicts
    }

    pub fn is_deterministic(&self) -> bool {
        self.conflicts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{FirstFollow, Grammar};

    fn analyzed(text: &str) -> (Grammar, FirstFollow, LrAutomaton, LrTable) {
        let g = Grammar::parse(text).unwrap();
        let sets = FirstFollow::build(&g);
        let automaton = LrAutomaton::build(&g);
        let table = LrTable::build(&automaton, &sets);
        (g, sets, automaton, table)
    }

    #[test]
    fn expression_grammar_is_deterministic() {
        let (g, _, automaton, table) = analyzed(
            "E -> E + T | E - T | T\nT -> T * F | T / F | F\nF -> ( E ) | num",
        );

        assert!(table.is_deterministic());

        // State 0 shifts on ( and num, never reduces.
        assert!(matches!(
            table.action(0, &Symbol::terminal("(")),
            Some(LrAction::Shift(_))
        ));
        assert!(matches!(
            table.action(0, &Symbol::terminal("num")),
            Some(LrAction::Shift(_))
        ));
        assert_eq!(table.action(0, &Symbol::terminal("+")), None);

        // The state reached on E from state 0 accepts at end of input.
        let on_e = automaton.transition(0, g.start()).unwrap();
        assert_eq!(table.action(on_e, &Symbol::end()), Some(LrAction::Accept));

        // The state reached on num reduces F -> num on every FOLLOW(F) terminal.
        let on_num = automaton.transition(0, &Symbol::terminal("num")).unwrap();
        match table.action(on_num, &Symbol::terminal("+")) {
            Some(LrAction::Reduce(index)) => {
                assert_eq!(automaton.production(index).to_string(), "F -> num");
            }
            other => panic!("expected reduce, got {:?}", other),
        }
    }

    #[test]
    fn shift_reduce_conflict_is_reported() {
        // Dangling-else shape: S can both shift "e" and reduce S -> i S.
        let (_, _, _, table) = analyzed("S -> i S e S | i S | a");
        assert!(!table.is_deterministic());
        assert!(table.conflicts().iter().any(|c| {
            c.terminal == Symbol::terminal("e")
                && matches!(c.kept, LrAction::Shift(_))
                && matches!(c.rejected, LrAction::Reduce(_))
        }));
    }

    #[test]
    fn reduce_reduce_conflict_is_reported() {
        let (_, _, _, table) = analyzed("S -> A | B\nA -> a\nB -> a");
        assert!(!table.is_deterministic());
        assert!(table.conflicts().iter().any(|c| {
            matches!(c.kept, LrAction::Reduce(_)) && matches!(c.rejected, LrAction::Reduce(_))
        }));
    }
}
