use std::collections::BTreeMap;

use serde::Serialize;

use super::{FirstFollow, Grammar, Symbol};

/// Two productions claimed the same predictive cell; the first one stays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ll1Conflict {
    pub non_terminal: Symbol,
    pub terminal: Symbol,
    pub kept: usize,
    pub rejected: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ll1Table {
    rows: BTreeMap<Symbol, BTreeMap<Symbol, usize>>,
    conflicts: Vec<Ll1Conflict>,
}

impl Ll1Table {
    pub fn build(grammar: &Grammar, sets: &FirstFollow) -> Self {
        let mut table = Self {
            rows: grammar
                .non_terminals()
                .iter()
                .map(|nt| (nt.clone(), BTreeMap::new()))
                .collect(),
            conflicts: Vec::new(),
        };

        for (index, production) in grammar.productions().iter().enumerate() {
            let (first, derives_epsilon) = sets.first_of_sequence(production.rhs());
            for terminal in first {
                table.set(&production.left, terminal, index);
            }
            if derives_epsilon {
                for terminal in sets.follow(&production.left) {
                    table.set(&production.left, terminal, index);
                }
            }
        }

        table
    }

    fn set(&mut self, non_terminal: &Symbol, terminal: Symbol, index: usize) {
        let row = self.rows.get_mut(non_terminal).unwrap();
        match row.get(&terminal) {
            None => {
                row.insert(terminal, index);
            }
            Some(&kept) if kept != index => {
                self.conflicts.push(Ll1Conflict {
                    non_terminal: non_terminal.clone(),
                    terminal,
                    kept,
                    rejected: index,
                });
            }
            Some(_) => {}
        }
    }

    pub fn get(&self, non_terminal: &Symbol, terminal: &Symbol) -> Option<usize> {
        self.rows.get(non_terminal)?.get(terminal).copied()
    }

    pub fn conflicts(&self) -> &[Ll1Conflict] {
        &self.conflicts
    }

    pub fn is_ll1(&self) -> bool {
        self.conflicts.is_empty()
    }
}
