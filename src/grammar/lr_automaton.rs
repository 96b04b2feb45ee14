use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::Serialize;

use super::{Grammar, Production, Symbol};

/// A production with a dot: (production index, how many RHS symbols are
/// already recognized). The index refers to the automaton's production
/// list, which is the grammar's list plus the synthetic start production
/// at the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LrItem {
    pub production: usize,
    pub dot: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LrState {
    pub items: BTreeSet<LrItem>,
    pub edges: BTreeMap<Symbol, usize>,
}

/// The canonical collection of LR(0) item sets. State 0 is the closure of
/// the augmented start item; the remaining states are numbered in
/// discovery order and structurally deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LrAutomaton {
    productions: Vec<Production>,
    augmented: usize,
    states: Vec<LrState>,
}

impl LrAutomaton {
    pub fn build(grammar: &Grammar) -> Self {
        let start_name = grammar.fresh_name(grammar.start().name());
        let mut productions = grammar.productions().to_vec();
        let augmented = productions.len();
        productions.push(Production::new(
            Symbol::non_terminal(start_name),
            vec![grammar.start().clone()],
        ));

        let initial = close(
            &productions,
            BTreeSet::from([LrItem {
                production: augmented,
                dot: 0,
            }]),
        );
        let mut states = vec![LrState {
            items: initial,
            edges: BTreeMap::new(),
        }];

        let mut queue: VecDeque<usize> = VecDeque::from([0]);
        while let Some(current) = queue.pop_front() {
            let mut moved: BTreeMap<Symbol, BTreeSet<LrItem>> = BTreeMap::new();
            for item in &states[current].items {
                if let Some(symbol) = after_dot(&productions, item) {
                    moved.entry(symbol.clone()).or_default().insert(LrItem {
                        production: item.production,
                        dot: item.dot + 1,
                    });
                }
            }

            for (symbol, kernel) in moved {
                let closed = close(&productions, kernel);
                let target = match states.iter().position(|s| s.items == closed) {
                    Some(existing) => existing,
                    None => {
                        states.push(LrState {
                            items: closed,
                            edges: BTreeMap::new(),
                        });
                        queue.push_back(states.len() - 1);
                        states.len() - 1
                    }
                };
                states[current].edges.insert(symbol, target);
            }
        }

        Self {
            productions,
            augmented,
            states,
        }
    }

    pub fn states(&self) -> &[LrState] {
        &self.states
    }

    /// Production list including the synthetic start production.
    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn production(&self, index: usize) -> &Production {
        &self.productions[index]
    }

    pub fn augmented_index(&self) -> usize {
        self.augmented
    }

    pub fn transition(&self, state: usize, symbol: &Symbol) -> Option<usize> {
        self.states[state].edges.get(symbol).copied()
    }

    pub fn item_to_string(&self, item: &LrItem) -> String {
        let production = &self.productions[item.production];
        let mut output = format!("{} ->", production.left);
        for (i, symbol) in production.rhs().iter().enumerate() {
            if i == item.dot {
                output.push_str(" .");
            }
            output.push(' ');
            output.push_str(symbol.name());
        }
        if item.dot == production.rhs().len() {
            output.push_str(" .");
        }
        output
    }
}

fn after_dot<'a>(productions: &'a [Production], item: &LrItem) -> Option<&'a Symbol> {
    productions[item.production].rhs().get(item.dot)
}

fn close(productions: &[Production], mut items: BTreeSet<LrItem>) -> BTreeSet<LrItem> {
    let mut changed = true;
    while changed {
        changed = false;
        for item in items.clone() {
            if let Some(symbol) = after_dot(productions, &item) {
                if !symbol.is_non_terminal() {
                    continue;
                }
                for (index, production) in productions.iter().enumerate() {
                    if &production.left == symbol {
                        changed |= items.insert(LrItem {
                            production: index,
                            dot: 0,
                        });
                    }
                }
            }
        }
    }
    items
}
