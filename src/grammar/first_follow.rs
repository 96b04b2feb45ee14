use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::{Grammar, Symbol};

/// Nullable / FIRST / FOLLOW sets, grown to a fixed point over the grammar.
/// FOLLOW is only ever computed against a finished FIRST pass: both live in
/// this struct and `build` runs the passes in order, so a FOLLOW set without
/// its FIRST sets cannot be observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FirstFollow {
    nullable: BTreeSet<Symbol>,
    first: BTreeMap<Symbol, BTreeSet<Symbol>>,
    follow: BTreeMap<Symbol, BTreeSet<Symbol>>,
}

impl FirstFollow {
    pub fn build(grammar: &Grammar) -> Self {
        let mut sets = Self {
            nullable: BTreeSet::new(),
            first: grammar
                .non_terminals()
                .iter()
                .map(|nt| (nt.clone(), BTreeSet::new()))
                .collect(),
            follow: grammar
                .non_terminals()
                .iter()
                .map(|nt| (nt.clone(), BTreeSet::new()))
                .collect(),
        };
        sets.compute_nullable(grammar);
        sets.compute_first(grammar);
        sets.compute_follow(grammar);
        sets
    }

    /// True if the symbol derives the empty string.
    pub fn is_nullable(&self, symbol: &Symbol) -> bool {
        symbol.is_epsilon() || self.nullable.contains(symbol)
    }

    /// FIRST(X) without the empty marker; ε membership is `is_nullable`.
    /// For a terminal this is the terminal itself.
    pub fn first(&self, symbol: &Symbol) -> BTreeSet<Symbol> {
        match symbol {
            Symbol::Terminal(_) if symbol.is_epsilon() => BTreeSet::new(),
            Symbol::Terminal(_) => BTreeSet::from([symbol.clone()]),
            Symbol::NonTerminal(_) => self.first.get(symbol).cloned().unwrap_or_default(),
        }
    }

    pub fn follow(&self, non_terminal: &Symbol) -> BTreeSet<Symbol> {
        self.follow.get(non_terminal).cloned().unwrap_or_default()
    }

    /// Borrowing accessors for rendering; `None` for anything that is not a
    /// known non-terminal.
    pub fn first_set(&self, non_terminal: &Symbol) -> Option<&BTreeSet<Symbol>> {
        self.first.get(non_terminal)
    }

    pub fn follow_set(&self, non_terminal: &Symbol) -> Option<&BTreeSet<Symbol>> {
        self.follow.get(non_terminal)
    }

    /// FIRST of a symbol sequence: the left-to-right walk that stops at the
    /// first non-nullable symbol. The boolean reports whether the whole
    /// sequence derives ε.
    pub fn first_of_sequence(&self, sequence: &[Symbol]) -> (BTreeSet<Symbol>, bool) {
        let mut first = BTreeSet::new();
        for symbol in sequence {
            first.extend(self.first(symbol));
            if !self.is_nullable(symbol) {
                return (first, false);
            }
        }
        (first, true)
    }

    fn compute_nullable(&mut self, grammar: &Grammar) {
        let mut changed = true;
        while changed {
            changed = false;
            for production in grammar.productions() {
                if self.nullable.contains(&production.left) {
                    continue;
                }
                let all_nullable = production.rhs().iter().all(|s| self.is_nullable(s));
                if all_nullable {
                    self.nullable.insert(production.left.clone());
                    changed = true;
                }
            }
        }
    }

    fn compute_first(&mut self, grammar: &Grammar) {
        let mut changed = true;
        while changed {
            changed = false;
            for production in grammar.productions() {
                let (first, _) = self.first_of_sequence(production.rhs());
                let set = self.first.get_mut(&production.left).unwrap();
                let before = set.len();
                set.extend(first);
                if set.len() != before {
                    changed = true;
                }
            }
        }
    }

    fn compute_follow(&mut self, grammar: &Grammar) {
        self.follow
            .get_mut(grammar.start())
            .unwrap()
            .insert(Symbol::end());

        let mut changed = true;
        while changed {
            changed = false;
            for production in grammar.productions() {
                let rhs = production.rhs();
                for (i, symbol) in rhs.iter().enumerate() {
                    if !symbol.is_non_terminal() {
                        continue;
                    }
                    let (suffix_first, suffix_nullable) = self.first_of_sequence(&rhs[i + 1..]);
                    let mut addition = suffix_first;
                    if suffix_nullable {
                        addition.extend(self.follow[&production.left].iter().cloned());
                    }
                    let set = self.follow.get_mut(symbol).unwrap();
                    let before = set.len();
                    set.extend(addition);
                    if set.len() != before {
                        changed = true;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expression_grammar() -> Grammar {
        Grammar::parse("E -> E + T | E - T | T\nT -> T * F | T / F | F\nF -> ( E ) | num")
            .unwrap()
            .eliminate_left_recursion()
            .unwrap()
    }

    fn terminals(names: &[&str]) -> BTreeSet<Symbol> {
        names.iter().map(|n| Symbol::terminal(*n)).collect()
    }

    #[test]
    fn expression_first_sets() {
        let g = expression_grammar();
        let sets = FirstFollow::build(&g);

        let f = sets.first(&Symbol::non_terminal("F"));
        assert_eq!(f, terminals(&["(", "num"]));
        assert_eq!(sets.first(&Symbol::non_terminal("T")), f);
        assert_eq!(sets.first(&Symbol::non_terminal("E")), f);

        assert!(sets.is_nullable(&Symbol::non_terminal("E'")));
        assert!(sets.is_nullable(&Symbol::non_terminal("T'")));
        assert!(!sets.is_nullable(&Symbol::non_terminal("E")));
        assert_eq!(
            sets.first(&Symbol::non_terminal("E'")),
            terminals(&["+", "-"])
        );
    }

    #[test]
    fn expression_follow_sets() {
        let g = expression_grammar();
        let sets = FirstFollow::build(&g);

        let follow_e = sets.follow(&Symbol::non_terminal("E"));
        assert!(follow_e.contains(&Symbol::terminal(")")));
        assert!(follow_e.contains(&Symbol::end()));

        assert_eq!(
            sets.follow(&Symbol::non_terminal("T")),
            terminals(&["+", "-", ")", "$"])
        );
        assert_eq!(
            sets.follow(&Symbol::non_terminal("F")),
            terminals(&["+", "-", "*", "/", ")", "$"])
        );
    }

    #[test]
    fn terminal_first_is_itself() {
        let g = expression_grammar();
        let sets = FirstFollow::build(&g);
        assert_eq!(
            sets.first(&Symbol::terminal("num")),
            terminals(&["num"])
        );
    }

    #[test]
    fn sets_only_grow_between_builds() {
        let g = expression_grammar();
        let a = FirstFollow::build(&g);
        let b = FirstFollow::build(&g);
        assert_eq!(a, b);
    }
}
