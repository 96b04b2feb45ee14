use std::collections::{HashMap, HashSet};

use super::{Grammar, GrammarError, Symbol, EPSILON};

impl Grammar {
    /// Rewrites every directly left-recursive non-terminal A as
    /// A -> β A' and A' -> α A' | ε, leaving everything else untouched.
    /// The input grammar is not modified. Indirect left recursion is not
    /// handled here.
    pub fn eliminate_left_recursion(&self) -> Result<Grammar, GrammarError> {
        let recursive: HashSet<&Symbol> = self
            .productions()
            .iter()
            .filter(|p| p.rhs().first() == Some(&p.left))
            .map(|p| &p.left)
            .collect();

        let mut primed: HashMap<&Symbol, String> = HashMap::new();
        for non_terminal in self.non_terminals() {
            if recursive.contains(non_terminal) {
                let name = format!("{}'", non_terminal.name());
                if self.contains(&name) {
                    return Err(GrammarError::NameCollision(name));
                }
                primed.insert(non_terminal, name);
            }
        }

        let mut rules: Vec<(String, Vec<String>)> = Vec::new();
        // Tails of the A-headed alternatives, in order of appearance.
        let mut tails: HashMap<&Symbol, Vec<Vec<String>>> = HashMap::new();
        let mut order: Vec<&Symbol> = Vec::new();

        for production in self.productions() {
            let left = &production.left;
            match primed.get(left) {
                None => {
                    rules.push((
                        left.name().to_string(),
                        production.right.iter().map(|s| s.name().to_string()).collect(),
                    ));
                }
                Some(prime) => {
                    if !tails.contains_key(left) {
                        order.push(left);
                        tails.insert(left, Vec::new());
                    }
                    if production.rhs().first() == Some(left) {
                        let tail: Vec<String> = production.rhs()[1..]
                            .iter()
                            .map(|s| s.name().to_string())
                            .collect();
                        tails.get_mut(left).unwrap().push(tail);
                    } else {
                        let mut right: Vec<String> = production
                            .rhs()
                            .iter()
                            .map(|s| s.name().to_string())
                            .collect();
                        right.push(prime.clone());
                        rules.push((left.name().to_string(), right));
                    }
                }
            }
        }

        let mut non_terminals: Vec<String> =
            self.non_terminals().iter().map(|s| s.name().to_string()).collect();
        for left in order {
            let prime = primed[left].clone();
            for mut tail in tails.remove(left).unwrap() {
                tail.push(prime.clone());
                rules.push((prime.clone(), tail));
            }
            rules.push((prime.clone(), vec![EPSILON.to_string()]));
            non_terminals.push(prime);
        }

        let terminals: Vec<String> = self
            .terminals()
            .iter()
            .filter(|t| !t.is_end())
            .map(|s| s.name().to_string())
            .collect();
        Grammar::new(terminals, non_terminals, rules, self.start().name())
    }
}
