use std::collections::HashSet;

use super::{Grammar, GrammarError, EPSILON};

impl Grammar {
    /// Loads a grammar from the `A -> α | β` notation. A line starting with
    /// `|` continues the previous left side. Every symbol that appears on
    /// some left side is a non-terminal; everything else is a terminal. The
    /// first left side is the start symbol.
    pub fn parse(text: &str) -> Result<Self, GrammarError> {
        let mut raw_rules: Vec<(String, &str)> = Vec::new();

        let mut previous_left: Option<String> = None;
        for (i, line) in text.lines().enumerate() {
            if line.chars().all(|c| c.is_whitespace()) {
                continue;
            }
            let parts: Vec<&str> = line.split("->").collect();
            if parts.len() > 2 {
                return Err(GrammarError::Syntax {
                    line: i + 1,
                    message: "too many \"->\"".to_string(),
                });
            }
            let (left, rights) = if parts.len() == 2 {
                let left = parts[0].trim();
                if left.is_empty() {
                    return Err(GrammarError::Syntax {
                        line: i + 1,
                        message: "empty left side".to_string(),
                    });
                }
                if left.split_whitespace().count() != 1 {
                    return Err(GrammarError::Syntax {
                        line: i + 1,
                        message: "left side contains whitespace".to_string(),
                    });
                }
                (left.to_string(), parts[1].trim())
            } else {
                let trimmed = parts[0].trim();
                match (&previous_left, trimmed.strip_prefix('|')) {
                    (Some(left), Some(rest)) => (left.clone(), rest.trim()),
                    _ => {
                        return Err(GrammarError::Syntax {
                            line: i + 1,
                            message: "cannot find left side".to_string(),
                        })
                    }
                }
            };

            previous_left = Some(left.clone());
            raw_rules.push((left, rights));
        }

        if raw_rules.is_empty() {
            return Err(GrammarError::Syntax {
                line: 0,
                message: "grammar contains no productions".to_string(),
            });
        }

        let mut non_terminals: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for (left, _) in &raw_rules {
            if seen.insert(left.clone()) {
                non_terminals.push(left.clone());
            }
        }

        let mut terminals: Vec<String> = Vec::new();
        let mut rules: Vec<(String, Vec<String>)> = Vec::new();
        for (left, rights) in &raw_rules {
            for alternative in rights.split('|') {
                let mut symbols: Vec<String> = Vec::new();
                for word in alternative.split_whitespace() {
                    let name = if word == "eps" { EPSILON } else { word };
                    if name != EPSILON && !seen.contains(name) {
                        if !terminals.iter().any(|t| t == name) {
                            terminals.push(name.to_string());
                        }
                    }
                    symbols.push(name.to_string());
                }
                rules.push((left.clone(), symbols));
            }
        }

        let start = raw_rules[0].0.clone();
        Grammar::new(terminals, non_terminals, rules, &start)
    }
}
