extern crate wasm_bindgen;

use wasm_bindgen::prelude::*;

pub mod driver;
pub mod grammar;
pub mod lexer;

pub use driver::{Ll1Driver, LrDriver, ParseError, ParseOutcome, Token, Verdict};
pub use grammar::{FirstFollow, Grammar, Ll1Table, LrAutomaton, LrTable};

#[wasm_bindgen]
pub fn nullable_first_follow_to_json(grammar: &str) -> String {
    match Grammar::parse(grammar) {
        Ok(g) => {
            let sets = FirstFollow::build(&g);
            sets.to_output_vec(&g).to_json()
        }
        Err(e) => format!("{{\"error\":\"{}\"}}", e),
    }
}

#[wasm_bindgen]
pub fn ll1_table_to_json(grammar: &str) -> String {
    match Grammar::parse(grammar) {
        Ok(g) => {
            let sets = FirstFollow::build(&g);
            Ll1Table::build(&g, &sets).to_output(&g).to_json()
        }
        Err(e) => format!("{{\"error\":\"{}\"}}", e),
    }
}

#[wasm_bindgen]
pub fn lr0_table_to_json(grammar: &str) -> String {
    match Grammar::parse(grammar) {
        Ok(g) => {
            let sets = FirstFollow::build(&g);
            let automaton = LrAutomaton::build(&g);
            LrTable::build(&automaton, &sets)
                .to_output(&g, &automaton)
                .to_json()
        }
        Err(e) => format!("{{\"error\":\"{}\"}}", e),
    }
}

#[wasm_bindgen]
pub fn parse_expression_to_json(grammar: &str, expression: &str, bottom_up: bool) -> String {
    let g = match Grammar::parse(grammar) {
        Ok(g) => g,
        Err(e) => return format!("{{\"error\":\"{}\"}}", e),
    };
    let sets = FirstFollow::build(&g);
    let tokens = lexer::tokenize(expression);
    let outcome = if bottom_up {
        let automaton = LrAutomaton::build(&g);
        let table = LrTable::build(&automaton, &sets);
        LrDriver::new(&automaton, &table).parse(&tokens)
    } else {
        let table = Ll1Table::build(&g, &sets);
        Ll1Driver::new(&g, &table).parse(&tokens)
    };
    serde_json::to_string(&outcome).unwrap()
}


#[cfg(test)]
mod end_to_end_tests {
    use crate::driver::{Ll1Driver, LrDriver, ParseError, Verdict};
    use crate::grammar::{FirstFollow, Grammar, Ll1Table, LrAutomaton, LrTable, Production, Symbol};
    use crate::lexer;

    const EXPRESSION_GRAMMAR: &str =
        "E -> E + T | E - T | T\nT -> T * F | T / F | F\nF -> ( E ) | num";

    fn leftmost_replay(productions: &[Production], start: &Symbol, derivation: &[usize]) -> Vec<Symbol> {
        let mut form = vec![start.clone()];
        for &index in derivation {
            let production = &productions[index];
            let at = form
                .iter()
                .position(|s| s.is_non_terminal())
                .expect("no non-terminal left to expand");
            assert_eq!(form[at], production.left);
            form.splice(at..=at, production.rhs().iter().cloned());
        }
        form
    }

    fn rightmost_replay(productions: &[Production], start: &Symbol, derivation: &[usize]) -> Vec<Symbol> {
        let mut form = vec![start.clone()];
        for &index in derivation.iter().rev() {
            let production = &productions[index];
            let at = form
                .iter()
                .rposition(|s| s.is_non_terminal())
                .expect("no non-terminal left to expand");
            assert_eq!(form[at], production.left);
            form.splice(at..=at, production.rhs().iter().cloned());
        }
        form
    }

    fn token_symbols(expression: &str) -> Vec<Symbol> {
        lexer::tokenize(expression)
            .iter()
            .filter(|t| !t.is_end())
            .map(|t| t.terminal())
            .collect()
    }

    #[test]
    fn ll1_accepts_and_rederives() {
        let _ = env_logger::builder().is_test(true).try_init();
        let g = Grammar::parse(EXPRESSION_GRAMMAR)
            .unwrap()
            .eliminate_left_recursion()
            .unwrap();
        let sets = FirstFollow::build(&g);
        let table = Ll1Table::build(&g, &sets);
        assert!(table.is_ll1());

        let driver = Ll1Driver::new(&g, &table);
        let outcome = driver.parse(&lexer::tokenize("3+4*5"));
        assert!(outcome.is_accepted());

        let form = leftmost_replay(g.productions(), g.start(), &outcome.derivation);
        assert_eq!(form, token_symbols("3+4*5"));
    }

    #[test]
    fn lr_accepts_and_rederives() {
        let _ = env_logger::builder().is_test(true).try_init();
        let g = Grammar::parse(EXPRESSION_GRAMMAR).unwrap();
        let sets = FirstFollow::build(&g);
        let automaton = LrAutomaton::build(&g);
        let table = LrTable::build(&automaton, &sets);
        assert!(table.is_deterministic());

        let driver = LrDriver::new(&automaton, &table);
        let outcome = driver.parse(&lexer::tokenize("3+4*5"));
        assert!(outcome.is_accepted());

        // Reduce order read backwards is a rightmost derivation.
        let form = rightmost_replay(g.productions(), g.start(), &outcome.derivation);
        assert_eq!(form, token_symbols("3+4*5"));
    }

    #[test]
    fn parenthesized_expression_is_accepted_by_both() {
        let lr_grammar = Grammar::parse(EXPRESSION_GRAMMAR).unwrap();
        let ll_grammar = lr_grammar.eliminate_left_recursion().unwrap();
        let tokens = lexer::tokenize("(1+2)*3");

        let sets = FirstFollow::build(&ll_grammar);
        let table = Ll1Table::build(&ll_grammar, &sets);
        assert!(Ll1Driver::new(&ll_grammar, &table).parse(&tokens).is_accepted());

        let sets = FirstFollow::build(&lr_grammar);
        let automaton = LrAutomaton::build(&lr_grammar);
        let table = LrTable::build(&automaton, &sets);
        assert!(LrDriver::new(&automaton, &table).parse(&tokens).is_accepted());
    }

    #[test]
    fn truncated_input_is_rejected_by_both() {
        let lr_grammar = Grammar::parse(EXPRESSION_GRAMMAR).unwrap();
        let ll_grammar = lr_grammar.eliminate_left_recursion().unwrap();
        let tokens = lexer::tokenize("3+");

        let sets = FirstFollow::build(&ll_grammar);
        let table = Ll1Table::build(&ll_grammar, &sets);
        let outcome = Ll1Driver::new(&ll_grammar, &table).parse(&tokens);
        match outcome.verdict {
            Verdict::Rejected(ParseError::NoTableEntry { lookahead, at, .. }) => {
                assert_eq!(lookahead, "$");
                assert_eq!(at, 2);
            }
            other => panic!("expected rejection, got {:?}", other),
        }

        let sets = FirstFollow::build(&lr_grammar);
        let automaton = LrAutomaton::build(&lr_grammar);
        let table = LrTable::build(&automaton, &sets);
        let outcome = LrDriver::new(&automaton, &table).parse(&tokens);
        match outcome.verdict {
            Verdict::Rejected(ParseError::NoAction { lookahead, at, .. }) => {
                assert_eq!(lookahead, "$");
                assert_eq!(at, 2);
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn leading_operator_is_rejected_at_the_first_token() {
        let lr_grammar = Grammar::parse(EXPRESSION_GRAMMAR).unwrap();
        let ll_grammar = lr_grammar.eliminate_left_recursion().unwrap();
        let tokens = lexer::tokenize("*3");

        let sets = FirstFollow::build(&ll_grammar);
        let table = Ll1Table::build(&ll_grammar, &sets);
        let outcome = Ll1Driver::new(&ll_grammar, &table).parse(&tokens);
        match outcome.verdict {
            Verdict::Rejected(ParseError::NoTableEntry { lookahead, at, .. }) => {
                assert_eq!(lookahead, "*");
                assert_eq!(at, 0);
            }
            other => panic!("expected rejection, got {:?}", other),
        }
        assert!(outcome.derivation.is_empty());

        let sets = FirstFollow::build(&lr_grammar);
        let automaton = LrAutomaton::build(&lr_grammar);
        let table = LrTable::build(&automaton, &sets);
        let outcome = LrDriver::new(&automaton, &table).parse(&tokens);
        match outcome.verdict {
            Verdict::Rejected(ParseError::NoAction { state, lookahead, at }) => {
                assert_eq!(state, 0);
                assert_eq!(lookahead, "*");
                assert_eq!(at, 0);
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn analysis_is_deterministic() {
        let g = Grammar::parse(EXPRESSION_GRAMMAR).unwrap();

        let run = || {
            let eliminated = g.eliminate_left_recursion().unwrap();
            let sets = FirstFollow::build(&eliminated);
            let ll1 = Ll1Table::build(&eliminated, &sets);
            let automaton = LrAutomaton::build(&g);
            let lr = LrTable::build(&automaton, &FirstFollow::build(&g));
            (
                serde_json::to_string(&sets).unwrap(),
                serde_json::to_string(&ll1).unwrap(),
                serde_json::to_string(&automaton).unwrap(),
                serde_json::to_string(&lr).unwrap(),
            )
        };

        assert_eq!(run(), run());
    }
}
