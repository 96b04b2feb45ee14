pub mod driver;
pub mod grammar;
pub mod lexer;

use std::{fs, io::BufRead};

use driver::{Ll1Driver, LrDriver, ParseOutcome, Verdict};
use grammar::{FirstFollow, Grammar, Ll1Table, LrAutomaton, LrTable};

fn print_help() {
    println!("Usage: grammar-workbench [actions] outputs [options] [grammar file]");
    println!("actions:");
    println!("  elf: Eliminate left recursion");
    println!("outputs:");
    println!("  prod: Productions");
    println!("  nff: Nullable first and follow");
    println!("  ll1: LL(1) parsing table");
    println!("  lr0fsm: LR(0) automaton");
    println!("  lr0table: LR(0) ACTION/GOTO table");
    println!("  llparse: Run the predictive parser on -e <expr>");
    println!("  lrparse: Run the shift-reduce parser on -e <expr>");
    println!("options:");
    println!("  -h: Print this help");
    println!("  -l: Print in LaTeX format");
    println!("  -j: Print in JSON format");
    println!("  -e <expr>: Expression to parse");
}

enum OutputFormat {
    Plain,
    LaTeX,
    Json,
}

fn print_outcome(g: &Grammar, outcome: &ParseOutcome, format: &OutputFormat) {
    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string(outcome).unwrap());
        return;
    }
    match &outcome.verdict {
        Verdict::Accepted => println!("accepted"),
        Verdict::Rejected(reason) => println!("rejected: {}", reason),
    }
    for (i, &index) in outcome.derivation.iter().enumerate() {
        println!("{}. {}", i + 1, g.productions()[index]);
    }
}

fn main() {
    env_logger::init();

    let mut actions: Vec<&str> = Vec::new();
    let mut outputs: Vec<&str> = Vec::new();
    let args = std::env::args().skip(1).collect::<Vec<String>>();
    let mut i: usize = 0;
    while i < args.len() && args[i] == "elf" {
        actions.push(args[i].as_str());
        i += 1;
    }
    while i < args.len()
        && ["prod", "nff", "ll1", "lr0fsm", "lr0table", "llparse", "lrparse"]
            .contains(&args[i].as_str())
    {
        outputs.push(args[i].as_str());
        i += 1;
    }

    let mut output_format = OutputFormat::Plain;
    let mut expression: Option<String> = None;

    while i < args.len() && ["-h", "--help", "-l", "-j", "-e"].contains(&args[i].as_str()) {
        if args[i] == "-h" || args[i] == "--help" {
            print_help();
            return;
        } else if args[i] == "-l" {
            output_format = OutputFormat::LaTeX;
        } else if args[i] == "-j" {
            output_format = OutputFormat::Json;
        } else if args[i] == "-e" {
            i += 1;
            if i == args.len() {
                eprintln!("error: -e needs an expression");
                std::process::exit(1);
            }
            expression = Some(args[i].clone());
        }
        i += 1;
    }

    if i + 1 < args.len() || outputs.is_empty() {
        print_help();
        return;
    }

    let input: String = if i == args.len() {
        std::io::stdin()
            .lock()
            .lines()
            .map(|l| l.unwrap())
            .collect::<Vec<String>>()
            .join("\n")
    } else {
        fs::read_to_string(args[i].as_str()).expect("Failed to read file")
    };

    let mut g = match Grammar::parse(&input) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    for action in actions {
        if action == "elf" {
            g = match g.eliminate_left_recursion() {
                Ok(g) => g,
                Err(e) => {
                    eprintln!("error: {}", e);
                    std::process::exit(1);
                }
            };
        }
    }

    let sets = FirstFollow::build(&g);

    for output in outputs {
        if output == "prod" {
            let t = g.to_production_output_vec();
            println!(
                "{}",
                match output_format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::LaTeX => t.to_latex(),
                    OutputFormat::Json => t.to_json(),
                }
            );
        }
        if output == "nff" {
            let t = sets.to_output_vec(&g);
            println!(
                "{}",
                match output_format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::LaTeX => t.to_latex(),
                    OutputFormat::Json => t.to_json(),
                }
            );
        }
        if output == "ll1" {
            let t = Ll1Table::build(&g, &sets).to_output(&g);
            println!(
                "{}",
                match output_format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::LaTeX => t.to_latex(),
                    OutputFormat::Json => t.to_json(),
                }
            );
        }
        if output == "lr0fsm" {
            let t = LrAutomaton::build(&g);
            println!(
                "{}",
                match output_format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::LaTeX => t.to_latex(),
                    OutputFormat::Json => t.to_json(),
                }
            );
        }
        if output == "lr0table" {
            let automaton = LrAutomaton::build(&g);
            let t = LrTable::build(&automaton, &sets).to_output(&g, &automaton);
            println!(
                "{}",
                match output_format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::LaTeX => t.to_latex(),
                    OutputFormat::Json => t.to_json(),
                }
            );
        }
        if output == "llparse" || output == "lrparse" {
            let expression = match &expression {
                Some(e) => e,
                None => {
                    eprintln!("error: {} needs -e <expression>", output);
                    std::process::exit(1);
                }
            };
            let tokens = lexer::tokenize(expression);
            let outcome = if output == "llparse" {
                let table = Ll1Table::build(&g, &sets);
                Ll1Driver::new(&g, &table).parse(&tokens)
            } else {
                let automaton = LrAutomaton::build(&g);
                let table = LrTable::build(&automaton, &sets);
                LrDriver::new(&automaton, &table).parse(&tokens)
            };
            print_outcome(&g, &outcome, &output_format);
        }
    }
}
