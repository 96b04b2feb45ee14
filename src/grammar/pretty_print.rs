use crowbook_text_processing::escape;
use serde::Serialize;

use super::{FirstFollow, Grammar, Ll1Table, LrAction, LrAutomaton, LrTable, EPSILON};

fn render_aligned(rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(|row| row.len()).max().unwrap_or(0);
    let width: Vec<usize> = (0..columns)
        .map(|j| {
            rows.iter()
                .map(|row| row.get(j).map(|s| s.len()).unwrap_or(0))
                .max()
                .unwrap_or(0)
        })
        .collect();
    rows.iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(j, s)| format!("{:>width$}", s, width = width[j]))
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductionOutput<'a> {
    pub left: &'a str,
    pub rights: Vec<Vec<&'a str>>,
}

impl ProductionOutput<'_> {
    pub fn to_plaintext(&self, left_width: usize) -> String {
        self.rights
            .iter()
            .map(|right| right.join(" "))
            .enumerate()
            .map(|(i, right)| {
                if i == 0 {
                    format!("{:>width$} -> {}", self.left, right, width = left_width)
                } else {
                    format!("{:>width$}  | {}", "", right, width = left_width)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        let left = format!("{} & \\rightarrow &", escape::tex(self.left));
        let right = self
            .rights
            .iter()
            .map(|right| {
                right
                    .iter()
                    .map(|s| escape::tex(*s))
                    .collect::<Vec<_>>()
                    .join(" \\ ")
            })
            .collect::<Vec<_>>()
            .join(" \\mid ");
        (left + &right).replace(EPSILON, "\\epsilon")
    }
}

#[derive(Debug, Serialize)]
pub struct ProductionOutputVec<'a> {
    productions: Vec<ProductionOutput<'a>>,
}

impl ProductionOutputVec<'_> {
    pub fn to_plaintext(&self) -> String {
        let left_max = self
            .productions
            .iter()
            .map(|p| p.left.len())
            .max()
            .unwrap_or(0);
        self.productions
            .iter()
            .map(|p| p.to_plaintext(left_max))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        std::iter::once("\\[\\begin{array}{cll}".to_string())
            .chain(self.productions.iter().map(|p| p.to_latex()))
            .chain(std::iter::once("\\end{array}\\]".to_string()))
            .collect::<Vec<_>>()
            .join("\\\\\n")
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }
}

impl Grammar {
    pub fn to_production_output_vec(&self) -> ProductionOutputVec {
        let mut productions: Vec<ProductionOutput> = Vec::new();
        for production in self.productions() {
            let right: Vec<&str> = production.right.iter().map(|s| s.name()).collect();
            match productions
                .iter_mut()
                .find(|p| p.left == production.left.name())
            {
                Some(entry) => entry.rights.push(right),
                None => productions.push(ProductionOutput {
                    left: production.left.name(),
                    rights: vec![right],
                }),
            }
        }
        ProductionOutputVec { productions }
    }
}

#[derive(Debug, Serialize)]
pub struct NonTerminalOutput<'a> {
    name: &'a str,
    nullable: bool,
    first: Vec<&'a str>,
    follow: Vec<&'a str>,
}

impl NonTerminalOutput<'_> {
    fn to_plaintext(&self) -> String {
        format!(
            "{} | {} | {} | {}",
            self.name,
            self.nullable,
            self.first.join(", "),
            self.follow.join(", ")
        )
    }

    fn to_latex(&self) -> String {
        fn f(a: &[&str]) -> String {
            a.iter()
                .map(|s| escape::tex(*s))
                .collect::<Vec<_>>()
                .join(r"\ ")
                .replace(EPSILON, r"$\epsilon$")
        }
        format!(
            "{} & {} & {} & {}",
            escape::tex(self.name),
            self.nullable,
            f(&self.first),
            f(&self.follow)
        )
    }
}

#[derive(Debug, Serialize)]
pub struct NonTerminalOutputVec<'a> {
    data: Vec<NonTerminalOutput<'a>>,
}

impl NonTerminalOutputVec<'_> {
    pub fn to_plaintext(&self) -> String {
        self.data
            .iter()
            .map(|e| e.to_plaintext())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        let content = self
            .data
            .iter()
            .map(|e| e.to_latex())
            .collect::<Vec<_>>()
            .join("\\\\\n ");
        "\\begin{tabular}{c|c|c|c}\n".to_string()
            + "Symbol & Nullable & First & Follow\\\\\\hline\n"
            + &content
            + "\\\\\n\\end{tabular}"
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }
}

impl FirstFollow {
    pub fn to_output_vec<'a>(&'a self, grammar: &'a Grammar) -> NonTerminalOutputVec<'a> {
        let mut data = Vec::new();
        for non_terminal in grammar.non_terminals() {
            // BTreeSet iteration is already name-sorted for terminals.
            let mut first: Vec<&str> = self
                .first_set(non_terminal)
                .map(|set| set.iter().map(|s| s.name()).collect())
                .unwrap_or_default();
            if self.is_nullable(non_terminal) {
                first.push(EPSILON);
            }
            let follow: Vec<&str> = self
                .follow_set(non_terminal)
                .map(|set| set.iter().map(|s| s.name()).collect())
                .unwrap_or_default();
            data.push(NonTerminalOutput {
                name: non_terminal.name(),
                nullable: self.is_nullable(non_terminal),
                first,
                follow,
            });
        }
        NonTerminalOutputVec { data }
    }
}

#[derive(Debug, Serialize)]
pub struct Ll1TableOutput<'a> {
    terminals: Vec<&'a str>,
    rows: Vec<(&'a str, Vec<String>)>,
    conflicts: Vec<String>,
}

impl Ll1TableOutput<'_> {
    pub fn to_plaintext(&self) -> String {
        let mut output: Vec<Vec<String>> = Vec::new();
        let mut header = vec![String::new()];
        header.extend(self.terminals.iter().map(|t| t.to_string()));
        output.push(header);
        for (left, row) in &self.rows {
            let mut line = vec![left.to_string()];
            line.extend(row.iter().cloned());
            output.push(line);
        }
        let table = render_aligned(&output);
        if self.conflicts.is_empty() {
            table
        } else {
            format!("{}\nconflicts:\n{}", table, self.conflicts.join("\n"))
        }
    }

    pub fn to_latex(&self) -> String {
        let mut header = vec![format!(
            "\\[\\begin{{array}}{{c{}}}\n",
            "|l".repeat(self.terminals.len())
        )];
        header.extend(
            self.terminals
                .iter()
                .map(|t| format!("\\text{{{}}}", escape::tex(*t))),
        );
        let header = header.join(" & ");

        let rows = self
            .rows
            .iter()
            .map(|(left, row)| {
                std::iter::once(escape::tex(*left).to_string())
                    .chain(row.iter().map(|cell| {
                        escape::tex(cell.as_str())
                            .replace(EPSILON, "\\epsilon")
                            .replace("->", "\\rightarrow")
                    }))
                    .collect::<Vec<_>>()
                    .join(" & ")
            })
            .collect::<Vec<_>>()
            .join("\\\\\n");

        header + "\\\\\\hline\n" + &rows + "\n\\end{array}\\]"
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }
}

impl Ll1Table {
    pub fn to_output<'a>(&self, grammar: &'a Grammar) -> Ll1TableOutput<'a> {
        let terminals: Vec<&str> = grammar.terminals().iter().map(|t| t.name()).collect();
        let mut rows = Vec::new();
        for non_terminal in grammar.non_terminals() {
            let mut cells = Vec::with_capacity(terminals.len());
            for terminal in grammar.terminals() {
                let cell = self
                    .get(non_terminal, terminal)
                    .map(|index| grammar.productions()[index].to_string())
                    .unwrap_or_default();
                cells.push(cell);
            }
            rows.push((non_terminal.name(), cells));
        }
        let conflicts = self
            .conflicts()
            .iter()
            .map(|c| {
                format!(
                    "M[{}, {}]: kept {}, dropped {}",
                    c.non_terminal,
                    c.terminal,
                    grammar.productions()[c.kept],
                    grammar.productions()[c.rejected]
                )
            })
            .collect();
        Ll1TableOutput {
            terminals,
            rows,
            conflicts,
        }
    }
}

impl LrAutomaton {
    pub fn to_plaintext(&self) -> String {
        let states = self
            .states()
            .iter()
            .enumerate()
            .map(|(i, state)| {
                let items = state
                    .items
                    .iter()
                    .map(|item| self.item_to_string(item))
                    .collect::<Vec<_>>()
                    .join("\n");
                let edges = if state.edges.is_empty() {
                    String::new()
                } else {
                    format!(
                        "\n===\n{}",
                        state
                            .edges
                            .iter()
                            .map(|(symbol, target)| format!("- {} -> {}", symbol, target))
                            .collect::<Vec<_>>()
                            .join("\n")
                    )
                };
                format!("I{}\n{}{}", i, items, edges)
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        format!("{}\n\nstart: 0", states)
    }

    pub fn to_latex(&self) -> String {
        let nodes = self.states().iter().enumerate().map(|(i, state)| {
            let content = state
                .items
                .iter()
                .map(|item| {
                    format!(
                        "${}$",
                        escape::tex(self.item_to_string(item).as_str())
                            .replace("->", "\\rightarrow")
                            .replace('.', "\\cdot")
                    )
                })
                .collect::<Vec<_>>()
                .join(" \\\\ \n");
            let placement = if i > 0 {
                if i % 2 == 0 {
                    format!(" [below of = I_{}] ", i - 2)
                } else {
                    format!(" [right of = I_{}] ", i - 1)
                }
            } else {
                String::new()
            };
            format!(
                "\\node [block] (I_{}){}\n{{\n$I_{}$\\\\\n{}\n}};",
                i, placement, i, content
            )
        });
        let edges = self.states().iter().enumerate().map(|(i, state)| {
            state
                .edges
                .iter()
                .map(|(symbol, target)| {
                    format!(
                        "\\path [->] (I_{}) edge {} node [above]{{{}}} (I_{});",
                        i,
                        if i == *target { "[loop left]" } else { "[right]" },
                        escape::tex(symbol.name()),
                        target
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        });
        format!(
            "\\begin{{tikzpicture}}[node distance=5cm,block/.style={{state, rectangle, text width=6em}}]\n{}\n\\end{{tikzpicture}}",
            nodes.chain(edges).collect::<Vec<_>>().join("\n")
        )
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }
}

#[derive(Debug, Serialize)]
pub struct LrTableOutput<'a> {
    terminals: Vec<&'a str>,
    non_terminals: Vec<&'a str>,
    rows: Vec<Vec<String>>,
    conflicts: Vec<String>,
}

impl LrTableOutput<'_> {
    pub fn to_plaintext(&self) -> String {
        let mut output: Vec<Vec<String>> = Vec::new();
        let mut header = vec![String::new()];
        header.extend(
            self.terminals
                .iter()
                .chain(self.non_terminals.iter())
                .map(|s| s.to_string()),
        );
        output.push(header);
        for (i, row) in self.rows.iter().enumerate() {
            let mut line = vec![i.to_string()];
            line.extend(row.iter().cloned());
            output.push(line);
        }
        let table = render_aligned(&output);
        if self.conflicts.is_empty() {
            table
        } else {
            format!("{}\nconflicts:\n{}", table, self.conflicts.join("\n"))
        }
    }

    pub fn to_latex(&self) -> String {
        let header = format!(
            "\\begin{{tabular}}{{c{}}}\n & \\multicolumn{{{}}}{{c}}{{action}} & \\multicolumn{{{}}}{{|c}}{{goto}}\\\\",
            "|l".repeat(self.terminals.len() + self.non_terminals.len()),
            self.terminals.len(),
            self.non_terminals.len(),
        );
        let first_row = std::iter::once(String::new())
            .chain(
                self.terminals
                    .iter()
                    .chain(self.non_terminals.iter())
                    .map(|s| escape::tex(*s).to_string()),
            )
            .collect::<Vec<_>>()
            .join(" & ");
        let content = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                std::iter::once(i.to_string())
                    .chain(row.iter().map(|cell| {
                        escape::tex(cell.as_str())
                            .replace(EPSILON, "\\epsilon")
                            .replace("->", "\\rightarrow")
                    }))
                    .collect::<Vec<_>>()
                    .join(" & ")
            })
            .collect::<Vec<_>>()
            .join(" \\\\\n");
        format!(
            "{}\n{} \\\\\\hline\n{}\n\\end{{tabular}}",
            header, first_row, content
        )
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }
}

impl LrTable {
    pub fn to_output<'a>(&self, grammar: &'a Grammar, automaton: &LrAutomaton) -> LrTableOutput<'a> {
        let terminals: Vec<&str> = grammar.terminals().iter().map(|t| t.name()).collect();
        let non_terminals: Vec<&str> = grammar.non_terminals().iter().map(|s| s.name()).collect();

        let render_action = |action: &LrAction| match action {
            LrAction::Shift(target) => format!("s{}", target),
            LrAction::Reduce(index) => format!("r({})", automaton.production(*index)),
            LrAction::Accept => "acc".to_string(),
        };

        let mut rows = Vec::with_capacity(self.states());
        for state in 0..self.states() {
            let mut row = Vec::with_capacity(terminals.len() + non_terminals.len());
            for terminal in grammar.terminals() {
                let cell = self
                    .action(state, terminal)
                    .map(|action| render_action(&action))
                    .unwrap_or_default();
                row.push(cell);
            }
            for non_terminal in grammar.non_terminals() {
                let cell = self
                    .goto(state, non_terminal)
                    .map(|target| target.to_string())
                    .unwrap_or_default();
                row.push(cell);
            }
            rows.push(row);
        }

        let conflicts = self
            .conflicts()
            .iter()
            .map(|c| {
                format!(
                    "ACTION[{}, {}]: kept {}, dropped {}",
                    c.state,
                    c.terminal,
                    render_action(&c.kept),
                    render_action(&c.rejected)
                )
            })
            .collect();

        LrTableOutput {
            terminals,
            non_terminals,
            rows,
            conflicts,
        }
    }
}
