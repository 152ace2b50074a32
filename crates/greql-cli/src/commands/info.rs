//! Graph and automaton info command.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::OutputFormat;
use crate::input;
use crate::output::{self, Format};

/// Summary of the input files.
#[derive(Serialize)]
struct InfoOutput {
    vertex_count: usize,
    edge_count: usize,
    labels: Vec<String>,
    edge_types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    automaton: Option<AutomatonInfo>,
}

#[derive(Serialize)]
struct AutomatonInfo {
    state_count: usize,
    initial_state: u32,
    final_states: Vec<u32>,
    transition_count: usize,
}

/// Run the info command.
pub fn run(graph: &Path, automaton: Option<&Path>, format: OutputFormat, quiet: bool) -> Result<()> {
    let loaded = input::load_graph(graph)?;
    let store = &loaded.store;

    let automaton = automaton
        .map(|path| input::load_automaton(path, &loaded))
        .transpose()?
        .map(|a| AutomatonInfo {
            state_count: a.state_count(),
            initial_state: a.initial_state().as_u32(),
            final_states: a.final_states().map(|s| s.as_u32()).collect(),
            transition_count: a.states().iter().map(|s| s.transitions().len()).sum(),
        });

    let output = InfoOutput {
        vertex_count: store.vertex_count(),
        edge_count: store.edge_count(),
        labels: store.labels().iter().map(|l| l.to_string()).collect(),
        edge_types: store.edge_types().iter().map(|t| t.to_string()).collect(),
        automaton,
    };

    let fmt: Format = format.into();
    match fmt {
        Format::Json => output::print_json(&output, quiet)?,
        Format::Table => {
            let mut items = vec![
                ("Vertices", output.vertex_count.to_string()),
                ("Edges", output.edge_count.to_string()),
                ("Labels", output.labels.join(", ")),
                ("Edge Types", output.edge_types.join(", ")),
            ];
            if let Some(a) = &output.automaton {
                let finals: Vec<String> = a.final_states.iter().map(|s| format!("s{s}")).collect();
                items.push(("States", a.state_count.to_string()));
                items.push(("Initial State", format!("s{}", a.initial_state)));
                items.push(("Final States", finals.join(", ")));
                items.push(("Transitions", a.transition_count.to_string()));
            }
            output::print_key_value_table(&items, fmt, quiet)?;
        }
    }

    Ok(())
}
