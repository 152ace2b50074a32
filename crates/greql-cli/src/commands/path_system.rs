//! Path-system command.

use anyhow::Result;
use serde::Serialize;

use super::Loaded;
use crate::output::{self, Format};
use crate::{OutputFormat, SearchArgs};

#[derive(Serialize)]
struct EntryOutput {
    vertex: String,
    state: u32,
    parent: Option<String>,
    parent_state: Option<u32>,
    edge: Option<String>,
    distance: u32,
    is_final: bool,
}

#[derive(Serialize)]
struct PathSystemOutput {
    root: String,
    vertex_count: usize,
    edge_count: usize,
    depth: u32,
    leaves: Vec<String>,
    entries: Vec<EntryOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    paths: Option<Vec<String>>,
}

/// Run the path-system command.
pub fn run(args: &SearchArgs, from: &str, with_paths: bool, format: OutputFormat, quiet: bool) -> Result<()> {
    let loaded = Loaded::open(args)?;
    let root = loaded.vertex(from)?;
    let system = loaded.evaluator().path_system(&loaded.automaton, root)?;

    let name = |v| loaded.graph.vertex_name(v);
    let mut entries = Vec::with_capacity(system.entry_count());
    for vertex in system.vertices() {
        for entry in system.entries(vertex) {
            entries.push(EntryOutput {
                vertex: name(vertex),
                state: entry.state.as_u32(),
                parent: entry.parent_vertex.map(name),
                parent_state: entry.parent_state.map(|s| s.as_u32()),
                edge: entry.edge_to_parent.map(|e| loaded.graph.edge_name(e)),
                distance: entry.distance,
                is_final: entry.is_final,
            });
        }
    }
    let paths = with_paths.then(|| {
        system
            .extract_paths()
            .iter()
            .map(|p| loaded.describe(p))
            .collect::<Vec<_>>()
    });

    let output = PathSystemOutput {
        root: from.to_string(),
        vertex_count: system.vertex_count(),
        edge_count: system.edge_count(),
        depth: system.depth(),
        leaves: loaded.vertex_names(system.leaves()),
        entries,
        paths,
    };

    let fmt: Format = format.into();
    match fmt {
        Format::Json => output::print_json(&output, quiet)?,
        Format::Table => {
            let rows = output
                .entries
                .iter()
                .map(|e| {
                    vec![
                        e.vertex.clone(),
                        format!("s{}", e.state),
                        match (&e.parent, e.parent_state) {
                            (Some(p), Some(s)) => format!("{p} (s{s})"),
                            _ => "-".to_string(),
                        },
                        e.edge.clone().unwrap_or_else(|| "-".to_string()),
                        e.distance.to_string(),
                        if e.is_final { "yes" } else { "" }.to_string(),
                    ]
                })
                .collect();
            output::print_rows(&["Vertex", "State", "Parent", "Edge", "Distance", "Final"], rows, quiet);
            output::status(
                &format!(
                    "{} vertices, {} edges, depth {}, leaves: {}",
                    output.vertex_count,
                    output.edge_count,
                    output.depth,
                    output.leaves.join(", ")
                ),
                quiet,
            );
            for path in output.paths.iter().flatten() {
                output::status(path, quiet);
            }
        }
    }
    Ok(())
}
