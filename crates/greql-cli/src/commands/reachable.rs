//! Reachable-set command.

use anyhow::Result;
use greql_core::graph::GraphAccess;
use serde::Serialize;

use super::Loaded;
use crate::output::{self, Format};
use crate::{OutputFormat, SearchArgs};

#[derive(Serialize)]
struct ReachableOutput<'a> {
    from: &'a [String],
    vertices: Vec<String>,
}

/// Run the reachable command.
pub fn run(args: &SearchArgs, from: &[String], format: OutputFormat, quiet: bool) -> Result<()> {
    let loaded = Loaded::open(args)?;
    let starts = loaded.vertices(from)?;
    let reached = loaded
        .evaluator()
        .search(&loaded.automaton)
        .reachable_vertices_from(&starts)?;

    let fmt: Format = format.into();
    match fmt {
        Format::Json => {
            let output = ReachableOutput {
                from,
                vertices: loaded.vertex_names(reached.iter().copied()),
            };
            output::print_json(&output, quiet)?;
        }
        Format::Table => {
            let rows = reached
                .iter()
                .enumerate()
                .map(|(i, &v)| {
                    let labels: Vec<String> = loaded
                        .graph
                        .store
                        .vertex_labels(v)
                        .iter()
                        .map(|l| l.to_string())
                        .collect();
                    vec![(i + 1).to_string(), loaded.graph.vertex_name(v), labels.join(", ")]
                })
                .collect();
            output::print_rows(&["#", "Vertex", "Labels"], rows, quiet);
            output::status(&format!("{} vertices reachable", reached.len()), quiet);
        }
    }
    Ok(())
}
