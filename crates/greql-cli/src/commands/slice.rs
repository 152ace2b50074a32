//! Slice command.

use anyhow::Result;
use serde::Serialize;

use super::Loaded;
use crate::output::{self, Format};
use crate::{OutputFormat, SearchArgs};

#[derive(Serialize)]
struct LinkOutput {
    vertex: String,
    state: u32,
    edge: Option<String>,
}

#[derive(Serialize)]
struct NodeOutput {
    vertex: String,
    state: u32,
    distance: u32,
    is_root: bool,
    is_final: bool,
    parents: Vec<LinkOutput>,
}

#[derive(Serialize)]
struct SliceOutput {
    criterion: Vec<String>,
    vertex_count: usize,
    edge_count: usize,
    leaves: Vec<String>,
    nodes: Vec<NodeOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    paths: Option<Vec<String>>,
}

/// Run the slice command.
pub fn run(args: &SearchArgs, from: &[String], paths_to: Option<&str>, format: OutputFormat, quiet: bool) -> Result<()> {
    let loaded = Loaded::open(args)?;
    let roots = loaded.vertices(from)?;
    let target = paths_to.map(|name| loaded.vertex(name)).transpose()?;
    let slice = loaded.evaluator().slice(&loaded.automaton, &roots)?;

    let mut nodes = Vec::with_capacity(slice.node_count());
    for vertex in slice.vertices() {
        for node in slice.nodes(vertex) {
            nodes.push(NodeOutput {
                vertex: loaded.graph.vertex_name(vertex),
                state: node.state.as_u32(),
                distance: node.distance,
                is_root: node.is_root,
                is_final: node.is_final,
                parents: node
                    .parents
                    .iter()
                    .map(|p| LinkOutput {
                        vertex: loaded.graph.vertex_name(p.vertex),
                        state: p.state.as_u32(),
                        edge: p.edge.map(|e| loaded.graph.edge_name(e)),
                    })
                    .collect(),
            });
        }
    }
    let paths = target.map(|t| slice.extract_paths(t).iter().map(|p| loaded.describe(p)).collect::<Vec<_>>());

    let output = SliceOutput {
        criterion: loaded.vertex_names(slice.slicing_criterion().iter().copied()),
        vertex_count: slice.vertex_count(),
        edge_count: slice.edge_count(),
        leaves: loaded.vertex_names(slice.leaves()),
        nodes,
        paths,
    };

    let fmt: Format = format.into();
    match fmt {
        Format::Json => output::print_json(&output, quiet)?,
        Format::Table => {
            let rows = output
                .nodes
                .iter()
                .map(|n| {
                    let parents: Vec<String> = n
                        .parents
                        .iter()
                        .map(|p| match &p.edge {
                            Some(e) => format!("{} (s{}) via {e}", p.vertex, p.state),
                            None => format!("{} (s{})", p.vertex, p.state),
                        })
                        .collect();
                    vec![
                        n.vertex.clone(),
                        format!("s{}", n.state),
                        n.distance.to_string(),
                        if n.is_final { "yes" } else { "" }.to_string(),
                        if parents.is_empty() { "(root)".to_string() } else { parents.join("\n") },
                    ]
                })
                .collect();
            output::print_rows(&["Vertex", "State", "Distance", "Final", "Parents"], rows, quiet);
            output::status(
                &format!(
                    "{} vertices, {} edges, leaves: {}",
                    output.vertex_count,
                    output.edge_count,
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
