//! CLI command implementations.

pub mod info;
pub mod matches;
pub mod path_system;
pub mod reach;
pub mod reachable;
pub mod slice;

use std::time::Duration;

use anyhow::Result;
use greql_common::types::VertexId;
use greql_core::automaton::Automaton;
use greql_engine::{Config, Evaluator, Path};

use crate::SearchArgs;
use crate::input::{self, LoadedGraph};

/// A graph and an automaton ready to search.
pub struct Loaded {
    pub graph: LoadedGraph,
    pub automaton: Automaton,
    config: Config,
}

impl Loaded {
    /// Reads both input files and the limits.
    pub fn open(args: &SearchArgs) -> Result<Self> {
        let graph = input::load_graph(&args.graph)?;
        let automaton = input::load_automaton(&args.automaton, &graph)?;

        let mut config = Config::default();
        if let Some(limit) = args.max_queue {
            config = config.with_max_queue_len(limit);
        }
        if let Some(limit) = args.max_markers {
            config = config.with_max_markers(limit);
        }
        if let Some(ms) = args.timeout_ms {
            config = config.with_time_limit(Duration::from_millis(ms));
        }
        config.validate()?;

        Ok(Self {
            graph,
            automaton,
            config,
        })
    }

    pub fn evaluator(&self) -> Evaluator<'_> {
        Evaluator::new(&self.graph.store).with_config(self.config.clone())
    }

    pub fn vertex(&self, name: &str) -> Result<VertexId> {
        Ok(self.graph.vertex(name)?)
    }

    pub fn vertices(&self, names: &[String]) -> Result<Vec<VertexId>> {
        names.iter().map(|name| self.vertex(name)).collect()
    }

    pub fn vertex_names(&self, vertices: impl IntoIterator<Item = VertexId>) -> Vec<String> {
        vertices.into_iter().map(|v| self.graph.vertex_name(v)).collect()
    }

    /// Renders a path with file names, e.g. `a -e1-> b`.
    pub fn describe(&self, path: &Path) -> String {
        let mut text = self.graph.vertex_name(path.start_vertex());
        for (edge, vertex) in path.steps() {
            text.push_str(&format!(" -{}-> {}", self.graph.edge_name(edge), self.graph.vertex_name(vertex)));
        }
        text
    }
}
