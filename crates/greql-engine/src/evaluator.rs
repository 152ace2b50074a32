//! The evaluator: a graph, limits, a function library and an optional
//! subgraph bound together.

use greql_common::types::VertexId;
use greql_core::automaton::Automaton;
use greql_core::graph::GraphAccess;
use greql_core::graph::subgraph::SubgraphFilter;
use indexmap::IndexSet;

use crate::config::Config;
use crate::error::Result;
use crate::functions::{Context, FunctionRegistry, QueryValue};
use crate::result::{Path, PathSystem, Slice};
use crate::search::PathSearch;

/// Evaluates path searches and library functions against one graph.
///
/// # Examples
///
/// ```
/// use greql_core::automaton::{AutomatonBuilder, TransitionKind, TypeFilter};
/// use greql_core::graph::{Direction, lpg::LpgStore};
/// use greql_engine::{Evaluator, QueryValue};
///
/// let store = LpgStore::new();
/// let a = store.create_vertex(&[]).unwrap();
/// let b = store.create_vertex(&[]).unwrap();
/// store.create_edge(a, b, "E").unwrap();
///
/// let mut builder = AutomatonBuilder::new();
/// let s0 = builder.add_state(false);
/// let s1 = builder.add_state(true);
/// builder.add_transition(s0, s1, TransitionKind::Edge {
///     direction: Direction::Outgoing,
///     edge_types: TypeFilter::Any,
/// });
/// let automaton = builder.build().unwrap();
///
/// let evaluator = Evaluator::new(&store);
/// let reached = evaluator
///     .call("isReachable", &[a.into(), b.into(), automaton.into()])
///     .unwrap();
/// assert_eq!(reached.as_bool(), Some(true));
/// ```
pub struct Evaluator<'g> {
    graph: &'g dyn GraphAccess,
    config: Config,
    registry: FunctionRegistry,
    subgraph: Option<&'g dyn SubgraphFilter>,
}

impl<'g> Evaluator<'g> {
    /// Creates an unbounded evaluator with every builtin function.
    pub fn new(graph: &'g dyn GraphAccess) -> Self {
        Self {
            graph,
            config: Config::default(),
            registry: FunctionRegistry::with_builtins(),
            subgraph: None,
        }
    }

    /// Sets the search limits.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Replaces the function library.
    #[must_use]
    pub fn with_registry(mut self, registry: FunctionRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Restricts every search to a subgraph.
    #[must_use]
    pub fn with_subgraph(mut self, subgraph: &'g dyn SubgraphFilter) -> Self {
        self.subgraph = Some(subgraph);
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the function library.
    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// Returns the function library for registering more functions.
    pub fn registry_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.registry
    }

    /// Returns the context functions are evaluated in.
    pub fn context(&self) -> Context<'_> {
        Context {
            graph: self.graph,
            config: &self.config,
            subgraph: self.subgraph,
        }
    }

    /// Calls a library function by name.
    ///
    /// # Errors
    ///
    /// `UnknownFunction`, `Arity` and `ArgumentType` for bad calls, plus
    /// whatever the function's search reports.
    pub fn call(&self, name: &str, args: &[QueryValue]) -> Result<QueryValue> {
        self.registry.call(&self.context(), name, args)
    }

    /// Creates a path search configured like this evaluator.
    pub fn search<'s>(&'s self, automaton: &'s Automaton) -> PathSearch<'s, dyn GraphAccess + 'g> {
        let search = PathSearch::new(self.graph, automaton).with_config(self.config.clone());
        match self.subgraph {
            Some(subgraph) => search.with_subgraph(subgraph),
            None => search,
        }
    }

    /// See [`PathSearch::is_reachable`].
    pub fn is_reachable(&self, automaton: &Automaton, start: VertexId, target: VertexId) -> Result<bool> {
        self.search(automaton).is_reachable(start, target)
    }

    /// See [`PathSearch::matches`].
    pub fn matches(&self, automaton: &Automaton, path: &Path) -> Result<bool> {
        self.search(automaton).matches(path)
    }

    /// See [`PathSearch::reachable_vertices`].
    pub fn reachable_vertices(&self, automaton: &Automaton, start: VertexId) -> Result<IndexSet<VertexId>> {
        self.search(automaton).reachable_vertices(start)
    }

    /// See [`PathSearch::path_system`].
    pub fn path_system(&self, automaton: &Automaton, root: VertexId) -> Result<PathSystem> {
        self.search(automaton).path_system(root)
    }

    /// See [`PathSearch::slice`].
    pub fn slice(&self, automaton: &Automaton, roots: &[VertexId]) -> Result<Slice> {
        self.search(automaton).slice(roots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvaluationError;
    use crate::functions::{Args, NativeFunction};
    use greql_core::automaton::{AutomatonBuilder, TransitionKind, TypeFilter};
    use greql_core::graph::Direction;
    use greql_core::graph::lpg::LpgStore;
    use greql_core::graph::subgraph::Subgraph;

    fn out_plus() -> Automaton {
        let mut builder = AutomatonBuilder::new();
        let s0 = builder.add_state(false);
        let s1 = builder.add_state(true);
        let out = || TransitionKind::Edge {
            direction: Direction::Outgoing,
            edge_types: TypeFilter::Any,
        };
        builder.add_transition(s0, s1, out()).add_transition(s1, s1, out());
        builder.build().unwrap()
    }

    #[test]
    fn test_function_flow() {
        let store = LpgStore::new();
        let a = store.create_vertex(&[]).unwrap();
        let b = store.create_vertex(&[]).unwrap();
        let c = store.create_vertex(&[]).unwrap();
        store.create_edge(a, b, "E").unwrap();
        store.create_edge(b, c, "E").unwrap();

        let evaluator = Evaluator::new(&store);
        let automaton = QueryValue::from(out_plus());

        let system = evaluator.call("pathSystem", &[a.into(), automaton.clone()]).unwrap();
        let leaves = evaluator.call("leaves", &[system.clone()]).unwrap();
        assert_eq!(leaves.as_list().map(<[_]>::len), Some(2));

        let path = evaluator.call("extractPath", &[system.clone(), c.into()]).unwrap();
        assert_eq!(evaluator.call("length", &[path.clone()]).unwrap().as_int64(), Some(2));
        assert_eq!(
            evaluator.call("matches", &[path, automaton]).unwrap().as_bool(),
            Some(true)
        );
        assert_eq!(evaluator.call("depth", &[system]).unwrap().as_int64(), Some(2));
    }

    #[test]
    fn test_subgraph_restricts_moves() {
        let store = LpgStore::new();
        let a = store.create_vertex(&["Keep"]).unwrap();
        let b = store.create_vertex(&["Drop"]).unwrap();
        let c = store.create_vertex(&["Keep"]).unwrap();
        store.create_edge(a, b, "E").unwrap();
        store.create_edge(b, c, "E").unwrap();
        store.create_edge(a, c, "E").unwrap();

        let subgraph = Subgraph::from_types(&store, &["Keep"], &["E"]);
        let automaton = out_plus();
        let evaluator = Evaluator::new(&store).with_subgraph(&subgraph);

        let reached = evaluator.reachable_vertices(&automaton, a).unwrap();
        assert_eq!(reached.into_iter().collect::<Vec<_>>(), vec![c]);
        assert!(!evaluator.is_reachable(&automaton, a, b).unwrap());
    }

    #[test]
    fn test_custom_function() {
        fn vertex_count(ctx: &Context<'_>, args: &Args<'_>) -> Result<QueryValue> {
            let vertices = args.vertex_set(0)?;
            let present = vertices.iter().filter(|v| ctx.graph.contains_vertex(**v)).count();
            Ok(QueryValue::from(present as i64))
        }

        let store = LpgStore::new();
        let a = store.create_vertex(&[]).unwrap();
        let mut evaluator = Evaluator::new(&store);
        let replaced = evaluator
            .registry_mut()
            .register(NativeFunction::new("presentVertices", 1, 1, vertex_count));
        assert!(replaced.is_none());

        let list = QueryValue::vertices([a, VertexId::new(77)]);
        assert_eq!(evaluator.call("presentVertices", &[list]).unwrap().as_int64(), Some(1));
    }

    #[test]
    fn test_config_reaches_searches() {
        let store = LpgStore::new();
        let a = store.create_vertex(&[]).unwrap();
        let evaluator = Evaluator::new(&store).with_config(Config::default().with_max_markers(0));
        let automaton = out_plus();
        assert!(matches!(
            evaluator.path_system(&automaton, a),
            Err(EvaluationError::InvalidConfig(_))
        ));
    }
}
