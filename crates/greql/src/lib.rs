//! # GReQL
//!
//! Regular path expression search over attributed graphs.
//!
//! Start with an [`LpgStore`] holding your graph and an [`Automaton`]
//! describing the paths you are after (build one with
//! [`AutomatonBuilder`]). A [`PathSearch`] runs one of five searches over
//! them; an [`Evaluator`] does the same through the named function library.
//!
//! ## Searches
//!
//! | Operation | Result |
//! | --------- | ------ |
//! | `is_reachable(start, target)` | whether some accepted path connects them |
//! | `matches(path)` | whether a given path is accepted |
//! | `reachable_vertices(start)` | every vertex ending an accepted path |
//! | `path_system(root)` | all accepted paths from `root`, as a tree |
//! | `slice(roots)` | all accepted paths from `roots`, as a DAG |
//!
//! ## Quick Start
//!
//! ```rust
//! use greql::{AutomatonBuilder, Direction, LpgStore, PathSearch, TransitionKind, TypeFilter};
//!
//! let store = LpgStore::new();
//! let alice = store.create_vertex(&["Person"])?;
//! let bob = store.create_vertex(&["Person"])?;
//! let carol = store.create_vertex(&["Person"])?;
//! store.create_edge(alice, bob, "KNOWS")?;
//! store.create_edge(bob, carol, "KNOWS")?;
//!
//! // -->{KNOWS}+
//! let mut builder = AutomatonBuilder::new();
//! let s0 = builder.add_state(false);
//! let s1 = builder.add_state(true);
//! let knows = || TransitionKind::Edge {
//!     direction: Direction::Outgoing,
//!     edge_types: TypeFilter::names(["KNOWS"]),
//! };
//! builder.add_transition(s0, s1, knows()).add_transition(s1, s1, knows());
//! let automaton = builder.build()?;
//!
//! let search = PathSearch::new(&store, &automaton);
//! assert!(search.is_reachable(alice, carol)?);
//!
//! let system = search.path_system(alice)?;
//! let path = system.extract_path(carol).unwrap();
//! assert_eq!(path.vertex_trace(), &[alice, bob, carol]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export the search API
pub use greql_engine::{
    Config, Context, EvaluationError, Evaluator, Function, FunctionRegistry, NativeFunction, Path, PathSearch,
    PathSystem, PathSystemEntry, QueryValue, Slice, SliceNode, SliceParent,
};

// Re-export the graph and automaton model
pub use greql_core::automaton::{
    Automaton, AutomatonBuilder, AutomatonError, State, StateId, Transition, TransitionKind, TypeFilter,
};
pub use greql_core::graph::lpg::{LpgStore, LpgStoreConfig};
pub use greql_core::graph::subgraph::{Subgraph, SubgraphFilter};
pub use greql_core::graph::{Direction, GraphAccess, Incidence};

// Re-export core types - you'll need these for working with IDs and values
pub use greql_common::types::{EdgeId, PropertyKey, Value, VertexId};
