//! End-to-end search scenarios over small hand-built graphs.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use greql_common::types::{EdgeId, PropertyKey, Value, VertexId};
use greql_core::automaton::{Automaton, AutomatonBuilder, TransitionKind, TypeFilter};
use greql_core::graph::lpg::LpgStore;
use greql_core::graph::{Direction, GraphAccess, Incidence};
use greql_engine::{EvaluationError, Evaluator, Path, PathSearch, QueryValue};

fn edge(direction: Direction, types: TypeFilter) -> TransitionKind {
    TransitionKind::Edge {
        direction,
        edge_types: types,
    }
}

/// `-->`
fn one_out() -> Automaton {
    let mut builder = AutomatonBuilder::new();
    let s0 = builder.add_state(false);
    let s1 = builder.add_state(true);
    builder.add_transition(s0, s1, edge(Direction::Outgoing, TypeFilter::Any));
    builder.build().unwrap()
}

/// `-->*`
fn out_star() -> Automaton {
    let mut builder = AutomatonBuilder::new();
    let s0 = builder.add_state(true);
    builder.add_transition(s0, s0, edge(Direction::Outgoing, TypeFilter::Any));
    builder.build().unwrap()
}

/// `-->+`
fn out_plus() -> Automaton {
    let mut builder = AutomatonBuilder::new();
    let s0 = builder.add_state(false);
    let s1 = builder.add_state(true);
    builder
        .add_transition(s0, s1, edge(Direction::Outgoing, TypeFilter::Any))
        .add_transition(s1, s1, edge(Direction::Outgoing, TypeFilter::Any));
    builder.build().unwrap()
}

#[test]
fn single_edge_reachability() {
    let store = LpgStore::new();
    let a = store.create_vertex(&["Node"]).unwrap();
    let b = store.create_vertex(&["Node"]).unwrap();
    store.create_edge(a, b, "E").unwrap();

    let automaton = one_out();
    let search = PathSearch::new(&store, &automaton);
    assert!(search.is_reachable(a, b).unwrap());
    assert!(!search.is_reachable(b, a).unwrap());
    assert!(!search.is_reachable(a, a).unwrap());
}

#[test]
fn two_edge_path_and_truncation() {
    let store = LpgStore::new();
    let a = store.create_vertex(&[]).unwrap();
    let b = store.create_vertex(&[]).unwrap();
    let c = store.create_vertex(&[]).unwrap();
    let ab = store.create_edge(a, b, "E").unwrap();
    let bc = store.create_edge(b, c, "E").unwrap();

    // `-->{E} -->{E}`
    let mut builder = AutomatonBuilder::new();
    let s0 = builder.add_state(false);
    let s1 = builder.add_state(false);
    let s2 = builder.add_state(true);
    builder
        .add_transition(s0, s1, edge(Direction::Outgoing, TypeFilter::names(["E"])))
        .add_transition(s1, s2, edge(Direction::Outgoing, TypeFilter::names(["E"])));
    let automaton = builder.build().unwrap();
    let search = PathSearch::new(&store, &automaton);

    let full = Path::from_parts([a, b, c], [ab, bc]).unwrap();
    let truncated = Path::from_parts([a, b], [ab]).unwrap();
    assert!(search.matches(&full).unwrap());
    assert!(!search.matches(&truncated).unwrap());
    assert!(!search.matches(&full.reversed()).unwrap());

    let bogus = Path::from_parts([a, c], [ab]).unwrap();
    assert!(matches!(search.matches(&bogus), Err(EvaluationError::InvalidPath(_))));
}

#[test]
fn slice_with_shared_descendant() {
    let store = LpgStore::new();
    let r1 = store.create_vertex(&["Root"]).unwrap();
    let r2 = store.create_vertex(&["Root"]).unwrap();
    let x = store.create_vertex(&["Shared"]).unwrap();
    let y = store.create_vertex(&[]).unwrap();
    let e1 = store.create_edge(r1, x, "E").unwrap();
    let e2 = store.create_edge(r2, x, "E").unwrap();
    let e3 = store.create_edge(x, y, "E").unwrap();

    let automaton = out_plus();
    let slice = PathSearch::new(&store, &automaton).slice(&[r1, r2]).unwrap();

    let links: Vec<(VertexId, EdgeId)> = slice.parents(x).into_iter().collect();
    assert_eq!(links, vec![(r1, e1), (r2, e2)]);
    // y is expanded once even though x has two parents.
    assert_eq!(slice.nodes(y).count(), 1);
    assert_eq!(slice.parents(y).into_iter().collect::<Vec<_>>(), vec![(x, e3)]);
    assert_eq!(slice.extract_paths(y).len(), 2);
    assert_eq!(slice.edge_count(), 3);

    // Every discovery-parent chain ends at a criterion vertex.
    for vertex in slice.vertices().collect::<Vec<_>>() {
        let mut node = slice.nodes(vertex).next().unwrap();
        while let Some(parent) = node.discovery_parent {
            node = slice.node(parent.vertex, parent.state).unwrap();
        }
        assert!(slice.slicing_criterion().contains(&node.vertex));
    }
}

#[test]
fn cycle_terminates_with_cycle_vertices() {
    let store = LpgStore::new();
    let a = store.create_vertex(&[]).unwrap();
    let b = store.create_vertex(&[]).unwrap();
    let c = store.create_vertex(&[]).unwrap();
    let outside = store.create_vertex(&[]).unwrap();
    store.create_edge(a, b, "E").unwrap();
    store.create_edge(b, c, "E").unwrap();
    store.create_edge(c, a, "E").unwrap();
    store.create_edge(outside, a, "E").unwrap();

    let automaton = out_star();
    let search = PathSearch::new(&store, &automaton);
    let reached: Vec<_> = search.reachable_vertices(a).unwrap().into_iter().collect();
    assert_eq!(reached, vec![a, b, c]);

    let system = search.path_system(a).unwrap();
    assert_eq!(system.vertex_count(), 3);
    assert_eq!(system.edge_count(), 2);
    // One parent chain per vertex back to the root.
    for vertex in [b, c] {
        let path = system.extract_path(vertex).unwrap();
        assert_eq!(path.start_vertex(), a);
        assert_eq!(path.end_vertex(), vertex);
    }
}

#[test]
fn vertex_conditions_filter_endpoints() {
    let store = LpgStore::new();
    let alice = store.create_vertex_with_props(&["Person"], [("name", Value::from("Alice"))]).unwrap();
    let bob = store.create_vertex_with_props(&["Person"], [("name", Value::from("Bob"))]).unwrap();
    let acme = store.create_vertex(&["Company"]).unwrap();
    store.create_edge(alice, bob, "KNOWS").unwrap();
    store.create_edge(alice, acme, "WORKS_AT").unwrap();

    // `--> & {Person}`
    let mut builder = AutomatonBuilder::new();
    let s0 = builder.add_state(false);
    let s1 = builder.add_state(false);
    let s2 = builder.add_state(true);
    builder
        .add_transition(s0, s1, edge(Direction::Outgoing, TypeFilter::Any))
        .add_transition(s1, s2, TransitionKind::VertexType {
            types: TypeFilter::names(["Person"]),
        });
    let people = builder.build().unwrap();
    let reached = PathSearch::new(&store, &people).reachable_vertices(alice).unwrap();
    assert_eq!(reached.into_iter().collect::<Vec<_>>(), vec![bob]);

    // `<-- & {name = "Alice"}`
    let mut builder = AutomatonBuilder::new();
    let s0 = builder.add_state(false);
    let s1 = builder.add_state(false);
    let s2 = builder.add_state(true);
    builder
        .add_transition(s0, s1, edge(Direction::Incoming, TypeFilter::Any))
        .add_transition(s1, s2, TransitionKind::Property {
            key: PropertyKey::from("name"),
            value: Value::from("Alice"),
        });
    let known_by_alice = builder.build().unwrap();
    let search = PathSearch::new(&store, &known_by_alice);
    assert!(search.is_reachable(bob, alice).unwrap());
    assert!(search.is_reachable(acme, alice).unwrap());
    assert!(!search.is_reachable(alice, bob).unwrap());
}

#[test]
fn function_library_flow() {
    let store = LpgStore::new();
    let a = store.create_vertex(&[]).unwrap();
    let b = store.create_vertex(&[]).unwrap();
    let c = store.create_vertex(&[]).unwrap();
    store.create_edge(a, b, "E").unwrap();
    store.create_edge(a, c, "E").unwrap();

    let evaluator = Evaluator::new(&store);
    let automaton = QueryValue::from(out_plus());
    let system = evaluator.call("pathSystem", &[a.into(), automaton.clone()]).unwrap();

    let leaves = evaluator.call("leaves", &[system.clone()]).unwrap();
    let leaves: Vec<_> = leaves.as_list().unwrap().iter().filter_map(QueryValue::as_vertex).collect();
    assert_eq!(leaves, vec![b, c]);

    let inner = evaluator.call("innerNodes", &[system.clone()]).unwrap();
    assert_eq!(inner.as_list().map(<[_]>::len), Some(1));
    assert_eq!(
        evaluator.call("degree", &[system.clone(), a.into()]).unwrap().as_int64(),
        Some(2)
    );
    let paths = evaluator.call("extractPaths", &[system, QueryValue::from(1i64)]).unwrap();
    assert_eq!(paths.as_list().map(<[_]>::len), Some(2));

    let reachable = evaluator
        .call("isReachable", &[b.into(), a.into(), automaton])
        .unwrap();
    assert_eq!(reachable.as_bool(), Some(false));
}

/// Wraps a store and reports a new structure version on every expansion.
struct Shifting {
    store: LpgStore,
    version: AtomicU64,
}

impl GraphAccess for Shifting {
    fn contains_vertex(&self, vertex: VertexId) -> bool {
        self.store.contains_vertex(vertex)
    }

    fn contains_edge(&self, edge: EdgeId) -> bool {
        self.store.contains_edge(edge)
    }

    fn incidences(&self, vertex: VertexId) -> Vec<Incidence> {
        self.version.fetch_add(1, Ordering::Relaxed);
        self.store.incidences(vertex)
    }

    fn vertex_labels(&self, vertex: VertexId) -> Vec<Arc<str>> {
        self.store.vertex_labels(vertex)
    }

    fn vertex_property(&self, vertex: VertexId, key: &PropertyKey) -> Option<Value> {
        self.store.vertex_property(vertex, key)
    }

    fn structure_version(&self) -> u64 {
        self.version.load(Ordering::Relaxed)
    }
}

#[test]
fn mutation_during_search_is_detected() {
    let store = LpgStore::new();
    let a = store.create_vertex(&[]).unwrap();
    let b = store.create_vertex(&[]).unwrap();
    let c = store.create_vertex(&[]).unwrap();
    store.create_edge(a, b, "E").unwrap();
    store.create_edge(b, c, "E").unwrap();
    let graph = Shifting {
        store,
        version: AtomicU64::new(0),
    };

    let automaton = out_plus();
    let search = PathSearch::new(&graph, &automaton);
    assert_eq!(search.is_reachable(a, c), Err(EvaluationError::GraphModified));
    assert_eq!(search.path_system(a).unwrap_err(), EvaluationError::GraphModified);
}
