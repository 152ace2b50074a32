//! Graph and automaton files.
//!
//! Both are JSON. Vertices and edges are named by strings in the files and
//! mapped to store ids on load; the names come back out in every report.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use greql_common::types::{EdgeId, Value, VertexId};
use greql_common::utils::hash::FxHashMap;
use greql_core::automaton::{Automaton, AutomatonError, State, StateId, Transition, TransitionKind, TypeFilter};
use greql_core::graph::Direction;
use greql_core::graph::lpg::LpgStore;
use serde::Deserialize;
use thiserror::Error;

/// Problems reading an input file.
#[derive(Error, Debug)]
pub enum InputError {
    /// The file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON for its format.
    #[error("cannot parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("vertex '{0}' is defined twice")]
    DuplicateVertex(String),

    #[error("edge '{0}' is defined twice")]
    DuplicateEdge(String),

    #[error("unknown vertex '{0}'")]
    UnknownVertex(String),

    #[error("unknown edge '{0}'")]
    UnknownEdge(String),

    /// Objects have no property value counterpart.
    #[error("property '{key}' has an unsupported value")]
    UnsupportedValue { key: String },

    #[error("transition of state {state}: {reason}")]
    InvalidTransition { state: usize, reason: String },

    #[error(transparent)]
    Automaton(#[from] AutomatonError),

    #[error(transparent)]
    Store(#[from] greql_common::Error),
}

type Result<T> = std::result::Result<T, InputError>;

#[derive(Debug, Deserialize)]
struct GraphFile {
    #[serde(default)]
    vertices: Vec<VertexDef>,
    #[serde(default)]
    edges: Vec<EdgeDef>,
}

#[derive(Debug, Deserialize)]
struct VertexDef {
    id: String,
    #[serde(default)]
    labels: Vec<String>,
    #[serde(default)]
    properties: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct EdgeDef {
    #[serde(default)]
    id: Option<String>,
    from: String,
    to: String,
    #[serde(rename = "type")]
    edge_type: String,
    #[serde(default)]
    properties: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct AutomatonFile {
    #[serde(default)]
    initial: u32,
    states: Vec<StateDef>,
}

#[derive(Debug, Deserialize)]
struct StateDef {
    #[serde(default, rename = "final")]
    is_final: bool,
    #[serde(default)]
    transitions: Vec<TransitionDef>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum DirectionDef {
    #[default]
    #[serde(alias = "outgoing")]
    Out,
    #[serde(alias = "incoming")]
    In,
    Both,
}

impl From<DirectionDef> for Direction {
    fn from(d: DirectionDef) -> Self {
        match d {
            DirectionDef::Out => Direction::Outgoing,
            DirectionDef::In => Direction::Incoming,
            DirectionDef::Both => Direction::Both,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum TransitionDef {
    Edge {
        to: u32,
        #[serde(default)]
        direction: DirectionDef,
        #[serde(default)]
        types: Option<Vec<String>>,
        #[serde(default)]
        exclude: Option<Vec<String>>,
        #[serde(default)]
        pattern: Option<String>,
    },
    BoundEdge {
        to: u32,
        edge: String,
        #[serde(default)]
        direction: DirectionDef,
    },
    VertexType {
        to: u32,
        #[serde(default)]
        types: Option<Vec<String>>,
        #[serde(default)]
        exclude: Option<Vec<String>>,
        #[serde(default)]
        pattern: Option<String>,
    },
    Vertex {
        to: u32,
        vertices: Vec<String>,
    },
    Property {
        to: u32,
        key: String,
        value: serde_json::Value,
    },
    Epsilon {
        to: u32,
    },
}

/// A graph loaded from a file, with its names.
pub struct LoadedGraph {
    pub store: LpgStore,
    vertices: FxHashMap<String, VertexId>,
    vertex_names: FxHashMap<VertexId, String>,
    edges: FxHashMap<String, EdgeId>,
    edge_names: FxHashMap<EdgeId, String>,
}

impl std::fmt::Debug for LoadedGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedGraph").finish_non_exhaustive()
    }
}

impl LoadedGraph {
    /// Looks up a vertex by its file name.
    pub fn vertex(&self, name: &str) -> Result<VertexId> {
        self.vertices
            .get(name)
            .copied()
            .ok_or_else(|| InputError::UnknownVertex(name.to_string()))
    }

    /// Looks up an edge by its file name.
    pub fn edge(&self, name: &str) -> Result<EdgeId> {
        self.edges
            .get(name)
            .copied()
            .ok_or_else(|| InputError::UnknownEdge(name.to_string()))
    }

    pub fn vertex_name(&self, vertex: VertexId) -> String {
        self.vertex_names
            .get(&vertex)
            .cloned()
            .unwrap_or_else(|| vertex.to_string())
    }

    pub fn edge_name(&self, edge: EdgeId) -> String {
        self.edge_names.get(&edge).cloned().unwrap_or_else(|| edge.to_string())
    }
}

fn read<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| InputError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn to_value(key: &str, json: &serde_json::Value) -> Result<Value> {
    Ok(match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int64(i),
            None => Value::Float64(n.as_f64().ok_or_else(|| InputError::UnsupportedValue { key: key.to_string() })?),
        },
        serde_json::Value::String(s) => Value::from(s.as_str()),
        serde_json::Value::Array(items) => {
            Value::List(items.iter().map(|item| to_value(key, item)).collect::<Result<_>>()?)
        }
        serde_json::Value::Object(_) => return Err(InputError::UnsupportedValue { key: key.to_string() }),
    })
}

fn properties(raw: &BTreeMap<String, serde_json::Value>) -> Result<Vec<(&str, Value)>> {
    raw.iter()
        .map(|(key, json)| Ok((key.as_str(), to_value(key, json)?)))
        .collect()
}

/// Loads a graph file into a fresh store.
pub fn load_graph(path: &Path) -> Result<LoadedGraph> {
    let file: GraphFile = read(path)?;
    let store = LpgStore::new();
    let mut graph = LoadedGraph {
        store,
        vertices: FxHashMap::default(),
        vertex_names: FxHashMap::default(),
        edges: FxHashMap::default(),
        edge_names: FxHashMap::default(),
    };

    for def in &file.vertices {
        if graph.vertices.contains_key(&def.id) {
            return Err(InputError::DuplicateVertex(def.id.clone()));
        }
        let labels: Vec<&str> = def.labels.iter().map(String::as_str).collect();
        let id = graph
            .store
            .create_vertex_with_props(&labels, properties(&def.properties)?)?;
        graph.vertices.insert(def.id.clone(), id);
        graph.vertex_names.insert(id, def.id.clone());
    }

    for (index, def) in file.edges.iter().enumerate() {
        let name = def.id.clone().unwrap_or_else(|| format!("e{index}"));
        if graph.edges.contains_key(&name) {
            return Err(InputError::DuplicateEdge(name));
        }
        let (src, dst) = (graph.vertex(&def.from)?, graph.vertex(&def.to)?);
        let id = graph
            .store
            .create_edge_with_props(src, dst, &def.edge_type, properties(&def.properties)?)?;
        graph.edges.insert(name.clone(), id);
        graph.edge_names.insert(id, name);
    }

    tracing::debug!(
        path = %path.display(),
        vertices = graph.store.vertex_count(),
        edges = graph.store.edge_count(),
        "graph loaded"
    );
    Ok(graph)
}

fn type_filter(
    state: usize,
    types: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
    pattern: Option<String>,
) -> Result<TypeFilter> {
    let invalid = |reason: String| InputError::InvalidTransition { state, reason };
    match (types, exclude, pattern) {
        (None, None, None) => Ok(TypeFilter::Any),
        (Some(names), None, None) => Ok(TypeFilter::names(names)),
        (None, Some(names), None) => Ok(TypeFilter::excluding(names)),
        (None, None, Some(pattern)) => {
            TypeFilter::pattern(&pattern).map_err(|e| invalid(format!("bad pattern '{pattern}': {e}")))
        }
        _ => Err(invalid("at most one of 'types', 'exclude' and 'pattern' may be given".to_string())),
    }
}

fn transition(graph: &LoadedGraph, state: usize, def: TransitionDef) -> Result<Transition> {
    let (to, kind) = match def {
        TransitionDef::Edge {
            to,
            direction,
            types,
            exclude,
            pattern,
        } => (
            to,
            TransitionKind::Edge {
                direction: direction.into(),
                edge_types: type_filter(state, types, exclude, pattern)?,
            },
        ),
        TransitionDef::BoundEdge { to, edge, direction } => (
            to,
            TransitionKind::BoundEdge {
                edge: graph.edge(&edge)?,
                direction: direction.into(),
            },
        ),
        TransitionDef::VertexType {
            to,
            types,
            exclude,
            pattern,
        } => (
            to,
            TransitionKind::VertexType {
                types: type_filter(state, types, exclude, pattern)?,
            },
        ),
        TransitionDef::Vertex { to, vertices } => (
            to,
            TransitionKind::Vertex {
                vertices: vertices
                    .iter()
                    .map(|name| graph.vertex(name))
                    .collect::<Result<_>>()?,
            },
        ),
        TransitionDef::Property { to, key, value } => {
            let value = to_value(&key, &value)?;
            (
                to,
                TransitionKind::Property {
                    key: key.as_str().into(),
                    value,
                },
            )
        }
        TransitionDef::Epsilon { to } => (to, TransitionKind::Epsilon),
    };
    Ok(Transition::new(StateId::new(to), kind))
}

/// Loads an automaton file. Vertex and edge names refer to `graph`.
pub fn load_automaton(path: &Path, graph: &LoadedGraph) -> Result<Automaton> {
    let file: AutomatonFile = read(path)?;
    let mut states = Vec::with_capacity(file.states.len());
    for (position, def) in file.states.into_iter().enumerate() {
        let transitions = def
            .transitions
            .into_iter()
            .map(|t| transition(graph, position, t))
            .collect::<Result<Vec<_>>>()?;
        states.push(State::new(StateId::new(position as u32), def.is_final, transitions));
    }
    let automaton = Automaton::new(states, StateId::new(file.initial))?;
    tracing::debug!(
        path = %path.display(),
        states = automaton.state_count(),
        "automaton loaded"
    );
    Ok(automaton)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use greql_core::graph::GraphAccess;
    use tempfile::NamedTempFile;

    use super::*;

    fn file(contents: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    const GRAPH: &str = r#"{
        "vertices": [
            { "id": "alice", "labels": ["Person"], "properties": { "age": 30 } },
            { "id": "bob", "labels": ["Person"] },
            { "id": "acme", "labels": ["Company"], "properties": { "tags": ["a", "b"] } }
        ],
        "edges": [
            { "id": "k", "from": "alice", "to": "bob", "type": "KNOWS" },
            { "from": "bob", "to": "acme", "type": "WORKS_AT", "properties": { "since": 2020 } }
        ]
    }"#;

    #[test]
    fn test_load_graph() {
        let f = file(GRAPH);
        let graph = load_graph(f.path()).unwrap();
        assert_eq!(graph.store.vertex_count(), 3);
        assert_eq!(graph.store.edge_count(), 2);

        let alice = graph.vertex("alice").unwrap();
        assert_eq!(graph.vertex_name(alice), "alice");
        assert_eq!(
            graph.store.vertex_property(alice, &"age".into()),
            Some(Value::Int64(30))
        );
        let unnamed = graph.edge("e1").unwrap();
        assert_eq!(graph.edge_name(unnamed), "e1");
        assert!(matches!(graph.vertex("carol"), Err(InputError::UnknownVertex(_))));
    }

    #[test]
    fn test_graph_errors() {
        let dup = file(r#"{ "vertices": [{ "id": "a" }, { "id": "a" }] }"#);
        assert!(matches!(load_graph(dup.path()), Err(InputError::DuplicateVertex(_))));

        let dangling = file(r#"{ "vertices": [{ "id": "a" }], "edges": [{ "from": "a", "to": "z", "type": "E" }] }"#);
        assert!(matches!(load_graph(dangling.path()), Err(InputError::UnknownVertex(name)) if name == "z"));

        let object = file(r#"{ "vertices": [{ "id": "a", "properties": { "x": { "y": 1 } } }] }"#);
        assert!(matches!(load_graph(object.path()), Err(InputError::UnsupportedValue { .. })));

        let broken = file("{ not json");
        assert!(matches!(load_graph(broken.path()), Err(InputError::Json { .. })));
        assert!(matches!(
            load_graph(Path::new("/definitely/not/here.json")),
            Err(InputError::Io { .. })
        ));
    }

    #[test]
    fn test_too_many_labels() {
        let vertices: Vec<String> = (0..=64)
            .map(|i| format!(r#"{{ "id": "v{i}", "labels": ["L{i}"] }}"#))
            .collect();
        let f = file(&format!(r#"{{ "vertices": [{}] }}"#, vertices.join(", ")));
        let err = load_graph(f.path()).unwrap_err();
        assert!(matches!(
            err,
            InputError::Store(greql_common::Error::TooManyLabels(64))
        ));
        assert!(err.to_string().contains("too many labels"));
    }

    #[test]
    fn test_load_automaton() {
        let g = file(GRAPH);
        let graph = load_graph(g.path()).unwrap();
        let a = file(
            r#"{
            "initial": 0,
            "states": [
                { "transitions": [
                    { "kind": "edge", "to": 1, "direction": "out", "types": ["KNOWS"] },
                    { "kind": "bound_edge", "to": 1, "edge": "e1" }
                ] },
                { "transitions": [
                    { "kind": "vertex_type", "to": 2, "pattern": "Per.*" },
                    { "kind": "property", "to": 2, "key": "age", "value": 30 },
                    { "kind": "vertex", "to": 2, "vertices": ["acme"] },
                    { "kind": "epsilon", "to": 2 }
                ] },
                { "final": true }
            ]
        }"#,
        );
        let automaton = load_automaton(a.path(), &graph).unwrap();
        assert_eq!(automaton.state_count(), 3);
        assert_eq!(automaton.final_states().collect::<Vec<_>>(), vec![StateId::new(2)]);
        let first = automaton.state(StateId::new(0)).unwrap();
        assert_eq!(first.transitions().len(), 2);
        assert!(first.has_consuming_transitions());
    }

    #[test]
    fn test_automaton_errors() {
        let g = file(GRAPH);
        let graph = load_graph(g.path()).unwrap();

        let dangling = file(r#"{ "states": [{ "transitions": [{ "kind": "epsilon", "to": 5 }] }] }"#);
        assert!(matches!(
            load_automaton(dangling.path(), &graph),
            Err(InputError::Automaton(AutomatonError::DanglingTransition { .. }))
        ));

        let both = file(r#"{ "states": [{ "transitions": [{ "kind": "edge", "to": 0, "types": ["A"], "exclude": ["B"] }] }] }"#);
        assert!(matches!(
            load_automaton(both.path(), &graph),
            Err(InputError::InvalidTransition { state: 0, .. })
        ));

        let bad_edge = file(r#"{ "states": [{ "transitions": [{ "kind": "bound_edge", "to": 0, "edge": "nope" }] }] }"#);
        assert!(matches!(load_automaton(bad_edge.path(), &graph), Err(InputError::UnknownEdge(_))));

        let empty = file(r#"{ "states": [] }"#);
        assert!(matches!(
            load_automaton(empty.path(), &graph),
            Err(InputError::Automaton(AutomatonError::Empty))
        ));
    }
}
