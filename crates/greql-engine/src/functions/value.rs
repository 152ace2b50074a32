//! Values passed to and returned from library functions.

use std::sync::Arc;

use greql_common::types::{EdgeId, Value, VertexId};
use greql_core::automaton::Automaton;

use crate::result::{Path, PathSystem, Slice};

/// A GReQL value: a property value, a graph element or a search result.
#[derive(Debug, Clone)]
pub enum QueryValue {
    /// A scalar or list property value.
    Value(Value),
    /// A vertex.
    Vertex(VertexId),
    /// An edge.
    Edge(EdgeId),
    /// A list of values.
    List(Vec<QueryValue>),
    /// A path.
    Path(Path),
    /// A path system.
    PathSystem(Arc<PathSystem>),
    /// A slice.
    Slice(Arc<Slice>),
    /// An automaton describing a regular path expression.
    Automaton(Arc<Automaton>),
}

impl QueryValue {
    /// Returns the type name used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Value(v) => v.type_name(),
            Self::Vertex(_) => "Vertex",
            Self::Edge(_) => "Edge",
            Self::List(_) => "List",
            Self::Path(_) => "Path",
            Self::PathSystem(_) => "PathSystem",
            Self::Slice(_) => "Slice",
            Self::Automaton(_) => "Automaton",
        }
    }

    /// Returns the vertex, if this is one.
    #[must_use]
    pub fn as_vertex(&self) -> Option<VertexId> {
        match self {
            Self::Vertex(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the edge, if this is one.
    #[must_use]
    pub fn as_edge(&self) -> Option<EdgeId> {
        match self {
            Self::Edge(e) => Some(*e),
            _ => None,
        }
    }

    /// Returns the list items, if this is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[QueryValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the path, if this is one.
    #[must_use]
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Path(p) => Some(p),
            _ => None,
        }
    }

    /// Returns the path system, if this is one.
    #[must_use]
    pub fn as_path_system(&self) -> Option<&PathSystem> {
        match self {
            Self::PathSystem(ps) => Some(ps),
            _ => None,
        }
    }

    /// Returns the slice, if this is one.
    #[must_use]
    pub fn as_slice(&self) -> Option<&Slice> {
        match self {
            Self::Slice(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the automaton, if this is one.
    #[must_use]
    pub fn as_automaton(&self) -> Option<&Arc<Automaton>> {
        match self {
            Self::Automaton(a) => Some(a),
            _ => None,
        }
    }

    /// Returns the boolean, if this is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Value(v) => v.as_bool(),
            _ => None,
        }
    }

    /// Returns the integer, if this is one.
    #[must_use]
    pub fn as_int64(&self) -> Option<i64> {
        match self {
            Self::Value(v) => v.as_int64(),
            _ => None,
        }
    }

    /// Returns `true` for the null value.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Value(Value::Null))
    }

    /// Collects vertices into a list value.
    pub fn vertices(vertices: impl IntoIterator<Item = VertexId>) -> Self {
        Self::List(vertices.into_iter().map(Self::Vertex).collect())
    }

    /// Collects paths into a list value.
    pub fn paths(paths: impl IntoIterator<Item = Path>) -> Self {
        Self::List(paths.into_iter().map(Self::Path).collect())
    }
}

impl From<Value> for QueryValue {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        Self::Value(Value::Bool(value))
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        Self::Value(Value::Int64(value))
    }
}

impl From<VertexId> for QueryValue {
    fn from(vertex: VertexId) -> Self {
        Self::Vertex(vertex)
    }
}

impl From<EdgeId> for QueryValue {
    fn from(edge: EdgeId) -> Self {
        Self::Edge(edge)
    }
}

impl From<Path> for QueryValue {
    fn from(path: Path) -> Self {
        Self::Path(path)
    }
}

impl From<PathSystem> for QueryValue {
    fn from(system: PathSystem) -> Self {
        Self::PathSystem(Arc::new(system))
    }
}

impl From<Slice> for QueryValue {
    fn from(slice: Slice) -> Self {
        Self::Slice(Arc::new(slice))
    }
}

impl From<Automaton> for QueryValue {
    fn from(automaton: Automaton) -> Self {
        Self::Automaton(Arc::new(automaton))
    }
}

impl From<Arc<Automaton>> for QueryValue {
    fn from(automaton: Arc<Automaton>) -> Self {
        Self::Automaton(automaton)
    }
}
