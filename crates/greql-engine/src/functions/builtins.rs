//! Builtin path functions.

use greql_common::types::{Value, VertexId};
use greql_core::automaton::Automaton;

use super::{Context, Function, QueryValue};
use crate::error::{EvaluationError, Result};
use crate::result::{Path, PathSystem, Slice};

/// Signature of a [`NativeFunction`] body.
pub type Body = fn(&Context<'_>, &Args<'_>) -> Result<QueryValue>;

/// A function backed by a plain `fn` with an argument count range.
pub struct NativeFunction {
    name: &'static str,
    min_args: usize,
    max_args: usize,
    body: Body,
}

impl NativeFunction {
    /// Creates a function accepting `min_args..=max_args` arguments.
    pub const fn new(name: &'static str, min_args: usize, max_args: usize, body: Body) -> Self {
        Self {
            name,
            min_args,
            max_args,
            body,
        }
    }
}

impl Function for NativeFunction {
    fn name(&self) -> &str {
        self.name
    }

    fn evaluate(&self, ctx: &Context<'_>, args: &[QueryValue]) -> Result<QueryValue> {
        if args.len() < self.min_args || args.len() > self.max_args {
            let expected = if self.min_args == self.max_args {
                self.min_args.to_string()
            } else {
                format!("{}..={}", self.min_args, self.max_args)
            };
            return Err(EvaluationError::Arity {
                function: self.name.to_string(),
                expected,
                actual: args.len(),
            });
        }
        (self.body)(
            ctx,
            &Args {
                function: self.name,
                values: args,
            },
        )
    }
}

/// Argument list with typed accessors that report the calling function.
pub struct Args<'a> {
    function: &'static str,
    values: &'a [QueryValue],
}

/// A path system or a slice.
enum Structure<'a> {
    System(&'a PathSystem),
    Slice(&'a Slice),
}

impl<'a> Args<'a> {
    /// Returns the number of arguments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no arguments.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Builds the error for an argument of the wrong type.
    pub fn type_error(&self, position: usize, expected: &'static str) -> EvaluationError {
        EvaluationError::ArgumentType {
            function: self.function.to_string(),
            position,
            expected,
            actual: self.values.get(position).map_or("nothing", QueryValue::type_name),
        }
    }

    /// Returns an argument. The arity was checked before the body runs.
    pub fn get(&self, position: usize) -> &'a QueryValue {
        &self.values[position]
    }

    /// Returns a vertex argument.
    pub fn vertex(&self, position: usize) -> Result<VertexId> {
        self.get(position)
            .as_vertex()
            .ok_or_else(|| self.type_error(position, "Vertex"))
    }

    /// Returns a vertex or a list of vertices argument.
    pub fn vertex_set(&self, position: usize) -> Result<Vec<VertexId>> {
        match self.get(position) {
            QueryValue::Vertex(v) => Ok(vec![*v]),
            QueryValue::List(items) => items
                .iter()
                .map(|item| item.as_vertex().ok_or_else(|| self.type_error(position, "List<Vertex>")))
                .collect(),
            _ => Err(self.type_error(position, "Vertex or List<Vertex>")),
        }
    }

    /// Returns an automaton argument.
    pub fn automaton(&self, position: usize) -> Result<&'a Automaton> {
        self.get(position)
            .as_automaton()
            .map(|a| &**a)
            .ok_or_else(|| self.type_error(position, "Automaton"))
    }

    /// Returns a path argument.
    pub fn path(&self, position: usize) -> Result<&'a Path> {
        self.get(position)
            .as_path()
            .ok_or_else(|| self.type_error(position, "Path"))
    }

    /// Returns a path system argument.
    pub fn path_system(&self, position: usize) -> Result<&'a PathSystem> {
        self.get(position)
            .as_path_system()
            .ok_or_else(|| self.type_error(position, "PathSystem"))
    }

    /// Returns a slice argument.
    pub fn slice(&self, position: usize) -> Result<&'a Slice> {
        self.get(position)
            .as_slice()
            .ok_or_else(|| self.type_error(position, "Slice"))
    }

    fn structure(&self, position: usize) -> Result<Structure<'a>> {
        match self.get(position) {
            QueryValue::PathSystem(ps) => Ok(Structure::System(ps)),
            QueryValue::Slice(s) => Ok(Structure::Slice(s)),
            _ => Err(self.type_error(position, "PathSystem or Slice")),
        }
    }

    /// Returns a non-negative integer argument.
    pub fn count(&self, position: usize) -> Result<usize> {
        self.get(position)
            .as_int64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| self.type_error(position, "non-negative Int"))
    }
}

fn int(n: usize) -> QueryValue {
    QueryValue::from(n as i64)
}

fn null() -> QueryValue {
    QueryValue::Value(Value::Null)
}

/// Every builtin, in registration order.
pub(super) fn all() -> Vec<NativeFunction> {
    vec![
        NativeFunction::new("isReachable", 3, 3, is_reachable),
        NativeFunction::new("matches", 2, 2, matches),
        NativeFunction::new("reachableVertices", 2, 2, reachable_vertices),
        NativeFunction::new("pathSystem", 2, 2, path_system),
        NativeFunction::new("slice", 2, 2, slice),
        NativeFunction::new("leaves", 1, 1, leaves),
        NativeFunction::new("innerNodes", 1, 1, inner_nodes),
        NativeFunction::new("distance", 2, 2, distance),
        NativeFunction::new("degree", 2, 2, degree),
        NativeFunction::new("contains", 2, 2, contains),
        NativeFunction::new("extractPath", 2, 2, extract_path),
        NativeFunction::new("extractPaths", 1, 2, extract_paths),
        NativeFunction::new("depth", 1, 1, depth),
        NativeFunction::new("weight", 1, 1, weight),
        NativeFunction::new("startVertex", 1, 1, start_vertex),
        NativeFunction::new("endVertex", 1, 1, end_vertex),
        NativeFunction::new("length", 1, 1, length),
        NativeFunction::new("vertexTrace", 1, 1, vertex_trace),
        NativeFunction::new("edgeTrace", 1, 1, edge_trace),
        NativeFunction::new("slicingCriterion", 1, 1, slicing_criterion),
        NativeFunction::new("parents", 2, 2, parents),
        NativeFunction::new("children", 2, 2, children),
    ]
}

// === Searches ===

/// `isReachable(start, target, automaton)`
fn is_reachable(ctx: &Context<'_>, args: &Args<'_>) -> Result<QueryValue> {
    let (start, target) = (args.vertex(0)?, args.vertex(1)?);
    let automaton = args.automaton(2)?;
    ctx.search(automaton).is_reachable(start, target).map(QueryValue::from)
}

/// `matches(path, automaton)`
fn matches(ctx: &Context<'_>, args: &Args<'_>) -> Result<QueryValue> {
    let path = args.path(0)?;
    let automaton = args.automaton(1)?;
    ctx.search(automaton).matches(path).map(QueryValue::from)
}

/// `reachableVertices(start | starts, automaton)`
fn reachable_vertices(ctx: &Context<'_>, args: &Args<'_>) -> Result<QueryValue> {
    let starts = args.vertex_set(0)?;
    let automaton = args.automaton(1)?;
    let reached = ctx.search(automaton).reachable_vertices_from(&starts)?;
    Ok(QueryValue::vertices(reached))
}

/// `pathSystem(root, automaton)`
fn path_system(ctx: &Context<'_>, args: &Args<'_>) -> Result<QueryValue> {
    let root = args.vertex(0)?;
    let automaton = args.automaton(1)?;
    ctx.search(automaton).path_system(root).map(QueryValue::from)
}

/// `slice(root | roots, automaton)`
fn slice(ctx: &Context<'_>, args: &Args<'_>) -> Result<QueryValue> {
    let roots = args.vertex_set(0)?;
    let automaton = args.automaton(1)?;
    ctx.search(automaton).slice(&roots).map(QueryValue::from)
}

// === Structure queries ===

fn leaves(_: &Context<'_>, args: &Args<'_>) -> Result<QueryValue> {
    Ok(match args.structure(0)? {
        Structure::System(ps) => QueryValue::vertices(ps.leaves()),
        Structure::Slice(s) => QueryValue::vertices(s.leaves()),
    })
}

fn inner_nodes(_: &Context<'_>, args: &Args<'_>) -> Result<QueryValue> {
    Ok(match args.structure(0)? {
        Structure::System(ps) => QueryValue::vertices(ps.inner_nodes()),
        Structure::Slice(s) => QueryValue::vertices(s.inner_nodes()),
    })
}

/// Null when the vertex is not part of the structure.
fn distance(_: &Context<'_>, args: &Args<'_>) -> Result<QueryValue> {
    let vertex = args.vertex(1)?;
    let d = match args.structure(0)? {
        Structure::System(ps) => ps.distance(vertex),
        Structure::Slice(s) => s.distance(vertex),
    };
    Ok(d.map_or_else(null, |d| QueryValue::from(i64::from(d))))
}

fn degree(_: &Context<'_>, args: &Args<'_>) -> Result<QueryValue> {
    let vertex = args.vertex(1)?;
    let n = match args.get(0) {
        QueryValue::Path(p) => p.degree(vertex),
        _ => match args.structure(0)? {
            Structure::System(ps) => ps.degree(vertex),
            Structure::Slice(s) => s.degree(vertex),
        },
    };
    Ok(int(n))
}

/// `contains(container, element)` for path systems, slices, paths and lists.
fn contains(_: &Context<'_>, args: &Args<'_>) -> Result<QueryValue> {
    let element = args.get(1);
    let found = match (args.get(0), element) {
        (QueryValue::PathSystem(ps), QueryValue::Vertex(v)) => ps.contains_vertex(*v),
        (QueryValue::PathSystem(ps), QueryValue::Edge(e)) => ps.contains_edge(*e),
        (QueryValue::Slice(s), QueryValue::Vertex(v)) => s.contains_vertex(*v),
        (QueryValue::Slice(s), QueryValue::Edge(e)) => s.contains_edge(*e),
        (QueryValue::Path(p), QueryValue::Vertex(v)) => p.contains_vertex(*v),
        (QueryValue::Path(p), QueryValue::Edge(e)) => p.contains_edge(*e),
        (QueryValue::List(items), QueryValue::Vertex(v)) => items.iter().any(|i| i.as_vertex() == Some(*v)),
        (QueryValue::List(items), QueryValue::Edge(e)) => items.iter().any(|i| i.as_edge() == Some(*e)),
        (QueryValue::PathSystem(_) | QueryValue::Slice(_) | QueryValue::Path(_) | QueryValue::List(_), _) => {
            return Err(args.type_error(1, "Vertex or Edge"));
        }
        _ => return Err(args.type_error(0, "PathSystem, Slice, Path or List")),
    };
    Ok(QueryValue::from(found))
}

/// `extractPath(pathSystem, vertex)`, null if the vertex is not reached.
fn extract_path(_: &Context<'_>, args: &Args<'_>) -> Result<QueryValue> {
    let system = args.path_system(0)?;
    let vertex = args.vertex(1)?;
    Ok(system.extract_path(vertex).map_or_else(null, QueryValue::from))
}

/// `extractPaths(pathSystem)`, `extractPaths(pathSystem, length)` or
/// `extractPaths(slice, vertex)`.
fn extract_paths(_: &Context<'_>, args: &Args<'_>) -> Result<QueryValue> {
    match args.structure(0)? {
        Structure::System(ps) if args.len() == 1 => Ok(QueryValue::paths(ps.extract_paths())),
        Structure::System(ps) => Ok(QueryValue::paths(ps.extract_paths_of_length(args.count(1)?))),
        Structure::Slice(s) => {
            if args.len() < 2 {
                return Err(args.type_error(1, "Vertex"));
            }
            Ok(QueryValue::paths(s.extract_paths(args.vertex(1)?)))
        }
    }
}

fn depth(_: &Context<'_>, args: &Args<'_>) -> Result<QueryValue> {
    Ok(QueryValue::from(i64::from(args.path_system(0)?.depth())))
}

/// Number of vertices of a path system, slice or path.
fn weight(_: &Context<'_>, args: &Args<'_>) -> Result<QueryValue> {
    let n = match args.get(0) {
        QueryValue::Path(p) => p.vertex_trace().len(),
        _ => match args.structure(0)? {
            Structure::System(ps) => ps.weight(),
            Structure::Slice(s) => s.vertex_count(),
        },
    };
    Ok(int(n))
}

fn slicing_criterion(_: &Context<'_>, args: &Args<'_>) -> Result<QueryValue> {
    let slice = args.slice(0)?;
    Ok(QueryValue::vertices(slice.slicing_criterion().iter().copied()))
}

/// Distinct parent vertices, looking through free transitions.
fn parents(_: &Context<'_>, args: &Args<'_>) -> Result<QueryValue> {
    let vertex = args.vertex(1)?;
    Ok(match args.structure(0)? {
        Structure::System(ps) => QueryValue::vertices(ps.parent_vertex(vertex)),
        Structure::Slice(s) => {
            let mut seen = Vec::new();
            for (parent, _) in s.parents(vertex) {
                if !seen.contains(&parent) {
                    seen.push(parent);
                }
            }
            QueryValue::vertices(seen)
        }
    })
}

fn children(_: &Context<'_>, args: &Args<'_>) -> Result<QueryValue> {
    let vertex = args.vertex(1)?;
    Ok(match args.structure(0)? {
        Structure::System(ps) => QueryValue::vertices(ps.children(vertex)),
        Structure::Slice(s) => QueryValue::vertices(s.children(vertex)),
    })
}

// === Paths ===

fn start_vertex(_: &Context<'_>, args: &Args<'_>) -> Result<QueryValue> {
    Ok(QueryValue::from(args.path(0)?.start_vertex()))
}

fn end_vertex(_: &Context<'_>, args: &Args<'_>) -> Result<QueryValue> {
    Ok(QueryValue::from(args.path(0)?.end_vertex()))
}

fn length(_: &Context<'_>, args: &Args<'_>) -> Result<QueryValue> {
    Ok(int(args.path(0)?.length()))
}

fn vertex_trace(_: &Context<'_>, args: &Args<'_>) -> Result<QueryValue> {
    Ok(QueryValue::vertices(args.path(0)?.vertex_trace().iter().copied()))
}

fn edge_trace(_: &Context<'_>, args: &Args<'_>) -> Result<QueryValue> {
    let edges = args.path(0)?.edge_trace();
    Ok(QueryValue::List(edges.iter().copied().map(QueryValue::Edge).collect()))
}
