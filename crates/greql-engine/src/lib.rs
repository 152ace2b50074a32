//! # greql-engine
//!
//! Regular path expression search over attributed graphs.
//!
//! ## Modules
//!
//! - [`search`] - Automaton-driven BFS: reachability, path verification,
//!   reachable sets, path systems and slices
//! - [`result`] - Paths, path systems and slices
//! - [`functions`] - The GReQL function library and its registry
//! - [`evaluator`] - Binds a graph, limits, a registry and a subgraph
//! - [`config`] - Search limits
//! - [`error`] - Evaluation errors

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod result;
pub mod search;

pub use config::Config;
pub use error::{EvaluationError, Result};
pub use evaluator::Evaluator;
pub use functions::{Context, Function, FunctionRegistry, NativeFunction, QueryValue};
pub use result::{Path, PathSystem, PathSystemEntry, Slice, SliceNode, SliceParent};
pub use search::PathSearch;
