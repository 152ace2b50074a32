//! The GReQL function library.
//!
//! Functions are looked up by name in a [`FunctionRegistry`]. There is no
//! global registry: each [`Evaluator`](crate::Evaluator) owns one, usually
//! [`FunctionRegistry::with_builtins`], and callers may register their own
//! [`Function`]s next to the builtins.

mod builtins;
mod value;

use std::fmt;
use std::sync::Arc;

use greql_core::automaton::Automaton;
use greql_core::graph::GraphAccess;
use greql_core::graph::subgraph::SubgraphFilter;
use indexmap::IndexMap;

pub use builtins::{Args, Body, NativeFunction};
pub use value::QueryValue;

use crate::config::Config;
use crate::error::{EvaluationError, Result};
use crate::search::PathSearch;

/// What a function can see while it runs.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    /// The graph being queried.
    pub graph: &'a dyn GraphAccess,
    /// Search limits.
    pub config: &'a Config,
    /// Optional subgraph restriction for searches.
    pub subgraph: Option<&'a dyn SubgraphFilter>,
}

impl<'a> Context<'a> {
    /// Creates a context over the whole graph.
    pub fn new(graph: &'a dyn GraphAccess, config: &'a Config) -> Self {
        Self {
            graph,
            config,
            subgraph: None,
        }
    }

    /// Creates a path search configured like this context.
    pub fn search<'s>(&'s self, automaton: &'s Automaton) -> PathSearch<'s, dyn GraphAccess + 'a> {
        let search = PathSearch::new(self.graph, automaton).with_config(self.config.clone());
        match self.subgraph {
            Some(subgraph) => search.with_subgraph(subgraph),
            None => search,
        }
    }
}

/// A named library function.
pub trait Function: Send + Sync {
    /// The name the function is called by.
    fn name(&self) -> &str;

    /// Evaluates the function.
    fn evaluate(&self, ctx: &Context<'_>, args: &[QueryValue]) -> Result<QueryValue>;
}

/// Name-to-function lookup table.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: IndexMap<String, Arc<dyn Function>>,
}

impl FunctionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every builtin function.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for function in builtins::all() {
            registry.register(function);
        }
        registry
    }

    /// Registers `function` under its name, returning the one it replaces.
    pub fn register(&mut self, function: impl Function + 'static) -> Option<Arc<dyn Function>> {
        let name = function.name().to_string();
        self.functions.insert(name, Arc::new(function))
    }

    /// Looks up a function.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Function>> {
        self.functions.get(name)
    }

    /// Returns `true` if a function is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Iterates over the registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    /// Returns the number of registered functions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Calls the function registered under `name`.
    ///
    /// # Errors
    ///
    /// `UnknownFunction` if nothing is registered under `name`, otherwise
    /// whatever the function returns.
    pub fn call(&self, ctx: &Context<'_>, name: &str, args: &[QueryValue]) -> Result<QueryValue> {
        let function = self
            .get(name)
            .ok_or_else(|| EvaluationError::UnknownFunction(name.to_string()))?;
        tracing::trace!(function = name, args = args.len(), "calling function");
        function.evaluate(ctx, args)
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}
