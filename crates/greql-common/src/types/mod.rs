//! Core type definitions for GReQL.
//!
//! This module contains the fundamental types shared by the graph store and
//! the query engine:
//! - Identifier types ([`VertexId`], [`EdgeId`])
//! - Property types ([`Value`], [`PropertyKey`])

mod id;
mod value;

pub use id::{EdgeId, VertexId};
pub use value::{PropertyKey, Value};
