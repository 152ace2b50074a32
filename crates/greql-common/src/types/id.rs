//! Identifier types for graph elements.
//!
//! Identifiers are dense `u64` values handed out by the store. `u64::MAX` is
//! reserved as the invalid sentinel.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// The invalid sentinel identifier.
            pub const INVALID: Self = Self(u64::MAX);

            /// Creates an identifier from its raw value.
            #[inline]
            #[must_use]
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Returns the raw value.
            #[inline]
            #[must_use]
            pub const fn as_u64(self) -> u64 {
                self.0
            }

            /// Returns `true` unless this is the invalid sentinel.
            #[inline]
            #[must_use]
            pub const fn is_valid(self) -> bool {
                self.0 != u64::MAX
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }
    };
}

define_id!(
    /// Identifier of a vertex.
    VertexId,
    "v"
);

define_id!(
    /// Identifier of an edge.
    EdgeId,
    "e"
);
