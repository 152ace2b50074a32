//! Hash map and set aliases.
//!
//! All maps use `ahash` with fixed keys so iteration order is stable from
//! one run to the next for the same sequence of insertions.

use std::hash::BuildHasherDefault;

/// Deterministic hasher used by every GReQL map.
pub type FxBuildHasher = BuildHasherDefault<ahash::AHasher>;

/// A `hashbrown` map with the deterministic hasher.
pub type FxHashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

/// A `hashbrown` set with the deterministic hasher.
pub type FxHashSet<T> = hashbrown::HashSet<T, FxBuildHasher>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iteration_is_repeatable() {
        let build = || {
            let mut set = FxHashSet::default();
            for i in 0..64u64 {
                set.insert(i * 7919);
            }
            set.into_iter().collect::<Vec<_>>()
        };
        assert_eq!(build(), build());
    }
}
