//! Columnar property storage for vertices and edges.

use greql_common::types::{EdgeId, PropertyKey, Value, VertexId};
use greql_common::utils::hash::FxHashMap;
use parking_lot::RwLock;
use std::hash::Hash;

/// Trait for element IDs that can be used as property storage keys.
pub trait ElementId: Copy + Eq + Hash + Ord + 'static {}

impl ElementId for VertexId {}
impl ElementId for EdgeId {}

/// Columnar property storage.
///
/// Each property key has its own column, so scanning one attribute across
/// many elements (for subgraph construction, for instance) touches a single
/// map.
pub struct PropertyStorage<Id: ElementId = VertexId> {
    columns: RwLock<FxHashMap<PropertyKey, PropertyColumn<Id>>>,
}

impl<Id: ElementId> PropertyStorage<Id> {
    /// Creates a new property storage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            columns: RwLock::new(FxHashMap::default()),
        }
    }

    /// Sets a property value for an element.
    pub fn set(&self, id: Id, key: PropertyKey, value: Value) {
        let mut columns = self.columns.write();
        columns.entry(key).or_default().set(id, value);
    }

    /// Gets a property value for an element.
    #[must_use]
    pub fn get(&self, id: Id, key: &PropertyKey) -> Option<Value> {
        let columns = self.columns.read();
        columns.get(key).and_then(|col| col.get(id))
    }

    /// Removes all properties of an element.
    pub fn remove_all(&self, id: Id) {
        let mut columns = self.columns.write();
        for col in columns.values_mut() {
            col.remove(id);
        }
    }

    /// Gets all properties of an element.
    #[must_use]
    pub fn get_all(&self, id: Id) -> FxHashMap<PropertyKey, Value> {
        let columns = self.columns.read();
        columns
            .iter()
            .filter_map(|(key, col)| col.get(id).map(|value| (key.clone(), value)))
            .collect()
    }

    /// Returns the elements whose `key` property equals `value`, sorted by id.
    #[must_use]
    pub fn find(&self, key: &PropertyKey, value: &Value) -> Vec<Id> {
        let columns = self.columns.read();
        let mut ids: Vec<Id> = columns
            .get(key)
            .map(|col| {
                col.iter()
                    .filter(|(_, v)| *v == value)
                    .map(|(id, _)| id)
                    .collect()
            })
            .unwrap_or_default();
        ids.sort_unstable();
        ids
    }

    /// Returns the keys of all columns.
    #[must_use]
    pub fn keys(&self) -> Vec<PropertyKey> {
        self.columns.read().keys().cloned().collect()
    }
}

impl<Id: ElementId> Default for PropertyStorage<Id> {
    fn default() -> Self {
        Self::new()
    }
}

/// Values of one property key across all elements.
pub struct PropertyColumn<Id: ElementId = VertexId> {
    values: FxHashMap<Id, Value>,
}

impl<Id: ElementId> PropertyColumn<Id> {
    /// Creates a new empty column.
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: FxHashMap::default(),
        }
    }

    /// Sets a value for an element.
    pub fn set(&mut self, id: Id, value: Value) {
        self.values.insert(id, value);
    }

    /// Gets a value for an element.
    #[must_use]
    pub fn get(&self, id: Id) -> Option<Value> {
        self.values.get(&id).cloned()
    }

    /// Removes a value for an element.
    pub fn remove(&mut self, id: Id) -> Option<Value> {
        self.values.remove(&id)
    }

    /// Returns the number of values in this column.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if this column is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over all (id, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Id, &Value)> {
        self.values.iter().map(|(&id, v)| (id, v))
    }
}

impl<Id: ElementId> Default for PropertyColumn<Id> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_storage_basic() {
        let storage = PropertyStorage::new();

        let alice = VertexId::new(1);
        let bob = VertexId::new(2);
        let name_key = PropertyKey::new("name");
        let age_key = PropertyKey::new("age");

        storage.set(alice, name_key.clone(), "Alice".into());
        storage.set(alice, age_key.clone(), 30i64.into());
        storage.set(bob, name_key.clone(), "Bob".into());

        assert_eq!(
            storage.get(alice, &name_key).and_then(|v| v.as_str().map(String::from)),
            Some("Alice".to_string())
        );
        assert_eq!(storage.get(alice, &age_key).and_then(|v| v.as_int64()), Some(30));
        assert!(storage.get(bob, &age_key).is_none());
        assert_eq!(storage.keys().len(), 2);
    }

    #[test]
    fn test_property_storage_remove_all() {
        let storage = PropertyStorage::new();

        let vertex = VertexId::new(1);
        storage.set(vertex, PropertyKey::new("name"), "Alice".into());
        storage.set(vertex, PropertyKey::new("age"), 30i64.into());
        assert_eq!(storage.get_all(vertex).len(), 2);

        storage.remove_all(vertex);

        assert!(storage.get_all(vertex).is_empty());
    }

    #[test]
    fn test_find() {
        let storage = PropertyStorage::new();
        let key = PropertyKey::new("lang");

        storage.set(EdgeId::new(3), key.clone(), "rust".into());
        storage.set(EdgeId::new(1), key.clone(), "rust".into());
        storage.set(EdgeId::new(2), key.clone(), "java".into());

        assert_eq!(
            storage.find(&key, &Value::from("rust")),
            vec![EdgeId::new(1), EdgeId::new(3)]
        );
        assert!(storage.find(&PropertyKey::new("missing"), &Value::Null).is_empty());
    }

    #[test]
    fn test_property_column() {
        let mut col = PropertyColumn::new();

        col.set(VertexId::new(1), "Alice".into());
        col.set(VertexId::new(2), "Bob".into());
        assert_eq!(col.len(), 2);
        assert!(!col.is_empty());

        col.remove(VertexId::new(1));
        assert!(col.get(VertexId::new(1)).is_none());
        assert_eq!(col.len(), 1);
    }
}
