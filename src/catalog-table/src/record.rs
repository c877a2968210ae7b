//! Dynamically shaped records.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::value::Value;

/// An ordered mapping from field name to value.
///
/// Field order is insertion order and is preserved in every rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field. A repeated name replaces the earlier value in place.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.iter().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether `other` exposes the same field names in the same order.
    pub fn same_shape(&self, other: &Record) -> bool {
        self.field_names().eq(other.field_names())
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.set(k, v);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_order_is_insertion_order() {
        let record = Record::new()
            .with("Price", 9.99)
            .with("Id", 1)
            .with("Name", "A");
        let names: Vec<_> = record.field_names().collect();
        assert_eq!(names, vec!["Price", "Id", "Name"]);
    }

    #[test]
    fn test_set_replaces_in_place() {
        let record = Record::new().with("Id", 1).with("Name", "A").with("Id", 2);
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("Id"), Some(&Value::Int(2)));
        assert_eq!(record.field_names().next(), Some("Id"));
    }

    #[test]
    fn test_same_shape_is_order_sensitive() {
        let a = Record::new().with("Id", 1).with("Name", "A");
        let b = Record::new().with("Name", "B").with("Id", 2);
        assert!(!a.same_shape(&b));
        assert!(a.same_shape(&Record::new().with("Id", 9).with("Name", "Z")));
    }

    #[test]
    fn test_serializes_as_ordered_object() {
        let record = Record::new().with("Id", 1).with("Name", "A");
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"Id":1,"Name":"A"}"#
        );
    }
}
