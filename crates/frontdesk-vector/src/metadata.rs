//! Positional metadata table.
//!
//! Entry `i` describes the vector stored at handle `i`. Persisted as a JSON
//! array so ordering and values survive a round-trip exactly. Floats
//! round-trip bit-for-bit and object keys keep insertion order.

use serde_json::Value;

use crate::error::VectorError;

/// File name of the serialized metadata table inside a store directory
pub const METADATA_FILE: &str = "metadata.json";

/// Arbitrary descriptive data attached to one vector
pub type Metadata = serde_json::Map<String, Value>;

/// Ordered metadata entries aligned 1:1 with index handles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataTable {
    entries: Vec<Metadata>,
}

impl MetadataTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the entry for a handle.
    pub fn get(&self, handle: u64) -> Option<&Metadata> {
        usize::try_from(handle)
            .ok()
            .and_then(|i| self.entries.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Metadata> {
        self.entries.iter()
    }

    /// Append entries in order.
    pub fn extend(&mut self, entries: impl IntoIterator<Item = Metadata>) {
        self.entries.extend(entries);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Serialize as a JSON array.
    pub fn to_bytes(&self) -> Result<Vec<u8>, VectorError> {
        serde_json::to_vec(&self.entries).map_err(|e| VectorError::Serialization(e.to_string()))
    }

    /// Parse a JSON array of objects.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, VectorError> {
        let entries: Vec<Metadata> = serde_json::from_slice(bytes)
            .map_err(|e| VectorError::CorruptStore(format!("metadata is malformed: {}", e)))?;
        Ok(Self { entries })
    }
}

impl From<Vec<Metadata>> for MetadataTable {
    fn from(entries: Vec<Metadata>) -> Self {
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use serde_json::json;

    fn meta(value: Value) -> Metadata {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_extend_and_get() {
        let mut table = MetadataTable::new();
        table.extend(vec![
            meta(json!({"title": "Squat guide"})),
            meta(json!({"title": "Bench press tips"})),
        ]);

        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1).unwrap()["title"], "Bench press tips");
        assert!(table.get(2).is_none());
    }

    #[test]
    fn test_bytes_preserve_order_and_values() {
        let table = MetadataTable::from(vec![
            meta(json!({"user_id": 1, "goal": "muscle_gain", "tags": ["a", "b"]})),
            meta(json!({"user_id": 2, "score": 0.75, "active": true, "note": null})),
            meta(json!({})),
        ]);

        let bytes = table.to_bytes().unwrap();
        let restored = MetadataTable::from_bytes(&bytes).unwrap();
        assert_eq!(restored, table);
    }

    #[test]
    fn test_bytes_preserve_float_values_exactly() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut scores: Vec<f64> = (0..2000).map(|_| rng.random::<f64>() * 1000.0).collect();
        scores.extend(
            (0..2000)
                .map(|_| f64::from_bits(rng.random::<u64>()))
                .filter(|v| v.is_finite()),
        );

        let table = MetadataTable::from(
            scores
                .iter()
                .map(|score| meta(json!({"score": score})))
                .collect::<Vec<_>>(),
        );
        let restored = MetadataTable::from_bytes(&table.to_bytes().unwrap()).unwrap();

        for (entry, score) in restored.iter().zip(&scores) {
            assert_eq!(entry["score"].as_f64().unwrap().to_bits(), score.to_bits());
        }
        assert_eq!(restored, table);
    }

    #[test]
    fn test_bytes_keep_key_insertion_order() {
        let mut entry = Metadata::new();
        entry.insert("name".to_string(), json!("Anna"));
        entry.insert("goal".to_string(), json!("endurance"));
        entry.insert("age".to_string(), json!(31));

        let table = MetadataTable::from(vec![entry]);
        let bytes = table.to_bytes().unwrap();
        assert_eq!(
            String::from_utf8(bytes.clone()).unwrap(),
            r#"[{"name":"Anna","goal":"endurance","age":31}]"#
        );

        let restored = MetadataTable::from_bytes(&bytes).unwrap();
        let keys: Vec<&str> = restored.get(0).unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "goal", "age"]);
    }

    #[test]
    fn test_non_array_is_corrupt() {
        let result = MetadataTable::from_bytes(br#"{"title": "not a list"}"#);
        assert!(matches!(result, Err(VectorError::CorruptStore(_))));

        let result = MetadataTable::from_bytes(br#"[1, 2, 3]"#);
        assert!(matches!(result, Err(VectorError::CorruptStore(_))));
    }

    #[test]
    fn test_clear() {
        let mut table = MetadataTable::from(vec![meta(json!({"k": 1}))]);
        table.clear();
        assert!(table.is_empty());
    }
}
