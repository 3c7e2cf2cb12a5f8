use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Session state for a single request/response exchange.
///
/// Only `values` is written to the cache; the ID travels in the cookie.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Session {
    #[serde(skip)]
    pub(crate) id: String,
    pub(crate) values: HashMap<String, Value>,
    #[serde(skip)]
    pub(crate) is_new: bool,
}

impl Session {
    pub fn new(id: String) -> Self {
        Session {
            id,
            values: HashMap::new(),
            is_new: true,
        }
    }
    pub fn id(&self) -> &str {
        &self.id
    }
    /// True until the session has been read back from the cache.
    pub fn is_new(&self) -> bool {
        self.is_new
    }
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.values
            .get(key)
            .and_then(|value| serde_json::from_value::<T>(value.clone()).ok())
    }
    pub fn insert(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(value)?;
        self.insert(key, value);
        Ok(())
    }
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }
    pub fn clear(&mut self) {
        self.values = HashMap::new();
    }
    pub fn values(&self) -> &HashMap<String, Value> {
        &self.values
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
