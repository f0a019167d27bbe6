use std::collections::HashMap;

use serde::Serialize;

/// Argument map of a hook command.
///
/// Keys are unique. Each key maps to the ordered values collected from every
/// argument line that named it, so a key repeated across lines accumulates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Arguments {
    values: HashMap<String, Vec<String>>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `values` to the sequence stored under `key`, creating it if absent.
    pub fn append<I>(&mut self, key: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.values.entry(key.into()).or_default().extend(values);
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.values.get(key).map(Vec::as_slice)
    }

    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.values
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }
}
