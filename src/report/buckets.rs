//! Insertion-ordered counters for report categories.
//!
//! Each category of a report maps an observed value (for example `"Female"`
//! or `"18-24"`) to the number of attendees carrying it. Keys keep the order
//! in which they were first seen so that charts and legends are drawn the
//! same way every time the same data is aggregated.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketMap {
    entries: Vec<(String, u64)>,
}

impl BucketMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one to `key`, inserting it at the end if it has not been seen.
    pub fn increment(&mut self, key: &str) {
        self.add(key, 1);
    }

    /// Add `count` to `key`, inserting it at the end if it has not been seen.
    pub fn add(&mut self, key: &str, count: u64) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, n)) => *n += count,
            None => self.entries.push((key.to_string(), count)),
        }
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, n)| *n)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(k, n)| (k.as_str(), *n))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for BucketMap {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        let mut map = BucketMap::new();
        for (k, n) in iter {
            map.add(&k.into(), n);
        }
        map
    }
}

impl Serialize for BucketMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, n) in &self.entries {
            map.serialize_entry(k, n)?;
        }
        map.end()
    }
}

struct BucketMapVisitor;

impl<'de> Visitor<'de> for BucketMapVisitor {
    type Value = BucketMap;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of category values to counts")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = BucketMap::new();
        while let Some((key, count)) = access.next_entry::<String, u64>()? {
            map.add(&key, count);
        }
        Ok(map)
    }
}

impl<'de> Deserialize<'de> for BucketMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(BucketMapVisitor)
    }
}
