#![deny(unsafe_code)]

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::cell::CellValue;

/// Schema-less row output: property names in first-write order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(IndexMap<String, CellValue>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a property, reusing an existing key that differs only by case.
    pub fn set(&mut self, name: &str, value: CellValue) {
        match self.key_of(name) {
            Some(existing) => {
                let existing = existing.to_string();
                self.0.insert(existing, value);
            }
            None => {
                self.0.insert(name.to_string(), value);
            }
        }
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&CellValue> {
        self.0
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, CellValue> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn key_of(&self, name: &str) -> Option<&str> {
        self.0
            .keys()
            .find(|key| key.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }
}

impl<K: Into<String>> FromIterator<(K, CellValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, CellValue)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (key, value) in iter {
            record.set(&key.into(), value);
        }
        record
    }
}
