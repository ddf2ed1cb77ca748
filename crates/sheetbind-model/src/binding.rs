#![deny(unsafe_code)]

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cell::CellValue;
use crate::error::{ModelError, Result};

/// A dotted property path such as `Address.City`, stored as ordered segments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PropertyPath(Vec<String>);

impl PropertyPath {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ModelError::EmptyPath);
        }
        let segments: Vec<String> = trimmed
            .split('.')
            .map(|segment| segment.trim().to_string())
            .collect();
        if segments.iter().any(String::is_empty) {
            return Err(ModelError::EmptySegment(raw.to_string()));
        }
        Ok(Self(segments))
    }

    pub fn from_segments<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(ModelError::EmptyPath);
        }
        if segments.iter().any(|segment| segment.trim().is_empty()) {
            return Err(ModelError::EmptySegment(segments.join(".")));
        }
        Ok(Self(segments))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// The final segment; paths are never empty.
    pub fn leaf(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Case-insensitive comparison, the way property names are resolved.
    pub fn matches(&self, other: &PropertyPath) -> bool {
        self.0.len() == other.0.len()
            && self
                .0
                .iter()
                .zip(&other.0)
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

impl TryFrom<String> for PropertyPath {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<PropertyPath> for String {
    fn from(value: PropertyPath) -> Self {
        value.to_string()
    }
}

/// Links a target property path to a source column, with an optional
/// fallback used when the column is absent from the header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BindingSpec")]
pub struct Binding {
    #[serde(rename = "property")]
    path: PropertyPath,
    column: String,
    #[serde(default, rename = "default", skip_serializing_if = "Option::is_none")]
    static_value: Option<CellValue>,
}

/// Unvalidated wire form of [`Binding`].
#[derive(Deserialize)]
struct BindingSpec {
    property: PropertyPath,
    column: String,
    #[serde(default)]
    default: Option<CellValue>,
}

impl TryFrom<BindingSpec> for Binding {
    type Error = ModelError;

    fn try_from(spec: BindingSpec) -> Result<Self> {
        let binding = Self::from_path(spec.property, spec.column)?;
        Ok(match spec.default {
            Some(value) => binding.with_static(value),
            None => binding,
        })
    }
}

impl Binding {
    pub fn new(path: &str, column: impl Into<String>) -> Result<Self> {
        Self::from_path(PropertyPath::parse(path)?, column)
    }

    pub fn from_path(path: PropertyPath, column: impl Into<String>) -> Result<Self> {
        let column = column.into();
        if column.trim().is_empty() {
            return Err(ModelError::EmptyColumn(path.to_string()));
        }
        Ok(Self {
            path,
            column,
            static_value: None,
        })
    }

    #[must_use]
    pub fn with_static(mut self, value: impl Into<CellValue>) -> Self {
        let value = value.into();
        self.static_value = if value.is_null() { None } else { Some(value) };
        self
    }

    pub fn path(&self) -> &PropertyPath {
        &self.path
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn static_value(&self) -> Option<&CellValue> {
        self.static_value.as_ref()
    }
}

/// Ordered bindings; declaration order breaks ties during column matching.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BindingSet(Vec<Binding>);

impl BindingSet {
    pub fn new(bindings: Vec<Binding>) -> Self {
        Self(bindings)
    }

    /// Builds the simplified form from `(property, column)` pairs: one flat
    /// property per column, no nesting and no static values.
    pub fn flat<I, P, C>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (P, C)>,
        P: AsRef<str>,
        C: Into<String>,
    {
        let mut bindings = Vec::new();
        for (property, column) in pairs {
            let path = PropertyPath::from_segments([property.as_ref().trim()])?;
            bindings.push(Binding::from_path(path, column)?);
        }
        Ok(Self(bindings))
    }

    pub fn push(&mut self, binding: Binding) {
        self.0.push(binding);
    }

    pub fn extend(&mut self, other: BindingSet) {
        self.0.extend(other.0);
    }

    pub fn get(&self, index: usize) -> Option<&Binding> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Binding> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Binding> for BindingSet {
    fn from_iter<I: IntoIterator<Item = Binding>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a BindingSet {
    type Item = &'a Binding;
    type IntoIter = std::slice::Iter<'a, Binding>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Property paths that must hold a non-blank value for a row to be kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequiredFields(Vec<PropertyPath>);

impl RequiredFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse<I, S>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut required = Self::new();
        for path in paths {
            required.insert(PropertyPath::parse(path.as_ref())?);
        }
        Ok(required)
    }

    pub fn insert(&mut self, path: PropertyPath) {
        if !self.contains(&path) {
            self.0.push(path);
        }
    }

    pub fn contains(&self, path: &PropertyPath) -> bool {
        self.0.iter().any(|existing| existing.matches(path))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PropertyPath> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
