//! Header-to-binding resolution.

use std::collections::HashMap;

use sheetbind_model::{Binding, BindingSet, MAX_COLUMNS};

use crate::normalize::match_key;

/// Which binding supplies each header column, and which bindings matched
/// no column at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnResolution {
    /// Binding index per header position (0-based).
    columns: Vec<Option<usize>>,
    /// Binding indices, in declaration order, that matched no header column.
    unmatched: Vec<usize>,
}

impl ColumnResolution {
    /// Binding index for the header column at 0-based `position`.
    pub fn binding_for(&self, position: usize) -> Option<usize> {
        self.columns.get(position).copied().flatten()
    }

    /// `(position, binding index)` pairs in header order.
    pub fn assignments(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.columns
            .iter()
            .enumerate()
            .filter_map(|(position, binding)| binding.map(|index| (position, index)))
    }

    pub fn unmatched(&self) -> &[usize] {
        &self.unmatched
    }

    /// Unmatched bindings that carry a static value, in declaration order.
    pub fn defaulted<'a>(&'a self, bindings: &'a BindingSet) -> impl Iterator<Item = &'a Binding> {
        self.unmatched
            .iter()
            .filter_map(|&index| bindings.get(index))
            .filter(|binding| binding.static_value().is_some())
    }

    /// Number of header columns considered.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn matched_count(&self) -> usize {
        self.columns.iter().filter(|binding| binding.is_some()).count()
    }
}

/// Resolves each header column to the first binding, in declaration order,
/// whose column name normalizes to the same text.
///
/// A binding may supply several columns. Columns past [`MAX_COLUMNS`] are
/// ignored. Names without ASCII letters or digits, on either side, never
/// match.
pub fn resolve<S: AsRef<str>>(header: &[S], bindings: &BindingSet) -> ColumnResolution {
    let mut first_by_key: HashMap<String, usize> = HashMap::with_capacity(bindings.len());
    for (index, binding) in bindings.iter().enumerate() {
        let key = match_key(binding.column());
        if key.is_empty() {
            tracing::warn!(
                column = binding.column(),
                property = %binding.path(),
                "column name has no letters or digits and matches nothing"
            );
            continue;
        }
        first_by_key.entry(key).or_insert(index);
    }

    if header.len() > MAX_COLUMNS {
        tracing::warn!(
            columns = header.len(),
            limit = MAX_COLUMNS,
            "header truncated, trailing columns are ignored"
        );
    }

    let mut used = vec![false; bindings.len()];
    let columns: Vec<Option<usize>> = header
        .iter()
        .take(MAX_COLUMNS)
        .map(|name| {
            let found = first_by_key.get(&match_key(name.as_ref())).copied();
            if let Some(index) = found {
                used[index] = true;
            }
            found
        })
        .collect();

    // A later binding sharing a key with an earlier one never wins a column,
    // so it is unmatched even when its column text appears in the header.
    let unmatched: Vec<usize> = (0..bindings.len()).filter(|&index| !used[index]).collect();

    tracing::debug!(
        columns = columns.len(),
        matched = columns.iter().filter(|binding| binding.is_some()).count(),
        unmatched = unmatched.len(),
        "resolved header columns"
    );

    ColumnResolution { columns, unmatched }
}
