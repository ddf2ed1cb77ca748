//! Post-processing over a fully materialized sequence.
//!
//! These run after every row has been built, so predicates and comparators
//! always observe complete objects.

use std::cmp::Ordering;

/// Keeps items matching `predicate`, preserving order.
pub fn filtered<T>(items: Vec<T>, predicate: impl FnMut(&T) -> bool) -> Vec<T> {
    let mut predicate = predicate;
    items.into_iter().filter(|item| predicate(item)).collect()
}

/// Stable sort by `compare`.
pub fn sorted<T>(items: Vec<T>, compare: impl FnMut(&T, &T) -> Ordering) -> Vec<T> {
    let mut items = items;
    items.sort_by(compare);
    items
}

/// Filters, then sorts the survivors.
pub fn filtered_and_sorted<T>(
    items: Vec<T>,
    predicate: impl FnMut(&T) -> bool,
    compare: impl FnMut(&T, &T) -> Ordering,
) -> Vec<T> {
    sorted(filtered(items, predicate), compare)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_preserves_order() {
        let kept = filtered(vec![5, 2, 8, 1, 6], |value| *value > 1);
        assert_eq!(kept, vec![5, 2, 8, 6]);
    }

    #[test]
    fn sort_is_stable() {
        let items = vec![(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd')];
        let ordered = sorted(items, |a, b| a.0.cmp(&b.0));
        assert_eq!(ordered, vec![(1, 'b'), (1, 'd'), (2, 'a'), (2, 'c')]);
    }

    #[test]
    fn filter_then_sort() {
        let result = filtered_and_sorted(vec![3, 10, 1, 7], |v| *v != 10, |a, b| b.cmp(a));
        assert_eq!(result, vec![7, 3, 1]);
    }
}
