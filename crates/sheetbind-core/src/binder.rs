//! Walks a property path against a target and writes the leaf.

use std::fmt;

use sheetbind_model::CellValue;

use crate::coerce::Unconvertible;
use crate::shape::{Access, Shape};

/// Why a single field write was skipped. Never fatal for the row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The cell was empty.
    NullValue,
    Unconvertible(Unconvertible),
    /// No property with this name on the target.
    UnknownProperty(String),
    ReadOnly(String),
    /// The path continues past a leaf property.
    NotNested(String),
    /// The path ends on a nested object instead of a leaf.
    NotALeaf(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NullValue => f.write_str("empty cell"),
            Self::Unconvertible(err) => write!(f, "{err}"),
            Self::UnknownProperty(name) => write!(f, "no property named '{name}'"),
            Self::ReadOnly(name) => write!(f, "property '{name}' is read-only"),
            Self::NotNested(name) => write!(f, "property '{name}' has no nested properties"),
            Self::NotALeaf(name) => write!(f, "property '{name}' is an object, not a value"),
        }
    }
}

/// Result of one bind call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOutcome {
    Applied,
    Skipped(SkipReason),
}

impl FieldOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }
}

/// Binds `value` at `path` inside `target`.
///
/// Segments resolve case-insensitively. Missing intermediate objects are
/// created on the way down and stay attached even when a later segment does
/// not resolve.
pub fn bind<T: 'static>(
    shape: &Shape<T>,
    target: &mut T,
    path: &[String],
    value: &CellValue,
) -> FieldOutcome {
    let Some((segment, rest)) = path.split_first() else {
        return FieldOutcome::Skipped(SkipReason::NotALeaf(shape.type_name().to_string()));
    };
    let Some(property) = shape.property(segment) else {
        return FieldOutcome::Skipped(SkipReason::UnknownProperty(segment.clone()));
    };
    match &property.access {
        Access::ReadOnly(_) => FieldOutcome::Skipped(SkipReason::ReadOnly(segment.clone())),
        Access::Leaf { assign, .. } if rest.is_empty() => assign(target, value),
        Access::Leaf { .. } => FieldOutcome::Skipped(SkipReason::NotNested(segment.clone())),
        Access::Nested { .. } if rest.is_empty() => {
            FieldOutcome::Skipped(SkipReason::NotALeaf(segment.clone()))
        }
        Access::Nested { descend, .. } => descend(target, rest, value),
    }
}

/// Reads the value at `path` back out of `target`.
///
/// A path ending on an existing nested object reads as the object's type
/// name. Unresolvable paths, absent optional objects and empty nested lists
/// read as `Null`; nothing is created along the way.
pub fn probe<T: 'static>(shape: &Shape<T>, target: &mut T, path: &[String]) -> CellValue {
    let Some((segment, rest)) = path.split_first() else {
        return CellValue::Text(shape.type_name().to_string());
    };
    let Some(property) = shape.property(segment) else {
        return CellValue::Null;
    };
    match &property.access {
        Access::ReadOnly(read) if rest.is_empty() => read(target),
        Access::Leaf { probe, .. } if rest.is_empty() => probe(target),
        Access::Nested { probe, .. } => probe(target, rest),
        _ => CellValue::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coerce::ScalarKind;
    use crate::shape::Bindable;

    #[derive(Debug, Default)]
    struct Item {
        name: String,
    }

    impl Bindable for Item {
        fn shape() -> Shape<Self> {
            Shape::<Self>::builder("Item").field("Name", |i| &mut i.name).build()
        }
    }

    #[derive(Debug, Default)]
    struct Order {
        item: Item,
    }

    impl Bindable for Order {
        fn shape() -> Shape<Self> {
            Shape::<Self>::builder("Order").nested("Item", |o| &mut o.item).build()
        }
    }

    #[derive(Debug, Default)]
    struct Customer {
        id: i32,
        tags: Vec<String>,
        orders: Vec<Order>,
        primary: Option<Order>,
    }

    impl Bindable for Customer {
        fn shape() -> Shape<Self> {
            Shape::<Self>::builder("Customer")
                .field("Id", |c| &mut c.id)
                .field("Tags", |c| &mut c.tags)
                .nested_list("Orders", |c| &mut c.orders)
                .optional("Primary", |c| &mut c.primary)
                .read_only("OrderCount", |c| CellValue::from(c.orders.len() as i64))
                .build()
        }
    }

    fn path(raw: &str) -> Vec<String> {
        raw.split('.').map(str::to_string).collect()
    }

    #[test]
    fn segments_resolve_case_insensitively() {
        let shape = Customer::shape();
        let mut customer = Customer::default();
        let outcome = bind(&shape, &mut customer, &path("ID"), &CellValue::from("12"));
        assert_eq!(outcome, FieldOutcome::Applied);
        assert_eq!(customer.id, 12);
    }

    #[test]
    fn unconvertible_leaves_previous_value() {
        let shape = Customer::shape();
        let mut customer = Customer {
            id: 3,
            ..Customer::default()
        };
        let outcome = bind(&shape, &mut customer, &path("Id"), &CellValue::from("abc"));
        assert_eq!(
            outcome,
            FieldOutcome::Skipped(SkipReason::Unconvertible(Unconvertible {
                kind: ScalarKind::Int,
                found: "text",
            }))
        );
        assert_eq!(customer.id, 3);
    }

    #[test]
    fn unknown_and_read_only_segments_are_skipped() {
        let shape = Customer::shape();
        let mut customer = Customer::default();
        assert_eq!(
            bind(&shape, &mut customer, &path("Missing"), &CellValue::from("x")),
            FieldOutcome::Skipped(SkipReason::UnknownProperty("Missing".to_string()))
        );
        assert_eq!(
            bind(&shape, &mut customer, &path("OrderCount"), &CellValue::from("4")),
            FieldOutcome::Skipped(SkipReason::ReadOnly("OrderCount".to_string()))
        );
        assert_eq!(
            bind(&shape, &mut customer, &path("Id.Value"), &CellValue::from("4")),
            FieldOutcome::Skipped(SkipReason::NotNested("Id".to_string()))
        );
        assert_eq!(
            bind(&shape, &mut customer, &path("Primary"), &CellValue::from("4")),
            FieldOutcome::Skipped(SkipReason::NotALeaf("Primary".to_string()))
        );
        assert!(customer.primary.is_none());
    }

    #[test]
    fn intermediates_stay_attached_when_leaf_does_not_resolve() {
        let shape = Customer::shape();
        let mut customer = Customer::default();
        let outcome = bind(
            &shape,
            &mut customer,
            &path("Primary.Item.Color"),
            &CellValue::from("red"),
        );
        assert!(outcome.is_skipped());
        let primary = customer.primary.expect("intermediate created");
        assert_eq!(primary.item.name, "");
    }

    #[test]
    fn list_leaf_accumulates() {
        let shape = Customer::shape();
        let mut customer = Customer::default();
        for tag in ["a", "b", "c"] {
            bind(&shape, &mut customer, &path("Tags"), &CellValue::from(tag));
        }
        assert_eq!(customer.tags, vec!["a", "b", "c"]);
    }

    #[test]
    fn nested_list_only_addresses_first_element() {
        let shape = Customer::shape();
        let mut customer = Customer::default();
        bind(&shape, &mut customer, &path("Orders.Item.Name"), &CellValue::from("first"));
        bind(&shape, &mut customer, &path("Orders.Item.Name"), &CellValue::from("second"));
        assert_eq!(customer.orders.len(), 1);
        assert_eq!(customer.orders[0].item.name, "second");
    }

    #[test]
    fn probe_reads_without_creating() {
        let shape = Customer::shape();
        let mut customer = Customer::default();
        assert_eq!(probe(&shape, &mut customer, &path("Primary.Item.Name")), CellValue::Null);
        assert!(customer.primary.is_none());
        assert_eq!(probe(&shape, &mut customer, &path("Orders.Item.Name")), CellValue::Null);
        assert!(customer.orders.is_empty());

        bind(&shape, &mut customer, &path("Orders.Item.Name"), &CellValue::from("x"));
        assert_eq!(
            probe(&shape, &mut customer, &path("orders.item.name")),
            CellValue::from("x")
        );
        assert_eq!(
            probe(&shape, &mut customer, &path("OrderCount")),
            CellValue::Number(1.0)
        );
    }

    #[test]
    fn probe_of_object_path_reflects_presence() {
        let shape = Customer::shape();
        let mut customer = Customer::default();
        assert!(probe(&shape, &mut customer, &path("Primary")).is_null());
        assert!(probe(&shape, &mut customer, &path("Orders")).is_null());

        bind(&shape, &mut customer, &path("Orders.Item.Name"), &CellValue::from("x"));
        customer.primary = Some(Order::default());

        assert_eq!(
            probe(&shape, &mut customer, &path("Orders")),
            CellValue::from("Order")
        );
        assert_eq!(
            probe(&shape, &mut customer, &path("primary.item")),
            CellValue::from("Item")
        );
        assert!(probe(&shape, &mut customer, &path("Orders.Missing")).is_null());
    }
}
