//! Registration-time description of a bindable target type.
//!
//! A [`Shape`] is a table of named properties, each carrying a
//! [`PropertyShape`] tag and the accessor used to reach it. Shapes are built
//! once per read through [`Bindable::shape`] and are immutable afterwards.
//!
//! ```ignore
//! #[derive(Default)]
//! struct Employee {
//!     id: i64,
//!     name: String,
//!     tags: Vec<String>,
//!     address: Address,
//! }
//!
//! impl Bindable for Employee {
//!     fn shape() -> Shape<Self> {
//!         Shape::<Self>::builder("Employee")
//!             .field("Id", |e| &mut e.id)
//!             .field("Name", |e| &mut e.name)
//!             .field("Tags", |e| &mut e.tags)
//!             .nested("Address", |e| &mut e.address)
//!             .build()
//!     }
//! }
//! ```

use std::sync::Arc;

use sheetbind_model::CellValue;

use crate::binder::{self, FieldOutcome, SkipReason};
use crate::coerce::{FromCell, ScalarKind};

/// Element type of a list or array leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Scalar(ScalarKind),
    Text,
}

/// How a registered property is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyShape {
    Scalar(ScalarKind),
    Text,
    GrowableList(ElementKind),
    FixedArray(ElementKind),
    Nested,
    /// Only the first element is reachable through a dotted path.
    NestedList,
    ReadOnly,
}

impl From<ElementKind> for PropertyShape {
    fn from(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Scalar(kind) => Self::Scalar(kind),
            ElementKind::Text => Self::Text,
        }
    }
}

/// A value that can be stored as one element of a list or array leaf.
pub trait Element: Sized + 'static {
    fn element_kind() -> ElementKind;

    fn from_raw(raw: &CellValue) -> Result<Self, SkipReason>;

    fn to_cell(&self) -> CellValue;
}

impl Element for String {
    fn element_kind() -> ElementKind {
        ElementKind::Text
    }

    fn from_raw(raw: &CellValue) -> Result<Self, SkipReason> {
        if raw.is_null() {
            return Err(SkipReason::NullValue);
        }
        Ok(raw.to_string())
    }

    fn to_cell(&self) -> CellValue {
        CellValue::Text(self.clone())
    }
}

/// A property type that can sit at the end of a path.
pub trait Leaf: 'static {
    fn shape() -> PropertyShape;

    fn assign(&mut self, raw: &CellValue) -> FieldOutcome;

    /// Current value, as read back for required-field checks.
    fn snapshot(&self) -> CellValue;
}

impl Leaf for String {
    fn shape() -> PropertyShape {
        PropertyShape::Text
    }

    fn assign(&mut self, raw: &CellValue) -> FieldOutcome {
        match String::from_raw(raw) {
            Ok(value) => {
                *self = value;
                FieldOutcome::Applied
            }
            Err(reason) => FieldOutcome::Skipped(reason),
        }
    }

    fn snapshot(&self) -> CellValue {
        CellValue::Text(self.clone())
    }
}

macro_rules! impl_scalar_leaf {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Element for $ty {
                fn element_kind() -> ElementKind {
                    ElementKind::Scalar(<$ty as FromCell>::KIND)
                }

                fn from_raw(raw: &CellValue) -> Result<Self, SkipReason> {
                    if raw.is_null() {
                        return Err(SkipReason::NullValue);
                    }
                    <$ty as FromCell>::from_cell(raw).map_err(SkipReason::Unconvertible)
                }

                fn to_cell(&self) -> CellValue {
                    FromCell::to_cell(self)
                }
            }

            impl Leaf for $ty {
                fn shape() -> PropertyShape {
                    PropertyShape::Scalar(<$ty as FromCell>::KIND)
                }

                fn assign(&mut self, raw: &CellValue) -> FieldOutcome {
                    match <$ty as Element>::from_raw(raw) {
                        Ok(value) => {
                            *self = value;
                            FieldOutcome::Applied
                        }
                        Err(reason) => FieldOutcome::Skipped(reason),
                    }
                }

                fn snapshot(&self) -> CellValue {
                    FromCell::to_cell(self)
                }
            }
        )*
    };
}

impl_scalar_leaf!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    usize,
    f32,
    f64,
    bigdecimal::BigDecimal,
    chrono::NaiveDate,
    chrono::NaiveDateTime,
);

impl<E: Element> Leaf for Option<E> {
    fn shape() -> PropertyShape {
        E::element_kind().into()
    }

    fn assign(&mut self, raw: &CellValue) -> FieldOutcome {
        match E::from_raw(raw) {
            Ok(value) => {
                *self = Some(value);
                FieldOutcome::Applied
            }
            Err(reason) => FieldOutcome::Skipped(reason),
        }
    }

    fn snapshot(&self) -> CellValue {
        self.as_ref().map_or(CellValue::Null, Element::to_cell)
    }
}

/// Every bind appends exactly one element.
impl<E: Element> Leaf for Vec<E> {
    fn shape() -> PropertyShape {
        PropertyShape::GrowableList(E::element_kind())
    }

    fn assign(&mut self, raw: &CellValue) -> FieldOutcome {
        match E::from_raw(raw) {
            Ok(value) => {
                self.push(value);
                FieldOutcome::Applied
            }
            Err(reason) => FieldOutcome::Skipped(reason),
        }
    }

    fn snapshot(&self) -> CellValue {
        join_elements(self)
    }
}

/// Every bind reallocates to `len + 1`, keeping earlier elements.
impl<E: Element> Leaf for Box<[E]> {
    fn shape() -> PropertyShape {
        PropertyShape::FixedArray(E::element_kind())
    }

    fn assign(&mut self, raw: &CellValue) -> FieldOutcome {
        match E::from_raw(raw) {
            Ok(value) => {
                let mut grown = std::mem::take(self).into_vec();
                grown.reserve_exact(1);
                grown.push(value);
                *self = grown.into_boxed_slice();
                FieldOutcome::Applied
            }
            Err(reason) => FieldOutcome::Skipped(reason),
        }
    }

    fn snapshot(&self) -> CellValue {
        join_elements(self)
    }
}

fn join_elements<E: Element>(elements: &[E]) -> CellValue {
    if elements.is_empty() {
        return CellValue::Null;
    }
    let joined = elements
        .iter()
        .map(|element| element.to_cell().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    CellValue::Text(joined)
}

/// A type that can be materialized from a row.
///
/// Types reached through nested paths must implement it as well. Recursive
/// shapes are not supported: building one would never terminate.
pub trait Bindable: Default + 'static {
    fn shape() -> Shape<Self>;
}

type AssignFn<T> = Box<dyn Fn(&mut T, &CellValue) -> FieldOutcome + Send + Sync>;
type DescendFn<T> = Box<dyn Fn(&mut T, &[String], &CellValue) -> FieldOutcome + Send + Sync>;
type ProbeFn<T> = Box<dyn Fn(&mut T, &[String]) -> CellValue + Send + Sync>;

pub(crate) enum Access<T> {
    Leaf {
        assign: AssignFn<T>,
        probe: Box<dyn Fn(&mut T) -> CellValue + Send + Sync>,
    },
    Nested {
        descend: DescendFn<T>,
        probe: ProbeFn<T>,
    },
    ReadOnly(fn(&T) -> CellValue),
}

pub struct Property<T> {
    name: String,
    shape: PropertyShape,
    pub(crate) access: Access<T>,
}

impl<T> Property<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> PropertyShape {
        self.shape
    }

    pub fn is_writable(&self) -> bool {
        !matches!(self.access, Access::ReadOnly(_))
    }
}

impl<T> std::fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("shape", &self.shape)
            .finish()
    }
}

/// Property table of a bindable type.
#[derive(Debug)]
pub struct Shape<T> {
    type_name: &'static str,
    properties: Vec<Property<T>>,
}

impl<T: 'static> Shape<T> {
    pub fn builder(type_name: &'static str) -> ShapeBuilder<T> {
        ShapeBuilder {
            shape: Shape {
                type_name,
                properties: Vec::new(),
            },
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Case-insensitive lookup; the first registration wins on collisions.
    pub fn property(&self, name: &str) -> Option<&Property<T>> {
        self.properties
            .iter()
            .find(|property| property.name.eq_ignore_ascii_case(name))
    }

    pub fn properties(&self) -> &[Property<T>] {
        &self.properties
    }
}

pub struct ShapeBuilder<T> {
    shape: Shape<T>,
}

impl<T: 'static> ShapeBuilder<T> {
    /// Registers a leaf property: scalar, text, `Option`, `Vec` or `Box<[_]>`.
    #[must_use]
    pub fn field<F: Leaf>(mut self, name: &str, access: fn(&mut T) -> &mut F) -> Self {
        self.push(
            name,
            F::shape(),
            Access::Leaf {
                assign: Box::new(move |target: &mut T, raw: &CellValue| {
                    access(target).assign(raw)
                }),
                probe: Box::new(move |target: &mut T| access(target).snapshot()),
            },
        );
        self
    }

    /// Registers a nested object that always exists.
    #[must_use]
    pub fn nested<U: Bindable>(mut self, name: &str, access: fn(&mut T) -> &mut U) -> Self {
        let sub = Arc::new(U::shape());
        let probe_shape = Arc::clone(&sub);
        self.push(
            name,
            PropertyShape::Nested,
            Access::Nested {
                descend: Box::new(move |target: &mut T, rest: &[String], raw: &CellValue| {
                    binder::bind(&sub, access(target), rest, raw)
                }),
                probe: Box::new(move |target: &mut T, rest: &[String]| {
                    binder::probe(&probe_shape, access(target), rest)
                }),
            },
        );
        self
    }

    /// Registers a nested object created on first write.
    #[must_use]
    pub fn optional<U: Bindable>(
        mut self,
        name: &str,
        access: fn(&mut T) -> &mut Option<U>,
    ) -> Self {
        let sub = Arc::new(U::shape());
        let probe_shape = Arc::clone(&sub);
        self.push(
            name,
            PropertyShape::Nested,
            Access::Nested {
                descend: Box::new(move |target: &mut T, rest: &[String], raw: &CellValue| {
                    let child = access(target).get_or_insert_with(U::default);
                    binder::bind(&sub, child, rest, raw)
                }),
                probe: Box::new(move |target: &mut T, rest: &[String]| match access(target) {
                    Some(child) => binder::probe(&probe_shape, child, rest),
                    None => CellValue::Null,
                }),
            },
        );
        self
    }

    /// Registers a list of nested objects.
    ///
    /// Dotted paths cannot index into the list: a write creates the first
    /// element if needed and always lands in it, so the list never grows past
    /// one element this way.
    #[must_use]
    pub fn nested_list<U: Bindable>(
        mut self,
        name: &str,
        access: fn(&mut T) -> &mut Vec<U>,
    ) -> Self {
        let sub = Arc::new(U::shape());
        let probe_shape = Arc::clone(&sub);
        self.push(
            name,
            PropertyShape::NestedList,
            Access::Nested {
                descend: Box::new(move |target: &mut T, rest: &[String], raw: &CellValue| {
                    let list = access(target);
                    if list.is_empty() {
                        list.push(U::default());
                    }
                    binder::bind(&sub, &mut list[0], rest, raw)
                }),
                probe: Box::new(move |target: &mut T, rest: &[String]| {
                    match access(target).first_mut() {
                        Some(first) => binder::probe(&probe_shape, first, rest),
                        None => CellValue::Null,
                    }
                }),
            },
        );
        self
    }

    /// Registers a computed property that can be read but never bound.
    #[must_use]
    pub fn read_only(mut self, name: &str, read: fn(&T) -> CellValue) -> Self {
        self.push(name, PropertyShape::ReadOnly, Access::ReadOnly(read));
        self
    }

    pub fn build(self) -> Shape<T> {
        self.shape
    }

    fn push(&mut self, name: &str, shape: PropertyShape, access: Access<T>) {
        self.shape.properties.push(Property {
            name: name.to_string(),
            shape,
            access,
        });
    }
}
