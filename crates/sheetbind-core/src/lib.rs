#![deny(unsafe_code)]

//! Materializes sheet rows into typed objects.
//!
//! A [`Reader`] pulls a header and rows from a [`Workbook`], resolves the
//! header against a [`BindingSet`](sheetbind_model::BindingSet), and binds
//! each cell into a fresh target through its registered [`Shape`]. Bad cells
//! never abort a row; they are recorded in the [`ReadReport`].
//!
//! # Example
//!
//! ```ignore
//! use sheetbind_core::{Reader, SheetSelector};
//! use sheetbind_model::{BindingSet, RequiredFields};
//!
//! let bindings = BindingSet::flat([("Id", "ID"), ("Name", "Name")])?;
//! let people: Vec<Person> = Reader::new(&workbook).read(
//!     SheetSelector::Named("People"),
//!     &bindings,
//!     &RequiredFields::parse(["Name"])?,
//! )?;
//! ```

pub mod binder;
pub mod coerce;
pub mod error;
pub mod materialize;
pub mod pipeline;
pub mod reader;
pub mod shape;
pub mod source;

pub use binder::{FieldOutcome, SkipReason, bind, probe};
pub use coerce::{Coerced, FromCell, ScalarKind, Unconvertible, coerce, parse_datetime};
pub use error::{ReadError, Result};
pub use materialize::{
    ExcludedRow, FieldSkip, MaterializedRows, ReadReport, RecordTarget, RowMaterializer, RowTarget,
};
pub use pipeline::{filtered, filtered_and_sorted, sorted};
pub use reader::Reader;
pub use shape::{Bindable, Element, ElementKind, Leaf, Property, PropertyShape, Shape, ShapeBuilder};
pub use source::{RowIter, SheetSelector, SheetSource, Workbook};
