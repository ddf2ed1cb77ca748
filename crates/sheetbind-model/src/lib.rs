//! Data model shared by the sheetbind crates.
//!
//! Cell values as produced by sheet sources, bindings from property paths to
//! column names, required-field sets and the schema-less [`Record`] output.

pub mod binding;
pub mod cell;
pub mod error;
pub mod record;

pub use binding::{Binding, BindingSet, PropertyPath, RequiredFields};
pub use cell::{CellValue, MAX_COLUMNS};
pub use error::{ModelError, Result};
pub use record::Record;
