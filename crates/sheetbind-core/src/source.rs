//! Interfaces to the sheet container.
//!
//! Parsing a workbook format is the job of the implementors (see the
//! `sheetbind-ingest` crate); the engine only needs ordered header names,
//! ordered rows of raw cells and free-form document properties.

use std::collections::BTreeMap;

use sheetbind_model::CellValue;

/// Lazy, finite sequence of data rows aligned to header positions.
pub type RowIter<'a> = Box<dyn Iterator<Item = Vec<CellValue>> + 'a>;

/// One sheet: a header row followed by data rows.
///
/// Implementations are read-only; every call to [`SheetSource::rows`] starts
/// an independent pass from the first data row.
pub trait SheetSource: Send + Sync {
    fn name(&self) -> &str;

    /// Column names in order; position 0 is column 1.
    fn header(&self) -> &[String];

    fn rows(&self) -> RowIter<'_>;
}

/// A document holding zero or more sheets.
pub trait Workbook: Send + Sync {
    fn sheet_names(&self) -> Vec<String>;

    fn sheet(&self, name: &str) -> Option<&dyn SheetSource>;

    fn first_sheet(&self) -> Option<&dyn SheetSource> {
        let names = self.sheet_names();
        names.first().and_then(|name| self.sheet(name))
    }

    /// Document properties, passed through verbatim.
    fn metadata(&self) -> BTreeMap<String, String>;
}

/// Which sheet a read targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SheetSelector<'a> {
    #[default]
    First,
    Named(&'a str),
}

impl<'a> From<&'a str> for SheetSelector<'a> {
    fn from(name: &'a str) -> Self {
        Self::Named(name)
    }
}

impl<'a> From<Option<&'a str>> for SheetSelector<'a> {
    fn from(name: Option<&'a str>) -> Self {
        name.map_or(Self::First, Self::Named)
    }
}
