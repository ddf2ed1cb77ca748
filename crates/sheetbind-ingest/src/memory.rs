//! In-memory sheets and workbooks.

use std::collections::BTreeMap;

use sheetbind_core::{RowIter, SheetSource, Workbook};
use sheetbind_model::{CellValue, MAX_COLUMNS};

/// A sheet held entirely in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemorySheet {
    name: String,
    header: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl MemorySheet {
    /// Creates an empty sheet. Header names past [`MAX_COLUMNS`] are dropped.
    pub fn new<I, S>(name: impl Into<String>, header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let mut header: Vec<String> = header.into_iter().map(Into::into).collect();
        if header.len() > MAX_COLUMNS {
            tracing::warn!(
                sheet = %name,
                columns = header.len(),
                limit = MAX_COLUMNS,
                "header truncated"
            );
            header.truncate(MAX_COLUMNS);
        }
        Self {
            name,
            header,
            rows: Vec::new(),
        }
    }

    /// Appends a row; it is padded with `Null` or cut to the header width.
    pub fn push_row<I, V>(&mut self, cells: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        let width = self.header.len();
        let mut row: Vec<CellValue> = cells.into_iter().map(Into::into).take(width).collect();
        row.resize(width, CellValue::Null);
        self.rows.push(row);
    }

    pub fn with_row<I, V>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        self.push_row(cells);
        self
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

impl SheetSource for MemorySheet {
    fn name(&self) -> &str {
        &self.name
    }

    fn header(&self) -> &[String] {
        &self.header
    }

    fn rows(&self) -> RowIter<'_> {
        Box::new(self.rows.iter().cloned())
    }
}

/// An ordered collection of [`MemorySheet`]s plus document properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryWorkbook {
    sheets: Vec<MemorySheet>,
    metadata: BTreeMap<String, String>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_sheet(&mut self, sheet: MemorySheet) {
        self.sheets.push(sheet);
    }

    pub fn with_sheet(mut self, sheet: MemorySheet) -> Self {
        self.push_sheet(sheet);
        self
    }

    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_metadata(key, value);
        self
    }

    pub fn extend_metadata(&mut self, entries: BTreeMap<String, String>) {
        self.metadata.extend(entries);
    }

    pub fn sheets(&self) -> &[MemorySheet] {
        &self.sheets
    }
}

impl Workbook for MemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|sheet| sheet.name.clone()).collect()
    }

    /// Sheet names match case-insensitively; the first match wins.
    fn sheet(&self, name: &str) -> Option<&dyn SheetSource> {
        self.sheets
            .iter()
            .find(|sheet| sheet.name.eq_ignore_ascii_case(name))
            .map(|sheet| sheet as &dyn SheetSource)
    }

    fn first_sheet(&self) -> Option<&dyn SheetSource> {
        self.sheets.first().map(|sheet| sheet as &dyn SheetSource)
    }

    fn metadata(&self) -> BTreeMap<String, String> {
        self.metadata.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_aligned_to_header_width() {
        let sheet = MemorySheet::new("People", ["Id", "Name", "Age"])
            .with_row([CellValue::from(1), CellValue::from("Ann")])
            .with_row(["2", "Bob", "40", "extra"]);

        let rows: Vec<Vec<CellValue>> = sheet.rows().collect();
        assert_eq!(rows[0], vec![CellValue::Number(1.0), "Ann".into(), CellValue::Null]);
        assert_eq!(rows[1].len(), 3);
    }

    #[test]
    fn rows_restart_on_every_call() {
        let sheet = MemorySheet::new("S", ["A"]).with_row(["x"]).with_row(["y"]);
        assert_eq!(sheet.rows().count(), 2);
        assert_eq!(sheet.rows().count(), 2);
    }

    #[test]
    fn sheet_lookup_ignores_case() {
        let workbook = MemoryWorkbook::new()
            .with_sheet(MemorySheet::new("Staff", ["Id"]))
            .with_sheet(MemorySheet::new("Orders", ["Id"]));
        assert_eq!(workbook.sheet("orders").map(|s| s.name()), Some("Orders"));
        assert_eq!(workbook.first_sheet().map(|s| s.name()), Some("Staff"));
        assert!(workbook.sheet("Missing").is_none());
    }
}
