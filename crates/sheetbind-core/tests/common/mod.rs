//! Minimal in-test workbook.

#![allow(dead_code)]

use std::collections::BTreeMap;

use sheetbind_core::{RowIter, SheetSource, Workbook};
use sheetbind_model::CellValue;

pub struct TestSheet {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetSource for TestSheet {
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

#[derive(Default)]
pub struct TestWorkbook {
    pub sheets: Vec<TestSheet>,
    pub metadata: BTreeMap<String, String>,
}

impl TestWorkbook {
    pub fn single(header: &[&str], rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            sheets: vec![TestSheet {
                name: "Sheet1".to_string(),
                header: header.iter().map(|name| (*name).to_string()).collect(),
                rows,
            }],
            metadata: BTreeMap::new(),
        }
    }
}

impl Workbook for TestWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|sheet| sheet.name.clone()).collect()
    }

    fn sheet(&self, name: &str) -> Option<&dyn SheetSource> {
        self.sheets
            .iter()
            .find(|sheet| sheet.name.eq_ignore_ascii_case(name))
            .map(|sheet| sheet as &dyn SheetSource)
    }

    fn metadata(&self) -> BTreeMap<String, String> {
        self.metadata.clone()
    }
}

pub fn text(value: &str) -> CellValue {
    CellValue::from(value)
}
