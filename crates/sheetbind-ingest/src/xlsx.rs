//! Excel and OpenDocument workbooks via `calamine`.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use sheetbind_core::{SheetSource, Workbook, parse_datetime};
use sheetbind_model::CellValue;

use crate::error::{IngestError, Result};
use crate::memory::{MemorySheet, MemoryWorkbook};
use crate::properties::parse_custom_properties;

const CUSTOM_PROPERTIES_PART: &str = "docProps/custom.xml";

/// A workbook loaded from `.xlsx`, `.xlsm`, `.xlsb`, `.xls` or `.ods`.
///
/// Every worksheet is read on open. The first row of each used range is the
/// header. Custom document properties are read from OOXML
/// packages; other formats report no metadata.
#[derive(Debug, Clone)]
pub struct XlsxWorkbook {
    inner: MemoryWorkbook,
}

impl XlsxWorkbook {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(IngestError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let workbook_error = |source| IngestError::Workbook {
            path: path.to_path_buf(),
            source,
        };

        let mut workbook = open_workbook_auto(path).map_err(workbook_error)?;
        let mut inner = MemoryWorkbook::new();
        for name in workbook.sheet_names() {
            let range = workbook.worksheet_range(&name).map_err(workbook_error)?;
            let mut rows = range.rows();
            let header: Vec<String> = rows
                .next()
                .map(|cells| {
                    cells
                        .iter()
                        .map(|cell| cell.to_string().trim().to_string())
                        .collect()
                })
                .unwrap_or_default();
            let mut sheet = MemorySheet::new(name, header);
            for cells in rows {
                sheet.push_row(cells.iter().map(cell_value));
            }
            tracing::debug!(
                sheet = sheet.name(),
                columns = sheet.header().len(),
                rows = sheet.row_count(),
                "loaded worksheet"
            );
            inner.push_sheet(sheet);
        }

        if is_ooxml_package(path) {
            inner.extend_metadata(read_custom_properties(path)?);
        }
        Ok(Self { inner })
    }
}

impl Workbook for XlsxWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.inner.sheet_names()
    }

    fn sheet(&self, name: &str) -> Option<&dyn SheetSource> {
        self.inner.sheet(name)
    }

    fn first_sheet(&self) -> Option<&dyn SheetSource> {
        self.inner.first_sheet()
    }

    fn metadata(&self) -> BTreeMap<String, String> {
        self.inner.metadata()
    }
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(text) if text.trim().is_empty() => CellValue::Null,
        Data::String(text) => CellValue::Text(text.clone()),
        Data::Int(value) => CellValue::from(*value),
        Data::Float(value) => CellValue::Number(*value),
        Data::Bool(value) => CellValue::Bool(*value),
        Data::DateTime(value) => value
            .as_datetime()
            .map_or(CellValue::Number(value.as_f64()), CellValue::DateTime),
        Data::DateTimeIso(text) => {
            parse_datetime(text).map_or_else(|| CellValue::Text(text.clone()), CellValue::DateTime)
        }
        Data::DurationIso(text) => CellValue::Text(text.clone()),
        Data::Error(error) => {
            tracing::trace!(%error, "error cell read as empty");
            CellValue::Null
        }
    }
}

fn is_ooxml_package(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ["xlsx", "xlsm", "xltx", "xltm"]
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

fn read_custom_properties(path: &Path) -> Result<BTreeMap<String, String>> {
    let archive_error = |source| IngestError::Archive {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(|source| IngestError::io(path, source))?;
    let mut archive = zip::ZipArchive::new(file).map_err(archive_error)?;
    let mut part = match archive.by_name(CUSTOM_PROPERTIES_PART) {
        Ok(part) => part,
        Err(zip::result::ZipError::FileNotFound) => return Ok(BTreeMap::new()),
        Err(source) => return Err(archive_error(source)),
    };
    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|source| IngestError::io(path, source))?;
    parse_custom_properties(&xml)
}
