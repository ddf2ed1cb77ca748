//! CSV files as single-sheet workbooks.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use sheetbind_core::{SheetSource, Workbook};
use sheetbind_model::CellValue;

use crate::error::{IngestError, Result};
use crate::memory::MemorySheet;

const UTF8_BOM: char = '\u{feff}';

/// One CSV file exposed as a workbook with a single sheet named after the
/// file stem.
///
/// The first record is the header. Blank cells read as `Null`; short rows are
/// padded and long rows cut to the header width. The file is parsed once on
/// open, so rows can be iterated any number of times.
#[derive(Debug, Clone)]
pub struct CsvWorkbook {
    sheet: MemorySheet,
}

impl CsvWorkbook {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| IngestError::io(path, source))?;
        validate_encoding(&bytes, path)?;

        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Sheet1".to_string());
        let sheet = parse_sheet(name, bytes.as_slice()).map_err(|source| IngestError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(
            path = %path.display(),
            columns = sheet.header().len(),
            rows = sheet.row_count(),
            "loaded CSV"
        );
        Ok(Self { sheet })
    }

    /// Parses CSV text from any reader under the given sheet name.
    pub fn from_reader(
        name: impl Into<String>,
        reader: impl Read,
    ) -> std::result::Result<Self, ::csv::Error> {
        parse_sheet(name.into(), reader).map(|sheet| Self { sheet })
    }

    pub fn table(&self) -> &MemorySheet {
        &self.sheet
    }
}

impl Workbook for CsvWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        vec![self.sheet.name().to_string()]
    }

    fn sheet(&self, name: &str) -> Option<&dyn SheetSource> {
        self.sheet
            .name()
            .eq_ignore_ascii_case(name)
            .then_some(&self.sheet as &dyn SheetSource)
    }

    fn first_sheet(&self) -> Option<&dyn SheetSource> {
        Some(&self.sheet as &dyn SheetSource)
    }

    fn metadata(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }
}

/// Rejects UTF-16 input; a UTF-8 BOM is fine and stripped later.
fn validate_encoding(bytes: &[u8], path: &Path) -> Result<()> {
    let encoding = match bytes {
        [0xFF, 0xFE, ..] => "UTF-16 LE",
        [0xFE, 0xFF, ..] => "UTF-16 BE",
        _ => return Ok(()),
    };
    Err(IngestError::UnsupportedEncoding {
        path: path.to_path_buf(),
        encoding,
    })
}

fn parse_sheet(name: String, reader: impl Read) -> std::result::Result<MemorySheet, ::csv::Error> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut records = reader.records();

    let header: Vec<String> = match records.next().transpose()? {
        Some(record) => record.iter().map(normalize_header).collect(),
        None => Vec::new(),
    };
    let mut sheet = MemorySheet::new(name, header);
    for record in records {
        let record = record?;
        sheet.push_row(record.iter().map(cell_value));
    }
    Ok(sheet)
}

fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches(UTF8_BOM).trim().to_string()
}

fn cell_value(raw: &str) -> CellValue {
    if raw.trim().is_empty() {
        CellValue::Null
    } else {
        CellValue::Text(raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(text: &str) -> CsvWorkbook {
        CsvWorkbook::from_reader("people", text.as_bytes()).expect("parse")
    }

    #[test]
    fn header_bom_and_whitespace_are_stripped() {
        let workbook = load("\u{feff} ID ,Name\n1,Ann\n");
        assert_eq!(workbook.table().header(), ["ID", "Name"]);
    }

    #[test]
    fn blank_cells_are_null_and_rows_are_padded() {
        let workbook = load("ID,Name,Age\n1,,\n2\n");
        let rows: Vec<Vec<CellValue>> = workbook.table().rows().collect();
        assert_eq!(
            rows,
            vec![
                vec![CellValue::from("1"), CellValue::Null, CellValue::Null],
                vec![CellValue::from("2"), CellValue::Null, CellValue::Null],
            ]
        );
    }

    #[test]
    fn empty_input_has_no_columns() {
        let workbook = load("");
        assert!(workbook.table().header().is_empty());
        assert_eq!(workbook.table().row_count(), 0);
    }

    #[test]
    fn utf16_is_rejected() {
        let err = validate_encoding(&[0xFF, 0xFE, 0x41, 0x00], Path::new("x.csv"))
            .expect_err("utf-16");
        assert!(matches!(
            err,
            IngestError::UnsupportedEncoding {
                encoding: "UTF-16 LE",
                ..
            }
        ));
    }
}
