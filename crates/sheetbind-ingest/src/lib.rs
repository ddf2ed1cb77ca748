//! Sheet sources for the sheetbind engine.
//!
//! Every source here parses its input once on open and then serves rows from
//! memory, so a source can be shared by several readers.
//!
//! - [`MemoryWorkbook`]: built in code, for tests and embedding.
//! - [`CsvWorkbook`]: one CSV file as a single sheet.
//! - `XlsxWorkbook` (feature `xlsx`): Excel and OpenDocument files.

#![deny(unsafe_code)]

pub mod csv;
pub mod error;
pub mod memory;
pub mod properties;
#[cfg(feature = "xlsx")]
pub mod xlsx;

use std::path::Path;

use sheetbind_core::Workbook;

pub use crate::csv::CsvWorkbook;
pub use error::{IngestError, Result};
pub use memory::{MemorySheet, MemoryWorkbook};
pub use properties::parse_custom_properties;
#[cfg(feature = "xlsx")]
pub use xlsx::XlsxWorkbook;

/// Opens a workbook, choosing the source by file extension.
pub fn open_workbook(path: impl AsRef<Path>) -> Result<Box<dyn Workbook>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match extension.as_str() {
        "csv" | "txt" => Ok(Box::new(CsvWorkbook::open(path)?)),
        #[cfg(feature = "xlsx")]
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Box::new(XlsxWorkbook::open(path)?)),
        _ => Err(IngestError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension,
        }),
    }
}
