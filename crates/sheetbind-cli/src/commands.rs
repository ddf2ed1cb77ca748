//! Command implementations, independent of argument parsing.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};

use sheetbind_core::{ReadReport, Reader, RecordTarget, SheetSelector, Workbook};
use sheetbind_ingest::open_workbook;
use sheetbind_model::{BindingSet, Record, RequiredFields};

use crate::config::BindingConfig;
use crate::logging::redact_value;

/// Records and diagnostics of one `read` run.
#[derive(Debug)]
pub struct ReadOutcome {
    pub records: Vec<Record>,
    pub report: ReadReport,
}

/// Opens `file`, loads the binding file and reads one sheet into records.
pub fn run_read(
    file: &Path,
    binding_file: &Path,
    sheet: Option<&str>,
    extra_required: &[String],
) -> Result<ReadOutcome> {
    let config = BindingConfig::load(binding_file)?;
    let bindings = config
        .binding_set()
        .with_context(|| format!("invalid binding in {}", binding_file.display()))?;
    let required = config
        .required_fields(extra_required)
        .context("invalid required field")?;
    let workbook = open(file)?;
    read_records(workbook.as_ref(), sheet, &bindings, &required)
}

/// Reads one sheet of an already opened workbook into records.
pub fn read_records(
    workbook: &dyn Workbook,
    sheet: Option<&str>,
    bindings: &BindingSet,
    required: &RequiredFields,
) -> Result<ReadOutcome> {
    let (records, report) = Reader::new(workbook)
        .read_target(SheetSelector::from(sheet), &RecordTarget, bindings, required)
        .context("failed to read sheet")?;

    for excluded in &report.excluded {
        tracing::debug!(row = excluded.row, field = %excluded.missing, "row excluded");
    }
    for skip in &report.skipped {
        tracing::debug!(
            row = skip.row,
            field = %skip.path,
            value = redact_value(&skip.value.to_string()),
            reason = %skip.reason,
            "field skipped"
        );
    }
    tracing::info!(
        rows_read = report.rows_read,
        rows_kept = report.rows_kept,
        rows_excluded = report.rows_excluded(),
        "read complete"
    );
    Ok(ReadOutcome { records, report })
}

pub fn run_metadata(file: &Path) -> Result<BTreeMap<String, String>> {
    let workbook = open(file)?;
    Ok(workbook.metadata())
}

pub fn run_sheets(file: &Path) -> Result<Vec<String>> {
    let workbook = open(file)?;
    Ok(workbook.sheet_names())
}

fn open(file: &Path) -> Result<Box<dyn Workbook>> {
    let workbook =
        open_workbook(file).with_context(|| format!("failed to open {}", file.display()))?;
    tracing::debug!(
        path = %file.display(),
        sheets = workbook.sheet_names().len(),
        "opened workbook"
    );
    Ok(workbook)
}
