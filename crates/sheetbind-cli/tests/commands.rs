//! End-to-end tests for the read, metadata and sheets commands.

use std::fs;
use std::path::{Path, PathBuf};

use sheetbind_cli::commands::{read_records, run_metadata, run_read, run_sheets};
use sheetbind_cli::output;
use sheetbind_ingest::{MemorySheet, MemoryWorkbook};
use sheetbind_model::{BindingSet, CellValue, RequiredFields};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

#[test]
fn read_command_applies_bindings_defaults_and_required_fields() {
    let dir = TempDir::new().expect("temp dir");
    let data = write(
        dir.path(),
        "staff.csv",
        "Employee ID,Full Name,DOB\n7,Ann,2001-05-01\n8,,1990-01-02\n",
    );
    let bindings = write(
        dir.path(),
        "bindings.json",
        r#"{
            "bindings": [{"property": "Dept", "column": "Department", "default": "Sales"}],
            "columns": {"Id": "EmployeeId", "Name": "full_name", "BirthDate": "DOB"}
        }"#,
    );

    let outcome = run_read(&data, &bindings, None, &["Name".to_string()]).expect("read");

    assert_eq!(outcome.report.rows_read, 2);
    assert_eq!(outcome.records.len(), 1);
    insta::assert_snapshot!(output::records_json(&outcome.records).unwrap(), @r#"
    [
      {
        "Id": "7",
        "Name": "Ann",
        "BirthDate": "2001-05-01",
        "Dept": "Sales"
      }
    ]
    "#);
}

#[test]
fn unknown_sheet_reads_nothing() {
    let dir = TempDir::new().expect("temp dir");
    let data = write(dir.path(), "staff.csv", "Id\n1\n");
    let bindings = write(dir.path(), "bindings.json", r#"{"columns": {"Id": "Id"}}"#);

    let outcome = run_read(&data, &bindings, Some("Archive"), &[]).expect("read");
    assert!(outcome.records.is_empty());
    assert_eq!(outcome.report.rows_read, 0);
}

#[test]
fn invalid_binding_file_is_reported_with_its_path() {
    let dir = TempDir::new().expect("temp dir");
    let data = write(dir.path(), "staff.csv", "Id\n1\n");
    let bindings = write(dir.path(), "bindings.json", r#"{"columns": ["Id"]}"#);

    let error = run_read(&data, &bindings, None, &[]).expect_err("invalid bindings");
    assert!(format!("{error:#}").contains("bindings.json"));
}

#[test]
fn sheets_and_metadata_of_csv() {
    let dir = TempDir::new().expect("temp dir");
    let data = write(dir.path(), "orders.csv", "Id\n1\n");

    assert_eq!(run_sheets(&data).unwrap(), vec!["orders".to_string()]);
    assert!(run_metadata(&data).unwrap().is_empty());
}

#[test]
fn records_from_workbook_keep_raw_cell_values() {
    let workbook = MemoryWorkbook::new().with_sheet(
        MemorySheet::new("People", ["ID", "Active"])
            .with_row([CellValue::from(1), CellValue::from(true)])
            .with_row([CellValue::from(2), CellValue::Null]),
    );
    let bindings = BindingSet::flat([("Id", "ID"), ("Active", "Active")]).unwrap();

    let outcome =
        read_records(&workbook, Some("people"), &bindings, &RequiredFields::new()).unwrap();

    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.records[0].get("active"), Some(&CellValue::Bool(true)));
    assert_eq!(outcome.records[1].get("Active"), Some(&CellValue::Null));
}
