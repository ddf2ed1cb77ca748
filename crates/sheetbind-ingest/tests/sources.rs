use std::io::Write;

use sheetbind_core::{Bindable, Reader, SheetSelector, Shape};
use sheetbind_ingest::{
    CsvWorkbook, IngestError, MemorySheet, MemoryWorkbook, open_workbook,
};
use sheetbind_model::{BindingSet, CellValue, RequiredFields};
use tempfile::{Builder, NamedTempFile};

#[derive(Debug, Default, PartialEq)]
struct Person {
    id: u32,
    name: String,
    score: Option<f64>,
}

impl Bindable for Person {
    fn shape() -> Shape<Self> {
        Shape::<Self>::builder("Person")
            .field("Id", |p| &mut p.id)
            .field("Name", |p| &mut p.name)
            .field("Score", |p| &mut p.score)
            .build()
    }
}

fn csv_file(contents: &str) -> NamedTempFile {
    let mut file = Builder::new()
        .prefix("people")
        .suffix(".csv")
        .tempfile()
        .expect("temp file");
    file.write_all(contents.as_bytes()).expect("write csv");
    file
}

#[test]
fn csv_file_reads_end_to_end() {
    let file = csv_file("\u{feff}Person ID,Full Name,Score\n1,Ann,9.5\n2,,7\n3,Cid,\n");
    let workbook = CsvWorkbook::open(file.path()).expect("open csv");
    let bindings =
        BindingSet::flat([("Id", "PersonId"), ("Name", "full_name"), ("Score", "SCORE")]).unwrap();
    let required = RequiredFields::parse(["Name"]).unwrap();

    let people: Vec<Person> = Reader::new(&workbook)
        .read(SheetSelector::First, &bindings, &required)
        .expect("read");

    assert_eq!(
        people,
        vec![
            Person {
                id: 1,
                name: "Ann".to_string(),
                score: Some(9.5),
            },
            Person {
                id: 3,
                name: "Cid".to_string(),
                score: None,
            },
        ]
    );
}

#[test]
fn csv_sheet_is_named_after_file_stem() {
    let file = csv_file("A\n1\n");
    let workbook = open_workbook(file.path()).expect("open");
    let stem = file
        .path()
        .file_stem()
        .and_then(|stem| stem.to_str())
        .expect("stem")
        .to_string();

    assert_eq!(workbook.sheet_names(), vec![stem.clone()]);
    assert!(workbook.sheet(&stem.to_uppercase()).is_some());
    assert!(workbook.metadata().is_empty());
}

#[test]
fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = CsvWorkbook::open(dir.path().join("absent.csv")).expect_err("missing file");
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}

#[test]
fn unknown_extension_is_rejected() {
    let err = open_workbook("notes.md").err().expect("unsupported");
    assert!(matches!(
        err,
        IngestError::UnsupportedFormat { ref extension, .. } if extension == "md"
    ));
}

#[test]
fn memory_workbook_serves_named_sheets_and_metadata() {
    let workbook = MemoryWorkbook::new()
        .with_sheet(MemorySheet::new("Summary", ["Total"]).with_row([CellValue::from(3)]))
        .with_sheet(
            MemorySheet::new("People", ["Id", "Name"])
                .with_row([CellValue::from(1), CellValue::from("Ann")])
                .with_row([CellValue::from(2), CellValue::from("Bob")]),
        )
        .with_metadata("Department", "Research");
    let reader = Reader::new(&workbook);
    let bindings = BindingSet::flat([("Id", "Id"), ("Name", "Name")]).unwrap();

    let people: Vec<Person> = reader
        .read(SheetSelector::Named("people"), &bindings, &RequiredFields::new())
        .unwrap();
    assert_eq!(people.len(), 2);
    assert_eq!(people[1].name, "Bob");

    let missing: Vec<Person> = reader
        .read(SheetSelector::Named("Archive"), &bindings, &RequiredFields::new())
        .unwrap();
    assert!(missing.is_empty());

    assert_eq!(
        reader.metadata().get("Department").map(String::as_str),
        Some("Research")
    );
}
