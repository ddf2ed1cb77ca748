//! Rendering of command results.

use std::collections::BTreeMap;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use sheetbind_core::ReadReport;
use sheetbind_model::{CellValue, Record};

/// Records as a pretty-printed JSON array.
pub fn records_json(records: &[Record]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}

/// Records as a table; columns are the union of record keys in first-seen order.
pub fn records_table(records: &[Record]) -> Table {
    let mut columns: Vec<&str> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !columns.contains(&key) {
                columns.push(key);
            }
        }
    }

    let mut table = Table::new();
    table.set_header(columns.iter().map(|name| header_cell(name)));
    apply_table_style(&mut table);
    for record in records {
        table.add_row(columns.iter().map(|name| value_cell(record.get(name))));
    }
    table
}

pub fn report_table(report: &ReadReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rows read"),
        header_cell("Kept"),
        header_cell("Excluded"),
        header_cell("Fields skipped"),
    ]);
    apply_table_style(&mut table);
    for index in 0..4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(report.rows_read),
        Cell::new(report.rows_kept),
        count_cell(report.rows_excluded(), Color::Yellow),
        count_cell(report.skipped.len(), Color::Yellow),
    ]);
    table
}

/// One line per excluded row and per skipped field, in row order.
pub fn report_details_table(report: &ReadReport) -> Option<Table> {
    if report.excluded.is_empty() && report.skipped.is_empty() {
        return None;
    }
    let mut entries: Vec<(usize, Vec<Cell>)> = Vec::new();
    for excluded in &report.excluded {
        entries.push((
            excluded.row,
            vec![
                Cell::new(excluded.row),
                dim_cell("-"),
                Cell::new(excluded.missing.to_string()),
                Cell::new("required field is blank, row excluded").fg(Color::Yellow),
            ],
        ));
    }
    for skip in &report.skipped {
        entries.push((
            skip.row,
            vec![
                Cell::new(skip.row),
                skip.column
                    .as_deref()
                    .map_or_else(|| dim_cell("(default)"), Cell::new),
                Cell::new(skip.path.to_string()),
                Cell::new(skip.reason.to_string()),
            ],
        ));
    }
    entries.sort_by_key(|(row, _)| *row);

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Column"),
        header_cell("Field"),
        header_cell("Issue"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (_, cells) in entries {
        table.add_row(cells);
    }
    Some(table)
}

pub fn metadata_table(metadata: &BTreeMap<String, String>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Property"), header_cell("Value")]);
    apply_table_style(&mut table);
    for (key, value) in metadata {
        table.add_row(vec![
            Cell::new(key).add_attribute(Attribute::Bold),
            Cell::new(value),
        ]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell(content: &str) -> Cell {
    Cell::new(content).add_attribute(Attribute::Dim)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        Cell::new(count).add_attribute(Attribute::Dim)
    }
}

fn value_cell(value: Option<&CellValue>) -> Cell {
    match value {
        None | Some(CellValue::Null) => dim_cell("-"),
        Some(value @ CellValue::Number(_)) => Cell::new(value).set_alignment(CellAlignment::Right),
        Some(value) => Cell::new(value),
    }
}
