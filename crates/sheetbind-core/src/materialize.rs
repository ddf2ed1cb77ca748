//! Row-by-row materialization of bound objects.

use sheetbind_map::{ColumnResolution, resolve};
use sheetbind_model::{BindingSet, CellValue, PropertyPath, Record, RequiredFields};

use crate::binder::{self, FieldOutcome, SkipReason};
use crate::shape::Shape;
use crate::source::RowIter;

/// What a row is materialized into.
pub trait RowTarget {
    type Output;

    fn create(&self) -> Self::Output;

    fn apply(&self, target: &mut Self::Output, path: &PropertyPath, value: &CellValue)
    -> FieldOutcome;

    /// Reads a bound value back for required-field checks.
    fn probe(&self, target: &mut Self::Output, path: &PropertyPath) -> CellValue;
}

impl<T: Default + 'static> RowTarget for Shape<T> {
    type Output = T;

    fn create(&self) -> T {
        T::default()
    }

    fn apply(&self, target: &mut T, path: &PropertyPath, value: &CellValue) -> FieldOutcome {
        binder::bind(self, target, path.segments(), value)
    }

    fn probe(&self, target: &mut T, path: &PropertyPath) -> CellValue {
        binder::probe(self, target, path.segments())
    }
}

/// Schema-less target: each binding's dotted path becomes a record key and
/// receives the raw cell value unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordTarget;

impl RowTarget for RecordTarget {
    type Output = Record;

    fn create(&self) -> Record {
        Record::new()
    }

    fn apply(&self, target: &mut Record, path: &PropertyPath, value: &CellValue) -> FieldOutcome {
        target.set(&path.to_string(), value.clone());
        FieldOutcome::Applied
    }

    fn probe(&self, target: &mut Record, path: &PropertyPath) -> CellValue {
        target.get(&path.to_string()).cloned().unwrap_or_default()
    }
}

/// A skipped field write, kept for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSkip {
    /// 1-based sheet row; the header is row 1.
    pub row: usize,
    /// Header text, or `None` when the value came from a static default.
    pub column: Option<String>,
    pub path: PropertyPath,
    pub value: CellValue,
    pub reason: SkipReason,
}

/// A row dropped because a required field was blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludedRow {
    pub row: usize,
    pub missing: PropertyPath,
}

/// Summary of one read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadReport {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub excluded: Vec<ExcludedRow>,
    /// Field writes skipped for reasons other than an empty cell.
    pub skipped: Vec<FieldSkip>,
}

impl ReadReport {
    pub fn rows_excluded(&self) -> usize {
        self.excluded.len()
    }
}

/// Applies a resolved binding set to individual rows.
pub struct RowMaterializer<'a, R: RowTarget> {
    target: &'a R,
    header: &'a [String],
    bindings: &'a BindingSet,
    required: &'a RequiredFields,
    resolution: ColumnResolution,
}

impl<'a, R: RowTarget> RowMaterializer<'a, R> {
    /// Resolves the header against `bindings` once for all rows.
    pub fn new(
        target: &'a R,
        header: &'a [String],
        bindings: &'a BindingSet,
        required: &'a RequiredFields,
    ) -> Self {
        let resolution = resolve(header, bindings);
        Self {
            target,
            header,
            bindings,
            required,
            resolution,
        }
    }

    pub fn resolution(&self) -> &ColumnResolution {
        &self.resolution
    }

    /// Builds the object for one row, or `None` when a required field is blank.
    pub fn materialize(
        &self,
        row: usize,
        cells: &[CellValue],
        report: &mut ReadReport,
    ) -> Option<R::Output> {
        report.rows_read += 1;
        let mut output = self.target.create();

        for (position, index) in self.resolution.assignments() {
            let Some(binding) = self.bindings.get(index) else {
                continue;
            };
            let value = cells.get(position).unwrap_or(&CellValue::Null);
            let outcome = self.target.apply(&mut output, binding.path(), value);
            self.note(row, Some(position), binding.path(), value, outcome, report);
        }

        for binding in self.resolution.defaulted(self.bindings) {
            let Some(value) = binding.static_value() else {
                continue;
            };
            let outcome = self.target.apply(&mut output, binding.path(), value);
            self.note(row, None, binding.path(), value, outcome, report);
        }

        let missing = self
            .required
            .iter()
            .find(|path| self.target.probe(&mut output, path).is_blank());
        if let Some(path) = missing {
            tracing::trace!(row, field = %path, "row excluded: required field is blank");
            report.excluded.push(ExcludedRow {
                row,
                missing: path.clone(),
            });
            return None;
        }

        report.rows_kept += 1;
        Some(output)
    }

    fn note(
        &self,
        row: usize,
        position: Option<usize>,
        path: &PropertyPath,
        value: &CellValue,
        outcome: FieldOutcome,
        report: &mut ReadReport,
    ) {
        let FieldOutcome::Skipped(reason) = outcome else {
            return;
        };
        if reason == SkipReason::NullValue {
            return;
        }
        tracing::trace!(row, field = %path, reason = %reason, "field skipped");
        report.skipped.push(FieldSkip {
            row,
            column: position.and_then(|index| self.header.get(index).cloned()),
            path: path.clone(),
            value: value.clone(),
            reason,
        });
    }
}

/// Lazy stream of materialized rows in source order.
///
/// Dropping the iterator early stops pulling rows from the source.
pub struct MaterializedRows<'a, R: RowTarget> {
    materializer: RowMaterializer<'a, R>,
    rows: RowIter<'a>,
    row: usize,
    report: ReadReport,
}

impl<'a, R: RowTarget> MaterializedRows<'a, R> {
    pub fn new(materializer: RowMaterializer<'a, R>, rows: RowIter<'a>) -> Self {
        Self {
            materializer,
            rows,
            row: 1,
            report: ReadReport::default(),
        }
    }

    /// Report for the rows pulled so far.
    pub fn report(&self) -> &ReadReport {
        &self.report
    }

    pub fn into_report(self) -> ReadReport {
        self.report
    }
}

impl<R: RowTarget> Iterator for MaterializedRows<'_, R> {
    type Item = R::Output;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let cells = self.rows.next()?;
            self.row += 1;
            if let Some(output) = self
                .materializer
                .materialize(self.row, &cells, &mut self.report)
            {
                return Some(output);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use sheetbind_model::Binding;

    use super::*;

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| (*name).to_string()).collect()
    }

    #[test]
    fn record_target_keeps_raw_values_by_path() {
        let header = header(&["ID", "City"]);
        let bindings = BindingSet::new(vec![
            Binding::new("Id", "ID").unwrap(),
            Binding::new("Address.City", "City").unwrap(),
        ]);
        let required = RequiredFields::new();
        let materializer = RowMaterializer::new(&RecordTarget, &header, &bindings, &required);

        let mut report = ReadReport::default();
        let record = materializer
            .materialize(2, &[CellValue::Number(7.0), CellValue::from("Oslo")], &mut report)
            .expect("row kept");

        assert_eq!(record.get("Id"), Some(&CellValue::Number(7.0)));
        assert_eq!(record.get("Address.City"), Some(&CellValue::from("Oslo")));
        assert_eq!(report.rows_kept, 1);
    }

    #[test]
    fn short_rows_read_missing_cells_as_null() {
        let header = header(&["ID", "Name"]);
        let bindings = BindingSet::flat([("Id", "ID"), ("Name", "Name")]).unwrap();
        let required = RequiredFields::parse(["Name"]).unwrap();
        let materializer = RowMaterializer::new(&RecordTarget, &header, &bindings, &required);

        let mut report = ReadReport::default();
        let kept = materializer.materialize(2, &[CellValue::from("1")], &mut report);

        assert!(kept.is_none());
        assert_eq!(
            report.excluded,
            vec![ExcludedRow {
                row: 2,
                missing: PropertyPath::parse("Name").unwrap()
            }]
        );
        assert!(report.skipped.is_empty());
    }
}
