//! Caller-facing read operations over a [`Workbook`].

use std::cmp::Ordering;
use std::collections::BTreeMap;

use sheetbind_model::{BindingSet, CellValue, Record, RequiredFields};

use crate::error::{ReadError, Result};
use crate::materialize::{
    MaterializedRows, ReadReport, RecordTarget, RowMaterializer, RowTarget,
};
use crate::pipeline;
use crate::shape::Bindable;
use crate::source::{SheetSelector, SheetSource, Workbook};

const EMPTY_HEADER: &[String] = &[];

/// Materializes sheets of a workbook into typed objects or records.
///
/// Holds no mutable state; one reader may serve any number of reads, and
/// several readers may share a workbook.
#[derive(Clone, Copy)]
pub struct Reader<'w> {
    workbook: &'w dyn Workbook,
}

impl<'w> Reader<'w> {
    pub fn new(workbook: &'w dyn Workbook) -> Self {
        Self { workbook }
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    /// Document properties, untouched.
    pub fn metadata(&self) -> BTreeMap<String, String> {
        self.workbook.metadata()
    }

    /// Looks up the target sheet.
    ///
    /// A missing named sheet is `Ok(None)`; a workbook without any sheet
    /// fails with [`ReadError::SourceNotFound`] when the first sheet is asked for.
    pub fn select(&self, selector: SheetSelector<'_>) -> Result<Option<&'w dyn SheetSource>> {
        match selector {
            SheetSelector::First => self
                .workbook
                .first_sheet()
                .map(Some)
                .ok_or(ReadError::SourceNotFound),
            SheetSelector::Named(name) => {
                let sheet = self.workbook.sheet(name);
                if sheet.is_none() {
                    tracing::warn!(sheet = name, "sheet not found, reading nothing");
                }
                Ok(sheet)
            }
        }
    }

    /// Lazy row stream; stop iterating to stop reading.
    pub fn rows<'a, R: RowTarget>(
        &self,
        selector: SheetSelector<'_>,
        target: &'a R,
        bindings: &'a BindingSet,
        required: &'a RequiredFields,
    ) -> Result<MaterializedRows<'a, R>>
    where
        'w: 'a,
    {
        let rows = match self.select(selector)? {
            Some(sheet) => {
                tracing::debug!(
                    sheet = sheet.name(),
                    columns = sheet.header().len(),
                    bindings = bindings.len(),
                    "reading sheet"
                );
                let materializer = RowMaterializer::new(target, sheet.header(), bindings, required);
                MaterializedRows::new(materializer, sheet.rows())
            }
            None => {
                let materializer = RowMaterializer::new(target, EMPTY_HEADER, bindings, required);
                MaterializedRows::new(materializer, Box::new(std::iter::empty::<Vec<CellValue>>()))
            }
        };
        Ok(rows)
    }

    /// Reads every row into `R::Output`, with diagnostics.
    pub fn read_target<R: RowTarget>(
        &self,
        selector: SheetSelector<'_>,
        target: &R,
        bindings: &BindingSet,
        required: &RequiredFields,
    ) -> Result<(Vec<R::Output>, ReadReport)> {
        let mut rows = self.rows(selector, target, bindings, required)?;
        let items: Vec<R::Output> = rows.by_ref().collect();
        let report = rows.into_report();
        tracing::debug!(
            rows_read = report.rows_read,
            rows_kept = report.rows_kept,
            rows_excluded = report.rows_excluded(),
            fields_skipped = report.skipped.len(),
            "sheet materialized"
        );
        Ok((items, report))
    }

    pub fn read_with_report<T: Bindable>(
        &self,
        selector: SheetSelector<'_>,
        bindings: &BindingSet,
        required: &RequiredFields,
    ) -> Result<(Vec<T>, ReadReport)> {
        let shape = T::shape();
        self.read_target(selector, &shape, bindings, required)
    }

    pub fn read<T: Bindable>(
        &self,
        selector: SheetSelector<'_>,
        bindings: &BindingSet,
        required: &RequiredFields,
    ) -> Result<Vec<T>> {
        self.read_with_report(selector, bindings, required)
            .map(|(items, _)| items)
    }

    /// Reads with the simplified `(property, column)` binding form.
    pub fn read_flat<T, I, P, C>(&self, selector: SheetSelector<'_>, columns: I) -> Result<Vec<T>>
    where
        T: Bindable,
        I: IntoIterator<Item = (P, C)>,
        P: AsRef<str>,
        C: Into<String>,
    {
        let bindings = BindingSet::flat(columns)?;
        self.read(selector, &bindings, &RequiredFields::new())
    }

    /// Schema-less read into ordered property bags.
    pub fn read_records(
        &self,
        selector: SheetSelector<'_>,
        bindings: &BindingSet,
        required: &RequiredFields,
    ) -> Result<Vec<Record>> {
        self.read_target(selector, &RecordTarget, bindings, required)
            .map(|(items, _)| items)
    }

    pub fn read_filtered<T: Bindable>(
        &self,
        selector: SheetSelector<'_>,
        bindings: &BindingSet,
        required: &RequiredFields,
        predicate: impl FnMut(&T) -> bool,
    ) -> Result<Vec<T>> {
        let items = self.read(selector, bindings, required)?;
        Ok(pipeline::filtered(items, predicate))
    }

    pub fn read_sorted<T: Bindable>(
        &self,
        selector: SheetSelector<'_>,
        bindings: &BindingSet,
        required: &RequiredFields,
        compare: impl FnMut(&T, &T) -> Ordering,
    ) -> Result<Vec<T>> {
        let items = self.read(selector, bindings, required)?;
        Ok(pipeline::sorted(items, compare))
    }

    pub fn read_filtered_and_sorted<T: Bindable>(
        &self,
        selector: SheetSelector<'_>,
        bindings: &BindingSet,
        required: &RequiredFields,
        predicate: impl FnMut(&T) -> bool,
        compare: impl FnMut(&T, &T) -> Ordering,
    ) -> Result<Vec<T>> {
        let items = self.read(selector, bindings, required)?;
        Ok(pipeline::filtered_and_sorted(items, predicate, compare))
    }
}
