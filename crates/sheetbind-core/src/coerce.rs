//! Best-effort conversion of untyped cell values into typed leaves.
//!
//! Text is parsed with locale-independent rules (`.` decimal separator, ISO
//! dates first). Values that are already typed are converted natively.
//! Failure is reported as [`Unconvertible`]; it never panics, and `Null`
//! never turns into a zero or empty default.

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use sheetbind_model::CellValue;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d %b %Y", "%b %d %Y"];

/// Leaf kinds a cell can be coerced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Int,
    Float32,
    Float64,
    Decimal,
    DateTime,
    Date,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "boolean",
            Self::Int => "integer",
            Self::Float32 => "single",
            Self::Float64 => "double",
            Self::Decimal => "decimal",
            Self::DateTime => "datetime",
            Self::Date => "date",
        };
        f.write_str(name)
    }
}

/// A successfully coerced value, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(BigDecimal),
    DateTime(NaiveDateTime),
    Date(NaiveDate),
}

/// The raw value could not be converted to the requested kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot convert {found} value to {kind}")]
pub struct Unconvertible {
    pub kind: ScalarKind,
    pub found: &'static str,
}

impl Unconvertible {
    fn new(kind: ScalarKind, raw: &CellValue) -> Self {
        Self {
            kind,
            found: raw.type_name(),
        }
    }
}

/// Converts `raw` into `kind`.
pub fn coerce(raw: &CellValue, kind: ScalarKind) -> Result<Coerced, Unconvertible> {
    let converted = match kind {
        ScalarKind::Bool => to_bool(raw).map(Coerced::Bool),
        ScalarKind::Int => to_int(raw).map(Coerced::Int),
        ScalarKind::Float32 | ScalarKind::Float64 => to_float(raw).map(Coerced::Float),
        ScalarKind::Decimal => to_decimal(raw).map(Coerced::Decimal),
        ScalarKind::DateTime => to_datetime(raw).map(Coerced::DateTime),
        ScalarKind::Date => to_datetime(raw).map(|value| Coerced::Date(value.date())),
    };
    converted.ok_or_else(|| Unconvertible::new(kind, raw))
}

fn to_bool(raw: &CellValue) -> Option<bool> {
    match raw {
        CellValue::Bool(value) => Some(*value),
        CellValue::Number(value) if !value.is_nan() => Some(*value != 0.0),
        CellValue::Text(text) => {
            let trimmed = text.trim();
            if trimmed.eq_ignore_ascii_case("true") {
                Some(true)
            } else if trimmed.eq_ignore_ascii_case("false") {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    }
}

fn to_int(raw: &CellValue) -> Option<i64> {
    match raw {
        CellValue::Bool(value) => Some(i64::from(*value)),
        CellValue::Number(value) => {
            let rounded = value.round_ties_even();
            // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
            if rounded.is_finite() && rounded >= i64::MIN as f64 && rounded < i64::MAX as f64 {
                Some(rounded as i64)
            } else {
                None
            }
        }
        CellValue::Text(text) => {
            let trimmed = text.trim();
            trimmed
                .strip_prefix('+')
                .unwrap_or(trimmed)
                .parse::<i64>()
                .ok()
        }
        _ => None,
    }
}

fn to_float(raw: &CellValue) -> Option<f64> {
    match raw {
        CellValue::Bool(value) => Some(if *value { 1.0 } else { 0.0 }),
        CellValue::Number(value) => Some(*value),
        CellValue::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    }
}

fn to_decimal(raw: &CellValue) -> Option<BigDecimal> {
    match raw {
        CellValue::Bool(value) => Some(BigDecimal::from(i64::from(*value))),
        CellValue::Number(value) if value.is_finite() => BigDecimal::from_str(&value.to_string()).ok(),
        CellValue::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                None
            } else {
                BigDecimal::from_str(trimmed).ok()
            }
        }
        _ => None,
    }
}

fn to_datetime(raw: &CellValue) -> Option<NaiveDateTime> {
    match raw {
        CellValue::DateTime(value) => Some(*value),
        CellValue::Text(text) => parse_datetime(text),
        _ => None,
    }
}

/// Parses ISO 8601 and a few common invariant date/time layouts.
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(value.naive_utc());
    }
    for format in DATETIME_FORMATS {
        if let Ok(value) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(value);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// Typed scalar leaves that can be read from a cell.
pub trait FromCell: Sized {
    const KIND: ScalarKind;

    fn from_coerced(value: Coerced) -> Option<Self>;

    fn to_cell(&self) -> CellValue;

    fn from_cell(raw: &CellValue) -> Result<Self, Unconvertible> {
        coerce(raw, Self::KIND)
            .ok()
            .and_then(Self::from_coerced)
            .ok_or_else(|| Unconvertible::new(Self::KIND, raw))
    }
}

impl FromCell for bool {
    const KIND: ScalarKind = ScalarKind::Bool;

    fn from_coerced(value: Coerced) -> Option<Self> {
        match value {
            Coerced::Bool(value) => Some(value),
            _ => None,
        }
    }

    fn to_cell(&self) -> CellValue {
        CellValue::Bool(*self)
    }
}

macro_rules! impl_from_cell_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromCell for $ty {
                const KIND: ScalarKind = ScalarKind::Int;

                fn from_coerced(value: Coerced) -> Option<Self> {
                    match value {
                        Coerced::Int(value) => <$ty>::try_from(value).ok(),
                        _ => None,
                    }
                }

                fn to_cell(&self) -> CellValue {
                    CellValue::Number(*self as f64)
                }
            }
        )*
    };
}

impl_from_cell_int!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl FromCell for f64 {
    const KIND: ScalarKind = ScalarKind::Float64;

    fn from_coerced(value: Coerced) -> Option<Self> {
        match value {
            Coerced::Float(value) => Some(value),
            _ => None,
        }
    }

    fn to_cell(&self) -> CellValue {
        CellValue::Number(*self)
    }
}

impl FromCell for f32 {
    const KIND: ScalarKind = ScalarKind::Float32;

    fn from_coerced(value: Coerced) -> Option<Self> {
        match value {
            Coerced::Float(value) => {
                let narrowed = value as f32;
                // Finite doubles outside the f32 range would saturate to infinity.
                if value.is_finite() && narrowed.is_infinite() {
                    None
                } else {
                    Some(narrowed)
                }
            }
            _ => None,
        }
    }

    fn to_cell(&self) -> CellValue {
        CellValue::Number(f64::from(*self))
    }
}

impl FromCell for BigDecimal {
    const KIND: ScalarKind = ScalarKind::Decimal;

    fn from_coerced(value: Coerced) -> Option<Self> {
        match value {
            Coerced::Decimal(value) => Some(value),
            _ => None,
        }
    }

    fn to_cell(&self) -> CellValue {
        CellValue::Text(self.to_string())
    }
}

impl FromCell for NaiveDateTime {
    const KIND: ScalarKind = ScalarKind::DateTime;

    fn from_coerced(value: Coerced) -> Option<Self> {
        match value {
            Coerced::DateTime(value) => Some(value),
            _ => None,
        }
    }

    fn to_cell(&self) -> CellValue {
        CellValue::DateTime(*self)
    }
}

impl FromCell for NaiveDate {
    const KIND: ScalarKind = ScalarKind::Date;

    fn from_coerced(value: Coerced) -> Option<Self> {
        match value {
            Coerced::Date(value) => Some(value),
            _ => None,
        }
    }

    fn to_cell(&self) -> CellValue {
        CellValue::from(*self)
    }
}
