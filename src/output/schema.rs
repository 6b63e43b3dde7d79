//! Explicit output schema and frame coercion
//!
//! The artifact's column types are declared up front in an
//! [`OutputSchema`] instead of being inferred from whatever the input
//! happened to contain. Coercion walks every declared cell and reports the
//! first value that does not fit as a typed [`Error::Coercion`], before
//! anything reaches the Parquet writer.

use crate::error::{Error, Result};
use crate::frame::Frame;
use arrow::array::{
    ArrayRef, BooleanArray, Date32Array, Int64Array, StringArray, TimestampMicrosecondArray,
};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use std::sync::Arc;

/// Column type in the artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// 64-bit signed integer
    Int64,
    /// `True` / `False`
    Boolean,
    /// Timestamp without timezone, microsecond precision
    Timestamp,
    /// Calendar date
    Date,
    /// Free text
    Utf8,
}

impl ColumnKind {
    /// Arrow type this kind is stored as
    pub fn data_type(self) -> DataType {
        match self {
            ColumnKind::Int64 => DataType::Int64,
            ColumnKind::Boolean => DataType::Boolean,
            ColumnKind::Timestamp => DataType::Timestamp(TimeUnit::Microsecond, None),
            ColumnKind::Date => DataType::Date32,
            ColumnKind::Utf8 => DataType::Utf8,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ColumnKind::Int64 => "Int64",
            ColumnKind::Boolean => "Boolean",
            ColumnKind::Timestamp => "Timestamp",
            ColumnKind::Date => "Date",
            ColumnKind::Utf8 => "Utf8",
        }
    }
}

/// Declared column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Column name
    pub name: String,
    /// Column type
    pub kind: ColumnKind,
    /// Fail when the input lacks this column
    pub required: bool,
    /// Allow null cells
    pub nullable: bool,
}

impl ColumnSpec {
    /// Required, non-null column
    pub fn required(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
            nullable: false,
        }
    }

    /// Optional, nullable column
    pub fn optional(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            nullable: true,
        }
    }

    /// Allow nulls in this column
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// Declared schema of the columnar artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSchema {
    columns: Vec<ColumnSpec>,
}

impl OutputSchema {
    /// Create a schema from declared columns
    ///
    /// Undeclared input columns are carried through as nullable text.
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self { columns }
    }

    /// Schema of the enriched YouTube trending record set
    pub fn youtube_trending() -> Self {
        Self::new(vec![
            ColumnSpec::required("categoryId", ColumnKind::Int64),
            ColumnSpec::required("view_count", ColumnKind::Int64),
            ColumnSpec::required("likes", ColumnKind::Int64),
            ColumnSpec::required("dislikes", ColumnKind::Int64),
            ColumnSpec::required("comment_count", ColumnKind::Int64),
            ColumnSpec::required("publishedAt", ColumnKind::Timestamp).nullable(),
            ColumnSpec::required("trending_date", ColumnKind::Date).nullable(),
            ColumnSpec::optional("comments_disabled", ColumnKind::Boolean),
            ColumnSpec::optional("ratings_disabled", ColumnKind::Boolean),
            ColumnSpec::optional("category", ColumnKind::Utf8),
        ])
    }

    /// Look up a declared column
    pub fn spec(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Fail if any required column is absent from `frame`
    pub fn check_columns(&self, frame: &Frame) -> Result<()> {
        match self
            .columns
            .iter()
            .find(|spec| spec.required && !frame.has_column(&spec.name))
        {
            Some(missing) => Err(Error::missing_column(&missing.name)),
            None => Ok(()),
        }
    }

    /// Resolve the spec for every output column, in frame order
    fn resolve(&self, frame: &Frame) -> Result<Vec<(usize, ColumnSpec)>> {
        self.check_columns(frame)?;

        Ok(frame
            .columns()
            .iter()
            .enumerate()
            .map(|(idx, name)| match self.spec(name) {
                Some(spec) => (idx, spec.clone()),
                None => (idx, ColumnSpec::optional(name, ColumnKind::Utf8)),
            })
            .collect())
    }

    /// Coerce a frame into a RecordBatch
    pub fn to_record_batch(&self, frame: &Frame) -> Result<RecordBatch> {
        let resolved = self.resolve(frame)?;

        let mut fields = Vec::with_capacity(resolved.len());
        let mut arrays: Vec<ArrayRef> = Vec::with_capacity(resolved.len());

        for (idx, spec) in resolved {
            let cells: Vec<Option<&str>> =
                frame.rows().iter().map(|row| row[idx].as_deref()).collect();
            arrays.push(build_array(&spec, &cells)?);
            fields.push(Field::new(spec.name, spec.kind.data_type(), spec.nullable));
        }

        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?;
        Ok(batch)
    }
}

impl Default for OutputSchema {
    fn default() -> Self {
        Self::youtube_trending()
    }
}

// ============================================================================
// Array builders
// ============================================================================

fn build_array(spec: &ColumnSpec, cells: &[Option<&str>]) -> Result<ArrayRef> {
    let array: ArrayRef = match spec.kind {
        ColumnKind::Int64 => Arc::new(Int64Array::from(coerce(spec, cells, parse_int)?)),
        ColumnKind::Boolean => Arc::new(BooleanArray::from(coerce(spec, cells, parse_bool)?)),
        ColumnKind::Timestamp => Arc::new(TimestampMicrosecondArray::from(coerce(
            spec,
            cells,
            |s| parse_timestamp(s).map(|ts| ts.and_utc().timestamp_micros()),
        )?)),
        ColumnKind::Date => Arc::new(Date32Array::from(coerce(spec, cells, |s| {
            parse_date(s).map(days_since_epoch)
        })?)),
        ColumnKind::Utf8 => {
            if !spec.nullable {
                coerce(spec, cells, |s| Some(s.to_string()))?;
            }
            Arc::new(StringArray::from(cells.to_vec()))
        }
    };
    Ok(array)
}

/// Apply `parse` to every cell, turning failures into coercion errors
fn coerce<T, F>(spec: &ColumnSpec, cells: &[Option<&str>], parse: F) -> Result<Vec<Option<T>>>
where
    F: Fn(&str) -> Option<T>,
{
    cells
        .iter()
        .enumerate()
        .map(|(row, cell)| match cell {
            None if spec.nullable => Ok(None),
            None => Err(Error::coercion(
                &spec.name,
                row,
                "null",
                format!("non-null {}", spec.kind.label()),
            )),
            Some(raw) => parse(raw.trim())
                .map(Some)
                .ok_or_else(|| Error::coercion(&spec.name, row, *raw, spec.kind.label())),
        })
        .collect()
}

// ============================================================================
// Cell parsers
// ============================================================================

/// Parse an integer; integral floats such as `12.0` are accepted
pub fn parse_int(s: &str) -> Option<i64> {
    if let Ok(n) = s.parse::<i64>() {
        return Some(n);
    }
    let f = s.parse::<f64>().ok()?;
    #[allow(clippy::cast_precision_loss)]
    let in_range = f.is_finite() && f.trunc() >= i64::MIN as f64 && f.trunc() <= i64::MAX as f64;
    #[allow(clippy::cast_possible_truncation)]
    in_range.then(|| f.trunc() as i64)
}

/// Parse `True`/`False` in the spellings CSV exports use
pub fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "True" | "true" | "TRUE" => Some(true),
        "False" | "false" | "FALSE" => Some(false),
        _ => None,
    }
}

/// Parse an ISO 8601 timestamp and strip its timezone
///
/// Offsets are dropped, not converted: `2020-08-11T19:20:14+02:00` becomes
/// `2020-08-11 19:20:14`.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%.f%z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_local());
        }
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    parse_plain_date(s).and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parse a year-first date or timestamp and truncate it to the day
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    parse_timestamp(s).map(|ts| ts.date())
}

fn parse_plain_date(s: &str) -> Option<NaiveDate> {
    ["%Y-%m-%d", "%Y%m%d", "%Y/%m/%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Days from 0001-01-01 to 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

fn days_since_epoch(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}
