//! Host-supplied tabular frames
//!
//! A [`Frame`] wraps a polars `DataFrame` together with the pieces of the
//! host's query result that a bare `DataFrame` cannot carry: the query ref
//! id, frame-level metadata (e.g. the wide-timeseries type tag), and
//! per-column label maps such as `{feature, control}`.
//!
//! Column typing for classification comes from the polars dtype, with one
//! extension: a string column whose sampled values parse as timestamps is
//! treated as a time column. Time columns are converted to epoch seconds.

use crate::constants::datetime::{
    DATE_FORMAT_LENGTH, MIN_TIMESTAMP_LENGTH, SNIFF_SAMPLE_ROWS, TIME_FORMAT_LENGTH,
};
use crate::data::feature::TableValue;
use crate::error::{Result, SpcError};
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::collections::BTreeMap;

/// Label map attached to one column (e.g. `feature`, `control`).
pub type FieldLabels = BTreeMap<String, String>;

/// Classification tag for one column of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Time,
    Number,
    Text,
    Other,
}

/// Frame meta key whose value tags the framing (e.g. `timeseries-wide`).
pub const META_TYPE: &str = "type";

/// One tabular frame from the host data source.
#[derive(Debug, Clone)]
pub struct Frame {
    ref_id: String,
    meta: BTreeMap<String, String>,
    labels: BTreeMap<String, FieldLabels>,
    df: DataFrame,
}

impl Frame {
    pub fn new(ref_id: impl Into<String>, df: DataFrame) -> Self {
        Self {
            ref_id: ref_id.into(),
            meta: BTreeMap::new(),
            labels: BTreeMap::new(),
            df,
        }
    }

    /// Attach a frame-level metadata entry.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// Attach a label map to the named column.
    pub fn with_labels(mut self, column: impl Into<String>, labels: FieldLabels) -> Self {
        self.labels.insert(column.into(), labels);
        self
    }

    pub fn ref_id(&self) -> &str {
        &self.ref_id
    }

    pub fn meta(&self) -> &BTreeMap<String, String> {
        &self.meta
    }

    /// The frame's `type` meta tag, when present.
    pub fn frame_type(&self) -> Option<&str> {
        self.meta.get(META_TYPE).map(String::as_str)
    }

    pub fn labels(&self, column: &str) -> Option<&FieldLabels> {
        self.labels.get(column)
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn width(&self) -> usize {
        self.df.width()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.df.get_column_names().iter().any(|c| c.as_str() == name)
    }

    fn series(&self, name: &str) -> Result<Series> {
        self.df
            .column(name)
            .map(|c| c.as_materialized_series().clone())
            .map_err(|_| SpcError::ColumnNotFound {
                column: name.to_string(),
                ref_id: self.ref_id.clone(),
            })
    }

    /// Classification tag of the named column.
    pub fn field_kind(&self, name: &str) -> Result<FieldKind> {
        let series = self.series(name)?;
        Ok(classify_series(&series))
    }

    /// Classification tag of the column at `index`, or `None` out of range.
    pub fn field_kind_at(&self, index: usize) -> Option<FieldKind> {
        let name = self.column_names().get(index)?.clone();
        self.field_kind(&name).ok()
    }

    /// Column values as numbers, preserving nulls.
    ///
    /// Datetime/date columns become epoch seconds; string columns are parsed
    /// as timestamps or plain numbers; unparseable entries are null.
    pub fn column_as_f64(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let series = self.series(name)?;

        match series.dtype() {
            DataType::Datetime(unit, _) => {
                let scale = datetime_unit_scale(*unit);
                return Ok(series
                    .datetime()?
                    .into_iter()
                    .map(|opt| opt.map(|ts| ts as f64 * scale))
                    .collect());
            }
            DataType::Date => {
                return Ok(series
                    .date()?
                    .into_iter()
                    .map(|opt| opt.map(|days| days as f64 * 86_400.0))
                    .collect());
            }
            _ => {}
        }

        if let Ok(strings) = series.str() {
            let as_time = is_string_time_series(strings);
            return Ok(strings
                .into_iter()
                .map(|opt| {
                    opt.and_then(|s| {
                        if as_time {
                            parse_timestamp(s)
                        } else {
                            s.parse::<f64>().ok()
                        }
                    })
                })
                .collect());
        }

        let casted = series.cast(&DataType::Float64)?;
        Ok(casted.f64()?.into_iter().collect())
    }

    /// Column values as strings, preserving nulls.
    pub fn column_as_string(&self, name: &str) -> Result<Vec<Option<String>>> {
        let series = self.series(name)?;

        if let Ok(strings) = series.str() {
            return Ok(strings
                .into_iter()
                .map(|opt| opt.map(str::to_string))
                .collect());
        }

        let casted = series.cast(&DataType::String)?;
        Ok(casted
            .str()?
            .into_iter()
            .map(|opt| opt.map(str::to_string))
            .collect())
    }

    /// Column values as table scalars: numbers for numeric/time columns,
    /// text otherwise, nulls preserved.
    pub fn column_as_table_values(&self, name: &str) -> Result<Vec<TableValue>> {
        match self.field_kind(name)? {
            FieldKind::Number | FieldKind::Time => Ok(self
                .column_as_f64(name)?
                .into_iter()
                .map(|opt| opt.map(TableValue::Number).unwrap_or(TableValue::Null))
                .collect()),
            FieldKind::Text | FieldKind::Other => Ok(self
                .column_as_string(name)?
                .into_iter()
                .map(|opt| opt.map(TableValue::Text).unwrap_or(TableValue::Null))
                .collect()),
        }
    }

    /// A copy of this frame with its first time column moved to the front.
    pub fn time_field_first(&self) -> Frame {
        let names = self.column_names();
        let time_index = names
            .iter()
            .position(|name| matches!(self.field_kind(name), Ok(FieldKind::Time)));
        let Some(index) = time_index else {
            return self.clone();
        };
        if index == 0 {
            return self.clone();
        }

        let mut columns = self.df.get_columns().to_vec();
        let time_column = columns.remove(index);
        columns.insert(0, time_column);
        match DataFrame::new(columns) {
            Ok(df) => Frame {
                ref_id: self.ref_id.clone(),
                meta: self.meta.clone(),
                labels: self.labels.clone(),
                df,
            },
            Err(_) => self.clone(),
        }
    }
}

fn datetime_unit_scale(unit: TimeUnit) -> f64 {
    match unit {
        TimeUnit::Nanoseconds => 1e-9,
        TimeUnit::Microseconds => 1e-6,
        TimeUnit::Milliseconds => 1e-3,
    }
}

fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

fn classify_series(series: &Series) -> FieldKind {
    match series.dtype() {
        DataType::Datetime(_, _) | DataType::Date => FieldKind::Time,
        dtype if is_numeric_dtype(dtype) => FieldKind::Number,
        DataType::String => {
            if series
                .str()
                .map(is_string_time_series)
                .unwrap_or(false)
            {
                FieldKind::Time
            } else {
                FieldKind::Text
            }
        }
        _ => FieldKind::Other,
    }
}

/// Whether a sampled majority of the column's leading values parse as
/// timestamps.
fn is_string_time_series(strings: &StringChunked) -> bool {
    let sample_size = strings.len().min(SNIFF_SAMPLE_ROWS);
    if sample_size == 0 {
        return false;
    }
    let timestamp_count = strings
        .into_iter()
        .take(sample_size)
        .filter(|opt| opt.is_some_and(|s| parse_timestamp(s).is_some()))
        .count();
    timestamp_count > sample_size / 2
}

/// Parse a timestamp string to epoch seconds.
///
/// Tries the compact `YYYYMMDD HHMMSS` form first, then a list of common
/// date/time formats.
pub fn parse_timestamp(s: &str) -> Option<f64> {
    let trimmed = s.trim();

    // Compact format: YYYYMMDD HHMMSS
    if trimmed.len() >= MIN_TIMESTAMP_LENGTH
        && trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_whitespace())
    {
        let parts: Vec<&str> = trimmed.split_whitespace().collect();
        if parts.len() == 2
            && parts[0].len() == DATE_FORMAT_LENGTH
            && parts[1].len() == TIME_FORMAT_LENGTH
        {
            let (date_str, time_str) = (parts[0], parts[1]);
            let formatted = format!(
                "{}-{}-{} {}:{}:{}",
                &date_str[0..4],
                &date_str[4..6],
                &date_str[6..8],
                &time_str[0..2],
                &time_str[2..4],
                &time_str[4..6]
            );
            if let Ok(dt) = NaiveDateTime::parse_from_str(&formatted, "%Y-%m-%d %H:%M:%S") {
                return Some(dt.and_utc().timestamp() as f64);
            }
        }
    }

    const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%d/%m/%Y %H:%M:%S"];
    for format in &DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt.and_utc().timestamp() as f64);
        }
    }

    const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%Y/%m/%d"];
    for format in &DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            let dt = date.and_hms_opt(0, 0, 0)?;
            return Some(dt.and_utc().timestamp() as f64);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn datetime_series(name: &str, millis: &[i64]) -> Column {
        Series::new(name.into(), millis)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
            .unwrap()
            .into_column()
    }

    #[test]
    fn test_field_kinds() {
        let df = DataFrame::new(vec![
            datetime_series("Time", &[0, 60_000]),
            Series::new("Value".into(), &[1.0, 2.0]).into_column(),
            Series::new("part".into(), &["a", "b"]).into_column(),
        ])
        .unwrap();
        let frame = Frame::new("A", df);

        assert_eq!(frame.field_kind("Time").unwrap(), FieldKind::Time);
        assert_eq!(frame.field_kind("Value").unwrap(), FieldKind::Number);
        assert_eq!(frame.field_kind("part").unwrap(), FieldKind::Text);
        assert_eq!(frame.field_kind_at(1), Some(FieldKind::Number));
        assert!(frame.field_kind("missing").is_err());
    }

    #[test]
    fn test_datetime_column_converts_to_epoch_seconds() {
        let df = DataFrame::new(vec![datetime_series("Time", &[0, 60_000, 120_000])]).unwrap();
        let frame = Frame::new("A", df);
        assert_eq!(
            frame.column_as_f64("Time").unwrap(),
            vec![Some(0.0), Some(60.0), Some(120.0)]
        );
    }

    #[test]
    fn test_numeric_column_preserves_nulls() {
        let df = DataFrame::new(vec![
            Series::new("v".into(), &[Some(1.5), None, Some(3.0)]).into_column(),
        ])
        .unwrap();
        let frame = Frame::new("A", df);
        assert_eq!(
            frame.column_as_f64("v").unwrap(),
            vec![Some(1.5), None, Some(3.0)]
        );
    }

    #[test]
    fn test_string_date_column_is_time() {
        let df = DataFrame::new(vec![
            Series::new("day".into(), &["2024-01-01", "2024-01-02", "2024-01-03"]).into_column(),
        ])
        .unwrap();
        let frame = Frame::new("A", df);
        assert_eq!(frame.field_kind("day").unwrap(), FieldKind::Time);

        let seconds = frame.column_as_f64("day").unwrap();
        assert_eq!(seconds[0], Some(1_704_067_200.0));
        assert_eq!(seconds[1], Some(1_704_153_600.0));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert_eq!(parse_timestamp("2024-01-01 00:00:00"), Some(1_704_067_200.0));
        assert_eq!(parse_timestamp("20240101 000000"), Some(1_704_067_200.0));
        assert_eq!(parse_timestamp("2024-01-01"), Some(1_704_067_200.0));
        assert_eq!(parse_timestamp("not a date"), None);
    }

    #[test]
    fn test_table_values_mix_numbers_and_text() {
        let df = DataFrame::new(vec![
            Series::new("nominal".into(), &[Some(4.2), None]).into_column(),
            Series::new("grade".into(), &["steel", "alu"]).into_column(),
        ])
        .unwrap();
        let frame = Frame::new("A", df);

        assert_eq!(
            frame.column_as_table_values("nominal").unwrap(),
            vec![TableValue::Number(4.2), TableValue::Null]
        );
        assert_eq!(
            frame.column_as_table_values("grade").unwrap(),
            vec![TableValue::Text("steel".into()), TableValue::Text("alu".into())]
        );
    }

    #[test]
    fn test_time_field_first_reorders() {
        let df = DataFrame::new(vec![
            Series::new("Value".into(), &[1.0, 2.0]).into_column(),
            datetime_series("Time", &[0, 60_000]),
        ])
        .unwrap();
        let frame = Frame::new("A", df).time_field_first();
        assert_eq!(frame.column_names(), vec!["Time", "Value"]);

        // Already-leading time column is left untouched
        let again = frame.time_field_first();
        assert_eq!(again.column_names(), vec!["Time", "Value"]);
    }

    #[test]
    fn test_meta_and_labels() {
        let df = DataFrame::new(vec![Series::new("v".into(), &[1.0]).into_column()]).unwrap();
        let labels = FieldLabels::from([
            ("feature".to_string(), "part-7".to_string()),
            ("control".to_string(), "diameter".to_string()),
        ]);
        let frame = Frame::new("A", df)
            .with_meta(META_TYPE, "timeseries-wide")
            .with_labels("v", labels.clone());

        assert_eq!(frame.frame_type(), Some("timeseries-wide"));
        assert_eq!(frame.labels("v"), Some(&labels));
        assert_eq!(frame.labels("missing"), None);
    }
}
