//! Frame classification and parse entry point
//!
//! Incoming frames are first grouped into tables and timeseries by shape,
//! then one of three chart modes is chosen and the matching loader builds
//! the canonical features. Unrecognized frames are logged and skipped; the
//! parse itself never fails.

use crate::constants::columns;
use crate::data::feature::Feature;
use crate::data::frame::{FieldKind, Frame};
use crate::data::load::{
    MappedFeatures, load_features_by_control, load_single_timeseries, load_timeseries,
    load_timeseries_with_custom_table,
};
use tracing::warn;

/// Result of classifying and normalizing the host's frames.
#[derive(Debug, Clone, Default)]
pub struct ParsedData {
    /// Canonical features in first-seen order
    pub features: Vec<Feature>,

    /// A features table drove the parse (multi-feature mode)
    pub has_table_data: bool,

    /// A custom (non-features) table supplied passthrough values
    pub has_custom_table_data: bool,
}

/// Chart mode selected from the grouped frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChartMode {
    /// One plain timeseries, no table at all
    SingleTimeseries,
    /// A table without a `feature` column plus a timeseries
    CustomTable,
    /// Features table rows joined with labeled timeseries columns
    FeatureTable,
}

/// Declared wide-timeseries frame: tagged as such, with a leading time column.
fn is_wide_timeseries(frame: &Frame) -> bool {
    frame.frame_type() == Some(columns::TIMESERIES_WIDE)
        && frame.field_kind_at(0) == Some(FieldKind::Time)
}

/// Features table: carries `feature`, `control` and `nominal` columns.
fn is_features_table(frame: &Frame) -> bool {
    frame.has_column(columns::FEATURE)
        && frame.has_column(columns::CONTROL)
        && frame.has_column(columns::NOMINAL)
}

/// Exactly one time and one number column, in either order.
fn is_simple_timeseries(frame: &Frame) -> bool {
    if frame.width() != 2 {
        return false;
    }
    let check = |time_index: usize, value_index: usize| {
        frame.field_kind_at(time_index) == Some(FieldKind::Time)
            && frame.field_kind_at(value_index) == Some(FieldKind::Number)
    };
    check(0, 1) || check(1, 0)
}

/// Fallback: any frame with at least one column can act as a custom table.
fn is_custom_table(frame: &Frame) -> bool {
    frame.width() > 0
}

fn group_frames(frames: &[Frame]) -> (Vec<Frame>, Vec<Frame>) {
    let mut tables = Vec::new();
    let mut timeseries = Vec::new();
    for frame in frames {
        if frame.ref_id().is_empty() {
            continue;
        }
        if is_wide_timeseries(frame) {
            timeseries.push(frame.clone());
        } else if is_features_table(frame) {
            tables.push(frame.clone());
        } else if is_simple_timeseries(frame) {
            timeseries.push(frame.time_field_first());
        } else if is_custom_table(frame) {
            tables.push(frame.clone());
        } else {
            warn!(ref_id = frame.ref_id(), "unknown frame shape skipped");
        }
    }
    (tables, timeseries)
}

fn guess_chart_mode(tables: &[Frame], timeseries: &[Frame]) -> ChartMode {
    if tables.is_empty() && !timeseries.is_empty() {
        return ChartMode::SingleTimeseries;
    }
    let first_table_has_feature = tables
        .first()
        .is_some_and(|table| table.has_column(columns::FEATURE));
    if !first_table_has_feature && !timeseries.is_empty() {
        return ChartMode::CustomTable;
    }
    ChartMode::FeatureTable
}

/// Classify the host's frames and build the canonical feature model.
#[profiling::function]
pub fn parse_frames(frames: &[Frame]) -> ParsedData {
    let (tables, timeseries) = group_frames(frames);

    match guess_chart_mode(&tables, &timeseries) {
        ChartMode::SingleTimeseries => {
            let feature = load_single_timeseries(&timeseries[0]);
            ParsedData {
                features: feature.into_iter().collect(),
                has_table_data: false,
                has_custom_table_data: false,
            }
        }
        ChartMode::CustomTable => {
            let feature = load_timeseries_with_custom_table(&timeseries[0], &tables[0]);
            ParsedData {
                features: feature.into_iter().collect(),
                has_table_data: false,
                has_custom_table_data: !tables.is_empty(),
            }
        }
        ChartMode::FeatureTable => {
            let mut mapped = MappedFeatures::new();
            for table in &tables {
                load_features_by_control(table, &mut mapped);
            }
            for frame in &timeseries {
                load_timeseries(frame, &mut mapped);
            }
            ParsedData {
                features: mapped.into_features(),
                has_table_data: !tables.is_empty(),
                has_custom_table_data: false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::feature::TableValue;
    use crate::data::frame::FieldLabels;
    use polars::prelude::*;

    fn datetime_column(name: &str, millis: &[i64]) -> Column {
        Series::new(name.into(), millis)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
            .unwrap()
            .into_column()
    }

    fn features_table_frame() -> Frame {
        let df = DataFrame::new(vec![
            Series::new("feature".into(), &["part-7"]).into_column(),
            Series::new("control".into(), &["diameter"]).into_column(),
            Series::new("nominal".into(), &[4.2]).into_column(),
        ])
        .unwrap();
        Frame::new("A", df)
    }

    fn wide_timeseries_frame() -> Frame {
        let df = DataFrame::new(vec![
            datetime_column("Time", &[0, 60_000, 120_000]),
            Series::new("Value".into(), &[4.1, 4.2, 4.3]).into_column(),
        ])
        .unwrap();
        let labels = FieldLabels::from([
            ("feature".to_string(), "part-7".to_string()),
            ("control".to_string(), "diameter".to_string()),
        ]);
        Frame::new("B", df)
            .with_meta("type", "timeseries-wide")
            .with_labels("Value", labels)
    }

    #[test]
    fn test_feature_table_mode() {
        let parsed = parse_frames(&[features_table_frame(), wide_timeseries_frame()]);

        assert!(parsed.has_table_data);
        assert!(!parsed.has_custom_table_data);
        assert_eq!(parsed.features.len(), 1);

        let feature = &parsed.features[0];
        assert_eq!(feature.characteristics().len(), 1);
        let characteristic = &feature.characteristics()[0];
        assert_eq!(characteristic.table.get("nominal"), Some(&TableValue::Number(4.2)));
        assert!(characteristic.timeseries.is_some());
    }

    #[test]
    fn test_single_timeseries_mode_reorders_time_first() {
        // Value column first; the classifier must move time to the front
        let df = DataFrame::new(vec![
            Series::new("speed".into(), &[7.0, 8.0]).into_column(),
            datetime_column("Time", &[0, 60_000]),
        ])
        .unwrap();
        let parsed = parse_frames(&[Frame::new("A", df)]);

        assert!(!parsed.has_table_data);
        assert!(!parsed.has_custom_table_data);
        assert_eq!(parsed.features.len(), 1);

        let timeseries = parsed.features[0]
            .first_characteristic()
            .unwrap()
            .timeseries
            .as_ref()
            .unwrap();
        assert_eq!(timeseries.time.values, vec![0.0, 60.0]);
        assert_eq!(timeseries.values.values, vec![7.0, 8.0]);
    }

    #[test]
    fn test_custom_table_mode() {
        let table_df = DataFrame::new(vec![
            Series::new("target".into(), &[21.0]).into_column(),
            Series::new("machine".into(), &["M1"]).into_column(),
        ])
        .unwrap();
        let ts_df = DataFrame::new(vec![
            datetime_column("Time", &[0, 60_000]),
            Series::new("temperature".into(), &[20.5, 21.5]).into_column(),
        ])
        .unwrap();

        let parsed = parse_frames(&[Frame::new("C", table_df), Frame::new("A", ts_df)]);

        assert!(!parsed.has_table_data);
        assert!(parsed.has_custom_table_data);
        assert_eq!(parsed.features.len(), 1);
        let table = &parsed.features[0].first_characteristic().unwrap().table;
        assert_eq!(table.get("target"), Some(&TableValue::Number(21.0)));
        assert_eq!(table.get("machine"), Some(&TableValue::Text("M1".into())));
    }

    #[test]
    fn test_frames_without_ref_id_are_skipped() {
        let df = DataFrame::new(vec![
            datetime_column("Time", &[0, 60_000]),
            Series::new("v".into(), &[1.0, 2.0]).into_column(),
        ])
        .unwrap();
        let parsed = parse_frames(&[Frame::new("", df)]);
        assert!(parsed.features.is_empty());
        assert!(!parsed.has_table_data);
    }

    #[test]
    fn test_no_frames_yields_empty_result() {
        let parsed = parse_frames(&[]);
        assert!(parsed.features.is_empty());
        assert!(!parsed.has_table_data);
        assert!(!parsed.has_custom_table_data);
    }

    #[test]
    fn test_wide_frame_without_time_lead_falls_back_to_table() {
        // Tagged wide but no leading time column: not a timeseries
        let df = DataFrame::new(vec![Series::new("v".into(), &[1.0, 2.0]).into_column()]).unwrap();
        let frame = Frame::new("A", df).with_meta("type", "timeseries-wide");
        let parsed = parse_frames(&[frame]);
        // A lone custom table with no timeseries ends up in feature-table
        // mode with nothing to build
        assert!(parsed.features.is_empty());
    }
}
