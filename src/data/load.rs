//! Frame-to-Feature loaders
//!
//! Each loader folds one classified frame shape into the canonical model.
//! Broken rows and unlinked columns are skipped with a warning; loaders
//! never fail the whole parse.

use crate::constants::columns;
use crate::data::feature::{Characteristic, Feature, SeriesField, TableValue, Timeseries};
use crate::data::frame::{FieldKind, Frame};
use std::collections::BTreeMap;
use tracing::warn;

/// Columns of a features table that identify the row rather than describe
/// the characteristic.
const META_COLUMNS: [&str; 4] = [
    columns::FEATURE,
    columns::CONTROL,
    columns::PART_ID,
    columns::FEATURE_TYPE,
];

/// Characteristic name used for synthetic single-series features.
const TIMESERIES_CHARACTERISTIC: &str = "timeseries";

/// Features keyed by feature id, in first-seen order.
#[derive(Debug, Default)]
pub struct MappedFeatures {
    features: Vec<Feature>,
}

impl MappedFeatures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Feature> {
        self.features.iter_mut().find(|f| f.id == key)
    }

    /// Get the feature for `key`, creating it on first sight.
    pub fn get_or_default(&mut self, key: &str, part_id: &str, ref_id: &str) -> &mut Feature {
        if let Some(index) = self.features.iter().position(|f| f.id == key) {
            return &mut self.features[index];
        }
        self.features.push(Feature::new(key, part_id, ref_id));
        self.features.last_mut().expect("just pushed")
    }

    pub fn into_features(self) -> Vec<Feature> {
        self.features
    }
}

/// Drop time/value pairs where either side is null, keeping alignment.
fn no_nulls(time: &[Option<f64>], values: &[Option<f64>]) -> (Vec<f64>, Vec<f64>) {
    let mut t = Vec::with_capacity(time.len());
    let mut v = Vec::with_capacity(values.len());
    for (time_value, value) in time.iter().zip(values.iter()) {
        if let (Some(time_value), Some(value)) = (time_value, value) {
            t.push(*time_value);
            v.push(*value);
        }
    }
    (t, v)
}

/// Fold a features-table frame into the feature map, one characteristic per
/// row keyed by the `control` column.
///
/// Column names are matched case-insensitively. Every non-meta column of the
/// row lands in the characteristic's table.
pub fn load_features_by_control(frame: &Frame, features: &mut MappedFeatures) {
    // Lowercased name -> original column name
    let column_map: BTreeMap<String, String> = frame
        .column_names()
        .into_iter()
        .map(|name| (name.to_lowercase(), name))
        .collect();

    let (Some(feature_col), Some(control_col), Some(_)) = (
        column_map.get(columns::FEATURE),
        column_map.get(columns::CONTROL),
        column_map.get(columns::NOMINAL),
    ) else {
        warn!(
            ref_id = frame.ref_id(),
            "feature, control or nominal column is missing in query"
        );
        return;
    };

    let Ok(feature_keys) = frame.column_as_string(feature_col) else {
        return;
    };
    let Ok(control_keys) = frame.column_as_string(control_col) else {
        return;
    };
    let part_ids = column_map
        .get(columns::PART_ID)
        .and_then(|name| frame.column_as_string(name).ok());

    // Table columns, extracted once per frame
    let mut table_columns: Vec<(String, Vec<TableValue>)> = Vec::new();
    for (lower, name) in &column_map {
        if META_COLUMNS.contains(&lower.as_str()) {
            continue;
        }
        match frame.column_as_table_values(name) {
            Ok(values) => table_columns.push((lower.clone(), values)),
            Err(e) => warn!(
                ref_id = frame.ref_id(),
                column = name.as_str(),
                "skipping unreadable column: {}",
                e.user_message()
            ),
        }
    }

    for row in 0..frame.height() {
        let Some(feature_key) = feature_keys.get(row).cloned().flatten() else {
            warn!(ref_id = frame.ref_id(), row, "row without feature key skipped");
            continue;
        };
        let control = control_keys.get(row).cloned().flatten().unwrap_or_default();
        if control.is_empty() {
            warn!(ref_id = frame.ref_id(), row, "row without control name skipped");
            continue;
        }

        let part_id = part_ids
            .as_ref()
            .and_then(|ids| ids.get(row).cloned().flatten())
            .unwrap_or_default();
        let feature = features.get_or_default(&feature_key, &part_id, frame.ref_id());

        let mut characteristic = Characteristic::new(&control);
        for (name, column_values) in &table_columns {
            if let Some(value) = column_values.get(row) {
                characteristic.table.insert(name.clone(), value.clone());
            }
        }
        feature.replace_characteristic(characteristic);
    }
}

/// Fold a wide timeseries frame into the feature map.
///
/// The leading column is the time axis; every other column must carry
/// `feature`/`control` labels pointing at an already-loaded feature, and
/// becomes that characteristic's timeseries.
pub fn load_timeseries(frame: &Frame, features: &mut MappedFeatures) {
    let names = frame.column_names();
    let Some(time_name) = names.first() else {
        warn!(ref_id = frame.ref_id(), "timeseries data - missing time vector");
        return;
    };
    if !matches!(frame.field_kind(time_name), Ok(FieldKind::Time)) {
        warn!(ref_id = frame.ref_id(), "timeseries data - missing time vector");
        return;
    }
    let Ok(time_values) = frame.column_as_f64(time_name) else {
        return;
    };

    for value_name in &names[1..] {
        let labels = frame.labels(value_name);
        let (Some(feature_name), Some(control_name)) = (
            labels.and_then(|l| l.get(columns::FEATURE)),
            labels.and_then(|l| l.get(columns::CONTROL)),
        ) else {
            continue;
        };
        let Some(feature) = features.get_mut(feature_name) else {
            warn!(
                ref_id = frame.ref_id(),
                feature = feature_name.as_str(),
                "timeseries column references unknown feature"
            );
            continue;
        };
        let Ok(column_values) = frame.column_as_f64(value_name) else {
            continue;
        };

        let (t, v) = no_nulls(&time_values, &column_values);
        let time_field = SeriesField::new(time_name.clone(), t);
        let mut value_field = SeriesField::new(value_name.clone(), v);
        if let Some(labels) = labels {
            value_field.labels = labels.clone();
        }

        let characteristic = feature.characteristic_mut_or_default(control_name);
        characteristic.timeseries = Some(Timeseries {
            time: time_field,
            values: value_field,
        });

        if !frame.meta().is_empty() {
            for (key, value) in frame.meta() {
                feature.meta.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Build a synthetic single-series feature from a plain timeseries frame.
pub fn load_single_timeseries(frame: &Frame) -> Option<Feature> {
    let names = frame.column_names();
    let time_name = names.first()?;
    if !matches!(frame.field_kind(time_name), Ok(FieldKind::Time)) {
        warn!(ref_id = frame.ref_id(), "timeseries data - missing time vector");
        return None;
    }

    let value_name = names[1..]
        .iter()
        .find(|name| matches!(frame.field_kind(name), Ok(FieldKind::Number)));
    let Some(value_name) = value_name else {
        warn!(ref_id = frame.ref_id(), "timeseries data - missing value vector");
        return None;
    };

    let time_values = frame.column_as_f64(time_name).ok()?;
    let column_values = frame.column_as_f64(value_name).ok()?;
    let (t, v) = no_nulls(&time_values, &column_values);

    let mut feature = Feature::new("value", "", frame.ref_id());
    let characteristic = feature.characteristic_mut_or_default(TIMESERIES_CHARACTERISTIC);
    characteristic.timeseries = Some(Timeseries {
        time: SeriesField::new(time_name.clone(), t),
        values: SeriesField::new(value_name.clone(), v),
    });
    Some(feature)
}

/// Build a synthetic feature from a timeseries frame plus a custom table
/// frame.
///
/// Every first-row scalar of the table frame becomes a passthrough table
/// entry; entries whose names collide with computed SPC parameters are
/// overwritten later by the calculation step.
pub fn load_timeseries_with_custom_table(
    timeseries_frame: &Frame,
    table_frame: &Frame,
) -> Option<Feature> {
    let mut feature = load_single_timeseries(timeseries_frame)?;
    let characteristic = feature.first_characteristic_mut()?;

    for name in table_frame.column_names() {
        let values = match table_frame.column_as_table_values(&name) {
            Ok(values) => values,
            Err(e) => {
                warn!(
                    ref_id = table_frame.ref_id(),
                    column = name.as_str(),
                    "skipping unreadable column: {}",
                    e.user_message()
                );
                continue;
            }
        };
        match values.into_iter().next() {
            Some(value) if !value.is_null() => {
                characteristic.table.insert(name, value);
            }
            _ => {}
        }
    }

    Some(feature)
}

#[cfg(test)]
mod tests {
    use super::*;
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
            Series::new("feature".into(), &["part-7", "part-7", "part-9"]).into_column(),
            Series::new("control".into(), &["diameter", "length", "diameter"]).into_column(),
            Series::new("nominal".into(), &[4.2, 12.0, 6.5]).into_column(),
            Series::new("partid".into(), &["7", "7", "9"]).into_column(),
            Series::new("lsl".into(), &[4.0, 11.5, 6.0]).into_column(),
        ])
        .unwrap();
        Frame::new("A", df)
    }

    fn wide_timeseries_frame() -> Frame {
        let df = DataFrame::new(vec![
            datetime_column("Time", &[0, 60_000, 120_000]),
            Series::new("Value".into(), &[Some(4.1), None, Some(4.3)]).into_column(),
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
    fn test_load_features_by_control() {
        let mut features = MappedFeatures::new();
        load_features_by_control(&features_table_frame(), &mut features);

        let features = features.into_features();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].id, "part-7");
        assert_eq!(features[0].part_id, "7");
        assert_eq!(features[0].ref_id, "A");

        let diameter = features[0].characteristic("diameter").unwrap();
        assert_eq!(diameter.table.get("nominal"), Some(&TableValue::Number(4.2)));
        assert_eq!(diameter.table.get("lsl"), Some(&TableValue::Number(4.0)));
        // Meta columns identify the row, they are not facts
        assert!(!diameter.table.contains_key("feature"));
        assert!(!diameter.table.contains_key("control"));
        assert!(!diameter.table.contains_key("partid"));

        assert!(features[0].characteristic("length").is_some());
        assert_eq!(features[1].id, "part-9");
    }

    #[test]
    fn test_load_features_requires_key_columns() {
        let df = DataFrame::new(vec![
            Series::new("feature".into(), &["part-7"]).into_column(),
            Series::new("nominal".into(), &[4.2]).into_column(),
        ])
        .unwrap();
        let mut features = MappedFeatures::new();
        load_features_by_control(&Frame::new("A", df), &mut features);
        assert!(features.into_features().is_empty());
    }

    #[test]
    fn test_load_timeseries_attaches_to_existing_feature() {
        let mut features = MappedFeatures::new();
        load_features_by_control(&features_table_frame(), &mut features);
        load_timeseries(&wide_timeseries_frame(), &mut features);

        let features = features.into_features();
        let diameter = features[0].characteristic("diameter").unwrap();
        let timeseries = diameter.timeseries.as_ref().unwrap();

        // The null pair is dropped on both axes
        assert_eq!(timeseries.time.values, vec![0.0, 120.0]);
        assert_eq!(timeseries.values.values, vec![4.1, 4.3]);
        assert!(timeseries.is_aligned());
        // Table facts from the features table survive
        assert_eq!(diameter.table.get("nominal"), Some(&TableValue::Number(4.2)));
        // Wide-frame meta is folded into the feature
        assert_eq!(features[0].meta.get("type").map(String::as_str), Some("timeseries-wide"));
    }

    #[test]
    fn test_load_timeseries_skips_unlabeled_and_unknown_columns() {
        let df = DataFrame::new(vec![
            datetime_column("Time", &[0, 60_000]),
            Series::new("unlabeled".into(), &[1.0, 2.0]).into_column(),
            Series::new("stranger".into(), &[1.0, 2.0]).into_column(),
        ])
        .unwrap();
        let labels = FieldLabels::from([
            ("feature".to_string(), "no-such-feature".to_string()),
            ("control".to_string(), "diameter".to_string()),
        ]);
        let frame = Frame::new("B", df).with_labels("stranger", labels);

        let mut features = MappedFeatures::new();
        load_features_by_control(&features_table_frame(), &mut features);
        load_timeseries(&frame, &mut features);

        for feature in features.into_features() {
            for characteristic in feature.characteristics() {
                assert!(characteristic.timeseries.is_none());
            }
        }
    }

    #[test]
    fn test_load_single_timeseries() {
        let df = DataFrame::new(vec![
            datetime_column("Time", &[0, 60_000]),
            Series::new("temperature".into(), &[20.5, 21.0]).into_column(),
        ])
        .unwrap();
        let feature = load_single_timeseries(&Frame::new("A", df)).unwrap();

        assert_eq!(feature.id, "value");
        assert_eq!(feature.ref_id, "A");
        let characteristic = feature.first_characteristic().unwrap();
        assert_eq!(characteristic.name, "timeseries");
        let timeseries = characteristic.timeseries.as_ref().unwrap();
        assert_eq!(timeseries.values.values, vec![20.5, 21.0]);
        assert_eq!(timeseries.values.name, "temperature");
    }

    #[test]
    fn test_load_single_timeseries_requires_time_lead() {
        let df = DataFrame::new(vec![
            Series::new("a".into(), &[1.0, 2.0]).into_column(),
            Series::new("b".into(), &[3.0, 4.0]).into_column(),
        ])
        .unwrap();
        assert!(load_single_timeseries(&Frame::new("A", df)).is_none());
    }

    #[test]
    fn test_load_timeseries_with_custom_table() {
        let ts_df = DataFrame::new(vec![
            datetime_column("Time", &[0, 60_000]),
            Series::new("temperature".into(), &[20.5, 21.0]).into_column(),
        ])
        .unwrap();
        let table_df = DataFrame::new(vec![
            Series::new("nominal".into(), &[21.0, 99.0]).into_column(),
            Series::new("machine".into(), &["M1", "M2"]).into_column(),
            Series::new("empty".into(), &[None::<f64>, Some(1.0)]).into_column(),
        ])
        .unwrap();

        let feature =
            load_timeseries_with_custom_table(&Frame::new("A", ts_df), &Frame::new("C", table_df))
                .unwrap();
        let table = &feature.first_characteristic().unwrap().table;

        // Only first-row scalars are copied; nulls are skipped
        assert_eq!(table.get("nominal"), Some(&TableValue::Number(21.0)));
        assert_eq!(table.get("machine"), Some(&TableValue::Text("M1".into())));
        assert!(!table.contains_key("empty"));
    }
}
