//! Canonical chart data model
//!
//! The classifier normalizes every supported input shape into this model:
//! a `Feature` (one measured part) owning named `Characteristic`s, each
//! carrying a fact table and optionally an index-aligned timeseries. The
//! calculation layer consumes and enriches these values; the host renders
//! them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scalar entry of a characteristic's fact table.
///
/// The same table holds numeric derived constants and arbitrary passthrough
/// columns from custom table data, so entries are a sum type rather than
/// bare floats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableValue {
    Number(f64),
    Text(String),
    Null,
}

impl TableValue {
    /// Numeric view of the value, if it is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TableValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, TableValue::Null)
    }
}

impl From<f64> for TableValue {
    fn from(value: f64) -> Self {
        TableValue::Number(value)
    }
}

impl From<String> for TableValue {
    fn from(value: String) -> Self {
        TableValue::Text(value)
    }
}

impl From<&str> for TableValue {
    fn from(value: &str) -> Self {
        TableValue::Text(value.to_string())
    }
}

/// One axis of a timeseries (time or values) plus its display metadata.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeriesField {
    /// Column name from the source frame
    pub name: String,

    /// Source column labels (e.g. `feature`, `control`)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    /// Ordered sample values
    pub values: Vec<f64>,

    /// Per-point display config carried from the host. Stale after
    /// aggregation changes the point count, so the orchestrator clears it.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub config: serde_json::Map<String, serde_json::Value>,
}

impl SeriesField {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
            ..Self::default()
        }
    }
}

/// Paired time/value sequences with matching length and index alignment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Timeseries {
    pub time: SeriesField,
    pub values: SeriesField,
}

impl Timeseries {
    pub fn len(&self) -> usize {
        self.values.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.values.is_empty()
    }

    /// Whether time and values still line up index for index.
    pub fn is_aligned(&self) -> bool {
        self.time.values.len() == self.values.values.len()
    }
}

/// One measured attribute of a feature: a table of scalar facts plus an
/// optional timeseries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Characteristic {
    pub name: String,
    pub table: BTreeMap<String, TableValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeseries: Option<Timeseries>,
}

impl Characteristic {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// One physical part/item being measured.
///
/// Characteristic names are unique and keep first-seen order; the
/// orchestrator operates on the first one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Feature {
    pub uid: String,
    pub id: String,
    pub part_id: String,
    pub ref_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: BTreeMap<String, String>,
    characteristics: Vec<Characteristic>,
}

impl Feature {
    pub fn new(id: impl Into<String>, part_id: impl Into<String>, ref_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            part_id: part_id.into(),
            ref_id: ref_id.into(),
            ..Self::default()
        }
    }

    pub fn characteristics(&self) -> &[Characteristic] {
        &self.characteristics
    }

    pub fn first_characteristic(&self) -> Option<&Characteristic> {
        self.characteristics.first()
    }

    pub fn first_characteristic_mut(&mut self) -> Option<&mut Characteristic> {
        self.characteristics.first_mut()
    }

    pub fn characteristic(&self, name: &str) -> Option<&Characteristic> {
        self.characteristics.iter().find(|c| c.name == name)
    }

    /// Get the named characteristic, inserting an empty one at the end if it
    /// does not exist yet.
    pub fn characteristic_mut_or_default(&mut self, name: &str) -> &mut Characteristic {
        if let Some(index) = self.characteristics.iter().position(|c| c.name == name) {
            return &mut self.characteristics[index];
        }
        self.characteristics.push(Characteristic::new(name));
        self.characteristics.last_mut().expect("just pushed")
    }

    /// Replace the named characteristic wholesale, preserving its position.
    pub fn replace_characteristic(&mut self, characteristic: Characteristic) {
        match self
            .characteristics
            .iter()
            .position(|c| c.name == characteristic.name)
        {
            Some(index) => self.characteristics[index] = characteristic,
            None => self.characteristics.push(characteristic),
        }
    }
}
