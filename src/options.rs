//! Panel option structures supplied by the host UI
//!
//! These mirror the host's camelCase JSON payload. Everything is defaulted,
//! so a missing or partial options object never fails; `validate()` clamps
//! out-of-range values instead of rejecting them.

use crate::constants::{display, spc};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Window reducer applied when grouping a series into samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AggregationType {
    #[default]
    Mean,
    Range,
    StandardDeviation,
}

/// Which chart the panel is rendering
///
/// `meanChart` is accepted as a legacy alias for the individuals/timeseries
/// chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChartType {
    #[serde(rename = "timeseries", alias = "meanChart")]
    #[default]
    Timeseries,
    #[serde(rename = "mrChart")]
    MrChart,
}

/// SPC sampling and specification-limit options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpcOptions {
    /// Measurements per sample group; 1 means individuals data (no grouping)
    pub sample_size: usize,

    /// Reducer applied to each sample group
    pub aggregation: AggregationType,

    /// Chart family the series feeds
    pub chart_type: ChartType,

    /// Nominal value, copied verbatim into the characteristic table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nominal: Option<f64>,

    /// Lower specification limit, copied verbatim into the table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lsl: Option<f64>,

    /// Upper specification limit, copied verbatim into the table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usl: Option<f64>,
}

impl Default for SpcOptions {
    fn default() -> Self {
        Self {
            sample_size: spc::DEFAULT_SAMPLE_SIZE,
            aggregation: AggregationType::default(),
            chart_type: ChartType::default(),
            nominal: None,
            lsl: None,
            usl: None,
        }
    }
}

impl SpcOptions {
    /// Validate and clamp option values
    pub fn validate(&mut self) {
        // Sample size is a positive count; grouping starts at 2
        if self.sample_size < 1 {
            self.sample_size = spc::DEFAULT_SAMPLE_SIZE;
        }
    }
}

/// One user-selected constant line: a parameter (or raw table column) name
/// plus display styling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConstantConfigItem {
    pub name: String,
    pub color: String,
    pub title: String,
    pub line_width: f64,
}

impl Default for ConstantConfigItem {
    fn default() -> Self {
        Self {
            name: String::new(),
            color: display::DEFAULT_CONSTANT_COLOR.to_string(),
            title: String::new(),
            line_width: display::DEFAULT_LINE_WIDTH,
        }
    }
}

/// Ordered selection of constant lines to compute and draw
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConstantsConfig {
    pub items: Vec<ConstantConfigItem>,
}

impl ConstantsConfig {
    /// Selected names in user order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.name.as_str())
    }
}

/// Styling for one spec-limit line
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LimitConfigItem {
    pub name: String,
    pub color: String,
}

/// Upper/lower spec-limit display configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LimitConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub up: Option<LimitConfigItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub down: Option<LimitConfigItem>,
}

/// Timeseries display parameters forwarded to the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeseriesParams {
    pub fill: f64,
    pub line_width: f64,
    pub point_size: f64,
    pub line_color: String,
    pub show_legend: bool,
    pub decimals: u8,
}

impl Default for TimeseriesParams {
    fn default() -> Self {
        Self {
            fill: 0.0,
            line_width: display::DEFAULT_LINE_WIDTH,
            point_size: display::DEFAULT_POINT_SIZE,
            line_color: display::DEFAULT_LINE_COLOR.to_string(),
            show_legend: false,
            decimals: display::DEFAULT_DECIMALS,
        }
    }
}

/// Complete panel option payload
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PanelOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_config: Option<LimitConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constants_config: Option<ConstantsConfig>,
    pub timeseries_params: TimeseriesParams,
    pub spc_options: SpcOptions,
}

impl PanelOptions {
    /// Validate and clamp all nested option values
    pub fn validate(&mut self) {
        self.spc_options.validate();
        if self.timeseries_params.line_width < 0.0 {
            self.timeseries_params.line_width = display::DEFAULT_LINE_WIDTH;
        }
        if self.timeseries_params.point_size < 0.0 {
            self.timeseries_params.point_size = display::DEFAULT_POINT_SIZE;
        }
    }
}

/// Resolve the host's raw option payload into validated panel options.
///
/// `sample_size_override` carries the dashboard-level sample size variable
/// when one is set; it takes precedence over the panel's own value. The core
/// never reads ambient state for this.
pub fn parse_panel_options(
    value: &serde_json::Value,
    sample_size_override: Option<usize>,
) -> Result<PanelOptions> {
    let mut options: PanelOptions = serde_json::from_value(value.clone())?;
    if let Some(sample_size) = sample_size_override {
        options.spc_options.sample_size = sample_size;
    }
    options.validate();
    Ok(options)
}
