//! SPC parameter registry
//!
//! Enumerates the derived parameters a chart configuration can legally
//! request, and filters user-selected constant names down to recognized
//! parameters before anything is computed. Unrecognized names are dropped
//! from computation but may still be display-only passthrough columns from
//! custom table data.

use crate::constants::spc::MAX_DEFAULT_SAMPLE_SIZE;
use crate::options::{AggregationType, ChartType};
use serde::{Deserialize, Serialize};

/// A derived SPC parameter stored in a characteristic's table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpcParam {
    #[serde(rename = "nominal")]
    Nominal,
    #[serde(rename = "lsl")]
    Lsl,
    #[serde(rename = "usl")]
    Usl,
    #[serde(rename = "min")]
    Min,
    #[serde(rename = "max")]
    Max,
    #[serde(rename = "mean")]
    Mean,
    #[serde(rename = "range")]
    Range,
    #[serde(rename = "lcl_Rbar")]
    LclRbar,
    #[serde(rename = "ucl_Rbar")]
    UclRbar,
    #[serde(rename = "lcl_Sbar")]
    LclSbar,
    #[serde(rename = "ucl_Sbar")]
    UclSbar,
    #[serde(rename = "lcl")]
    Lcl,
    #[serde(rename = "ucl")]
    Ucl,
    #[serde(rename = "center_line_mr")]
    CenterLineMr,
    #[serde(rename = "lcl_mr")]
    LclMr,
    #[serde(rename = "ucl_mr")]
    UclMr,
    #[serde(rename = "center_line_x")]
    CenterLineX,
    #[serde(rename = "lcl_x")]
    LclX,
    #[serde(rename = "ucl_x")]
    UclX,
}

/// Every recognized parameter, in display order.
pub const ALL_SPC_PARAMS: [SpcParam; 19] = [
    SpcParam::Nominal,
    SpcParam::Lsl,
    SpcParam::Usl,
    SpcParam::Min,
    SpcParam::Max,
    SpcParam::Mean,
    SpcParam::Range,
    SpcParam::LclRbar,
    SpcParam::UclRbar,
    SpcParam::LclSbar,
    SpcParam::UclSbar,
    SpcParam::Lcl,
    SpcParam::Ucl,
    SpcParam::CenterLineMr,
    SpcParam::LclMr,
    SpcParam::UclMr,
    SpcParam::CenterLineX,
    SpcParam::LclX,
    SpcParam::UclX,
];

impl SpcParam {
    /// Wire name used in option payloads and characteristic tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            SpcParam::Nominal => "nominal",
            SpcParam::Lsl => "lsl",
            SpcParam::Usl => "usl",
            SpcParam::Min => "min",
            SpcParam::Max => "max",
            SpcParam::Mean => "mean",
            SpcParam::Range => "range",
            SpcParam::LclRbar => "lcl_Rbar",
            SpcParam::UclRbar => "ucl_Rbar",
            SpcParam::LclSbar => "lcl_Sbar",
            SpcParam::UclSbar => "ucl_Sbar",
            SpcParam::Lcl => "lcl",
            SpcParam::Ucl => "ucl",
            SpcParam::CenterLineMr => "center_line_mr",
            SpcParam::LclMr => "lcl_mr",
            SpcParam::UclMr => "ucl_mr",
            SpcParam::CenterLineX => "center_line_x",
            SpcParam::LclX => "lcl_x",
            SpcParam::UclX => "ucl_x",
        }
    }

    /// Human-readable label for host option editors.
    pub fn label(&self) -> &'static str {
        match self {
            SpcParam::Nominal => "Nominal",
            SpcParam::Lsl => "LSL",
            SpcParam::Usl => "USL",
            SpcParam::Min => "Min",
            SpcParam::Max => "Max",
            SpcParam::Mean => "Mean",
            SpcParam::Range => "Range",
            SpcParam::LclRbar => "LCL R-bar",
            SpcParam::UclRbar => "UCL R-bar",
            SpcParam::LclSbar => "LCL S-bar",
            SpcParam::UclSbar => "UCL S-bar",
            SpcParam::Lcl => "LCL",
            SpcParam::Ucl => "UCL",
            SpcParam::CenterLineMr => "Center line (MR)",
            SpcParam::LclMr => "LCL (MR)",
            SpcParam::UclMr => "UCL (MR)",
            SpcParam::CenterLineX => "Center line (X)",
            SpcParam::LclX => "LCL (X)",
            SpcParam::UclX => "UCL (X)",
        }
    }

    /// Parse a wire name into a parameter, if recognized.
    pub fn parse(name: &str) -> Option<SpcParam> {
        ALL_SPC_PARAMS.iter().copied().find(|p| p.as_str() == name)
    }
}

/// Whether a string names a recognized SPC parameter.
pub fn is_spc_param(name: &str) -> bool {
    SpcParam::parse(name).is_some()
}

/// Keep only the names that are recognized SPC parameters, preserving order.
pub fn filter_spc_params<'a, I>(names: I) -> Vec<SpcParam>
where
    I: IntoIterator<Item = &'a str>,
{
    names.into_iter().filter_map(SpcParam::parse).collect()
}

/// Parameters that are legal for the given chart configuration.
///
/// The base facts are always available. Control limits for grouped charts
/// require a sample size in `2..=MAX_DEFAULT_SAMPLE_SIZE`: the mean
/// aggregation exposes the R-bar/S-bar limit pairs, the other aggregations
/// a single UCL/LCL pair. Sample size 1 exposes the XmR parameters of the
/// selected chart instead.
pub fn available_spc_params(
    sample_size: usize,
    aggregation: AggregationType,
    chart_type: ChartType,
) -> Vec<SpcParam> {
    let mut params = vec![
        SpcParam::Nominal,
        SpcParam::Lsl,
        SpcParam::Usl,
        SpcParam::Min,
        SpcParam::Max,
        SpcParam::Mean,
        SpcParam::Range,
    ];
    if sample_size > 1 && sample_size <= MAX_DEFAULT_SAMPLE_SIZE {
        if aggregation == AggregationType::Mean {
            params.extend([
                SpcParam::LclRbar,
                SpcParam::UclRbar,
                SpcParam::LclSbar,
                SpcParam::UclSbar,
            ]);
        } else {
            params.extend([SpcParam::Lcl, SpcParam::Ucl]);
        }
    }
    if sample_size == 1 {
        match chart_type {
            ChartType::MrChart => {
                params.extend([SpcParam::CenterLineMr, SpcParam::LclMr, SpcParam::UclMr]);
            }
            ChartType::Timeseries => {
                params.extend([SpcParam::CenterLineX, SpcParam::LclX, SpcParam::UclX]);
            }
        }
    }
    params
}
