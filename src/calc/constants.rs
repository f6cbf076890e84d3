//! Control-chart factor table
//!
//! Standard Shewhart chart factors indexed by sample (subgroup) size,
//! tabulated for n = 2..=25. Lookups outside the tabulated range return
//! `None`; callers treat that as "control limits unsupported for this
//! sample size" and omit the affected parameters.

/// Smallest tabulated sample size.
pub const MIN_TABLE_SAMPLE_SIZE: usize = 2;

/// Largest tabulated sample size.
pub const MAX_TABLE_SAMPLE_SIZE: usize = 25;

/// A2 factors for X-bar chart limits from R-bar.
///
/// UCL/LCL = X-bar ± A2 * R.
const A2_XBAR_LIMIT_RANGE: [f64; 24] = [
    1.880, 1.023, 0.729, 0.577, 0.483, 0.419, 0.373, 0.337, 0.308, 0.285, 0.266, 0.249, 0.235,
    0.223, 0.212, 0.203, 0.194, 0.187, 0.180, 0.173, 0.167, 0.162, 0.157, 0.153,
];

/// A3 factors for X-bar chart limits from S-bar.
///
/// UCL/LCL = X-bar ± A3 * sigma.
const A3_XBAR_LIMIT_SIGMA: [f64; 24] = [
    2.659, 1.954, 1.628, 1.427, 1.287, 1.182, 1.099, 1.032, 0.975, 0.927, 0.886, 0.850, 0.817,
    0.789, 0.763, 0.739, 0.718, 0.698, 0.680, 0.663, 0.647, 0.633, 0.619, 0.606,
];

/// B3 factors for the S chart lower control limit.
///
/// LCL_S = B3 * sigma.
const B3_SIGMA_LCL: [f64; 24] = [
    0.0, 0.0, 0.0, 0.0, 0.030, 0.118, 0.185, 0.239, 0.284, 0.321, 0.354, 0.382, 0.406, 0.428,
    0.448, 0.466, 0.482, 0.497, 0.510, 0.523, 0.534, 0.545, 0.555, 0.565,
];

/// B4 factors for the S chart upper control limit.
///
/// UCL_S = B4 * sigma.
const B4_SIGMA_UCL: [f64; 24] = [
    3.267, 2.568, 2.266, 2.089, 1.970, 1.882, 1.815, 1.761, 1.716, 1.679, 1.646, 1.618, 1.594,
    1.572, 1.552, 1.534, 1.518, 1.503, 1.490, 1.477, 1.466, 1.455, 1.445, 1.435,
];

/// D3 factors for the R chart lower control limit.
///
/// LCL_R = D3 * R.
const D3_RANGE_LCL: [f64; 24] = [
    0.0, 0.0, 0.0, 0.0, 0.0, 0.076, 0.136, 0.184, 0.223, 0.256, 0.283, 0.307, 0.328, 0.347, 0.363,
    0.378, 0.391, 0.403, 0.415, 0.425, 0.434, 0.443, 0.451, 0.459,
];

/// D4 factors for the R chart upper control limit.
///
/// UCL_R = D4 * R.
const D4_RANGE_UCL: [f64; 24] = [
    3.267, 2.574, 2.282, 2.114, 2.004, 1.924, 1.864, 1.816, 1.777, 1.744, 1.717, 1.693, 1.672,
    1.653, 1.637, 1.622, 1.608, 1.597, 1.585, 1.575, 1.566, 1.557, 1.548, 1.541,
];

/// d2 factors (mean of the range distribution), used to estimate sigma from
/// the average range.
///
/// sigma-hat = R-bar / d2.
const D2_XBAR_RANGE: [f64; 24] = [
    1.128, 1.693, 2.059, 2.326, 2.534, 2.704, 2.847, 2.970, 3.078, 3.173, 3.258, 3.336, 3.407,
    3.472, 3.532, 3.588, 3.640, 3.689, 3.735, 3.778, 3.819, 3.858, 3.895, 3.931,
];

/// Named control-chart coefficient selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlConstant {
    /// X-bar limit factor from R-bar
    A2,
    /// X-bar limit factor from S-bar
    A3,
    /// S chart LCL factor
    B3,
    /// S chart UCL factor
    B4,
    /// R chart LCL factor
    D3,
    /// R chart UCL factor
    D4,
    /// Mean of the range distribution (sigma estimation)
    D2,
}

impl ControlConstant {
    fn table(&self) -> &'static [f64; 24] {
        match self {
            ControlConstant::A2 => &A2_XBAR_LIMIT_RANGE,
            ControlConstant::A3 => &A3_XBAR_LIMIT_SIGMA,
            ControlConstant::B3 => &B3_SIGMA_LCL,
            ControlConstant::B4 => &B4_SIGMA_UCL,
            ControlConstant::D3 => &D3_RANGE_LCL,
            ControlConstant::D4 => &D4_RANGE_UCL,
            ControlConstant::D2 => &D2_XBAR_RANGE,
        }
    }
}

/// Look up a control-chart factor for the given sample size.
///
/// Returns `None` when `sample_size` is outside the tabulated range; the
/// corresponding chart parameters are then unsupported and must not be
/// computed.
pub fn control_constant(sample_size: usize, constant: ControlConstant) -> Option<f64> {
    if !(MIN_TABLE_SAMPLE_SIZE..=MAX_TABLE_SAMPLE_SIZE).contains(&sample_size) {
        return None;
    }
    Some(constant.table()[sample_size - MIN_TABLE_SAMPLE_SIZE])
}
