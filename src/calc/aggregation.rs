//! Trailing-window aggregation of raw measurement series
//!
//! Grouping is right-aligned: windows are formed from the newest sample
//! backwards, so the last output window is always full and a partial window
//! can only occur at the start of the output. Sample size 1 never groups;
//! it either passes the series through or applies the moving-range
//! transform, depending on the chart type.

use crate::options::{AggregationType, ChartType};

/// Mean of each trailing window.
///
/// Non-finite members contribute 0 to the sum but still count toward the
/// divisor.
pub fn grouped_average(values: &[f64], sample_size: usize) -> Vec<f64> {
    let sample_size = sample_size.max(1);
    let mut result: Vec<f64> = values
        .rchunks(sample_size)
        .map(|window| {
            let sum: f64 = window
                .iter()
                .map(|v| if v.is_finite() { *v } else { 0.0 })
                .sum();
            sum / window.len() as f64
        })
        .collect();
    result.reverse();
    result
}

/// Range (max − min) of each trailing window, over finite members only.
pub fn grouped_difference(values: &[f64], sample_size: usize) -> Vec<f64> {
    let sample_size = sample_size.max(1);
    let mut result: Vec<f64> = values
        .rchunks(sample_size)
        .map(|window| {
            let max = window
                .iter()
                .copied()
                .filter(|v| v.is_finite())
                .fold(f64::NEG_INFINITY, f64::max);
            let min = window
                .iter()
                .copied()
                .filter(|v| v.is_finite())
                .fold(f64::INFINITY, f64::min);
            max - min
        })
        .collect();
    result.reverse();
    result
}

/// Population standard deviation of each trailing window, over finite
/// members only.
pub fn grouped_std_dev(values: &[f64], sample_size: usize) -> Vec<f64> {
    let sample_size = sample_size.max(1);
    let mut result: Vec<f64> = values
        .rchunks(sample_size)
        .map(|window| {
            let valid: Vec<f64> = window.iter().copied().filter(|v| v.is_finite()).collect();
            let count = valid.len() as f64;
            let mean = valid.iter().sum::<f64>() / count;
            let mean_squared_diff =
                valid.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
            mean_squared_diff.sqrt()
        })
        .collect();
    result.reverse();
    result
}

/// Absolute differences of adjacent values; output is one shorter than the
/// input.
pub fn moving_range(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|pair| (pair[0] - pair[1]).abs()).collect()
}

/// Aggregate a value series for the configured sample size.
///
/// Sample size 1 is the individuals case: the moving-range chart gets the
/// MR transform, every other chart gets the series unchanged. Larger sample
/// sizes dispatch to the trailing-window reducer selected by `aggregation`.
pub fn value_sample_size(
    values: &[f64],
    sample_size: usize,
    aggregation: AggregationType,
    chart_type: ChartType,
) -> Vec<f64> {
    if sample_size <= 1 {
        return match chart_type {
            ChartType::MrChart => moving_range(values),
            ChartType::Timeseries => values.to_vec(),
        };
    }
    match aggregation {
        AggregationType::Range => grouped_difference(values, sample_size),
        AggregationType::StandardDeviation => grouped_std_dev(values, sample_size),
        AggregationType::Mean => grouped_average(values, sample_size),
    }
}

/// Companion time-axis transform for [`value_sample_size`].
///
/// Keeps the time labels aligned with the aggregated value windows: the MR
/// series is one point shorter, so its first time sample is dropped; grouped
/// series get the window-average timestamp.
pub fn time_sample_size(time: &[f64], sample_size: usize, chart_type: ChartType) -> Vec<f64> {
    if sample_size <= 1 {
        return match chart_type {
            ChartType::MrChart => time.get(1..).unwrap_or_default().to_vec(),
            ChartType::Timeseries => time.to_vec(),
        };
    }
    grouped_average(time, sample_size)
}
