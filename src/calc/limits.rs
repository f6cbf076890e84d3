//! Control-limit calculations
//!
//! Center lines and UCL/LCL values for the classic grouped chart families
//! (X-bar/R, X-bar/S, R, S) and the individuals family (XmR). Grouped-chart
//! limits require a sample size of at least 2 and return `None` below that;
//! the XmR functions apply only to ungrouped (sample size 1) series.
//!
//! All standard deviations here are population standard deviations
//! (divide by N, not N−1).

use super::aggregation::moving_range;
use super::constants::{ControlConstant, control_constant};
use crate::constants::spc::{MOVING_RANGE_SAMPLE_SIZE, X_CHART_SIGMA};
use crate::options::AggregationType;

/// Arithmetic mean. NaN for an empty slice.
pub fn calc_mean(values: &[f64]) -> f64 {
    let mut sum = 0.0;
    for val in values {
        sum += val;
    }
    sum / values.len() as f64
}

/// Largest value in the slice.
pub fn calc_max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Smallest value in the slice.
pub fn calc_min(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

/// Range: max − min.
pub fn calc_range(values: &[f64]) -> f64 {
    calc_max(values) - calc_min(values)
}

/// Population standard deviation around the supplied mean.
pub fn std_dev(values: &[f64], mean: f64) -> f64 {
    let mean_squared_diff =
        values.iter().map(|val| (val - mean).powi(2)).sum::<f64>() / values.len() as f64;
    mean_squared_diff.sqrt()
}

/// Upper control limits for the grouped chart families.
///
/// `None` when `sample_size <= 1` or outside the factor table. Range and
/// sigma aggregations yield a single limit; mean aggregation yields a pair
/// `[R-bar based, S-bar based]` and the caller picks by index.
pub fn calc_ucl(
    values: &[f64],
    aggregation: AggregationType,
    sample_size: usize,
) -> Option<Vec<f64>> {
    if sample_size <= 1 {
        return None;
    }
    match aggregation {
        AggregationType::Range => {
            let d4 = control_constant(sample_size, ControlConstant::D4)?;
            Some(vec![d4 * calc_range(values)])
        }
        AggregationType::StandardDeviation => {
            let b4 = control_constant(sample_size, ControlConstant::B4)?;
            Some(vec![b4 * std_dev(values, calc_mean(values))])
        }
        AggregationType::Mean => {
            let a2 = control_constant(sample_size, ControlConstant::A2)?;
            let a3 = control_constant(sample_size, ControlConstant::A3)?;
            let mean = calc_mean(values);
            Some(vec![
                mean + a2 * calc_range(values),
                mean + a3 * std_dev(values, mean),
            ])
        }
    }
}

/// Lower control limits for the grouped chart families.
///
/// Same shape and gating as [`calc_ucl`].
pub fn calc_lcl(
    values: &[f64],
    aggregation: AggregationType,
    sample_size: usize,
) -> Option<Vec<f64>> {
    if sample_size <= 1 {
        return None;
    }
    match aggregation {
        AggregationType::Range => {
            let d3 = control_constant(sample_size, ControlConstant::D3)?;
            Some(vec![d3 * calc_range(values)])
        }
        AggregationType::StandardDeviation => {
            let b3 = control_constant(sample_size, ControlConstant::B3)?;
            Some(vec![b3 * std_dev(values, calc_mean(values))])
        }
        AggregationType::Mean => {
            let a2 = control_constant(sample_size, ControlConstant::A2)?;
            let a3 = control_constant(sample_size, ControlConstant::A3)?;
            let mean = calc_mean(values);
            Some(vec![
                mean - a2 * calc_range(values),
                mean - a3 * std_dev(values, mean),
            ])
        }
    }
}

/// Center line of the moving-range chart.
///
/// The orchestrator hands this the already-MR-transformed series, so the
/// plain mean is the MR-bar center line.
pub fn calc_cl_mr(values: &[f64]) -> f64 {
    calc_mean(values)
}

/// Average moving range of the raw individuals series, used for X-chart
/// limit estimation.
pub fn calc_mr_for_mean(values: &[f64]) -> f64 {
    calc_mean(&moving_range(values))
}

/// Moving-range chart UCL: MR-bar · D4 at sample size 2.
pub fn calc_ucl_mr(values: &[f64]) -> Option<f64> {
    let d4 = control_constant(MOVING_RANGE_SAMPLE_SIZE, ControlConstant::D4)?;
    Some(calc_cl_mr(values) * d4)
}

/// Moving-range chart LCL: MR-bar · D3 at sample size 2, floored at 0.
pub fn calc_lcl_mr(values: &[f64]) -> Option<f64> {
    let d3 = control_constant(MOVING_RANGE_SAMPLE_SIZE, ControlConstant::D3)?;
    Some((calc_cl_mr(values) * d3).max(0.0))
}

/// Center line of the individuals (X) chart.
pub fn calc_cl_x(values: &[f64]) -> f64 {
    calc_mean(values)
}

/// Individuals-chart UCL: mean + 3 · MR-bar / d2(2).
pub fn calc_ucl_x(values: &[f64]) -> Option<f64> {
    let d2 = control_constant(MOVING_RANGE_SAMPLE_SIZE, ControlConstant::D2)?;
    Some(calc_cl_x(values) + X_CHART_SIGMA * calc_mr_for_mean(values) / d2)
}

/// Individuals-chart LCL: mean − 3 · MR-bar / d2(2).
pub fn calc_lcl_x(values: &[f64]) -> Option<f64> {
    let d2 = control_constant(MOVING_RANGE_SAMPLE_SIZE, ControlConstant::D2)?;
    Some(calc_cl_x(values) - X_CHART_SIGMA * calc_mr_for_mean(values) / d2)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELD: [f64; 5] = [1.0, 2.0, 3.0, 4.0, 5.0];

    #[test]
    fn test_elementary_stats() {
        assert_eq!(calc_min(&FIELD), 1.0);
        assert_eq!(calc_max(&FIELD), 5.0);
        assert_eq!(calc_range(&FIELD), 4.0);
        assert_eq!(calc_mean(&FIELD), 3.0);
        assert_eq!(std_dev(&FIELD, calc_mean(&FIELD)), 1.4142135623730951);
    }

    #[test]
    fn test_empty_input() {
        assert!(calc_mean(&[]).is_nan());
        assert_eq!(calc_max(&[]), f64::NEG_INFINITY);
        assert_eq!(calc_min(&[]), f64::INFINITY);
    }

    #[test]
    fn test_lcl_range() {
        // Range LCL is 0 up to sample size 6, then follows D3
        for sample in 2..=6 {
            assert_eq!(calc_lcl(&FIELD, AggregationType::Range, sample).unwrap()[0], 0.0);
        }
        assert_eq!(calc_lcl(&FIELD, AggregationType::Range, 7).unwrap()[0], 0.304);
        assert_eq!(calc_lcl(&FIELD, AggregationType::Range, 8).unwrap()[0], 0.544);
    }

    #[test]
    fn test_ucl_range() {
        assert_eq!(calc_ucl(&FIELD, AggregationType::Range, 2).unwrap()[0], 13.068);
        assert_eq!(calc_ucl(&FIELD, AggregationType::Range, 3).unwrap()[0], 10.296);
        assert_eq!(calc_ucl(&FIELD, AggregationType::Range, 4).unwrap()[0], 9.128);
    }

    #[test]
    fn test_lcl_mean() {
        assert_eq!(
            calc_lcl(&FIELD, AggregationType::Mean, 2).unwrap(),
            vec![-4.52, -0.7603938623500599]
        );
        assert_eq!(
            calc_lcl(&FIELD, AggregationType::Mean, 7).unwrap(),
            vec![1.324, 1.3283995692750017]
        );
    }

    #[test]
    fn test_ucl_mean_pairs_with_lcl() {
        let ucl = calc_ucl(&FIELD, AggregationType::Mean, 2).unwrap();
        let lcl = calc_lcl(&FIELD, AggregationType::Mean, 2).unwrap();
        // Both limits are symmetric around the mean
        assert!(((ucl[0] + lcl[0]) / 2.0 - 3.0).abs() < 1e-12);
        assert!(((ucl[1] + lcl[1]) / 2.0 - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_lcl_std_dev() {
        assert_eq!(
            calc_lcl(&FIELD, AggregationType::StandardDeviation, 2).unwrap()[0],
            0.0
        );
        assert_eq!(
            calc_lcl(&FIELD, AggregationType::StandardDeviation, 8).unwrap()[0],
            0.2616295090390226
        );
    }

    #[test]
    fn test_ucl_std_dev_uses_b4() {
        let sigma = std_dev(&FIELD, 3.0);
        assert_eq!(
            calc_ucl(&FIELD, AggregationType::StandardDeviation, 8).unwrap()[0],
            1.815 * sigma
        );
    }

    #[test]
    fn test_limits_undefined_for_ungrouped_samples() {
        for agg in [
            AggregationType::Mean,
            AggregationType::Range,
            AggregationType::StandardDeviation,
        ] {
            assert!(calc_ucl(&FIELD, agg, 0).is_none());
            assert!(calc_ucl(&FIELD, agg, 1).is_none());
            assert!(calc_lcl(&FIELD, agg, 0).is_none());
            assert!(calc_lcl(&FIELD, agg, 1).is_none());
        }
    }

    #[test]
    fn test_limits_undefined_beyond_factor_table() {
        assert!(calc_ucl(&FIELD, AggregationType::Range, 26).is_none());
        assert!(calc_lcl(&FIELD, AggregationType::Mean, 26).is_none());
    }

    #[test]
    fn test_moving_range_stats() {
        assert_eq!(moving_range(&FIELD), vec![1.0, 1.0, 1.0, 1.0]);
        assert_eq!(calc_mr_for_mean(&FIELD), 1.0);
        assert_eq!(calc_cl_mr(&FIELD), 3.0);
    }

    #[test]
    fn test_mr_chart_limits() {
        assert!((calc_ucl_mr(&FIELD).unwrap() - 9.801).abs() < 1e-12);
        assert_eq!(calc_lcl_mr(&FIELD).unwrap(), 0.0);
    }

    #[test]
    fn test_x_chart_limits() {
        assert_eq!(calc_cl_x(&FIELD), 3.0);
        assert!((calc_ucl_x(&FIELD).unwrap() - 5.659574468085107).abs() < 1e-12);
        assert!((calc_lcl_x(&FIELD).unwrap() - 0.3404255319148932).abs() < 1e-12);
    }
}
