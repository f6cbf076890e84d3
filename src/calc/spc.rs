//! SPC orchestrator
//!
//! [`calc_spc`] drives the aggregation engine, the parameter registry and
//! the control-limit calculator over one feature. It is a pure function:
//! the input feature is cloned up front and never mutated.
//!
//! Only the first characteristic (in first-seen order) is processed;
//! multi-characteristic aggregation is not supported here.

use crate::calc::aggregation::{time_sample_size, value_sample_size};
use crate::calc::limits::{
    calc_cl_mr, calc_cl_x, calc_lcl, calc_lcl_mr, calc_lcl_x, calc_max, calc_mean, calc_min,
    calc_ucl, calc_ucl_mr, calc_ucl_x,
};
use crate::calc::params::{SpcParam, filter_spc_params};
use crate::constants::spc::MAX_DEFAULT_SAMPLE_SIZE;
use crate::data::feature::{Feature, TableValue};
use crate::options::{AggregationType, ChartType, ConstantsConfig, SpcOptions};
use std::collections::{BTreeMap, HashSet};
use tracing::warn;

fn store(table: &mut BTreeMap<String, TableValue>, param: SpcParam, value: f64) {
    table.insert(param.as_str().to_string(), TableValue::Number(value));
}

/// Store a computed no-aggregation parameter, omitting non-finite results.
fn store_finite(table: &mut BTreeMap<String, TableValue>, param: SpcParam, value: Option<f64>) {
    if let Some(value) = value {
        if value.is_finite() {
            store(table, param, value);
        }
    }
}

/// Enrich a feature with aggregated series and requested SPC constants.
///
/// Returns a deep copy; the input is never mutated. Without a timeseries
/// (or with a misaligned one) the clone is returned unchanged. Without a
/// constants selection only the aggregation step runs. Parameters that are
/// illegal for the configuration (sample size out of range, wrong
/// aggregation or chart type) are silently omitted from the table.
#[profiling::function]
pub fn calc_spc(
    feature: &Feature,
    spc_options: Option<&SpcOptions>,
    constants_config: Option<&ConstantsConfig>,
) -> Feature {
    let mut f = feature.clone();

    let defaults = SpcOptions::default();
    let options = spc_options.unwrap_or(&defaults);
    let sample_size = options.sample_size;
    let aggregation = options.aggregation;
    let chart_type = options.chart_type;

    let Some(characteristic) = f.first_characteristic_mut() else {
        return f;
    };
    let Some(timeseries) = characteristic.timeseries.as_mut() else {
        return f;
    };
    if !timeseries.is_aligned() {
        warn!(
            time_len = timeseries.time.values.len(),
            values_len = timeseries.values.values.len(),
            "timeseries axes out of alignment, skipping calculation"
        );
        return f;
    }

    timeseries.values.values =
        value_sample_size(&timeseries.values.values, sample_size, aggregation, chart_type);
    timeseries.time.values = time_sample_size(&timeseries.time.values, sample_size, chart_type);

    // Point counts changed; per-point display config would corrupt the plot
    timeseries.time.config.clear();
    timeseries.values.config.clear();

    let values = timeseries.values.values.clone();
    let table = &mut characteristic.table;

    if let Some(nominal) = options.nominal {
        store(table, SpcParam::Nominal, nominal);
    }
    if let Some(lsl) = options.lsl {
        store(table, SpcParam::Lsl, lsl);
    }
    if let Some(usl) = options.usl {
        store(table, SpcParam::Usl, usl);
    }

    let Some(constants_config) = constants_config else {
        return f;
    };
    let selected: HashSet<SpcParam> =
        filter_spc_params(constants_config.names()).into_iter().collect();

    if selected.contains(&SpcParam::Min) {
        store(table, SpcParam::Min, calc_min(&values));
    }
    if selected.contains(&SpcParam::Max) {
        store(table, SpcParam::Max, calc_max(&values));
    }
    if selected.contains(&SpcParam::Range) {
        let max = table
            .get(SpcParam::Max.as_str())
            .and_then(TableValue::as_f64)
            .unwrap_or_else(|| calc_max(&values));
        let min = table
            .get(SpcParam::Min.as_str())
            .and_then(TableValue::as_f64)
            .unwrap_or_else(|| calc_min(&values));
        store(table, SpcParam::Range, max - min);
    }
    if selected.contains(&SpcParam::Mean) {
        store(table, SpcParam::Mean, calc_mean(&values));
    }

    // Aggregation-only use case: no explicit options means no derived limits
    if spc_options.is_none() {
        return f;
    }

    let within_cap = sample_size > 1 && sample_size <= MAX_DEFAULT_SAMPLE_SIZE;
    let agg_is_mean = aggregation == AggregationType::Mean;

    if within_cap {
        let limit_params: [(SpcParam, bool, usize); 6] = [
            (SpcParam::Lcl, !agg_is_mean, 0),
            (SpcParam::LclRbar, agg_is_mean, 0),
            (SpcParam::LclSbar, agg_is_mean, 1),
            (SpcParam::Ucl, !agg_is_mean, 0),
            (SpcParam::UclRbar, agg_is_mean, 0),
            (SpcParam::UclSbar, agg_is_mean, 1),
        ];
        for (param, condition, index) in limit_params {
            if !condition || !selected.contains(&param) {
                continue;
            }
            let result = match param {
                SpcParam::Lcl | SpcParam::LclRbar | SpcParam::LclSbar => {
                    calc_lcl(&values, aggregation, sample_size)
                }
                _ => calc_ucl(&values, aggregation, sample_size),
            };
            if let Some(limit) = result.and_then(|limits| limits.get(index).copied()) {
                store(table, param, limit);
            }
        }
    }

    if sample_size == 1 && chart_type == ChartType::MrChart {
        if selected.contains(&SpcParam::CenterLineMr) {
            store_finite(table, SpcParam::CenterLineMr, Some(calc_cl_mr(&values)));
        }
        if selected.contains(&SpcParam::UclMr) {
            store_finite(table, SpcParam::UclMr, calc_ucl_mr(&values));
        }
        if selected.contains(&SpcParam::LclMr) {
            store_finite(table, SpcParam::LclMr, calc_lcl_mr(&values));
        }
    }
    if sample_size == 1 && chart_type == ChartType::Timeseries {
        if selected.contains(&SpcParam::CenterLineX) {
            store_finite(table, SpcParam::CenterLineX, Some(calc_cl_x(&values)));
        }
        if selected.contains(&SpcParam::UclX) {
            store_finite(table, SpcParam::UclX, calc_ucl_x(&values));
        }
        if selected.contains(&SpcParam::LclX) {
            store_finite(table, SpcParam::LclX, calc_lcl_x(&values));
        }
    }

    f
}
