//! # spc-oxide
//!
//! Statistical Process Control calculation core for chart panels: turns
//! host-supplied tabular frames into chart-ready series and control-limit
//! constants.
//!
//! The host dashboard delivers raw query frames and user options; this crate
//! classifies the frames into one of three chart modes, normalizes them into
//! a `Feature` → `Characteristic` model, aggregates the measurement series
//! into trailing sample windows, and derives the requested SPC parameters
//! (mean, range, UCL/LCL for the X-bar/R, X-bar/S, R, S and XmR chart
//! families). Rendering, option editors and panel wiring stay on the host
//! side.
//!
//! ## Modules
//!
//! - [`data`] — frame classification and the canonical feature model
//! - [`calc`] — aggregation, control-chart factors, limits, and the
//!   `calc_spc` orchestrator
//! - [`options`] — host option payloads (serde camelCase, validated)
//! - [`constants`] — centralized defaults
//! - [`error`] — typed errors with host-facing messages
//!
//! ## Design notes
//!
//! Every calculation is a pure, synchronous transform over in-memory
//! sequences: `calc_spc` clones its input feature and never mutates the
//! original, recoverable input problems are logged warnings rather than
//! errors, and parameters that are illegal for the active configuration are
//! silently omitted from the output table.

pub mod calc;
pub mod constants;
pub mod data;
pub mod error;
pub mod options;

pub use calc::params::{SpcParam, available_spc_params, filter_spc_params, is_spc_param};
pub use calc::spc::calc_spc;
pub use data::feature::{Characteristic, Feature, SeriesField, TableValue, Timeseries};
pub use data::frame::{FieldKind, FieldLabels, Frame};
pub use data::parse::{ParsedData, parse_frames};
pub use error::{Result, SpcError};
pub use options::{
    AggregationType, ChartType, ConstantConfigItem, ConstantsConfig, LimitConfig, LimitConfigItem,
    PanelOptions, SpcOptions, TimeseriesParams, parse_panel_options,
};
