//! Crate-wide constants and default values
//!
//! This module centralizes all magic numbers and default values used throughout
//! the crate, making them easier to maintain and configure.

/// Statistical Process Control (SPC) defaults
pub mod spc {
    /// Default sample size (no grouping, individuals data)
    pub const DEFAULT_SAMPLE_SIZE: usize = 1;

    /// Largest sample size for which UCL/LCL derivation is supported
    pub const MAX_DEFAULT_SAMPLE_SIZE: usize = 10;

    /// Moving-range window: MR charts always compare adjacent pairs
    pub const MOVING_RANGE_SAMPLE_SIZE: usize = 2;

    /// Sigma multiplier for individuals-chart control limits (±3σ)
    pub const X_CHART_SIGMA: f64 = 3.0;
}

/// Reserved column and metadata names in host-supplied frames
pub mod columns {
    /// Feature key column of a features table
    pub const FEATURE: &str = "feature";

    /// Characteristic key column of a features table
    pub const CONTROL: &str = "control";

    /// Nominal-value column of a features table
    pub const NOMINAL: &str = "nominal";

    /// Part identifier column of a features table
    pub const PART_ID: &str = "partid";

    /// Feature type column of a features table
    pub const FEATURE_TYPE: &str = "featuretype";

    /// Frame meta `type` value marking a wide timeseries frame
    pub const TIMESERIES_WIDE: &str = "timeseries-wide";
}

/// Date/time parsing constants
pub mod datetime {
    /// Minimum string length for compact timestamp parsing
    pub const MIN_TIMESTAMP_LENGTH: usize = 15;

    /// YYYYMMDD format length
    pub const DATE_FORMAT_LENGTH: usize = 8;

    /// HHMMSS format length
    pub const TIME_FORMAT_LENGTH: usize = 6;

    /// Rows sampled when sniffing a string column for timestamps
    pub const SNIFF_SAMPLE_ROWS: usize = 10;
}

/// Plotting and display defaults forwarded to the host
pub mod display {
    /// Default timeseries line color
    pub const DEFAULT_LINE_COLOR: &str = "rgb(31, 96, 196)";

    /// Default constant-line color
    pub const DEFAULT_CONSTANT_COLOR: &str = "#37872d";

    /// Default line width for series and constant lines
    pub const DEFAULT_LINE_WIDTH: f64 = 2.0;

    /// Default point size for timeseries markers
    pub const DEFAULT_POINT_SIZE: f64 = 6.0;

    /// Default decimal places for rendered values
    pub const DEFAULT_DECIMALS: u8 = 2;
}
