pub mod feature;
pub mod frame;
pub mod load;
pub mod parse;

// Re-export key types for convenience
#[allow(unused_imports)]
pub use feature::{Characteristic, Feature, SeriesField, TableValue, Timeseries};
#[allow(unused_imports)]
pub use frame::{FieldKind, FieldLabels, Frame};
#[allow(unused_imports)]
pub use parse::{ParsedData, parse_frames};
