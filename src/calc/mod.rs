pub mod aggregation;
pub mod constants;
pub mod limits;
pub mod params;
pub mod spc;

// Re-export key entry points for convenience
#[allow(unused_imports)]
pub use constants::{ControlConstant, control_constant};
#[allow(unused_imports)]
pub use params::{SpcParam, available_spc_params, filter_spc_params, is_spc_param};
#[allow(unused_imports)]
pub use spc::calc_spc;
