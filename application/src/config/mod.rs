//! Application-level configuration.
//!
//! - [`ExecutionParams`]: loop control (iteration cap, tool concurrency, timeouts)

pub mod execution_params;

pub use execution_params::ExecutionParams;
