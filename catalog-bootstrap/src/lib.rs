pub mod context;
pub mod lifecycle;

pub use lifecycle::{run_export, run_standalone};
