// Domain value objects
pub mod asset_ref;
pub mod identifiers;
pub mod validation_policy;

pub use asset_ref::*;
pub use identifiers::*;
pub use validation_policy::*;
