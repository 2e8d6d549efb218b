pub mod auth;
pub mod host;

pub use auth::*;
pub use host::*;
