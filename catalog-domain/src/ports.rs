// Repository and Service Port Traits (Interfaces)
// Define what the domain needs from infrastructure

pub mod assets;
pub mod repositories;

pub use assets::*;
pub use repositories::*;
