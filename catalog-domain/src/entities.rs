// Domain entities

pub mod catalog;
pub mod item;
pub mod model;

pub use catalog::*;
pub use item::*;
pub use model::*;
