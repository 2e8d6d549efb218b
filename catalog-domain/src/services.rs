// Pure domain services: Lua emission and item validation

pub mod emitter;
pub mod lua_writer;
pub mod validation;

pub use emitter::*;
pub use lua_writer::*;
pub use validation::*;
