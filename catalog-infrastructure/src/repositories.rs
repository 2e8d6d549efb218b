pub mod item_files;
pub mod upload_assets;

pub use item_files::*;
pub use upload_assets::*;
