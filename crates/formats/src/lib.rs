pub mod manifest;
pub mod package;
pub mod tile;

pub use manifest::*;
pub use package::*;
pub use tile::*;
