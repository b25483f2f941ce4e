pub mod catalog;
pub mod compositor;
pub mod host;
pub mod layer;
pub mod raster;
pub mod selection;
pub mod symbology;
pub mod viewer;

pub use catalog::*;
pub use compositor::*;
pub use host::*;
pub use layer::*;
pub use raster::*;
pub use selection::*;
pub use symbology::*;
pub use viewer::*;
