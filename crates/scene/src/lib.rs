pub mod camera;
pub mod flat;
pub mod picking;
pub mod readout;
pub mod surface;

pub use camera::*;
pub use flat::*;
pub use picking::*;
pub use readout::*;
pub use surface::*;
