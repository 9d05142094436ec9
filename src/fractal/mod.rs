pub mod defaults;
pub mod limits;
pub mod newton;
pub mod orbit;
pub mod params;
pub mod roots;

pub use limits::Limits;
pub use params::{Parameters, Point, Threading};
pub use roots::{Root, RootSet};
