mod color;
mod spherical;

pub use color::{Color, ColorError};
pub use spherical::Spherical;
