//! Data types shared by the coordinator, placement and browser layers.

mod geometry;
mod zoom;

pub use geometry::*;
pub use zoom::*;
