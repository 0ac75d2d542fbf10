pub mod distort;
pub mod easing;
pub mod hex;
pub mod point;

pub use distort::Distorter;
pub use easing::Easing;
pub use hex::{HEX_ORIENTATION, HexCube, HexGrid, HexSpiral};
pub use point::{
    Point2D, Point3D, Polar, clamp, distance_2d, interval_intersection, ortho_to_polar,
    polar_to_ortho, rotate,
};
