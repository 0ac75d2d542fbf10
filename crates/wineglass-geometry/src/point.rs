use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Polar {
    pub r: f64,
    pub rad: f64,
}

impl Point2D {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f64 {
        distance_2d(self, Self::ZERO)
    }

    pub fn distance(self, other: Self) -> f64 {
        distance_2d(self, other)
    }

    pub const fn with_z(self, z: f64) -> Point3D {
        Point3D::new(self.x, self.y, z)
    }
}

impl Point3D {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub const fn xy(self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    pub fn translate(self, offset: Point2D) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.z)
    }
}

impl std::ops::Add for Point2D {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Point2D {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl std::ops::Mul<f64> for Point2D {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl std::ops::Neg for Point2D {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y)
    }
}

impl std::ops::Mul<f64> for Point3D {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

pub fn distance_2d(first: Point2D, second: Point2D) -> f64 {
    let dx = first.x - second.x;
    let dy = first.y - second.y;
    (dx * dx + dy * dy).sqrt()
}

pub fn ortho_to_polar(x: f64, y: f64) -> Polar {
    Polar {
        r: (x * x + y * y).sqrt(),
        rad: y.atan2(x),
    }
}

pub fn polar_to_ortho(r: f64, rad: f64) -> Point2D {
    let (sin, cos) = rad.sin_cos();
    Point2D::new(r * cos, r * sin)
}

pub fn rotate(x: f64, y: f64, delta_rad: f64) -> Point2D {
    let Polar { r, rad } = ortho_to_polar(x, y);
    polar_to_ortho(r, rad + delta_rad)
}

pub fn clamp(x: f64, min: f64, max: f64) -> f64 {
    x.max(min).min(max)
}

pub fn interval_intersection(left: f64, right: f64, clamp_left: f64, clamp_right: f64) -> f64 {
    let intersection =
        clamp(right, clamp_left, clamp_right) - clamp(left, clamp_left, clamp_right);
    intersection / (right - left)
}
